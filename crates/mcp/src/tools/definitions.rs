#![forbid(unsafe_code)]

use serde_json::{Value, json};

fn no_args() -> Value {
    json!({ "type": "object", "properties": {}, "required": [] })
}

fn id_only() -> Value {
    json!({
        "type": "object",
        "properties": { "id": { "type": "integer", "minimum": 1 } },
        "required": ["id"]
    })
}

pub(crate) fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "board",
            "description": "Missions, progress stats, milestone and parent-mode state, refreshed first if another session changed the store.",
            "inputSchema": no_args()
        }),
        json!({
            "name": "mission_toggle",
            "description": "Mark a mission done or not done. Applied locally first, then sent to the store.",
            "inputSchema": id_only()
        }),
        json!({
            "name": "mission_add",
            "description": "Add a mission (parent mode).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "description": { "type": "string" },
                    "stars": { "type": ["integer", "string"], "description": "1-5" }
                },
                "required": ["title", "description", "stars"]
            }
        }),
        json!({
            "name": "mission_delete",
            "description": "Delete a mission (parent mode).",
            "inputSchema": id_only()
        }),
        json!({
            "name": "milestone_update",
            "description": "Set the milestone goal and current value (parent mode).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "goal": { "type": ["integer", "string"] },
                    "value": { "type": ["integer", "string"] }
                },
                "required": ["goal", "value"]
            }
        }),
        json!({
            "name": "parent_unlock",
            "description": "Enter parent mode with the 4-digit PIN.",
            "inputSchema": {
                "type": "object",
                "properties": { "pin": { "type": ["string", "integer"] } },
                "required": ["pin"]
            }
        }),
        json!({
            "name": "parent_exit",
            "description": "Leave parent mode.",
            "inputSchema": no_args()
        }),
        json!({
            "name": "reload",
            "description": "Discard the local view and fetch everything again.",
            "inputSchema": no_args()
        }),
    ]
}
