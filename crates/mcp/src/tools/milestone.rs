#![forbid(unsafe_code)]

use super::board::board_view;
use crate::McpServer;
use serde_json::{Value, json};

pub(crate) fn handle_update(server: &mut McpServer, args: Value) -> Value {
    let args = match crate::require_object(&args) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let goal = match crate::form_text(args, "goal") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let value = match crate::form_text(args, "value") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match server.with_session(|session| session.update_milestone(&goal, &value)) {
        Ok(settings) => crate::ai_ok(
            "milestone_update",
            json!({
                "milestone": {
                    "goal": settings.goal,
                    "value": settings.value,
                    "percentage": settings.percentage()
                },
                "board": board_view(server.session())
            }),
        ),
        Err(err) => crate::sync_error(&err),
    }
}
