#![forbid(unsafe_code)]

mod board;
mod definitions;
mod milestone;
mod missions;
mod parent;

pub(crate) use definitions::tool_definitions;

use crate::McpServer;
use serde_json::Value;

pub(crate) fn dispatch_tool(server: &mut McpServer, name: &str, args: Value) -> Option<Value> {
    let resp = match name {
        "board" => board::handle_board(server, args),
        "reload" => board::handle_reload(server, args),
        "mission_toggle" => missions::handle_toggle(server, args),
        "mission_add" => missions::handle_add(server, args),
        "mission_delete" => missions::handle_delete(server, args),
        "milestone_update" => milestone::handle_update(server, args),
        "parent_unlock" => parent::handle_unlock(server, args),
        "parent_exit" => parent::handle_exit(server, args),
        _ => return None,
    };
    Some(resp)
}
