#![forbid(unsafe_code)]

use crate::McpServer;
use serde_json::{Value, json};

pub(crate) fn handle_unlock(server: &mut McpServer, args: Value) -> Value {
    let args = match crate::require_object(&args) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let pin = match crate::form_text(args, "pin") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match server.session_mut().unlock(&pin) {
        Ok(()) => crate::ai_ok("parent_unlock", json!({ "parent_mode": true })),
        Err(err) => crate::gate_error(err),
    }
}

pub(crate) fn handle_exit(server: &mut McpServer, _args: Value) -> Value {
    server.session_mut().exit_parent_mode();
    crate::ai_ok("parent_exit", json!({ "parent_mode": false }))
}
