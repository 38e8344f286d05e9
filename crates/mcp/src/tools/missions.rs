#![forbid(unsafe_code)]

use super::board::{board_view, mission_json};
use crate::McpServer;
use mq_client::{Reconciliation, RemoteStatus, ToggleOutcome};
use serde_json::{Value, json};

fn toggle_warnings(outcome: &ToggleOutcome) -> Vec<Value> {
    let recovery = match outcome.reconciliation {
        Reconciliation::KeptOptimistic => {
            "The board still shows the change; call reload to see what the store holds."
        }
        Reconciliation::RolledBackToggle | Reconciliation::RolledBackMilestone => {
            "The local change was undone; try again."
        }
        Reconciliation::NotNeeded => "",
    };
    [("toggle", &outcome.toggle), ("milestone", &outcome.milestone)]
        .into_iter()
        .filter_map(|(what, status)| match status {
            RemoteStatus::Failed(message) => Some(crate::warning(
                "REMOTE_FAILED",
                &format!("{what} request failed: {message}"),
                recovery,
            )),
            RemoteStatus::Confirmed | RemoteStatus::Skipped => None,
        })
        .collect()
}

pub(crate) fn handle_toggle(server: &mut McpServer, args: Value) -> Value {
    let args = match crate::require_object(&args) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let id = match crate::require_mission_id(args, "id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let outcome = match server.with_session(|session| session.toggle(id)) {
        Ok(outcome) => outcome,
        Err(err) => return crate::sync_error(&err),
    };
    let outcome_json = match serde_json::to_value(&outcome) {
        Ok(v) => v,
        Err(err) => return crate::ai_error("INTERNAL_ERROR", &err.to_string()),
    };

    crate::ai_ok_with_warnings(
        "mission_toggle",
        json!({
            "outcome": outcome_json,
            "board": board_view(server.session())
        }),
        toggle_warnings(&outcome),
    )
}

pub(crate) fn handle_add(server: &mut McpServer, args: Value) -> Value {
    let args = match crate::require_object(&args) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let (title, description, stars) = match (
        crate::form_text(args, "title"),
        crate::form_text(args, "description"),
        crate::form_text(args, "stars"),
    ) {
        (Ok(title), Ok(description), Ok(stars)) => (title, description, stars),
        (Err(resp), _, _) | (_, Err(resp), _) | (_, _, Err(resp)) => return resp,
    };

    match server.with_session(|session| session.add_mission(&title, &description, &stars)) {
        Ok(mission) => crate::ai_ok(
            "mission_add",
            json!({
                "mission": mission_json(&mission),
                "board": board_view(server.session())
            }),
        ),
        Err(err) => crate::sync_error(&err),
    }
}

pub(crate) fn handle_delete(server: &mut McpServer, args: Value) -> Value {
    let args = match crate::require_object(&args) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let id = match crate::require_mission_id(args, "id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match server.with_session(|session| session.delete_mission(id)) {
        Ok(mission) => crate::ai_ok(
            "mission_delete",
            json!({
                "deleted": mission_json(&mission),
                "board": board_view(server.session())
            }),
        ),
        Err(err) => crate::sync_error(&err),
    }
}
