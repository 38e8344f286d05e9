#![forbid(unsafe_code)]

use mq_client::{GateError, SyncError};
use serde_json::{Value, json};

pub(crate) fn warning(code: &str, message: &str, recovery: &str) -> Value {
    json!({
        "code": code,
        "message": message,
        "recovery": recovery
    })
}

pub(crate) fn ai_ok_with_warnings(intent: &str, result: Value, warnings: Vec<Value>) -> Value {
    json!({
        "success": true,
        "intent": intent,
        "result": result,
        "warnings": warnings,
        "error": null
    })
}

pub(crate) fn ai_ok(intent: &str, result: Value) -> Value {
    ai_ok_with_warnings(intent, result, Vec::new())
}

pub(crate) fn ai_error(code: &str, message: &str) -> Value {
    ai_error_with(code, message, None, None)
}

pub(crate) fn ai_error_with(
    code: &str,
    message: &str,
    recovery: Option<&str>,
    fields: Option<Value>,
) -> Value {
    let mut error_obj = serde_json::Map::new();
    error_obj.insert("code".to_string(), Value::String(code.to_string()));
    error_obj.insert(
        "message".to_string(),
        Value::String(message.trim().to_string()),
    );
    if let Some(recovery) = recovery {
        error_obj.insert(
            "recovery".to_string(),
            Value::String(recovery.trim().to_string()),
        );
    }
    if let Some(fields) = fields {
        error_obj.insert("fields".to_string(), fields);
    }

    json!({
        "success": false,
        "intent": "error",
        "result": {},
        "warnings": [],
        "error": Value::Object(error_obj)
    })
}

pub(crate) fn sync_error(err: &SyncError) -> Value {
    match err {
        SyncError::InvalidMission(errors) => {
            let fields = errors
                .as_slice()
                .iter()
                .map(|e| json!({ "field": e.field(), "message": e.message() }))
                .collect::<Vec<_>>();
            ai_error_with(
                err.code(),
                &err.to_string(),
                Some("Fix the listed fields and submit again."),
                Some(Value::Array(fields)),
            )
        }
        SyncError::InvalidMilestone(e) => ai_error_with(
            err.code(),
            &err.to_string(),
            Some("Goal must be a positive whole number and value a non-negative one."),
            Some(json!([{ "field": e.field(), "message": e.message() }])),
        ),
        SyncError::UnknownMission(_) => ai_error_with(
            err.code(),
            &err.to_string(),
            Some("Call board to see the current missions."),
            None,
        ),
        SyncError::ParentModeRequired => ai_error_with(
            err.code(),
            "Parent mode is required for this action",
            Some("Call parent_unlock with the parent PIN first."),
            None,
        ),
        SyncError::Remote { .. } => ai_error_with(
            err.code(),
            &err.to_string(),
            Some("Retry the action, or call reload to refetch the board."),
            None,
        ),
    }
}

pub(crate) fn gate_error(err: GateError) -> Value {
    ai_error_with(
        "INCORRECT_PIN",
        &err.to_string(),
        Some("Enter the 4-digit parent PIN."),
        None,
    )
}
