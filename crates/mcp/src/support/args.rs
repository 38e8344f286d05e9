#![forbid(unsafe_code)]

use super::ai::ai_error;
use mq_core::ids::MissionId;
use serde_json::{Map, Value};

pub(crate) fn require_object(args: &Value) -> Result<&Map<String, Value>, Value> {
    args.as_object()
        .ok_or_else(|| ai_error("INVALID_INPUT", "arguments must be an object"))
}

pub(crate) fn require_mission_id(args: &Map<String, Value>, key: &str) -> Result<MissionId, Value> {
    let raw = match args.get(key) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let Some(raw) = raw else {
        return Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a mission id"),
        ));
    };
    MissionId::try_new(raw).map_err(|e| ai_error("INVALID_INPUT", &format!("{key}: {}", e.message())))
}

/// Form-field text. Numbers are accepted and rendered as typed; missing means empty.
pub(crate) fn form_text(args: &Map<String, Value>, key: &str) -> Result<String, Value> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a string or a number"),
        )),
    }
}
