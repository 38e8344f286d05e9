#![forbid(unsafe_code)]

use crate::McpServer;
use mq_client::{LoadReport, LoadState, Session};
use mq_core::model::Mission;
use serde_json::{Value, json};

pub(crate) fn mission_json(mission: &Mission) -> Value {
    json!({
        "id": mission.id,
        "title": mission.title,
        "description": mission.description,
        "stars": mission.stars,
        "points": mission.points(),
        "completed": mission.completed,
        "created_at": crate::ts_ms_to_rfc3339(mission.created_at_ms)
    })
}

/// Everything the page renders, in one object.
pub(crate) fn board_view(session: &Session) -> Value {
    let sync = session.sync();
    let state = sync.state();
    let stats = state.stats();
    let milestone = state.milestone();
    let load = match state.load_state() {
        LoadState::Loading => "loading",
        LoadState::Ready => "ready",
        LoadState::Degraded => "degraded",
    };

    json!({
        "load_state": load,
        "parent_mode": session.is_parent_mode(),
        "pin_error": session.gate().last_error().map(|e| e.to_string()),
        "missions": state.missions().iter().map(mission_json).collect::<Vec<_>>(),
        "mission_count": state.mission_count(),
        "stats": {
            "completed": stats.completed,
            "total": stats.total,
            "percentage": stats.percentage()
        },
        "milestone": {
            "goal": milestone.goal,
            "value": milestone.value,
            "percentage": milestone.percentage(),
            "achieved": milestone.is_achieved()
        },
        "feedback": sync.feedback().map(|f| json!({ "kind": f.kind(), "text": f.text() })),
        "policies": {
            "milestone": sync.config().milestone_policy.as_str(),
            "reconcile": sync.config().reconcile_policy.as_str()
        }
    })
}

fn load_warnings(report: &LoadReport) -> Vec<Value> {
    report
        .failed
        .iter()
        .map(|what| {
            crate::warning(
                "LOAD_DEGRADED",
                &format!("could not load {what}; showing defaults"),
                "Call reload to try again.",
            )
        })
        .collect()
}

/// Refetches first when another writer invalidated the view; a failed refetch keeps the
/// current copy and says so.
pub(crate) fn handle_board(server: &mut McpServer, _args: Value) -> Value {
    let warnings = match server.with_session(|session| session.revalidate()) {
        Ok(_) => Vec::new(),
        Err(err) => {
            tracing::warn!(error = %err, "board revalidation failed");
            vec![crate::warning(
                "STALE_VIEW",
                &format!("could not pick up recent changes: {err}"),
                "Call reload to fetch everything again.",
            )]
        }
    };
    crate::ai_ok_with_warnings("board", board_view(server.session()), warnings)
}

pub(crate) fn handle_reload(server: &mut McpServer, _args: Value) -> Value {
    let report = server.with_session(|session| session.reload());
    crate::ai_ok_with_warnings(
        "reload",
        json!({ "board": board_view(server.session()) }),
        load_warnings(&report),
    )
}
