#![forbid(unsafe_code)]

mod support;
use support::*;

use serde_json::{Value, json};

fn add(server: &mut Server, title: &str, stars: Value) -> i64 {
    let resp = server.call(
        "mission_add",
        json!({ "title": title, "description": format!("{title} today"), "stars": stars }),
    );
    assert_eq!(resp["success"], true, "{resp}");
    resp["result"]["mission"]["id"].as_i64().expect("mission id")
}

#[test]
fn locked_board_refuses_admin_tools() {
    let dir = temp_dir("locked");
    let mut server = Server::start_initialized(&dir, &[]);

    let resp = server.call(
        "mission_add",
        json!({ "title": "Feed cat", "description": "wet food", "stars": 2 }),
    );
    assert_eq!(error_code(&resp), Some("PARENT_MODE_REQUIRED"));
    let resp = server.call("milestone_update", json!({ "goal": 50, "value": 0 }));
    assert_eq!(error_code(&resp), Some("PARENT_MODE_REQUIRED"));
    let resp = server.call("mission_delete", json!({ "id": 1 }));
    assert_eq!(error_code(&resp), Some("PARENT_MODE_REQUIRED"));

    let wrong = server.call("parent_unlock", json!({ "pin": "12" }));
    assert_eq!(error_code(&wrong), Some("INCORRECT_PIN"));
    assert_eq!(wrong["error"]["message"], "Incorrect PIN. Please try again.");
    let board = server.call("board", json!({}));
    assert_eq!(board["result"]["parent_mode"], false);
    assert_eq!(board["result"]["pin_error"], "Incorrect PIN. Please try again.");
}

#[test]
fn ratchet_milestone_scenario_end_to_end() {
    let dir = temp_dir("ratchet");
    let mut server = Server::start_initialized(&dir, &[]);
    assert_eq!(server.call("parent_unlock", json!({ "pin": "1234" }))["success"], true);
    let id = add(&mut server, "Feed the fish", json!(3));
    server.call("parent_exit", json!({}));

    let on = server.call("mission_toggle", json!({ "id": id }));
    assert_eq!(on["result"]["outcome"]["completed"], true);
    assert_eq!(on["result"]["board"]["milestone"]["value"], 30);
    assert_eq!(on["result"]["board"]["stats"]["completed"], 30);
    assert_eq!(on["result"]["board"]["stats"]["percentage"], 30);

    let off = server.call("mission_toggle", json!({ "id": id }));
    assert_eq!(off["result"]["outcome"]["completed"], false);
    assert_eq!(off["result"]["outcome"]["milestone"]["status"], "skipped");
    assert_eq!(off["result"]["board"]["milestone"]["value"], 30);
    assert_eq!(off["result"]["board"]["stats"]["completed"], 0);

    let reloaded = server.call("reload", json!({}));
    let board = &reloaded["result"]["board"];
    assert_eq!(board["missions"][0]["completed"], false);
    assert_eq!(board["milestone"]["value"], 30);
}

#[test]
fn symmetric_policy_flag_restores_milestone() {
    let dir = temp_dir("symmetric");
    let mut server = Server::start_initialized(&dir, &["--milestone-policy", "symmetric"]);
    server.call("parent_unlock", json!({ "pin": "1234" }));
    let id = add(&mut server, "Practice piano", json!("4"));

    server.call("mission_toggle", json!({ "id": id }));
    let off = server.call("mission_toggle", json!({ "id": id }));
    assert_eq!(off["result"]["outcome"]["milestone_delta"], -40);
    assert_eq!(off["result"]["board"]["milestone"]["value"], 0);
    assert_eq!(off["result"]["board"]["policies"]["milestone"], "symmetric");
}

#[test]
fn validation_errors_name_each_field() {
    let dir = temp_dir("validation");
    let mut server = Server::start_initialized(&dir, &[]);
    server.call("parent_unlock", json!({ "pin": 1234 }));

    let resp = server.call(
        "mission_add",
        json!({ "title": "   ", "description": "ok", "stars": 9 }),
    );
    assert_eq!(error_code(&resp), Some("INVALID_INPUT"));
    let fields = resp["error"]["fields"].as_array().expect("fields");
    let names = fields
        .iter()
        .filter_map(|f| f["field"].as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["title", "stars"]);

    let resp = server.call("milestone_update", json!({ "goal": 0, "value": 1 }));
    assert_eq!(error_code(&resp), Some("INVALID_INPUT"));
    assert_eq!(resp["error"]["fields"][0]["field"], "goal");

    let board = server.call("board", json!({}));
    assert_eq!(board["result"]["mission_count"], 0);
}

#[test]
fn state_and_parent_mode_survive_restart() {
    let dir = temp_dir("restart");
    let (kept, deleted) = {
        let mut server = Server::start_initialized(&dir, &[]);
        server.call("parent_unlock", json!({ "pin": "1234" }));
        let deleted = add(&mut server, "Walk dog", json!(5));
        let kept = add(&mut server, "Water plants", json!(1));
        let resp = server.call("mission_delete", json!({ "id": deleted }));
        assert_eq!(resp["success"], true, "{resp}");
        assert_eq!(resp["result"]["board"]["mission_count"], 1);
        assert_eq!(resp["result"]["board"]["stats"]["total"], 100);

        let resp = server.call("milestone_update", json!({ "goal": "200", "value": "50" }));
        assert_eq!(resp["result"]["milestone"]["percentage"], 25);
        (kept, deleted)
    };

    let mut server = Server::start_initialized(&dir, &[]);
    let board = server.call("board", json!({}));
    let board = &board["result"];
    assert_eq!(board["parent_mode"], true);
    assert_eq!(board["mission_count"], 1);
    assert_eq!(board["missions"][0]["id"], kept);
    assert_eq!(board["milestone"], json!({ "goal": 200, "value": 50, "percentage": 25, "achieved": false }));

    let fresh = add(&mut server, "Walk dog", json!(5));
    assert!(fresh > deleted, "ids are never reused");

    let gone = server.call("mission_toggle", json!({ "id": deleted }));
    assert_eq!(error_code(&gone), Some("UNKNOWN_ID"));
}
