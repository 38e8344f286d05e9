#![forbid(unsafe_code)]

mod support;
use support::*;

use serde_json::json;
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};

#[test]
fn initialize_echoes_protocol_and_lists_tools() {
    let dir = temp_dir("init_tools");
    let mut server = Server::start(&dir, &[]);

    let init = server.request(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": { "protocolVersion": "2025-03-26", "capabilities": {}, "clientInfo": { "name": "test", "version": "0" } }
    }));
    assert_eq!(init["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(init["result"]["serverInfo"]["name"], "mission-quest-mcp");

    let tools_list = server.request(json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/list",
        "params": {}
    }));
    let tools = tools_list
        .get("result")
        .and_then(|v| v.get("tools"))
        .and_then(|v| v.as_array())
        .expect("result.tools");
    let mut names = tools
        .iter()
        .filter_map(|tool| tool.get("name").and_then(|v| v.as_str()))
        .collect::<Vec<_>>();
    names.sort();
    assert_eq!(
        names,
        vec![
            "board",
            "milestone_update",
            "mission_add",
            "mission_delete",
            "mission_toggle",
            "parent_exit",
            "parent_unlock",
            "reload"
        ]
    );
}

#[test]
fn malformed_lines_get_json_rpc_errors() {
    let dir = temp_dir("malformed");
    let mut server = Server::start_initialized(&dir, &[]);

    server.send(json!({ "jsonrpc": "2.0", "id": 5 }));
    assert_json_rpc_error(&server.recv(), -32600);

    let unknown = server.request(json!({ "jsonrpc": "2.0", "id": 6, "method": "does/not/exist" }));
    assert_json_rpc_error(&unknown, -32601);

    let ping = server.request(json!({ "jsonrpc": "2.0", "id": 7, "method": "ping" }));
    assert_eq!(ping["id"], 7);
    assert!(ping.get("result").is_some());
}

#[test]
fn tools_call_requires_object_params() {
    let dir = temp_dir("params");
    let mut server = Server::start_initialized(&dir, &[]);
    let resp = server.request(json!({
        "jsonrpc": "2.0",
        "id": 9,
        "method": "tools/call",
        "params": "board"
    }));
    assert_json_rpc_error(&resp, -32602);
}

#[test]
fn content_length_framing_is_detected() {
    let dir = temp_dir("content_length");
    let mut child = Command::new(env!("CARGO_BIN_EXE_mq_mcp"))
        .arg("--storage-dir")
        .arg(&dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn mq_mcp");
    let mut stdin = child.stdin.take().expect("stdin");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout"));

    let body = serde_json::to_vec(&json!({ "jsonrpc": "2.0", "id": 1, "method": "ping" }))
        .expect("serialize");
    write!(stdin, "Content-Length: {}\r\n\r\n", body.len()).expect("write header");
    stdin.write_all(&body).expect("write body");
    stdin.flush().expect("flush");

    let mut content_length = None;
    loop {
        let mut line = String::new();
        let read = stdout.read_line(&mut line).expect("read header");
        assert!(read > 0, "unexpected EOF");
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some((key, value)) = trimmed.split_once(':')
            && key.trim().eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse::<usize>().ok();
        }
    }
    let len = content_length.expect("content-length header");
    let mut buf = vec![0u8; len];
    stdout.read_exact(&mut buf).expect("read body");
    let resp: serde_json::Value = serde_json::from_slice(&buf).expect("json body");
    assert_eq!(resp["id"], 1);
    assert_eq!(resp["result"], json!({}));

    drop(stdin);
    let _ = child.wait();
}
