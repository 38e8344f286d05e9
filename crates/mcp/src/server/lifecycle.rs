#![forbid(unsafe_code)]

use crate::McpServer;
use mq_client::Session;
use serde_json::{Value, json};

impl McpServer {
    pub(crate) fn new(runtime: tokio::runtime::Runtime, session: Session) -> Self {
        Self {
            initialized: false,
            runtime,
            session,
        }
    }

    pub(crate) fn handle(&mut self, request: crate::JsonRpcRequest) -> Option<Value> {
        let method = request.method.as_str();
        let expects_response = !matches!(request.id.as_ref(), None | Some(Value::Null));

        if method == "initialize" {
            let protocol_version = request
                .params
                .as_ref()
                .and_then(|v| v.get("protocolVersion"))
                .and_then(|v| v.as_str())
                .unwrap_or(crate::MCP_VERSION);

            return Some(crate::json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": protocol_version,
                    "serverInfo": {
                        "name": crate::SERVER_NAME,
                        "version": crate::SERVER_VERSION
                    },
                    "capabilities": { "tools": {} }
                }),
            ));
        }

        // Both spellings are notifications and never get a response.
        if method == "notifications/initialized" || method == "initialized" {
            self.initialized = true;
            return None;
        }

        if !self.initialized {
            if matches!(method, "tools/call" | "tools/list" | "ping") {
                self.initialized = true;
            } else if expects_response {
                return Some(crate::json_rpc_error(
                    request.id,
                    -32002,
                    "Server not initialized",
                ));
            } else {
                return None;
            }
        }

        if method == "ping" {
            return Some(crate::json_rpc_response(request.id, json!({})));
        }

        if method == "tools/list" {
            let tools = crate::tools::tool_definitions();
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "tools": tools }),
            ));
        }

        if method == "tools/call" {
            let Some(params_obj) = request.params.as_ref().and_then(|v| v.as_object()) else {
                return Some(crate::json_rpc_error(
                    request.id,
                    -32602,
                    "params must be an object",
                ));
            };

            let tool_name = params_obj
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .trim()
                .to_string();
            let args = match params_obj.get("arguments") {
                None | Some(Value::Null) => json!({}),
                Some(v) => v.clone(),
            };
            let response_body = self.call_tool(&tool_name, args);

            return Some(crate::json_rpc_response(
                request.id,
                json!({
                    "content": [crate::tool_text_content(&response_body)],
                    "isError": !response_body.get("success").and_then(|v| v.as_bool()).unwrap_or(false)
                }),
            ));
        }

        if !expects_response {
            return None;
        }

        Some(crate::json_rpc_error(
            request.id,
            -32601,
            &format!("Method not found: {method}"),
        ))
    }

    pub(crate) fn call_tool(&mut self, name: &str, args: Value) -> Value {
        tracing::debug!(tool = name, "tools/call");
        match crate::tools::dispatch_tool(self, name, args) {
            Some(resp) => resp,
            None => crate::ai_error_with(
                "UNKNOWN_TOOL",
                &format!("Unknown tool: {name}"),
                Some("Use tools/list to see the available tools."),
                None,
            ),
        }
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// Runs a session future to completion on the server's runtime.
    pub(crate) fn with_session<'a, F, T>(&'a mut self, f: impl FnOnce(&'a mut Session) -> F) -> T
    where
        F: std::future::Future<Output = T> + 'a,
    {
        let Self {
            runtime, session, ..
        } = self;
        runtime.block_on(f(session))
    }

    pub(crate) fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}
