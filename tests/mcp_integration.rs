//! Integration tests for MCP protocol handling.
//!
//! These tests drive the full per-line pipeline (parse → dispatch → reply)
//! against an in-memory clipboard backend, verifying the JSON-RPC 2.0
//! protocol implementation end to end: lifecycle gating, tool calls, error
//! responses, batches, and recovery from malformed input.

use clipboard_mcp::clipboard::MemoryClipboard;
use clipboard_mcp::mcp::handler::McpHandler;
use clipboard_mcp::mcp::server::{dispatch_line, LineOutcome};
use serde_json::{json, Value};

fn handler() -> McpHandler<MemoryClipboard> {
    McpHandler::new(MemoryClipboard::new())
}

/// Dispatches one line and returns the serialised output line, if any.
fn output_line(handler: &mut McpHandler<MemoryClipboard>, line: &str) -> Option<String> {
    match dispatch_line(handler, line) {
        LineOutcome::Silent => None,
        LineOutcome::Single(reply) => Some(serde_json::to_string(&reply).unwrap()),
        LineOutcome::Batch(replies) => Some(serde_json::to_string(&replies).unwrap()),
    }
}

fn output_value(handler: &mut McpHandler<MemoryClipboard>, line: &str) -> Value {
    let line = output_line(handler, line).expect("expected an output line");
    serde_json::from_str(&line).unwrap()
}

fn initialize(handler: &mut McpHandler<MemoryClipboard>) {
    let response = output_value(
        handler,
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
    );
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_initialize_handshake() {
    let mut h = handler();
    let response = output_value(
        &mut h,
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test-client","version":"1.0.0"}}}"#,
    );

    assert_eq!(response["jsonrpc"], "2.0");
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(response["result"]["serverInfo"]["name"], "clipboard-mcp");
    assert_eq!(response["result"]["capabilities"]["tools"], json!({}));
}

#[test]
fn test_initialize_is_idempotent() {
    let mut h = handler();
    initialize(&mut h);

    // A second initialize still returns a well-formed result
    let response = output_value(
        &mut h,
        r#"{"jsonrpc":"2.0","id":2,"method":"initialize","params":{}}"#,
    );
    assert_eq!(response["id"], 2);
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");

    // And the server is still initialized
    let response = output_value(
        &mut h,
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/list","params":{}}"#,
    );
    assert!(response["result"]["tools"].is_array());
}

#[test]
fn test_gate_blocks_everything_but_initialize_and_ping() {
    for request in [
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list","params":{}}"#,
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"get_clipboard"}}"#,
    ] {
        let mut h = handler();
        let response = output_value(&mut h, request);
        assert_eq!(response["error"]["code"], -32000);
        assert_eq!(
            response["error"]["message"],
            "Server not initialized. Call initialize first."
        );
    }
}

// =============================================================================
// Tool calls
// =============================================================================

#[test]
fn test_tools_list_catalog() {
    let mut h = handler();
    initialize(&mut h);

    let response = output_value(
        &mut h,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list","params":{}}"#,
    );
    let tools = response["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0]["name"], "get_clipboard");
    assert_eq!(tools[1]["name"], "set_clipboard");
    assert!(tools[0]["inputSchema"].is_object());
    assert!(tools[0]["description"].as_str().unwrap().len() > 10);
}

#[test]
fn test_set_clipboard_scenario() {
    let mut h = handler();
    initialize(&mut h);

    let line = output_line(
        &mut h,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"set_clipboard","arguments":{"text":"hi"}}}"#,
    )
    .unwrap();

    // Exact wire format from the protocol contract
    assert_eq!(
        line,
        r#"{"jsonrpc":"2.0","id":2,"result":{"content":[{"type":"text","text":"Successfully copied 2 characters to clipboard"}]}}"#
    );
}

#[test]
fn test_clipboard_round_trip() {
    let mut h = handler();
    initialize(&mut h);

    let text = "Unicode: héllo wörld — 日本語 🦀";
    let set = json!({
        "jsonrpc": "2.0", "id": 2, "method": "tools/call",
        "params": {"name": "set_clipboard", "arguments": {"text": text}}
    });
    let response = output_value(&mut h, &set.to_string());
    assert!(response["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Successfully copied"));

    let response = output_value(
        &mut h,
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"get_clipboard","arguments":{}}}"#,
    );
    assert_eq!(response["result"]["content"][0]["type"], "text");
    assert_eq!(response["result"]["content"][0]["text"], text);
}

#[test]
fn test_size_boundary() {
    let mut h = handler();
    initialize(&mut h);

    // Exactly 1 MiB succeeds
    let exact = json!({
        "jsonrpc": "2.0", "id": 2, "method": "tools/call",
        "params": {"name": "set_clipboard", "arguments": {"text": "x".repeat(1024 * 1024)}}
    });
    let response = output_value(&mut h, &exact.to_string());
    assert!(response["result"].is_object(), "1 MiB should succeed");

    // One byte over fails with invalid params
    let over = json!({
        "jsonrpc": "2.0", "id": 3, "method": "tools/call",
        "params": {"name": "set_clipboard", "arguments": {"text": "x".repeat(1024 * 1024 + 1)}}
    });
    let response = output_value(&mut h, &over.to_string());
    assert_eq!(response["error"]["code"], -32602);
}

#[test]
fn test_unknown_tool_is_invalid_params_not_method_not_found() {
    let mut h = handler();
    initialize(&mut h);

    let response = output_value(
        &mut h,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"nonexistent","arguments":{}}}"#,
    );
    assert_eq!(response["error"]["code"], -32602);
    assert_eq!(response["error"]["message"], "Unknown tool: nonexistent");
}

#[test]
fn test_unknown_method() {
    let mut h = handler();
    initialize(&mut h);

    let response = output_value(
        &mut h,
        r#"{"jsonrpc":"2.0","id":2,"method":"resources/list","params":{}}"#,
    );
    assert_eq!(response["error"]["code"], -32601);
}

// =============================================================================
// Notifications
// =============================================================================

#[test]
fn test_notification_silence() {
    let mut h = handler();
    initialize(&mut h);

    // No id → no output, even for unknown methods
    for line in [
        r#"{"jsonrpc":"2.0","method":"$/ping"}"#,
        r#"{"jsonrpc":"2.0","method":"no/such/method"}"#,
        r#"{"jsonrpc":"2.0","method":"tools/list","params":{}}"#,
    ] {
        assert!(
            output_line(&mut h, line).is_none(),
            "notification produced output: {line}"
        );
    }
}

// =============================================================================
// Malformed input and recovery
// =============================================================================

#[test]
fn test_parse_error_has_null_id() {
    let mut h = handler();
    let response = output_value(&mut h, "{truncated json");
    assert_eq!(response["error"]["code"], -32700);
    assert!(response["id"].is_null());
}

#[test]
fn test_malformed_line_recovery() {
    let mut h = handler();
    initialize(&mut h);

    // First: a truncated line → parse error with null id
    let response = output_value(&mut h, r#"{"jsonrpc":"2.0","id":5,"meth"#);
    assert_eq!(response["error"]["code"], -32700);
    assert!(response["id"].is_null());

    // Second: a valid tools/list → normal success, server did not exit
    let response = output_value(
        &mut h,
        r#"{"jsonrpc":"2.0","id":6,"method":"tools/list","params":{}}"#,
    );
    assert_eq!(response["id"], 6);
    assert!(response["result"]["tools"].is_array());
}

#[test]
fn test_invalid_request_shapes() {
    let mut h = handler();

    for (line, expected_fragment) in [
        ("42", "must be JSON object"),
        (r#""a string""#, "must be JSON object"),
        (r#"{"id":1,"method":"x"}"#, "jsonrpc"),
        (r#"{"jsonrpc":"2.0","id":1}"#, "missing method"),
        ("[]", "empty batch"),
    ] {
        let response = output_value(&mut h, line);
        assert_eq!(response["error"]["code"], -32600, "line: {line}");
        assert!(
            response["error"]["message"]
                .as_str()
                .unwrap()
                .contains(expected_fragment),
            "line: {line}"
        );
    }
}

// =============================================================================
// Batches
// =============================================================================

#[test]
fn test_batch_order_preservation() {
    let mut h = handler();
    initialize(&mut h);

    let batch = json!([
        {"jsonrpc": "2.0", "id": "a", "method": "tools/list", "params": {}},
        {"jsonrpc": "2.0", "method": "$/ping"},
        {"jsonrpc": "2.0", "id": "b", "method": "tools/call",
         "params": {"name": "set_clipboard", "arguments": {"text": "one"}}},
        {"jsonrpc": "2.0", "id": "c", "method": "tools/call",
         "params": {"name": "get_clipboard"}},
    ]);

    let responses = output_value(&mut h, &batch.to_string());
    let responses = responses.as_array().unwrap();

    // Notifications are excluded; ids keep the input order
    let ids: Vec<&str> = responses
        .iter()
        .map(|response| response["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);
    assert_eq!(responses[2]["result"]["content"][0]["text"], "one");
}

#[test]
fn test_batch_mixed_success_and_error() {
    let mut h = handler();
    initialize(&mut h);

    let batch = json!([
        {"jsonrpc": "2.0", "id": 1, "method": "tools/list", "params": {}},
        {"jsonrpc": "2.0", "id": 2, "method": "bogus/method"},
    ]);
    let responses = output_value(&mut h, &batch.to_string());
    let responses = responses.as_array().unwrap();

    assert_eq!(responses.len(), 2);
    assert!(responses[0]["result"].is_object());
    assert_eq!(responses[1]["error"]["code"], -32601);
}

#[test]
fn test_all_notification_batch_writes_nothing() {
    let mut h = handler();
    let line =
        r#"[{"jsonrpc":"2.0","method":"$/ping"},{"jsonrpc":"2.0","method":"ignore/me"}]"#;
    assert!(output_line(&mut h, line).is_none());
}
