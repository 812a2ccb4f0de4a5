//! JSON-RPC 2.0 message types and codec for MCP communication.
//!
//! One line of input parses into a single request or a batch of requests;
//! one response (or batch of responses) serialises to exactly one output
//! line. A request without an `id` is a notification and never produces a
//! response.
//!
//! # Message Types
//!
//! - **Request**: a message with an `id`, expecting exactly one response
//! - **Notification**: a message without an `id`, expecting none
//! - **Batch**: a JSON array of requests sent as one line

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mcp::errors::McpError;

/// The MCP protocol version this implementation supports.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name for capability negotiation.
pub const SERVER_NAME: &str = "clipboard-mcp";

/// A JSON-RPC 2.0 request ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request ID.
    Number(i64),
    /// String request ID.
    String(String),
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

/// A JSON-RPC 2.0 request or notification.
///
/// An absent `id` marks a notification: the server must never respond to it.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    /// Must be "2.0".
    pub jsonrpc: String,

    /// The method to invoke.
    pub method: String,

    /// Request identifier; absent for notifications.
    #[serde(default)]
    pub id: Option<RequestId>,

    /// Optional parameters for the method.
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Returns true if this message expects no response.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// One parsed input line: a single request or a batch.
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    /// A single request object.
    Single(JsonRpcRequest),
    /// A non-empty batch of requests.
    Batch(Vec<JsonRpcRequest>),
}

/// A successful JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this response corresponds to.
    pub id: RequestId,

    /// The result of the method call.
    pub result: Value,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorData {
    /// The error code.
    pub code: i32,

    /// A short description of the error.
    pub message: String,

    /// Additional information about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A JSON-RPC 2.0 error response.
///
/// The `id` is serialised as `null` when the originating request could not
/// be parsed.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this error corresponds to, or `null` if unknown.
    pub id: Option<RequestId>,

    /// The error details.
    pub error: JsonRpcErrorData,
}

/// An outgoing reply: exactly one of success or error.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JsonRpcReply {
    /// A success response.
    Success(JsonRpcResponse),
    /// An error response.
    Error(JsonRpcError),
}

impl JsonRpcReply {
    /// Creates a success reply.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: RequestId, result: Value) -> Self {
        Self::Success(JsonRpcResponse {
            jsonrpc: "2.0",
            id,
            result,
        })
    }

    /// Creates an error reply from a dispatch fault.
    #[must_use]
    pub fn error(id: Option<RequestId>, fault: &McpError) -> Self {
        let (code, message) = fault.error_parts();
        Self::Error(JsonRpcError {
            jsonrpc: "2.0",
            id,
            error: JsonRpcErrorData {
                code,
                message,
                data: None,
            },
        })
    }

    /// Returns the request ID this reply answers, if known.
    #[must_use]
    pub const fn id(&self) -> Option<&RequestId> {
        match self {
            Self::Success(resp) => Some(&resp.id),
            Self::Error(err) => err.id.as_ref(),
        }
    }
}

/// Parses one input line into a single request or a batch.
///
/// # Errors
///
/// Returns [`McpError::Parse`] if the line is not valid JSON, and
/// [`McpError::InvalidRequest`] if the JSON is not a request object or a
/// non-empty array of request objects each carrying `jsonrpc: "2.0"` and a
/// `method`.
pub fn parse_line(line: &str) -> Result<ParsedMessage, McpError> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| McpError::Parse(format!("Parse error: {e}")))?;

    match value {
        Value::Array(items) => {
            if items.is_empty() {
                return Err(McpError::InvalidRequest(
                    "Invalid request: empty batch".to_string(),
                ));
            }
            let mut requests = Vec::with_capacity(items.len());
            for item in items {
                if !item.is_object() {
                    return Err(McpError::InvalidRequest(
                        "Invalid request: batch items must be JSON objects".to_string(),
                    ));
                }
                requests.push(request_from_value(item)?);
            }
            Ok(ParsedMessage::Batch(requests))
        }
        Value::Object(_) => Ok(ParsedMessage::Single(request_from_value(value)?)),
        _ => Err(McpError::InvalidRequest(
            "Invalid request: must be JSON object".to_string(),
        )),
    }
}

/// Converts one already-validated JSON object into a request.
fn request_from_value(value: Value) -> Result<JsonRpcRequest, McpError> {
    let Some(obj) = value.as_object() else {
        return Err(McpError::InvalidRequest(
            "Invalid request: must be JSON object".to_string(),
        ));
    };

    if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return Err(McpError::InvalidRequest(
            "Invalid request: jsonrpc must be '2.0'".to_string(),
        ));
    }

    if !obj.contains_key("method") {
        return Err(McpError::InvalidRequest(
            "Invalid request: missing method".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| McpError::InvalidRequest(format!("Invalid request: {e}")))
}
