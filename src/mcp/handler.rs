//! MCP method dispatch and session state.
//!
//! The handler owns the per-process session state: the `initialized` flag
//! set by the `initialize` handshake and the client info it carries. All
//! other methods are gated on that flag. State lives in the handler
//! instance, never in globals, so multiple handlers (e.g. in tests) do not
//! share state.
//!
//! # Lifecycle
//!
//! `UNINITIALIZED` → (`initialize`) → `INITIALIZED`, for the process
//! lifetime. A second `initialize` simply overwrites the recorded client
//! info; it never fails.

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::clipboard::ClipboardBackend;
use crate::mcp::errors::McpError;
use crate::mcp::protocol::{
    JsonRpcReply, JsonRpcRequest, RequestId, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::tools;

/// Error message for requests arriving before the initialize handshake.
const NOT_INITIALIZED: &str = "Server not initialized. Call initialize first.";

/// The MCP protocol handler for clipboard tools.
///
/// Generic over the clipboard backend so tests can substitute an in-memory
/// clipboard for the OS one.
pub struct McpHandler<B: ClipboardBackend> {
    /// Whether the initialize handshake has completed.
    initialized: bool,
    /// Client info recorded from the initialize params, if any.
    client_info: Option<Value>,
    /// Protocol version the client declared, if any.
    client_protocol_version: Option<String>,
    /// The clipboard collaborator.
    backend: B,
}

impl<B: ClipboardBackend> McpHandler<B> {
    /// Creates a handler in the uninitialized state.
    pub fn new(backend: B) -> Self {
        Self {
            initialized: false,
            client_info: None,
            client_protocol_version: None,
            backend,
        }
    }

    /// Returns true once the initialize handshake has completed.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the client info recorded during initialization, if any.
    #[must_use]
    pub const fn client_info(&self) -> Option<&Value> {
        self.client_info.as_ref()
    }

    /// Dispatches one request, returning the reply to write.
    ///
    /// Returns `None` for notifications: they never produce output, though
    /// their side effects (e.g. an id-less `initialize` flipping the state)
    /// still happen.
    pub fn handle_request(&mut self, req: &JsonRpcRequest) -> Option<JsonRpcReply> {
        let result = match req.method.as_str() {
            "initialize" => Ok(self.handle_initialize(req.params.as_ref())),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(req.params.as_ref()),
            "$/ping" => {
                debug!("Received ping");
                return None;
            }
            method => {
                if req.is_notification() {
                    debug!(method, "Ignoring unknown notification");
                    return None;
                }
                Err(McpError::MethodNotFound(format!(
                    "Method not found: {method}"
                )))
            }
        };

        let id = req.id.clone()?;
        Some(Self::reply_for(id, result))
    }

    /// Converts a dispatch outcome into a wire reply.
    fn reply_for(id: RequestId, result: Result<Value, McpError>) -> JsonRpcReply {
        match result {
            Ok(value) => JsonRpcReply::success(id, value),
            Err(fault) => JsonRpcReply::error(Some(id), &fault),
        }
    }

    /// Handles `initialize`: records client info and opens the gate.
    ///
    /// Always succeeds; calling it twice just overwrites the recorded state.
    fn handle_initialize(&mut self, params: Option<&Value>) -> Value {
        if let Some(params) = params {
            self.client_info = params.get("clientInfo").cloned();
            self.client_protocol_version = params
                .get("protocolVersion")
                .and_then(Value::as_str)
                .map(String::from);
        }

        info!(
            client = ?self.client_info,
            protocol_version = self.client_protocol_version.as_deref(),
            "Initialize handshake complete"
        );
        self.initialized = true;

        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": {
                "tools": {}
            }
        })
    }

    /// Handles `tools/list`.
    fn handle_tools_list(&self) -> Result<Value, McpError> {
        self.require_initialized()?;
        debug!("Listing tools");
        Ok(json!({ "tools": tools::definitions() }))
    }

    /// Handles `tools/call`: shape checks, schema validation, execution.
    fn handle_tools_call(&mut self, params: Option<&Value>) -> Result<Value, McpError> {
        self.require_initialized()?;

        let params = params.ok_or_else(|| {
            McpError::InvalidParams("Missing parameters for tool call".to_string())
        })?;

        let name = params
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| McpError::InvalidParams("Missing 'name' parameter".to_string()))?;

        if !tools::exists(name) {
            warn!(tool = name, "Unknown tool requested");
            return Err(McpError::InvalidParams(format!("Unknown tool: {name}")));
        }

        let arguments = params.get("arguments");
        tools::validate_arguments(name, arguments)?;

        info!(tool = name, "Executing tool");
        match name {
            tools::GET_CLIPBOARD => {
                let content = self.backend.read()?;
                debug!(characters = content.chars().count(), "Clipboard read");
                text_content(content)
            }
            tools::SET_CLIPBOARD => {
                // validate_arguments guarantees a string "text" argument
                let text = arguments
                    .and_then(|args| args.get("text"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        McpError::InvalidParams("set_clipboard requires 'text' parameter".to_string())
                    })?;

                self.backend.write(text)?;
                let characters = text.chars().count();
                debug!(characters, "Clipboard written");
                text_content(format!(
                    "Successfully copied {characters} characters to clipboard"
                ))
            }
            _ => Err(McpError::InvalidParams(format!("Unknown tool: {name}"))),
        }
    }

    /// Ensures the initialize handshake has completed.
    fn require_initialized(&self) -> Result<(), McpError> {
        if self.initialized {
            Ok(())
        } else {
            warn!("Request received before initialization");
            Err(McpError::NotInitialized(NOT_INITIALIZED.to_string()))
        }
    }
}

/// Wraps text in the MCP tool-result content envelope.
fn text_content(text: impl Into<String>) -> Result<Value, McpError> {
    serde_json::to_value(tools::ToolCallResult::text(text))
        .map_err(|e| McpError::Internal(format!("Failed to serialise tool result: {e}")))
}
