//! Tool catalog and argument validation.
//!
//! The server exposes exactly two tools, registered in a fixed order:
//! `get_clipboard` then `set_clipboard`. Arguments are validated against
//! each tool's schema before the clipboard backend is touched, so a bad
//! call never reaches the OS.

use serde::Serialize;
use serde_json::{json, Value};

use crate::mcp::errors::McpError;

/// Maximum clipboard payload, measured in UTF-8 encoded bytes.
pub const MAX_CLIPBOARD_BYTES: usize = 1024 * 1024;

/// Tool name for reading the clipboard.
pub const GET_CLIPBOARD: &str = "get_clipboard";

/// Tool name for writing the clipboard.
pub const SET_CLIPBOARD: &str = "set_clipboard";

/// A tool definition for the tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
}

impl ToolCallResult {
    /// Creates a single-item text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
        }
    }
}

/// Returns the tool catalog in registration order.
#[must_use]
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: GET_CLIPBOARD,
            description: "Get the current contents of the system clipboard as text. \
                 Returns an empty string if the clipboard is empty or unreadable.",
            input_schema: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: SET_CLIPBOARD,
            description: "Copy the given text to the system clipboard. \
                 The text must not exceed 1 MiB of UTF-8 encoded bytes.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "The text to copy to the clipboard"
                    }
                },
                "required": ["text"],
                "additionalProperties": false
            }),
        },
    ]
}

/// Returns true if `name` is a registered tool.
#[must_use]
pub fn exists(name: &str) -> bool {
    name == GET_CLIPBOARD || name == SET_CLIPBOARD
}

/// Validates call arguments against the named tool's schema.
///
/// # Errors
///
/// Returns [`McpError::InvalidParams`] naming the first violated constraint.
pub fn validate_arguments(name: &str, arguments: Option<&Value>) -> Result<(), McpError> {
    if !exists(name) {
        return Err(McpError::InvalidParams(format!("Unknown tool: {name}")));
    }

    let args = match arguments {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            return Err(McpError::InvalidParams(
                "Tool arguments must be an object".to_string(),
            ))
        }
    };

    match name {
        GET_CLIPBOARD => {
            if args.is_some_and(|map| !map.is_empty()) {
                return Err(McpError::InvalidParams(
                    "get_clipboard does not accept parameters".to_string(),
                ));
            }
            Ok(())
        }
        SET_CLIPBOARD => {
            let Some(map) = args else {
                return Err(McpError::InvalidParams(
                    "set_clipboard requires 'text' parameter".to_string(),
                ));
            };

            let Some(text_value) = map.get("text") else {
                return Err(McpError::InvalidParams(
                    "set_clipboard requires 'text' parameter".to_string(),
                ));
            };

            let Some(text) = text_value.as_str() else {
                return Err(McpError::InvalidParams(
                    "'text' parameter must be a string".to_string(),
                ));
            };

            if map.len() > 1 {
                let mut extras: Vec<&str> = map
                    .keys()
                    .filter(|key| key.as_str() != "text")
                    .map(String::as_str)
                    .collect();
                extras.sort_unstable();
                return Err(McpError::InvalidParams(format!(
                    "Unexpected parameters: {extras:?}"
                )));
            }

            if text.len() > MAX_CLIPBOARD_BYTES {
                return Err(McpError::InvalidParams(format!(
                    "'text' parameter exceeds maximum clipboard size of {MAX_CLIPBOARD_BYTES} bytes"
                )));
            }

            Ok(())
        }
        _ => unreachable!("exists() checked above"),
    }
}
