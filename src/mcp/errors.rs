//! JSON-RPC error codes and the fault-to-error mapping.
//!
//! Every fault raised while handling a request must surface as a well-formed
//! JSON-RPC error rather than crashing the server loop. [`McpError`] is the
//! tagged union of everything that can go wrong during dispatch, and each
//! variant maps to exactly one [`ErrorCode`], so the mapping is total and
//! deterministic.

use thiserror::Error;

use crate::clipboard::ClipboardError;

/// JSON-RPC 2.0 error codes used by this server.
///
/// The first five are the standard reserved codes; the rest live in the
/// application band (-32099..-32000) defined by the MCP convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid JSON was received by the server.
    ParseError,
    /// The JSON sent is not a valid Request object.
    InvalidRequest,
    /// The method does not exist or is not available.
    MethodNotFound,
    /// Invalid method parameters.
    InvalidParams,
    /// Internal JSON-RPC error.
    InternalError,
    /// Generic MCP server error.
    ServerError,
    /// Clipboard operation failed.
    ClipboardError,
    /// Parameter validation failed. Reserved; validation faults are
    /// reported as `InvalidParams` on the live dispatch path.
    ValidationError,
    /// Server not initialized. Reserved; the initialization gate reports
    /// `ServerError` on the live dispatch path.
    InitializationError,
}

impl ErrorCode {
    /// Returns the numeric code for this error.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::ServerError => -32000,
            Self::ClipboardError => -32001,
            Self::ValidationError => -32002,
            Self::InitializationError => -32003,
        }
    }

    /// Returns the default message for this error code.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid Request",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
            Self::ServerError => "Server error",
            Self::ClipboardError => "Clipboard operation failed",
            Self::ValidationError => "Parameter validation failed",
            Self::InitializationError => "Server not initialized",
        }
    }
}

/// A fault raised during request dispatch.
///
/// Carries the human-readable message; [`McpError::code`] supplies the
/// JSON-RPC error code.
#[derive(Error, Debug)]
pub enum McpError {
    /// The input line was not valid JSON.
    #[error("{0}")]
    Parse(String),

    /// The parsed JSON was not a valid JSON-RPC request.
    #[error("{0}")]
    InvalidRequest(String),

    /// No handler exists for the requested method.
    #[error("{0}")]
    MethodNotFound(String),

    /// The request parameters were missing or malformed.
    #[error("{0}")]
    InvalidParams(String),

    /// A request was made before the initialize handshake.
    #[error("{0}")]
    NotInitialized(String),

    /// A clipboard operation failed.
    #[error("Clipboard operation failed: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl McpError {
    /// Returns the JSON-RPC error code for this fault.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Parse(_) => ErrorCode::ParseError,
            Self::InvalidRequest(_) => ErrorCode::InvalidRequest,
            Self::MethodNotFound(_) => ErrorCode::MethodNotFound,
            Self::InvalidParams(_) => ErrorCode::InvalidParams,
            Self::NotInitialized(_) => ErrorCode::ServerError,
            Self::Clipboard(_) => ErrorCode::ClipboardError,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Returns the `(code, message)` pair for the wire.
    ///
    /// Uses the fault's own description when non-empty, else the fixed
    /// default for the code.
    #[must_use]
    pub fn error_parts(&self) -> (i32, String) {
        let code = self.code();
        let message = self.to_string();
        if message.is_empty() {
            (code.code(), code.default_message().to_string())
        } else {
            (code.code(), message)
        }
    }
}
