//! Model Context Protocol (MCP) server implementation.
//!
//! This module implements the MCP convention for exposing clipboard access
//! as tools to AI assistants. The server communicates over stdio transport
//! using JSON-RPC 2.0 messages, one per line.
//!
//! # Architecture
//!
//! ```text
//! input line → protocol (parse) → handler (gate/dispatch/validate)
//!            → clipboard backend → handler (format) → transport (write)
//! ```
//!
//! Strictly sequential: one line is fully answered before the next is read,
//! so response order always matches request order.
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod errors;
pub mod handler;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use errors::{ErrorCode, McpError};
pub use handler::McpHandler;
pub use protocol::{JsonRpcReply, JsonRpcRequest, RequestId, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use transport::StdioTransport;
