//! clipboard-mcp: MCP server exposing the system clipboard to AI assistants
//!
//! This library implements a minimal Model Context Protocol (MCP) server that
//! lets an LLM-orchestration client read and write the system clipboard as
//! tools (`get_clipboard`, `set_clipboard`). Communication is JSON-RPC 2.0
//! over stdio, one message per line.
//!
//! # Architecture
//!
//! The protocol engine is the interesting part; clipboard access itself is a
//! thin pass-through to an OS clipboard utility:
//!
//! - **Message Codec**: parses single and batch JSON-RPC requests, serialises
//!   responses
//! - **Tool Registry**: the fixed two-tool catalog with argument validation
//! - **Protocol Handler**: `initialize` handshake gate and method dispatch
//! - **Server Loop**: line-oriented read/dispatch/write over stdio
//!
//! # Modules
//!
//! - [`clipboard`]: Clipboard backends and platform diagnosis
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Error types
//! - [`mcp`]: MCP protocol implementation

pub mod clipboard;
pub mod config;
pub mod error;
pub mod mcp;
