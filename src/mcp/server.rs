//! MCP server main loop.
//!
//! Owns the process-wide read/dispatch/write cycle: one line is fully
//! parsed, dispatched, and answered before the next is read, so responses
//! are emitted in request order. A bad line produces one error response
//! with a null id and the loop continues; only EOF or a shutdown signal
//! ends it.

use tracing::{debug, info};

use crate::clipboard::{ClipboardBackend, OsClipboard};
use crate::config::ClipboardConfig;
use crate::mcp::handler::McpHandler;
use crate::mcp::protocol::{parse_line, JsonRpcReply, ParsedMessage};
use crate::mcp::transport::StdioTransport;

/// Outcome of dispatching one input line.
#[derive(Debug)]
pub enum LineOutcome {
    /// Nothing to write (blank line, notification, all-notification batch).
    Silent,
    /// One reply line.
    Single(JsonRpcReply),
    /// One reply line holding a JSON array.
    Batch(Vec<JsonRpcReply>),
}

/// Parses and dispatches one input line through the handler.
///
/// This is the whole per-line pipeline minus the transport, kept free of
/// I/O so tests can drive it directly.
pub fn dispatch_line<B: ClipboardBackend>(
    handler: &mut McpHandler<B>,
    line: &str,
) -> LineOutcome {
    if line.trim().is_empty() {
        return LineOutcome::Silent;
    }

    match parse_line(line) {
        Ok(ParsedMessage::Single(request)) => handler
            .handle_request(&request)
            .map_or(LineOutcome::Silent, LineOutcome::Single),
        Ok(ParsedMessage::Batch(requests)) => {
            let replies: Vec<JsonRpcReply> = requests
                .iter()
                .filter_map(|request| handler.handle_request(request))
                .collect();
            if replies.is_empty() {
                // All-notification batch: nothing is written at all
                LineOutcome::Silent
            } else {
                LineOutcome::Batch(replies)
            }
        }
        Err(fault) => {
            debug!(error = %fault, "Failed to parse input line");
            LineOutcome::Single(JsonRpcReply::error(None, &fault))
        }
    }
}

/// The MCP clipboard server.
pub struct McpServer<B: ClipboardBackend> {
    /// The transport layer.
    transport: StdioTransport,
    /// The protocol handler with its session state.
    handler: McpHandler<B>,
}

impl McpServer<OsClipboard> {
    /// Creates a server backed by the OS clipboard.
    #[must_use]
    pub fn new(clipboard_config: &ClipboardConfig) -> Self {
        Self::with_backend(OsClipboard::new(clipboard_config))
    }
}

impl<B: ClipboardBackend> McpServer<B> {
    /// Creates a server with an explicit clipboard backend.
    #[must_use]
    pub fn with_backend(backend: B) -> Self {
        Self {
            transport: StdioTransport::new(),
            handler: McpHandler::new(backend),
        }
    }

    /// Runs the MCP server main loop with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> std::io::Result<()> {
        self.run_with_shutdown().await
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(std::io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(std::io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, initiating graceful shutdown");
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    info!("Received SIGTERM, initiating graceful shutdown");
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result(
        &mut self,
        line_result: std::io::Result<Option<String>>,
    ) -> std::io::Result<bool> {
        let Some(line) = line_result? else {
            info!("Received EOF, shutting down");
            return Ok(true);
        };

        match dispatch_line(&mut self.handler, &line) {
            LineOutcome::Silent => {}
            LineOutcome::Single(reply) => self.transport.write_reply(&reply).await?,
            LineOutcome::Batch(replies) => self.transport.write_batch(&replies).await?,
        }

        Ok(false)
    }
}
