//! Clipboard backends.
//!
//! The protocol core treats the clipboard as an external collaborator behind
//! the [`ClipboardBackend`] trait. Two implementations are provided:
//!
//! - [`OsClipboard`] shells out to the platform clipboard utility
//!   (pbcopy/pbpaste, clip.exe/Get-Clipboard, wl-copy/wl-paste, xclip/xsel)
//! - [`MemoryClipboard`] holds an in-memory buffer, for tests
//!
//! # Read/write asymmetry
//!
//! Reads never fail from the caller's perspective: any read failure degrades
//! to an empty string (with a warning log), because an empty clipboard and an
//! unreadable clipboard are equally useless to the client and an error would
//! just break the tool call. Writes are user-visible commitments and must be
//! truthfully reported, so write failures surface as [`ClipboardError`] with
//! a platform-specific hint attached.

pub mod platform;

use std::io::Write as _;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ClipboardConfig;

pub use platform::Platform;

/// Errors that can occur during clipboard operations.
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Writing to the system clipboard failed.
    #[error("failed to write to clipboard on {platform}: {detail}. Solution: {hint}")]
    WriteFailed {
        /// Human-readable platform label.
        platform: &'static str,
        /// Raw failure text from the OS utility.
        detail: String,
        /// Platform-specific guidance for the user.
        hint: String,
    },

    /// Reading the system clipboard failed.
    #[error("failed to read clipboard on {platform}: {detail}. Solution: {hint}")]
    ReadFailed {
        /// Human-readable platform label.
        platform: &'static str,
        /// Raw failure text from the OS utility.
        detail: String,
        /// Platform-specific guidance for the user.
        hint: String,
    },

    /// No clipboard utility is available on this platform.
    #[error("no clipboard utility available on {platform}. {hint}")]
    NoUtility {
        /// Human-readable platform label.
        platform: &'static str,
        /// Platform-specific guidance for the user.
        hint: String,
    },
}

/// A clipboard the server can read from and write to.
///
/// Implementations must be lossless for any valid UTF-8 text up to the
/// protocol size limit.
pub trait ClipboardBackend {
    /// Returns the current clipboard contents.
    ///
    /// # Errors
    ///
    /// Returns an error only for unrecoverable failures. Implementations
    /// backed by the OS clipboard are expected to degrade gracefully and
    /// return an empty string instead.
    fn read(&mut self) -> Result<String, ClipboardError>;

    /// Replaces the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard could not be written.
    fn write(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// A candidate clipboard command: program name plus arguments.
type Utility = (&'static str, &'static [&'static str]);

const PBPASTE: Utility = ("pbpaste", &[]);
const PBCOPY: Utility = ("pbcopy", &[]);
const POWERSHELL_READ: Utility = (
    "powershell",
    &["-NoProfile", "-Command", "Get-Clipboard", "-Raw"],
);
const CLIP_WRITE: Utility = ("clip", &[]);
const WSL_POWERSHELL_READ: Utility = (
    "powershell.exe",
    &["-NoProfile", "-Command", "Get-Clipboard", "-Raw"],
);
const WSL_CLIP_WRITE: Utility = ("clip.exe", &[]);
const XCLIP_READ: Utility = ("xclip", &["-selection", "clipboard", "-o"]);
const XCLIP_WRITE: Utility = ("xclip", &["-selection", "clipboard"]);
const XSEL_READ: Utility = ("xsel", &["--clipboard", "--output"]);
const XSEL_WRITE: Utility = ("xsel", &["--clipboard", "--input"]);
const WL_READ: Utility = ("wl-paste", &["--no-newline"]);
const WL_WRITE: Utility = ("wl-copy", &[]);

/// The system clipboard, accessed through the platform's clipboard utility.
pub struct OsClipboard {
    platform: Platform,
    preferred_utility: Option<String>,
    wayland_fallback: bool,
}

impl OsClipboard {
    /// Creates an OS clipboard backend, detecting the platform once.
    #[must_use]
    pub fn new(config: &ClipboardConfig) -> Self {
        Self {
            platform: Platform::detect(),
            preferred_utility: config.preferred_utility.clone(),
            wayland_fallback: config.wayland_fallback,
        }
    }

    /// Returns the detected platform.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// X11 utilities in preference order.
    fn x11_utilities(&self, read: bool) -> Vec<Utility> {
        let (xclip, xsel) = if read {
            (XCLIP_READ, XSEL_READ)
        } else {
            (XCLIP_WRITE, XSEL_WRITE)
        };
        match self.preferred_utility.as_deref() {
            Some("xsel") => vec![xsel, xclip],
            _ => vec![xclip, xsel],
        }
    }

    /// Candidate commands for a read or write, in preference order.
    fn candidates(&self, read: bool) -> Vec<Utility> {
        match self.platform {
            Platform::MacOs => {
                if read {
                    vec![PBPASTE]
                } else {
                    vec![PBCOPY]
                }
            }
            Platform::Windows => {
                if read {
                    vec![POWERSHELL_READ]
                } else {
                    vec![CLIP_WRITE]
                }
            }
            Platform::Wsl => {
                if read {
                    vec![WSL_POWERSHELL_READ]
                } else {
                    vec![WSL_CLIP_WRITE]
                }
            }
            Platform::LinuxWayland => {
                let mut utilities = if self.wayland_fallback {
                    vec![if read { WL_READ } else { WL_WRITE }]
                } else {
                    Vec::new()
                };
                utilities.extend(self.x11_utilities(read));
                utilities
            }
            Platform::LinuxX11 => self.x11_utilities(read),
            Platform::LinuxHeadless | Platform::Other => Vec::new(),
        }
    }

    /// Runs one read utility and captures its stdout.
    fn run_read(utility: Utility) -> Result<String, String> {
        let (program, args) = utility;
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| format!("{program}: {e}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("{program} exited with {}: {}", output.status, stderr.trim()));
        }

        String::from_utf8(output.stdout).map_err(|_| format!("{program}: output is not UTF-8"))
    }

    /// Runs one write utility, feeding `text` on its stdin.
    fn run_write(utility: Utility, text: &str) -> Result<(), String> {
        let (program, args) = utility;
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("{program}: {e}"))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| format!("{program}: failed to write stdin: {e}"))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| format!("{program}: {e}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("{program} exited with {}: {}", output.status, stderr.trim()));
        }

        Ok(())
    }

    /// Strips the trailing line terminator PowerShell appends to clipboard output.
    fn normalise(&self, mut content: String) -> String {
        if matches!(self.platform, Platform::Windows | Platform::Wsl) && content.ends_with('\n') {
            content.pop();
            if content.ends_with('\r') {
                content.pop();
            }
        }
        content
    }
}

impl ClipboardBackend for OsClipboard {
    /// Reads the clipboard, degrading to an empty string on failure.
    fn read(&mut self) -> Result<String, ClipboardError> {
        let candidates = self.candidates(true);
        if candidates.is_empty() {
            warn!(
                platform = self.platform.label(),
                "No clipboard utility available, returning empty string"
            );
            return Ok(String::new());
        }

        let mut last_error = String::new();
        for utility in candidates {
            match Self::run_read(utility) {
                Ok(content) => {
                    let content = self.normalise(content);
                    debug!(characters = content.chars().count(), "Read clipboard");
                    return Ok(content);
                }
                Err(detail) => last_error = detail,
            }
        }

        warn!(
            platform = self.platform.label(),
            error = %last_error,
            "Clipboard read failed, returning empty string"
        );
        Ok(String::new())
    }

    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        let candidates = self.candidates(false);
        if candidates.is_empty() {
            return Err(ClipboardError::NoUtility {
                platform: self.platform.label(),
                hint: self.platform.guidance(""),
            });
        }

        let mut last_error = String::new();
        for utility in candidates {
            match Self::run_write(utility, text) {
                Ok(()) => {
                    debug!(characters = text.chars().count(), "Wrote clipboard");
                    return Ok(());
                }
                Err(detail) => last_error = detail,
            }
        }

        Err(ClipboardError::WriteFailed {
            platform: self.platform.label(),
            hint: self.platform.guidance(&last_error),
            detail: last_error,
        })
    }
}

/// An in-memory clipboard for tests and sandboxed environments.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: String,
}

impl MemoryClipboard {
    /// Creates an empty in-memory clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn read(&mut self) -> Result<String, ClipboardError> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = text.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_round_trip() {
        let mut clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.read().unwrap(), "");

        clipboard.write("héllo wörld").unwrap();
        assert_eq!(clipboard.read().unwrap(), "héllo wörld");

        clipboard.write("").unwrap();
        assert_eq!(clipboard.read().unwrap(), "");
    }

    #[test]
    fn write_error_includes_hint() {
        let error = ClipboardError::WriteFailed {
            platform: "Linux",
            detail: "xclip: command not found".to_string(),
            hint: "Install xclip".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("xclip: command not found"));
        assert!(msg.contains("Solution: Install xclip"));
    }

    #[test]
    fn preferred_utility_reorders_candidates() {
        let config = ClipboardConfig {
            preferred_utility: Some("xsel".to_string()),
            wayland_fallback: true,
        };
        let clipboard = OsClipboard {
            platform: Platform::LinuxX11,
            preferred_utility: config.preferred_utility.clone(),
            wayland_fallback: config.wayland_fallback,
        };
        let candidates = clipboard.candidates(true);
        assert_eq!(candidates[0].0, "xsel");
        assert_eq!(candidates[1].0, "xclip");
    }

    #[test]
    fn wayland_fallback_disabled_skips_wl_clipboard() {
        let clipboard = OsClipboard {
            platform: Platform::LinuxWayland,
            preferred_utility: None,
            wayland_fallback: false,
        };
        let candidates = clipboard.candidates(false);
        assert!(candidates.iter().all(|(program, _)| *program != "wl-copy"));
    }

    #[test]
    fn headless_write_fails_with_no_utility() {
        let mut clipboard = OsClipboard {
            platform: Platform::LinuxHeadless,
            preferred_utility: None,
            wayland_fallback: true,
        };
        let error = clipboard.write("text").unwrap_err();
        assert!(matches!(error, ClipboardError::NoUtility { .. }));
    }

    #[test]
    fn headless_read_degrades_to_empty() {
        let mut clipboard = OsClipboard {
            platform: Platform::LinuxHeadless,
            preferred_utility: None,
            wayland_fallback: true,
        };
        assert_eq!(clipboard.read().unwrap(), "");
    }
}
