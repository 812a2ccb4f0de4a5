//! Platform detection and failure guidance for clipboard access.
//!
//! Clipboard failures are wildly platform-specific (missing X11 utilities,
//! headless sessions, WSL quirks, sandbox permissions). This module detects
//! the environment once and produces human-readable hints that are embedded
//! into clipboard error messages, so the calling client can show the user
//! something actionable instead of a raw exec failure.

use std::env;

/// The clipboard-relevant platform the server is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// macOS (pbcopy/pbpaste).
    MacOs,
    /// Native Windows (PowerShell Get-Clipboard, clip.exe).
    Windows,
    /// Windows Subsystem for Linux (clip.exe/powershell.exe interop).
    Wsl,
    /// Linux with a Wayland compositor (wl-copy/wl-paste).
    LinuxWayland,
    /// Linux with an X11 display (xclip/xsel).
    LinuxX11,
    /// Linux without any display server.
    LinuxHeadless,
    /// Anything else.
    Other,
}

impl Platform {
    /// Detects the current platform from the target OS and environment.
    #[must_use]
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            return Self::MacOs;
        }
        if cfg!(target_os = "windows") {
            return Self::Windows;
        }
        if cfg!(target_os = "linux") {
            return Self::detect_linux();
        }
        Self::Other
    }

    /// Distinguishes WSL, Wayland, X11, and headless Linux.
    fn detect_linux() -> Self {
        // WSL kernels advertise themselves in /proc/version
        if let Ok(version) = std::fs::read_to_string("/proc/version") {
            if version.contains("Microsoft") || version.contains("WSL") {
                return Self::Wsl;
            }
        }
        if env::var_os("WAYLAND_DISPLAY").is_some() {
            return Self::LinuxWayland;
        }
        if env::var_os("DISPLAY").is_some() {
            return Self::LinuxX11;
        }
        Self::LinuxHeadless
    }

    /// Returns a short human-readable label for error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MacOs => "macOS",
            Self::Windows => "Windows",
            Self::Wsl => "WSL (Windows Subsystem for Linux)",
            Self::LinuxWayland => "Linux (Wayland)",
            Self::LinuxX11 => "Linux",
            Self::LinuxHeadless => "Linux (headless)",
            Self::Other => "unsupported platform",
        }
    }

    /// Returns platform-specific guidance for a clipboard failure.
    ///
    /// `detail` is the raw failure text from the OS utility, used to refine
    /// the hint (e.g. a missing-binary error gets install instructions).
    #[must_use]
    pub fn guidance(self, detail: &str) -> String {
        let lower = detail.to_lowercase();
        match self {
            Self::LinuxHeadless => "Clipboard access requires a display server. \
                 On headless Linux systems, clipboard operations are not supported."
                .to_string(),
            Self::LinuxX11 | Self::LinuxWayland => {
                if lower.contains("xclip") || lower.contains("xsel") || lower.contains("wl-") {
                    "Missing clipboard utilities. Install with: \
                     sudo apt-get install xclip xsel wl-clipboard (Ubuntu/Debian) or \
                     sudo yum install xclip xsel (RHEL/CentOS) or \
                     sudo pacman -S xclip xsel wl-clipboard (Arch)"
                        .to_string()
                } else if lower.contains("display") {
                    "No display available. Ensure the DISPLAY environment variable \
                     is set or run in a desktop environment."
                        .to_string()
                } else {
                    format!("Clipboard utility failed on {}", self.label())
                }
            }
            Self::Wsl => "WSL clipboard access may be limited. Try: \
                 1. Use WSL2 with Windows 10 build 19041+ \
                 2. Install the wslu package for clip.exe integration \
                 3. Use Windows Terminal or enable clipboard sharing"
                .to_string(),
            Self::MacOs => "macOS clipboard access failed. This may be due to: \
                 1. Security permissions (check System Preferences > Privacy) \
                 2. Running in a sandboxed environment \
                 3. Insufficient user privileges"
                .to_string(),
            Self::Windows => "Windows clipboard access failed. This may be due to: \
                 1. Another application holding a clipboard lock \
                 2. Insufficient user privileges \
                 3. Antivirus software blocking access"
                .to_string(),
            Self::Other => format!(
                "Platform-specific guidance not available for {}",
                self.label()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_does_not_panic() {
        let platform = Platform::detect();
        assert!(!platform.label().is_empty());
    }

    #[test]
    fn headless_guidance_mentions_display_server() {
        let hint = Platform::LinuxHeadless.guidance("");
        assert!(hint.contains("display server"));
    }

    #[test]
    fn missing_utility_guidance_mentions_install() {
        let hint = Platform::LinuxX11.guidance("xclip: command not found");
        assert!(hint.contains("Install"));
    }

    #[test]
    fn wsl_guidance_mentions_wsl2() {
        let hint = Platform::Wsl.guidance("whatever");
        assert!(hint.contains("WSL2"));
    }

    #[test]
    fn labels_are_distinct() {
        assert_ne!(Platform::LinuxX11.label(), Platform::LinuxHeadless.label());
        assert_ne!(Platform::MacOs.label(), Platform::Windows.label());
    }
}
