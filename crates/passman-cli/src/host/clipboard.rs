//! OS clipboard through the platform's command-line helper
//!
//! The helper is chosen once, when the clipboard is built; the exposure
//! logic only sees the [`Clipboard`] trait.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use passman_core::{Clipboard, Result, VaultError};

/// Clipboard backed by a helper program that reads the new content on stdin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: &'static str,
    args: &'static [&'static str],
    /// Dedicated clear invocation; `None` clears by writing an empty string
    clear_args: Option<&'static [&'static str]>,
}

impl CommandClipboard {
    /// Clipboard for the current platform
    #[cfg(target_os = "macos")]
    pub fn for_host() -> Self {
        Self::pbcopy()
    }

    /// Clipboard for the current platform
    #[cfg(windows)]
    pub fn for_host() -> Self {
        Self::clip()
    }

    /// Clipboard for the current platform
    #[cfg(not(any(target_os = "macos", windows)))]
    pub fn for_host() -> Self {
        if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Self::wl_copy()
        } else {
            Self::xclip()
        }
    }

    pub fn xclip() -> Self {
        Self {
            program: "xclip",
            args: &["-selection", "clipboard"],
            clear_args: None,
        }
    }

    pub fn wl_copy() -> Self {
        Self {
            program: "wl-copy",
            args: &[],
            clear_args: Some(&["--clear"]),
        }
    }

    pub fn pbcopy() -> Self {
        Self {
            program: "pbcopy",
            args: &[],
            clear_args: None,
        }
    }

    pub fn clip() -> Self {
        Self {
            program: "clip",
            args: &[],
            clear_args: None,
        }
    }

    async fn run(&self, args: &[&str], input: &[u8]) -> Result<()> {
        let mut child = Command::new(self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                VaultError::ClipboardError(format!("failed to start {}: {}", self.program, e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A helper that exits early is reported through its exit status
            if let Err(e) = stdin.write_all(input).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
            // Closing stdin tells the helper the content is complete
            drop(stdin);
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(VaultError::ClipboardError(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write(&self, text: &str) -> Result<()> {
        self.run(self.args, text.as_bytes()).await?;
        debug!("Clipboard written via {}", self.program);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match self.clear_args {
            Some(clear_args) => self.run(clear_args, b"").await,
            None => self.run(self.args, b"").await,
        }
    }

    fn backend_name(&self) -> &'static str {
        self.program
    }
}
