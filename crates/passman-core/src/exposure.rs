//! Clipboard handoff of a single entry
//!
//! The username (if any) and then the password are placed on the clipboard
//! one at a time. Each step waits for the caller to acknowledge, and the
//! clipboard is cleared on every way out of [`ClipboardExposure::expose`],
//! including when a wait is interrupted.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::credential::Entry;
use crate::error::Result;

/// Which part of an entry is on the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    Username,
    Password,
}

/// What the exposure has currently staged on the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardSession {
    Empty,
    Holding(SecretKind),
}

/// Progress of an exposure run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposurePhase {
    Idle,
    StagingUsername,
    StagingPassword,
    Cleared,
}

/// Platform clipboard mutation
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard content with `text`
    async fn write(&self, text: &str) -> Result<()>;

    /// Remove whatever is on the clipboard
    async fn clear(&self) -> Result<()>;

    /// Get a human-readable name for this clipboard backend
    fn backend_name(&self) -> &'static str;
}

/// Caller-paced "proceed" signal
///
/// Returning an error (typically [`crate::VaultError::Interrupted`]) aborts
/// the exposure; the clipboard is still cleared.
#[async_trait]
pub trait Acknowledger: Send {
    /// Wait until the user is done with the staged secret
    async fn acknowledge(&mut self, staged: SecretKind) -> Result<()>;
}

/// Stateful username/password handoff over a [`Clipboard`]
pub struct ClipboardExposure<'a, C: Clipboard + ?Sized> {
    clipboard: &'a C,
    phase: ExposurePhase,
    session: ClipboardSession,
}

impl<'a, C: Clipboard + ?Sized> ClipboardExposure<'a, C> {
    pub fn new(clipboard: &'a C) -> Self {
        Self {
            clipboard,
            phase: ExposurePhase::Idle,
            session: ClipboardSession::Empty,
        }
    }

    pub fn phase(&self) -> ExposurePhase {
        self.phase
    }

    pub fn session(&self) -> ClipboardSession {
        self.session
    }

    /// Stage the entry's username and password, then clear the clipboard
    ///
    /// An empty username is skipped entirely. If staging fails and the clear
    /// fails too, the staging error is returned and the clear error logged.
    pub async fn expose<A>(&mut self, entry: &Entry, acknowledger: &mut A) -> Result<()>
    where
        A: Acknowledger + ?Sized,
    {
        info!(
            "Exposing credentials for service {} via {}",
            entry.service(),
            self.clipboard.backend_name()
        );

        let staged = self.stage(entry, acknowledger).await;
        let cleared = self.clear().await;

        match (staged, cleared) {
            (Err(e), Err(clear_error)) => {
                warn!("Clipboard clear failed after aborted exposure: {}", clear_error);
                Err(e)
            }
            (Err(e), Ok(())) => {
                debug!("Exposure aborted, clipboard cleared: {}", e);
                Err(e)
            }
            (Ok(()), cleared) => cleared,
        }
    }

    async fn stage<A>(&mut self, entry: &Entry, acknowledger: &mut A) -> Result<()>
    where
        A: Acknowledger + ?Sized,
    {
        if !entry.username().is_empty() {
            self.phase = ExposurePhase::StagingUsername;
            self.clipboard.write(entry.username()).await?;
            self.session = ClipboardSession::Holding(SecretKind::Username);
            acknowledger.acknowledge(SecretKind::Username).await?;
        }

        self.phase = ExposurePhase::StagingPassword;
        self.clipboard.write(entry.password()).await?;
        self.session = ClipboardSession::Holding(SecretKind::Password);
        acknowledger.acknowledge(SecretKind::Password).await
    }

    async fn clear(&mut self) -> Result<()> {
        self.clipboard.clear().await?;
        self.session = ClipboardSession::Empty;
        self.phase = ExposurePhase::Cleared;
        debug!("Clipboard cleared");
        Ok(())
    }
}
