//! Console interaction: prompts, hidden input and "press enter" pauses
//!
//! Visible answers and acknowledgments are read line by line from stdin.
//! Secrets go through `rpassword`, which reads the terminal with echo off.

use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines, Stdin};

use passman_core::{Acknowledger, Entry, Result, SecretKind, SecretString, VaultError};

#[cfg(unix)]
type InterruptSignal = tokio::signal::unix::Signal;
#[cfg(windows)]
type InterruptSignal = tokio::signal::windows::CtrlC;

#[cfg(unix)]
fn interrupt_signal() -> std::io::Result<InterruptSignal> {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
}

#[cfg(windows)]
fn interrupt_signal() -> std::io::Result<InterruptSignal> {
    tokio::signal::windows::ctrl_c()
}

/// Interactive console over a line-oriented input
pub struct Console<R = Stdin> {
    lines: Lines<BufReader<R>>,
    /// Registered at the first pause and kept, so a Ctrl-C between pauses
    /// is delivered to the next one
    interrupts: Option<InterruptSignal>,
}

impl Console<Stdin> {
    /// Console reading from the process's stdin
    pub fn new() -> Self {
        Self::with_reader(tokio::io::stdin())
    }
}

impl Default for Console<Stdin> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: AsyncRead + Unpin + Send> Console<R> {
    /// Console reading from an arbitrary input (for testing)
    pub fn with_reader(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            interrupts: None,
        }
    }

    /// Print `prompt` and read one visible line
    ///
    /// End of input before a line is [`VaultError::Interrupted`].
    pub async fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        std::io::stdout().flush()?;

        self.lines.next_line().await?.ok_or(VaultError::Interrupted)
    }

    /// Print `prompt` and read a secret without echo
    pub fn read_secret(&self, prompt: &str) -> Result<SecretString> {
        Ok(SecretString::new(rpassword::prompt_password(prompt)?))
    }

    /// Ask for the username and password of a new entry
    pub async fn read_entry(&mut self, service: &str) -> Result<Entry> {
        println!(
            "Please enter authorization information for {} service.",
            service
        );
        let username = self.read_line("User name : ").await?;
        let password = self.read_secret("Password : ")?;

        Ok(Entry::new(service, username, password.into_inner()))
    }

    /// Print `message` and wait for Enter
    ///
    /// Ctrl-C or end of input is [`VaultError::Interrupted`].
    pub async fn pause(&mut self, message: &str) -> Result<()> {
        println!("{}", message);

        let interrupts = match self.interrupts.take() {
            Some(interrupts) => interrupts,
            None => interrupt_signal()?,
        };
        let interrupts = self.interrupts.insert(interrupts);

        tokio::select! {
            biased;
            line = self.lines.next_line() => match line? {
                Some(_) => Ok(()),
                None => Err(VaultError::Interrupted),
            },
            _ = interrupts.recv() => Err(VaultError::Interrupted),
        }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> Acknowledger for Console<R> {
    async fn acknowledge(&mut self, staged: SecretKind) -> Result<()> {
        let message = match staged {
            SecretKind::Username => "User name is on clipboard ... press enter for password.",
            SecretKind::Password => "Password is on clipboard ... press enter to clear.",
        };
        self.pause(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_line_strips_newline() {
        let mut console = Console::with_reader(&b"alice\r\nbob\n"[..]);

        assert_eq!(console.read_line("User name : ").await.unwrap(), "alice");
        assert_eq!(console.read_line("User name : ").await.unwrap(), "bob");
    }

    #[tokio::test]
    async fn test_read_line_at_eof_is_interrupted() {
        let mut console = Console::with_reader(&b""[..]);

        let result = console.read_line("User name : ").await;
        assert!(matches!(result, Err(VaultError::Interrupted)));
    }

    #[tokio::test]
    async fn test_acknowledge_consumes_one_line_each() {
        let mut console = Console::with_reader(&b"\nanything\n"[..]);

        console.acknowledge(SecretKind::Username).await.unwrap();
        console.acknowledge(SecretKind::Password).await.unwrap();

        let result = console.acknowledge(SecretKind::Password).await;
        assert!(matches!(result, Err(VaultError::Interrupted)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_ctrl_c_between_pauses_interrupts_next_pause() {
        use std::time::Duration;
        use tokio::io::AsyncWriteExt;

        let (mut input, reader) = tokio::io::duplex(64);
        let mut console = Console::with_reader(reader);

        input.write_all(b"\n").await.unwrap();
        console.pause("Press enter to continue.").await.unwrap();

        // Delivered while nothing is waiting on the console
        let status = std::process::Command::new("kill")
            .args(["-INT", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            console.pause("Press enter to continue."),
        )
        .await
        .unwrap();
        assert!(matches!(result, Err(VaultError::Interrupted)));
    }
}
