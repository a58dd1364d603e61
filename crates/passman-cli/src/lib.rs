//! # passman-cli
//!
//! Host side of the passman vault: console prompts and acknowledgments,
//! the OS clipboard through helper programs, and process enumeration for
//! the clipboard history check.

pub mod console;
pub mod host;

pub use console::Console;
pub use host::{list_process_names, CommandClipboard};
