//! Host capabilities consumed by the vault core

mod clipboard;
mod processes;

pub use clipboard::CommandClipboard;
pub use processes::list_process_names;
