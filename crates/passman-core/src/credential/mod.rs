//! Credential entries and the unique-by-service collection that holds them

mod store;
mod types;

pub use store::Store;
pub use types::Entry;
