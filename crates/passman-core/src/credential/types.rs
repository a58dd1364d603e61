//! Credential entry type

use zeroize::{Zeroize, ZeroizeOnDrop};

/// One (service, username, password) triple - zeroed when dropped
///
/// `service` is the natural key of the store. All three fields are opaque
/// strings; an empty username means "password only".
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Entry {
    service: String,
    username: String,
    password: String,
}

impl Entry {
    /// Create a new entry
    pub fn new(
        service: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Service name (e.g. "mail")
    pub fn service(&self) -> &str {
        &self.service
    }

    /// User name, possibly empty
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Get the password (use carefully)
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("service", &self.service)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
