//! Service-account credentials used to authorise directory queries

use secrecy::{ExposeSecret, Secret};

/// The elevated identity a directory call runs under.
///
/// Distinct from the end-user credentials being checked. The gateway owns one
/// and hands it to the directory client on every call, so nothing is held
/// between calls.
#[derive(Debug, Clone)]
pub struct ElevatedCredentials {
    bind_dn: String,
    password: Secret<String>,
}

impl ElevatedCredentials {
    pub fn new(bind_dn: impl Into<String>, password: Secret<String>) -> Self {
        Self {
            bind_dn: bind_dn.into(),
            password,
        }
    }

    pub fn bind_dn(&self) -> &str {
        &self.bind_dn
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}
