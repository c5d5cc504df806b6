//! Raw account attributes as read from the directory

use chrono::{DateTime, Utc};

/// One account entry, already decoded from directory attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryAccount {
    pub distinguished_name: String,
    pub login_name: String,
    pub is_locked: bool,
    pub is_disabled: bool,
    /// `None` when the directory computes no expiry for the password.
    pub password_expires_at: Option<DateTime<Utc>>,
    pub password_never_expires: bool,
    /// `None` when the password has never been set (or must be changed at next logon).
    pub password_last_set: Option<DateTime<Utc>>,
}
