// ============================================================================
// AD Gateway Core - Authentication Result
// File: crates/ad-gateway-core/src/domain/auth_result.rs
// Description: Bind outcome enumeration and vendor sub-code classifier
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of validating a credential pair against the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthResult {
    UserNotFound,
    InvalidCredentials,
    NotPermittedAtThisTime,
    NotPermittedAtThisWorkstation,
    PasswordExpired,
    AccountDisabled,
    AccountExpired,
    MustResetPassword,
    AccountLocked,
    Authenticated,
}

impl AuthResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthResult::UserNotFound => "user_not_found",
            AuthResult::InvalidCredentials => "invalid_credentials",
            AuthResult::NotPermittedAtThisTime => "not_permitted_at_this_time",
            AuthResult::NotPermittedAtThisWorkstation => "not_permitted_at_this_workstation",
            AuthResult::PasswordExpired => "password_expired",
            AuthResult::AccountDisabled => "account_disabled",
            AuthResult::AccountExpired => "account_expired",
            AuthResult::MustResetPassword => "must_reset_password",
            AuthResult::AccountLocked => "account_locked",
            AuthResult::Authenticated => "authenticated",
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthResult::Authenticated)
    }
}

impl Default for AuthResult {
    fn default() -> Self {
        AuthResult::UserNotFound
    }
}

impl fmt::Display for AuthResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active Directory bind sub-codes as they appear in the server's diagnostic text.
/// The tokens are disjoint, so table order does not matter.
const BIND_ERROR_CODES: [(&str, AuthResult); 9] = [
    ("data 525,", AuthResult::UserNotFound),
    ("data 52e,", AuthResult::InvalidCredentials),
    ("data 530,", AuthResult::NotPermittedAtThisTime),
    ("data 531,", AuthResult::NotPermittedAtThisWorkstation),
    ("data 532,", AuthResult::PasswordExpired),
    ("data 533,", AuthResult::AccountDisabled),
    ("data 701,", AuthResult::AccountExpired),
    ("data 773,", AuthResult::MustResetPassword),
    ("data 775,", AuthResult::AccountLocked),
];

/// Map a rejected bind's diagnostic text to an [`AuthResult`].
///
/// Unknown or missing sub-codes fall back to [`AuthResult::UserNotFound`].
pub fn classify_bind_error(message: &str) -> AuthResult {
    BIND_ERROR_CODES
        .iter()
        .find(|(token, _)| message.contains(token))
        .map(|(_, result)| *result)
        .unwrap_or_default()
}
