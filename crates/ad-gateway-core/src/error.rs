//! Directory errors

use thiserror::Error;

/// Failures reported by a [`DirectoryClient`](crate::ports::DirectoryClient).
///
/// None of these escape the gateway; they are folded into
/// [`AuthResult`](crate::domain::AuthResult), [`UserDetails`](crate::domain::UserDetails)
/// or [`OperationResult`](crate::domain::OperationResult).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    #[error("Service account bind failed: {0}")]
    ServiceBind(String),

    /// The server refused a user bind. `message` carries the diagnostic text,
    /// e.g. `80090308: LdapErr: DSID-0C09041C, comment: AcceptSecurityContext error, data 52e, v4563`.
    #[error("Bind rejected (rc={code}): {message}")]
    BindRejected { code: u32, message: String },

    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Password policy violation: {0}")]
    PasswordPolicy(String),

    /// Refused locally: the connection is neither LDAPS nor StartTLS.
    #[error("Insecure transport: {0}")]
    InsecureTransport(String),

    #[error("Invalid directory entry: {0}")]
    InvalidEntry(String),

    #[error("Directory operation failed: {0}")]
    Operation(String),
}
