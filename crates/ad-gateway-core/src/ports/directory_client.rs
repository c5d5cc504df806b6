//! Directory client trait (port)

use async_trait::async_trait;

use crate::domain::{DirectoryAccount, ElevatedCredentials};
use crate::error::DirectoryError;

/// Capabilities the gateway needs from a directory service.
///
/// Lookups and password changes run under the caller-supplied
/// [`ElevatedCredentials`]; a user bind runs under the user's own pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Find one account by login name. `Ok(None)` when no entry matches.
    async fn find_account(
        &self,
        credentials: &ElevatedCredentials,
        username: &str,
    ) -> Result<Option<DirectoryAccount>, DirectoryError>;

    /// Bind as `account` with `password`. A refused bind is
    /// [`DirectoryError::BindRejected`] carrying the server's diagnostic text.
    async fn bind(&self, account: &DirectoryAccount, password: &str) -> Result<(), DirectoryError>;

    async fn change_password(
        &self,
        credentials: &ElevatedCredentials,
        account: &DirectoryAccount,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DirectoryError>;
}
