//! # AD Gateway Core - Domain Module
//! 
//! Value types produced and consumed by the account gateway.

pub mod auth_result;
pub mod credentials;
pub mod directory_account;
pub mod operation_result;
pub mod user_details;

pub use auth_result::{classify_bind_error, AuthResult};
pub use credentials::ElevatedCredentials;
pub use directory_account::DirectoryAccount;
pub use operation_result::{OperationResult, OperationStatus};
pub use user_details::UserDetails;
