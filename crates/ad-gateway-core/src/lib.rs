//! # AD Gateway Core
//! 
//! Domain types, the directory client port, and the account gateway service.

pub mod domain;
pub mod ports;
pub mod services;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DirectoryError;
pub use ports::DirectoryClient;
pub use services::DirectoryAccountGateway;
