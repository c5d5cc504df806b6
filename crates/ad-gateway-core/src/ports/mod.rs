//! Directory client trait (port)

pub mod directory_client;

pub use directory_client::DirectoryClient;

#[cfg(test)]
pub use directory_client::MockDirectoryClient;
