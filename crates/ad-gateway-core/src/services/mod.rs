//! Domain services

pub mod account_gateway;

pub use account_gateway::{describe_policy_failure, DirectoryAccountGateway};
