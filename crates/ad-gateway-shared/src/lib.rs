//! # AD Gateway Shared
//! 
//! Configuration, telemetry and small utilities shared by the gateway crates.

pub mod constants;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use config::{AppConfig, DirectorySettings};
pub use error::AppError;
