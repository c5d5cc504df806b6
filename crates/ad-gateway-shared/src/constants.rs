//! Application-wide constants

pub const DEFAULT_APP_NAME: &str = "ad-gateway";
pub const DEFAULT_APP_ENV: &str = "development";
pub const DEFAULT_LOGIN_ATTRIBUTE: &str = "sAMAccountName";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 10;
pub const MAX_TIMEOUT_SECS: u64 = 300;
