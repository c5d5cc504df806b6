//! Configuration management

use config::{Config, Environment, File};
use secrecy::Secret;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::constants::{
    DEFAULT_APP_ENV, DEFAULT_APP_NAME, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_LOGIN_ATTRIBUTE,
    DEFAULT_OPERATION_TIMEOUT_SECS, MAX_TIMEOUT_SECS,
};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub directory: DirectorySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub name: String,
}

/// Connection and service-account settings for the Active Directory server.
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct DirectorySettings {
    /// `ldap://host:389` or `ldaps://host:636`
    #[validate(custom(function = "validate_ldap_url"))]
    pub url: String,

    #[validate(length(min = 1, message = "Base DN is required"))]
    pub base_dn: String,

    /// Service account used to search the directory and change passwords.
    #[validate(length(min = 1, message = "Bind DN is required"))]
    pub bind_dn: String,
    pub bind_password: Secret<String>,

    #[validate(length(min = 1, message = "Login attribute is required"))]
    pub login_attribute: String,

    pub use_starttls: bool,
    pub no_tls_verify: bool,

    #[validate(range(min = 1, max = MAX_TIMEOUT_SECS))]
    pub connect_timeout_secs: u64,

    #[validate(range(min = 1, max = MAX_TIMEOUT_SECS))]
    pub operation_timeout_secs: u64,
}

impl DirectorySettings {
    pub fn uses_ldaps(&self) -> bool {
        self.url.to_ascii_lowercase().starts_with("ldaps://")
    }
}

fn validate_ldap_url(url: &str) -> Result<(), ValidationError> {
    let lower = url.to_ascii_lowercase();
    let host = lower
        .strip_prefix("ldaps://")
        .or_else(|| lower.strip_prefix("ldap://"))
        .ok_or_else(|| ValidationError::new("ldap_url_scheme"))?;
    if host.is_empty() {
        return Err(ValidationError::new("ldap_url_host"));
    }
    Ok(())
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_APP_ENV.into());
        let config = Self::with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        Self::from_source(config)
    }

    /// Deserialize and validate an already-built configuration.
    pub fn from_source(config: Config) -> Result<Self, AppError> {
        let app_config: AppConfig = config.try_deserialize()?;
        app_config.directory.validate()?;
        Ok(app_config)
    }

    pub fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, AppError> {
        Ok(builder
            .set_default("app.env", DEFAULT_APP_ENV)?
            .set_default("app.name", DEFAULT_APP_NAME)?
            .set_default("directory.login_attribute", DEFAULT_LOGIN_ATTRIBUTE)?
            .set_default("directory.use_starttls", false)?
            .set_default("directory.no_tls_verify", false)?
            .set_default("directory.connect_timeout_secs", DEFAULT_CONNECT_TIMEOUT_SECS)?
            .set_default("directory.operation_timeout_secs", DEFAULT_OPERATION_TIMEOUT_SECS)?)
    }
}
