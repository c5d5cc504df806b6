//! LDAP connection setup

use std::time::Duration;

use ldap3::{Ldap, LdapConnAsync, LdapConnSettings};
use tracing::{debug, error, warn};

use ad_gateway_core::DirectoryError;
use ad_gateway_shared::DirectorySettings;

/// Opens one LDAP connection per call; nothing is pooled.
#[derive(Debug, Clone)]
pub struct LdapConnector {
    url: String,
    connect_timeout: Duration,
    operation_timeout: Duration,
    use_starttls: bool,
    no_tls_verify: bool,
    secure: bool,
}

impl LdapConnector {
    pub fn from_settings(settings: &DirectorySettings) -> Self {
        Self {
            url: settings.url.clone(),
            connect_timeout: Duration::from_secs(settings.connect_timeout_secs),
            operation_timeout: Duration::from_secs(settings.operation_timeout_secs),
            use_starttls: settings.use_starttls,
            no_tls_verify: settings.no_tls_verify,
            secure: settings.use_starttls || settings.uses_ldaps(),
        }
    }

    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    /// LDAPS or StartTLS. AD refuses `unicodePwd` changes over plain LDAP.
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub async fn connect(&self) -> Result<Ldap, DirectoryError> {
        debug!("Connecting to LDAP server: {}", self.url);

        let settings = LdapConnSettings::new()
            .set_conn_timeout(self.connect_timeout)
            .set_starttls(self.use_starttls)
            .set_no_tls_verify(self.no_tls_verify);

        let (conn, ldap) = LdapConnAsync::with_settings(settings, &self.url)
            .await
            .map_err(|e| {
                error!("LDAP connection to {} failed: {}", self.url, e);
                DirectoryError::Unavailable(format!("connect to {} failed: {}", self.url, e))
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!("LDAP connection driver error: {}", e);
            }
        });

        Ok(ldap)
    }
}
