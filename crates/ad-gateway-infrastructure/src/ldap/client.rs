// ============================================================================
// AD Gateway Infrastructure - LDAP Directory Client
// File: crates/ad-gateway-infrastructure/src/ldap/client.rs
// ============================================================================

use async_trait::async_trait;
use ldap3::{Ldap, LdapError, LdapResult, Scope, SearchEntry};
use tracing::{debug, error, info, instrument, warn};

use ad_gateway_core::{DirectoryAccount, DirectoryClient, DirectoryError, ElevatedCredentials};
use ad_gateway_shared::utils::mask_username;
use ad_gateway_shared::DirectorySettings;

use super::attributes::{account_attributes, account_from_entry};
use super::connection::LdapConnector;
use super::filter::user_filter;
use super::password::password_change_mods;

/// LDAP result codes (RFC 4511 appendix A) the adapter distinguishes.
pub mod rc {
    pub const SUCCESS: u32 = 0;
    pub const CONSTRAINT_VIOLATION: u32 = 19;
    pub const NO_SUCH_OBJECT: u32 = 32;
    pub const INVALID_CREDENTIALS: u32 = 49;
    pub const UNWILLING_TO_PERFORM: u32 = 53;
}

/// Active Directory client over `ldap3`.
///
/// Each call opens its own connection. Lookups and password changes bind as
/// the elevated service account first; the session is unbound before the
/// call returns, on success and on failure.
pub struct LdapDirectoryClient {
    connector: LdapConnector,
    base_dn: String,
    login_attribute: String,
}

impl LdapDirectoryClient {
    pub fn new(settings: &DirectorySettings) -> Self {
        Self {
            connector: LdapConnector::from_settings(settings),
            base_dn: settings.base_dn.clone(),
            login_attribute: settings.login_attribute.clone(),
        }
    }

    async fn open_service_session(
        &self,
        credentials: &ElevatedCredentials,
    ) -> Result<Ldap, DirectoryError> {
        let mut ldap = self.connector.connect().await?;

        debug!("Binding service account: {}", credentials.bind_dn());
        let bound = ldap
            .with_timeout(self.connector.operation_timeout())
            .simple_bind(credentials.bind_dn(), credentials.password())
            .await;

        let outcome = bound
            .map_err(|e| map_ldap_error("service bind", e))
            .and_then(service_bind_outcome);

        if let Err(e) = outcome {
            close_session(ldap).await;
            return Err(e);
        }
        Ok(ldap)
    }

    async fn search_account(
        &self,
        ldap: &mut Ldap,
        username: &str,
    ) -> Result<Option<DirectoryAccount>, DirectoryError> {
        let filter = user_filter(&self.login_attribute, username);
        let attrs = account_attributes(&self.login_attribute);

        let (entries, _res) = ldap
            .with_timeout(self.connector.operation_timeout())
            .search(&self.base_dn, Scope::Subtree, &filter, attrs)
            .await
            .map_err(|e| map_ldap_error("account search", e))?
            .success()
            .map_err(|e| map_ldap_error("account search", e))?;

        if entries.len() > 1 {
            warn!(
                "{} entries match {}, using the first",
                entries.len(),
                mask_username(username)
            );
        }

        entries
            .into_iter()
            .next()
            .map(|entry| account_from_entry(&SearchEntry::construct(entry), &self.login_attribute))
            .transpose()
    }
}

#[async_trait]
impl DirectoryClient for LdapDirectoryClient {
    #[instrument(skip_all)]
    async fn find_account(
        &self,
        credentials: &ElevatedCredentials,
        username: &str,
    ) -> Result<Option<DirectoryAccount>, DirectoryError> {
        let mut ldap = self.open_service_session(credentials).await?;
        let result = self.search_account(&mut ldap, username).await;
        close_session(ldap).await;
        result
    }

    #[instrument(skip_all, fields(dn = %account.distinguished_name))]
    async fn bind(&self, account: &DirectoryAccount, password: &str) -> Result<(), DirectoryError> {
        if password.is_empty() {
            return Err(DirectoryError::Operation("refusing unauthenticated bind".to_string()));
        }

        let mut ldap = self.connector.connect().await?;
        let bound = ldap
            .with_timeout(self.connector.operation_timeout())
            .simple_bind(&account.distinguished_name, password)
            .await;
        close_session(ldap).await;

        bound
            .map_err(|e| map_ldap_error("user bind", e))
            .and_then(user_bind_outcome)
    }

    #[instrument(skip_all, fields(dn = %account.distinguished_name))]
    async fn change_password(
        &self,
        credentials: &ElevatedCredentials,
        account: &DirectoryAccount,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DirectoryError> {
        if !self.connector.is_secure() {
            return Err(DirectoryError::InsecureTransport(
                "password changes require LDAPS or StartTLS".to_string(),
            ));
        }
        let mods = password_change_mods(current_password, new_password)?;

        let mut ldap = self.open_service_session(credentials).await?;
        let modified = ldap
            .with_timeout(self.connector.operation_timeout())
            .modify(account.distinguished_name.as_str(), mods)
            .await;
        close_session(ldap).await;

        let outcome = modified
            .map_err(|e| map_ldap_error("password modify", e))
            .and_then(|res| modify_outcome(&account.distinguished_name, res));

        if outcome.is_ok() {
            info!("unicodePwd updated");
        }
        outcome
    }
}

async fn close_session(mut ldap: Ldap) {
    if let Err(e) = ldap.unbind().await {
        debug!("LDAP unbind failed: {}", e);
    }
}

fn map_ldap_error(operation: &str, e: LdapError) -> DirectoryError {
    match e {
        LdapError::Io { .. } | LdapError::Timeout { .. } | LdapError::EndOfStream => {
            error!("LDAP {} failed: {}", operation, e);
            DirectoryError::Unavailable(format!("{}: {}", operation, e))
        }
        other => DirectoryError::Operation(format!("{}: {}", operation, other)),
    }
}

fn service_bind_outcome(result: LdapResult) -> Result<(), DirectoryError> {
    match result.rc {
        rc::SUCCESS => Ok(()),
        rc::INVALID_CREDENTIALS => {
            error!("Service account bind rejected: {}", result.text);
            Err(DirectoryError::ServiceBind(result.text))
        }
        code => Err(DirectoryError::Operation(format!(
            "service bind failed with code {}: {}",
            code, result.text
        ))),
    }
}

/// AD reports every rejected user bind as invalidCredentials; the reason is the
/// `data NNN,` sub-code inside the diagnostic text.
fn user_bind_outcome(result: LdapResult) -> Result<(), DirectoryError> {
    match result.rc {
        rc::SUCCESS => Ok(()),
        rc::INVALID_CREDENTIALS => Err(DirectoryError::BindRejected {
            code: result.rc,
            message: result.text,
        }),
        code => Err(DirectoryError::Operation(format!(
            "user bind failed with code {}: {}",
            code, result.text
        ))),
    }
}

fn modify_outcome(dn: &str, result: LdapResult) -> Result<(), DirectoryError> {
    match result.rc {
        rc::SUCCESS => Ok(()),
        rc::CONSTRAINT_VIOLATION | rc::UNWILLING_TO_PERFORM => {
            Err(DirectoryError::PasswordPolicy(result.text))
        }
        rc::NO_SUCH_OBJECT => Err(DirectoryError::NotFound(dn.to_string())),
        code => Err(DirectoryError::Operation(format!(
            "password modify failed with code {}: {}",
            code, result.text
        ))),
    }
}
