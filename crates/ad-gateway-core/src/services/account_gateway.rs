// ============================================================================
// AD Gateway Core - Directory Account Gateway
// File: crates/ad-gateway-core/src/services/account_gateway.rs
// ============================================================================
//! Account lookup, credential validation and password change over a directory client

use std::sync::Arc;
use chrono::Utc;
use tracing::{debug, info, warn};

use ad_gateway_shared::utils::mask_username;

use crate::domain::{
    classify_bind_error, AuthResult, ElevatedCredentials, OperationResult, UserDetails,
};
use crate::error::DirectoryError;
use crate::ports::DirectoryClient;

pub const PASSWORD_CHANGED_MESSAGE: &str = "password successfully changed.";
pub const PASSWORD_POLICY_MESSAGE: &str =
    "The new password does not meet the password policy requirements (length, complexity or history).";
pub const USERNAME_REQUIRED_MESSAGE: &str = "username is required";
pub const PASSWORDS_REQUIRED_MESSAGE: &str = "current and new password are required";
pub const DIRECTORY_UNAVAILABLE_MESSAGE: &str = "directory service is unavailable";
pub const INSECURE_TRANSPORT_MESSAGE: &str =
    "password changes require a secure (LDAPS/StartTLS) connection";
pub const PASSWORD_CHANGE_FAILED_MESSAGE: &str = "password change failed";

/// Vendor codes meaning "new password violates policy": the COM HRESULT form
/// and the Win32 form AD puts in LDAP diagnostic text.
const CONSTRAINT_VIOLATION_CODES: [&str; 2] = ["0x800708C5", "0000052D"];

/// Turn a raw policy rejection into the message handed back to callers.
pub fn describe_policy_failure(raw: &str) -> String {
    let upper = raw.to_ascii_uppercase();
    if CONSTRAINT_VIOLATION_CODES
        .iter()
        .any(|code| upper.contains(&code.to_ascii_uppercase()))
    {
        PASSWORD_POLICY_MESSAGE.to_string()
    } else {
        raw.to_string()
    }
}

fn change_failure_message(error: &DirectoryError) -> &'static str {
    match error {
        DirectoryError::Unavailable(_) => DIRECTORY_UNAVAILABLE_MESSAGE,
        DirectoryError::InsecureTransport(_) => INSECURE_TRANSPORT_MESSAGE,
        _ => PASSWORD_CHANGE_FAILED_MESSAGE,
    }
}

/// Gateway over a [`DirectoryClient`]. No call returns an error: every failure
/// is folded into the result type.
pub struct DirectoryAccountGateway<D: DirectoryClient> {
    directory: Arc<D>,
    credentials: ElevatedCredentials,
}

impl<D: DirectoryClient> DirectoryAccountGateway<D> {
    pub fn new(directory: Arc<D>, credentials: ElevatedCredentials) -> Self {
        Self {
            directory,
            credentials,
        }
    }

    /// Snapshot of the account's state.
    ///
    /// `None` means no query was made (empty username). A missing account and
    /// an unreachable directory both yield [`UserDetails::absent`].
    pub async fn get_user_details(&self, username: &str) -> Option<UserDetails> {
        let username = username.trim();
        if username.is_empty() {
            return None;
        }
        let masked = mask_username(username);
        debug!("Looking up user details for: {}", masked);

        let details = match self.directory.find_account(&self.credentials, username).await {
            Ok(Some(account)) => UserDetails::from_account(&account, Utc::now()),
            Ok(None) => {
                info!("User not found: {}", masked);
                UserDetails::absent()
            }
            Err(e) => {
                warn!("User details lookup failed for {}: {}", masked, e);
                UserDetails::absent()
            }
        };

        Some(details)
    }

    /// Validate a credential pair.
    ///
    /// An empty password yields [`AuthResult::InvalidCredentials`] before any
    /// lookup, so an unknown user with an empty password is not `UserNotFound`.
    pub async fn get_user_status(&self, username: &str, password: &str) -> AuthResult {
        let username = username.trim();
        if username.is_empty() {
            return AuthResult::UserNotFound;
        }
        let masked = mask_username(username);

        // An empty simple-bind password is an anonymous bind, which the server accepts.
        if password.is_empty() {
            warn!("Rejected empty password for: {}", masked);
            return AuthResult::InvalidCredentials;
        }

        let account = match self.directory.find_account(&self.credentials, username).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                info!("Authentication failed: user not found: {}", masked);
                return AuthResult::UserNotFound;
            }
            Err(e) => {
                warn!("Authentication lookup failed for {}: {}", masked, e);
                return AuthResult::UserNotFound;
            }
        };

        let status = match self.directory.bind(&account, password).await {
            Ok(()) => AuthResult::Authenticated,
            Err(DirectoryError::BindRejected { message, .. }) => classify_bind_error(&message),
            Err(e) => {
                warn!("Bind failed for {}: {}", masked, e);
                AuthResult::UserNotFound
            }
        };

        info!("Authentication result for {}: {}", masked, status);
        status
    }

    /// Change the account's password from `current_password` to `new_password`.
    pub async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> OperationResult {
        let username = username.trim();
        if username.is_empty() {
            return OperationResult::error(USERNAME_REQUIRED_MESSAGE);
        }
        if current_password.is_empty() || new_password.is_empty() {
            return OperationResult::error(PASSWORDS_REQUIRED_MESSAGE);
        }
        let masked = mask_username(username);
        info!("Password change requested for: {}", masked);

        let account = match self.directory.find_account(&self.credentials, username).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                warn!("Password change failed: user not found: {}", masked);
                return OperationResult::error(format!("{} not found", username));
            }
            Err(e) => {
                warn!("Password change lookup failed for {}: {}", masked, e);
                return OperationResult::error(change_failure_message(&e));
            }
        };

        match self
            .directory
            .change_password(&self.credentials, &account, current_password, new_password)
            .await
        {
            Ok(()) => {
                info!("Password changed for: {}", masked);
                OperationResult::success(PASSWORD_CHANGED_MESSAGE)
            }
            Err(DirectoryError::PasswordPolicy(raw)) => {
                warn!("Password change rejected by policy for {}: {}", masked, raw);
                OperationResult::error(describe_policy_failure(&raw))
            }
            Err(DirectoryError::NotFound(_)) => {
                warn!("Password change failed: entry vanished for: {}", masked);
                OperationResult::error(format!("{} not found", username))
            }
            Err(e) => {
                warn!("Password change failed for {}: {}", masked, e);
                OperationResult::error(change_failure_message(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DirectoryAccount, OperationStatus};
    use crate::ports::MockDirectoryClient;
    use chrono::Duration;
    use secrecy::Secret;

    fn credentials() -> ElevatedCredentials {
        ElevatedCredentials::new(
            "CN=svc-gateway,OU=Service,DC=corp,DC=example,DC=com",
            Secret::new("s3rvice!".to_string()),
        )
    }

    fn jdoe() -> DirectoryAccount {
        DirectoryAccount {
            distinguished_name: "CN=Jane Doe,OU=Staff,DC=corp,DC=example,DC=com".to_string(),
            login_name: "jdoe".to_string(),
            is_locked: false,
            is_disabled: false,
            password_expires_at: Some(Utc::now() + Duration::days(30)),
            password_never_expires: false,
            password_last_set: Some(Utc::now() - Duration::days(60)),
        }
    }

    fn gateway(mock: MockDirectoryClient) -> DirectoryAccountGateway<MockDirectoryClient> {
        DirectoryAccountGateway::new(Arc::new(mock), credentials())
    }

    fn finds_jdoe(mock: &mut MockDirectoryClient) {
        mock.expect_find_account().returning(|creds, username| {
            assert_eq!(creds.bind_dn(), "CN=svc-gateway,OU=Service,DC=corp,DC=example,DC=com");
            Ok((username == "jdoe").then(jdoe))
        });
    }

    // --- get_user_details ---

    #[tokio::test]
    async fn test_details_empty_username_skips_directory() {
        let mut mock = MockDirectoryClient::new();
        mock.expect_find_account().never();
        let gw = gateway(mock);

        assert!(gw.get_user_details("").await.is_none());
        assert!(gw.get_user_details("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_details_for_existing_user() {
        let mut mock = MockDirectoryClient::new();
        finds_jdoe(&mut mock);

        let details = gateway(mock).get_user_details("jdoe").await.unwrap();
        assert!(details.is_user_exist);
        assert!(details.is_account_active);
        assert!(!details.has_password_expired);
        assert!(!details.force_change_password);
    }

    #[tokio::test]
    async fn test_details_for_missing_user() {
        let mut mock = MockDirectoryClient::new();
        finds_jdoe(&mut mock);

        let details = gateway(mock).get_user_details("ghost123").await.unwrap();
        assert!(!details.is_user_exist);
        assert!(!details.is_account_active);
        assert!(details.has_password_expired);
    }

    #[tokio::test]
    async fn test_details_when_directory_unreachable() {
        let mut mock = MockDirectoryClient::new();
        mock.expect_find_account()
            .returning(|_, _| Err(DirectoryError::Unavailable("connection refused".to_string())));

        let details = gateway(mock).get_user_details("jdoe").await.unwrap();
        assert!(!details.is_account_active);
        assert_eq!(details, UserDetails::absent());
    }

    // --- get_user_status ---

    #[tokio::test]
    async fn test_status_empty_username() {
        let mut mock = MockDirectoryClient::new();
        mock.expect_find_account().never();
        mock.expect_bind().never();

        assert_eq!(gateway(mock).get_user_status("", "secret").await, AuthResult::UserNotFound);
    }

    #[tokio::test]
    async fn test_status_empty_password_never_binds() {
        let mut mock = MockDirectoryClient::new();
        mock.expect_find_account().never();
        mock.expect_bind().never();

        assert_eq!(
            gateway(mock).get_user_status("jdoe", "").await,
            AuthResult::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn test_status_missing_user() {
        let mut mock = MockDirectoryClient::new();
        finds_jdoe(&mut mock);
        mock.expect_bind().never();

        assert_eq!(
            gateway(mock).get_user_status("ghost123", "whatever").await,
            AuthResult::UserNotFound
        );
    }

    #[tokio::test]
    async fn test_status_authenticated() {
        let mut mock = MockDirectoryClient::new();
        finds_jdoe(&mut mock);
        mock.expect_bind().times(1).returning(|account, password| {
            assert_eq!(account.login_name, "jdoe");
            assert_eq!(password, "correct horse");
            Ok(())
        });

        assert_eq!(
            gateway(mock).get_user_status("jdoe", "correct horse").await,
            AuthResult::Authenticated
        );
    }

    #[tokio::test]
    async fn test_status_password_expired_from_vendor_text() {
        let mut mock = MockDirectoryClient::new();
        finds_jdoe(&mut mock);
        mock.expect_bind().returning(|_, _| {
            Err(DirectoryError::BindRejected {
                code: 49,
                message: "80090308: LdapErr: DSID-0C09041C, comment: AcceptSecurityContext error, data 532, v4563".to_string(),
            })
        });

        assert_eq!(
            gateway(mock).get_user_status("jdoe", "old-password").await,
            AuthResult::PasswordExpired
        );
    }

    #[tokio::test]
    async fn test_status_locked_account() {
        let mut mock = MockDirectoryClient::new();
        finds_jdoe(&mut mock);
        mock.expect_bind().returning(|_, _| {
            Err(DirectoryError::BindRejected {
                code: 49,
                message: "AcceptSecurityContext error, data 775, v4563".to_string(),
            })
        });

        assert_eq!(
            gateway(mock).get_user_status("jdoe", "guess").await,
            AuthResult::AccountLocked
        );
    }

    #[tokio::test]
    async fn test_status_lookup_failure_hides_as_not_found() {
        let mut mock = MockDirectoryClient::new();
        mock.expect_find_account()
            .returning(|_, _| Err(DirectoryError::ServiceBind("invalid service credentials".to_string())));
        mock.expect_bind().never();

        assert_eq!(
            gateway(mock).get_user_status("jdoe", "secret").await,
            AuthResult::UserNotFound
        );
    }

    #[tokio::test]
    async fn test_status_bind_transport_failure() {
        let mut mock = MockDirectoryClient::new();
        finds_jdoe(&mut mock);
        mock.expect_bind()
            .returning(|_, _| Err(DirectoryError::Unavailable("timed out".to_string())));

        assert_eq!(
            gateway(mock).get_user_status("jdoe", "secret").await,
            AuthResult::UserNotFound
        );
    }

    // --- change_password ---

    #[tokio::test]
    async fn test_change_password_success() {
        let mut mock = MockDirectoryClient::new();
        finds_jdoe(&mut mock);
        mock.expect_change_password()
            .times(1)
            .returning(|_, account, current, new| {
                assert_eq!(account.login_name, "jdoe");
                assert_eq!(current, "Old-Passw0rd");
                assert_eq!(new, "New-Passw0rd!");
                Ok(())
            });

        let result = gateway(mock)
            .change_password("jdoe", "Old-Passw0rd", "New-Passw0rd!")
            .await;
        assert_eq!(result.status, OperationStatus::Success);
        assert_eq!(result.messages.len(), 1);
        assert!(result.messages[0].contains("successfully changed"));
    }

    #[tokio::test]
    async fn test_change_password_missing_user() {
        let mut mock = MockDirectoryClient::new();
        finds_jdoe(&mut mock);
        mock.expect_change_password().never();

        let result = gateway(mock).change_password("ghost123", "a", "b").await;
        assert_eq!(result.status, OperationStatus::Error);
        assert_eq!(result.messages, vec!["ghost123 not found"]);
    }

    #[tokio::test]
    async fn test_change_password_known_policy_code_is_generic() {
        let mut mock = MockDirectoryClient::new();
        finds_jdoe(&mut mock);
        mock.expect_change_password().returning(|_, _, _, _| {
            Err(DirectoryError::PasswordPolicy(
                "0000052D: SvcErr: DSID-031A12D2, problem 5003 (WILL_NOT_PERFORM), data 0".to_string(),
            ))
        });

        let result = gateway(mock).change_password("jdoe", "old", "short").await;
        assert_eq!(result.status, OperationStatus::Error);
        assert_eq!(result.messages, vec![PASSWORD_POLICY_MESSAGE]);
        assert!(!result.messages[0].contains("0000052D"));
    }

    #[tokio::test]
    async fn test_change_password_other_policy_failure_passes_through() {
        let raw = "00000056: AtrErr: DSID-03190F80, #1: 0: 00000056: problem 1005 (CONSTRAINT_ATT_TYPE), data 0, Att 9005a (unicodePwd)";
        let mut mock = MockDirectoryClient::new();
        finds_jdoe(&mut mock);
        mock.expect_change_password()
            .returning(move |_, _, _, _| Err(DirectoryError::PasswordPolicy(raw.to_string())));

        let result = gateway(mock).change_password("jdoe", "wrong", "New-Passw0rd!").await;
        assert_eq!(result.status, OperationStatus::Error);
        assert_eq!(result.messages, vec![raw]);
    }

    #[tokio::test]
    async fn test_change_password_empty_username_is_explicit_error() {
        let mut mock = MockDirectoryClient::new();
        mock.expect_find_account().never();

        let result = gateway(mock).change_password("", "old", "new").await;
        assert_eq!(result.status, OperationStatus::Error);
        assert_eq!(result.messages, vec![USERNAME_REQUIRED_MESSAGE]);
    }

    #[tokio::test]
    async fn test_change_password_directory_unreachable() {
        let mut mock = MockDirectoryClient::new();
        mock.expect_find_account()
            .returning(|_, _| Err(DirectoryError::Unavailable("no route to host".to_string())));

        let result = gateway(mock).change_password("jdoe", "old", "new").await;
        assert!(!result.is_success());
        assert_eq!(result.messages, vec![DIRECTORY_UNAVAILABLE_MESSAGE]);
    }

    #[tokio::test]
    async fn test_change_password_empty_passwords_is_explicit_error() {
        let mut mock = MockDirectoryClient::new();
        mock.expect_find_account().never();
        mock.expect_change_password().never();
        let gw = gateway(mock);

        for (current, new) in [("", "New-Passw0rd!"), ("Old-Passw0rd", ""), ("", "")] {
            let result = gw.change_password("jdoe", current, new).await;
            assert_eq!(result.status, OperationStatus::Error);
            assert_eq!(result.messages, vec![PASSWORDS_REQUIRED_MESSAGE]);
        }
    }

    #[tokio::test]
    async fn test_change_password_entry_vanished() {
        let mut mock = MockDirectoryClient::new();
        finds_jdoe(&mut mock);
        mock.expect_change_password().times(1).returning(|_, account, _, _| {
            Err(DirectoryError::NotFound(account.distinguished_name.clone()))
        });

        let result = gateway(mock).change_password("jdoe", "old", "new").await;
        assert_eq!(result.status, OperationStatus::Error);
        assert_eq!(result.messages, vec!["jdoe not found"]);
    }

    #[tokio::test]
    async fn test_change_password_over_plain_ldap_is_not_an_outage() {
        let mut mock = MockDirectoryClient::new();
        finds_jdoe(&mut mock);
        mock.expect_change_password().times(1).returning(|_, _, _, _| {
            Err(DirectoryError::InsecureTransport(
                "password changes require LDAPS or StartTLS".to_string(),
            ))
        });

        let result = gateway(mock).change_password("jdoe", "Old1!", "New1!").await;
        assert_eq!(result.status, OperationStatus::Error);
        assert_eq!(result.messages, vec![INSECURE_TRANSPORT_MESSAGE]);
    }

    #[tokio::test]
    async fn test_change_password_other_failures_are_generic() {
        let mut mock = MockDirectoryClient::new();
        finds_jdoe(&mut mock);
        mock.expect_change_password().returning(|_, _, _, _| {
            Err(DirectoryError::Operation("password modify failed with code 50".to_string()))
        });

        let result = gateway(mock).change_password("jdoe", "old", "new").await;
        assert_eq!(result.messages, vec![PASSWORD_CHANGE_FAILED_MESSAGE]);
    }

    #[test]
    fn test_describe_policy_failure() {
        assert_eq!(
            describe_policy_failure("Exception from HRESULT: 0x800708C5"),
            PASSWORD_POLICY_MESSAGE
        );
        assert_eq!(describe_policy_failure("0000052d: SvcErr"), PASSWORD_POLICY_MESSAGE);
        assert_eq!(describe_policy_failure("something else"), "something else");
    }
}
