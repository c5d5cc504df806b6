// ============================================================================
// AD Gateway Core - User Details
// File: crates/ad-gateway-core/src/domain/user_details.rs
// Description: Point-in-time snapshot of one directory account
// ============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::DirectoryAccount;

/// Account state as seen at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub is_user_exist: bool,
    pub is_account_locked: bool,
    pub is_account_active: bool,
    pub has_password_expired: bool,
    pub password_expiration_date: Option<DateTime<Utc>>,
    pub password_never_expires: bool,
    pub force_change_password: bool,
}

impl UserDetails {
    /// The fail-closed record returned when the account does not exist or the
    /// directory could not be asked.
    pub fn absent() -> Self {
        Self {
            is_user_exist: false,
            is_account_locked: false,
            is_account_active: false,
            has_password_expired: true,
            password_expiration_date: None,
            password_never_expires: false,
            force_change_password: false,
        }
    }

    /// Derive the snapshot for an existing account, evaluated at `now`.
    pub fn from_account(account: &DirectoryAccount, now: DateTime<Utc>) -> Self {
        let has_password_expired = !account.password_never_expires
            && account
                .password_expires_at
                .map_or(false, |expires_at| expires_at <= now);

        let force_change_password =
            account.password_last_set.is_none() && !account.password_never_expires;

        Self {
            is_user_exist: true,
            is_account_locked: account.is_locked,
            is_account_active: !account.is_disabled,
            has_password_expired,
            password_expiration_date: account.password_expires_at,
            password_never_expires: account.password_never_expires,
            force_change_password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn account() -> DirectoryAccount {
        DirectoryAccount {
            distinguished_name: "CN=Jane Doe,OU=Staff,DC=corp,DC=example,DC=com".to_string(),
            login_name: "jdoe".to_string(),
            is_locked: false,
            is_disabled: false,
            password_expires_at: Some(now() + Duration::days(30)),
            password_never_expires: false,
            password_last_set: Some(now() - Duration::days(60)),
        }
    }

    #[test]
    fn test_absent_record_is_fail_closed() {
        let details = UserDetails::absent();
        assert!(!details.is_user_exist);
        assert!(!details.is_account_active);
        assert!(details.has_password_expired);
        assert!(details.password_expiration_date.is_none());
    }

    #[test]
    fn test_healthy_account() {
        let details = UserDetails::from_account(&account(), now());
        assert!(details.is_user_exist);
        assert!(details.is_account_active);
        assert!(!details.is_account_locked);
        assert!(!details.has_password_expired);
        assert!(!details.force_change_password);
        assert_eq!(details.password_expiration_date, Some(now() + Duration::days(30)));
    }

    #[test]
    fn test_expiration_boundary_counts_as_expired() {
        let mut acc = account();
        acc.password_expires_at = Some(now());
        assert!(UserDetails::from_account(&acc, now()).has_password_expired);

        acc.password_expires_at = Some(now() - Duration::seconds(1));
        assert!(UserDetails::from_account(&acc, now()).has_password_expired);
    }

    #[test]
    fn test_never_expires_overrides_past_expiration() {
        let mut acc = account();
        acc.password_expires_at = Some(now() - Duration::days(10));
        acc.password_never_expires = true;

        let details = UserDetails::from_account(&acc, now());
        assert!(!details.has_password_expired);
        assert!(details.password_never_expires);
    }

    #[test]
    fn test_missing_expiration_is_not_expired() {
        let mut acc = account();
        acc.password_expires_at = None;
        assert!(!UserDetails::from_account(&acc, now()).has_password_expired);
    }

    #[test]
    fn test_force_change_password_truth_table() {
        let mut acc = account();

        acc.password_last_set = None;
        acc.password_never_expires = false;
        assert!(UserDetails::from_account(&acc, now()).force_change_password);

        acc.password_never_expires = true;
        assert!(!UserDetails::from_account(&acc, now()).force_change_password);

        acc.password_last_set = Some(now());
        acc.password_never_expires = false;
        assert!(!UserDetails::from_account(&acc, now()).force_change_password);
    }

    #[test]
    fn test_disabled_and_locked_flags() {
        let mut acc = account();
        acc.is_disabled = true;
        acc.is_locked = true;

        let details = UserDetails::from_account(&acc, now());
        assert!(details.is_user_exist);
        assert!(!details.is_account_active);
        assert!(details.is_account_locked);
    }
}
