//! Active Directory user attributes and their decoding.
//!
//! Account state is spread over a handful of attributes:
//! - `userAccountControl` bitfield (disabled, never-expires)
//! - `msDS-User-Account-Control-Computed` (lockout, evaluated against the domain lockout duration)
//! - `pwdLastSet` and `msDS-UserPasswordExpiryTimeComputed`, both Windows FILETIME values

use chrono::{DateTime, Utc};
use ldap3::SearchEntry;

use ad_gateway_core::{DirectoryAccount, DirectoryError};

pub const ATTR_SAM_ACCOUNT_NAME: &str = "sAMAccountName";
pub const ATTR_USER_ACCOUNT_CONTROL: &str = "userAccountControl";
pub const ATTR_UAC_COMPUTED: &str = "msDS-User-Account-Control-Computed";
pub const ATTR_LOCKOUT_TIME: &str = "lockoutTime";
pub const ATTR_PWD_LAST_SET: &str = "pwdLastSet";
pub const ATTR_PASSWORD_EXPIRY_COMPUTED: &str = "msDS-UserPasswordExpiryTimeComputed";

/// `userAccountControl` flags (MS-ADTS 2.2.16).
pub mod uac {
    pub const ACCOUNTDISABLE: u32 = 0x0002;
    pub const LOCKOUT: u32 = 0x0010;
    pub const DONT_EXPIRE_PASSWORD: u32 = 0x1_0000;
}

/// Seconds between 1601-01-01 and 1970-01-01.
const FILETIME_UNIX_OFFSET_SECS: i64 = 11_644_473_600;
const FILETIME_TICKS_PER_SEC: i64 = 10_000_000;
/// AD's "never" marker.
const FILETIME_NEVER: i64 = i64::MAX;

/// Attributes requested for every account lookup.
pub fn account_attributes(login_attribute: &str) -> Vec<String> {
    let mut attrs: Vec<String> = [
        ATTR_SAM_ACCOUNT_NAME,
        ATTR_USER_ACCOUNT_CONTROL,
        ATTR_UAC_COMPUTED,
        ATTR_LOCKOUT_TIME,
        ATTR_PWD_LAST_SET,
        ATTR_PASSWORD_EXPIRY_COMPUTED,
    ]
    .iter()
    .map(|a| a.to_string())
    .collect();

    if !attrs.iter().any(|a| a.eq_ignore_ascii_case(login_attribute)) {
        attrs.push(login_attribute.to_string());
    }
    attrs
}

/// Convert a FILETIME (100ns ticks since 1601-01-01 UTC) to a timestamp.
///
/// Negative values and the `0x7FFFFFFFFFFFFFFF` "never" marker yield `None`.
pub fn filetime_to_datetime(filetime: i64) -> Option<DateTime<Utc>> {
    if filetime < 0 || filetime == FILETIME_NEVER {
        return None;
    }
    let secs = filetime / FILETIME_TICKS_PER_SEC - FILETIME_UNIX_OFFSET_SECS;
    let nanos = (filetime % FILETIME_TICKS_PER_SEC) * 100;
    DateTime::from_timestamp(secs, nanos as u32)
}

fn first_value<'a>(entry: &'a SearchEntry, name: &str) -> Option<&'a str> {
    entry
        .attrs
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first())
        .map(String::as_str)
}

fn parse_i64(entry: &SearchEntry, name: &str) -> Result<Option<i64>, DirectoryError> {
    first_value(entry, name)
        .map(|raw| {
            raw.trim().parse::<i64>().map_err(|_| {
                DirectoryError::InvalidEntry(format!("{} on {} is not numeric: {}", name, entry.dn, raw))
            })
        })
        .transpose()
}

fn parse_u32(entry: &SearchEntry, name: &str) -> Result<Option<u32>, DirectoryError> {
    // AD serialises the bitfields as signed 32-bit integers
    Ok(parse_i64(entry, name)?.map(|v| v as u32))
}

/// Decode a search entry into a [`DirectoryAccount`].
pub fn account_from_entry(
    entry: &SearchEntry,
    login_attribute: &str,
) -> Result<DirectoryAccount, DirectoryError> {
    let uac_flags = parse_u32(entry, ATTR_USER_ACCOUNT_CONTROL)?.ok_or_else(|| {
        DirectoryError::InvalidEntry(format!("{} has no {}", entry.dn, ATTR_USER_ACCOUNT_CONTROL))
    })?;

    let is_locked = match parse_u32(entry, ATTR_UAC_COMPUTED)? {
        Some(computed) => computed & uac::LOCKOUT != 0,
        None => {
            parse_i64(entry, ATTR_LOCKOUT_TIME)?.map_or(false, |t| t > 0)
                || uac_flags & uac::LOCKOUT != 0
        }
    };

    let password_last_set = parse_i64(entry, ATTR_PWD_LAST_SET)?
        .filter(|v| *v > 0)
        .and_then(filetime_to_datetime);

    // 0 here means "must change at next logon" and decodes to 1601-01-01, i.e. expired.
    let password_expires_at =
        parse_i64(entry, ATTR_PASSWORD_EXPIRY_COMPUTED)?.and_then(filetime_to_datetime);

    let login_name = first_value(entry, login_attribute)
        .or_else(|| first_value(entry, ATTR_SAM_ACCOUNT_NAME))
        .unwrap_or_default()
        .to_string();

    Ok(DirectoryAccount {
        distinguished_name: entry.dn.clone(),
        login_name,
        is_locked,
        is_disabled: uac_flags & uac::ACCOUNTDISABLE != 0,
        password_expires_at,
        password_never_expires: uac_flags & uac::DONT_EXPIRE_PASSWORD != 0,
        password_last_set,
    })
}
