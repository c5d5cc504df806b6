//! AD password change via the `unicodePwd` attribute.
//!
//! AD expects the password wrapped in double quotes and encoded as UTF-16LE.
//! A user-initiated change is a single modify carrying a delete of the old
//! value and an add of the new one; the server checks the old value and
//! applies the domain password policy to the new one.

use std::collections::HashSet;

use ldap3::Mod;

use ad_gateway_core::DirectoryError;

pub const ATTR_UNICODE_PWD: &str = "unicodePwd";

/// Quote and UTF-16LE encode a password for `unicodePwd`.
pub fn encode_ad_password(password: &str) -> Result<Vec<u8>, DirectoryError> {
    if password.is_empty() {
        return Err(DirectoryError::Operation("password cannot be empty".to_string()));
    }
    let quoted = format!("\"{}\"", password);
    Ok(quoted.encode_utf16().flat_map(u16::to_le_bytes).collect())
}

/// Delete-old / add-new modifications for a password change.
pub fn password_change_mods(
    current_password: &str,
    new_password: &str,
) -> Result<Vec<Mod<Vec<u8>>>, DirectoryError> {
    let old_value = encode_ad_password(current_password)?;
    let new_value = encode_ad_password(new_password)?;
    let attr = ATTR_UNICODE_PWD.as_bytes().to_vec();

    Ok(vec![
        Mod::Delete(attr.clone(), HashSet::from([old_value])),
        Mod::Add(attr, HashSet::from([new_value])),
    ])
}
