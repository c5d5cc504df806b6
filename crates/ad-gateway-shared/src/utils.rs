//! Utility functions

/// Mask an account name for log output.
///
/// Handles the three forms Active Directory accepts: `user`, `DOMAIN\user`
/// and `user@domain`. Only the first two characters of the account part survive.
pub fn mask_username(username: &str) -> String {
    let (prefix, account, suffix) = if let Some(pos) = username.find('\\') {
        (&username[..=pos], &username[pos + 1..], "")
    } else if let Some(pos) = username.find('@') {
        ("", &username[..pos], &username[pos..])
    } else {
        ("", username, "")
    };

    let visible: String = account.chars().take(2).collect();
    if visible.is_empty() {
        return "***".to_string();
    }
    format!("{}{}***{}", prefix, visible, suffix)
}
