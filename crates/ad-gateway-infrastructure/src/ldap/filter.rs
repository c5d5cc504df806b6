//! Search filter construction

/// Escape a value for use inside an LDAP filter (RFC 4515).
pub fn escape_filter_value(value: &str) -> String {
    value
        .replace('\\', "\\5c")
        .replace('*', "\\2a")
        .replace('(', "\\28")
        .replace(')', "\\29")
        .replace('\0', "\\00")
}

/// Drop a down-level `DOMAIN\` prefix; the account part is what the directory indexes.
pub fn strip_domain_prefix(username: &str) -> &str {
    match username.rfind('\\') {
        Some(pos) => &username[pos + 1..],
        None => username,
    }
}

/// Filter matching a single user object by its login attribute.
pub fn user_filter(login_attribute: &str, username: &str) -> String {
    format!(
        "(&(objectCategory=person)(objectClass=user)({}={}))",
        login_attribute,
        escape_filter_value(strip_domain_prefix(username))
    )
}
