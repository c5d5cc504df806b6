//! LDAP / Active Directory adapter

pub mod attributes;
pub mod client;
pub mod connection;
pub mod filter;
pub mod password;

pub use client::LdapDirectoryClient;
pub use connection::LdapConnector;
