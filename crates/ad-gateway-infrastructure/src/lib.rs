//! # AD Gateway Infrastructure
//! 
//! Active Directory implementation of the directory client port (adapter).

pub mod ldap;

pub use ldap::{LdapConnector, LdapDirectoryClient};
