//! Registry identity value

/// Identifies the registry account and repository an upload targets.
///
/// Produced fully resolved by an external reference resolver. This crate
/// never re-resolves or re-validates it; it is shared by reference across
/// every remote call a session makes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryIdentity {
    pub account_id: String,
    pub repository_name: String,
}

impl RegistryIdentity {
    pub fn new(account_id: impl Into<String>, repository_name: impl Into<String>) -> Self {
        RegistryIdentity {
            account_id: account_id.into(),
            repository_name: repository_name.into(),
        }
    }
}
