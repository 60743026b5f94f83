//! Login credential checks.

use std::collections::HashMap;

use crate::config::UserConfig;

/// Checks a username/password pair.
///
/// Implementations may be slow (password hashing); callers on the async
/// runtime should invoke them from a blocking task.
pub trait CredentialStore: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Static account table holding bcrypt password hashes.
#[derive(Debug, Clone, Default)]
pub struct BcryptCredentialStore {
    users: HashMap<String, String>,
}

impl BcryptCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(users: &[UserConfig]) -> Self {
        users.iter().fold(Self::new(), |store, user| {
            store.with_user(user.username.clone(), user.password_hash.clone())
        })
    }

    pub fn with_user(mut self, username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        self.users.insert(username.into(), password_hash.into());
        self
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl CredentialStore for BcryptCredentialStore {
    fn verify(&self, username: &str, password: &str) -> bool {
        let Some(hash) = self.users.get(username) else {
            return false;
        };

        match bcrypt::verify(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Stored password hash is unusable");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> BcryptCredentialStore {
        let hash = bcrypt::hash("12345", 4).unwrap();
        BcryptCredentialStore::new().with_user("admin123", hash)
    }

    #[test]
    fn test_correct_password() {
        assert!(store().verify("admin123", "12345"));
    }

    #[test]
    fn test_wrong_password_or_user() {
        let store = store();
        assert!(!store.verify("admin123", "123456"));
        assert!(!store.verify("admin", "12345"));
        assert!(!store.verify("", ""));
    }

    #[test]
    fn test_corrupt_hash_rejects() {
        let store = BcryptCredentialStore::new().with_user("admin", "$2b$04$tooshort");
        assert!(!store.verify("admin", "anything"));
    }

    #[test]
    fn test_from_config() {
        let users = vec![UserConfig {
            username: "ops".into(),
            password_hash: bcrypt::hash("pw", 4).unwrap(),
        }];
        let store = BcryptCredentialStore::from_config(&users);
        assert_eq!(store.len(), 1);
        assert!(store.verify("ops", "pw"));
    }
}
