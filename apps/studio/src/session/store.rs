//! Session-scoped key/value storage. Lives only as long as the process; nothing
//! here is ever written to disk.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Key under which the generation service credential is kept.
pub const CREDENTIAL_KEY: &str = "gemini_api_key";

pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str) -> Option<String>;

    /// The stored credential, if present and not blank.
    fn credential(&self) -> Option<String> {
        self.get(CREDENTIAL_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a credential, when one is given.
    pub fn with_credential(credential: Option<String>) -> Self {
        let store = Self::new();
        if let Some(credential) = credential.filter(|c| !c.trim().is_empty()) {
            store.set(CREDENTIAL_KEY, credential);
        }
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) -> Option<String> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemorySessionStore::new();
        assert!(store.get("a").is_none());
        store.set("a", "1".to_string());
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert_eq!(store.remove("a").as_deref(), Some("1"));
        assert!(store.get("a").is_none());
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let store = MemorySessionStore::new();
        store.set(CREDENTIAL_KEY, "   ".to_string());
        assert!(store.credential().is_none());
        store.set(CREDENTIAL_KEY, " key-1 ".to_string());
        assert_eq!(store.credential().as_deref(), Some("key-1"));
    }

    #[test]
    fn test_seeding_skips_blank_values() {
        assert!(MemorySessionStore::with_credential(Some(String::new()))
            .credential()
            .is_none());
        assert!(MemorySessionStore::with_credential(None).credential().is_none());
        assert_eq!(
            MemorySessionStore::with_credential(Some("k".into()))
                .credential()
                .as_deref(),
            Some("k")
        );
    }
}
