use std::{cell::RefCell, collections::BTreeMap};

use super::error::StoreError;
use crate::utils::storage as storage_utils;

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role_id";
pub const LAST_ACTIVITY_KEY: &str = "lastActivity";

/// String key-value storage scoped to the browser tab's session.
///
/// Every collaborator that touches session state receives one of these
/// explicitly instead of reaching for `window.sessionStorage`.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-memory store used for SSR and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
        store
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.entries.borrow_mut().clear();
        Ok(())
    }
}

/// `window.sessionStorage`, resolved on every call so a storage that
/// becomes unavailable mid-session is reported instead of cached.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSessionStore;

impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        storage_utils::session_storage()
            .map_err(StoreError::Unavailable)?
            .get_item(key)
            .map_err(|_| StoreError::Unavailable(format!("cannot read `{key}`")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        storage_utils::session_storage()
            .map_err(StoreError::Unavailable)?
            .set_item(key, value)
            .map_err(|err| StoreError::Write {
                key: key.to_string(),
                message: format!("{err:?}"),
            })
    }

    fn clear(&self) -> Result<(), StoreError> {
        storage_utils::session_storage()
            .map_err(StoreError::Unavailable)?
            .clear()
            .map_err(|_| StoreError::Unavailable("cannot clear session storage".into()))
    }
}

/// Snapshot of the guard-owned keys at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role_id: Option<String>,
    pub last_activity_ms: Option<i64>,
}

impl Session {
    pub fn load(store: &dyn SessionStore) -> Result<Self, StoreError> {
        let token = store.get(TOKEN_KEY)?.filter(|token| !token.is_empty());
        let role_id = store.get(ROLE_KEY)?;
        // Unparseable timestamps count as "no timeout evidence".
        let last_activity_ms = store
            .get(LAST_ACTIVITY_KEY)?
            .and_then(|raw| raw.trim().parse::<i64>().ok());
        Ok(Self {
            token,
            role_id,
            last_activity_ms,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

pub fn stamp_activity(store: &dyn SessionStore, now_ms: i64) -> Result<(), StoreError> {
    store.set(LAST_ACTIVITY_KEY, &now_ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_load_reads_guard_keys() {
        let store = MemoryStore::with_entries([
            (TOKEN_KEY, "abc"),
            (ROLE_KEY, "2"),
            (LAST_ACTIVITY_KEY, "1700000000000"),
        ]);
        let session = Session::load(&store).unwrap();
        assert_eq!(session.token.as_deref(), Some("abc"));
        assert_eq!(session.role_id.as_deref(), Some("2"));
        assert_eq!(session.last_activity_ms, Some(1_700_000_000_000));
        assert!(session.is_authenticated());
    }

    #[test]
    fn malformed_last_activity_is_ignored() {
        let store = MemoryStore::with_entries([(TOKEN_KEY, "abc"), (LAST_ACTIVITY_KEY, "soon")]);
        let session = Session::load(&store).unwrap();
        assert!(session.last_activity_ms.is_none());
    }

    #[test]
    fn empty_token_is_unauthenticated() {
        let store = MemoryStore::with_entries([(TOKEN_KEY, ""), (ROLE_KEY, "1")]);
        let session = Session::load(&store).unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn clear_removes_unrelated_keys_too() {
        let store = MemoryStore::with_entries([(TOKEN_KEY, "abc"), ("profileData", "{}")]);
        store.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn stamp_activity_overwrites_previous_value() {
        let store = MemoryStore::with_entries([(LAST_ACTIVITY_KEY, "10")]);
        stamp_activity(&store, 42).unwrap();
        assert_eq!(store.get(LAST_ACTIVITY_KEY).unwrap().as_deref(), Some("42"));
    }
}
