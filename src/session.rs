//! Session State and Logout
//!
//! The browser's local key-value storage becomes a small JSON file
//! under the dashboard directory. Only one key matters here: the auth
//! flag the logout action removes. Logout enforces nothing; it clears
//! the flag and reports the login page as the navigation target.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use crate::view::{Document, LOGOUT_LINK};

/// The stored flag representing "authenticated".
pub const AUTH_FLAG_KEY: &str = "liberty_dashboard_auth";

/// Where logout navigates to.
pub const LOGIN_PAGE: &str = "login.html";

/// File-backed key-value store. Reads tolerate a missing or corrupt
/// file (treated as empty); writes create the parent directory.
#[derive(Clone, Debug)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> BTreeMap<String, Value> {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&contents).unwrap_or_default()
    }

    fn write_map(&self, map: &BTreeMap<String, Value>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir).context("Failed to create store directory")?;
            }
        }
        let json = serde_json::to_string_pretty(map).context("Failed to serialize store")?;
        fs::write(&self.path, json).context("Failed to write store file")?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read_map().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut map = self.read_map();
        map.insert(key.to_string(), value);
        self.write_map(&map)
    }

    /// Remove a key. Removing a key that was never set is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.read_map();
        if map.remove(key).is_none() {
            return Ok(());
        }
        self.write_map(&map)
    }
}

/// The logout action, bound once at startup if the page carries the
/// logout link. A page without the link simply has no logout.
pub struct LogoutAction {
    store: LocalStore,
}

impl LogoutAction {
    /// Bind against the page. Returns `None` when the logout link is
    /// absent; every other missing element is handled elsewhere as a
    /// startup failure, this one is tolerated.
    pub fn bind(document: &Document, store: LocalStore) -> Option<Self> {
        if document.has_slot(LOGOUT_LINK) {
            Some(Self { store })
        } else {
            None
        }
    }

    /// Clear the auth flag and return the navigation target. Works the
    /// same whether or not the flag was set.
    pub fn invoke(&self) -> Result<&'static str> {
        self.store.remove(AUTH_FLAG_KEY)?;
        info!(target_page = LOGIN_PAGE, "Logged out");
        Ok(LOGIN_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::REQUIRED_SLOTS;

    fn temp_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("storage.json"));
        (dir, store)
    }

    #[test]
    fn test_logout_removes_auth_flag() {
        let (_dir, store) = temp_store();
        store.set(AUTH_FLAG_KEY, Value::Bool(true)).unwrap();

        let doc = Document::with_page_slots();
        let action = LogoutAction::bind(&doc, store.clone()).unwrap();
        let target = action.invoke().unwrap();

        assert_eq!(target, LOGIN_PAGE);
        assert!(store.get(AUTH_FLAG_KEY).is_none());
    }

    #[test]
    fn test_logout_with_absent_flag_still_navigates() {
        let (_dir, store) = temp_store();

        let doc = Document::with_page_slots();
        let action = LogoutAction::bind(&doc, store).unwrap();
        assert_eq!(action.invoke().unwrap(), LOGIN_PAGE);
    }

    #[test]
    fn test_bind_is_guarded_on_missing_logout_link() {
        let (_dir, store) = temp_store();
        let doc = Document::new(REQUIRED_SLOTS.iter().copied());
        assert!(LogoutAction::bind(&doc, store).is_none());
    }

    #[test]
    fn test_store_preserves_unrelated_keys() {
        let (_dir, store) = temp_store();
        store.set("theme", Value::String("dark".to_string())).unwrap();
        store.set(AUTH_FLAG_KEY, Value::Bool(true)).unwrap();

        store.remove(AUTH_FLAG_KEY).unwrap();
        assert_eq!(store.get("theme"), Some(Value::String("dark".to_string())));
    }
}
