//! User display-name lookup consumed by the Q&A stores.
//!
//! Accounts live outside this core. The stores only need a name to show
//! next to an author id, and a missing or unreachable user must never fail
//! the surrounding query, so lookups are infallible and fall back to
//! [`UNKNOWN_USER_NAME`].

use std::collections::HashMap;

use async_trait::async_trait;

use crate::types::DbId;

/// Placeholder shown for ids the directory cannot resolve.
pub const UNKNOWN_USER_NAME: &str = "Unknown user";

/// Resolves user ids to display names.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Display name for `user_id`, or [`UNKNOWN_USER_NAME`].
    async fn display_name(&self, user_id: DbId) -> String;

    /// Display names for several ids at once. Every requested id is present
    /// in the result.
    async fn display_names(&self, user_ids: &[DbId]) -> HashMap<DbId, String> {
        let mut names = HashMap::with_capacity(user_ids.len());
        for &id in user_ids {
            if !names.contains_key(&id) {
                names.insert(id, self.display_name(id).await);
            }
        }
        names
    }
}

/// Fixed in-memory directory.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    names: HashMap<DbId, String>,
}

impl StaticUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_user(mut self, user_id: DbId, name: impl Into<String>) -> Self {
        self.names.insert(user_id, name.into());
        self
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn display_name(&self, user_id: DbId) -> String {
        self.names
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
