//! Persistence boundary for workspace state.
//!
//! All durable state goes through [`StateStore`], a flat key-value interface.
//! Keys are namespaced under [`KEY_PREFIX`]. [`SqliteStateStore`] is the durable
//! backend; [`MemoryStateStore`] backs tests and throwaway sessions.

mod memory;
mod sqlite;

pub use memory::MemoryStateStore;
pub use sqlite::SqliteStateStore;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::StorageResult;

/// Prefix shared by every persisted key.
pub const KEY_PREFIX: &str = "crucible:";

/// Persisted key names (without prefix).
pub mod keys {
    /// Idea text
    pub const IDEA: &str = "idea";
    /// Goal text
    pub const GOAL: &str = "goal";
    /// Audience text
    pub const AUDIENCE: &str = "audience";
    /// Constraints text
    pub const CONSTRAINTS: &str = "constraints";
    /// Mode name, e.g. `investor`
    pub const MODE: &str = "mode";
    /// `true` or `false`
    pub const NOVELTY: &str = "novelty";
    /// Decimal counter
    pub const ESCALATION: &str = "escalation";
    /// JSON array of revisions, newest first
    pub const HISTORY: &str = "history";
    /// JSON revision; removed when cleared
    pub const BASELINE: &str = "baseline";
    /// Id of the revision on display
    pub const CURRENT: &str = "current";
}

/// Full storage key for a short key name.
pub fn namespaced(key: &str) -> String {
    format!("{}{}", KEY_PREFIX, key)
}

/// Durable key-value storage for workspace state.
///
/// Keys passed in are full (namespaced) keys.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load every stored entry under [`KEY_PREFIX`].
    async fn load(&self) -> StorageResult<HashMap<String, String>>;
    /// Insert or replace one entry.
    async fn save(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Delete one entry; deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> StorageResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced() {
        assert_eq!(namespaced(keys::HISTORY), "crucible:history");
        assert!(namespaced(keys::IDEA).starts_with(KEY_PREFIX));
    }
}
