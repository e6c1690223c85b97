use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use anyhow::bail;
use serde_json::Value;

use crate::traits::{Collection, Repository};

/// In-memory, HashMap-based repository.
///
/// Intended for tests and embedding. Clones share the same backing map, so a
/// store can be dropped and reopened over a clone to simulate a restart.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    collections: RwLock<HashMap<Collection, Value>>,
    failing: RwLock<HashSet<Collection>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `save` of `collection` fail until [`Self::heal`].
    pub fn fail_writes_for(&self, collection: Collection) {
        self.inner.failing.write().expect("lock poisoned").insert(collection);
    }

    pub fn heal(&self, collection: Collection) {
        self.inner.failing.write().expect("lock poisoned").remove(&collection);
    }

    /// The last successfully saved body of `collection`.
    pub fn stored(&self, collection: Collection) -> Option<Value> {
        self.inner
            .collections
            .read()
            .expect("lock poisoned")
            .get(&collection)
            .cloned()
    }
}

impl Repository for MemoryRepository {
    fn load(&self, collection: Collection) -> anyhow::Result<Option<Value>> {
        Ok(self.stored(collection))
    }

    fn save(&self, collection: Collection, body: &Value) -> anyhow::Result<()> {
        if self.inner.failing.read().expect("lock poisoned").contains(&collection) {
            bail!("simulated write failure for {collection}");
        }
        self.inner
            .collections
            .write()
            .expect("lock poisoned")
            .insert(collection, body.clone());
        Ok(())
    }
}

impl std::fmt::Debug for MemoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.inner.collections.read().expect("lock poisoned").len();
        f.debug_struct("MemoryRepository")
            .field("collections", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clones_share_state() {
        let repo = MemoryRepository::new();
        let other = repo.clone();
        repo.save(Collection::Ads, &json!([{"id": 1}])).unwrap();
        assert_eq!(other.load(Collection::Ads).unwrap(), Some(json!([{"id": 1}])));
        assert_eq!(other.load(Collection::Users).unwrap(), None);
    }

    #[test]
    fn simulated_failures_leave_previous_body() {
        let repo = MemoryRepository::new();
        repo.save(Collection::Settings, &json!({"siteName": "a"})).unwrap();
        repo.fail_writes_for(Collection::Settings);
        assert!(repo.save(Collection::Settings, &json!({"siteName": "b"})).is_err());
        assert_eq!(repo.stored(Collection::Settings), Some(json!({"siteName": "a"})));

        repo.heal(Collection::Settings);
        repo.save(Collection::Settings, &json!({"siteName": "b"})).unwrap();
        assert_eq!(repo.stored(Collection::Settings), Some(json!({"siteName": "b"})));
    }

    #[test]
    fn batch_reports_only_failed_entries() {
        let repo = MemoryRepository::new();
        repo.fail_writes_for(Collection::Counters);
        let failed = repo.save_batch(&[
            (Collection::Articles, json!([])),
            (Collection::Counters, json!({})),
        ]);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, Collection::Counters);
        assert!(repo.stored(Collection::Articles).is_some());
    }
}
