//! # Core Traits (Ports)
//!
//! Any persistence plugin must implement [`Repository`] to back the store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One persisted unit: an entity collection, the settings record, or the
/// id counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Users,
    Articles,
    Comments,
    Reactions,
    ChatMessages,
    Ads,
    LiveStreams,
    Newsletter,
    Settings,
    Counters,
}

impl Collection {
    pub const ALL: [Collection; 10] = [
        Collection::Users,
        Collection::Articles,
        Collection::Comments,
        Collection::Reactions,
        Collection::ChatMessages,
        Collection::Ads,
        Collection::LiveStreams,
        Collection::Newsletter,
        Collection::Settings,
        Collection::Counters,
    ];

    /// File name used by file-backed repositories.
    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Users => "users.json",
            Collection::Articles => "articles.json",
            Collection::Comments => "comments.json",
            Collection::Reactions => "reactions.json",
            Collection::ChatMessages => "chatMessages.json",
            Collection::Ads => "ads.json",
            Collection::LiveStreams => "livestreams.json",
            Collection::Newsletter => "newsletter.json",
            Collection::Settings => "settings.json",
            Collection::Counters => "counters.json",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name().trim_end_matches(".json"))
    }
}

/// Data persistence contract for the store.
///
/// Collections travel as `serde_json::Value` so the trait stays object safe
/// and a backend never needs to know the entity types.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Repository: Send + Sync {
    /// Reads a whole collection. `Ok(None)` means it was never written.
    fn load(&self, collection: Collection) -> anyhow::Result<Option<Value>>;

    /// Replaces the stored collection with `body`.
    fn save(&self, collection: Collection, body: &Value) -> anyhow::Result<()>;

    /// Writes every collection touched by one store operation, e.g. a new
    /// record together with the counters it consumed.
    ///
    /// The default saves entries in order and reports each failure. A
    /// transactional backend should override this to commit all or nothing.
    fn save_batch(&self, batch: &[(Collection, Value)]) -> Vec<(Collection, anyhow::Error)> {
        batch
            .iter()
            .filter_map(|(collection, body)| {
                self.save(*collection, body).err().map(|e| (*collection, e))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_distinct() {
        let mut names: Vec<_> = Collection::ALL.iter().map(|c| c.file_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Collection::ALL.len());
        assert_eq!(Collection::ChatMessages.to_string(), "chatMessages");
    }
}
