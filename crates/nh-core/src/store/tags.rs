//! Tag views computed on demand from published articles.

use std::collections::{BTreeSet, HashMap};

use super::{newest_first, Store};
use crate::models::{Article, TagCount};

impl Store {
    /// Lowercased tags of every published article, in storage order.
    fn published_tags(&self) -> impl Iterator<Item = String> + '_ {
        self.articles
            .iter()
            .filter(|a| a.is_published())
            .flat_map(|a| a.tags.iter().map(|t| t.to_lowercase()))
    }

    /// Distinct tags, sorted.
    pub fn get_all_tags(&self) -> Vec<String> {
        self.published_tags()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The `limit` most used tags. Equal counts keep first-seen order.
    pub fn get_popular_tags(&self, limit: usize) -> Vec<TagCount> {
        let mut counts: Vec<TagCount> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();
        for tag in self.published_tags() {
            match slots.get(&tag) {
                Some(&slot) => counts[slot].count += 1,
                None => {
                    slots.insert(tag.clone(), counts.len());
                    counts.push(TagCount { tag, count: 1 });
                }
            }
        }
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts.truncate(limit);
        counts
    }

    /// Published articles carrying `tag` (case-insensitive), newest first.
    pub fn get_articles_by_tag(&self, tag: &str) -> Vec<Article> {
        let tagged = self
            .articles
            .iter()
            .filter(|a| a.is_published() && a.has_tag(tag))
            .cloned()
            .collect();
        newest_first(tagged, |a| a.created_at)
    }
}
