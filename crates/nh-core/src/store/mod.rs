//! # Store
//!
//! The in-process home of every NewsHub collection. State is loaded once
//! when the store opens and every mutation is written through to the
//! [`Repository`] before the method returns.
//!
//! Reads never mutate. Lookups answer `Option` and deletes answer `bool`;
//! a missing id is never an error. A failed write is logged, recorded in
//! [`Store::persistence_failures`], and the in-memory change is kept.

mod ads;
mod articles;
mod chat;
mod comments;
mod livestreams;
mod newsletter;
mod reactions;
mod tags;
mod users;

pub use chat::DEFAULT_RECENT_LIMIT;

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::PersistenceFailure;
use crate::models::*;
use crate::seed;
use crate::traits::{Collection, Repository};

/// How request workers share one store: reads in parallel, writes one at a
/// time within the process.
pub type SharedStore = Arc<RwLock<Store>>;

/// Next id to hand out per entity type, persisted as `counters.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Counters {
    pub next_user_id: Id,
    pub next_article_id: Id,
    pub next_comment_id: Id,
    pub next_reaction_id: Id,
    pub next_chat_message_id: Id,
    pub next_ad_id: Id,
    pub next_live_stream_id: Id,
    pub next_newsletter_subscriber_id: Id,
}

pub struct Store {
    repo: Box<dyn Repository>,
    users: Vec<User>,
    articles: Vec<Article>,
    comments: Vec<Comment>,
    reactions: Vec<Reaction>,
    chat_messages: Vec<ChatMessage>,
    ads: Vec<Ad>,
    live_streams: Vec<LiveStream>,
    subscribers: Vec<NewsletterSubscriber>,
    settings: Settings,
    counters: Counters,
    failures: BTreeMap<Collection, PersistenceFailure>,
    /// Collections whose file exists but could not be loaded. They are
    /// served from defaults and never written back.
    unreadable: BTreeMap<Collection, PersistenceFailure>,
}

impl Store {
    /// Loads every collection from `repo`, seeding the ones that were never
    /// written or cannot be read.
    pub fn open(repo: Box<dyn Repository>) -> Self {
        let now = Utc::now();
        let repo_ref = repo.as_ref();

        let mut unreadable = BTreeMap::new();
        let skipped = &mut unreadable;

        let users: Vec<User> = load_or(repo_ref, Collection::Users, skipped, || seed::users(now));
        let articles: Vec<Article> =
            load_or(repo_ref, Collection::Articles, skipped, || seed::articles(now));
        let comments: Vec<Comment> =
            load_or(repo_ref, Collection::Comments, skipped, || seed::comments(now));
        let reactions: Vec<Reaction> = load_or(repo_ref, Collection::Reactions, skipped, Vec::new);
        let chat_messages: Vec<ChatMessage> =
            load_or(repo_ref, Collection::ChatMessages, skipped, || seed::chat_messages(now));
        let ads: Vec<Ad> = load_or(repo_ref, Collection::Ads, skipped, || seed::ads(now));
        let live_streams: Vec<LiveStream> =
            load_or(repo_ref, Collection::LiveStreams, skipped, Vec::new);
        let subscribers: Vec<NewsletterSubscriber> =
            load_or(repo_ref, Collection::Newsletter, skipped, Vec::new);
        let settings: Settings = load_or(repo_ref, Collection::Settings, skipped, seed::settings);
        let stored: Counters = load_or(repo_ref, Collection::Counters, skipped, Counters::default);

        // A counter never falls behind the ids already in use, even when the
        // counters file is missing or was edited by hand.
        let counters = Counters {
            next_user_id: stored.next_user_id.max(next_after(&users, |u| u.id)),
            next_article_id: stored.next_article_id.max(next_after(&articles, |a| a.id)),
            next_comment_id: stored.next_comment_id.max(next_after(&comments, |c| c.id)),
            next_reaction_id: stored.next_reaction_id.max(next_after(&reactions, |r| r.id)),
            next_chat_message_id: stored
                .next_chat_message_id
                .max(next_after(&chat_messages, |m| m.id)),
            next_ad_id: stored.next_ad_id.max(next_after(&ads, |a| a.id)),
            next_live_stream_id: stored
                .next_live_stream_id
                .max(next_after(&live_streams, |s| s.id)),
            next_newsletter_subscriber_id: stored
                .next_newsletter_subscriber_id
                .max(next_after(&subscribers, |s| s.id)),
        };

        info!(
            users = users.len(),
            articles = articles.len(),
            comments = comments.len(),
            ads = ads.len(),
            "store loaded"
        );

        Self {
            repo,
            users,
            articles,
            comments,
            reactions,
            chat_messages,
            ads,
            live_streams,
            subscribers,
            settings,
            counters,
            failures: BTreeMap::new(),
            unreadable,
        }
    }

    /// Wraps the store for sharing across request workers.
    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Collections whose latest write failed, so disk is behind memory.
    pub fn persistence_failures(&self) -> Vec<PersistenceFailure> {
        self.failures.values().cloned().collect()
    }

    /// Collections that fell back to defaults because their stored copy could
    /// not be read or parsed. Their files are left as they are.
    pub fn load_failures(&self) -> Vec<PersistenceFailure> {
        self.unreadable.values().cloned().collect()
    }

    /// Rewrites every readable collection and the counters file.
    pub fn flush_all(&mut self) {
        self.persist(&Collection::ALL);
    }

    pub fn get_stats(&self) -> Stats {
        let count_status = |status| self.articles.iter().filter(|a| a.status == status).count();
        Stats {
            total_users: self.users.len(),
            total_articles: self.articles.len(),
            total_comments: self.comments.len(),
            published_articles: count_status(ArticleStatus::Published),
            draft_articles: count_status(ArticleStatus::Draft),
            total_views: self.articles.iter().map(|a| a.views).sum(),
            total_chat_messages: self.chat_messages.len(),
            total_ads: self.ads.len(),
            active_ads: self.ads.iter().filter(|a| a.is_active).count(),
        }
    }

    pub fn get_settings(&self) -> Settings {
        self.settings.clone()
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) -> Settings {
        patch.apply(&mut self.settings);
        self.persist(&[Collection::Settings]);
        self.settings.clone()
    }

    fn snapshot(&self, collection: Collection) -> serde_json::Result<Value> {
        match collection {
            Collection::Users => serde_json::to_value(&self.users),
            Collection::Articles => serde_json::to_value(&self.articles),
            Collection::Comments => serde_json::to_value(&self.comments),
            Collection::Reactions => serde_json::to_value(&self.reactions),
            Collection::ChatMessages => serde_json::to_value(&self.chat_messages),
            Collection::Ads => serde_json::to_value(&self.ads),
            Collection::LiveStreams => serde_json::to_value(&self.live_streams),
            Collection::Newsletter => serde_json::to_value(&self.subscribers),
            Collection::Settings => serde_json::to_value(&self.settings),
            Collection::Counters => serde_json::to_value(&self.counters),
        }
    }

    /// Writes the full current contents of `collections` in one batch.
    fn persist(&mut self, collections: &[Collection]) {
        let mut batch = Vec::with_capacity(collections.len());
        for &collection in collections {
            if self.unreadable.contains_key(&collection) {
                self.record_failure(
                    collection,
                    "not written: stored copy could not be loaded at startup".to_string(),
                );
                continue;
            }
            match self.snapshot(collection) {
                Ok(body) => batch.push((collection, body)),
                Err(e) => self.record_failure(collection, e.to_string()),
            }
        }

        let failed = self.repo.save_batch(&batch);
        for (collection, _) in &batch {
            if !failed.iter().any(|(f, _)| f == collection) {
                debug!(collection = %collection, "collection persisted");
                self.failures.remove(collection);
            }
        }
        for (collection, error) in failed {
            self.record_failure(collection, format!("{error:#}"));
        }
    }

    fn record_failure(&mut self, collection: Collection, message: String) {
        warn!(
            collection = %collection,
            error = %message,
            "write failed; keeping in-memory state"
        );
        self.failures.insert(
            collection,
            PersistenceFailure {
                collection,
                message,
                at: Utc::now(),
            },
        );
    }
}

/// The stored collection, or `fallback()` when it was never written or
/// cannot be used. An unusable copy is noted in `unreadable` so it is not
/// overwritten later.
fn load_or<T, F>(
    repo: &dyn Repository,
    collection: Collection,
    unreadable: &mut BTreeMap<Collection, PersistenceFailure>,
    fallback: F,
) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let error = match repo.load(collection) {
        Ok(None) => return fallback(),
        Ok(Some(body)) => match serde_json::from_value(body) {
            Ok(value) => return value,
            Err(e) => e.to_string(),
        },
        Err(e) => format!("{e:#}"),
    };

    warn!(collection = %collection, error = %error, "failed to load collection, using defaults");
    unreadable.insert(
        collection,
        PersistenceFailure {
            collection,
            message: error,
            at: Utc::now(),
        },
    );
    fallback()
}

fn next_after<T>(items: &[T], id: impl Fn(&T) -> Id) -> Id {
    items.iter().map(id).max().map_or(1, |max| max + 1)
}

/// Hands out `*slot` and advances it.
fn allocate(slot: &mut Id) -> Id {
    let id = *slot;
    *slot += 1;
    id
}

/// Sorts by creation time, newest first. Ties keep storage order.
fn newest_first<T>(mut items: Vec<T>, created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

/// Removes the first element matching `pred`; `false` when none did.
fn remove_where<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    match items.iter().position(pred) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}
