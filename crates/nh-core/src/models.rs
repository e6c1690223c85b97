//! # Domain Models
//!
//! These structs represent the core entities of NewsHub. Field names
//! serialize in camelCase so the on-disk JSON stays hand-editable and
//! compatible with existing data files.
//!
//! Every entity has a `New*` input (what a caller supplies to `create_*`) and,
//! where it can be edited, a `*Patch` whose `None` fields leave the stored
//! value untouched. Nullable fields use `Option<Option<T>>` in patches so an
//! explicit `null` can clear them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, Result};

pub type Id = u64;

/// Distinguishes an absent patch field from an explicit `null`.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn parse_variant<T: DeserializeOwned>(kind: &str, raw: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| AppError::Validation(format!("unknown {kind} '{raw}'")))
}

macro_rules! impl_from_str {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(impl FromStr for $ty {
            type Err = AppError;
            fn from_str(s: &str) -> Result<Self> {
                parse_variant($kind, s)
            }
        })*
    };
}

// ── Enumerations ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Reporter,
    Superadmin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::User => "user",
            Role::Reporter => "reporter",
            Role::Superadmin => "superadmin",
        })
    }
}

/// Media attached to an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
    Audio,
}

/// Media attached to a chat (ticker) message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMediaType {
    Image,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdMediaType {
    Image,
    Video,
    Audio,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Like,
    Dislike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionAction {
    Added,
    Removed,
    Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamStatus {
    #[default]
    Active,
    Scheduled,
    Ended,
}

impl_from_str! {
    Role => "role",
    MediaType => "media type",
    ChatMediaType => "chat media type",
    AdMediaType => "ad media type",
    ArticleStatus => "article status",
    ReactionType => "reaction type",
    StreamStatus => "stream status",
}

// ── Users ───────────────────────────────────────────────────────────────────

/// A stored account, including its password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    pub username: String,
    /// Hash produced by the auth layer; never returned by profile reads.
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A user with the password hash stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Id,
    pub username: String,
    pub role: Role,
    pub email: String,
    pub full_name: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            profile_picture: user.profile_picture.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub email: Option<String>,
    #[serde(deserialize_with = "present")]
    pub full_name: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub profile_picture: Option<Option<String>>,
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        if let Some(v) = self.username {
            user.username = v;
        }
        if let Some(v) = self.password {
            user.password = v;
        }
        if let Some(v) = self.role {
            user.role = v;
        }
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.full_name {
            user.full_name = v;
        }
        if let Some(v) = self.profile_picture {
            user.profile_picture = v;
        }
    }
}

// ── Articles ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Id,
    pub title: String,
    pub content: String,
    pub category: String,
    /// Author display name, denormalized at creation time.
    pub author: String,
    pub author_id: Id,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub media_type: MediaType,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub status: ArticleStatus,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub style: HeroStyle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }

    /// Case-insensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: String,
    pub author_id: Id,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub media_type: MediaType,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub status: ArticleStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub style: HeroStyle,
}

/// How an article's hero block is drawn on its page. Values are kept as
/// the front end sends them (`heroTextAlign: "center"` and so on).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroStyle {
    pub bg_color: String,
    pub title_color: String,
    pub hero_text_align: String,
    pub hero_overlay_position: String,
    pub hero_title_size: String,
    pub hero_image_overlay: String,
    pub hero_show_category: bool,
    pub hero_show_subtitle: bool,
}

impl Default for HeroStyle {
    fn default() -> Self {
        Self {
            bg_color: "#ffffff".into(),
            title_color: "#1a1a1a".into(),
            hero_text_align: "left".into(),
            hero_overlay_position: "bottom-left".into(),
            hero_title_size: "large".into(),
            hero_image_overlay: "medium".into(),
            hero_show_category: true,
            hero_show_subtitle: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroStylePatch {
    pub bg_color: Option<String>,
    pub title_color: Option<String>,
    pub hero_text_align: Option<String>,
    pub hero_overlay_position: Option<String>,
    pub hero_title_size: Option<String>,
    pub hero_image_overlay: Option<String>,
    pub hero_show_category: Option<bool>,
    pub hero_show_subtitle: Option<bool>,
}

impl HeroStylePatch {
    pub fn apply(self, style: &mut HeroStyle) {
        let strings = [
            (self.bg_color, &mut style.bg_color),
            (self.title_color, &mut style.title_color),
            (self.hero_text_align, &mut style.hero_text_align),
            (self.hero_overlay_position, &mut style.hero_overlay_position),
            (self.hero_title_size, &mut style.hero_title_size),
            (self.hero_image_overlay, &mut style.hero_image_overlay),
        ];
        for (value, slot) in strings {
            if let Some(v) = value {
                *slot = v;
            }
        }
        if let Some(v) = self.hero_show_category {
            style.hero_show_category = v;
        }
        if let Some(v) = self.hero_show_subtitle {
            style.hero_show_subtitle = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    #[serde(deserialize_with = "present")]
    pub image_url: Option<Option<String>>,
    pub media_type: Option<MediaType>,
    #[serde(deserialize_with = "present")]
    pub media_url: Option<Option<String>>,
    pub status: Option<ArticleStatus>,
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub style: HeroStylePatch,
}

impl ArticlePatch {
    pub fn apply(self, article: &mut Article) {
        if let Some(v) = self.title {
            article.title = v;
        }
        if let Some(v) = self.content {
            article.content = v;
        }
        if let Some(v) = self.category {
            article.category = v;
        }
        if let Some(v) = self.author {
            article.author = v;
        }
        if let Some(v) = self.image_url {
            article.image_url = v;
        }
        if let Some(v) = self.media_type {
            article.media_type = v;
        }
        if let Some(v) = self.media_url {
            article.media_url = v;
        }
        if let Some(v) = self.status {
            article.status = v;
        }
        if let Some(v) = self.tags {
            article.tags = v;
        }
        self.style.apply(&mut article.style);
    }
}

/// Conjunctive article filter; `None` criteria are not applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleFilter {
    pub category: Option<String>,
    pub status: Option<ArticleStatus>,
    pub author_id: Option<Id>,
}

impl ArticleFilter {
    pub fn matches(&self, article: &Article) -> bool {
        self.category.as_ref().is_none_or(|c| &article.category == c)
            && self.status.is_none_or(|s| article.status == s)
            && self.author_id.is_none_or(|id| article.author_id == id)
    }
}

// ── Comments ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Id,
    pub article_id: Id,
    /// `None` for anonymous comments.
    #[serde(default)]
    pub user_id: Option<Id>,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub article_id: Id,
    #[serde(default)]
    pub user_id: Option<Id>,
    pub username: String,
    pub content: String,
}

// ── Reactions ───────────────────────────────────────────────────────────────

/// A like/dislike from an anonymous visitor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub id: Id,
    pub article_id: Id,
    pub session_id: String,
    #[serde(rename = "type")]
    pub kind: ReactionType,
    pub created_at: DateTime<Utc>,
}

/// Result of toggling a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionOutcome {
    pub action: ReactionAction,
    #[serde(rename = "type")]
    pub kind: ReactionType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub likes: usize,
    pub dislikes: usize,
}

// ── Chat ────────────────────────────────────────────────────────────────────

/// A live-ticker message posted by staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Id,
    pub user_id: Id,
    pub username: String,
    pub user_role: Role,
    pub user_full_name: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    pub message: String,
    #[serde(default)]
    pub media_type: Option<ChatMediaType>,
    #[serde(default)]
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatMessage {
    pub user_id: Id,
    pub username: String,
    pub user_role: Role,
    pub user_full_name: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    pub message: String,
    #[serde(default)]
    pub media_type: Option<ChatMediaType>,
    #[serde(default)]
    pub media_url: Option<String>,
}

// ── Ads ─────────────────────────────────────────────────────────────────────

/// Placement slot(s) an ad targets. Older files store a single string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdSpace {
    One(String),
    Many(Vec<String>),
}

impl AdSpace {
    pub fn contains(&self, slot: &str) -> bool {
        match self {
            AdSpace::One(s) => s == slot,
            AdSpace::Many(slots) => slots.iter().any(|s| s == slot),
        }
    }

    pub fn slots(&self) -> Vec<&str> {
        match self {
            AdSpace::One(s) => vec![s.as_str()],
            AdSpace::Many(slots) => slots.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for AdSpace {
    fn from(slot: &str) -> Self {
        AdSpace::One(slot.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub id: Id,
    pub name: String,
    pub ad_space: AdSpace,
    pub media_type: AdMediaType,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub html_content: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
    pub is_active: bool,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub views: u64,
    pub created_by: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ad {
    /// Active, started, and not yet expired at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.start_date <= now && self.end_date.is_none_or(|end| end > now)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAd {
    pub name: String,
    pub ad_space: AdSpace,
    pub media_type: AdMediaType,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub html_content: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
    pub is_active: bool,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub created_by: Id,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdPatch {
    pub name: Option<String>,
    pub ad_space: Option<AdSpace>,
    pub media_type: Option<AdMediaType>,
    #[serde(deserialize_with = "present")]
    pub media_url: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub html_content: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub link_url: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub start_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "present")]
    pub end_date: Option<Option<DateTime<Utc>>>,
}

impl AdPatch {
    pub fn apply(self, ad: &mut Ad) {
        if let Some(v) = self.name {
            ad.name = v;
        }
        if let Some(v) = self.ad_space {
            ad.ad_space = v;
        }
        if let Some(v) = self.media_type {
            ad.media_type = v;
        }
        if let Some(v) = self.media_url {
            ad.media_url = v;
        }
        if let Some(v) = self.html_content {
            ad.html_content = v;
        }
        if let Some(v) = self.link_url {
            ad.link_url = v;
        }
        if let Some(v) = self.is_active {
            ad.is_active = v;
        }
        if let Some(v) = self.start_date {
            ad.start_date = v;
        }
        if let Some(v) = self.end_date {
            ad.end_date = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdFilter {
    pub ad_space: Option<String>,
    pub is_active: Option<bool>,
}

impl AdFilter {
    pub fn matches(&self, ad: &Ad) -> bool {
        self.ad_space.as_deref().is_none_or(|slot| ad.ad_space.contains(slot))
            && self.is_active.is_none_or(|active| ad.is_active == active)
    }
}

// ── Live streams ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStream {
    pub id: Id,
    pub stream_url: String,
    #[serde(default)]
    pub viewer_count: u64,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: StreamStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLiveStream {
    pub stream_url: String,
    #[serde(default)]
    pub viewer_count: u64,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: StreamStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveStreamPatch {
    pub stream_url: Option<String>,
    pub viewer_count: Option<u64>,
    #[serde(deserialize_with = "present")]
    pub start_time: Option<Option<DateTime<Utc>>>,
    pub status: Option<StreamStatus>,
}

impl LiveStreamPatch {
    pub fn apply(self, stream: &mut LiveStream) {
        if let Some(v) = self.stream_url {
            stream.stream_url = v;
        }
        if let Some(v) = self.viewer_count {
            stream.viewer_count = v;
        }
        if let Some(v) = self.start_time {
            stream.start_time = v;
        }
        if let Some(v) = self.status {
            stream.status = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LiveStreamFilter {
    pub status: Option<StreamStatus>,
}

// ── Newsletter ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSubscriber {
    pub id: Id,
    pub email: String,
    pub daily: bool,
    pub breaking: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub email: String,
    #[serde(default = "enabled")]
    pub daily: bool,
    #[serde(default = "enabled")]
    pub breaking: bool,
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubscriberFilter {
    pub active: Option<bool>,
    pub daily: Option<bool>,
    pub breaking: Option<bool>,
}

impl SubscriberFilter {
    pub fn matches(&self, sub: &NewsletterSubscriber) -> bool {
        self.active.is_none_or(|v| sub.active == v)
            && self.daily.is_none_or(|v| sub.daily == v)
            && self.breaking.is_none_or(|v| sub.breaking == v)
    }
}

// ── Settings ────────────────────────────────────────────────────────────────

/// Site-wide singleton record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub site_name: String,
    pub tagline: String,
    #[serde(default)]
    pub logo: String,
    pub primary_color: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub site_name: Option<String>,
    pub tagline: Option<String>,
    pub logo: Option<String>,
    pub primary_color: Option<String>,
    pub categories: Option<Vec<String>>,
}

impl SettingsPatch {
    pub fn apply(self, settings: &mut Settings) {
        if let Some(v) = self.site_name {
            settings.site_name = v;
        }
        if let Some(v) = self.tagline {
            settings.tagline = v;
        }
        if let Some(v) = self.logo {
            settings.logo = v;
        }
        if let Some(v) = self.primary_color {
            settings.primary_color = v;
        }
        if let Some(v) = self.categories {
            settings.categories = v;
        }
    }
}

// ── Derived views ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_users: usize,
    pub total_articles: usize,
    pub total_comments: usize,
    pub published_articles: usize,
    pub draft_articles: usize,
    pub total_views: u64,
    pub total_chat_messages: usize,
    pub total_ads: usize,
    pub active_ads: usize,
}
