//! First-run data, used when a collection has never been written.

use chrono::{DateTime, Duration, Utc};

use crate::models::*;

// Default accounts; passwords are admin123 / reporter123 / user123.
const SUPERADMIN_HASH: &str = "$2a$10$3eNuiXBYIN/5n9k0mhEz8.k89gc6LZOpPyxRrvpEwR5zuxUWCK7kO";
const REPORTER_HASH: &str = "$2a$10$UN2KWQ23T1i4anQ2ovkOdOlyz7Dvss494kh6KaMRShvhhA2Xg2uji";
const USER_HASH: &str = "$2a$10$ZHJezfRo13v5kIzPchNdY.HlM0Wi0CWybUvlm9RbwYo60144Pbkdi";

const HERO_IMAGE: &str = "https://images.unsplash.com/photo-1504711434969-e33886168f5c?w=800";
const AI_IMAGE: &str = "https://images.unsplash.com/photo-1677442136019-21780ecad995?w=800";
const SAMPLE_VIDEO: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

fn user(id: Id, username: &str, hash: &str, role: Role, full_name: &str, now: DateTime<Utc>) -> User {
    User {
        id,
        username: username.to_string(),
        password: hash.to_string(),
        role,
        email: format!("{username}@newshub.com"),
        full_name: Some(full_name.to_string()),
        profile_picture: None,
        created_at: now,
    }
}

pub fn users(now: DateTime<Utc>) -> Vec<User> {
    vec![
        user(1, "superadmin", SUPERADMIN_HASH, Role::Superadmin, "Admin Team", now),
        user(2, "reporter", REPORTER_HASH, Role::Reporter, "Sarah Johnson", now),
        user(3, "user", USER_HASH, Role::User, "Regular User", now),
    ]
}

pub fn articles(now: DateTime<Utc>) -> Vec<Article> {
    let two_hours_ago = now - Duration::hours(2);
    let five_hours_ago = now - Duration::hours(5);
    vec![
        Article {
            id: 1,
            title: "Breaking: Major Political Development".into(),
            content: "In a dramatic turn of events, political leaders announce major policy changes..."
                .into(),
            category: "Political".into(),
            author: "Sarah Johnson".into(),
            author_id: 2,
            image_url: Some(HERO_IMAGE.into()),
            media_type: MediaType::Image,
            media_url: Some(HERO_IMAGE.into()),
            status: ArticleStatus::Published,
            views: 1250,
            tags: vec!["politics".into(), "breaking".into()],
            style: HeroStyle::default(),
            created_at: two_hours_ago,
            updated_at: two_hours_ago,
        },
        Article {
            id: 2,
            title: "Technology Breakthrough in AI Research".into(),
            content: "Scientists announce groundbreaking developments in artificial intelligence..."
                .into(),
            category: "Technology".into(),
            author: "Michael Chen".into(),
            author_id: 2,
            image_url: Some(AI_IMAGE.into()),
            media_type: MediaType::Video,
            media_url: Some(SAMPLE_VIDEO.into()),
            status: ArticleStatus::Published,
            views: 890,
            tags: vec!["ai".into(), "technology".into()],
            style: HeroStyle::default(),
            created_at: five_hours_ago,
            updated_at: five_hours_ago,
        },
    ]
}

pub fn comments(now: DateTime<Utc>) -> Vec<Comment> {
    vec![Comment {
        id: 1,
        article_id: 1,
        user_id: Some(3),
        username: "user".into(),
        content: "Very interesting article! Thanks for sharing.".into(),
        created_at: now - Duration::hours(1),
    }]
}

fn ticker(id: Id, author: &User, message: &str, at: DateTime<Utc>) -> ChatMessage {
    ChatMessage {
        id,
        user_id: author.id,
        username: author.username.clone(),
        user_role: author.role,
        user_full_name: author.full_name.clone().unwrap_or_default(),
        profile_picture: None,
        message: message.to_string(),
        media_type: None,
        media_url: None,
        created_at: at,
    }
}

pub fn chat_messages(now: DateTime<Utc>) -> Vec<ChatMessage> {
    let staff = users(now);
    let (admin, reporter) = (&staff[0], &staff[1]);
    vec![
        ticker(
            1,
            reporter,
            "Breaking: Major event unfolding at the capital!",
            now - Duration::minutes(30),
        ),
        ticker(
            2,
            reporter,
            "Live updates: Press conference starting in 10 minutes",
            now - Duration::minutes(15),
        ),
        ticker(3, admin, "Stay tuned for exclusive coverage!", now - Duration::minutes(5)),
    ]
}

pub fn ads(now: DateTime<Utc>) -> Vec<Ad> {
    vec![Ad {
        id: 1,
        name: "Example Top Banner Ad".into(),
        ad_space: AdSpace::from("top-banner"),
        media_type: AdMediaType::Html,
        media_url: None,
        html_content: Some(
            "<div class=\"promo\"><h3>Special Offer - 50% OFF!</h3><p>Limited time offer</p>\
             <a href=\"https://example.com\" target=\"_blank\">Shop Now</a></div>"
                .into(),
        ),
        link_url: Some("https://example.com".into()),
        is_active: true,
        start_date: now,
        end_date: None,
        clicks: 0,
        views: 0,
        created_by: 1,
        created_at: now,
        updated_at: now,
    }]
}

pub fn settings() -> Settings {
    Settings {
        site_name: "MebratuGobeze".into(),
        tagline: "Breaking News 24/7".into(),
        logo: String::new(),
        primary_color: "#d32028".into(),
        categories: [
            "Breaking",
            "Political",
            "World",
            "Technology",
            "Sports",
            "Business",
            "Entertainment",
            "Health",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    }
}

impl Default for Settings {
    fn default() -> Self {
        settings()
    }
}
