//! Shared fixtures for the cross-crate tests in `tests/`.

use std::path::Path;

use nh_core::{Id, NewArticle, NewComment, Store};
use nh_db_json::JsonFileRepository;

/// Opens a store over the JSON files in `dir`, as the binary does.
pub fn open_store(dir: &Path) -> anyhow::Result<Store> {
    Ok(Store::open(Box::new(JsonFileRepository::open(dir)?)))
}

pub fn article(title: &str, author_id: Id) -> NewArticle {
    NewArticle {
        title: title.to_string(),
        content: format!("{title}. Full story to follow."),
        category: "World".to_string(),
        author: "Sarah Johnson".to_string(),
        author_id,
        ..Default::default()
    }
}

pub fn comment(article_id: Id, content: &str) -> NewComment {
    NewComment {
        article_id,
        user_id: None,
        username: "guest".to_string(),
        content: content.to_string(),
    }
}

/// Reads a collection file straight from disk.
pub fn read_file(dir: &Path, name: &str) -> serde_json::Value {
    let raw = std::fs::read_to_string(dir.join(name)).unwrap_or_else(|e| panic!("{name}: {e}"));
    serde_json::from_str(&raw).unwrap_or_else(|e| panic!("{name}: {e}"))
}
