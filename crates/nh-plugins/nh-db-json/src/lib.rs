//! # nh-db-json Implementation
//!
//! Backs the store with one pretty-printed JSON document per collection in
//! a data directory. Each write goes to a sibling `.tmp` file first and is
//! then renamed over the target, so a reader never sees half a document.

use anyhow::{Context, Result};
use nh_core::traits::{Collection, Repository};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    /// Opens `dir`, creating it when missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }
}

impl Repository for JsonFileRepository {
    fn load(&self, collection: Collection) -> Result<Option<Value>> {
        let path = self.path_of(collection);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let body = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(body))
    }

    fn save(&self, collection: Collection, body: &Value) -> Result<()> {
        let path = self.path_of(collection);
        let temp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(body)?;

        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!(path = %path.display(), "collection written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nh_core::{ArticleFilter, NewArticle, Store};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_none() {
        let tmp = TempDir::new().unwrap();
        let repo = JsonFileRepository::open(tmp.path().join("nested/data")).unwrap();
        assert!(repo.dir().is_dir());
        assert!(repo.load(Collection::Ads).unwrap().is_none());
    }

    #[test]
    fn save_writes_pretty_json_without_leftovers() {
        let tmp = TempDir::new().unwrap();
        let repo = JsonFileRepository::open(tmp.path()).unwrap();
        let body = json!([{ "id": 1, "streamUrl": "rtmp://live/main" }]);

        repo.save(Collection::LiveStreams, &body).unwrap();

        let raw = fs::read_to_string(tmp.path().join("livestreams.json")).unwrap();
        assert!(raw.contains("\n  "), "expected indented output: {raw}");
        assert_eq!(repo.load(Collection::LiveStreams).unwrap(), Some(body));
        assert!(!tmp.path().join("livestreams.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("articles.json"), "[{ not json").unwrap();
        let repo = JsonFileRepository::open(tmp.path()).unwrap();
        let err = repo.load(Collection::Articles).unwrap_err();
        assert!(format!("{err:#}").contains("articles.json"));
    }

    #[test]
    fn store_survives_restart() {
        let tmp = TempDir::new().unwrap();
        let created = {
            let mut store = Store::open(Box::new(JsonFileRepository::open(tmp.path()).unwrap()));
            store.create_article(NewArticle {
                title: "Budget passes".into(),
                author_id: 2,
                ..Default::default()
            })
        };

        let store = Store::open(Box::new(JsonFileRepository::open(tmp.path()).unwrap()));
        assert_eq!(store.get_article_by_id(created.id), Some(created));
        assert_eq!(store.get_all_articles(&ArticleFilter::default()).len(), 3);
        assert_eq!(store.counters().next_article_id, 4);
    }
}
