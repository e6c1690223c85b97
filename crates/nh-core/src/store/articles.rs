use chrono::Utc;

use super::{allocate, newest_first, remove_where, Store};
use crate::models::{Article, ArticleFilter, ArticlePatch, Id, NewArticle};
use crate::traits::Collection;

impl Store {
    /// Articles matching every supplied criterion, newest first.
    pub fn get_all_articles(&self, filter: &ArticleFilter) -> Vec<Article> {
        let matching = self
            .articles
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        newest_first(matching, |a| a.created_at)
    }

    pub fn get_article_by_id(&self, id: Id) -> Option<Article> {
        self.articles.iter().find(|a| a.id == id).cloned()
    }

    pub fn create_article(&mut self, new: NewArticle) -> Article {
        let now = Utc::now();
        let article = Article {
            id: allocate(&mut self.counters.next_article_id),
            title: new.title,
            content: new.content,
            category: new.category,
            author: new.author,
            author_id: new.author_id,
            image_url: new.image_url,
            media_type: new.media_type,
            media_url: new.media_url,
            status: new.status,
            views: 0,
            tags: new.tags,
            style: new.style,
            created_at: now,
            updated_at: now,
        };
        self.articles.push(article.clone());
        self.persist(&[Collection::Articles, Collection::Counters]);
        article
    }

    pub fn update_article(&mut self, id: Id, patch: ArticlePatch) -> Option<Article> {
        let article = self.articles.iter_mut().find(|a| a.id == id)?;
        patch.apply(article);
        article.updated_at = Utc::now();
        let updated = article.clone();
        self.persist(&[Collection::Articles]);
        Some(updated)
    }

    /// Removes the article and every comment on it.
    pub fn delete_article(&mut self, id: Id) -> bool {
        if !remove_where(&mut self.articles, |a| a.id == id) {
            return false;
        }
        self.comments.retain(|c| c.article_id != id);
        self.persist(&[Collection::Articles, Collection::Comments]);
        true
    }

    pub fn increment_article_views(&mut self, id: Id) -> Option<Article> {
        let article = self.articles.iter_mut().find(|a| a.id == id)?;
        article.views += 1;
        let updated = article.clone();
        self.persist(&[Collection::Articles]);
        Some(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{draft, empty_store};
    use super::*;
    use crate::models::{ArticleStatus, NewComment};

    #[test]
    fn create_then_get_returns_same_record() {
        let (mut store, _repo) = empty_store();
        let created = store.create_article(draft("Budget vote", "Political", 2));
        assert_eq!(created.views, 0);
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(store.get_article_by_id(created.id), Some(created));
    }

    #[test]
    fn filters_are_conjunctive_and_newest_first() {
        let (mut store, _repo) = empty_store();
        let first = store.create_article(draft("A", "Sports", 2));
        let second = store.create_article(draft("B", "Sports", 3));
        store.create_article(draft("C", "World", 2));
        store.update_article(
            second.id,
            ArticlePatch {
                status: Some(ArticleStatus::Published),
                ..Default::default()
            },
        );

        let sports = store.get_all_articles(&ArticleFilter {
            category: Some("Sports".into()),
            ..Default::default()
        });
        assert_eq!(sports.len(), 2);
        assert!(sports[0].created_at >= sports[1].created_at);

        let mine = store.get_all_articles(&ArticleFilter {
            category: Some("Sports".into()),
            author_id: Some(2),
            status: Some(ArticleStatus::Draft),
        });
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, first.id);

        assert_eq!(store.get_all_articles(&ArticleFilter::default()).len(), 3);
    }

    #[test]
    fn partial_update_keeps_omitted_fields() {
        let (mut store, _repo) = empty_store();
        let created = store.create_article(draft("Old title", "World", 2));
        let updated = store
            .update_article(
                created.id,
                ArticlePatch {
                    title: Some("New title".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.content, created.content);
        assert_eq!(updated.category, "World");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn update_of_missing_article_changes_nothing() {
        let (mut store, repo) = empty_store();
        store.create_article(draft("Only", "World", 2));
        let before = repo.stored(Collection::Articles);

        let patch = ArticlePatch {
            title: Some("ghost".into()),
            ..Default::default()
        };
        assert!(store.update_article(404, patch).is_none());
        assert_eq!(repo.stored(Collection::Articles), before);
        assert_eq!(store.get_all_articles(&ArticleFilter::default()).len(), 1);
    }

    #[test]
    fn delete_cascades_to_comments_of_that_article_only() {
        let (mut store, repo) = empty_store();
        let doomed = store.create_article(draft("Doomed", "World", 2));
        let kept = store.create_article(draft("Kept", "World", 2));
        for article_id in [doomed.id, doomed.id, kept.id] {
            store.create_comment(NewComment {
                article_id,
                user_id: None,
                username: "Anonymous".into(),
                content: "first".into(),
            });
        }

        assert!(store.delete_article(doomed.id));
        assert!(store.get_article_by_id(doomed.id).is_none());
        assert!(store.get_comments_by_article_id(doomed.id).is_empty());
        assert_eq!(store.get_comments_by_article_id(kept.id).len(), 1);
        assert_eq!(repo.stored(Collection::Comments).unwrap().as_array().unwrap().len(), 1);

        assert!(!store.delete_article(doomed.id));
    }

    #[test]
    fn views_only_go_up() {
        let (mut store, _repo) = empty_store();
        let created = store.create_article(draft("Viral", "World", 2));
        store.increment_article_views(created.id);
        let after = store.increment_article_views(created.id).unwrap();
        assert_eq!(after.views, 2);
        assert!(store.increment_article_views(999).is_none());
    }
}
