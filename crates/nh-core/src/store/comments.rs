use chrono::Utc;

use super::{allocate, newest_first, remove_where, Store};
use crate::models::{Comment, Id, NewComment};
use crate::traits::Collection;

impl Store {
    /// Comments on one article, newest first.
    pub fn get_comments_by_article_id(&self, article_id: Id) -> Vec<Comment> {
        let comments = self
            .comments
            .iter()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect();
        newest_first(comments, |c| c.created_at)
    }

    pub fn get_comment_by_id(&self, id: Id) -> Option<Comment> {
        self.comments.iter().find(|c| c.id == id).cloned()
    }

    pub fn create_comment(&mut self, new: NewComment) -> Comment {
        let comment = Comment {
            id: allocate(&mut self.counters.next_comment_id),
            article_id: new.article_id,
            user_id: new.user_id,
            username: new.username,
            content: new.content,
            created_at: Utc::now(),
        };
        self.comments.push(comment.clone());
        self.persist(&[Collection::Comments, Collection::Counters]);
        comment
    }

    pub fn delete_comment(&mut self, id: Id) -> bool {
        let removed = remove_where(&mut self.comments, |c| c.id == id);
        if removed {
            self.persist(&[Collection::Comments]);
        }
        removed
    }
}
