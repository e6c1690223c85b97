use chrono::Utc;

use super::{allocate, Store};
use crate::models::{Id, Reaction, ReactionAction, ReactionCounts, ReactionOutcome, ReactionType};
use crate::traits::Collection;

impl Store {
    pub fn get_article_reactions(&self, article_id: Id) -> Vec<Reaction> {
        self.reactions
            .iter()
            .filter(|r| r.article_id == article_id)
            .cloned()
            .collect()
    }

    pub fn get_user_reaction(&self, article_id: Id, session_id: &str) -> Option<Reaction> {
        self.reactions
            .iter()
            .find(|r| r.article_id == article_id && r.session_id == session_id)
            .cloned()
    }

    /// Toggles a session's reaction on an article.
    ///
    /// No reaction yet adds one; repeating the same type removes it; a
    /// different type replaces it in place. A (article, session) pair never
    /// owns more than one row.
    pub fn add_or_update_reaction(
        &mut self,
        article_id: Id,
        session_id: &str,
        kind: ReactionType,
    ) -> ReactionOutcome {
        let existing = self
            .reactions
            .iter()
            .position(|r| r.article_id == article_id && r.session_id == session_id);

        let action = match existing {
            Some(index) if self.reactions[index].kind == kind => {
                self.reactions.remove(index);
                self.persist(&[Collection::Reactions]);
                ReactionAction::Removed
            }
            Some(index) => {
                let reaction = &mut self.reactions[index];
                reaction.kind = kind;
                reaction.created_at = Utc::now();
                self.persist(&[Collection::Reactions]);
                ReactionAction::Updated
            }
            None => {
                let reaction = Reaction {
                    id: allocate(&mut self.counters.next_reaction_id),
                    article_id,
                    session_id: session_id.to_string(),
                    kind,
                    created_at: Utc::now(),
                };
                self.reactions.push(reaction);
                self.persist(&[Collection::Reactions, Collection::Counters]);
                ReactionAction::Added
            }
        };

        ReactionOutcome { action, kind }
    }

    pub fn get_reaction_counts(&self, article_id: Id) -> ReactionCounts {
        self.reactions
            .iter()
            .filter(|r| r.article_id == article_id)
            .fold(ReactionCounts::default(), |mut counts, r| {
                match r.kind {
                    ReactionType::Like => counts.likes += 1,
                    ReactionType::Dislike => counts.dislikes += 1,
                }
                counts
            })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::empty_store;
    use super::*;

    fn outcome(action: ReactionAction, kind: ReactionType) -> ReactionOutcome {
        ReactionOutcome { action, kind }
    }

    #[test]
    fn same_type_twice_toggles_off() {
        let (mut store, _repo) = empty_store();
        assert_eq!(
            store.add_or_update_reaction(1, "s-1", ReactionType::Like),
            outcome(ReactionAction::Added, ReactionType::Like)
        );
        assert_eq!(
            store.add_or_update_reaction(1, "s-1", ReactionType::Like),
            outcome(ReactionAction::Removed, ReactionType::Like)
        );
        assert!(store.get_user_reaction(1, "s-1").is_none());
    }

    #[test]
    fn switching_type_updates_the_single_row() {
        let (mut store, _repo) = empty_store();
        store.add_or_update_reaction(1, "s-1", ReactionType::Like);
        let added = store.get_user_reaction(1, "s-1").unwrap();

        assert_eq!(
            store.add_or_update_reaction(1, "s-1", ReactionType::Dislike),
            outcome(ReactionAction::Updated, ReactionType::Dislike)
        );

        let rows = store.get_article_reactions(1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, added.id);
        assert_eq!(rows[0].kind, ReactionType::Dislike);
    }

    #[test]
    fn sessions_and_articles_are_independent() {
        let (mut store, _repo) = empty_store();
        store.add_or_update_reaction(1, "s-1", ReactionType::Like);
        store.add_or_update_reaction(1, "s-2", ReactionType::Like);
        store.add_or_update_reaction(1, "s-3", ReactionType::Dislike);
        store.add_or_update_reaction(2, "s-1", ReactionType::Dislike);

        assert_eq!(store.get_reaction_counts(1), ReactionCounts { likes: 2, dislikes: 1 });
        assert_eq!(store.get_reaction_counts(2), ReactionCounts { likes: 0, dislikes: 1 });
        assert_eq!(store.get_reaction_counts(3), ReactionCounts::default());
    }
}
