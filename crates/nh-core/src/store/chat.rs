use chrono::Utc;

use super::{allocate, newest_first, remove_where, Store};
use crate::models::{ChatMessage, Id, NewChatMessage};
use crate::traits::Collection;

/// Page size the ticker shows when the caller does not ask for one.
pub const DEFAULT_RECENT_LIMIT: usize = 20;

impl Store {
    pub fn get_all_chat_messages(&self) -> Vec<ChatMessage> {
        newest_first(self.chat_messages.clone(), |m| m.created_at)
    }

    pub fn get_recent_chat_messages(&self, limit: usize) -> Vec<ChatMessage> {
        let mut messages = self.get_all_chat_messages();
        messages.truncate(limit);
        messages
    }

    pub fn create_chat_message(&mut self, new: NewChatMessage) -> ChatMessage {
        let message = ChatMessage {
            id: allocate(&mut self.counters.next_chat_message_id),
            user_id: new.user_id,
            username: new.username,
            user_role: new.user_role,
            user_full_name: new.user_full_name,
            profile_picture: new.profile_picture,
            message: new.message,
            media_type: new.media_type,
            media_url: new.media_url,
            created_at: Utc::now(),
        };
        self.chat_messages.push(message.clone());
        self.persist(&[Collection::ChatMessages, Collection::Counters]);
        message
    }

    pub fn delete_chat_message(&mut self, id: Id) -> bool {
        let removed = remove_where(&mut self.chat_messages, |m| m.id == id);
        if removed {
            self.persist(&[Collection::ChatMessages]);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::empty_store;
    use super::*;
    use crate::memory::MemoryRepository;
    use crate::models::{ChatMediaType, Role};

    fn post(text: &str) -> NewChatMessage {
        NewChatMessage {
            user_id: 2,
            username: "reporter".into(),
            user_role: Role::Reporter,
            user_full_name: "Sarah Johnson".into(),
            profile_picture: None,
            message: text.into(),
            media_type: Some(ChatMediaType::Image),
            media_url: Some("/uploads/scene.jpg".into()),
        }
    }

    #[test]
    fn recent_messages_are_newest_first_and_limited() {
        let store = Store::open(Box::new(MemoryRepository::new()));
        let recent = store.get_recent_chat_messages(2);
        assert_eq!(recent.len(), 2);
        // Seeded ticker: id 3 is the newest entry.
        assert_eq!(recent[0].id, 3);
        assert_eq!(recent[1].id, 2);
        assert_eq!(store.get_recent_chat_messages(DEFAULT_RECENT_LIMIT).len(), 3);
    }

    #[test]
    fn create_and_delete() {
        let (mut store, _repo) = empty_store();
        let created = store.create_chat_message(post("Polls close at eight"));
        assert_eq!(store.get_all_chat_messages(), vec![created.clone()]);
        assert!(store.delete_chat_message(created.id));
        assert!(!store.delete_chat_message(created.id));
        assert!(store.get_all_chat_messages().is_empty());
    }
}
