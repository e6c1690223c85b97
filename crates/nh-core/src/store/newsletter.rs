use chrono::Utc;

use super::{allocate, Store};
use crate::models::{NewSubscription, NewsletterSubscriber, SubscriberFilter};
use crate::traits::Collection;

impl Store {
    /// Subscribes `email`, or refreshes and re-activates an existing
    /// subscription for it. Email addresses stay unique.
    pub fn subscribe_newsletter(&mut self, new: NewSubscription) -> NewsletterSubscriber {
        let now = Utc::now();
        if let Some(existing) = self.subscribers.iter_mut().find(|s| s.email == new.email) {
            existing.daily = new.daily;
            existing.breaking = new.breaking;
            existing.active = true;
            existing.updated_at = now;
            let updated = existing.clone();
            self.persist(&[Collection::Newsletter]);
            return updated;
        }

        let subscriber = NewsletterSubscriber {
            id: allocate(&mut self.counters.next_newsletter_subscriber_id),
            email: new.email,
            daily: new.daily,
            breaking: new.breaking,
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.subscribers.push(subscriber.clone());
        self.persist(&[Collection::Newsletter, Collection::Counters]);
        subscriber
    }

    /// Marks the subscription inactive; `false` when `email` is unknown.
    pub fn unsubscribe_newsletter(&mut self, email: &str) -> bool {
        let Some(subscriber) = self.subscribers.iter_mut().find(|s| s.email == email) else {
            return false;
        };
        subscriber.active = false;
        subscriber.updated_at = Utc::now();
        self.persist(&[Collection::Newsletter]);
        true
    }

    /// Matching subscribers in storage order.
    pub fn get_all_newsletter_subscribers(&self, filter: &SubscriberFilter) -> Vec<NewsletterSubscriber> {
        self.subscribers
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::empty_store;
    use super::*;

    fn subscription(email: &str, daily: bool) -> NewSubscription {
        NewSubscription {
            email: email.into(),
            daily,
            breaking: true,
        }
    }

    #[test]
    fn resubscribing_updates_instead_of_duplicating() {
        let (mut store, _repo) = empty_store();
        let first = store.subscribe_newsletter(subscription("a@example.com", true));
        assert!(store.unsubscribe_newsletter("a@example.com"));

        let again = store.subscribe_newsletter(subscription("a@example.com", false));
        assert_eq!(again.id, first.id);
        assert!(again.active);
        assert!(!again.daily);
        assert_eq!(store.get_all_newsletter_subscribers(&SubscriberFilter::default()).len(), 1);
    }

    #[test]
    fn filters_by_flags() {
        let (mut store, _repo) = empty_store();
        store.subscribe_newsletter(subscription("a@example.com", true));
        store.subscribe_newsletter(subscription("b@example.com", false));
        store.unsubscribe_newsletter("b@example.com");
        assert!(!store.unsubscribe_newsletter("nobody@example.com"));

        let active = SubscriberFilter {
            active: Some(true),
            ..Default::default()
        };
        let daily_inactive = SubscriberFilter {
            active: Some(false),
            daily: Some(false),
            ..Default::default()
        };
        let emails = |f: &SubscriberFilter| -> Vec<String> {
            store
                .get_all_newsletter_subscribers(f)
                .into_iter()
                .map(|s| s.email)
                .collect()
        };
        assert_eq!(emails(&active), vec!["a@example.com"]);
        assert_eq!(emails(&daily_inactive), vec!["b@example.com"]);
    }
}
