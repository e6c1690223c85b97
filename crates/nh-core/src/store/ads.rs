use chrono::{DateTime, Utc};

use super::{allocate, newest_first, remove_where, Store};
use crate::models::{Ad, AdFilter, AdPatch, Id, NewAd};
use crate::traits::Collection;

impl Store {
    /// Ads matching the filter, newest first.
    pub fn get_all_ads(&self, filter: &AdFilter) -> Vec<Ad> {
        let matching = self.ads.iter().filter(|a| filter.matches(a)).cloned().collect();
        newest_first(matching, |a| a.created_at)
    }

    pub fn get_ad_by_id(&self, id: Id) -> Option<Ad> {
        self.ads.iter().find(|a| a.id == id).cloned()
    }

    /// The first ad in storage order that is live in `slot` right now.
    pub fn get_active_ad_by_space(&self, slot: &str) -> Option<Ad> {
        self.get_active_ad_by_space_at(slot, Utc::now())
    }

    pub fn get_active_ad_by_space_at(&self, slot: &str, now: DateTime<Utc>) -> Option<Ad> {
        self.ads
            .iter()
            .find(|a| a.ad_space.contains(slot) && a.is_live_at(now))
            .cloned()
    }

    pub fn create_ad(&mut self, new: NewAd) -> Ad {
        let now = Utc::now();
        let ad = Ad {
            id: allocate(&mut self.counters.next_ad_id),
            name: new.name,
            ad_space: new.ad_space,
            media_type: new.media_type,
            media_url: new.media_url,
            html_content: new.html_content,
            link_url: new.link_url,
            is_active: new.is_active,
            start_date: new.start_date,
            end_date: new.end_date,
            clicks: 0,
            views: 0,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        };
        self.ads.push(ad.clone());
        self.persist(&[Collection::Ads, Collection::Counters]);
        ad
    }

    pub fn update_ad(&mut self, id: Id, patch: AdPatch) -> Option<Ad> {
        let ad = self.ads.iter_mut().find(|a| a.id == id)?;
        patch.apply(ad);
        ad.updated_at = Utc::now();
        let updated = ad.clone();
        self.persist(&[Collection::Ads]);
        Some(updated)
    }

    pub fn delete_ad(&mut self, id: Id) -> bool {
        let removed = remove_where(&mut self.ads, |a| a.id == id);
        if removed {
            self.persist(&[Collection::Ads]);
        }
        removed
    }

    pub fn increment_ad_views(&mut self, id: Id) -> bool {
        self.bump_ad(id, |ad| ad.views += 1)
    }

    pub fn increment_ad_clicks(&mut self, id: Id) -> bool {
        self.bump_ad(id, |ad| ad.clicks += 1)
    }

    fn bump_ad(&mut self, id: Id, bump: impl FnOnce(&mut Ad)) -> bool {
        let Some(ad) = self.ads.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        bump(ad);
        self.persist(&[Collection::Ads]);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::empty_store;
    use super::*;
    use crate::models::{AdMediaType, AdSpace};
    use chrono::Duration;

    fn banner(name: &str, space: AdSpace, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> NewAd {
        NewAd {
            name: name.into(),
            ad_space: space,
            media_type: AdMediaType::Image,
            media_url: Some(format!("/uploads/{name}.png")),
            html_content: None,
            link_url: None,
            is_active: true,
            start_date: start,
            end_date: end,
            created_by: 1,
        }
    }

    #[test]
    fn expired_ads_are_never_served() {
        let (mut store, _repo) = empty_store();
        let now = Utc::now();
        store.create_ad(banner(
            "expired",
            "top-banner".into(),
            now - Duration::days(10),
            Some(now - Duration::days(1)),
        ));
        assert!(store.get_active_ad_by_space_at("top-banner", now).is_none());

        let open_ended = store.create_ad(banner("open", "top-banner".into(), now - Duration::hours(1), None));
        assert_eq!(
            store.get_active_ad_by_space_at("top-banner", now).map(|a| a.id),
            Some(open_ended.id)
        );
    }

    #[test]
    fn inactive_or_future_ads_are_skipped() {
        let (mut store, _repo) = empty_store();
        let now = Utc::now();
        let paused = store.create_ad(banner("paused", "sidebar".into(), now - Duration::hours(1), None));
        store.update_ad(
            paused.id,
            AdPatch {
                is_active: Some(false),
                ..Default::default()
            },
        );
        store.create_ad(banner("later", "sidebar".into(), now + Duration::hours(1), None));
        assert!(store.get_active_ad_by_space_at("sidebar", now).is_none());
    }

    #[test]
    fn first_live_ad_in_storage_order_wins_across_multi_slot_ads() {
        let (mut store, _repo) = empty_store();
        let now = Utc::now();
        let multi = store.create_ad(banner(
            "multi",
            AdSpace::Many(vec!["sidebar".into(), "article-top".into()]),
            now - Duration::hours(2),
            Some(now + Duration::days(3)),
        ));
        store.create_ad(banner("single", "article-top".into(), now - Duration::hours(1), None));

        assert_eq!(store.get_active_ad_by_space_at("article-top", now).unwrap().id, multi.id);
        assert_eq!(store.get_active_ad_by_space_at("sidebar", now).unwrap().id, multi.id);
        assert!(store.get_active_ad_by_space_at("popup-ad", now).is_none());
        assert_eq!(store.get_active_ad_by_space("sidebar").unwrap().id, multi.id);
    }

    #[test]
    fn filters_counters_and_clearing_end_date() {
        let (mut store, _repo) = empty_store();
        let now = Utc::now();
        let ad = store.create_ad(banner(
            "promo",
            AdSpace::Many(vec!["sidebar".into(), "popup-ad".into()]),
            now,
            Some(now + Duration::days(1)),
        ));
        assert_eq!((ad.clicks, ad.views), (0, 0));

        assert!(store.increment_ad_views(ad.id));
        assert!(store.increment_ad_clicks(ad.id));
        assert!(!store.increment_ad_clicks(999));

        let cleared = store
            .update_ad(
                ad.id,
                AdPatch {
                    end_date: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(cleared.end_date, None);
        assert_eq!((cleared.clicks, cleared.views), (1, 1));
        assert_eq!(cleared.name, "promo");

        let popup = AdFilter {
            ad_space: Some("popup-ad".into()),
            is_active: Some(true),
        };
        assert_eq!(store.get_all_ads(&popup).len(), 1);
        let inactive = AdFilter {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(store.get_all_ads(&inactive).is_empty());

        assert!(store.delete_ad(ad.id));
        assert!(store.get_ad_by_id(ad.id).is_none());
    }

    #[test]
    fn created_ad_reads_back_and_unknown_update_changes_nothing() {
        let (mut store, repo) = empty_store();
        let now = Utc::now();
        let ad = store.create_ad(banner("house", "sidebar".into(), now, None));
        assert_eq!(store.get_ad_by_id(ad.id), Some(ad.clone()));

        let before = repo.stored(Collection::Ads);
        let patch = AdPatch {
            name: Some("renamed".into()),
            ..Default::default()
        };
        assert!(store.update_ad(999, patch).is_none());
        assert_eq!(repo.stored(Collection::Ads), before);
        assert_eq!(store.get_all_ads(&AdFilter::default()), vec![ad]);
    }
}
