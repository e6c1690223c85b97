use chrono::Utc;

use super::{allocate, newest_first, remove_where, Store};
use crate::models::{Id, LiveStream, LiveStreamFilter, LiveStreamPatch, NewLiveStream};
use crate::traits::Collection;

impl Store {
    pub fn get_all_live_streams(&self, filter: &LiveStreamFilter) -> Vec<LiveStream> {
        let matching = self
            .live_streams
            .iter()
            .filter(|s| filter.status.is_none_or(|status| s.status == status))
            .cloned()
            .collect();
        newest_first(matching, |s| s.created_at)
    }

    pub fn get_live_stream_by_id(&self, id: Id) -> Option<LiveStream> {
        self.live_streams.iter().find(|s| s.id == id).cloned()
    }

    pub fn create_live_stream(&mut self, new: NewLiveStream) -> LiveStream {
        let now = Utc::now();
        let stream = LiveStream {
            id: allocate(&mut self.counters.next_live_stream_id),
            stream_url: new.stream_url,
            viewer_count: new.viewer_count,
            start_time: new.start_time,
            status: new.status,
            created_at: now,
            updated_at: now,
        };
        self.live_streams.push(stream.clone());
        self.persist(&[Collection::LiveStreams, Collection::Counters]);
        stream
    }

    pub fn update_live_stream(&mut self, id: Id, patch: LiveStreamPatch) -> Option<LiveStream> {
        let stream = self.live_streams.iter_mut().find(|s| s.id == id)?;
        patch.apply(stream);
        stream.updated_at = Utc::now();
        let updated = stream.clone();
        self.persist(&[Collection::LiveStreams]);
        Some(updated)
    }

    pub fn delete_live_stream(&mut self, id: Id) -> bool {
        let removed = remove_where(&mut self.live_streams, |s| s.id == id);
        if removed {
            self.persist(&[Collection::LiveStreams]);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::empty_store;
    use super::*;
    use crate::models::StreamStatus;

    fn stream(url: &str, status: StreamStatus) -> NewLiveStream {
        NewLiveStream {
            stream_url: url.into(),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn lifecycle_and_status_filter() {
        let (mut store, _repo) = empty_store();
        let live = store.create_live_stream(stream("rtmp://live/main", StreamStatus::Active));
        store.create_live_stream(stream("rtmp://live/later", StreamStatus::Scheduled));
        assert_eq!(store.get_live_stream_by_id(live.id), Some(live.clone()));

        let active = LiveStreamFilter {
            status: Some(StreamStatus::Active),
        };
        assert_eq!(store.get_all_live_streams(&active).len(), 1);
        assert_eq!(store.get_all_live_streams(&LiveStreamFilter::default()).len(), 2);

        let ended = store
            .update_live_stream(
                live.id,
                LiveStreamPatch {
                    status: Some(StreamStatus::Ended),
                    viewer_count: Some(120),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(ended.stream_url, "rtmp://live/main");
        assert_eq!(ended.viewer_count, 120);
        assert!(store.get_all_live_streams(&active).is_empty());

        assert!(store.update_live_stream(999, LiveStreamPatch::default()).is_none());
        assert!(store.delete_live_stream(live.id));
        assert!(!store.delete_live_stream(live.id));
    }
}
