//! Volatile, in-process transcript storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use colloquy_core::{Activity, ColloquyError, ColloquyResult};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::store::{paginate_by_id, PagedResult, Transcript, TranscriptStore};

/// channel id → conversation id → activities in append order.
type ChannelMap = HashMap<String, HashMap<String, Vec<Activity>>>;

/// In-memory transcript store. Data lives for the process lifetime only.
///
/// One exclusive lock serializes all four operations against the whole
/// structure. Reads run against the live structure rather than a snapshot,
/// so two sequential paginated calls can observe mutations that happened
/// between them; the continuation token is an id, not an index.
#[derive(Default)]
pub struct MemoryTranscriptStore {
    channels: Mutex<ChannelMap>,
}

impl MemoryTranscriptStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn require(value: &str, name: &str) -> ColloquyResult<()> {
    if value.is_empty() {
        return Err(ColloquyError::InvalidArgument(format!("{name} is required")));
    }
    Ok(())
}

#[async_trait]
impl TranscriptStore for MemoryTranscriptStore {
    async fn log_activity(&self, activity: Activity) -> ColloquyResult<()> {
        require(&activity.id, "activity.id")?;
        require(&activity.channel_id, "activity.channel_id")?;
        require(&activity.conversation_id, "activity.conversation_id")?;

        let mut channels = self.channels.lock().await;
        debug!(
            channel = %activity.channel_id,
            conversation = %activity.conversation_id,
            id = %activity.id,
            "activity logged"
        );
        channels
            .entry(activity.channel_id.clone())
            .or_default()
            .entry(activity.conversation_id.clone())
            .or_default()
            .push(activity);
        Ok(())
    }

    async fn get_transcript_activities(
        &self,
        channel_id: &str,
        conversation_id: &str,
        continuation_token: Option<&str>,
        start_date: Option<DateTime<Utc>>,
    ) -> ColloquyResult<PagedResult<Activity>> {
        require(channel_id, "channel_id")?;
        require(conversation_id, "conversation_id")?;

        let channels = self.channels.lock().await;
        let transcript = match channels
            .get(channel_id)
            .and_then(|conversations| conversations.get(conversation_id))
        {
            Some(transcript) => transcript,
            None => return Ok(PagedResult::empty()),
        };

        let mut activities: Vec<Activity> = transcript
            .iter()
            .filter(|a| start_date.map_or(true, |start| a.timestamp >= start))
            .cloned()
            .collect();
        // Stable sort: equal timestamps keep their current append order.
        activities.sort_by_key(|a| a.timestamp);

        Ok(paginate_by_id(activities, continuation_token, |a| &a.id))
    }

    async fn delete_transcript(
        &self,
        channel_id: &str,
        conversation_id: &str,
    ) -> ColloquyResult<()> {
        require(channel_id, "channel_id")?;
        require(conversation_id, "conversation_id")?;

        let mut channels = self.channels.lock().await;
        // The channel entry stays, even when it is left empty.
        if let Some(conversations) = channels.get_mut(channel_id) {
            if conversations.remove(conversation_id).is_some() {
                debug!(
                    channel = %channel_id,
                    conversation = %conversation_id,
                    "transcript deleted"
                );
            }
        }
        Ok(())
    }

    async fn list_transcripts(
        &self,
        channel_id: &str,
        continuation_token: Option<&str>,
    ) -> ColloquyResult<PagedResult<Transcript>> {
        require(channel_id, "channel_id")?;

        let channels = self.channels.lock().await;
        let conversations = match channels.get(channel_id) {
            Some(conversations) => conversations,
            None => return Ok(PagedResult::empty()),
        };

        let mut transcripts: Vec<Transcript> = conversations
            .iter()
            .map(|(id, activities)| Transcript {
                channel_id: channel_id.to_string(),
                id: id.clone(),
                created: activities
                    .first()
                    .map_or(DateTime::<Utc>::UNIX_EPOCH, |a| a.timestamp),
            })
            .collect();
        transcripts.sort_by_key(|t| t.created);

        Ok(paginate_by_id(transcripts, continuation_token, |t| &t.id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_activity(conversation_id: &str, id: &str, offset_secs: i64) -> Activity {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Activity {
            id: id.to_string(),
            timestamp: base + chrono::Duration::seconds(offset_secs),
            ..Activity::message("c1", conversation_id, "hello")
        }
    }

    #[tokio::test]
    async fn test_log_then_get_returns_activity() {
        let store = MemoryTranscriptStore::new();
        store.log_activity(make_activity("v1", "a1", 0)).await.unwrap();

        let page = store
            .get_transcript_activities("c1", "v1", None, None)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "a1");
        assert!(page.continuation_token.is_none());
    }

    #[tokio::test]
    async fn test_unknown_channel_and_conversation_yield_empty_pages() {
        let store = MemoryTranscriptStore::new();
        store.log_activity(make_activity("v1", "a1", 0)).await.unwrap();

        let page = store
            .get_transcript_activities("nope", "v1", None, None)
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert!(page.continuation_token.is_none());

        let page = store
            .get_transcript_activities("c1", "nope", None, None)
            .await
            .unwrap();
        assert!(page.items.is_empty());

        let page = store.list_transcripts("nope", None).await.unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_arguments_rejected_before_mutation() {
        let store = MemoryTranscriptStore::new();

        let mut missing_conversation = make_activity("v1", "a1", 0);
        missing_conversation.conversation_id = String::new();
        let err = store.log_activity(missing_conversation).await.unwrap_err();
        assert!(matches!(err, ColloquyError::InvalidArgument(_)));

        let err = store
            .get_transcript_activities("", "v1", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ColloquyError::InvalidArgument(_)));

        let err = store.delete_transcript("c1", "").await.unwrap_err();
        assert!(matches!(err, ColloquyError::InvalidArgument(_)));

        let err = store.list_transcripts("", None).await.unwrap_err();
        assert!(matches!(err, ColloquyError::InvalidArgument(_)));

        // Nothing was created by the failed log.
        assert!(store.channels.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_keeps_channel_entry() {
        let store = MemoryTranscriptStore::new();
        store.log_activity(make_activity("v1", "a1", 0)).await.unwrap();

        store.delete_transcript("c1", "v1").await.unwrap();
        let page = store
            .get_transcript_activities("c1", "v1", None, None)
            .await
            .unwrap();
        assert!(page.items.is_empty());

        let channels = store.channels.lock().await;
        assert!(channels.contains_key("c1"));
        assert!(channels["c1"].is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_conversation_is_noop() {
        let store = MemoryTranscriptStore::new();
        store.delete_transcript("c1", "v1").await.unwrap();
        store.log_activity(make_activity("v1", "a1", 0)).await.unwrap();
        store.delete_transcript("c1", "other").await.unwrap();

        let page = store
            .get_transcript_activities("c1", "v1", None, None)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_activities_sorted_by_timestamp_not_append_order() {
        let store = MemoryTranscriptStore::new();
        store.log_activity(make_activity("v1", "late", 10)).await.unwrap();
        store.log_activity(make_activity("v1", "early", 0)).await.unwrap();

        let page = store
            .get_transcript_activities("c1", "v1", None, None)
            .await
            .unwrap();
        assert_eq!(page.items[0].id, "early");
        assert_eq!(page.items[1].id, "late");
    }

    #[tokio::test]
    async fn test_equal_timestamps_keep_append_order() {
        let store = MemoryTranscriptStore::new();
        store.log_activity(make_activity("v1", "first", 5)).await.unwrap();
        store.log_activity(make_activity("v1", "second", 5)).await.unwrap();

        let page = store
            .get_transcript_activities("c1", "v1", None, None)
            .await
            .unwrap();
        assert_eq!(page.items[0].id, "first");
        assert_eq!(page.items[1].id, "second");
    }

    #[tokio::test]
    async fn test_transcript_created_is_first_appended_timestamp() {
        let store = MemoryTranscriptStore::new();
        // First append is not the chronologically earliest.
        store.log_activity(make_activity("v1", "a1", 10)).await.unwrap();
        store.log_activity(make_activity("v1", "a2", 0)).await.unwrap();

        let page = store.list_transcripts("c1", None).await.unwrap();
        assert_eq!(page.items.len(), 1);
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(page.items[0].created, base + chrono::Duration::seconds(10));
        assert_eq!(page.items[0].channel_id, "c1");
        assert_eq!(page.items[0].id, "v1");
    }
}
