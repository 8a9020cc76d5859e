//! The transcript store contract and its pagination protocol.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use colloquy_core::{Activity, ColloquyResult};
use serde::{Deserialize, Serialize};

/// Maximum number of items returned in a single page.
pub const PAGE_SIZE: usize = 20;

/// A derived summary of one conversation's transcript.
///
/// Transcripts are not stored separately; backends build them on demand from
/// the conversation's activity sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// The channel the conversation belongs to.
    pub channel_id: String,
    /// The conversation id. Doubles as the continuation token when listing.
    pub id: String,
    /// Timestamp of the first activity appended to the conversation, which
    /// is not necessarily the chronologically earliest one.
    pub created: DateTime<Utc>,
}

/// A bounded slice of results plus an optional continuation token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// The items in this page, at most [`PAGE_SIZE`] of them.
    pub items: Vec<T>,
    /// The id of the last returned item, present only when the page is full.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

impl<T> PagedResult<T> {
    /// An empty page with no continuation token.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            continuation_token: None,
        }
    }
}

/// Storage contract for conversation transcripts.
///
/// The four operations below are the store's entire mutation/read surface.
/// [`MemoryTranscriptStore`](crate::MemoryTranscriptStore) is the volatile
/// backend; durable backends must satisfy identical pagination and error
/// semantics, which is why [`paginate_by_id`] lives beside the contract.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Append an activity to its conversation's transcript, creating the
    /// channel and conversation entries if needed.
    async fn log_activity(&self, activity: Activity) -> ColloquyResult<()>;

    /// Load one page of a conversation's activities, sorted ascending by
    /// timestamp and optionally bounded below by `start_date`.
    ///
    /// An unknown channel or conversation yields an empty page, not an
    /// error.
    async fn get_transcript_activities(
        &self,
        channel_id: &str,
        conversation_id: &str,
        continuation_token: Option<&str>,
        start_date: Option<DateTime<Utc>>,
    ) -> ColloquyResult<PagedResult<Activity>>;

    /// Remove a conversation's transcript. Removing an unknown conversation
    /// is a no-op.
    async fn delete_transcript(
        &self,
        channel_id: &str,
        conversation_id: &str,
    ) -> ColloquyResult<()>;

    /// List one page of conversation summaries for a channel, sorted
    /// ascending by creation time.
    ///
    /// An unknown channel yields an empty page, not an error.
    async fn list_transcripts(
        &self,
        channel_id: &str,
        continuation_token: Option<&str>,
    ) -> ColloquyResult<PagedResult<Transcript>>;
}

/// Apply the continuation-token protocol to a filtered, sorted sequence.
///
/// The result window starts immediately after the first element whose id
/// equals the token (or at the beginning, when no token is given or no
/// element matches) and takes up to [`PAGE_SIZE`] elements. A token is
/// reissued exactly when the page is full, even if no further elements
/// exist, so callers must treat a later empty page with no token as a valid
/// end of the sequence.
pub fn paginate_by_id<T>(
    items: Vec<T>,
    continuation_token: Option<&str>,
    id_of: impl Fn(&T) -> &str,
) -> PagedResult<T> {
    let start = continuation_token
        .and_then(|token| items.iter().position(|item| id_of(item) == token))
        .map_or(0, |found| found + 1);

    let page: Vec<T> = items.into_iter().skip(start).take(PAGE_SIZE).collect();
    let continuation_token = if page.len() == PAGE_SIZE {
        page.last().map(|item| id_of(item).to_string())
    } else {
        None
    };

    PagedResult {
        items: page,
        continuation_token,
    }
}
