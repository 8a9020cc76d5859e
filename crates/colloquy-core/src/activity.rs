//! Activity records logged into conversation transcripts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// What kind of conversation event an [`Activity`] records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// A message sent by a user or the assistant.
    Message,
    /// A non-message event (member joined, reaction, ...).
    Event,
    /// A typing indicator.
    Typing,
    /// The conversation was ended by a participant.
    EndOfConversation,
}

/// A single logged event within a conversation.
///
/// `id`, `channel_id`, `conversation_id` and `timestamp` are the fields the
/// transcript store keys and orders on; everything else is opaque payload
/// carried for the dispatch layer. Pagination assumes `id` values are unique
/// within one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Unique identifier for this activity.
    pub id: String,
    /// The channel the conversation belongs to.
    pub channel_id: String,
    /// The conversation this activity belongs to.
    pub conversation_id: String,
    /// What kind of event this activity records.
    pub kind: ActivityKind,
    /// Identifier of the participant that produced the activity.
    pub from_id: Option<String>,
    /// Message text, for [`ActivityKind::Message`] activities.
    pub text: Option<String>,
    /// UTC timestamp of when the activity occurred.
    pub timestamp: DateTime<Utc>,
    /// Arbitrary key-value metadata attached to the activity.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Activity {
    /// Creates a new activity in the given channel and conversation.
    pub fn new(channel_id: impl Into<String>, conversation_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            channel_id: channel_id.into(),
            conversation_id: conversation_id.into(),
            kind: ActivityKind::Message,
            from_id: None,
            text: None,
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Creates a message activity with the given text.
    pub fn message(
        channel_id: impl Into<String>,
        conversation_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(channel_id, conversation_id)
        }
    }

    /// Creates an event activity of the given kind.
    pub fn event(
        channel_id: impl Into<String>,
        conversation_id: impl Into<String>,
        kind: ActivityKind,
    ) -> Self {
        Self {
            kind,
            ..Self::new(channel_id, conversation_id)
        }
    }
}
