//! Canonical message schema — the interface-agnostic representation every
//! chat front-end converges to.
//!
//! Adapters produce a `(ChannelContext, CanonicalMessage)` pair; the
//! context assembler and the downstream agent boundary consume it. The
//! types here are constructed only by adapters after validation, so a
//! value that exists is always complete.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Channel context
// ---------------------------------------------------------------------------

/// Conversation type for a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// One-on-one conversation.
    #[serde(rename = "dm")]
    DirectMessage,
    /// Shared channel visible to a workspace.
    PublicChannel,
    /// Browser-based session without a persistent channel.
    WebSession,
}

/// A user participating in a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    /// Stable user identifier.
    pub user_id: String,
    /// Login or handle.
    pub user_name: String,
    /// Name shown in the UI.
    pub display_name: String,
}

/// A prior message in the channel, carried for conversational context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentMessage {
    /// Author of the message.
    pub user_id: String,
    /// Message text.
    pub text: String,
    /// Front-end timestamp, passed through unparsed.
    pub ts: String,
}

/// Canonical description of the channel a message arrived on.
///
/// `channel_id` is always present. Front-ends that supply no member or
/// history data (e.g. Electron) produce empty collections, not absent
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelContext {
    /// Stable channel identifier.
    pub channel_id: String,
    /// Human-readable channel name (falls back to the id).
    pub channel_name: String,
    /// Conversation type.
    pub channel_type: ChannelKind,
    /// Known channel members.
    pub members: Vec<MemberDescriptor>,
    /// Recent channel history, oldest first. May be empty.
    pub recent_messages: Vec<RecentMessage>,
}

impl ChannelContext {
    /// Minimal context for a channel nothing else is known about.
    pub fn minimal(channel_id: &str, channel_type: ChannelKind) -> Self {
        Self {
            channel_id: channel_id.to_owned(),
            channel_name: channel_id.to_owned(),
            channel_type,
            members: Vec::new(),
            recent_messages: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Canonical message
// ---------------------------------------------------------------------------

/// A single inbound message normalized from any front-end.
///
/// `user_id`, `channel_id` and `text` are always present (possibly empty
/// strings); adaptation fails before a partial value is produced.
/// `thread_id` is `None` when the front-end supplied no thread, never an
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMessage {
    /// Sender's stable identifier.
    pub user_id: String,
    /// Sender's display name, empty when the front-end omits it.
    pub user_name: String,
    /// Message body.
    pub text: String,
    /// Channel the message arrived on.
    pub channel_id: String,
    /// Front-end timestamp, passed through unparsed. Empty when absent.
    pub message_timestamp: String,
    /// Thread identifier when the message is a threaded reply.
    pub thread_id: Option<String>,
    /// Attached file references, in the order the front-end listed them.
    pub attachments: Vec<String>,
    /// Origin tag of the adapter that produced this message.
    pub source: String,
}
