//! Electron/Web adapter — desktop and browser front-end messages.
//!
//! The Electron transport carries no conversation history or member
//! roster, so the produced channel context is a direct-message channel
//! with the sender as its only member and an empty recent-message list.

use serde_json::Value;
use tracing::debug;

use crate::adapters::{file_refs, str_field, Adapter, AdapterError};
use crate::schema::{
    CanonicalMessage, ChannelContext, ChannelKind, MemberDescriptor,
};

/// Fields an Electron message must carry.
const REQUIRED_FIELDS: [&str; 4] = ["text", "userId", "userName", "channelId"];

/// Adapter for the Electron desktop app and the web UI.
///
/// Expected raw shape:
/// `{text, userId, userName, channelId, timestamp?, threadId?, files?}`.
#[derive(Debug, Default)]
pub struct ElectronAdapter;

impl ElectronAdapter {
    /// Create the adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Adapter for ElectronAdapter {
    fn adapt(
        &self,
        raw: &Value,
        _context: Option<&ChannelContext>,
    ) -> Result<(ChannelContext, CanonicalMessage), AdapterError> {
        // Fail on the first missing required field, before building anything.
        for field in REQUIRED_FIELDS {
            if raw.get(field).is_none() {
                return Err(AdapterError::MissingField(field.to_owned()));
            }
        }

        let text = str_field(raw, "text").unwrap_or_default().to_owned();
        let user_id = str_field(raw, "userId").unwrap_or_default().to_owned();
        let user_name = str_field(raw, "userName").unwrap_or_default().to_owned();
        let channel_id = str_field(raw, "channelId").unwrap_or_default().to_owned();
        let timestamp = str_field(raw, "timestamp").unwrap_or_default().to_owned();
        // Absent or empty thread id stays None, never "".
        let thread_id = str_field(raw, "threadId")
            .filter(|t| !t.is_empty())
            .map(str::to_owned);

        let message = CanonicalMessage {
            user_id: user_id.clone(),
            user_name: user_name.clone(),
            text,
            channel_id: channel_id.clone(),
            message_timestamp: timestamp,
            thread_id,
            attachments: file_refs(raw),
            source: "electron".to_owned(),
        };

        // Electron supplies no channel roster or history: a DM with the
        // sender as the single member.
        let context = ChannelContext {
            channel_id: channel_id.clone(),
            channel_name: channel_id,
            channel_type: ChannelKind::DirectMessage,
            members: vec![MemberDescriptor {
                user_id: user_id.clone(),
                user_name: user_name.clone(),
                display_name: user_name,
            }],
            recent_messages: Vec::new(),
        };

        debug!(user_id, "adapted electron message");
        Ok((context, message))
    }

    fn validate(&self, raw: &Value) -> bool {
        REQUIRED_FIELDS.iter().all(|f| raw.get(*f).is_some())
    }

    fn interface_name(&self) -> &str {
        "electron"
    }
}
