//! Slack adapter — pass-through for the existing Slack integration.
//!
//! Slack messages already match the canonical field set, so this adapter
//! preserves any channel context produced upstream and otherwise
//! synthesizes a minimal public-channel context from the message alone.

use serde_json::Value;
use tracing::debug;

use crate::adapters::{file_refs, str_field, Adapter, AdapterError};
use crate::schema::{CanonicalMessage, ChannelContext, ChannelKind};

/// Adapter for Slack messages.
///
/// Expected raw shape: `{text, user, channel, ts, thread_ts?, files?}`.
#[derive(Debug, Default)]
pub struct SlackAdapter;

impl SlackAdapter {
    /// Create the adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Adapter for SlackAdapter {
    fn adapt(
        &self,
        raw: &Value,
        context: Option<&ChannelContext>,
    ) -> Result<(ChannelContext, CanonicalMessage), AdapterError> {
        if !self.validate(raw) {
            let missing = if raw.get("channel").is_none() {
                "channel"
            } else {
                "user"
            };
            return Err(AdapterError::MissingField(missing.to_owned()));
        }

        let user_id = str_field(raw, "user").unwrap_or_default().to_owned();
        let channel_id = str_field(raw, "channel").unwrap_or_default().to_owned();

        let message = CanonicalMessage {
            user_id,
            // Slack payloads carry the user id only; the display name is
            // enriched upstream when available.
            user_name: str_field(raw, "user_name").unwrap_or_default().to_owned(),
            text: str_field(raw, "text").unwrap_or_default().to_owned(),
            channel_id: channel_id.clone(),
            message_timestamp: str_field(raw, "ts").unwrap_or_default().to_owned(),
            thread_id: str_field(raw, "thread_ts")
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
            attachments: file_refs(raw),
            source: "slack".to_owned(),
        };

        // Upstream context wins; it may carry a richer member roster and
        // history than the message alone can provide.
        let context = match context {
            Some(existing) => existing.clone(),
            None => ChannelContext::minimal(&channel_id, ChannelKind::PublicChannel),
        };

        debug!(user_id = %message.user_id, "passed through slack message");
        Ok((context, message))
    }

    fn validate(&self, raw: &Value) -> bool {
        raw.get("channel").is_some() && raw.get("user").is_some()
    }

    fn interface_name(&self) -> &str {
        "slack"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MemberDescriptor;
    use serde_json::json;

    fn valid_message() -> Value {
        json!({
            "text": "deploy is done",
            "user": "U123",
            "channel": "C456",
            "ts": "1717171717.000100",
        })
    }

    #[test]
    fn adapt_without_context_synthesizes_public_channel() {
        let (ctx, msg) = SlackAdapter::new()
            .adapt(&valid_message(), None)
            .expect("should adapt");

        assert_eq!(msg.user_id, "U123");
        assert_eq!(msg.channel_id, "C456");
        assert_eq!(msg.text, "deploy is done");
        assert_eq!(msg.message_timestamp, "1717171717.000100");
        assert_eq!(msg.source, "slack");

        assert_eq!(ctx.channel_id, "C456");
        assert_eq!(ctx.channel_name, "C456");
        assert_eq!(ctx.channel_type, ChannelKind::PublicChannel);
        assert!(ctx.members.is_empty());
        assert!(ctx.recent_messages.is_empty());
    }

    #[test]
    fn adapt_preserves_upstream_context_unchanged() {
        let upstream = ChannelContext {
            channel_id: "C456".to_owned(),
            channel_name: "#deploys".to_owned(),
            channel_type: ChannelKind::PublicChannel,
            members: vec![MemberDescriptor {
                user_id: "U123".to_owned(),
                user_name: "kay".to_owned(),
                display_name: "Kay".to_owned(),
            }],
            recent_messages: Vec::new(),
        };

        let (ctx, _) = SlackAdapter::new()
            .adapt(&valid_message(), Some(&upstream))
            .expect("should adapt");
        assert_eq!(ctx, upstream);
    }

    #[test]
    fn validate_requires_channel_and_user() {
        let adapter = SlackAdapter::new();
        assert!(adapter.validate(&valid_message()));
        assert!(!adapter.validate(&json!({"user": "U123"})));
        assert!(!adapter.validate(&json!({"channel": "C456"})));
    }

    #[test]
    fn adapt_rejects_message_without_user() {
        let err = SlackAdapter::new()
            .adapt(&json!({"channel": "C456"}), None)
            .expect_err("should fail");
        assert!(matches!(err, AdapterError::MissingField(f) if f == "user"));
    }

    #[test]
    fn thread_ts_maps_to_thread_id() {
        let mut raw = valid_message();
        raw["thread_ts"] = json!("1717171000.000001");
        let (_, msg) = SlackAdapter::new().adapt(&raw, None).expect("should adapt");
        assert_eq!(msg.thread_id.as_deref(), Some("1717171000.000001"));
    }

    #[test]
    fn missing_text_is_empty_string() {
        let raw = json!({"user": "U1", "channel": "C1", "ts": "1"});
        let (_, msg) = SlackAdapter::new().adapt(&raw, None).expect("should adapt");
        assert_eq!(msg.text, "");
    }
}
