//! Adapters — one per chat front-end, converging on the canonical schema.
//!
//! Each adapter validates an interface-specific raw message and converts
//! it into a `(ChannelContext, CanonicalMessage)` pair. The
//! [`router::AdapterRouter`] detects which adapter applies to an inbound
//! message and dispatches to it.

use serde_json::Value;
use thiserror::Error;

use crate::schema::{CanonicalMessage, ChannelContext};

pub mod electron;
pub mod router;
pub mod slack;

/// Adapter and router errors.
///
/// These indicate malformed caller input and are surfaced, never retried.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A required field was absent from the raw message. Carries the
    /// first missing field's name.
    #[error("missing required field: {0}")]
    MissingField(String),
    /// The message failed the adapter's validation.
    #[error("invalid message format for {source_tag} adapter")]
    InvalidMessage {
        /// Source tag of the adapter that rejected the message.
        source_tag: String,
    },
    /// No adapter is registered for the requested source tag.
    #[error("unknown message source: {0}")]
    UnknownSource(String),
}

/// A chat front-end adapter.
///
/// `validate` is non-throwing so a router can pre-filter without error
/// handling; `adapt` fails with a typed error on malformed input.
pub trait Adapter: Send + Sync {
    /// Convert a raw front-end message into the canonical pair.
    ///
    /// `context` carries pre-existing channel context when an upstream
    /// integration already produced one; adapters that cannot enrich it
    /// pass it through unchanged.
    fn adapt(
        &self,
        raw: &Value,
        context: Option<&ChannelContext>,
    ) -> Result<(ChannelContext, CanonicalMessage), AdapterError>;

    /// Check whether the raw message has the fields this adapter requires.
    fn validate(&self, raw: &Value) -> bool;

    /// Source tag of the front-end this adapter handles.
    fn interface_name(&self) -> &str;
}

/// Extract a string field from a raw message, `None` when absent or not
/// a string.
pub(crate) fn str_field<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str)
}

/// Extract a list of file references from a raw message's `files` field.
///
/// Accepts either plain strings or objects with an `id`, `url` or `name`
/// key, matching what the front-ends actually send. Unrecognized entries
/// are dropped.
pub(crate) fn file_refs(raw: &Value) -> Vec<String> {
    let Some(files) = raw.get("files").and_then(Value::as_array) else {
        return Vec::new();
    };
    files
        .iter()
        .filter_map(|f| {
            if let Some(s) = f.as_str() {
                return Some(s.to_owned());
            }
            for key in ["id", "url", "name"] {
                if let Some(s) = f.get(key).and_then(Value::as_str) {
                    return Some(s.to_owned());
                }
            }
            None
        })
        .collect()
}
