//! Adapter router — detects the source of an inbound message and
//! dispatches to the matching adapter.
//!
//! The registry is string-keyed by source tag and owned by the router;
//! a router is constructed once at the composition root and passed down.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::adapters::electron::ElectronAdapter;
use crate::adapters::slack::SlackAdapter;
use crate::adapters::{Adapter, AdapterError};
use crate::schema::{CanonicalMessage, ChannelContext};

/// Routes raw messages to the adapter registered for their source.
pub struct AdapterRouter {
    adapters: HashMap<String, Arc<dyn Adapter>>,
}

impl AdapterRouter {
    /// Router with the built-in slack and electron adapters registered.
    pub fn new() -> Self {
        let mut router = Self {
            adapters: HashMap::new(),
        };
        router.register_adapter("slack", Arc::new(SlackAdapter::new()));
        router.register_adapter("electron", Arc::new(ElectronAdapter::new()));
        router
    }

    /// Register an adapter under a source tag, replacing any previous one.
    pub fn register_adapter(&mut self, source: &str, adapter: Arc<dyn Adapter>) {
        debug!(source, "registered adapter");
        self.adapters.insert(source.to_owned(), adapter);
    }

    /// Detect the source tag of a raw message.
    ///
    /// Order: an explicit `source` field naming a registered adapter wins;
    /// then structural sniffing (`userId`/`userName`/`channelId` is
    /// electron-shaped, `user`/`channel`/`ts` is slack-shaped); otherwise
    /// slack, as the backward-compatible default.
    pub fn detect_source(&self, raw: &Value) -> String {
        if let Some(source) = raw.get("source").and_then(Value::as_str) {
            if self.adapters.contains_key(source) {
                return source.to_owned();
            }
        }

        let has = |key: &str| raw.get(key).is_some();
        if has("userId") && has("userName") && has("channelId") {
            return "electron".to_owned();
        }
        if has("user") && has("channel") && has("ts") {
            return "slack".to_owned();
        }

        warn!("could not detect message source, defaulting to slack");
        "slack".to_owned()
    }

    /// Adapt a raw message into the canonical pair.
    ///
    /// When `source` is `None` the source is detected first. Fails with
    /// [`AdapterError::UnknownSource`] for an unregistered tag and
    /// [`AdapterError::InvalidMessage`] when validation rejects the
    /// message.
    pub fn adapt_message(
        &self,
        raw: &Value,
        context: Option<&ChannelContext>,
        source: Option<&str>,
    ) -> Result<(ChannelContext, CanonicalMessage), AdapterError> {
        let source = match source {
            Some(s) => s.to_owned(),
            None => self.detect_source(raw),
        };

        let adapter = self
            .adapters
            .get(&source)
            .ok_or_else(|| AdapterError::UnknownSource(source.clone()))?;

        if !adapter.validate(raw) {
            return Err(AdapterError::InvalidMessage { source_tag: source });
        }

        let pair = adapter.adapt(raw, context)?;
        debug!(source, "adapted message");
        Ok(pair)
    }

    /// Tags of all registered adapters, sorted.
    pub fn registered_sources(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.adapters.keys().cloned().collect();
        tags.sort();
        tags
    }
}

impl Default for AdapterRouter {
    fn default() -> Self {
        Self::new()
    }
}
