//! Context sources — independently-failing origins of agent context.
//!
//! Defines the [`ContextSource`] trait and the shared request/error
//! types used by all source implementations. Sources are assembled into
//! a single context string by the [`assembler::ContextAssembler`].
//!
//! Three sources are implemented:
//! - [`filesystem::FilesystemSource`] — memory-retrieval collaborator
//! - [`tracker::TrackerSource`] — external task tracker (mocked)
//! - [`persona::PersonaContextSource`] — persona overlay

use async_trait::async_trait;
use thiserror::Error;

use crate::schema::{CanonicalMessage, ChannelContext};

pub mod assembler;
pub mod filesystem;
pub mod persona;
pub mod tracker;

/// One assembly request, shared by every source it fans out to.
///
/// Owned and cloneable so concurrent source tasks can each hold a copy.
#[derive(Debug, Clone, Default)]
pub struct ContextRequest {
    /// The search query, usually the user's message text.
    pub query: String,
    /// Channel context of the triggering message, when known.
    pub channel: Option<ChannelContext>,
    /// The triggering message itself, when known.
    pub message: Option<CanonicalMessage>,
    /// Per-request persona override; sources that don't use personas
    /// ignore it.
    pub persona: Option<String>,
}

impl ContextRequest {
    /// Request carrying only a query.
    pub fn for_query(query: &str) -> Self {
        Self {
            query: query.to_owned(),
            ..Self::default()
        }
    }
}

/// Errors a context source may surface to the assembler.
///
/// The assembler catches these, logs them, and continues with the other
/// sources; they never abort an assembly.
#[derive(Debug, Error)]
pub enum ContextSourceError {
    /// The source's backing dependency is unreachable.
    #[error("context source unavailable: {0}")]
    Unavailable(String),
    /// The source did not answer within its per-source deadline.
    #[error("context source {source_name} timed out after {elapsed_ms}ms")]
    Timeout {
        /// Name of the source that timed out.
        source_name: String,
        /// Time spent waiting, in milliseconds.
        elapsed_ms: u64,
    },
}

/// An origin of context for agent prompts.
///
/// Sources catch their own internal errors and degrade to an empty
/// string; only [`ContextSourceError`] conditions propagate, and the
/// assembler absorbs those too.
#[async_trait]
pub trait ContextSource: Send + Sync {
    /// Retrieve this source's context fragment for a request.
    ///
    /// An empty string means "nothing relevant", which is a valid result,
    /// not a failure.
    async fn get_context(&self, request: &ContextRequest) -> Result<String, ContextSourceError>;

    /// Name of this source, used as the fragment heading and in logs.
    fn source_name(&self) -> &str;

    /// Whether the source can currently answer. Unavailable sources are
    /// skipped without being queried.
    fn is_available(&self) -> bool {
        true
    }
}
