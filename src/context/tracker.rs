//! Task-tracker context source — mocked pending the real integration.
//!
//! Keyword-matches the query against three fixed categories and returns
//! canned blocks per matched category. The mock sits behind the same
//! [`ContextSource`] seam the live client will use, so swapping it in
//! requires no assembler changes.

use async_trait::async_trait;
use tracing::debug;

use crate::context::{ContextRequest, ContextSource, ContextSourceError};

/// Keywords that select the tasks block.
const TASK_KEYWORDS: [&str; 4] = ["task", "work", "todo", "progress"];

/// Keywords that select the projects block.
const PROJECT_KEYWORDS: [&str; 3] = ["project", "work item", "feature"];

/// Keywords that select the users block.
const USER_KEYWORDS: [&str; 4] = ["user", "team", "person", "who"];

/// Context from the external task tracker.
///
/// Mocked: returns structured sample data shaped like the tracker API's
/// responses, selected by keyword match on the query.
#[derive(Debug, Default)]
pub struct TrackerSource {
    api_key: Option<String>,
}

impl TrackerSource {
    /// Mocked source; `api_key` is held for the future live client.
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    /// Whether a live API credential is configured.
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn mocked_context(query: &str) -> String {
        let query = query.to_lowercase();
        let matched = |keywords: &[&str]| keywords.iter().any(|k| query.contains(k));

        let mut parts: Vec<&str> = Vec::new();

        if matched(&TASK_KEYWORDS) {
            parts.push(
                "## Tracker Tasks (Mocked)\n\
                 - Task: Implement context assembly (in-progress)\n\
                 - Task: Design persona system (pending)\n\
                 - Task: Create adapter layer (pending)",
            );
        }
        if matched(&PROJECT_KEYWORDS) {
            parts.push(
                "## Tracker Projects (Mocked)\n\
                 - Project: Chat Integration (active)\n\
                 - Project: Context Injection (in-progress)",
            );
        }
        if matched(&USER_KEYWORDS) {
            parts.push(
                "## Tracker Users (Mocked)\n\
                 - User: Developer (active)\n\
                 - User: Business Analyst (active)",
            );
        }

        parts.join("\n")
    }
}

#[async_trait]
impl ContextSource for TrackerSource {
    async fn get_context(&self, request: &ContextRequest) -> Result<String, ContextSourceError> {
        let context = Self::mocked_context(&request.query);
        if context.is_empty() {
            debug!("no tracker category matched query");
        } else {
            debug!(chars = context.len(), "retrieved mocked tracker context");
        }
        Ok(context)
    }

    fn source_name(&self) -> &str {
        "tracker"
    }

    // Always true while mocked; the live client will probe connectivity.
    fn is_available(&self) -> bool {
        true
    }
}
