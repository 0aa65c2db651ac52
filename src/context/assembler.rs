//! Context assembler — fans out to every registered source, gathers the
//! fragments, and concatenates them into one labeled context string.
//!
//! Sources run concurrently, each under its own timeout; a failing or
//! slow source never cancels or delays the others. The concatenation
//! order always matches registration order, regardless of which source
//! finishes first. An empty result means "no context available" and is
//! not an error.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::context::{ContextRequest, ContextSource, ContextSourceError};

/// Assembles context fragments from an ordered list of sources.
pub struct ContextAssembler {
    sources: Vec<Arc<dyn ContextSource>>,
    source_timeout: Duration,
}

impl ContextAssembler {
    /// Assembler with no sources and the given per-source timeout.
    pub fn new(source_timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            source_timeout,
        }
    }

    /// Append a source. Registration order determines output order.
    pub fn add_source(&mut self, source: Arc<dyn ContextSource>) {
        debug!(source = source.source_name(), "added context source");
        self.sources.push(source);
    }

    /// Remove all sources with the given name.
    pub fn remove_source(&mut self, source_name: &str) {
        self.sources.retain(|s| s.source_name() != source_name);
        debug!(source = source_name, "removed context source");
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Names of registered sources, in registration order.
    pub fn source_names(&self) -> Vec<String> {
        self.sources
            .iter()
            .map(|s| s.source_name().to_owned())
            .collect()
    }

    /// Assemble context from all available sources.
    ///
    /// Returns the labeled fragments joined by blank lines, or an empty
    /// string when no source contributes — the caller must treat that as
    /// "no context available", not as a failure.
    pub async fn assemble(&self, request: &ContextRequest) -> String {
        if self.sources.is_empty() {
            warn!("no context sources configured");
            return String::new();
        }

        let request = Arc::new(request.clone());

        // Fan out one task per available source, keeping registration
        // order in the handle list.
        let mut pending: Vec<(String, tokio::task::JoinHandle<_>)> = Vec::new();
        for source in &self.sources {
            let name = source.source_name().to_owned();
            if !source.is_available() {
                debug!(source = %name, "source not available, skipping");
                continue;
            }
            let source = Arc::clone(source);
            let request = Arc::clone(&request);
            let timeout = self.source_timeout;
            let handle = tokio::spawn(async move {
                query_source(source.as_ref(), &request, timeout).await
            });
            pending.push((name, handle));
        }

        // Gather in registration order; completion order is irrelevant.
        let mut parts: Vec<String> = Vec::new();
        let mut contributed: Vec<String> = Vec::new();
        let mut failed: Vec<String> = Vec::new();
        for (name, handle) in pending {
            match handle.await {
                Ok(Ok(fragment)) if !fragment.trim().is_empty() => {
                    parts.push(format!("## Context from {}", title_case(&name)));
                    parts.push(fragment);
                    contributed.push(name);
                }
                Ok(Ok(_)) => {
                    debug!(source = %name, "source returned empty context");
                }
                Ok(Err(e)) => {
                    warn!(source = %name, error = %e, "context source error");
                    failed.push(name);
                }
                Err(e) => {
                    // Panicked or aborted source task.
                    error!(source = %name, error = %e, "unexpected context source failure");
                    failed.push(name);
                }
            }
        }

        if !contributed.is_empty() {
            info!(
                sources = contributed.join(","),
                "assembled context"
            );
        }
        if !failed.is_empty() {
            warn!(sources = failed.join(","), "sources contributed nothing");
        }

        if parts.is_empty() {
            debug!("no context assembled from any source");
            return String::new();
        }

        parts.join("\n\n")
    }
}

/// Query one source under its timeout boundary.
async fn query_source(
    source: &dyn ContextSource,
    request: &ContextRequest,
    timeout: Duration,
) -> Result<String, ContextSourceError> {
    let started = Instant::now();
    match tokio::time::timeout(timeout, source.get_context(request)).await {
        Ok(result) => result,
        Err(_) => Err(ContextSourceError::Timeout {
            source_name: source.source_name().to_owned(),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

/// Uppercase the first letter of each whitespace-separated word.
fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
