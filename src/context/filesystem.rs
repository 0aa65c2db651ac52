//! Filesystem context source — wraps the memory-retrieval collaborator.
//!
//! Normalizes the retriever's no-results sentinel to an empty string so
//! downstream assembly treats "nothing found" uniformly regardless of
//! source, and degrades any retriever error to an empty contribution.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::context::{ContextRequest, ContextSource, ContextSourceError};
use crate::memory::{MemoryRetriever, NO_RESULTS};

/// Context from the memory store on disk.
pub struct FilesystemSource {
    retriever: Arc<dyn MemoryRetriever>,
}

impl FilesystemSource {
    /// Source backed by the given retriever.
    pub fn new(retriever: Arc<dyn MemoryRetriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl ContextSource for FilesystemSource {
    async fn get_context(&self, request: &ContextRequest) -> Result<String, ContextSourceError> {
        let result = self
            .retriever
            .retrieve(
                &request.query,
                request.channel.as_ref(),
                request.message.as_ref(),
            )
            .await;

        match result {
            Ok(text) if text == NO_RESULTS => {
                debug!("no memories found");
                Ok(String::new())
            }
            Ok(text) => {
                debug!(chars = text.len(), "retrieved filesystem memories");
                Ok(text)
            }
            Err(e) => {
                // Degrade to no contribution rather than failing assembly.
                error!(error = %e, "memory retrieval failed");
                Ok(String::new())
            }
        }
    }

    fn source_name(&self) -> &str {
        "filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CanonicalMessage, ChannelContext};

    struct FixedRetriever(anyhow::Result<String>);

    #[async_trait]
    impl MemoryRetriever for FixedRetriever {
        async fn retrieve(
            &self,
            _query: &str,
            _channel: Option<&ChannelContext>,
            _message: Option<&CanonicalMessage>,
        ) -> anyhow::Result<String> {
            match &self.0 {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }
    }

    #[tokio::test]
    async fn passes_through_retriever_text() {
        let source = FilesystemSource::new(Arc::new(FixedRetriever(Ok("remembered".to_owned()))));
        let ctx = source
            .get_context(&ContextRequest::for_query("q"))
            .await
            .expect("context");
        assert_eq!(ctx, "remembered");
    }

    #[tokio::test]
    async fn normalizes_sentinel_to_empty() {
        let source = FilesystemSource::new(Arc::new(FixedRetriever(Ok(NO_RESULTS.to_owned()))));
        let ctx = source
            .get_context(&ContextRequest::for_query("q"))
            .await
            .expect("context");
        assert_eq!(ctx, "");
    }

    #[tokio::test]
    async fn retriever_error_degrades_to_empty() {
        let source = FilesystemSource::new(Arc::new(FixedRetriever(Err(anyhow::anyhow!(
            "disk on fire"
        )))));
        let ctx = source
            .get_context(&ContextRequest::for_query("q"))
            .await
            .expect("context");
        assert_eq!(ctx, "");
    }

    #[test]
    fn source_name_and_availability() {
        let source = FilesystemSource::new(Arc::new(FixedRetriever(Ok(String::new()))));
        assert_eq!(source.source_name(), "filesystem");
        assert!(source.is_available());
    }
}
