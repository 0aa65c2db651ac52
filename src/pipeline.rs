//! Message pipeline — the composition root tying the layers together.
//!
//! Adapt an inbound raw message, assemble context for it, inject the
//! persona overlay into the base instructions, and hand the result to
//! the agent-invocation boundary. The pipeline owns its collaborators
//! and is constructed once, then passed down — no global registries.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::adapters::router::AdapterRouter;
use crate::adapters::AdapterError;
use crate::context::assembler::ContextAssembler;
use crate::context::ContextRequest;
use crate::persona::injector::PersonaInjector;
use crate::schema::{CanonicalMessage, ChannelContext};

/// Everything the downstream agent needs for one invocation.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedInvocation {
    /// Correlation id for logs.
    pub request_id: Uuid,
    /// When the invocation was prepared.
    pub prepared_at: DateTime<Utc>,
    /// Channel the triggering message arrived on.
    pub channel: ChannelContext,
    /// The triggering message.
    pub message: CanonicalMessage,
    /// Assembled context, empty when no source contributed.
    pub context: String,
    /// Base instructions with the persona overlay applied.
    pub prompt: String,
}

/// The agent-invocation boundary.
///
/// Consumed contract only: the agent protocol itself lives elsewhere.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    /// Invoke the agent with a prepared invocation, returning its reply.
    async fn invoke(&self, invocation: &PreparedInvocation) -> anyhow::Result<String>;
}

/// Orchestrates adapt → assemble → inject → invoke for one message.
pub struct MessagePipeline {
    router: AdapterRouter,
    assembler: ContextAssembler,
    injector: PersonaInjector,
    agent: Arc<dyn AgentInvoker>,
    base_prompt: String,
    default_persona: Option<String>,
}

impl MessagePipeline {
    /// Pipeline over explicitly constructed collaborators.
    pub fn new(
        router: AdapterRouter,
        assembler: ContextAssembler,
        injector: PersonaInjector,
        agent: Arc<dyn AgentInvoker>,
    ) -> Self {
        Self {
            router,
            assembler,
            injector,
            agent,
            base_prompt: String::new(),
            default_persona: None,
        }
    }

    /// Set the base instructions the persona overlay is appended to.
    pub fn with_base_prompt(mut self, base_prompt: &str) -> Self {
        self.base_prompt = base_prompt.to_owned();
        self
    }

    /// Set the persona applied when a message carries no override.
    pub fn with_default_persona(mut self, persona: Option<String>) -> Self {
        self.default_persona = persona;
        self
    }

    /// Adapt a raw message and assemble its agent invocation.
    ///
    /// `persona` overrides the configured default for this message only.
    /// Adapter failures surface to the caller; context-source failures
    /// have already been absorbed by the assembler.
    pub async fn prepare(
        &self,
        raw: &Value,
        upstream_context: Option<&ChannelContext>,
        persona: Option<&str>,
    ) -> Result<PreparedInvocation, AdapterError> {
        let request_id = Uuid::new_v4();
        let (channel, message) = self.router.adapt_message(raw, upstream_context, None)?;
        debug!(%request_id, source = %message.source, "adapted inbound message");

        let persona = persona
            .map(str::to_owned)
            .or_else(|| self.default_persona.clone());

        let request = ContextRequest {
            query: message.text.clone(),
            channel: Some(channel.clone()),
            message: Some(message.clone()),
            persona: persona.clone(),
        };
        let context = self.assembler.assemble(&request).await;

        let prompt = self
            .injector
            .inject(&self.base_prompt, persona.as_deref(), None);

        info!(
            %request_id,
            user_id = %message.user_id,
            context_chars = context.len(),
            "prepared agent invocation"
        );

        Ok(PreparedInvocation {
            request_id,
            prepared_at: Utc::now(),
            channel,
            message,
            context,
            prompt,
        })
    }

    /// Run the full pipeline: prepare, then invoke the agent.
    pub async fn run(
        &self,
        raw: &Value,
        upstream_context: Option<&ChannelContext>,
        persona: Option<&str>,
    ) -> anyhow::Result<String> {
        let invocation = self.prepare(raw, upstream_context, persona).await?;
        let reply = self.agent.invoke(&invocation).await?;
        info!(request_id = %invocation.request_id, "agent replied");
        Ok(reply)
    }

    /// The router, for source inspection.
    pub fn router(&self) -> &AdapterRouter {
        &self.router
    }

    /// The assembler, for source inspection.
    pub fn assembler(&self) -> &ContextAssembler {
        &self.assembler
    }
}
