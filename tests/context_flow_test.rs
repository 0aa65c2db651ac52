//! Integration tests for context assembly — real sources wired into the
//! assembler, and the full pipeline from raw message to prepared
//! invocation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use switchboard::adapters::router::AdapterRouter;
use switchboard::context::assembler::ContextAssembler;
use switchboard::context::filesystem::FilesystemSource;
use switchboard::context::persona::PersonaContextSource;
use switchboard::context::tracker::TrackerSource;
use switchboard::context::{ContextRequest, ContextSource, ContextSourceError};
use switchboard::memory::FileMemoryStore;
use switchboard::persona::injector::PersonaInjector;
use switchboard::persona::manager::PersonaManager;
use switchboard::pipeline::{AgentInvoker, MessagePipeline, PreparedInvocation};

const CONCISE_YAML: &str = "name: concise\n\
display_name: Concise\n\
communication_style: terse\n\
tone: dry\n\
prompt_overlay: Answer in one sentence.\n";

#[tokio::test]
async fn tracker_query_with_task_keywords_mentions_tasks() {
    let mut assembler = ContextAssembler::new(Duration::from_secs(5));
    assembler.add_source(Arc::new(TrackerSource::new(None)));

    let out = assembler
        .assemble(&ContextRequest::for_query("what tasks are pending"))
        .await;
    assert!(out.contains("Tasks"), "expected Tasks block in: {out}");
    assert!(out.contains("## Context from Tracker"));
}

#[tokio::test]
async fn tracker_query_without_keywords_is_empty() {
    let mut assembler = ContextAssembler::new(Duration::from_secs(5));
    assembler.add_source(Arc::new(TrackerSource::new(None)));

    let out = assembler
        .assemble(&ContextRequest::for_query("good morning"))
        .await;
    assert_eq!(out, "");
}

#[tokio::test]
async fn filesystem_and_tracker_sections_follow_registration_order() {
    let memory_dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        memory_dir.path().join("standup.md"),
        "The team reviews progress every Monday.",
    )
    .expect("write");

    let mut assembler = ContextAssembler::new(Duration::from_secs(5));
    let store = FileMemoryStore::new(memory_dir.path());
    assembler.add_source(Arc::new(FilesystemSource::new(Arc::new(store))));
    assembler.add_source(Arc::new(TrackerSource::new(None)));

    let out = assembler
        .assemble(&ContextRequest::for_query("task progress this week"))
        .await;

    let filesystem = out.find("## Context from Filesystem").expect("filesystem");
    let tracker = out.find("## Context from Tracker").expect("tracker");
    assert!(filesystem < tracker);
    assert!(out.contains("reviews progress"));
}

struct ExplodingSource;

#[async_trait]
impl ContextSource for ExplodingSource {
    async fn get_context(&self, _request: &ContextRequest) -> Result<String, ContextSourceError> {
        Err(ContextSourceError::Unavailable("backend gone".to_owned()))
    }

    fn source_name(&self) -> &str {
        "exploding"
    }
}

#[tokio::test]
async fn failing_source_does_not_spoil_assembly() {
    let mut assembler = ContextAssembler::new(Duration::from_secs(5));
    assembler.add_source(Arc::new(ExplodingSource));
    assembler.add_source(Arc::new(TrackerSource::new(None)));

    let out = assembler
        .assemble(&ContextRequest::for_query("todo list"))
        .await;
    assert!(out.contains("## Context from Tracker"));
    assert!(!out.contains("exploding"));
}

struct CapturingAgent;

#[async_trait]
impl AgentInvoker for CapturingAgent {
    async fn invoke(&self, invocation: &PreparedInvocation) -> anyhow::Result<String> {
        Ok(format!("seen:{}", invocation.message.user_id))
    }
}

fn full_pipeline(
    personas: &std::path::Path,
    memories: &std::path::Path,
    default_persona: Option<String>,
) -> MessagePipeline {
    let manager = Arc::new(PersonaManager::new(personas));
    let mut assembler = ContextAssembler::new(Duration::from_secs(5));
    let store = FileMemoryStore::new(memories);
    assembler.add_source(Arc::new(FilesystemSource::new(Arc::new(store))));
    assembler.add_source(Arc::new(TrackerSource::new(None)));
    assembler.add_source(Arc::new(PersonaContextSource::new(
        Arc::clone(&manager),
        default_persona.clone(),
    )));
    let injector = PersonaInjector::new(manager);
    MessagePipeline::new(AdapterRouter::new(), assembler, injector, Arc::new(CapturingAgent))
        .with_base_prompt("You are the team assistant.")
        .with_default_persona(default_persona)
}

#[tokio::test]
async fn pipeline_end_to_end_from_electron_message() {
    let personas = tempfile::tempdir().expect("tempdir");
    std::fs::write(personas.path().join("concise.yaml"), CONCISE_YAML).expect("write");
    let memories = tempfile::tempdir().expect("tempdir");

    let pipeline = full_pipeline(
        personas.path(),
        memories.path(),
        Some("concise".to_owned()),
    );

    let raw = json!({
        "text": "what tasks are pending",
        "userId": "u1",
        "userName": "Ann",
        "channelId": "c1",
    });
    let invocation = pipeline.prepare(&raw, None, None).await.expect("prepare");

    // Tracker and persona both contribute; the persona overlay also
    // lands in the prompt.
    assert!(invocation.context.contains("## Context from Tracker"));
    assert!(invocation.context.contains("## Context from Persona"));
    assert!(invocation.context.contains("Answer in one sentence."));
    assert!(invocation.prompt.starts_with("You are the team assistant."));
    assert!(invocation.prompt.contains("<persona>"));

    let reply = pipeline.run(&raw, None, None).await.expect("run");
    assert_eq!(reply, "seen:u1");
}

#[tokio::test]
async fn pipeline_with_no_contributions_yields_empty_context() {
    let personas = tempfile::tempdir().expect("tempdir");
    let memories = tempfile::tempdir().expect("tempdir");
    let pipeline = full_pipeline(personas.path(), memories.path(), None);

    let raw = json!({
        "text": "good morning",
        "userId": "u1",
        "userName": "Ann",
        "channelId": "c1",
    });
    let invocation = pipeline.prepare(&raw, None, None).await.expect("prepare");
    assert_eq!(invocation.context, "");
    assert_eq!(invocation.prompt, "You are the team assistant.");
}
