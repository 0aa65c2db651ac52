#![allow(missing_docs)]

//! Switchboard CLI — adapt messages, assemble context, inspect personas.
//!
//! One-shot subcommands over the integration layer. The HTTP transport
//! and the live agent connection live elsewhere; this binary exercises
//! the core against local configuration.

use std::io::Read as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde_json::Value;

use switchboard::adapters::router::AdapterRouter;
use switchboard::config::SwitchboardConfig;
use switchboard::context::assembler::ContextAssembler;
use switchboard::context::filesystem::FilesystemSource;
use switchboard::context::persona::PersonaContextSource;
use switchboard::context::tracker::TrackerSource;
use switchboard::context::ContextRequest;
use switchboard::memory::FileMemoryStore;
use switchboard::persona::injector::PersonaInjector;
use switchboard::persona::manager::PersonaManager;
use switchboard::pipeline::{AgentInvoker, MessagePipeline, PreparedInvocation};

#[derive(Parser)]
#[command(name = "switchboard", version, about = "Chat integration layer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Adapt a raw front-end message into the canonical schema.
    Adapt {
        /// JSON file with the raw message, or `-` for stdin.
        #[arg(long, default_value = "-")]
        file: String,
        /// Explicit source tag; detected from the message when omitted.
        #[arg(long)]
        source: Option<String>,
    },
    /// Assemble context for a query from the configured sources.
    Assemble {
        /// The search query.
        query: String,
        /// Persona override for this request.
        #[arg(long)]
        persona: Option<String>,
    },
    /// Inspect the persona registry.
    Personas {
        #[command(subcommand)]
        command: PersonaCommand,
    },
    /// Dry-run the full pipeline and print the prepared invocation.
    Prepare {
        /// JSON file with the raw message, or `-` for stdin.
        #[arg(long, default_value = "-")]
        file: String,
        /// Persona override for this request.
        #[arg(long)]
        persona: Option<String>,
    },
}

#[derive(Subcommand)]
enum PersonaCommand {
    /// List loaded persona names.
    List,
    /// Print one persona definition.
    Show {
        /// Persona name.
        name: String,
    },
}

/// Placeholder for the out-of-process agent connection.
///
/// The CLI never invokes the agent; `prepare` stops at the boundary.
struct DisconnectedAgent;

#[async_trait]
impl AgentInvoker for DisconnectedAgent {
    async fn invoke(&self, _invocation: &PreparedInvocation) -> Result<String> {
        anyhow::bail!("no agent connected in CLI mode")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    switchboard::logging::init_cli();
    let config = SwitchboardConfig::load().context("failed to load configuration")?;

    match cli.command {
        Command::Adapt { file, source } => {
            let raw = read_raw_message(&file)?;
            let router = AdapterRouter::new();
            let (channel, message) = router.adapt_message(&raw, None, source.as_deref())?;
            let out = serde_json::json!({"channel": channel, "message": message});
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Assemble { query, persona } => {
            let assembler = build_assembler(&config);
            let mut request = ContextRequest::for_query(&query);
            request.persona = persona.or_else(|| config.persona.default_persona.clone());
            let context = assembler.assemble(&request).await;
            if context.is_empty() {
                eprintln!("(no context available)");
            } else {
                println!("{context}");
            }
        }
        Command::Personas { command } => {
            let manager = PersonaManager::new(Path::new(&config.paths.personas_dir));
            match command {
                PersonaCommand::List => {
                    for name in manager.list_personas() {
                        println!("{name}");
                    }
                }
                PersonaCommand::Show { name } => match manager.get_persona(&name) {
                    Some(persona) => {
                        println!("{}", serde_json::to_string_pretty(persona.as_ref())?);
                    }
                    None => anyhow::bail!("persona not found: {name}"),
                },
            }
        }
        Command::Prepare { file, persona } => {
            let raw = read_raw_message(&file)?;
            let pipeline = build_pipeline(&config);
            let invocation = pipeline.prepare(&raw, None, persona.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&invocation)?);
        }
    }

    Ok(())
}

/// Read a raw message from a JSON file, or stdin when `file` is `-`.
fn read_raw_message(file: &str) -> Result<Value> {
    let contents = if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(file).with_context(|| format!("failed to read {file}"))?
    };
    serde_json::from_str(&contents).context("raw message is not valid JSON")
}

/// Assembler with the default source set: filesystem, tracker, persona.
fn build_assembler(config: &SwitchboardConfig) -> ContextAssembler {
    let manager = Arc::new(PersonaManager::new(Path::new(&config.paths.personas_dir)));
    build_assembler_with(config, manager)
}

fn build_assembler_with(
    config: &SwitchboardConfig,
    manager: Arc<PersonaManager>,
) -> ContextAssembler {
    let mut assembler = ContextAssembler::new(config.assembler.source_timeout());
    let store = FileMemoryStore::new(Path::new(&config.paths.memory_dir));
    assembler.add_source(Arc::new(FilesystemSource::new(Arc::new(store))));
    assembler.add_source(Arc::new(TrackerSource::new(None)));
    assembler.add_source(Arc::new(PersonaContextSource::new(
        manager,
        config.persona.default_persona.clone(),
    )));
    assembler
}

/// Full pipeline over the default source set and the configured personas.
fn build_pipeline(config: &SwitchboardConfig) -> MessagePipeline {
    let manager = Arc::new(PersonaManager::new(Path::new(&config.paths.personas_dir)));
    let assembler = build_assembler_with(config, Arc::clone(&manager));
    let injector = PersonaInjector::new(manager);
    MessagePipeline::new(
        AdapterRouter::new(),
        assembler,
        injector,
        Arc::new(DisconnectedAgent),
    )
    .with_default_persona(config.persona.default_persona.clone())
}
