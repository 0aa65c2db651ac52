//! Switchboard — a chat-bot integration layer.
//!
//! Normalizes messages from multiple chat front-ends (Slack, an Electron
//! desktop app, a web UI) into one canonical schema, assembles agent
//! context from independently-failing sources, and injects persona
//! overlays into prompts.
//!
//! See `DESIGN.md` for full architecture documentation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapters;
pub mod config;
pub mod context;
pub mod logging;
pub mod memory;
pub mod persona;
pub mod pipeline;
pub mod schema;
