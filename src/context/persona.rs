//! Persona context source — exposes a persona overlay through the
//! context-source seam.
//!
//! The target persona is the request's override when present, else the
//! configured default. No resolvable target, or an unknown name, yields
//! an empty contribution — never a failure.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::context::{ContextRequest, ContextSource, ContextSourceError};
use crate::persona::manager::PersonaManager;

/// Context from the persona registry.
pub struct PersonaContextSource {
    manager: Arc<PersonaManager>,
    default_persona: Option<String>,
}

impl PersonaContextSource {
    /// Source resolving personas through `manager`, with an optional
    /// default used when a request carries no override.
    pub fn new(manager: Arc<PersonaManager>, default_persona: Option<String>) -> Self {
        Self {
            manager,
            default_persona,
        }
    }
}

#[async_trait]
impl ContextSource for PersonaContextSource {
    async fn get_context(&self, request: &ContextRequest) -> Result<String, ContextSourceError> {
        let target = request
            .persona
            .as_deref()
            .or(self.default_persona.as_deref());

        let Some(name) = target else {
            debug!("no persona specified");
            return Ok(String::new());
        };

        match self.manager.get_persona(name) {
            Some(persona) => {
                debug!(persona = %persona.name, "retrieved persona overlay");
                Ok(persona.prompt_overlay.trim().to_owned())
            }
            None => {
                warn!(persona = name, "persona not found");
                Ok(String::new())
            }
        }
    }

    fn source_name(&self) -> &str {
        "persona"
    }

    fn is_available(&self) -> bool {
        self.manager.persona_count() > 0
    }
}
