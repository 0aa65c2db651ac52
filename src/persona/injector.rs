//! Persona injector — appends a persona overlay to a base prompt.
//!
//! Injection never fails loudly: an unresolvable persona leaves the
//! base prompt unchanged, with a warning in the log.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::persona::manager::PersonaManager;
use crate::persona::Persona;

/// Appends persona overlays to base prompts.
pub struct PersonaInjector {
    manager: Arc<PersonaManager>,
}

impl PersonaInjector {
    /// Injector resolving names through `manager`.
    pub fn new(manager: Arc<PersonaManager>) -> Self {
        Self { manager }
    }

    /// Inject a persona overlay into `base_prompt`.
    ///
    /// Precedence: an explicit `persona` object wins over `persona_name`;
    /// with neither, the prompt is returned unchanged. A name that does
    /// not resolve also returns the prompt unchanged. The base prompt is
    /// never mutated or truncated.
    pub fn inject(
        &self,
        base_prompt: &str,
        persona_name: Option<&str>,
        persona: Option<&Persona>,
    ) -> String {
        let resolved: Option<Arc<Persona>> = match (persona, persona_name) {
            (Some(p), _) => Some(Arc::new(p.clone())),
            (None, Some(name)) => {
                let found = self.manager.get_persona(name);
                if found.is_none() {
                    warn!(persona = name, "persona not found, using original prompt");
                    return base_prompt.to_owned();
                }
                found
            }
            (None, None) => None,
        };

        let Some(persona) = resolved else {
            return base_prompt.to_owned();
        };

        debug!(persona = %persona.name, "injected persona overlay");
        render_with_overlay(base_prompt, &persona)
    }
}

/// Append the fixed-format overlay block after the base prompt.
fn render_with_overlay(base_prompt: &str, persona: &Persona) -> String {
    let overlay = persona.prompt_overlay.trim();
    format!("{base_prompt}\n\n## Persona Configuration\n<persona>\n{overlay}\n</persona>")
}
