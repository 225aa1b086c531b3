//! Document rendering
//!
//! Turns a [`ResolvedPersona`] into text by substituting `{{ placeholder }}`
//! markers in a named template. The placeholder namespace is fixed:
//!
//! - `agent.name`, `agent.display_name`, `agent.description` - scalars
//! - `agent.expertise`, `agent.responsibilities` - bullet blocks
//! - `traits` - trait implementation texts in resolved order
//! - `sections` - each section's text under a `## <name>` heading
//!
//! Policy is fail-fast: a placeholder outside this namespace is a
//! `TemplateError` naming the placeholder. No silent blanks.

use lazy_regex::regex;
use regex::Captures;

use crate::error::ComposeError;
use crate::persona::ResolvedPersona;
use crate::store::RecordStore;

/// Renders resolved personas through store-backed templates
pub struct Renderer<'a, S: RecordStore> {
    store: &'a S,
}

impl<'a, S: RecordStore> Renderer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Render `config` through the named template.
    ///
    /// Deterministic: the same template and config always produce
    /// byte-identical output.
    pub fn render(&self, template_name: &str, config: &ResolvedPersona) -> Result<String, ComposeError> {
        let template = self.store.load_template(template_name)?;
        substitute(template_name, &template, config)
    }
}

/// Substitute every placeholder in `template` from `config`
pub fn substitute(template_name: &str, template: &str, config: &ResolvedPersona) -> Result<String, ComposeError> {
    let placeholder = regex!(r"\{\{\s*([A-Za-z_][A-Za-z0-9_.]*)\s*\}\}");

    // Validate the whole namespace up front so a bad template fails the same
    // way regardless of which placeholder comes first.
    for caps in placeholder.captures_iter(template) {
        let key = &caps[1];
        if lookup(config, key).is_none() {
            return Err(ComposeError::Template {
                template: template_name.to_string(),
                reason: format!("unknown placeholder '{key}'"),
            });
        }
    }

    let rendered =
        placeholder.replace_all(template, |caps: &Captures| lookup(config, &caps[1]).unwrap_or_default());

    Ok(rendered.into_owned())
}

fn lookup(config: &ResolvedPersona, key: &str) -> Option<String> {
    match key {
        "agent.name" => Some(config.name.clone()),
        "agent.display_name" => Some(config.display_name.clone()),
        "agent.description" => Some(config.description.clone()),
        "agent.expertise" => Some(bullet_block(&config.expertise)),
        "agent.responsibilities" => Some(bullet_block(&config.responsibilities)),
        "traits" => Some(
            config
                .traits
                .iter()
                .map(|t| t.implementation.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
        ),
        "sections" => Some(
            config
                .sections
                .iter()
                .map(|(name, text)| format!("## {name}\n\n{text}"))
                .collect::<Vec<_>>()
                .join("\n\n"),
        ),
        _ => None,
    }
}

fn bullet_block(items: &[String]) -> String {
    items.iter().map(|item| format!("- {item}")).collect::<Vec<_>>().join("\n")
}
