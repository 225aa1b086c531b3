//! Typed errors for the composition engine
//!
//! Every failure the store, resolver, renderer, or compositor can produce is
//! a variant of [`ComposeError`], so the CLI boundary can catch one kind and
//! report it uniformly.

#![allow(dead_code)] // cycle_chain - exercised by resolver tests

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    /// No persona record with this name exists in the store
    #[error("persona not found: {name}")]
    PersonaNotFound { name: String },

    /// A persona referenced a trait that does not exist
    #[error("trait not found: {key} (referenced by persona '{persona}')")]
    TraitNotFound { key: String, persona: String },

    /// A content section referenced a path with no content block behind it
    #[error("content not found: {path} (section '{section}' of persona '{persona}')")]
    ContentNotFound {
        path: String,
        section: String,
        persona: String,
    },

    /// A reference chain revisited a name already being resolved
    #[error("circular reference: {}", chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },

    /// Template missing, or it names a placeholder the config does not have
    #[error("template '{template}': {reason}")]
    Template { template: String, reason: String },

    /// A record failed schema validation at load time
    #[error("invalid {kind} record '{name}': {reason}")]
    InvalidRecord {
        kind: &'static str,
        name: String,
        reason: String,
    },

    /// Bulk validation outcome carrying every per-persona failure
    #[error("{} of {} personas failed validation", errors.len(), total)]
    Validation {
        total: usize,
        errors: Vec<ComposeError>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ComposeError {
    /// The chain of names for a circular reference, if that is what this is
    pub fn cycle_chain(&self) -> Option<&[String]> {
        match self {
            ComposeError::CircularDependency { chain } => Some(chain),
            _ => None,
        }
    }
}
