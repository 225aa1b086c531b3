//! Persona records and their building blocks
//!
//! A persona is a named agent definition composed from:
//! - scalar attributes (display name, description, expertise, responsibilities)
//! - an ordered list of trait references (`category/name`)
//! - named content sections (path references into the content root, or text
//!   inlined directly in the record)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ComposeError;

pub mod resolve;

/// A named agent definition referencing traits and content sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Unique persona name (e.g., "intern", "architect")
    pub name: String,

    /// Human-readable display name
    pub display_name: String,

    /// What this persona is for
    pub description: String,

    /// Domain expertise bullet points
    #[serde(default)]
    pub expertise: Vec<String>,

    /// Responsibility bullet points
    #[serde(default)]
    pub responsibilities: Vec<String>,

    /// Ordered trait references (`category/name`); duplicates are collapsed
    /// during resolution, first occurrence wins
    #[serde(default)]
    pub traits: Vec<String>,

    /// Section name -> content reference, in declaration order
    #[serde(default)]
    pub content_sections: IndexMap<String, ContentRef>,
}

/// A content section is either a path into the content root or inline text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentRef {
    /// Text embedded directly in the persona record
    Inline { inline: String },
    /// Path to a content block, relative to the content root
    Path(String),
}

impl Persona {
    /// Schema validation beyond what serde enforces.
    /// Called by the store after deserialization.
    pub fn validate(&self) -> Result<(), ComposeError> {
        if self.name.trim().is_empty() {
            return Err(ComposeError::InvalidRecord {
                kind: "persona",
                name: self.name.clone(),
                reason: "name must not be empty".to_string(),
            });
        }

        if self.display_name.trim().is_empty() {
            return Err(ComposeError::InvalidRecord {
                kind: "persona",
                name: self.name.clone(),
                reason: "display_name must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// A reusable behavioral fragment, identified by `category/name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitRecord {
    /// Trait category (e.g., "expertise", "personality", "safety")
    pub category: String,

    /// Trait name, unique within its category
    pub name: String,

    /// What this trait contributes
    #[serde(default)]
    pub description: String,

    /// The text a resolved persona carries for this trait
    pub implementation: String,
}

impl TraitRecord {
    /// Composite identity: `category/name`
    pub fn key(&self) -> String {
        format!("{}/{}", self.category, self.name)
    }

    pub fn validate(&self) -> Result<(), ComposeError> {
        if self.category.trim().is_empty() || self.name.trim().is_empty() {
            return Err(ComposeError::InvalidRecord {
                kind: "trait",
                name: self.key(),
                reason: "category and name must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Fully-expanded, reference-free form of a persona, ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPersona {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub expertise: Vec<String>,
    pub responsibilities: Vec<String>,

    /// Expanded trait records in first-occurrence declaration order
    pub traits: Vec<TraitRecord>,

    /// Section name -> resolved text, in declaration order
    pub sections: IndexMap<String, String>,
}
