//! In-memory record store
//!
//! Backs unit tests and embedders that already hold records in memory.
//! Behaves identically to the filesystem store from the resolver's point
//! of view.

#![allow(dead_code)] // builder methods - exercised by unit tests across the crate

use std::collections::HashMap;

use crate::error::ComposeError;
use crate::persona::{Persona, TraitRecord};

use super::RecordStore;

/// Record store over in-memory maps
#[derive(Debug, Default)]
pub struct MemoryStore {
    personas: HashMap<String, Persona>,
    traits: HashMap<String, TraitRecord>,
    content: HashMap<String, String>,
    templates: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_persona(&mut self, persona: Persona) -> &mut Self {
        self.personas.insert(persona.name.clone(), persona);
        self
    }

    pub fn insert_trait(&mut self, record: TraitRecord) -> &mut Self {
        self.traits.insert(record.key(), record);
        self
    }

    pub fn insert_content(&mut self, path: &str, text: &str) -> &mut Self {
        self.content.insert(path.to_string(), text.to_string());
        self
    }

    pub fn insert_template(&mut self, name: &str, text: &str) -> &mut Self {
        self.templates.insert(name.to_string(), text.to_string());
        self
    }
}

impl RecordStore for MemoryStore {
    fn list_personas(&self) -> Result<Vec<String>, ComposeError> {
        let mut names: Vec<String> = self.personas.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn load_persona(&self, name: &str) -> Result<Persona, ComposeError> {
        self.personas
            .get(name)
            .cloned()
            .ok_or_else(|| ComposeError::PersonaNotFound { name: name.to_string() })
    }

    fn load_trait(&self, category: &str, name: &str) -> Result<TraitRecord, ComposeError> {
        let key = format!("{category}/{name}");
        self.traits.get(&key).cloned().ok_or(ComposeError::TraitNotFound {
            key,
            persona: String::new(),
        })
    }

    fn load_content(&self, path: &str) -> Result<String, ComposeError> {
        self.content
            .get(path)
            .cloned()
            .ok_or_else(|| ComposeError::ContentNotFound {
                path: path.to_string(),
                section: String::new(),
                persona: String::new(),
            })
    }

    fn load_template(&self, name: &str) -> Result<String, ComposeError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| ComposeError::Template {
                template: name.to_string(),
                reason: "not found".to_string(),
            })
    }
}
