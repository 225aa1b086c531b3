//! Record storage
//!
//! The resolver and renderer only ever see the [`RecordStore`] trait; where
//! records actually live is this module's concern. Two backends:
//! - [`FsStore`]: YAML records and plain-text content on disk
//! - [`MemoryStore`]: in-memory maps, for tests and embedding

use crate::error::ComposeError;
use crate::persona::{Persona, TraitRecord};

pub mod fs;
pub mod memory;

pub use fs::FsStore;
pub use memory::MemoryStore;

/// Read-only access to persona, trait, content, and template records.
///
/// Loads are idempotent: absent external mutation, the same name yields a
/// structurally equal record every time.
pub trait RecordStore {
    /// All persona names, sorted for deterministic iteration
    fn list_personas(&self) -> Result<Vec<String>, ComposeError>;

    /// Load one persona by name
    fn load_persona(&self, name: &str) -> Result<Persona, ComposeError>;

    /// Load one trait by its `category/name` identity
    fn load_trait(&self, category: &str, name: &str) -> Result<TraitRecord, ComposeError>;

    /// Load a content block by path relative to the content root
    fn load_content(&self, path: &str) -> Result<String, ComposeError>;

    /// Load a named template
    fn load_template(&self, name: &str) -> Result<String, ComposeError>;
}
