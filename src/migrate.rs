//! Content inlining migration
//!
//! One-off batch utility that rewrites persona records so every
//! `content_sections` path reference becomes inline text. It consumes the
//! same read interface the resolver uses and writes rewritten records back
//! to disk; it is never part of the live resolve/render path.

use std::fs;

use crate::error::ComposeError;
use crate::persona::{ContentRef, Persona};
use crate::store::{FsStore, RecordStore};

/// What a migration run did (or would do, under --dry-run)
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// Personas whose records were rewritten
    pub rewritten: Vec<String>,

    /// Personas with no path references left to inline
    pub skipped: Vec<String>,

    /// Personas that could not be migrated
    pub failures: Vec<(String, ComposeError)>,
}

/// Inline every content-path reference of `persona`.
///
/// Returns `None` when the record has no path references (nothing to do).
pub fn inline_persona<S: RecordStore>(store: &S, persona: &Persona) -> Result<Option<Persona>, ComposeError> {
    if !persona
        .content_sections
        .values()
        .any(|r| matches!(r, ContentRef::Path(_)))
    {
        return Ok(None);
    }

    let mut rewritten = persona.clone();

    for (section, content_ref) in rewritten.content_sections.iter_mut() {
        if let ContentRef::Path(path) = content_ref {
            let text = store.load_content(path).map_err(|e| match e {
                ComposeError::ContentNotFound { path, .. } => ComposeError::ContentNotFound {
                    path,
                    section: section.clone(),
                    persona: persona.name.clone(),
                },
                other => other,
            })?;
            *content_ref = ContentRef::Inline { inline: text };
        }
    }

    Ok(Some(rewritten))
}

/// Run the migration over every persona in the store
pub fn run(store: &FsStore, dry_run: bool) -> Result<MigrationReport, ComposeError> {
    let mut report = MigrationReport::default();

    for name in store.list_personas()? {
        let outcome = store
            .load_persona(&name)
            .and_then(|persona| inline_persona(store, &persona));

        match outcome {
            Ok(None) => report.skipped.push(name),
            Ok(Some(rewritten)) => {
                if !dry_run {
                    let yaml = serde_yaml::to_string(&rewritten)?;
                    fs::write(store.persona_path(&name), yaml)?;
                }
                report.rewritten.push(name);
            }
            Err(e) => {
                log::warn!("Failed to migrate persona '{}': {}", name, e);
                report.failures.push((name, e));
            }
        }
    }

    Ok(report)
}
