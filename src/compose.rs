//! Composition orchestration
//!
//! Walks every persona in the store, resolves and renders each, and collects
//! per-persona failures instead of aborting: one malformed persona never
//! blocks the rest. Also builds the aggregate roster document.

use indexmap::IndexMap;

use crate::error::ComposeError;
use crate::persona::resolve::Resolver;
use crate::render::Renderer;
use crate::store::RecordStore;

/// Outcome of a full composition or validation run
#[derive(Debug, Default)]
pub struct ComposeReport {
    /// Rendered documents keyed by persona name (empty for validate runs)
    pub documents: IndexMap<String, String>,

    /// Personas that resolved (and rendered, for build runs) cleanly
    pub passed: Vec<String>,

    /// Personas that failed, with the first error each hit
    pub failures: Vec<(String, ComposeError)>,
}

impl ComposeReport {
    pub fn succeeded(&self) -> usize {
        self.passed.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Collapse the failure list into one bulk [`ComposeError::Validation`],
    /// or `None` when everything passed
    pub fn into_validation_error(self) -> Option<ComposeError> {
        if self.failures.is_empty() {
            return None;
        }

        Some(ComposeError::Validation {
            total: self.passed.len() + self.failures.len(),
            errors: self.failures.into_iter().map(|(_, e)| e).collect(),
        })
    }
}

/// Orchestrates resolve + render across every persona in a store
pub struct Compositor<'a, S: RecordStore> {
    store: &'a S,
    resolver: Resolver<'a, S>,
    renderer: Renderer<'a, S>,
}

impl<'a, S: RecordStore> Compositor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            resolver: Resolver::new(store),
            renderer: Renderer::new(store),
        }
    }

    /// Resolve and render every persona through the named template.
    ///
    /// Per-persona failures are collected, not propagated; only a store that
    /// cannot list personas at all makes this return Err.
    pub fn compose_all(&self, template_name: &str) -> Result<ComposeReport, ComposeError> {
        let mut report = ComposeReport::default();

        for name in self.store.list_personas()? {
            match self.compose_one(&name, template_name) {
                Ok(document) => {
                    report.documents.insert(name.clone(), document);
                    report.passed.push(name);
                }
                Err(e) => {
                    log::warn!("Failed to compose persona '{}': {}", name, e);
                    report.failures.push((name, e));
                }
            }
        }

        Ok(report)
    }

    /// Resolve every persona without rendering
    pub fn validate_all(&self) -> Result<ComposeReport, ComposeError> {
        let mut report = ComposeReport::default();

        for name in self.store.list_personas()? {
            let outcome = self
                .store
                .load_persona(&name)
                .and_then(|persona| self.resolver.resolve(&persona));

            match outcome {
                Ok(_) => report.passed.push(name),
                Err(e) => {
                    log::warn!("Persona '{}' failed validation: {}", name, e);
                    report.failures.push((name, e));
                }
            }
        }

        Ok(report)
    }

    /// One aggregate document summarizing every loadable persona: display
    /// name, description, expertise. Independent of any persona template.
    /// Personas that fail to load are skipped with a warning.
    pub fn compose_global(&self) -> Result<String, ComposeError> {
        let mut out = String::from("# Agent Roster\n");

        for name in self.store.list_personas()? {
            let persona = match self.store.load_persona(&name) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("Skipping persona '{}' in roster: {}", name, e);
                    continue;
                }
            };

            out.push_str(&format!("\n## {}\n\n{}\n", persona.display_name, persona.description));

            if !persona.expertise.is_empty() {
                out.push_str("\nExpertise:\n");
                for item in &persona.expertise {
                    out.push_str(&format!("- {item}\n"));
                }
            }
        }

        Ok(out)
    }

    fn compose_one(&self, name: &str, template_name: &str) -> Result<String, ComposeError> {
        let persona = self.store.load_persona(name)?;
        let resolved = self.resolver.resolve(&persona)?;
        self.renderer.render(template_name, &resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::{Persona, TraitRecord};
    use crate::store::MemoryStore;

    fn persona(name: &str, display: &str, traits: Vec<&str>) -> Persona {
        Persona {
            name: name.to_string(),
            display_name: display.to_string(),
            description: format!("{display} description"),
            expertise: vec!["composition".to_string()],
            responsibilities: vec![],
            traits: traits.into_iter().map(String::from).collect(),
            content_sections: IndexMap::new(),
        }
    }

    fn store_with_three_personas() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_template("agent", "# {{ agent.display_name }}\n\n{{ traits }}\n");
        store.insert_trait(TraitRecord {
            category: "approach".to_string(),
            name: "steady".to_string(),
            description: String::new(),
            implementation: "Work steadily.".to_string(),
        });
        store.insert_persona(persona("alpha", "Alpha", vec!["approach/steady"]));
        store.insert_persona(persona("bravo", "Bravo", vec![]));
        // references a trait that does not exist
        store.insert_persona(persona("broken", "Broken", vec!["approach/ghost"]));
        store
    }

    #[test]
    fn test_compose_all_partial_failure() {
        let store = store_with_three_personas();
        let compositor = Compositor::new(&store);

        let report = compositor.compose_all("agent").unwrap();

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(report.documents.contains_key("alpha"));
        assert!(report.documents.contains_key("bravo"));
        assert_eq!(report.failures[0].0, "broken");
        assert!(report.failures[0].1.to_string().contains("ghost"));
    }

    #[test]
    fn test_validate_all_matches_compose_outcome() {
        let store = store_with_three_personas();
        let compositor = Compositor::new(&store);

        let report = compositor.validate_all().unwrap();

        assert_eq!(report.passed, vec!["alpha", "bravo"]);
        assert_eq!(report.failed(), 1);
        assert!(report.documents.is_empty());
    }

    #[test]
    fn test_report_collapses_into_validation_error() {
        let store = store_with_three_personas();
        let compositor = Compositor::new(&store);

        let report = compositor.validate_all().unwrap();
        let err = report.into_validation_error().unwrap();

        assert_eq!(err.to_string(), "1 of 3 personas failed validation");
        match err {
            ComposeError::Validation { errors, .. } => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].to_string().contains("ghost"));
            }
            other => panic!("expected Validation, got {other}"),
        }
    }

    #[test]
    fn test_compose_all_empty_store() {
        let store = MemoryStore::new();
        let compositor = Compositor::new(&store);

        let report = compositor.compose_all("agent").unwrap();

        assert!(report.all_passed());
        assert_eq!(report.succeeded(), 0);
    }

    #[test]
    fn test_compose_global_lists_every_persona() {
        let store = store_with_three_personas();
        let compositor = Compositor::new(&store);

        let roster = compositor.compose_global().unwrap();

        assert!(roster.starts_with("# Agent Roster"));
        assert!(roster.contains("## Alpha"));
        assert!(roster.contains("## Bravo"));
        // Broken loads fine (resolution is what fails), so it appears too
        assert!(roster.contains("## Broken"));
        assert!(roster.contains("- composition"));
    }

    #[test]
    fn test_compose_all_missing_template_fails_each_persona() {
        let mut store = MemoryStore::new();
        store.insert_persona(persona("alpha", "Alpha", vec![]));
        let compositor = Compositor::new(&store);

        let report = compositor.compose_all("nope").unwrap();

        assert_eq!(report.failed(), 1);
        assert!(matches!(report.failures[0].1, ComposeError::Template { .. }));
    }
}
