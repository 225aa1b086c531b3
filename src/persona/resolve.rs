//! Reference resolution
//!
//! Expands a [`Persona`] into a [`ResolvedPersona`]: every trait reference
//! becomes a full trait record, every content section becomes text. A
//! resolution stack tracks the names currently being expanded so any
//! reference chain that revisits one fails as a circular dependency.
//!
//! Traits are leaves today, so the only cycle real data can produce is a
//! persona referencing itself. The stack still handles arbitrary reference
//! graphs; if traits or content ever gain transitive references, nothing
//! here changes.

use indexmap::{IndexMap, IndexSet};

use crate::error::ComposeError;
use crate::store::RecordStore;

use super::{ContentRef, Persona, ResolvedPersona};

/// Ordered set of reference identities currently being expanded
#[derive(Debug, Default)]
pub struct ResolutionStack {
    names: IndexSet<String>,
}

impl ResolutionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a reference as in-progress. Fails if it already is, carrying the
    /// chain from its first occurrence back to itself.
    pub fn enter(&mut self, name: &str) -> Result<(), ComposeError> {
        if let Some(start) = self.names.get_index_of(name) {
            let mut chain: Vec<String> = self.names.iter().skip(start).cloned().collect();
            chain.push(name.to_string());
            return Err(ComposeError::CircularDependency { chain });
        }

        self.names.insert(name.to_string());
        Ok(())
    }

    /// Mark a reference as fully expanded
    pub fn leave(&mut self, name: &str) {
        self.names.shift_remove(name);
    }

    pub fn depth(&self) -> usize {
        self.names.len()
    }
}

/// Resolves persona references against a record store
pub struct Resolver<'a, S: RecordStore> {
    store: &'a S,
}

impl<'a, S: RecordStore> Resolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Expand every reference of `persona` into a [`ResolvedPersona`].
    ///
    /// Pure with respect to the store: no records are mutated, and two calls
    /// against an unchanged store yield structurally equal results.
    pub fn resolve(&self, persona: &Persona) -> Result<ResolvedPersona, ComposeError> {
        let mut stack = ResolutionStack::new();
        stack.enter(&persona.name)?;

        let mut traits = Vec::new();
        let mut seen = IndexSet::new();

        for reference in &persona.traits {
            // Cycle check comes before parsing, so a persona naming itself
            // (or anything already in progress) reports as a cycle rather
            // than a malformed reference.
            stack.enter(reference)?;

            let (category, name) = split_trait_ref(reference, &persona.name)?;
            let record = self
                .store
                .load_trait(category, name)
                .map_err(|e| with_persona_context(e, &persona.name))?;

            // First occurrence wins; later duplicates are dropped silently
            if seen.insert(record.key()) {
                traits.push(record);
            }

            stack.leave(reference);
        }

        let mut sections = IndexMap::new();

        for (section, content_ref) in &persona.content_sections {
            let text = match content_ref {
                ContentRef::Inline { inline } => inline.clone(),
                ContentRef::Path(path) => {
                    stack.enter(path)?;
                    let text = self.store.load_content(path).map_err(|e| match e {
                        ComposeError::ContentNotFound { path, .. } => ComposeError::ContentNotFound {
                            path,
                            section: section.clone(),
                            persona: persona.name.clone(),
                        },
                        other => other,
                    })?;
                    stack.leave(path);
                    text
                }
            };

            sections.insert(section.clone(), text);
        }

        Ok(ResolvedPersona {
            name: persona.name.clone(),
            display_name: persona.display_name.clone(),
            description: persona.description.clone(),
            expertise: persona.expertise.clone(),
            responsibilities: persona.responsibilities.clone(),
            traits,
            sections,
        })
    }
}

fn split_trait_ref<'r>(reference: &'r str, persona: &str) -> Result<(&'r str, &'r str), ComposeError> {
    match reference.split_once('/') {
        Some((category, name)) if !category.is_empty() && !name.is_empty() => Ok((category, name)),
        _ => Err(ComposeError::InvalidRecord {
            kind: "persona",
            name: persona.to_string(),
            reason: format!("trait reference '{reference}' must be category/name"),
        }),
    }
}

fn with_persona_context(err: ComposeError, persona: &str) -> ComposeError {
    match err {
        ComposeError::TraitNotFound { key, .. } => ComposeError::TraitNotFound {
            key,
            persona: persona.to_string(),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::TraitRecord;
    use crate::store::MemoryStore;

    fn persona(name: &str, traits: Vec<&str>) -> Persona {
        Persona {
            name: name.to_string(),
            display_name: name.to_string(),
            description: format!("{name} persona"),
            expertise: vec![],
            responsibilities: vec![],
            traits: traits.into_iter().map(String::from).collect(),
            content_sections: IndexMap::new(),
        }
    }

    fn trait_record(category: &str, name: &str, implementation: &str) -> TraitRecord {
        TraitRecord {
            category: category.to_string(),
            name: name.to_string(),
            description: String::new(),
            implementation: implementation.to_string(),
        }
    }

    #[test]
    fn test_resolve_empty_persona() {
        let store = MemoryStore::new();
        let resolver = Resolver::new(&store);

        let resolved = resolver.resolve(&persona("bare", vec![])).unwrap();

        assert!(resolved.traits.is_empty());
        assert!(resolved.sections.is_empty());
        assert_eq!(resolved.display_name, "bare");
    }

    #[test]
    fn test_resolve_traits_in_declaration_order() {
        let mut store = MemoryStore::new();
        store.insert_trait(trait_record("approach", "rapid", "Move fast."));
        store.insert_trait(trait_record("personality", "skeptical", "Question everything."));
        let resolver = Resolver::new(&store);

        let resolved = resolver
            .resolve(&persona("dev", vec!["personality/skeptical", "approach/rapid"]))
            .unwrap();

        let keys: Vec<String> = resolved.traits.iter().map(|t| t.key()).collect();
        assert_eq!(keys, vec!["personality/skeptical", "approach/rapid"]);
    }

    #[test]
    fn test_resolve_missing_trait_names_ghost() {
        let store = MemoryStore::new();
        let resolver = Resolver::new(&store);

        let err = resolver.resolve(&persona("dev", vec!["safety/ghost"])).unwrap_err();

        assert!(matches!(err, ComposeError::TraitNotFound { .. }));
        assert!(err.to_string().contains("ghost"));
        assert!(err.to_string().contains("dev"));
    }

    #[test]
    fn test_resolve_duplicate_traits_first_occurrence_wins() {
        let mut store = MemoryStore::new();
        store.insert_trait(trait_record("cat", "x", "x impl"));
        store.insert_trait(trait_record("cat", "y", "y impl"));
        let resolver = Resolver::new(&store);

        let resolved = resolver
            .resolve(&persona("dup", vec!["cat/x", "cat/y", "cat/x"]))
            .unwrap();

        let keys: Vec<String> = resolved.traits.iter().map(|t| t.key()).collect();
        assert_eq!(keys, vec!["cat/x", "cat/y"]);
    }

    #[test]
    fn test_resolve_self_reference_is_a_cycle() {
        let store = MemoryStore::new();
        let resolver = Resolver::new(&store);

        let err = resolver.resolve(&persona("loop", vec!["loop"])).unwrap_err();

        assert_eq!(err.cycle_chain(), Some(&["loop".to_string(), "loop".to_string()][..]));
    }

    #[test]
    fn test_stack_reports_multi_hop_chain_in_order() {
        let mut stack = ResolutionStack::new();
        stack.enter("a").unwrap();
        stack.enter("b").unwrap();

        let err = stack.enter("a").unwrap_err();

        assert_eq!(
            err.cycle_chain(),
            Some(&["a".to_string(), "b".to_string(), "a".to_string()][..])
        );
    }

    #[test]
    fn test_stack_leave_allows_reentry() {
        let mut stack = ResolutionStack::new();
        stack.enter("a").unwrap();
        stack.leave("a");
        assert!(stack.enter("a").is_ok());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut store = MemoryStore::new();
        store.insert_trait(trait_record("cat", "x", "x impl"));
        store.insert_content("notes.md", "some notes");
        let mut p = persona("stable", vec!["cat/x"]);
        p.content_sections
            .insert("notes".to_string(), ContentRef::Path("notes.md".to_string()));
        let resolver = Resolver::new(&store);

        let first = resolver.resolve(&p).unwrap();
        let second = resolver.resolve(&p).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_sections_inline_and_path_in_order() {
        let mut store = MemoryStore::new();
        store.insert_content("safety/rules.md", "stored rules");
        let mut p = persona("mixed", vec![]);
        p.content_sections
            .insert("rules".to_string(), ContentRef::Path("safety/rules.md".to_string()));
        p.content_sections.insert(
            "notes".to_string(),
            ContentRef::Inline {
                inline: "inline notes".to_string(),
            },
        );
        let resolver = Resolver::new(&store);

        let resolved = resolver.resolve(&p).unwrap();

        let entries: Vec<(&String, &String)> = resolved.sections.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], (&"rules".to_string(), &"stored rules".to_string()));
        assert_eq!(entries[1], (&"notes".to_string(), &"inline notes".to_string()));
    }

    #[test]
    fn test_resolve_missing_content_carries_section_context() {
        let store = MemoryStore::new();
        let mut p = persona("dev", vec![]);
        p.content_sections
            .insert("rules".to_string(), ContentRef::Path("gone.md".to_string()));
        let resolver = Resolver::new(&store);

        let err = resolver.resolve(&p).unwrap_err();

        match err {
            ComposeError::ContentNotFound { path, section, persona } => {
                assert_eq!(path, "gone.md");
                assert_eq!(section, "rules");
                assert_eq!(persona, "dev");
            }
            other => panic!("expected ContentNotFound, got {other}"),
        }
    }

    #[test]
    fn test_resolve_rejects_bare_trait_reference() {
        let mut store = MemoryStore::new();
        store.insert_trait(trait_record("cat", "x", "x impl"));
        let resolver = Resolver::new(&store);

        let err = resolver.resolve(&persona("dev", vec!["x"])).unwrap_err();

        assert!(matches!(err, ComposeError::InvalidRecord { .. }));
        assert!(err.to_string().contains("category/name"));
    }
}
