//! Filesystem-backed record store
//!
//! Layout under the configured roots:
//! - `personas/<name>.yaml`
//! - `traits/<category>/<name>.yaml`
//! - `content/<path>` (plain text, any extension)
//! - `templates/<name>.md`

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::ComposeError;
use crate::persona::{Persona, TraitRecord};

use super::RecordStore;

/// Record store over the directory roots named in [`Config`]
pub struct FsStore {
    personas_dir: PathBuf,
    traits_dir: PathBuf,
    content_dir: PathBuf,
    templates_dir: PathBuf,
}

impl FsStore {
    pub fn new(personas_dir: PathBuf, traits_dir: PathBuf, content_dir: PathBuf, templates_dir: PathBuf) -> Self {
        Self {
            personas_dir,
            traits_dir,
            content_dir,
            templates_dir,
        }
    }

    /// Build a store from the configured paths, expanding ~ and env vars
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Config::expand_path(&config.paths.personas),
            Config::expand_path(&config.paths.traits),
            Config::expand_path(&config.paths.content),
            Config::expand_path(&config.paths.templates),
        )
    }

    /// Where a persona record for `name` lives (used by the migrate utility
    /// to write records back)
    pub fn persona_path(&self, name: &str) -> PathBuf {
        self.personas_dir.join(format!("{name}.yaml"))
    }

    fn read_yaml_persona(&self, path: &Path, name: &str) -> Result<Persona, ComposeError> {
        let content = fs::read_to_string(path)?;
        let persona: Persona = serde_yaml::from_str(&content).map_err(|e| ComposeError::InvalidRecord {
            kind: "persona",
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        persona.validate()?;

        if persona.name != name {
            return Err(ComposeError::InvalidRecord {
                kind: "persona",
                name: name.to_string(),
                reason: format!("record name '{}' does not match file name", persona.name),
            });
        }

        Ok(persona)
    }
}

impl RecordStore for FsStore {
    fn list_personas(&self) -> Result<Vec<String>, ComposeError> {
        let mut names = Vec::new();

        if !self.personas_dir.exists() {
            return Ok(names);
        }

        for entry in fs::read_dir(&self.personas_dir)?.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "yaml" || e == "yml").unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }

        // Sort by name for consistent ordering
        names.sort();

        Ok(names)
    }

    fn load_persona(&self, name: &str) -> Result<Persona, ComposeError> {
        let path = self.persona_path(name);

        if !path.exists() {
            // Some records use .yml
            let alt = self.personas_dir.join(format!("{name}.yml"));
            if alt.exists() {
                return self.read_yaml_persona(&alt, name);
            }
            return Err(ComposeError::PersonaNotFound { name: name.to_string() });
        }

        self.read_yaml_persona(&path, name)
    }

    fn load_trait(&self, category: &str, name: &str) -> Result<TraitRecord, ComposeError> {
        let path = self.traits_dir.join(category).join(format!("{name}.yaml"));

        if !path.exists() {
            return Err(ComposeError::TraitNotFound {
                key: format!("{category}/{name}"),
                persona: String::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let record: TraitRecord = serde_yaml::from_str(&content).map_err(|e| ComposeError::InvalidRecord {
            kind: "trait",
            name: format!("{category}/{name}"),
            reason: e.to_string(),
        })?;
        record.validate()?;

        if record.category != category || record.name != name {
            return Err(ComposeError::InvalidRecord {
                kind: "trait",
                name: format!("{category}/{name}"),
                reason: format!("record identity '{}' does not match its location", record.key()),
            });
        }

        Ok(record)
    }

    fn load_content(&self, path: &str) -> Result<String, ComposeError> {
        let full = self.content_dir.join(path);

        if !full.exists() {
            return Err(ComposeError::ContentNotFound {
                path: path.to_string(),
                section: String::new(),
                persona: String::new(),
            });
        }

        Ok(fs::read_to_string(&full)?)
    }

    fn load_template(&self, name: &str) -> Result<String, ComposeError> {
        let path = self.templates_dir.join(format!("{name}.md"));

        if !path.exists() {
            return Err(ComposeError::Template {
                template: name.to_string(),
                reason: format!("not found at {}", path.display()),
            });
        }

        Ok(fs::read_to_string(&path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FsStore {
        let root = dir.path();
        FsStore::new(
            root.join("personas"),
            root.join("traits"),
            root.join("content"),
            root.join("templates"),
        )
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_list_personas_sorted() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        write(
            &dir.path().join("personas/zed.yaml"),
            "name: zed\ndisplay_name: Zed\ndescription: z\n",
        );
        write(
            &dir.path().join("personas/abe.yaml"),
            "name: abe\ndisplay_name: Abe\ndescription: a\n",
        );

        assert_eq!(store.list_personas().unwrap(), vec!["abe", "zed"]);
    }

    #[test]
    fn test_list_personas_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.list_personas().unwrap().is_empty());
    }

    #[test]
    fn test_load_persona_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store.load_persona("ghost").unwrap_err();
        assert!(matches!(err, ComposeError::PersonaNotFound { .. }));
    }

    #[test]
    fn test_load_persona_name_mismatch_is_invalid() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        write(
            &dir.path().join("personas/alias.yaml"),
            "name: other\ndisplay_name: Other\ndescription: mismatch\n",
        );

        let err = store.load_persona("alias").unwrap_err();
        assert!(matches!(err, ComposeError::InvalidRecord { .. }));
    }

    #[test]
    fn test_load_trait_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        write(
            &dir.path().join("traits/safety/test-trait.yaml"),
            "category: safety\nname: test-trait\nimplementation: CLI testing trait\n",
        );

        let record = store.load_trait("safety", "test-trait").unwrap();
        assert_eq!(record.key(), "safety/test-trait");
        assert_eq!(record.implementation, "CLI testing trait");
    }

    #[test]
    fn test_load_trait_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store.load_trait("safety", "ghost").unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_load_content_and_template() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        write(&dir.path().join("content/safety/rules.md"), "be careful\n");
        write(&dir.path().join("templates/agent.md"), "# {{ agent.display_name }}\n");

        assert_eq!(store.load_content("safety/rules.md").unwrap(), "be careful\n");
        assert!(store.load_template("agent").unwrap().contains("display_name"));
        assert!(matches!(
            store.load_template("missing").unwrap_err(),
            ComposeError::Template { .. }
        ));
    }

    #[test]
    fn test_load_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        write(
            &dir.path().join("personas/sam.yaml"),
            "name: sam\ndisplay_name: Sam\ndescription: stable\n",
        );

        let first = store.load_persona("sam").unwrap();
        let second = store.load_persona("sam").unwrap();
        assert_eq!(first, second);
    }
}
