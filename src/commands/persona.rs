//! Persona inspection commands

use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::cli::{OutputFormat, PersonaAction};
use crate::config::Config;
use crate::persona::resolve::Resolver;
use crate::store::{FsStore, RecordStore};

pub fn run(action: PersonaAction, config: &Config) -> Result<()> {
    match action {
        PersonaAction::List { format } => list_personas(OutputFormat::resolve(format), config),
        PersonaAction::Show { name, format } => show_persona(&name, OutputFormat::resolve(format), config),
    }
}

fn list_personas(format: OutputFormat, config: &Config) -> Result<()> {
    let store = FsStore::from_config(config);

    #[derive(Serialize)]
    struct PersonaSummary {
        name: String,
        display_name: String,
        description: String,
        traits: Vec<String>,
    }

    let mut summaries = Vec::new();
    for name in store.list_personas()? {
        match store.load_persona(&name) {
            Ok(p) => summaries.push(PersonaSummary {
                name: p.name,
                display_name: p.display_name,
                description: p.description,
                traits: p.traits,
            }),
            Err(e) => {
                log::warn!("Failed to load persona '{}': {}", name, e);
            }
        }
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&summaries)?),
        OutputFormat::Text => {
            println!("{}", "Available Personas:".bold());
            println!();

            if summaries.is_empty() {
                println!(
                    "  {} No personas found in {}",
                    "(none)".dimmed(),
                    Config::expand_path(&config.paths.personas).display()
                );
            } else {
                for persona in &summaries {
                    println!("  {} {} ({})", "●".green(), persona.name.bold(), persona.display_name);
                    println!("    {}", persona.description.dimmed());
                    if !persona.traits.is_empty() {
                        println!("    Traits: {}", persona.traits.join(", ").cyan());
                    }
                    println!();
                }
            }
        }
    }

    Ok(())
}

fn show_persona(name: &str, format: OutputFormat, config: &Config) -> Result<()> {
    let store = FsStore::from_config(config);
    let persona = store.load_persona(name)?;
    let resolved = Resolver::new(&store).resolve(&persona)?;

    #[derive(Serialize)]
    struct ResolvedView {
        name: String,
        display_name: String,
        description: String,
        expertise: Vec<String>,
        responsibilities: Vec<String>,
        traits: Vec<String>,
        sections: Vec<String>,
    }

    let view = ResolvedView {
        name: resolved.name.clone(),
        display_name: resolved.display_name.clone(),
        description: resolved.description.clone(),
        expertise: resolved.expertise.clone(),
        responsibilities: resolved.responsibilities.clone(),
        traits: resolved.traits.iter().map(|t| t.key()).collect(),
        sections: resolved.sections.keys().cloned().collect(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&view)?),
        OutputFormat::Text => {
            println!("{} {}", "Persona:".bold(), resolved.name.green().bold());
            println!("  {} {}", "Display:".bold(), resolved.display_name);
            println!("  {}", resolved.description.dimmed());

            if !resolved.traits.is_empty() {
                println!();
                println!("{}", "Traits (resolved order):".bold());
                for record in &resolved.traits {
                    println!("  {} {}", "●".cyan(), record.key());
                    println!("    {}", record.implementation.dimmed());
                }
            }

            if !resolved.sections.is_empty() {
                println!();
                println!("{}", "Sections:".bold());
                for (section, text) in &resolved.sections {
                    let preview: String = text.lines().next().unwrap_or("").to_string();
                    println!("  {} {} {}", "●".magenta(), section.bold(), preview.dimmed());
                }
            }
        }
    }

    Ok(())
}
