use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "pace",
    about = "Persona composition engine - assembles agent documents from reusable traits and content blocks",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/pace/logs/pace.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to pace.yaml config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compose every persona into a rendered document
    Build {
        /// Template name (defaults to the configured default_template)
        #[arg(long, short)]
        template: Option<String>,

        /// Output directory (defaults to the configured output path)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Also write the aggregate roster document
        #[arg(long)]
        global: bool,
    },

    /// Resolve every persona without rendering and report pass/fail
    Validate,

    /// Inspect persona records
    Persona {
        #[command(subcommand)]
        action: PersonaAction,
    },

    /// Inline referenced content blocks into persona records
    Migrate {
        /// Show what would happen without rewriting any records
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum PersonaAction {
    /// List all personas
    List {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show a persona in its fully-resolved form
    Show {
        /// Persona name
        name: String,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },
}
