use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gcfg")]
#[command(author, version, about = "gcloud configurations - switch between named gcloud CLI settings")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the gcloud executable (default: search PATH and common install locations)
    #[arg(long, global = true, env = "GCFG_GCLOUD")]
    pub gcloud: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "GCFG_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive configuration picker (default when no command given)
    #[command(hide = true)]
    Interactive,

    /// List all configurations
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the active configuration
    Current,

    /// Show project, account and region of a configuration
    Describe {
        /// Configuration name
        name: String,
    },

    /// Activate a configuration
    Activate {
        /// Configuration name to activate
        name: String,
    },

    /// Delete a configuration
    Delete {
        /// Configuration name to delete
        name: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Create a new configuration (prompts for values when no name is given)
    Create {
        /// Name for the new configuration
        name: Option<String>,
        /// Project ID
        #[arg(long)]
        project: Option<String>,
        /// Account email
        #[arg(long)]
        account: Option<String>,
        /// Default compute region
        #[arg(long)]
        region: Option<String>,
    },

    /// Duplicate an existing configuration
    Duplicate {
        /// Source configuration (prompts with a picker when omitted)
        source: Option<String>,
        /// Name for the new configuration
        new_name: Option<String>,
        /// How the source properties are carried over
        #[arg(short, long, value_enum, default_value_t = DuplicateMode::Snapshot)]
        mode: DuplicateMode,
        /// Project ID override (edit mode only)
        #[arg(long)]
        project: Option<String>,
        /// Account email override (edit mode only)
        #[arg(long)]
        account: Option<String>,
        /// Region override (edit mode only)
        #[arg(long)]
        region: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Where a duplicate takes its project/account/region values from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DuplicateMode {
    /// Copy the source's current values verbatim at submit time
    Snapshot,
    /// Load the source's values when it is selected, then allow edits
    Edit,
}
