//! confmelt CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use confmelt_config::ScalarType;
use confmelt_core::{EditorConfig, RunningEnv};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "confmelt")]
#[command(version)]
#[command(about = "Inspect and edit a directory of YAML configuration files", long_about = None)]
struct Cli {
    /// Directory containing one YAML file per section
    #[arg(short = 'c', long, global = true, default_value = ".")]
    config_dir: PathBuf,

    /// Load only this file (repeatable; default: every *.yaml file)
    #[arg(short = 'f', long = "file", global = true)]
    files: Vec<String>,

    /// Write saved sections to DIR instead of the config directory
    #[arg(short = 'o', long, global = true)]
    output_dir: Option<PathBuf>,

    /// Directory holding the default configuration
    #[arg(short = 'd', long, global = true)]
    default_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every leaf with its path, value and type
    Melt {
        /// Print one JSON object per leaf
        #[arg(long)]
        json: bool,
    },

    /// Show the configuration as an indented tree
    Tree,

    /// Print the value or sub-tree at a path
    Get {
        /// Path segments; sequence positions are written as "-LIST-: N"
        #[arg(required = true)]
        path: Vec<String>,
    },

    /// Set the leaf at a path and save
    Set {
        /// Type to coerce the value to (string, integer, float, bool, none).
        /// Defaults to the current type of the leaf.
        #[arg(short = 't', long = "type")]
        ty: Option<ScalarType>,

        /// New value, as text
        #[arg(short = 'v', long, allow_hyphen_values = true)]
        value: String,

        /// Path segments; sequence positions are written as "-LIST-: N"
        #[arg(required = true)]
        path: Vec<String>,
    },

    /// Delete the value or sub-tree at a path and save
    Delete {
        /// Path segments; sequence positions are written as "-LIST-: N"
        #[arg(required = true)]
        path: Vec<String>,
    },

    /// Replace the configuration with the default configuration and save
    Reset,

    /// Print the configuration resolved for a running environment
    Resolve {
        /// Running environment (DEV, NON_PROD, PROD)
        #[arg(short = 'e', long, default_value = "DEV")]
        env: RunningEnv,

        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confmelt=info,confmelt_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = EditorConfig {
        config_dir: cli.config_dir,
        file_names: (!cli.files.is_empty()).then_some(cli.files),
        output_dir: cli.output_dir,
        default_dir: cli.default_dir,
    };

    match cli.command {
        Commands::Melt { json } => commands::melt::execute(config, json),
        Commands::Tree => commands::tree::execute(config),
        Commands::Get { path } => commands::get::execute(config, &path),
        Commands::Set { ty, value, path } => commands::set::execute(
            config,
            commands::set::SetArgs {
                path,
                value,
                ty,
            },
        ),
        Commands::Delete { path } => commands::delete::execute(config, &path),
        Commands::Reset => commands::reset::execute(config),
        Commands::Resolve { env, json } => commands::resolve::execute(config, env, json),
    }
}
