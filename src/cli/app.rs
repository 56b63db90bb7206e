//! Main CLI application structure

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{check_cmd, config_cmd};
use crate::storage::Workspace;

#[derive(Parser)]
#[command(name = "doc-hunt")]
#[command(author, version, about = "Keep documentation in sync with the source files it describes")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the workspace setting)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Workspace directory (defaults to the current directory)
    #[arg(long, short = 'w', global = true, env = "DOC_HUNT_HOME")]
    pub workspace: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a doc-hunt workspace
    Init,

    /// Manage doc/source configs
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),

    /// Report sources that changed since their doc was last reviewed
    Check,

    /// Acknowledge changes: record new fingerprints and drop deleted sources
    Update,

    /// Follow a source file that was moved
    Rename {
        /// Previous path of the source
        old: String,

        /// New path of the source
        new: String,
    },

    /// Stop tracking sources at the given paths
    Forget {
        /// Comma-separated source paths
        paths: String,
    },

    /// Print the version
    Version,
}

/// Main entry point for the CLI
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::debug!("doc-hunt starting");

    match cli.command {
        Commands::Init => {
            let root = Workspace::resolve_root(cli.workspace.as_deref())?;
            let workspace = Workspace::init(&root)?;
            let output = Output::new(cli.format.unwrap_or_default());
            output.verbose_ctx(
                "init",
                &format!("Database at {}", workspace.db_path().display()),
            );
            output.success(&format!(
                "Initialized doc-hunt workspace at {}",
                workspace.root().display()
            ));
        }

        Commands::Version => {
            let output = Output::new(cli.format.unwrap_or_default());
            output.success(&format!("v{}", env!("CARGO_PKG_VERSION")));
        }

        command => {
            let workspace = Workspace::open_at(cli.workspace.as_deref())?;
            let format = cli
                .format
                .unwrap_or_else(|| workspace.settings().default_format.into());
            let output = Output::new(format);

            match command {
                Commands::Config(cmd) => config_cmd::run(cmd, &workspace, &output)?,
                Commands::Check => return check_cmd::check(&workspace, &output),
                Commands::Update => check_cmd::update(&workspace, &output)?,
                Commands::Rename { old, new } => check_cmd::rename(&workspace, &output, &old, &new)?,
                Commands::Forget { paths } => check_cmd::forget(&workspace, &output, &paths)?,
                Commands::Init | Commands::Version => unreachable!("handled above"),
            }
        }
    }

    tracing::debug!("command completed successfully");
    Ok(ExitCode::SUCCESS)
}

/// Installs the stderr log subscriber
///
/// `DOC_HUNT_LOG` takes an `EnvFilter` directive and overrides `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "doc_hunt=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("DOC_HUNT_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
