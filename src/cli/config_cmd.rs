//! Config CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;

use super::args::{parse_config_add_args, parse_config_del_args};
use super::output::Output;
use crate::domain::{Config, Doc};
use crate::storage::Workspace;
use crate::tracker::fingerprint_sources;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Track a doc (file or URL) against source files and folders
    Add {
        /// Doc file path or http(s) URL
        doc: Option<String>,

        /// Comma-separated source files or folders
        sources: Option<String>,
    },

    /// List tracked configs
    List,

    /// Remove configs by index, as shown by `config list`
    Del {
        /// Comma-separated zero-based indexes
        indexes: String,
    },
}

pub fn run(cmd: ConfigCommands, workspace: &Workspace, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Add { doc, sources } => {
            add(workspace, output, doc.as_deref(), sources.as_deref())
        }
        ConfigCommands::List => list(workspace, output),
        ConfigCommands::Del { indexes } => del(workspace, output, &indexes),
    }
}

fn add(
    workspace: &Workspace,
    output: &Output,
    doc: Option<&str>,
    sources: Option<&str>,
) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let args = parse_config_add_args(doc, sources, &cwd)?;
    output.verbose_ctx(
        "config add",
        &format!("Resolved {} source file(s) for {}", args.sources.len(), args.doc),
    );

    let sources = fingerprint_sources(&args.sources)?;
    let mut store = workspace.store()?;
    let config = store
        .insert_config(Doc::new(args.doc, args.category), sources)
        .context("Failed to save config")?;

    if output.is_json() {
        output.data(&config);
    } else {
        output.success(&format!(
            "Tracking {} source file(s) for {}",
            config.sources.len(),
            config.doc.identifier
        ));
    }

    Ok(())
}

fn list(workspace: &Workspace, output: &Output) -> Result<()> {
    let configs = workspace.store()?.list_configs()?;
    output.verbose_ctx("config list", &format!("Found {} configs", configs.len()));

    if output.is_json() {
        let items: Vec<_> = configs
            .iter()
            .enumerate()
            .map(|(index, config)| {
                serde_json::json!({
                    "index": index,
                    "doc": config.doc.identifier,
                    "category": config.doc.category,
                    "sources": config.source_paths().collect::<Vec<_>>(),
                })
            })
            .collect();
        output.data(&items);
    } else if configs.is_empty() {
        println!("No configs tracked. Add one with 'doc-hunt config add <doc> <sources>'.");
    } else {
        print_configs(&configs);
    }

    Ok(())
}

fn print_configs(configs: &[Config]) {
    for (index, config) in configs.iter().enumerate() {
        println!("[{}] {} ({})", index, config.doc.identifier, config.doc.category);
        for path in config.source_paths() {
            println!("      {}", path);
        }
    }
}

fn del(workspace: &Workspace, output: &Output, indexes: &str) -> Result<()> {
    let mut store = workspace.store()?;
    let configs = store.list_configs()?;
    let selected = parse_config_del_args(&configs, indexes)?;

    let removed = store
        .remove_configs(&selected)
        .context("Failed to remove configs")?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "removed": selected.iter().map(|c| &c.doc.identifier).collect::<Vec<_>>(),
        }));
    } else {
        output.success(&format!("Removed {} config(s)", removed));
    }

    Ok(())
}
