//! # Command-Line Interface
//!
//! Thin layer over the tracker: resolves and validates arguments, calls into
//! the store and renders results.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Create `.doc-hunt/` with database and settings |
//! | `config add\|list\|del` | Manage doc/source configs |
//! | `check` | Status pass; non-zero exit when a doc needs review |
//! | `update` | Acknowledge changes |
//! | `rename`, `forget` | Follow moved sources, drop removed ones |
//!
//! All commands accept `--format text|json`, `--verbose` and
//! `--workspace <dir>` (or `DOC_HUNT_HOME`).

mod app;
mod args;
mod check_cmd;
mod config_cmd;
mod output;

pub use app::{run, Cli, Commands};
pub use args::{parse_config_add_args, parse_config_del_args, ArgsError, ConfigAddArgs};
pub use output::{Output, OutputFormat};
