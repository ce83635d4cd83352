//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use navflow_shared::EnvMode;

/// Environment override accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvModeArg {
    /// Clear the override and resolve automatically.
    Auto,
    /// Always use the intranet overlay.
    Intranet,
    /// Always use the internet overlay.
    Internet,
}

impl From<EnvModeArg> for EnvMode {
    fn from(arg: EnvModeArg) -> Self {
        match arg {
            EnvModeArg::Auto => EnvMode::Auto,
            EnvModeArg::Intranet => EnvMode::Intranet,
            EnvModeArg::Internet => EnvMode::Internet,
        }
    }
}

/// Top-level arguments.
#[derive(Parser)]
#[command(name = "nf-cli", version, about = "NavFlow navigation portal CLI")]
pub struct Cli {
    /// Site root: a directory or an http(s) base URL. Defaults to
    /// `NAVFLOW_SOURCE`, then `./site`.
    #[arg(long, global = true)]
    pub source: Option<String>,
    /// Persisted state file. Defaults to `NAVFLOW_STATE_PATH`, then
    /// `~/.navflow/state.json`.
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the environment, merge links and print every group.
    Show {
        /// Only show cards whose names, descriptions or tags contain this
        /// text (case-insensitive).
        #[arg(long)]
        filter: Option<String>,
    },
    /// Print the effective environment and how it was decided.
    Resolve {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Persist an environment override, then reload from scratch.
    Env {
        /// New override.
        #[arg(value_enum)]
        mode: EnvModeArg,
    },
    /// Toggle a favorite by identity key (url, else name), then reload.
    Favorite {
        /// Identity key of the link.
        key: String,
    },
    /// List persisted favorite keys.
    Favorites,
    /// Select the display language.
    Lang {
        /// Locale code.
        #[arg(value_parser = ["zh-CN", "en-US"], conflicts_with = "next")]
        code: Option<String>,
        /// Cycle to the next supported locale.
        #[arg(long)]
        next: bool,
    },
    /// Toggle between standard and compact cards.
    Density,
    /// Toggle between light and dark themes.
    Theme,
    /// Print persisted preferences.
    Prefs,
}
