//! CLI argument definitions for NutriBot.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// NutriBot -- a conversational nutrition and cooking assistant.
#[derive(Parser)]
#[command(
    name = "nutribot",
    version,
    about = "NutriBot -- nutrition and cooking assistant",
    long_about = "A conversational assistant that finds recipes, plans meals, builds grocery \
                  lists, guides you through cooking, and tracks what you eat."
)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Directory holding the catalog JSON files.  Overrides `[catalog]
    /// data_dir`; when neither is set the built-in sample catalog is used.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level filter (e.g. `info`, `debug`).  `RUST_LOG` wins when set.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat.
    Chat {
        /// Name the conversation's session.
        #[arg(long, short)]
        session: Option<String>,
    },

    /// Send one or more messages in a fresh session and print the replies.
    Ask {
        /// Each argument is sent as its own turn.
        #[arg(required = true)]
        messages: Vec<String>,
    },

    /// Show which journey a message would start.
    Classify {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Show catalog and configuration status.
    Status,
}
