//! Shared helpers for the CLI subcommands: tracing setup and catalog
//! loading.

use std::path::Path;

use anyhow::{Context, Result};
use nutribot_catalog::Catalog;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber.  `RUST_LOG` takes precedence over
/// `default_level`.  Logs go to stderr so they never mix with replies.
pub fn init_tracing(default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Load the catalog from `data_dir`, or the built-in sample when `None`.
pub fn load_catalog(data_dir: Option<&Path>) -> Result<Catalog> {
    match data_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "loading catalog from directory");
            Catalog::load_dir(dir)
                .with_context(|| format!("failed to load catalog from {}", dir.display()))
        }
        None => Catalog::embedded().context("failed to load built-in catalog"),
    }
}
