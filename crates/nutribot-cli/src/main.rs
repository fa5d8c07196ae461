//! CLI entry point for NutriBot.
//!
//! This binary provides the `nutribot` command with subcommands for
//! chatting, one-shot questions, intent classification, and status.

mod cli;
mod config;
mod helpers;
mod repl;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use nutribot_agent::Orchestrator;
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::config::{CliConfig, ConfigSource};
use crate::helpers::{init_tracing, load_catalog};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let (config, source) = CliConfig::load(&cli.config)?;
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, cli.json_logs || config.logging.json);
    info!(config = %source, "configuration loaded");

    let data_dir = cli.data_dir.clone().or_else(|| config.catalog.data_dir());
    let catalog = Arc::new(load_catalog(data_dir.as_deref())?);
    let bot = Orchestrator::new(catalog, config.agent.clone())
        .context("failed to build orchestrator")?;

    match cli.command {
        Commands::Chat { session } => cmd_chat(&bot, session),
        Commands::Ask { messages } => cmd_ask(&bot, &messages),
        Commands::Classify { text } => cmd_classify(&bot, &text.join(" ")),
        Commands::Status => cmd_status(&bot, &source, data_dir.as_deref()),
    }
}

// ---------------------------------------------------------------------------
// Subcommand: chat
// ---------------------------------------------------------------------------

fn cmd_chat(bot: &Orchestrator, session: Option<String>) -> Result<()> {
    let session_id = session.unwrap_or_else(|| bot.create_session());
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    repl::run_chat(bot, &session_id, stdin.lock(), &mut stdout)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: ask
// ---------------------------------------------------------------------------

fn cmd_ask(bot: &Orchestrator, messages: &[String]) -> Result<()> {
    let session_id = bot.create_session();
    for message in messages {
        println!("👤 You: {message}");
        println!("🤖 Bot: {}\n", bot.handle(&session_id, message));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: classify
// ---------------------------------------------------------------------------

fn cmd_classify(bot: &Orchestrator, text: &str) -> Result<()> {
    match bot.classifier().classify_with_confidence(text) {
        Some(hit) => println!(
            "{} ({}) confidence {:.2}, matched `{}`",
            hit.kind,
            hit.kind.title(),
            hit.confidence,
            hit.matched_pattern
        ),
        None => println!("no journey matched"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: status
// ---------------------------------------------------------------------------

fn cmd_status(
    bot: &Orchestrator,
    source: &ConfigSource,
    data_dir: Option<&std::path::Path>,
) -> Result<()> {
    let catalog = bot.catalog();
    let catalog_source = data_dir
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| "built-in sample".to_string());

    println!("NutriBot v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("  Config:              {source}");
    println!("  Catalog:             {catalog_source}");
    println!("  Recipes:             {}", catalog.recipes().len());
    println!("  Meal suggestions:    {}", catalog.meals().len());
    println!("  Foods:               {}", catalog.foods().len());
    println!("  Cookable recipes:    {}", catalog.cookable_recipes().len());
    println!("  Intent patterns:     {}", bot.classifier().pattern_count());
    println!("  History limit:       {}", bot.config().history_limit);
    println!("  Exit words:          {}", bot.config().exit_words.join(", "));
    Ok(())
}
