//! Subcommand: `nutribot chat` -- interactive REPL.
//!
//! Reads one line per turn and prints the orchestrator's reply.  Exit words
//! and end of input end the chat with a goodbye; everything else, blank
//! lines included, is a turn.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use nutribot_agent::{GOODBYE, Orchestrator, greeting};
use tracing::info;

/// Run a chat over `input` / `output` until an exit word or end of input.
/// Returns the number of turns handled.
pub fn run_chat<R: BufRead, W: Write>(
    bot: &Orchestrator,
    session_id: &str,
    input: R,
    output: &mut W,
) -> Result<usize> {
    info!(session_id, "chat started");
    writeln!(output, "🤖 Bot: {}", greeting())?;

    let mut turns = 0;
    let mut lines = input.lines();
    loop {
        write!(output, "\n👤 You: ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read input")?;

        if bot.config().is_exit_word(&line) {
            info!("user requested exit");
            break;
        }

        let reply = bot.handle(session_id, &line);
        writeln!(output, "🤖 Bot: {reply}")?;
        turns += 1;
    }

    writeln!(output, "\n🤖 Bot: {GOODBYE}")?;
    info!(session_id, turns, "chat ended");
    Ok(turns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    use nutribot_agent::AgentConfig;
    use nutribot_catalog::Catalog;

    fn bot() -> Orchestrator {
        let catalog = Arc::new(Catalog::embedded().unwrap());
        Orchestrator::new(catalog, AgentConfig::default()).unwrap()
    }

    fn transcript(bot: &Orchestrator, script: &str) -> (usize, String) {
        let mut out = Vec::new();
        let turns = run_chat(bot, "repl", Cursor::new(script), &mut out).unwrap();
        (turns, String::from_utf8(out).unwrap())
    }

    #[test]
    fn greets_and_says_goodbye() {
        let (turns, text) = transcript(&bot(), "bye\n");
        assert_eq!(turns, 0);
        assert!(text.starts_with("🤖 Bot: Hello! I'm your nutrition assistant!"));
        assert!(text.trim_end().ends_with(GOODBYE));
    }

    #[test]
    fn exit_word_stops_before_later_lines() {
        let bot = bot();
        let (turns, _) = transcript(&bot, "find me a recipe\nQUIT\nlog my food\n");
        assert_eq!(turns, 1);
        assert_eq!(bot.session_summary("repl").unwrap().total_messages, 2);
    }

    #[test]
    fn blank_line_is_a_turn() {
        let (turns, text) = transcript(&bot(), "\n");
        assert_eq!(turns, 1);
        assert!(text.contains("I didn't catch that."));
    }

    #[test]
    fn end_of_input_ends_the_chat() {
        let (turns, text) = transcript(&bot(), "hello");
        assert_eq!(turns, 1);
        assert!(text.contains("Try saying things like:"));
        assert!(text.trim_end().ends_with(GOODBYE));
    }
}
