use anyhow::{bail, Result};
use futures::StreamExt;
use murmur_core::{HistoryEditor, StreamRelay};
use std::io::{BufRead, Write};

use crate::commands::format_history;

// ── Single-prompt mode ──────────────────────────────────────────────────

/// Read the one line of input for a single-shot run.
pub fn read_prompt(mut input: impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let prompt = line.trim_end_matches(['\r', '\n']).to_string();
    if prompt.trim().is_empty() {
        bail!("No input given");
    }
    Ok(prompt)
}

/// Run one cycle, writing fragments to `out` as they arrive.
///
/// On failure the text already written stays on screen, but the relay has
/// not persisted anything.
pub async fn run_single_prompt(
    relay: &StreamRelay,
    prompt: &str,
    out: &mut impl Write,
) -> Result<String> {
    let mut stream = relay.respond(prompt);
    let mut reply = String::new();

    while let Some(item) = stream.next().await {
        match item {
            Ok(fragment) => {
                write!(out, "{fragment}")?;
                out.flush()?;
                reply.push_str(&fragment);
            }
            Err(e) => {
                writeln!(out)?;
                out.flush()?;
                return Err(e.into());
            }
        }
    }

    writeln!(out)?;
    Ok(reply)
}

// ── History editing ─────────────────────────────────────────────────────

pub fn print_history(editor: &HistoryEditor, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", format_history(&editor.list()))?;
    Ok(())
}

pub fn edit_entry(editor: &HistoryEditor, index: usize, content: &str) -> Result<()> {
    if !editor.edit(index, content)? {
        tracing::warn!(index, "No entry at that index, nothing edited");
    }
    Ok(())
}

pub fn delete_entry(editor: &HistoryEditor, index: usize) -> Result<()> {
    if !editor.delete(index)? {
        tracing::warn!(index, "No entry at that index, nothing deleted");
    }
    Ok(())
}
