//! Rendering of retrieval results for the terminal.

use crate::{CliError, OutputFormat};
use queue_browser_core::{HexDump, MessageRecord, RetrievalResult, Termination};
use std::fmt::Write;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

/// Render a retrieval result in the requested format
pub fn render_result(
    queue: &str,
    result: &RetrievalResult,
    format: &OutputFormat,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(result).map_err(|e| {
            CliError::CommandFailed {
                message: format!("failed to render JSON: {}", e),
            }
        }),
        OutputFormat::Yaml => serde_yaml::to_string(result).map_err(|e| CliError::CommandFailed {
            message: format!("failed to render YAML: {}", e),
        }),
        OutputFormat::Text => Ok(render_text(queue, result, false)),
        OutputFormat::Hexdump => Ok(render_text(queue, result, true)),
    }
}

fn render_text(queue: &str, result: &RetrievalResult, hexdump: bool) -> String {
    let mut out = String::new();

    let termination = match result.termination {
        Termination::Complete => "complete",
        Termination::Exhausted => "exhausted",
        Termination::Failed => "failed",
    };
    let _ = writeln!(out, "Queue:       {}", queue);
    let _ = writeln!(out, "Termination: {}", termination);
    let _ = writeln!(out, "Messages:    {}", result.messages.len());
    let _ = writeln!(out, "Get calls:   {}", result.get_calls);
    if let Some(more) = result.more_available {
        let _ = writeln!(out, "More:        {}", if more { "yes" } else { "no" });
    }
    if let Some(ref error) = result.error {
        let _ = writeln!(out, "Error:       {}", error);
    }

    for (index, record) in result.messages.iter().enumerate() {
        out.push('\n');
        render_header(&mut out, index + 1, record);
        if hexdump {
            out.push_str(&HexDump::from_bytes(record.payload()).to_text());
        } else {
            match record.payload_text() {
                Some(text) => {
                    let _ = writeln!(out, "    {}", text);
                }
                None => {
                    let _ = writeln!(
                        out,
                        "    <{} bytes of binary data>",
                        record.payload().len()
                    );
                }
            }
        }
    }

    out
}

fn render_header(out: &mut String, position: usize, record: &MessageRecord) {
    let descriptor = record.descriptor();
    let _ = write!(
        out,
        "[{}] msg_id={} format={}",
        position, descriptor.message_id, descriptor.format
    );
    if let Some(ref correlation_id) = descriptor.correlation_id {
        let _ = write!(out, " correl_id={}", correlation_id);
    }
    if let Some(sequence) = descriptor.sequence {
        let _ = write!(out, " seq={}", sequence);
    }
    out.push('\n');
}
