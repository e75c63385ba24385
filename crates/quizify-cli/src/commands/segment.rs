//! The `quizify segment` command.

use std::io::Read;

use anyhow::{Context, Result};

use quizify_core::segment::{segment_with, Segment, SegmentOptions};

pub fn execute(text: Option<String>, display: bool, format: String) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read text from stdin")?;
            // Drop the newline `echo` appends.
            match buf.strip_suffix('\n') {
                Some(stripped) => stripped.trim_end_matches('\r').to_string(),
                None => buf,
            }
        }
    };

    let segments = segment_with(
        &text,
        SegmentOptions {
            force_display: display,
        },
    );
    tracing::debug!(count = segments.len(), "segmented input");

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&segments)?);
        }
        "text" => {
            for segment in &segments {
                let kind = match segment {
                    Segment::Text { .. } => "text",
                    Segment::Math { display: false, .. } => "inline",
                    Segment::Math { display: true, .. } => "display",
                };
                println!("{kind}\t{}", segment.value().escape_debug());
            }
        }
        other => anyhow::bail!("unknown format '{other}' (expected json or text)"),
    }

    Ok(())
}
