//! `weblens diff`: run the snapshot diff over two local files.

use std::path::Path;

use serde::Serialize;

use weblens_core::diff::render_text;
use weblens_core::{diff_lines, DiffChunk, DiffStats};

use crate::cli::DiffFormat;

#[derive(Serialize)]
struct DiffReport {
    changes: Vec<DiffChunk>,
    stats: DiffStats,
}

/// Render the diff of two texts in the requested format.
pub(crate) fn render(older: &str, newer: &str, format: DiffFormat) -> Result<String, serde_json::Error> {
    let changes = diff_lines(older, newer);
    let stats = DiffStats::from_chunks(&changes);

    match format {
        DiffFormat::Text => Ok(format!(
            "{}\n{} added, {} removed, {} unchanged\n",
            render_text(&changes),
            stats.added,
            stats.removed,
            stats.unchanged
        )),
        DiffFormat::Json => {
            let mut json = serde_json::to_string_pretty(&DiffReport { changes, stats })?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Diff two files and print the result to stdout.
pub(crate) async fn run(
    older: &Path,
    newer: &Path,
    format: DiffFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let older_text = tokio::fs::read_to_string(older)
        .await
        .map_err(|e| format!("Failed to read {}: {}", older.display(), e))?;
    let newer_text = tokio::fs::read_to_string(newer)
        .await
        .map_err(|e| format!("Failed to read {}: {}", newer.display(), e))?;

    print!("{}", render(&older_text, &newer_text, format)?);
    Ok(())
}
