//! Rendering a resolved grid back to text.

use crate::error::CalcResult;
use crate::types::ResolvedGrid;
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Supported output renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Same comma-separated shape as the input
    #[default]
    Csv,
    /// Pretty-printed JSON document
    Json,
}

impl OutputFormat {
    pub fn render(self, grid: &ResolvedGrid) -> CalcResult<String> {
        match self {
            OutputFormat::Csv => Ok(render_csv(grid)),
            OutputFormat::Json => render_json(grid),
        }
    }
}

/// Render the grid as comma-separated text: a header with a leading comma,
/// then one line per row with the row number first.
pub fn render_csv(grid: &ResolvedGrid) -> String {
    let mut out = String::new();

    for column in &grid.columns {
        out.push(',');
        out.push_str(column);
    }
    out.push('\n');

    for row in &grid.rows {
        // Writing into a String cannot fail.
        let _ = write!(out, "{}", row.row);
        for value in &row.values {
            let _ = write!(out, ",{value}");
        }
        out.push('\n');
    }

    out
}

/// Render the grid as `{"columns": [...], "rows": [{"row": n, "values": [...]}]}`.
pub fn render_json(grid: &ResolvedGrid) -> CalcResult<String> {
    let mut json = serde_json::to_string_pretty(grid)?;
    json.push('\n');
    Ok(json)
}

/// Write rendered output to `path`, or to stdout when no path is given.
pub fn write_output(rendered: &str, path: Option<&Path>) -> CalcResult<()> {
    match path {
        Some(path) => fs::write(path, rendered)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
