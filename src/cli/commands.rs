use crate::core::{audit, resolve};
use crate::error::CalcResult;
use crate::parser;
use crate::types::{CellAddress, ResolvedGrid};
use crate::writer::{self, OutputFormat};
use colored::Colorize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive, e.g. `cellcalc=trace`.
pub const LOG_ENV: &str = "CELLCALC_LOG";

/// Install the stderr log subscriber.
///
/// `CELLCALC_LOG` wins when set; otherwise only warnings are shown, or debug
/// output with `verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "cellcalc=debug" } else { "cellcalc=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default.into());

    // A subscriber may already be installed when embedded or under test.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

/// Options for the calculate command
#[derive(Debug, Clone, Default)]
pub struct CalculateOptions {
    /// Input table
    pub file: PathBuf,
    /// Destination for the rendered grid, stdout when `None`
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    /// Cell whose dependency tree is printed to stderr
    pub audit: Option<String>,
}

/// Parse and resolve a table file.
pub fn evaluate_file(path: &Path) -> CalcResult<ResolvedGrid> {
    let table = parser::parse_table_file(path)?;
    resolve(&table)
}

/// Execute the calculate command.
///
/// Nothing is written unless parsing, resolution, the optional audit and
/// rendering all succeed.
pub fn calculate(options: &CalculateOptions) -> CalcResult<()> {
    info!(file = %options.file.display(), "calculating");

    let table = parser::parse_table_file(&options.file)?;
    let grid = resolve(&table)?;

    let audit_report = match &options.audit {
        Some(target) => {
            let cell: CellAddress = target.parse()?;
            Some(audit(&table, &grid, &cell)?)
        }
        None => None,
    };

    let rendered = options.format.render(&grid)?;

    if let Some(report) = audit_report {
        eprintln!("{}", "🔍 Audit Trail:".bold().cyan());
        for line in report.to_string().lines() {
            eprintln!("   {line}");
        }
        eprintln!(
            "   {}",
            format!("{} formula cell(s) traced", report.formula_count()).dimmed()
        );
    }

    writer::write_output(&rendered, options.output.as_deref())?;

    if let Some(path) = &options.output {
        info!(path = %path.display(), "wrote output");
    }
    Ok(())
}
