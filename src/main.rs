use anyhow::Context;
use clap::{CommandFactory, Parser};
use cellcalc::cli::{self, CalculateOptions};
use cellcalc::writer::OutputFormat;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "cellcalc")]
#[command(about = "Resolve cell formulas in a comma-separated table.")]
#[command(long_about = "cellcalc - resolve cell formulas in a comma-separated table

INPUT:
  ,A,B,Cell
  1,1,0,1
  2,2,=A1+Cell30,0
  30,0,=B1+A1,5

  Line 1 names the columns (the first field is a placeholder).
  Every other line is a row number followed by one value per column:
  an integer, or a formula =<cell><op><cell> with op in + - * /.

OUTPUT:
  The same table with every formula replaced by its value.

EXAMPLES:
  cellcalc table.csv                  # Print resolved table
  cellcalc table.csv -o out.csv       # Write to a file
  cellcalc table.csv --format json    # JSON output
  cellcalc table.csv --audit B2       # Show how B2 was computed

LOGGING:
  Set CELLCALC_LOG (e.g. cellcalc=debug) or pass --verbose.")]
#[command(version)]
struct Cli {
    /// Path to the input table
    file: Option<PathBuf>,

    /// Write the resolved table to this file instead of stdout
    #[arg(short, long, env = "CELLCALC_OUTPUT")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv, env = "CELLCALC_FORMAT")]
    format: OutputFormat,

    /// Print the dependency tree of a cell (e.g. B2) to stderr
    #[arg(short, long, value_name = "CELL")]
    audit: Option<String>,

    /// Show resolution steps
    #[arg(short, long)]
    verbose: bool,

    /// Disable coloured status output
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    cli::init_logging(cli.verbose);

    let Some(file) = cli.file else {
        eprintln!("{}", Cli::command().render_usage());
        eprintln!("Pass the input file path as an argument.");
        return ExitCode::SUCCESS;
    };

    let options = CalculateOptions {
        file,
        output: cli.output,
        format: cli.format,
        audit: cli.audit,
    };

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".bold().red());
            ExitCode::FAILURE
        }
    }
}

fn run(options: &CalculateOptions) -> anyhow::Result<()> {
    cli::calculate(options)
        .with_context(|| format!("failed to process {}", options.file.display()))
}
