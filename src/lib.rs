//! cellcalc - resolve cell formulas in a comma-separated table
//!
//! This library reads a table whose cells hold integer literals or
//! two-operand formulas (`=A1+B2`), resolves every formula in dependency
//! order and renders the resulting integer grid.
//!
//! # Features
//!
//! - Formulas over `+ - * /` referencing any two cells of the table
//! - Depth-first resolution without recursion, with cycle detection
//! - Checked 64-bit integer arithmetic
//! - CSV and JSON output, plus a per-cell dependency audit
//!
//! # Example
//!
//! ```no_run
//! use cellcalc::core::resolve;
//! use cellcalc::parser::parse_table_file;
//! use cellcalc::writer::render_csv;
//! use std::path::Path;
//!
//! let table = parse_table_file(Path::new("table.csv"))?;
//! println!("Formulas: {}", table.formulas.len());
//!
//! let grid = resolve(&table)?;
//! print!("{}", render_csv(&grid));
//! # Ok::<(), cellcalc::error::CalcError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod parser;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{CalcError, CalcResult};
pub use types::{CellAddress, Operator, ReferenceExpression, ResolvedGrid, Table};
