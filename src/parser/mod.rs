//! Reading the comma-separated table.
//!
//! Line 1 is the header: an ignored placeholder field followed by column
//! names. Every following line is a row number followed by one value per
//! column, each value an integer literal or a formula.

pub mod classify;
pub mod formula;

pub use classify::{Classifier, TokenKind};
pub use formula::parse_formula;

use crate::error::{CalcError, CalcResult};
use crate::types::{CellAddress, Table};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Read and parse a table file.
///
/// # Example
/// ```no_run
/// use cellcalc::parser::parse_table_file;
/// use std::path::Path;
///
/// let table = parse_table_file(Path::new("table.csv"))?;
/// println!("Columns: {:?}", table.columns);
/// # Ok::<(), cellcalc::error::CalcError>(())
/// ```
pub fn parse_table_file(path: &Path) -> CalcResult<Table> {
    let content = std::fs::read_to_string(path)?;
    parse_table(&content)
}

/// Parse table text into literal values and pending formulas.
///
/// Fails on the first structural or token error; nothing is resolved here.
pub fn parse_table(content: &str) -> CalcResult<Table> {
    let classifier = Classifier::new()?;
    let mut lines = content.lines().enumerate().map(|(idx, line)| (idx + 1, line));

    let (header_line, header) = lines.next().unwrap_or((1, ""));
    let mut table = Table::new(parse_header(&classifier, header, header_line)?);
    let mut seen_rows = HashSet::new();

    for (line_no, line) in lines {
        parse_row(&classifier, &mut table, &mut seen_rows, line, line_no)?;
    }

    info!(
        columns = table.columns.len(),
        rows = table.rows.len(),
        literals = table.values.len(),
        formulas = table.formulas.len(),
        "parsed table"
    );
    Ok(table)
}

fn parse_header(classifier: &Classifier, line: &str, line_no: usize) -> CalcResult<Vec<String>> {
    if line.is_empty() {
        return Err(CalcError::EmptyLine { line: line_no });
    }

    let mut columns = Vec::new();
    let mut seen = HashSet::new();

    // The first field only keeps the header aligned with the row-number column.
    for name in line.split(',').skip(1) {
        if classifier.classify(name, line_no)? != TokenKind::Column {
            return Err(CalcError::InvalidToken {
                line: line_no,
                token: name.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(CalcError::DuplicateColumn {
                column: name.to_string(),
            });
        }
        columns.push(name.to_string());
    }

    debug!(?columns, "parsed header");
    Ok(columns)
}

fn parse_row(
    classifier: &Classifier,
    table: &mut Table,
    seen_rows: &mut HashSet<u32>,
    line: &str,
    line_no: usize,
) -> CalcResult<()> {
    if line.is_empty() {
        return Err(CalcError::EmptyLine { line: line_no });
    }

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != table.columns.len() + 1 {
        return Err(CalcError::RowCountMismatch {
            line: line_no,
            expected: table.columns.len(),
            found: fields.len() - 1,
        });
    }

    let row = parse_row_number(classifier, fields[0], line_no)?;
    if !seen_rows.insert(row) {
        return Err(CalcError::DuplicateRow { line: line_no, row });
    }
    table.rows.push(row);

    let cells: Vec<CellAddress> = table
        .columns
        .iter()
        .map(|column| CellAddress::new(column.as_str(), row))
        .collect();

    for (cell, &token) in cells.into_iter().zip(&fields[1..]) {
        match classifier.classify(token, line_no)? {
            TokenKind::Integer => {
                let value = parse_integer(token, line_no)?;
                table.set_value(cell, value);
            }
            TokenKind::Formula => {
                let formula = parse_formula(token)?;
                table.set_formula(cell, formula);
            }
            TokenKind::Column => {
                return Err(CalcError::InvalidToken {
                    line: line_no,
                    token: token.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn parse_row_number(classifier: &Classifier, token: &str, line_no: usize) -> CalcResult<u32> {
    if classifier.classify(token, line_no)? != TokenKind::Integer {
        return Err(CalcError::InvalidToken {
            line: line_no,
            token: token.to_string(),
        });
    }

    let row = parse_integer(token, line_no)?;
    if row < 1 {
        return Err(CalcError::NonPositiveRow { line: line_no, row });
    }
    u32::try_from(row).map_err(|_| CalcError::InvalidToken {
        line: line_no,
        token: token.to_string(),
    })
}

/// Integer literals that match the grammar but do not fit in `i64` are invalid tokens.
fn parse_integer(token: &str, line_no: usize) -> CalcResult<i64> {
    token.parse::<i64>().map_err(|_| CalcError::InvalidToken {
        line: line_no,
        token: token.to_string(),
    })
}
