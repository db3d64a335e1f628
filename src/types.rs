use crate::error::{ArithmeticError, CalcError, CalcResult};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

//==============================================================================
// Cell Address
//==============================================================================

/// Position of a cell in the table: column name plus declared row number.
///
/// Ordering is column first, then row, which is the order the pending
/// formula set hands out cells when nothing is being chased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellAddress {
    pub column: String,
    pub row: u32,
}

impl CellAddress {
    pub fn new(column: impl Into<String>, row: u32) -> Self {
        Self {
            column: column.into(),
            row,
        }
    }

    /// Split `<letters><digits>` into an address.
    ///
    /// The column is the maximal leading run of ASCII letters, everything after
    /// it must be the row number. Returns a short reason on failure so callers
    /// can wrap it in the error that fits their context.
    pub fn parse_parts(text: &str) -> Result<Self, &'static str> {
        let split = text
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        let (column, digits) = text.split_at(split);

        if column.is_empty() {
            return Err("missing column name");
        }
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err("row is not a number");
        }
        let row = digits.parse::<u32>().map_err(|_| "row is out of range")?;
        if row == 0 {
            return Err("row must be at least 1");
        }

        Ok(Self::new(column, row))
    }
}

impl FromStr for CellAddress {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_parts(s).map_err(|_| CalcError::InvalidCell {
            text: s.to_string(),
        })
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

//==============================================================================
// Operators and Reference Expressions
//==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// Apply the operator to two resolved values.
    ///
    /// Division truncates toward zero. Every operation is checked; leaving the
    /// `i64` range is reported instead of wrapping.
    pub fn apply(self, a: i64, b: i64) -> Result<i64, ArithmeticError> {
        let result = match self {
            Operator::Add => a.checked_add(b),
            Operator::Sub => a.checked_sub(b),
            Operator::Mul => a.checked_mul(b),
            Operator::Div => {
                if b == 0 {
                    return Err(ArithmeticError::DivisionByZero);
                }
                a.checked_div(b)
            }
        };
        result.ok_or(ArithmeticError::Overflow)
    }
}

impl TryFrom<char> for Operator {
    type Error = CalcError;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        match symbol {
            '+' => Ok(Operator::Add),
            '-' => Ok(Operator::Sub),
            '*' => Ok(Operator::Mul),
            '/' => Ok(Operator::Div),
            _ => Err(CalcError::UnknownOperator { symbol }),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A parsed formula: exactly one binary operation over two cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceExpression {
    pub left: CellAddress,
    pub op: Operator,
    pub right: CellAddress,
}

impl ReferenceExpression {
    pub fn new(left: CellAddress, op: Operator, right: CellAddress) -> Self {
        Self { left, op, right }
    }

    /// Referenced cells, left before right.
    pub fn operands(&self) -> [&CellAddress; 2] {
        [&self.left, &self.right]
    }
}

impl fmt::Display for ReferenceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "={}{}{}", self.left, self.op, self.right)
    }
}

//==============================================================================
// Parsed Table
//==============================================================================

/// Table as read from input, before any formula is resolved.
///
/// Every declared cell lives in exactly one of `values` (integer literals)
/// or `formulas` (pending reference expressions).
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Column names in header order
    pub columns: Vec<String>,
    /// Row numbers in input order
    pub rows: Vec<u32>,
    pub values: HashMap<CellAddress, i64>,
    pub formulas: BTreeMap<CellAddress, ReferenceExpression>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            ..Default::default()
        }
    }

    pub fn has_row(&self, row: u32) -> bool {
        self.rows.contains(&row)
    }

    /// True when the address names a declared column and row.
    pub fn contains(&self, cell: &CellAddress) -> bool {
        self.columns.iter().any(|c| *c == cell.column) && self.has_row(cell.row)
    }

    pub fn cell_count(&self) -> usize {
        self.columns.len() * self.rows.len()
    }

    pub fn formula(&self, cell: &CellAddress) -> Option<&ReferenceExpression> {
        self.formulas.get(cell)
    }

    pub fn set_value(&mut self, cell: CellAddress, value: i64) {
        self.formulas.remove(&cell);
        self.values.insert(cell, value);
    }

    pub fn set_formula(&mut self, cell: CellAddress, formula: ReferenceExpression) {
        self.values.remove(&cell);
        self.formulas.insert(cell, formula);
    }
}

//==============================================================================
// Resolved Grid
//==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub row: u32,
    /// One value per column, in header order
    pub values: Vec<i64>,
}

/// Fully resolved table, in input shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedGrid {
    pub columns: Vec<String>,
    pub rows: Vec<GridRow>,
}

impl ResolvedGrid {
    /// Lay out a complete value store in the table's column and row order.
    pub fn from_values(table: &Table, values: &HashMap<CellAddress, i64>) -> CalcResult<Self> {
        let mut rows = Vec::with_capacity(table.rows.len());
        for &row in &table.rows {
            let mut row_values = Vec::with_capacity(table.columns.len());
            for column in &table.columns {
                let cell = CellAddress::new(column.as_str(), row);
                match values.get(&cell) {
                    Some(&value) => row_values.push(value),
                    None => return Err(CalcError::UnknownCell { cell }),
                }
            }
            rows.push(GridRow {
                row,
                values: row_values,
            });
        }

        Ok(Self {
            columns: table.columns.clone(),
            rows,
        })
    }

    pub fn get(&self, cell: &CellAddress) -> Option<i64> {
        let col_idx = self.columns.iter().position(|c| *c == cell.column)?;
        let row = self.rows.iter().find(|r| r.row == cell.row)?;
        row.values.get(col_idx).copied()
    }
}
