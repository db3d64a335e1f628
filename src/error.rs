use crate::types::CellAddress;
use thiserror::Error;

pub type CalcResult<T> = Result<T, CalcError>;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Empty line at line {line}")]
    EmptyLine { line: usize },

    #[error("Invalid value '{token}' at line {line}")]
    InvalidToken { line: usize, token: String },

    #[error("Invalid formula '{formula}': {reason}")]
    InvalidFormula { formula: String, reason: String },

    #[error("Row at line {line} has {found} values, header declares {expected} columns")]
    RowCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row number {row} at line {line} must be at least 1")]
    NonPositiveRow { line: usize, row: i64 },

    #[error("Column '{column}' is declared more than once")]
    DuplicateColumn { column: String },

    #[error("Row {row} at line {line} is declared more than once")]
    DuplicateRow { line: usize, row: u32 },

    #[error("Cell {cell} references {reference}, which has no value")]
    DanglingReference {
        cell: CellAddress,
        reference: CellAddress,
    },

    #[error("Cyclic reference: {}", format_cycle(.cycle))]
    CyclicReference { cycle: Vec<CellAddress> },

    #[error("Division by zero in cell {cell}")]
    DivisionByZero { cell: CellAddress },

    #[error("Integer overflow in cell {cell}")]
    Overflow { cell: CellAddress },

    #[error("Unknown operator '{symbol}'")]
    UnknownOperator { symbol: char },

    #[error("Invalid cell address '{text}'")]
    InvalidCell { text: String },

    #[error("Cell {cell} is not part of the table")]
    UnknownCell { cell: CellAddress },
}

/// Failure of a single binary operation, before the engine knows which cell it belongs to.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,
}

impl ArithmeticError {
    pub fn at(self, cell: CellAddress) -> CalcError {
        match self {
            ArithmeticError::DivisionByZero => CalcError::DivisionByZero { cell },
            ArithmeticError::Overflow => CalcError::Overflow { cell },
        }
    }
}

fn format_cycle(cycle: &[CellAddress]) -> String {
    cycle
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
