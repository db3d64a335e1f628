//! Token classification for table cells.
//!
//! Every raw field is one of three shapes: a column identifier, an integer
//! literal or a two-cell formula. Anything else is rejected with the line it
//! came from.

use crate::error::{CalcError, CalcResult};
use regex::Regex;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Alphabetic column name, e.g. `Cell`
    Column,
    /// `0` or an optionally negative integer without leading zeros
    Integer,
    /// `=<col><row><op><col><row>`
    Formula,
}

/// Compiled patterns for the three token shapes.
pub struct Classifier {
    column: Regex,
    integer: Regex,
    formula: Regex,
}

impl Classifier {
    pub fn new() -> CalcResult<Self> {
        Ok(Self {
            column: Regex::new(r"^[A-Za-z]+$")?,
            integer: Regex::new(r"^(?:-?[1-9][0-9]*|0)$")?,
            formula: Regex::new(r"^=[A-Za-z]+[1-9][0-9]*[-+*/][A-Za-z]+[1-9][0-9]*$")?,
        })
    }

    pub fn classify(&self, token: &str, line: usize) -> CalcResult<TokenKind> {
        let kind = if self.column.is_match(token) {
            TokenKind::Column
        } else if self.integer.is_match(token) {
            TokenKind::Integer
        } else if self.formula.is_match(token) {
            TokenKind::Formula
        } else {
            return Err(CalcError::InvalidToken {
                line,
                token: token.to_string(),
            });
        };

        trace!(token, ?kind, line, "classified token");
        Ok(kind)
    }
}
