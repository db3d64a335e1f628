use crate::error::{CalcError, CalcResult};
use crate::types::{CellAddress, Operator, ReferenceExpression};

const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

/// Parse `=<col><row><op><col><row>` into a [`ReferenceExpression`].
///
/// The operator is the first of `+ - * /` after the leading `=`; the text on
/// either side is split greedily into letters and digits. No whitespace is
/// accepted anywhere.
pub fn parse_formula(token: &str) -> CalcResult<ReferenceExpression> {
    let invalid = |reason: &str| CalcError::InvalidFormula {
        formula: token.to_string(),
        reason: reason.to_string(),
    };

    let body = token
        .strip_prefix('=')
        .ok_or_else(|| invalid("missing leading '='"))?;
    let op_pos = body
        .find(OPERATORS)
        .ok_or_else(|| invalid("missing operator"))?;

    let (left, rest) = body.split_at(op_pos);
    let mut rest = rest.chars();
    let op = match rest.next() {
        Some(symbol) => Operator::try_from(symbol)?,
        None => return Err(invalid("missing operator")),
    };
    let right = rest.as_str();

    let left = CellAddress::parse_parts(left).map_err(&invalid)?;
    let right = CellAddress::parse_parts(right).map_err(&invalid)?;

    Ok(ReferenceExpression::new(left, op, right))
}
