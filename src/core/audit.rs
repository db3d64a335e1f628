//! Dependency audit trail for a single cell of a resolved table.

use crate::error::{CalcError, CalcResult};
use crate::types::{CellAddress, ReferenceExpression, ResolvedGrid, Table};
use std::collections::HashSet;
use std::fmt;

/// One cell in an audit tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditNode {
    pub cell: CellAddress,
    pub value: i64,
    /// Formula the value came from, `None` for a literal
    pub formula: Option<ReferenceExpression>,
    /// Operand nodes, left then right. Empty for literals and for formulas
    /// already expanded elsewhere in the tree.
    pub children: Vec<AuditNode>,
    /// Set when this formula was expanded earlier in the tree
    pub repeated: bool,
}

/// Build the dependency tree of `cell` from the parsed formulas and their
/// resolved values.
///
/// Each formula cell is expanded once; later occurrences are marked
/// `repeated` so shared operands do not blow the tree up.
pub fn audit(table: &Table, grid: &ResolvedGrid, cell: &CellAddress) -> CalcResult<AuditNode> {
    if !table.contains(cell) {
        return Err(CalcError::UnknownCell { cell: cell.clone() });
    }
    let mut expanded = HashSet::new();
    build_node(table, grid, cell, &mut expanded)
}

fn build_node(
    table: &Table,
    grid: &ResolvedGrid,
    cell: &CellAddress,
    expanded: &mut HashSet<CellAddress>,
) -> CalcResult<AuditNode> {
    let value = grid
        .get(cell)
        .ok_or_else(|| CalcError::UnknownCell { cell: cell.clone() })?;
    let formula = table.formula(cell).cloned();

    let mut node = AuditNode {
        cell: cell.clone(),
        value,
        formula: formula.clone(),
        children: Vec::new(),
        repeated: false,
    };

    if let Some(expr) = formula {
        if !expanded.insert(cell.clone()) {
            node.repeated = true;
            return Ok(node);
        }
        for operand in expr.operands() {
            node.children.push(build_node(table, grid, operand, expanded)?);
        }
    }

    Ok(node)
}

impl AuditNode {
    /// Number of formula cells in the tree, counting repeats once.
    pub fn formula_count(&self) -> usize {
        let own = usize::from(self.formula.is_some() && !self.repeated);
        own + self.children.iter().map(AuditNode::formula_count).sum::<usize>()
    }

    fn write_tree(
        &self,
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
        last: bool,
        root: bool,
    ) -> fmt::Result {
        let (branch, indent) = match (root, last) {
            (true, _) => ("", ""),
            (false, true) => ("└─ ", "   "),
            (false, false) => ("├─ ", "│  "),
        };

        write!(f, "{prefix}{branch}{} = {}", self.cell, self.value)?;
        if let Some(expr) = &self.formula {
            write!(f, "  ({expr})")?;
        }
        if self.repeated {
            write!(f, "  [see above]")?;
        }
        writeln!(f)?;

        let child_prefix = format!("{prefix}{indent}");
        let count = self.children.len();
        for (idx, child) in self.children.iter().enumerate() {
            child.write_tree(f, &child_prefix, idx + 1 == count, false)?;
        }
        Ok(())
    }
}

impl fmt::Display for AuditNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, "", true, true)
    }
}
