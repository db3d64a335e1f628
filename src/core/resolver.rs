//! Formula resolution.
//!
//! Pending formulas are resolved depth-first without recursion: an explicit
//! visit stack holds the chain of cells being chased and a membership set
//! mirrors it, so a back edge (cycle) is found in O(1). Dependency edges are
//! never stored; they are read on demand from the pending formula set.

use crate::error::{CalcError, CalcResult};
use crate::types::{CellAddress, ReferenceExpression, ResolvedGrid, Table};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

/// Outcome of a single resolution step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A formula was reduced to a value and moved into the value store.
    Resolved { cell: CellAddress, value: i64 },
    /// A pending operand was pushed onto the visit stack.
    Descended { cell: CellAddress },
    /// Nothing is left pending.
    Done,
}

/// In-progress resolution of one table.
///
/// Owns its own copies of the value store and pending set, so the parsed
/// table is never mutated and can be resolved again with the same result.
pub struct Resolution<'a> {
    table: &'a Table,
    values: HashMap<CellAddress, i64>,
    pending: BTreeMap<CellAddress, ReferenceExpression>,
    stack: Vec<CellAddress>,
    visiting: HashSet<CellAddress>,
}

impl<'a> Resolution<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            values: table.values.clone(),
            pending: table.formulas.clone(),
            stack: Vec::new(),
            visiting: HashSet::new(),
        }
    }

    pub fn values(&self) -> &HashMap<CellAddress, i64> {
        &self.values
    }

    pub fn pending(&self) -> &BTreeMap<CellAddress, ReferenceExpression> {
        &self.pending
    }

    /// Cells currently being chased, outermost first.
    pub fn chain(&self) -> &[CellAddress] {
        &self.stack
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Dependency edges of `cell`: both operands while its formula is
    /// pending, nothing once it has a value.
    pub fn neighbors(&self, cell: &CellAddress) -> Vec<&CellAddress> {
        match self.pending.get(cell) {
            Some(expr) => expr.operands().to_vec(),
            None => Vec::new(),
        }
    }

    /// Advance resolution by one step.
    pub fn step(&mut self) -> CalcResult<Step> {
        let Some(current) = self.select_current() else {
            return Ok(Step::Done);
        };

        // Left operand is chased before right.
        let blocked_on = self
            .neighbors(&current)
            .into_iter()
            .find(|operand| self.pending.contains_key(*operand))
            .cloned();

        match blocked_on {
            Some(operand) => self.descend(operand),
            None => self.evaluate(current),
        }
    }

    /// Run until every formula has a value.
    pub fn run(mut self) -> CalcResult<ResolvedGrid> {
        let mut steps = 0usize;
        while self.step()? != Step::Done {
            steps += 1;
        }

        info!(
            cells = self.values.len(),
            formulas = self.table.formulas.len(),
            steps,
            "resolved table"
        );
        ResolvedGrid::from_values(self.table, &self.values)
    }

    /// Top of the visit stack, or the first remaining pending cell when the
    /// stack is empty. The chosen root goes onto the stack so that a chain
    /// leading back to it is reported as a cycle.
    fn select_current(&mut self) -> Option<CellAddress> {
        while let Some(top) = self.stack.last() {
            if self.pending.contains_key(top) {
                return Some(top.clone());
            }
            let top = self.stack.pop()?;
            self.visiting.remove(&top);
        }

        let root = self.pending.keys().next()?.clone();
        debug!(cell = %root, "starting new chain");
        self.enter(root.clone());
        Some(root)
    }

    fn enter(&mut self, cell: CellAddress) {
        self.visiting.insert(cell.clone());
        self.stack.push(cell);
    }

    fn descend(&mut self, operand: CellAddress) -> CalcResult<Step> {
        if self.visiting.contains(&operand) {
            return Err(self.cycle_error(operand));
        }

        debug!(cell = %operand, depth = self.stack.len(), "descending into pending operand");
        self.enter(operand.clone());
        Ok(Step::Descended { cell: operand })
    }

    fn evaluate(&mut self, cell: CellAddress) -> CalcResult<Step> {
        let Some(expr) = self.pending.get(&cell).cloned() else {
            return Err(CalcError::UnknownCell { cell });
        };

        let left = self.lookup(&cell, &expr.left)?;
        let right = self.lookup(&cell, &expr.right)?;
        let value = expr
            .op
            .apply(left, right)
            .map_err(|e| e.at(cell.clone()))?;

        debug!(cell = %cell, formula = %expr, value, "resolved formula");
        self.pending.remove(&cell);
        self.values.insert(cell.clone(), value);

        if self.stack.last() == Some(&cell) {
            self.stack.pop();
            self.visiting.remove(&cell);
        }

        Ok(Step::Resolved { cell, value })
    }

    fn lookup(&self, cell: &CellAddress, reference: &CellAddress) -> CalcResult<i64> {
        self.values
            .get(reference)
            .copied()
            .ok_or_else(|| CalcError::DanglingReference {
                cell: cell.clone(),
                reference: reference.clone(),
            })
    }

    /// Path from the first visit of `repeated` to the top of the stack, closed
    /// with `repeated` again.
    fn cycle_error(&self, repeated: CellAddress) -> CalcError {
        let start = self
            .stack
            .iter()
            .position(|cell| *cell == repeated)
            .unwrap_or(0);
        let mut cycle = self.stack[start..].to_vec();
        cycle.push(repeated);
        CalcError::CyclicReference { cycle }
    }
}

/// Resolve every formula of `table` into a complete grid.
///
/// # Example
/// ```
/// use cellcalc::core::resolve;
/// use cellcalc::parser::parse_table;
///
/// let table = parse_table(",A,B,C\n1,2,3,=A1+B1\n")?;
/// let grid = resolve(&table)?;
/// assert_eq!(grid.rows[0].values, vec![2, 3, 5]);
/// # Ok::<(), cellcalc::error::CalcError>(())
/// ```
pub fn resolve(table: &Table) -> CalcResult<ResolvedGrid> {
    Resolution::new(table).run()
}
