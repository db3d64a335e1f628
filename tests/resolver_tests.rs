//! Resolution engine tests
//!
//! Exercises the engine through the public API: parse a table, resolve it,
//! inspect the grid or the error.

use cellcalc::core::{resolve, Resolution, Step};
use cellcalc::parser::parse_table;
use cellcalc::{CalcError, CellAddress, ResolvedGrid};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn cell(text: &str) -> CellAddress {
    text.parse().unwrap()
}

fn resolve_str(content: &str) -> Result<ResolvedGrid, CalcError> {
    resolve(&parse_table(content)?)
}

// ═══════════════════════════════════════════════════════════════════════════
// SUCCESSFUL RESOLUTION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_literals_round_trip_in_input_order() {
    let grid = resolve_str(",X,Y,Z\n3,-7,0,12\n1,100,-1,5\n").unwrap();

    assert_eq!(grid.columns, vec!["X", "Y", "Z"]);
    assert_eq!(grid.rows[0].row, 3);
    assert_eq!(grid.rows[0].values, vec![-7, 0, 12]);
    assert_eq!(grid.rows[1].row, 1);
    assert_eq!(grid.rows[1].values, vec![100, -1, 5]);
}

#[test]
fn test_simple_sum() {
    let grid = resolve_str(",A,B,C\n1,=B1+C1,2,3\n").unwrap();
    assert_eq!(grid.get(&cell("A1")), Some(5));
}

#[test]
fn test_chained_dependency() {
    let grid = resolve_str(",A,B,C,D\n1,1,2,=A1+B1,=C1+A1\n").unwrap();
    assert_eq!(grid.get(&cell("C1")), Some(3));
    assert_eq!(grid.get(&cell("D1")), Some(4));
}

#[test]
fn test_chain_declared_in_reverse() {
    // Each formula depends on the cell to its right.
    let grid = resolve_str(",A,B,C,D,E\n1,=B1+E1,=C1+E1,=D1+E1,=E1+E1,1\n").unwrap();
    assert_eq!(grid.rows[0].values, vec![5, 4, 3, 2, 1]);
}

#[test]
fn test_all_operators_across_rows() {
    let grid = resolve_str(
        ",A,B,C,D\n1,1,2,=A1+B1,=C1+A1\n2,=D1*C1,=A2-D1,=B2/B1,=C2+A2\n",
    )
    .unwrap();
    assert_eq!(grid.rows[0].values, vec![1, 2, 3, 4]);
    assert_eq!(grid.rows[1].values, vec![12, 8, 4, 16]);
}

#[test]
fn test_integer_division_truncates() {
    let grid = resolve_str(",A,B,C,D\n1,-7,2,=A1/B1,=B1/A1\n").unwrap();
    assert_eq!(grid.get(&cell("C1")), Some(-3));
    assert_eq!(grid.get(&cell("D1")), Some(0));
}

#[test]
fn test_same_operand_twice() {
    let grid = resolve_str(",A,B\n1,6,=A1*A1\n").unwrap();
    assert_eq!(grid.get(&cell("B1")), Some(36));
}

#[test]
fn test_deep_chain_does_not_recurse() {
    let depth = 20_000;
    let mut content = String::from(",A,B\n");
    // Each A cell adds B1 to the A cell one row further down.
    for row in 1..depth {
        content.push_str(&format!("{row},=A{}+B1,1\n", row + 1));
    }
    content.push_str(&format!("{depth},1,1\n"));

    let grid = resolve_str(&content).unwrap();
    assert_eq!(grid.get(&cell("A1")), Some(depth as i64));
}

#[test]
fn test_resolution_is_repeatable() {
    let table = parse_table(",A,B,C,D\n1,1,2,=A1+B1,=C1+A1\n2,=D1*C1,=A2-D1,=B2/B1,=C2+A2\n")
        .unwrap();
    let before = table.formulas.clone();

    let first = resolve(&table).unwrap();
    let second = resolve(&table).unwrap();

    assert_eq!(first, second);
    assert_eq!(table.formulas, before);
}

// ═══════════════════════════════════════════════════════════════════════════
// STORE INVARIANTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_every_cell_lives_in_exactly_one_store() {
    let table = parse_table(",A,B,C,D\n1,1,2,=A1+B1,=C1+A1\n2,=D1*C1,=A2-D1,=B2/B1,=C2+A2\n")
        .unwrap();
    let all_cells: HashSet<CellAddress> = table
        .rows
        .iter()
        .flat_map(|&row| {
            table
                .columns
                .iter()
                .map(move |column| CellAddress::new(column.as_str(), row))
        })
        .collect();

    let mut resolution = Resolution::new(&table);
    loop {
        let values: HashSet<&CellAddress> = resolution.values().keys().collect();
        let pending: HashSet<&CellAddress> = resolution.pending().keys().collect();

        assert!(values.is_disjoint(&pending), "a cell is in both stores");
        assert_eq!(values.len() + pending.len(), all_cells.len());
        assert!(all_cells.iter().all(|c| values.contains(c) || pending.contains(c)));

        if resolution.step().unwrap() == Step::Done {
            break;
        }
    }

    assert!(resolution.is_complete());
    assert_eq!(resolution.values().len(), table.cell_count());
}

#[test]
fn test_value_store_never_overwrites() {
    let table = parse_table(",A,B,C\n1,1,=A1+A1,=B1+A1\n").unwrap();
    let mut resolution = Resolution::new(&table);
    let mut resolved = HashSet::new();

    loop {
        match resolution.step().unwrap() {
            Step::Resolved { cell, .. } => assert!(resolved.insert(cell)),
            Step::Descended { .. } => {}
            Step::Done => break,
        }
    }
    assert_eq!(resolved.len(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// FAILURES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cycle_is_detected() {
    let err = resolve_str(",A,B,C\n1,=B1+C1,=A1+C1,1\n").unwrap_err();
    match err {
        CalcError::CyclicReference { cycle } => {
            assert_eq!(cycle.first(), cycle.last());
            assert!(cycle.contains(&cell("A1")));
            assert!(cycle.contains(&cell("B1")));
        }
        other => panic!("expected CyclicReference, got {other:?}"),
    }
}

#[test]
fn test_cycle_behind_valid_chain() {
    let err = resolve_str(",A,B,C,D\n1,=B1+D1,=C1+D1,=B1+D1,1\n").unwrap_err();
    match err {
        CalcError::CyclicReference { cycle } => {
            assert_eq!(cycle, vec![cell("B1"), cell("C1"), cell("B1")]);
        }
        other => panic!("expected CyclicReference, got {other:?}"),
    }
}

#[test]
fn test_dangling_reference() {
    let err = resolve_str(",A,B\n1,1,=A1+Z9\n").unwrap_err();
    assert!(matches!(err, CalcError::DanglingReference { .. }));
}

#[test]
fn test_reference_to_undeclared_row() {
    let err = resolve_str(",A,B\n1,1,=A1+A2\n").unwrap_err();
    assert!(matches!(
        err,
        CalcError::DanglingReference { ref reference, .. } if *reference == cell("A2")
    ));
}

#[test]
fn test_division_by_zero() {
    let err = resolve_str(",A,B,C\n1,5,0,=A1/B1\n").unwrap_err();
    assert!(matches!(
        err,
        CalcError::DivisionByZero { ref cell } if cell.to_string() == "C1"
    ));
}

#[test]
fn test_division_by_resolved_zero() {
    let err = resolve_str(",A,B,C\n1,5,=A1-A1,=A1/B1\n").unwrap_err();
    assert!(matches!(err, CalcError::DivisionByZero { .. }));
}

#[test]
fn test_malformed_row_fails_before_resolution() {
    // The cycle in row 1 is never reached.
    let err = resolve_str(",A,B\n1,=B1+B1,=A1+A1\n2,1\n").unwrap_err();
    assert!(matches!(err, CalcError::RowCountMismatch { line: 3, .. }));
}
