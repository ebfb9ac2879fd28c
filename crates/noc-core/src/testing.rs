//! Fixture builders shared by this crate's unit and integration tests.

use crate::topology::{EdgeSpec, Node, NodeKind};
use crate::units::BytesPerSec;

/// A two-die mesh: `num_col` columns, `rows_per_slr.iter().sum()` rows split across dies by
/// `rows_per_slr`. Every `(col, row)` cell gets an ingress, an egress, and a switch node, and
/// switch nodes form a bidirectional row-and-column mesh so every ingress can reach every
/// egress.
pub(crate) fn two_die_topology(num_col: usize, rows_per_slr: Vec<usize>) -> (Vec<Node>, Vec<EdgeSpec>) {
    let num_row: usize = rows_per_slr.iter().sum();
    let bw = BytesPerSec::new(16_000);
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    let sw_name = |col: usize, row: usize| format!("sw_x{col}y{row}");
    let ingress_name = |col: usize, row: usize| format!("ingress_x{col}y{row}");
    let egress_name = |col: usize, row: usize| format!("egress_x{col}y{row}");

    for col in 0..num_col {
        for row in 0..num_row {
            nodes.push(Node::new(ingress_name(col, row), NodeKind::Ingress, col, row));
            nodes.push(Node::new(egress_name(col, row), NodeKind::Egress, col, row));
            nodes.push(Node::new(sw_name(col, row), NodeKind::VerticalSwitch, col, row));
            edges.push(EdgeSpec::new(ingress_name(col, row), sw_name(col, row), bw));
            edges.push(EdgeSpec::new(sw_name(col, row), egress_name(col, row), bw));
        }
    }

    for col in 0..num_col {
        for row in 0..num_row {
            if col + 1 < num_col {
                edges.push(EdgeSpec::new(sw_name(col, row), sw_name(col + 1, row), bw));
                edges.push(EdgeSpec::new(sw_name(col + 1, row), sw_name(col, row), bw));
            }
            if row + 1 < num_row {
                edges.push(EdgeSpec::new(sw_name(col, row), sw_name(col, row + 1), bw));
                edges.push(EdgeSpec::new(sw_name(col, row + 1), sw_name(col, row), bw));
            }
        }
    }

    (nodes, edges)
}

/// A single-column, single-row topology with one ingress and one egress joined by a single
/// switch, for tests that want the smallest possible admissible path.
pub(crate) fn single_cell_topology() -> (Vec<Node>, Vec<EdgeSpec>) {
    two_die_topology(1, vec![1])
}

/// A topology with exactly one edge of capacity `bottleneck_bw` between two otherwise
/// well-connected halves, for capacity/bottleneck tests.
pub(crate) fn bottleneck_topology(bottleneck_bw: BytesPerSec) -> (Vec<Node>, Vec<EdgeSpec>) {
    let (nodes, mut edges) = two_die_topology(2, vec![1]);
    if let Some(e) = edges
        .iter_mut()
        .find(|e| e.src == "sw_x0y0" && e.dest == "sw_x1y0")
    {
        e.bandwidth = bottleneck_bw;
    }
    if let Some(e) = edges
        .iter_mut()
        .find(|e| e.src == "sw_x1y0" && e.dest == "sw_x0y0")
    {
        e.bandwidth = bottleneck_bw;
    }
    (nodes, edges)
}
