//! A parameterized mesh builder shared by [`crate::vh1582`] and [`crate::vp1802`]: a vertical
//! switch column per die feeding ingress/egress pairs, horizontal switches linking columns
//! within a row, die switches bridging adjacent dies (reconvergence buffers between SLRs),
//! and a bottom switch row carrying HBM bank traffic, all built from the node kinds
//! `noc-core` exposes rather than a per-role node table per direction.

use noc_core::{BytesPerSec, Device, EdgeSpec, Node, NodeKind, Topology};
use typed_builder::TypedBuilder;

use crate::error::DeviceBuildError;

/// Dimensions and options for a mesh-style device build.
#[derive(Debug, Clone, TypedBuilder)]
pub struct DeviceSpec {
    pub num_col: usize,
    pub rows_per_slr: Vec<usize>,
    #[builder(default = BytesPerSec::new(16_000))]
    pub edge_bandwidth: BytesPerSec,
    /// Number of HBM banks, each bound to the bottom switch of one of the leftmost columns.
    #[builder(default = 0)]
    pub hbm_banks: usize,
    #[builder(default = false)]
    pub column_zero_restricted: bool,
}

fn ingress_name(col: usize, row: usize) -> String {
    format!("ingress_x{col}y{row}")
}
fn egress_name(col: usize, row: usize) -> String {
    format!("egress_x{col}y{row}")
}
fn vsw_name(col: usize, row: usize) -> String {
    format!("vsw_x{col}y{row}")
}
fn hsw_name(col: usize, row: usize) -> String {
    format!("hsw_x{col}y{row}")
}
fn dsw_name(col: usize, die_boundary: usize) -> String {
    format!("dsw_x{col}y{die_boundary}")
}
fn bsw_name(col: usize) -> String {
    format!("bsw_x{col}")
}
fn memory_bridge_name(bank: usize) -> String {
    format!("memory_bridge_bank{bank}")
}
fn memory_port_name(bank: usize) -> String {
    format!("memory_port_bank{bank}")
}

fn bidir(nodes_edges: &mut Vec<EdgeSpec>, a: &str, b: &str, bw: BytesPerSec) {
    nodes_edges.push(EdgeSpec::new(a, b, bw));
    nodes_edges.push(EdgeSpec::new(b, a, bw));
}

/// Builds a [`Device`] from a [`DeviceSpec`].
pub fn build(spec: &DeviceSpec) -> Result<Device, DeviceBuildError> {
    if spec.hbm_banks > spec.num_col {
        return Err(DeviceBuildError::TooManyHbmBanks {
            hbm_banks: spec.hbm_banks,
            num_col: spec.num_col,
        });
    }

    let num_slr = spec.rows_per_slr.len();
    let bw = spec.edge_bandwidth;
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    let row_range_for_die = |die: usize| -> (usize, usize) {
        let start: usize = spec.rows_per_slr[..die].iter().sum();
        (start, start + spec.rows_per_slr[die])
    };
    let die_of_row = |row: usize| -> usize {
        let mut acc = 0;
        for (die, n) in spec.rows_per_slr.iter().enumerate() {
            acc += n;
            if row < acc {
                return die;
            }
        }
        num_slr - 1
    };

    let num_row: usize = spec.rows_per_slr.iter().sum();

    for col in 0..spec.num_col {
        for row in 0..num_row {
            nodes.push(Node::new(ingress_name(col, row), NodeKind::Ingress, col, row));
            nodes.push(Node::new(egress_name(col, row), NodeKind::Egress, col, row));
            nodes.push(Node::new(vsw_name(col, row), NodeKind::VerticalSwitch, col, row));
            nodes.push(Node::new(hsw_name(col, row), NodeKind::HorizontalSwitch, col, row));

            edges.push(EdgeSpec::new(ingress_name(col, row), vsw_name(col, row), bw));
            edges.push(EdgeSpec::new(vsw_name(col, row), egress_name(col, row), bw));
            bidir(&mut edges, &vsw_name(col, row), &hsw_name(col, row), bw);

            if row + 1 < num_row && die_of_row(row) == die_of_row(row + 1) {
                bidir(&mut edges, &vsw_name(col, row), &vsw_name(col, row + 1), bw);
            }
            if col + 1 < spec.num_col {
                bidir(&mut edges, &hsw_name(col, row), &hsw_name(col + 1, row), bw);
            }
        }
    }

    for die in 0..num_slr.saturating_sub(1) {
        let (_, top_of_lower) = row_range_for_die(die);
        let (bottom_of_upper, _) = row_range_for_die(die + 1);
        for col in 0..spec.num_col {
            // Column 0 is reserved for per-die host I/O when restricted: it must never
            // carry traffic between dies, so no die-switch is built there.
            if spec.column_zero_restricted && col == 0 {
                continue;
            }
            nodes.push(Node::new(dsw_name(col, die), NodeKind::DieSwitch, col, top_of_lower));
            bidir(&mut edges, &vsw_name(col, top_of_lower - 1), &dsw_name(col, die), bw);
            bidir(&mut edges, &dsw_name(col, die), &vsw_name(col, bottom_of_upper), bw);
        }
    }

    for col in 0..spec.num_col {
        nodes.push(Node::new(bsw_name(col), NodeKind::BottomSwitch, col, 0));
        bidir(&mut edges, &bsw_name(col), &vsw_name(col, 0), bw);
        if col + 1 < spec.num_col {
            bidir(&mut edges, &bsw_name(col), &bsw_name(col + 1), bw);
        }
    }

    for bank in 0..spec.hbm_banks {
        nodes.push(Node::new(memory_bridge_name(bank), NodeKind::MemoryBridge, bank, 0));
        nodes.push(Node::new(memory_port_name(bank), NodeKind::MemoryPort, bank, 0));
        bidir(&mut edges, &bsw_name(bank), &memory_bridge_name(bank), bw);
        bidir(&mut edges, &bsw_name(bank), &memory_port_name(bank), bw);
    }

    let topology = Topology::new(&nodes, &edges, num_slr, spec.rows_per_slr.clone(), spec.num_col)?
        .with_column_zero_restricted(spec.column_zero_restricted);
    let device = Device::new(topology, spec.num_col, num_slr, vec![])?;
    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_connected_two_die_mesh() {
        let spec = DeviceSpec::builder()
            .num_col(4)
            .rows_per_slr(vec![3, 2])
            .build();
        let device = build(&spec).unwrap();
        assert_eq!(device.slot_height(), 2);
        let a = device.topology().ingress_nodes_in(0, 0).unwrap();
        let b = device.topology().egress_nodes_in(3, 1).unwrap();
        assert!(device.topology().has_path(a, b));
    }

    #[test]
    fn rejects_more_hbm_banks_than_columns() {
        let spec = DeviceSpec::builder()
            .num_col(2)
            .rows_per_slr(vec![1])
            .hbm_banks(3)
            .build();
        assert!(matches!(build(&spec), Err(DeviceBuildError::TooManyHbmBanks { .. })));
    }

    #[test]
    fn column_zero_restricted_builds_no_die_switch_at_column_zero() {
        let spec = DeviceSpec::builder()
            .num_col(4)
            .rows_per_slr(vec![3, 2])
            .column_zero_restricted(true)
            .build();
        let device = build(&spec).unwrap();
        assert!(device.topology().idx_of(&dsw_name(0, 0)).is_none());
        assert!(device.topology().idx_of(&dsw_name(1, 0)).is_some());
        assert!(device.topology().cross_die_edges_in_column(0).is_empty());
    }

    #[test]
    fn hbm_bank_nodes_reach_every_column() {
        let spec = DeviceSpec::builder()
            .num_col(3)
            .rows_per_slr(vec![2])
            .hbm_banks(1)
            .build();
        let device = build(&spec).unwrap();
        let port = device.topology().idx_of("memory_port_bank0").unwrap();
        let egress = device.topology().egress_nodes_in(2, 1).unwrap();
        assert!(device.topology().has_path(port, egress));
    }
}
