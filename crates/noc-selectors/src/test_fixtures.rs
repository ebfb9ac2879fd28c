//! Tiny hand-built topologies for the selector unit tests below.

use noc_core::{BytesPerSec, Device, EdgeSpec, Node, NodeKind, Topology};

fn sw(col: usize, row: usize) -> String {
    format!("sw_x{col}y{row}")
}
fn ingress(col: usize, row: usize) -> String {
    format!("ingress_x{col}y{row}")
}
fn egress(col: usize, row: usize) -> String {
    format!("egress_x{col}y{row}")
}

/// A 2-column, single-row device: ingress/switch/egress at each column, columns chained.
pub(crate) fn single_edge_device() -> Device {
    let bw = BytesPerSec::new(16_000);
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for col in 0..2 {
        nodes.push(Node::new(ingress(col, 0), NodeKind::Ingress, col, 0));
        nodes.push(Node::new(egress(col, 0), NodeKind::Egress, col, 0));
        nodes.push(Node::new(sw(col, 0), NodeKind::VerticalSwitch, col, 0));
        edges.push(EdgeSpec::new(ingress(col, 0), sw(col, 0), bw));
        edges.push(EdgeSpec::new(sw(col, 0), egress(col, 0), bw));
    }
    edges.push(EdgeSpec::new(sw(0, 0), sw(1, 0), bw));
    edges.push(EdgeSpec::new(sw(1, 0), sw(0, 0), bw));

    let topology = Topology::new(&nodes, &edges, 1, vec![1], 2).unwrap();
    Device::new(topology, 2, 1, vec![]).unwrap()
}

/// A single `(col, row)` cell with two sibling ingress/egress pairs, useful for exercising
/// endpoint exclusivity with more than one candidate.
pub(crate) fn two_sibling_device() -> Device {
    let bw = BytesPerSec::new(16_000);
    let nodes = vec![
        Node::new("ingress_x0y0", NodeKind::Ingress, 0, 0),
        Node::new("ingress_x0y1", NodeKind::Ingress, 0, 1),
        Node::new("egress_x1y0", NodeKind::Egress, 1, 0),
        Node::new("egress_x1y1", NodeKind::Egress, 1, 1),
        Node::new("sw_x0y0", NodeKind::VerticalSwitch, 0, 0),
        Node::new("sw_x0y1", NodeKind::VerticalSwitch, 0, 1),
        Node::new("sw_x1y0", NodeKind::VerticalSwitch, 1, 0),
        Node::new("sw_x1y1", NodeKind::VerticalSwitch, 1, 1),
    ];
    let edges = vec![
        EdgeSpec::new("ingress_x0y0", "sw_x0y0", bw),
        EdgeSpec::new("ingress_x0y1", "sw_x0y1", bw),
        EdgeSpec::new("sw_x1y0", "egress_x1y0", bw),
        EdgeSpec::new("sw_x1y1", "egress_x1y1", bw),
        EdgeSpec::new("sw_x0y0", "sw_x1y0", bw),
        EdgeSpec::new("sw_x1y0", "sw_x0y0", bw),
        EdgeSpec::new("sw_x0y1", "sw_x1y1", bw),
        EdgeSpec::new("sw_x1y1", "sw_x0y1", bw),
        EdgeSpec::new("sw_x0y0", "sw_x0y1", bw),
        EdgeSpec::new("sw_x0y1", "sw_x0y0", bw),
        EdgeSpec::new("sw_x1y0", "sw_x1y1", bw),
        EdgeSpec::new("sw_x1y1", "sw_x1y0", bw),
    ];
    let topology = Topology::new(&nodes, &edges, 1, vec![2], 2).unwrap();
    Device::new(topology, 2, 1, vec![]).unwrap()
}
