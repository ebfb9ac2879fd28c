//! The NoC's device graph: nodes, capacity-annotated edges, and the per-column/die/row
//! indexing that device builders (in `noc-devices`) populate.

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use rustc_hash::FxHashMap;

use crate::units::BytesPerSec;

/// The kind of a NoC node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    Ingress,
    Egress,
    VerticalSwitch,
    HorizontalSwitch,
    DieSwitch,
    BottomSwitch,
    MemoryBridge,
    MemoryPort,
}

/// A node in the NoC graph. Names are stable and unique within a [`Topology`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    /// Device column, used to partition nodes into slots.
    pub col: usize,
    /// Device row, used to partition nodes into slots.
    pub row: usize,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind, col: usize, row: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            col,
            row,
        }
    }
}

/// A directed edge between two nodes with a positive bandwidth capacity.
/// Invariant: `src != dest`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EdgeSpec {
    pub src: String,
    pub dest: String,
    pub bandwidth: BytesPerSec,
}

impl EdgeSpec {
    pub fn new(src: impl Into<String>, dest: impl Into<String>, bandwidth: BytesPerSec) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
            bandwidth,
        }
    }
}

/// An immutable directed multigraph of NoC nodes and capacity-annotated edges.
/// Constructed once per run and treated as a read-only shared input thereafter.
#[derive(Debug, Clone)]
pub struct Topology {
    pub(crate) graph: DiGraph<Node, BytesPerSec>,
    pub(crate) index: FxHashMap<String, NodeIndex>,
    pub(crate) num_slr: usize,
    pub(crate) rows_per_slr: Vec<usize>,
    pub(crate) num_col: usize,
    /// `ingress[col][row]`.
    pub(crate) ingress: Vec<Vec<NodeIndex>>,
    /// `egress[col][row]`.
    pub(crate) egress: Vec<Vec<NodeIndex>>,
    /// Whether column-0 exclusion rules are enabled. Off by default; only the `vh1582`
    /// builder turns this on.
    pub(crate) column_zero_restricted: bool,
}

impl Topology {
    /// Builds a topology from nodes and edges. Node tables for ingress/egress nodes are
    /// derived from each node's `(kind, col, row)`.
    ///
    /// Correctness properties enforced at construction:
    /// - every listed edge's endpoints exist in `nodes`
    /// - `rows_per_slr` is non-empty and each entry is >= 1
    /// - `src != dest` for every edge
    pub fn new(
        nodes: &[Node],
        edges: &[EdgeSpec],
        num_slr: usize,
        rows_per_slr: Vec<usize>,
        num_col: usize,
    ) -> Result<Self, TopologyError> {
        if rows_per_slr.is_empty() || rows_per_slr.iter().any(|&n| n == 0) {
            return Err(TopologyError::InvalidRowsPerSlr);
        }
        if rows_per_slr.len() != num_slr {
            return Err(TopologyError::DieCountMismatch {
                num_slr,
                rows_len: rows_per_slr.len(),
            });
        }

        let mut g = DiGraph::new();
        let mut index = FxHashMap::default();
        let num_row: usize = rows_per_slr.iter().sum();
        let mut ingress = vec![vec![NodeIndex::end(); num_row]; num_col];
        let mut egress = vec![vec![NodeIndex::end(); num_row]; num_col];

        for node in nodes.iter().cloned() {
            let name = node.name.clone();
            let kind = node.kind;
            let (col, row) = (node.col, node.row);
            let idx = g.add_node(node);
            if index.insert(name.clone(), idx).is_some() {
                return Err(TopologyError::DuplicateNodeName(name));
            }
            match kind {
                NodeKind::Ingress if col < num_col && row < num_row => ingress[col][row] = idx,
                NodeKind::Egress if col < num_col && row < num_row => egress[col][row] = idx,
                _ => {}
            }
        }

        for EdgeSpec {
            src,
            dest,
            bandwidth,
        } in edges.iter().cloned()
        {
            if src == dest {
                return Err(TopologyError::NodeAdjacentSelf(src));
            }
            let &a = index
                .get(&src)
                .ok_or_else(|| TopologyError::UndeclaredNode(src.clone()))?;
            let &b = index
                .get(&dest)
                .ok_or_else(|| TopologyError::UndeclaredNode(dest.clone()))?;
            if g.find_edge(a, b).is_some() {
                return Err(TopologyError::DuplicateEdge { src, dest });
            }
            g.add_edge(a, b, bandwidth);
        }

        Ok(Self {
            graph: g,
            index,
            num_slr,
            rows_per_slr,
            num_col,
            ingress,
            egress,
            column_zero_restricted: false,
        })
    }

    /// Enables the column-0 exclusion rules.
    pub fn with_column_zero_restricted(mut self, restricted: bool) -> Self {
        self.column_zero_restricted = restricted;
        self
    }

    pub fn column_zero_restricted(&self) -> bool {
        self.column_zero_restricted
    }

    pub fn num_slr(&self) -> usize {
        self.num_slr
    }

    pub fn num_col(&self) -> usize {
        self.num_col
    }

    pub fn rows_per_slr(&self) -> &[usize] {
        &self.rows_per_slr
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn idx_of(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    pub fn bandwidth_of(&self, edge: EdgeIndex) -> BytesPerSec {
        self.graph[edge]
    }

    pub fn edge_endpoints(&self, edge: EdgeIndex) -> (NodeIndex, NodeIndex) {
        self.graph.edge_endpoints(edge).expect("dangling edge")
    }

    pub fn find_edge(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    /// All directed edges in the graph.
    pub fn all_edges(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn predecessors(&self, n: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .neighbors_directed(n, petgraph::Direction::Incoming)
    }

    pub fn successors(&self, n: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .neighbors_directed(n, petgraph::Direction::Outgoing)
    }

    pub fn ingress_nodes_in(&self, col: usize, row: usize) -> Option<NodeIndex> {
        self.ingress.get(col)?.get(row).copied()
    }

    pub fn egress_nodes_in(&self, col: usize, row: usize) -> Option<NodeIndex> {
        self.egress.get(col)?.get(row).copied()
    }

    /// Row range, within the full `[col][row]` tables, occupied by die `die`.
    pub fn row_range_for_die(&self, die: usize) -> (usize, usize) {
        let start: usize = self.rows_per_slr[..die].iter().sum();
        (start, start + self.rows_per_slr[die])
    }

    /// Ingress nodes in a given column restricted to a given die's row range.
    pub fn ingress_nodes_in_column_and_die(&self, col: usize, die: usize) -> Vec<NodeIndex> {
        let (start, end) = self.row_range_for_die(die);
        (start..end)
            .filter_map(|row| self.ingress_nodes_in(col, row))
            .collect()
    }

    /// Which die a row belongs to.
    fn die_of_row(&self, row: usize) -> usize {
        let mut acc = 0;
        for (die, &len) in self.rows_per_slr.iter().enumerate() {
            acc += len;
            if row < acc {
                return die;
            }
        }
        self.num_slr.saturating_sub(1)
    }

    /// Edges within `col` whose endpoints sit in different dies, i.e. cross-die hops that
    /// happen to route through that column rather than through a dedicated die-switch column.
    pub fn cross_die_edges_in_column(&self, col: usize) -> Vec<EdgeIndex> {
        self.graph
            .edge_indices()
            .filter(|&e| {
                let (a, b) = self.edge_endpoints(e);
                let (na, nb) = (self.node(a), self.node(b));
                na.col == col && nb.col == col && self.die_of_row(na.row) != self.die_of_row(nb.row)
            })
            .collect()
    }

    /// Edges that enter column `col` from column `col - 1`, i.e. the boundary a stream must
    /// cross at most once to avoid bypassing back and forth through the restricted column.
    pub fn column_entry_edges(&self, col: usize) -> Vec<EdgeIndex> {
        if col == 0 {
            return Vec::new();
        }
        self.graph
            .edge_indices()
            .filter(|&e| {
                let (a, b) = self.edge_endpoints(e);
                self.node(a).col == col - 1 && self.node(b).col == col
            })
            .collect()
    }

    /// Whether a path exists from `from` to `to`: a BFS reachability check used at builder
    /// time, where the absence of a path for an admissible endpoint pair is a fatal
    /// configuration error detected before the ILP is ever built.
    pub fn has_path(&self, from: NodeIndex, to: NodeIndex) -> bool {
        if from == to {
            return true;
        }
        let mut visited = std::collections::HashSet::new();
        let mut stack = vec![from];
        while let Some(n) = stack.pop() {
            if n == to {
                return true;
            }
            if !visited.insert(n) {
                continue;
            }
            stack.extend(self.successors(n));
        }
        false
    }
}

/// Errors constructing a valid [`Topology`].
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("duplicate node name {0}")]
    DuplicateNodeName(String),

    #[error("node {0} is connected to itself")]
    NodeAdjacentSelf(String),

    #[error("node {0} is not declared")]
    UndeclaredNode(String),

    #[error("duplicate edge from {src} to {dest}")]
    DuplicateEdge { src: String, dest: String },

    #[error("rows_per_slr must be non-empty with all entries >= 1")]
    InvalidRowsPerSlr,

    #[error("num_slr ({num_slr}) does not match rows_per_slr length ({rows_len})")]
    DieCountMismatch { num_slr: usize, rows_len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn build_two_die_topology() {
        let (nodes, edges) = testing::two_die_topology(4, vec![7, 6]);
        let topo = Topology::new(&nodes, &edges, 2, vec![7, 6], 4).unwrap();
        assert_eq!(topo.num_col(), 4);
        assert_eq!(topo.rows_per_slr(), &[7, 6]);
        assert!(topo.ingress_nodes_in(0, 0).is_some());
        assert!(topo.egress_nodes_in(3, 12).is_some());
    }

    #[test]
    fn duplicate_node_name_fails() {
        let nodes = vec![
            Node::new("ingress_x0y0", NodeKind::Ingress, 0, 0),
            Node::new("ingress_x0y0", NodeKind::Ingress, 0, 0),
        ];
        let res = Topology::new(&nodes, &[], 1, vec![1], 1);
        assert!(matches!(res, Err(TopologyError::DuplicateNodeName(_))));
    }

    #[test]
    fn self_loop_edge_fails() {
        let nodes = vec![Node::new("sw_x0y0", NodeKind::VerticalSwitch, 0, 0)];
        let edges = vec![EdgeSpec::new("sw_x0y0", "sw_x0y0", BytesPerSec::new(1))];
        let res = Topology::new(&nodes, &edges, 1, vec![1], 1);
        assert!(matches!(res, Err(TopologyError::NodeAdjacentSelf(_))));
    }

    #[test]
    fn mismatched_die_count_fails() {
        let res = Topology::new(&[], &[], 2, vec![1], 1);
        assert!(matches!(res, Err(TopologyError::DieCountMismatch { .. })));
    }

    #[test]
    fn reachability_holds_for_connected_topology() {
        let (nodes, edges) = testing::two_die_topology(4, vec![7, 6]);
        let topo = Topology::new(&nodes, &edges, 2, vec![7, 6], 4).unwrap();
        let a = topo.ingress_nodes_in(0, 0).unwrap();
        let b = topo.egress_nodes_in(1, 0).unwrap();
        assert!(topo.has_path(a, b));
    }

    #[test]
    fn cross_die_edges_in_column_finds_only_the_die_boundary_hop() {
        let (nodes, edges) = testing::two_die_topology(4, vec![7, 6]);
        let topo = Topology::new(&nodes, &edges, 2, vec![7, 6], 4).unwrap();
        let found = topo.cross_die_edges_in_column(0);
        assert!(!found.is_empty(), "the die-switch column must report a cross-die edge");
        for e in found {
            let (a, b) = topo.edge_endpoints(e);
            assert_eq!(topo.node(a).col, 0);
            assert_eq!(topo.node(b).col, 0);
            assert_ne!(topo.die_of_row(topo.node(a).row), topo.die_of_row(topo.node(b).row));
        }
    }

    #[test]
    fn cross_die_edges_in_column_is_empty_for_a_single_die_topology() {
        let (nodes, edges) = testing::two_die_topology(4, vec![13]);
        let topo = Topology::new(&nodes, &edges, 1, vec![13], 4).unwrap();
        assert!(topo.cross_die_edges_in_column(0).is_empty());
    }

    #[test]
    fn column_entry_edges_only_cross_the_named_boundary() {
        let (nodes, edges) = testing::two_die_topology(4, vec![7, 6]);
        let topo = Topology::new(&nodes, &edges, 2, vec![7, 6], 4).unwrap();
        let entries = topo.column_entry_edges(1);
        assert!(!entries.is_empty());
        for e in entries {
            let (a, b) = topo.edge_endpoints(e);
            assert_eq!(topo.node(a).col, 0);
            assert_eq!(topo.node(b).col, 1);
        }
        assert!(topo.column_entry_edges(0).is_empty());
    }
}
