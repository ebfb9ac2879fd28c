//! The solver's output record, serializable for round-tripping across a CLI run boundary.

use petgraph::graph::NodeIndex;
use rustc_hash::FxHashMap;

use crate::stream::{MmapPortId, StreamId};

/// A single stream's placement: the chosen ingress/egress nodes and the ordered path
/// between them, or `None` if the stream was left unmapped.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StreamPlacement {
    pub ingress: String,
    pub egress: String,
    /// Ordered node names from ingress to egress, inclusive.
    pub path: Vec<String>,
}

/// An MMAP port's two placements: the forward (write-to-memory) path and the return
/// (read-from-memory) path, sharing the same pinned ingress/memory-port pair.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MmapPlacement {
    pub forward_path: Vec<String>,
    pub return_path: Vec<String>,
}

/// The complete result of one placement run.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Assignment {
    pub streams: FxHashMap<StreamId, StreamPlacement>,
    pub unmapped: Vec<StreamId>,
    pub mmap_ports: FxHashMap<MmapPortId, MmapPlacement>,
}

impl Assignment {
    pub fn is_mapped(&self, stream: StreamId) -> bool {
        self.streams.contains_key(&stream)
    }

    pub fn placement(&self, stream: StreamId) -> Option<&StreamPlacement> {
        self.streams.get(&stream)
    }
}

pub(crate) fn node_name(topology: &crate::topology::Topology, idx: NodeIndex) -> String {
    topology.node(idx).name.clone()
}
