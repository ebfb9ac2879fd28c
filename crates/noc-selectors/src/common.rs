//! Shared plumbing for the non-ILP selectors: shortest-path routing and endpoint-exclusivity
//! bookkeeping, giving every non-ILP strategy the same resource-accounting behavior without
//! building a solver model.

use std::collections::VecDeque;

use noc_core::{Assignment, Device, MmapPlacement, MmapPort, StreamPlacement, Topology};
use petgraph::graph::NodeIndex;
use rustc_hash::FxHashSet;

/// Unweighted shortest path between two nodes, by hop count (a plain BFS).
pub(crate) fn shortest_path(topology: &Topology, from: NodeIndex, to: NodeIndex) -> Option<Vec<NodeIndex>> {
    if from == to {
        return Some(vec![from]);
    }
    let mut prev = rustc_hash::FxHashMap::default();
    let mut queue = VecDeque::from([from]);
    let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
    visited.insert(from);
    while let Some(n) = queue.pop_front() {
        for succ in topology.successors(n) {
            if visited.insert(succ) {
                prev.insert(succ, n);
                if succ == to {
                    queue.clear();
                    break;
                }
                queue.push_back(succ);
            }
        }
    }
    if !visited.contains(&to) {
        return None;
    }
    let mut path = vec![to];
    let mut cur = to;
    while cur != from {
        cur = *prev.get(&cur)?;
        path.push(cur);
    }
    path.reverse();
    Some(path)
}

fn node_names(topology: &Topology, path: &[NodeIndex]) -> Vec<String> {
    path.iter().map(|&idx| topology.node(idx).name.clone()).collect()
}

/// Tracks which ingress/egress nodes are already claimed, enforcing the same
/// one-stream-per-endpoint exclusivity the ILP formulation's constraint group 4 enforces.
#[derive(Debug, Default)]
pub(crate) struct EndpointPool {
    used: FxHashSet<NodeIndex>,
}

impl EndpointPool {
    pub(crate) fn reserve_first_free(&mut self, candidates: &[NodeIndex]) -> Option<NodeIndex> {
        let pick = candidates.iter().copied().find(|n| !self.used.contains(n))?;
        self.used.insert(pick);
        Some(pick)
    }

    pub(crate) fn mark_used(&mut self, node: NodeIndex) {
        self.used.insert(node);
    }
}

/// Resolves an MMAP port's ingress/memory-port node pair, following the same
/// `noc_hint`-pins-both / `memory_port_bank<N>`+`memory_bridge_bank<N>`-fallback convention
/// as `noc_core::ilp::resolve_mmap_endpoints`.
pub(crate) fn resolve_mmap_endpoints(topology: &Topology, port: &MmapPort) -> Option<(NodeIndex, NodeIndex)> {
    match &port.noc_hint {
        Some(hint) => {
            let ingress = topology.idx_of(&hint.ingress)?;
            let memory_port = topology.idx_of(&hint.egress)?;
            Some((ingress, memory_port))
        }
        None => {
            let ingress = topology.idx_of(&format!("memory_bridge_bank{}", port.bank))?;
            let memory_port = topology.idx_of(&format!("memory_port_bank{}", port.bank))?;
            Some((ingress, memory_port))
        }
    }
}

/// Routes every MMAP port's forward and return path, best-effort: a port whose endpoints
/// cannot be resolved or connected is simply left out of `Assignment::mmap_ports`, since
/// (unlike streams) MMAP ports have no "unmapped" outcome to record.
pub(crate) fn route_mmap_ports(device: &Device, mmap_ports: &[MmapPort], out: &mut Assignment) {
    let topology = device.topology();
    for port in mmap_ports {
        let Some((ingress, memory_port)) = resolve_mmap_endpoints(topology, port) else {
            continue;
        };
        let (Some(forward), Some(backward)) = (
            shortest_path(topology, ingress, memory_port),
            shortest_path(topology, memory_port, ingress),
        ) else {
            continue;
        };
        out.mmap_ports.insert(
            port.id,
            MmapPlacement {
                forward_path: node_names(topology, &forward),
                return_path: node_names(topology, &backward),
            },
        );
    }
}

/// Attempts to route a single stream given the current endpoint reservations, claiming its
/// ingress/egress nodes on success.
pub(crate) fn try_route_stream(
    device: &Device,
    stream: &noc_core::Stream,
    ingress_pool: &mut EndpointPool,
    egress_pool: &mut EndpointPool,
) -> Option<StreamPlacement> {
    let topology = device.topology();
    let ingress_candidates = device.ingress_nodes_in_range(&stream.src_slot);
    let egress_candidates = device.egress_nodes_in_range(&stream.dst_slot);
    let ingress = ingress_pool.reserve_first_free(&ingress_candidates)?;
    let Some(egress) = egress_pool.reserve_first_free(&egress_candidates) else {
        // Roll back the ingress reservation; this stream cannot be routed after all.
        ingress_pool.used.remove(&ingress);
        return None;
    };
    let Some(path) = shortest_path(topology, ingress, egress) else {
        ingress_pool.used.remove(&ingress);
        egress_pool.used.remove(&egress);
        return None;
    };
    Some(StreamPlacement {
        ingress: topology.node(ingress).name.clone(),
        egress: topology.node(egress).name.clone(),
        path: node_names(topology, &path),
    })
}
