//! Reads a solved model back into an [`Assignment`].

use std::collections::HashSet;

use good_lp::Solution as _;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::graphmap::DiGraphMap;

use crate::assignment::{node_name, Assignment, MmapPlacement, StreamPlacement};
use crate::config::Config;
use crate::error::CoreError;
use crate::solver::Solved;
use crate::stream::{MmapPort, Stream};
use crate::topology::Topology;

const SELECTED_THRESHOLD: f64 = 0.5;

/// Extracts the full [`Assignment`] from a solved model: per-stream endpoints and paths,
/// per-MMAP-port forward/return paths, detecting and stripping cycles before the
/// topological walk, then a post-hoc capacity check guarding against a solver/device bug
/// that let the constraints the ILP itself enforces slip through.
pub fn extract(
    solved: &Solved,
    topology: &Topology,
    streams: &[Stream],
    mmap_ports: &[MmapPort],
    config: &Config,
) -> Result<Assignment, CoreError> {
    check_capacity(solved, topology, streams, mmap_ports, config)?;

    let mut assignment = Assignment::default();

    for s in streams {
        if solved.solution.value(solved.unmapped_s[&s.id]) > SELECTED_THRESHOLD {
            assignment.unmapped.push(s.id);
            continue;
        }

        let ingress = solved
            .y_s_n
            .iter()
            .filter(|(&(sid, _), _)| sid == s.id)
            .find(|(_, &v)| solved.solution.value(v) > SELECTED_THRESHOLD)
            .map(|(&(_, n), _)| n)
            .ok_or(CoreError::PathExtractionFailure { stream: s.id })?;
        let egress = solved
            .z_s_n
            .iter()
            .filter(|(&(sid, _), _)| sid == s.id)
            .find(|(_, &v)| solved.solution.value(v) > SELECTED_THRESHOLD)
            .map(|(&(_, n), _)| n)
            .ok_or(CoreError::PathExtractionFailure { stream: s.id })?;

        let selected_edges: Vec<(NodeIndex, NodeIndex)> = solved
            .x_s_e
            .iter()
            .filter(|(&(sid, _), _)| sid == s.id)
            .filter(|(_, &v)| solved.solution.value(v) > SELECTED_THRESHOLD)
            .map(|(&(_, e), _)| topology.edge_endpoints(e))
            .collect();

        let path = walk_path(&selected_edges, ingress, egress)
            .ok_or(CoreError::PathExtractionFailure { stream: s.id })?;

        assignment.streams.insert(
            s.id,
            StreamPlacement {
                ingress: node_name(topology, ingress),
                egress: node_name(topology, egress),
                path: path.into_iter().map(|n| node_name(topology, n)).collect(),
            },
        );
    }

    for p in mmap_ports {
        let ep = solved.mmap_endpoints[&p.id];

        let forward_edges = selected_edges_for(
            solved.x_p_e.iter().filter(|(&(pid, _), _)| pid == p.id),
            solved.solution.as_ref(),
            topology,
        );
        let forward_path = walk_path(&forward_edges, ep.ingress, ep.memory_port)
            .ok_or(CoreError::MmapPathExtractionFailure { port: p.id })?;

        let return_edges = selected_edges_for(
            solved.x_ret_p_e.iter().filter(|(&(pid, _), _)| pid == p.id),
            solved.solution.as_ref(),
            topology,
        );
        let return_path = walk_path(&return_edges, ep.memory_port, ep.ingress)
            .ok_or(CoreError::MmapPathExtractionFailure { port: p.id })?;

        assignment.mmap_ports.insert(
            p.id,
            MmapPlacement {
                forward_path: forward_path.into_iter().map(|n| node_name(topology, n)).collect(),
                return_path: return_path.into_iter().map(|n| node_name(topology, n)).collect(),
            },
        );
    }

    Ok(assignment)
}

/// Re-sums the edge-capacity constraint (`crate::ilp`'s constraint 6) against the selected
/// variables and fails loudly if an edge is over capacity -- this should never trigger given
/// the ILP already enforces it, but a driver/solver mismatch would otherwise only surface as
/// a silently over-subscribed edge in the emitted assignment.
fn check_capacity(
    solved: &Solved,
    topology: &Topology,
    streams: &[Stream],
    mmap_ports: &[MmapPort],
    config: &Config,
) -> Result<(), CoreError> {
    let coef = &config.mmap_coefficients;
    for e in topology.all_edges() {
        let capacity = topology.bandwidth_of(e).into_f64();
        let mut used = 0.0;
        for s in streams {
            if let Some(&v) = solved.x_s_e.get(&(s.id, e)) {
                if solved.solution.value(v) > SELECTED_THRESHOLD {
                    used += s.bandwidth(config.frequency_mhz, config.bandwidth_quantum).into_f64();
                }
            }
        }
        for p in mmap_ports {
            let rd = p.read_bw.into_f64();
            let wr = p.write_bw.into_f64();
            if let Some(&v) = solved.x_p_e.get(&(p.id, e)) {
                if solved.solution.value(v) > SELECTED_THRESHOLD {
                    used += rd / coef.forward_read_divisor + wr * (1.0 / coef.forward_write_addr_divisor + 1.0);
                }
            }
            if let Some(&v) = solved.x_ret_p_e.get(&(p.id, e)) {
                if solved.solution.value(v) > SELECTED_THRESHOLD {
                    used += rd + wr / coef.return_write_divisor;
                }
            }
        }
        if used > capacity + 1e-6 {
            return Err(CoreError::CapacityExceeded);
        }
    }
    Ok(())
}

fn selected_edges_for<'a, K>(
    it: impl Iterator<Item = (&'a (K, EdgeIndex), &'a good_lp::Variable)>,
    solution: &dyn good_lp::Solution,
    topology: &Topology,
) -> Vec<(NodeIndex, NodeIndex)>
where
    K: 'a,
{
    it.filter(|(_, &v)| solution.value(v) > SELECTED_THRESHOLD)
        .map(|(&(_, e), _)| topology.edge_endpoints(e))
        .collect()
}

/// Strips cycles (SCCs of size > 1) from the selected-edge subgraph, then walks from
/// `ingress` to `egress` following selected edges. Returns `None` if no such walk exists,
/// which the caller surfaces as [`CoreError::PathExtractionFailure`].
fn walk_path(
    selected_edges: &[(NodeIndex, NodeIndex)],
    ingress: NodeIndex,
    egress: NodeIndex,
) -> Option<Vec<NodeIndex>> {
    let mut g = DiGraphMap::<NodeIndex, ()>::new();
    g.add_node(ingress);
    g.add_node(egress);
    for &(a, b) in selected_edges {
        g.add_edge(a, b, ());
    }

    let mut cyclic = HashSet::new();
    for component in tarjan_scc(&g) {
        if component.len() > 1 {
            cyclic.extend(component);
        }
    }

    let mut path = vec![ingress];
    let mut visited = HashSet::new();
    visited.insert(ingress);
    let mut current = ingress;
    while current != egress {
        let next = g
            .neighbors(current)
            .find(|n| !cyclic.contains(n) && !visited.contains(n));
        match next {
            Some(n) => {
                path.push(n);
                visited.insert(n);
                current = n;
            }
            None => return None,
        }
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(n: u32) -> NodeIndex {
        NodeIndex::new(n as usize)
    }

    #[test]
    fn walks_a_straight_line() {
        let edges = vec![(idx(0), idx(1)), (idx(1), idx(2))];
        let path = walk_path(&edges, idx(0), idx(2)).unwrap();
        assert_eq!(path, vec![idx(0), idx(1), idx(2)]);
    }

    #[test]
    fn unrelated_cycle_does_not_block_the_walk() {
        // a 2-cycle between nodes 3 and 4 that the walk from 0 to 2 never touches.
        let edges = vec![(idx(0), idx(1)), (idx(1), idx(2)), (idx(3), idx(4)), (idx(4), idx(3))];
        let path = walk_path(&edges, idx(0), idx(2)).unwrap();
        assert_eq!(path, vec![idx(0), idx(1), idx(2)]);
    }

    #[test]
    fn a_cycle_astride_the_only_route_fails_the_walk() {
        // node 1 only escapes to the egress via the 1<->2 cycle; stripping it leaves no route.
        let edges = vec![(idx(0), idx(1)), (idx(1), idx(2)), (idx(2), idx(1))];
        assert_eq!(walk_path(&edges, idx(0), idx(2)), None);
    }
}
