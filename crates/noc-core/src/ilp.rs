//! The mixed-integer formulation: per-stream routing, endpoint selection, and MMAP capacity
//! constraints, assembled into a single model and handed to `good_lp` (see `DESIGN.md`).

use good_lp::{variable, Expression, ProblemVariables, Variable};
use petgraph::graph::{EdgeIndex, NodeIndex};
use rustc_hash::FxHashMap;

use crate::config::Config;
use crate::device::Device;
use crate::distance::{manhattan, stream_weight};
use crate::stream::{MmapPort, MmapPortId, Stream, StreamId};
use crate::topology::Topology;

/// Resolved forward/return endpoints for an MMAP port: `(ingress-role node, memory-port
/// node)`. Both are pinned, never decision variables.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MmapEndpoints {
    pub ingress: NodeIndex,
    pub memory_port: NodeIndex,
}

/// Resolves an MMAP port's pinned endpoints: `noc_hint.ingress`, when present, names the
/// regular ingress node to route from; otherwise the port uses the bank's dedicated
/// memory-side ingress, named `memory_bridge_bank<bank>` by convention.
pub(crate) fn resolve_mmap_endpoints(
    topology: &Topology,
    port: &MmapPort,
) -> Result<MmapEndpoints, crate::error::CoreError> {
    let memory_port = match &port.noc_hint {
        Some(hint) => topology
            .idx_of(&hint.egress)
            .ok_or(crate::error::CoreError::UnknownMmapBank { bank: port.bank })?,
        None => {
            let memory_port_name = format!("memory_port_bank{}", port.bank);
            topology
                .idx_of(&memory_port_name)
                .ok_or(crate::error::CoreError::UnknownMmapBank { bank: port.bank })?
        }
    };
    let ingress = match &port.noc_hint {
        Some(hint) => topology
            .idx_of(&hint.ingress)
            .ok_or(crate::error::CoreError::UnknownMmapBank { bank: port.bank })?,
        None => {
            let bridge_name = format!("memory_bridge_bank{}", port.bank);
            topology
                .idx_of(&bridge_name)
                .ok_or(crate::error::CoreError::UnknownMmapBank { bank: port.bank })?
        }
    };
    Ok(MmapEndpoints {
        ingress,
        memory_port,
    })
}

/// The assembled model: decision variables, objective, and constraints, plus the variable
/// maps [`crate::decision`] needs to read a solution back out.
pub struct IlpModel {
    pub(crate) vars: ProblemVariables,
    pub(crate) objective: Expression,
    pub(crate) constraints: Vec<good_lp::Constraint>,
    pub(crate) x_s_e: FxHashMap<(StreamId, EdgeIndex), Variable>,
    pub(crate) y_s_n: FxHashMap<(StreamId, NodeIndex), Variable>,
    pub(crate) z_s_n: FxHashMap<(StreamId, NodeIndex), Variable>,
    pub(crate) unmapped_s: FxHashMap<StreamId, Variable>,
    pub(crate) x_p_e: FxHashMap<(MmapPortId, EdgeIndex), Variable>,
    pub(crate) x_ret_p_e: FxHashMap<(MmapPortId, EdgeIndex), Variable>,
    pub(crate) mmap_endpoints: FxHashMap<MmapPortId, MmapEndpoints>,
}

fn topology_nodes(topology: &Topology) -> impl Iterator<Item = NodeIndex> + '_ {
    (0..topology.node_count()).map(NodeIndex::new)
}

fn group_by_node<K: Copy>(
    map: &FxHashMap<(K, NodeIndex), Variable>,
) -> FxHashMap<NodeIndex, Vec<Variable>> {
    let mut grouped: FxHashMap<NodeIndex, Vec<Variable>> = FxHashMap::default();
    for (&(_, n), &v) in map.iter() {
        grouped.entry(n).or_default().push(v);
    }
    grouped
}

fn count_by_node(it: impl Iterator<Item = NodeIndex>) -> FxHashMap<NodeIndex, usize> {
    let mut counts = FxHashMap::default();
    for n in it {
        *counts.entry(n).or_insert(0) += 1;
    }
    counts
}

fn sum_vars(vars: impl Iterator<Item = Variable>) -> Expression {
    vars.fold(Expression::from(0), |acc, v| acc + v)
}

/// Builds the full model for a batch of streams and MMAP ports against a device.
pub fn build(
    device: &Device,
    streams: &[Stream],
    mmap_ports: &[MmapPort],
    config: &Config,
) -> Result<IlpModel, crate::error::CoreError> {
    let topology = device.topology();
    let mut vars = ProblemVariables::new();

    let mmap_endpoints: FxHashMap<MmapPortId, MmapEndpoints> = mmap_ports
        .iter()
        .map(|p| Ok((p.id, resolve_mmap_endpoints(topology, p)?)))
        .collect::<Result<_, crate::error::CoreError>>()?;

    let restricted = topology.column_zero_restricted();

    // Admissible ingress/egress candidates per stream, filtered by the column-0 exclusion
    // when the topology enables it.
    let admissible_ingress: FxHashMap<StreamId, Vec<NodeIndex>> = streams
        .iter()
        .map(|s| {
            let mut cands = device.ingress_nodes_in_range(&s.src_slot);
            if restricted {
                cands.retain(|&n| topology.node(n).col != 0);
            }
            (s.id, cands)
        })
        .collect();
    let admissible_egress: FxHashMap<StreamId, Vec<NodeIndex>> = streams
        .iter()
        .map(|s| {
            let mut cands = device.egress_nodes_in_range(&s.dst_slot);
            if restricted {
                cands.retain(|&n| topology.node(n).col != 0);
            }
            (s.id, cands)
        })
        .collect();

    for s in streams {
        if admissible_ingress[&s.id].is_empty() || admissible_egress[&s.id].is_empty() {
            return Err(crate::error::CoreError::NoAdmissiblePath { stream: s.id });
        }
    }

    let edges: Vec<EdgeIndex> = topology.all_edges().collect();

    // x_s_e, one per stream and edge.
    let mut x_s_e = FxHashMap::default();
    for s in streams {
        for &e in &edges {
            x_s_e.insert((s.id, e), vars.add(variable().binary()));
        }
    }

    // y_s_n / z_s_n, restricted to each stream's admissible candidates.
    let mut y_s_n = FxHashMap::default();
    let mut z_s_n = FxHashMap::default();
    for s in streams {
        for &n in &admissible_ingress[&s.id] {
            y_s_n.insert((s.id, n), vars.add(variable().binary()));
        }
        for &n in &admissible_egress[&s.id] {
            z_s_n.insert((s.id, n), vars.add(variable().binary()));
        }
    }

    let mut unmapped_s = FxHashMap::default();
    for s in streams {
        unmapped_s.insert(s.id, vars.add(variable().binary()));
    }

    let mut x_p_e = FxHashMap::default();
    let mut x_ret_p_e = FxHashMap::default();
    for p in mmap_ports {
        for &e in &edges {
            x_p_e.insert((p.id, e), vars.add(variable().binary()));
            x_ret_p_e.insert((p.id, e), vars.add(variable().binary()));
        }
    }

    let mut constraints = Vec::new();

    // Constraint 1: selection.
    for s in streams {
        let y_sum = sum_vars(admissible_ingress[&s.id].iter().map(|n| y_s_n[&(s.id, *n)]));
        constraints.push((y_sum + unmapped_s[&s.id]).eq(1.0));
        let z_sum = sum_vars(admissible_egress[&s.id].iter().map(|n| z_s_n[&(s.id, *n)]));
        constraints.push((z_sum + unmapped_s[&s.id]).eq(1.0));
    }

    // Constraint 2 and 3: flow conservation and node single-visit, for streams.
    for s in streams {
        for n in topology_nodes(topology) {
            let inflow = sum_vars(
                topology
                    .predecessors(n)
                    .filter_map(|u| topology.find_edge(u, n))
                    .map(|e| x_s_e[&(s.id, e)]),
            );
            let outflow = sum_vars(
                topology
                    .successors(n)
                    .filter_map(|v| topology.find_edge(n, v))
                    .map(|e| x_s_e[&(s.id, e)]),
            );
            let y_here = y_s_n.get(&(s.id, n)).copied();
            let z_here = z_s_n.get(&(s.id, n)).copied();
            let rhs = match (y_here, z_here) {
                (Some(y), Some(z)) => Expression::from(y) - Expression::from(z),
                (Some(y), None) => Expression::from(y),
                (None, Some(z)) => Expression::from(0) - Expression::from(z),
                (None, None) => Expression::from(0),
            };
            constraints.push((outflow.clone() - inflow.clone()).eq(rhs));
            constraints.push((inflow + outflow).leq(2.0));
        }
    }

    // Constraint 4: endpoint exclusivity across streams, net of MMAP-pinned nodes.
    let mmap_ingress_count = count_by_node(mmap_endpoints.values().map(|e| e.ingress));
    let mmap_egress_count = count_by_node(mmap_endpoints.values().map(|e| e.memory_port));
    let y_by_node = group_by_node(&y_s_n);
    let z_by_node = group_by_node(&z_s_n);
    for (n, vs) in y_by_node {
        let rhs = 1.0 - *mmap_ingress_count.get(&n).unwrap_or(&0) as f64;
        constraints.push(sum_vars(vs.into_iter()).leq(rhs));
    }
    for (n, vs) in z_by_node {
        let rhs = 1.0 - *mmap_egress_count.get(&n).unwrap_or(&0) as f64;
        constraints.push(sum_vars(vs.into_iter()).leq(rhs));
    }

    // Constraint 5: MMAP flow, forward and return, endpoints pinned.
    for p in mmap_ports {
        let ep = mmap_endpoints[&p.id];
        for (var_map, src, dst) in [
            (&x_p_e, ep.ingress, ep.memory_port),
            (&x_ret_p_e, ep.memory_port, ep.ingress),
        ] {
            for n in topology_nodes(topology) {
                let inflow = sum_vars(
                    topology
                        .predecessors(n)
                        .filter_map(|u| topology.find_edge(u, n))
                        .map(|e| var_map[&(p.id, e)]),
                );
                let outflow = sum_vars(
                    topology
                        .successors(n)
                        .filter_map(|v| topology.find_edge(n, v))
                        .map(|e| var_map[&(p.id, e)]),
                );
                let rhs: f64 = if n == src {
                    1.0
                } else if n == dst {
                    -1.0
                } else {
                    0.0
                };
                constraints.push((outflow.clone() - inflow.clone()).eq(rhs));
                constraints.push((inflow + outflow).leq(2.0));
            }
        }
    }

    // Constraint 6: edge capacity, streams plus MMAP forward/return contributions.
    let coef = &config.mmap_coefficients;
    for &e in &edges {
        let capacity = topology.bandwidth_of(e).into_f64();
        let mut term = Expression::from(0);
        for s in streams {
            let bw = s.bandwidth(config.frequency_mhz, config.bandwidth_quantum).into_f64();
            term = term + bw * x_s_e[&(s.id, e)];
        }
        for p in mmap_ports {
            let rd = p.read_bw.into_f64();
            let wr = p.write_bw.into_f64();
            let fwd_coef = rd / coef.forward_read_divisor + wr * (1.0 / coef.forward_write_addr_divisor + 1.0);
            term = term + fwd_coef * x_p_e[&(p.id, e)];
            let ret_coef = rd + wr / coef.return_write_divisor;
            term = term + ret_coef * x_ret_p_e[&(p.id, e)];
        }
        constraints.push(term.leq(capacity));
    }

    // Constraint 7: optional column-0 exclusions.
    if restricted {
        for die in 0..topology.num_slr() {
            let (row_start, row_end) = topology.row_range_for_die(die);
            let col0_nodes: Vec<NodeIndex> = topology
                .ingress_nodes_in_column_and_die(0, die)
                .into_iter()
                .chain((row_start..row_end).filter_map(|row| topology.egress_nodes_in(0, row)))
                .collect();
            let mut per_die = Expression::from(0);
            for n in col0_nodes {
                for s in streams {
                    if let Some(&y) = y_s_n.get(&(s.id, n)) {
                        per_die = per_die + y;
                    }
                    if let Some(&z) = z_s_n.get(&(s.id, n)) {
                        per_die = per_die + z;
                    }
                }
            }
            constraints.push(per_die.leq(1.0));
        }

        // Column 0 is reserved for per-die host I/O; it must never carry traffic between
        // dies itself, only sideways into column 1.
        let col0_cross_die_edges = topology.cross_die_edges_in_column(0);
        for &e in &col0_cross_die_edges {
            for s in streams {
                constraints.push(Expression::from(x_s_e[&(s.id, e)]).eq(0.0));
            }
            for p in mmap_ports {
                constraints.push(Expression::from(x_p_e[&(p.id, e)]).eq(0.0));
                constraints.push(Expression::from(x_ret_p_e[&(p.id, e)]).eq(0.0));
            }
        }

        for s in streams {
            let entry_edges = topology.column_entry_edges(1);
            let entry_sum = sum_vars(entry_edges.into_iter().map(|e| x_s_e[&(s.id, e)]));
            constraints.push(entry_sum.leq(1.0));
        }
    }

    // Objective: unmapped-bandwidth cost plus the fixed edge-length tie-breaker.
    let mut objective = Expression::from(0);
    for s in streams {
        let bw = s.bandwidth(config.frequency_mhz, config.bandwidth_quantum);
        let weight = stream_weight(bw, manhattan(&s.src_slot, &s.dst_slot));
        objective = objective + (weight as f64) * unmapped_s[&s.id];
    }
    for s in streams {
        for &e in &edges {
            objective = objective + (config.edge_length_weight as f64) * x_s_e[&(s.id, e)];
        }
    }

    Ok(IlpModel {
        vars,
        objective,
        constraints,
        x_s_e,
        y_s_n,
        z_s_n,
        unmapped_s,
        x_p_e,
        x_ret_p_e,
        mmap_endpoints,
    })
}
