//! Hands the assembled model to the MIP solver under a wall-clock budget.

use std::time::Instant;

use good_lp::{microlp, SolverModel};
use rustc_hash::FxHashMap;

use crate::error::CoreError;
use crate::ilp::{IlpModel, MmapEndpoints};
use crate::stream::{MmapPortId, StreamId};

/// A solved model: the raw variable assignment plus the maps needed to read it back into
/// per-stream and per-MMAP-port decisions (`crate::decision`).
pub struct Solved {
    pub(crate) solution: Box<dyn good_lp::Solution>,
    pub(crate) x_s_e: FxHashMap<(StreamId, petgraph::graph::EdgeIndex), good_lp::Variable>,
    pub(crate) y_s_n: FxHashMap<(StreamId, petgraph::graph::NodeIndex), good_lp::Variable>,
    pub(crate) z_s_n: FxHashMap<(StreamId, petgraph::graph::NodeIndex), good_lp::Variable>,
    pub(crate) unmapped_s: FxHashMap<StreamId, good_lp::Variable>,
    pub(crate) x_p_e: FxHashMap<(MmapPortId, petgraph::graph::EdgeIndex), good_lp::Variable>,
    pub(crate) x_ret_p_e: FxHashMap<(MmapPortId, petgraph::graph::EdgeIndex), good_lp::Variable>,
    pub(crate) mmap_endpoints: FxHashMap<MmapPortId, MmapEndpoints>,
}

/// Solves `model` against `time_limit_s`, a wall-clock budget.
///
/// The pure-Rust `microlp` backend, chosen so this crate needs no external solver library,
/// has no native cancellation hook: it always runs a solve to completion rather than
/// returning the best incumbent found so far. The budget is therefore enforced after the
/// fact, by treating a solve that finishes at or past it as a timeout rather than trusting
/// an incumbent microlp was never asked to stop producing. Deterministic variable naming
/// order falls out of [`IlpModel`] always iterating streams, edges and nodes in the same
/// order they were given.
pub fn solve(model: IlpModel, time_limit_s: u64) -> Result<Solved, CoreError> {
    let IlpModel {
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
    } = model;

    let mut built = vars.minimise(objective).using(microlp);
    for c in constraints {
        built = built.with(c);
    }

    let start = Instant::now();
    let solution = built.solve().map_err(|err| match err {
        good_lp::ResolutionError::Infeasible => CoreError::InfeasibleTopology,
        _ => {
            log::error!("ILP solver terminated abnormally: {err}");
            CoreError::InfeasibleTopology
        }
    })?;
    let elapsed = start.elapsed();
    if elapsed.as_secs() >= time_limit_s {
        log::warn!(
            "solver ran {}s, at or past the configured {}s budget; reporting a timeout rather \
             than trusting an incumbent microlp had no cancellation hook to stop at the limit",
            elapsed.as_secs(),
            time_limit_s,
        );
        return Err(CoreError::SolverTimeout { limit_s: time_limit_s });
    }

    Ok(Solved {
        solution: Box::new(solution),
        x_s_e,
        y_s_n,
        z_s_n,
        unmapped_s,
        x_p_e,
        x_ret_p_e,
        mmap_endpoints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, SelectorKind};
    use crate::device::Device;
    use crate::testing;
    use crate::topology::Topology;

    #[test]
    fn a_zero_second_budget_always_reports_a_timeout() {
        let (nodes, edges) = testing::single_cell_topology();
        let topology = Topology::new(&nodes, &edges, 1, vec![1], 1).unwrap();
        let device = Device::new(topology, 1, 1, vec![]).unwrap();
        let config = Config::builder().selector(SelectorKind::Ilp).frequency_mhz(1.0).build();
        let model = crate::ilp::build(&device, &[], &[], &config).unwrap();

        let result = solve(model, 0);
        assert!(matches!(result, Err(CoreError::SolverTimeout { limit_s: 0 })));
    }
}
