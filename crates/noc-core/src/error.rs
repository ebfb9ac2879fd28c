//! The crate's error taxonomy.

use crate::device::{DeviceError, SlotParseError};
use crate::stream::{MmapPortId, StreamId};
use crate::topology::TopologyError;

/// Errors raised while building or solving the placement problem.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid topology: {0}")]
    Topology(#[from] TopologyError),

    #[error("invalid device: {0}")]
    Device(#[from] DeviceError),

    #[error("invalid slot name: {0}")]
    SlotParse(#[from] SlotParseError),

    #[error("no admissible ingress/egress path for stream {stream}")]
    NoAdmissiblePath { stream: StreamId },

    #[error("MMAP port references unknown memory bank {bank}")]
    UnknownMmapBank { bank: u32 },

    #[error("ILP solver reported the model infeasible")]
    InfeasibleTopology,

    #[error("ILP solver did not reach optimality within {limit_s}s; no feasible incumbent was found")]
    SolverTimeout { limit_s: u64 },

    #[error("decision extraction could not find an acyclic path for stream {stream} after cycle removal")]
    PathExtractionFailure { stream: StreamId },

    #[error("decision extraction could not find an acyclic path for MMAP port {port} after cycle removal")]
    MmapPathExtractionFailure { port: MmapPortId },

    #[error("edge capacity exceeded on an edge already accepted by the solver (solver/device bug)")]
    CapacityExceeded,
}
