#![warn(unreachable_pub, missing_debug_implementations)]

//! The placement core: the device graph, the stream/MMAP models, the ILP formulation, and
//! the solver driver that turns a device and a batch of streams into an
//! [`Assignment`](assignment::Assignment).

#[macro_use]
mod ident;
mod units;

mod assignment;
mod config;
mod decision;
mod device;
mod distance;
mod error;
mod ilp;
mod selector;
mod solver;
mod stream;
mod topology;

#[cfg(test)]
mod testing;

pub use assignment::{Assignment, MmapPlacement, StreamPlacement};
pub use config::{Config, MmapCoefficients, SelectorKind};
pub use decision::extract as extract_assignment;
pub use device::{Device, DeviceError, SlotParseError, SlotRange};
pub use distance::{manhattan, stream_weight};
pub use error::CoreError;
pub use ilp::build as build_ilp;
pub use selector::{IlpSelector, Selector};
pub use solver::solve as solve_ilp;
pub use stream::{MmapPort, MmapPortId, NocHint, Stream, StreamId};
pub use topology::{EdgeSpec, Node, NodeKind, Topology, TopologyError};
pub use units::{BytesPerSec, Distance};
