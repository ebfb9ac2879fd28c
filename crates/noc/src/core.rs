//! The placement core: topology, device, stream/MMAP models, ILP formulation, and solver
//! driver. The most common entry points are [`IlpSelector`] and the other
//! [`Selector`](crate::core::Selector) implementations in [`crate::selectors`].

pub use noc_core::*;
