//! The design IR data model, stream/MMAP-port ingestion, and the FIFO-splitting
//! transformation applied after placement.

pub use noc_ir::*;
