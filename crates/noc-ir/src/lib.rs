#![warn(unreachable_pub, missing_debug_implementations)]
//! The design IR: its data model, stream/MMAP ingestion, and the FIFO-splitting
//! transformation applied once a placement [`noc_core::Assignment`] is available.

mod error;
mod ingest;
mod model;
mod transform;

pub use error::IrError;
pub use ingest::{extract_mmap_ports, extract_streams, MmapTable, MmapTableEntry, PendingStream};
pub use model::{Connection, DesignIr, ModuleDef, Port, PortDirection, Submodule, Wire};
pub use transform::{apply_transformation, roundup_tdata_bytes, split_mapped_stream};
