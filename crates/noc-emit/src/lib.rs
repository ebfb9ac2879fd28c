#![warn(unreachable_pub, missing_debug_implementations)]
//! Data-model emission for placement results: AXIS index/location
//! constraint records and MMAP bandwidth annotations, at the level of typed Rust values
//! rather than generated vendor Tcl/XDC text.

mod bandwidth;
mod constraints;
mod loc;
mod multi_site;

pub use bandwidth::{emit_bandwidth_annotations, BandwidthAnnotation};
pub use constraints::{emit_axis_constraints, emit_mmap_constraints, AxisIndexConstraint, MmapPhysicalLocConstraint};
pub use loc::PhysicalLoc;
pub use multi_site::{emit_multi_site_pblocks, MultiSitePblock};
