//! Placement constraint records and MMAP bandwidth annotations.

pub use noc_emit::*;
