//! File I/O for the design IR, MMAP table, configuration, and output artifacts.

pub use noc_utils::*;
