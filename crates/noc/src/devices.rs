//! Device builders for known parts (`vh1582`, `vp1802`) plus the shared mesh-building
//! routine they're both built from.

pub use noc_devices::*;
