#![warn(unreachable_pub, missing_debug_implementations)]
//! Built-in device topologies. `noc-core` models a NoC abstractly; this crate supplies the
//! concrete `vh1582` and `vp1802` device graphs device profiles are built against.

mod error;
mod family;
pub mod hbm;
pub mod vh1582;
pub mod vp1802;

pub use error::DeviceBuildError;
pub use family::{build as build_mesh, DeviceSpec};
