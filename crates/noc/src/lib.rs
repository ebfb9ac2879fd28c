//! A NoC-aware routing and placement compiler for FPGA designs with a hardened
//! Network-on-Chip: given a device topology, a batch of cross-partition streams, and a set
//! of memory-mapped ports, it chooses ingress/egress endpoints and paths respecting edge
//! capacity and per-slot endpoint limits, then rewrites the design IR to carry the result.
//! For more detail see the accompanying modules, starting with [`core`].

#![warn(unreachable_pub, missing_docs)]

pub mod core;
pub mod devices;
pub mod emit;
pub mod ir;
pub mod selectors;
pub mod utils;
