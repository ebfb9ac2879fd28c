//! The non-ILP mapping strategies (`none`, `empty`, `random`, `greedy`) against the same
//! [`Selector`](crate::core::Selector) seam the ILP core implements.

pub use noc_selectors::*;
