//! Run configuration.

use crate::units::BytesPerSec;

/// Which mapping strategy to run. `Ilp` is the core of this crate; the other variants are
/// implemented by the `noc-selectors` crate against the same [`crate::selector::Selector`]
/// trait, for the CLI's `ilp`-to-`greedy` fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    None,
    Empty,
    Random,
    Greedy,
    Ilp,
}

/// Device-level MMAP bandwidth-accounting constants, re-exposed as a config knob rather than
/// inlined so a future device profile can tune them without a code change.
#[derive(Debug, Clone, Copy, typed_builder::TypedBuilder, serde::Serialize, serde::Deserialize)]
pub struct MmapCoefficients {
    /// Divisor applied to read bandwidth on the forward (write) path: `rd / forward_read_divisor`.
    #[builder(default = 16.0)]
    #[serde(default = "default_mmap_divisor")]
    pub forward_read_divisor: f64,
    /// Divisor applied to the address-phase portion of write bandwidth on the forward path.
    #[builder(default = 16.0)]
    #[serde(default = "default_mmap_divisor")]
    pub forward_write_addr_divisor: f64,
    /// Divisor applied to write bandwidth on the return (read) path.
    #[builder(default = 16.0)]
    #[serde(default = "default_mmap_divisor")]
    pub return_write_divisor: f64,
}

fn default_mmap_divisor() -> f64 {
    16.0
}

impl Default for MmapCoefficients {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Run configuration.
#[derive(Debug, Clone, typed_builder::TypedBuilder, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub selector: SelectorKind,
    pub frequency_mhz: f64,
    #[builder(default = 300)]
    #[serde(default = "default_solver_time_limit_s")]
    pub solver_time_limit_s: u64,
    #[builder(default = false)]
    #[serde(default)]
    pub multi_site_noc: bool,
    /// The NoC's per-port bandwidth quantum, used to round stream bandwidths up before
    /// building the capacity constraint.
    #[builder(default = BytesPerSec::new(16_000))]
    #[serde(default = "default_bandwidth_quantum")]
    pub bandwidth_quantum: BytesPerSec,
    /// Secondary objective weight applied per selected edge, exposed as a config knob
    /// defaulting to 300 rather than hardcoded as a tie-breaker constant.
    #[builder(default = 300)]
    #[serde(default = "default_edge_length_weight")]
    pub edge_length_weight: u64,
    #[builder(default)]
    #[serde(default)]
    pub mmap_coefficients: MmapCoefficients,
}

fn default_solver_time_limit_s() -> u64 {
    300
}

fn default_bandwidth_quantum() -> BytesPerSec {
    BytesPerSec::new(16_000)
}

fn default_edge_length_weight() -> u64 {
    300
}
