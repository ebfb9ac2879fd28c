//! Device builder for the VH1582-class part: two stacked dies, HBM on the bottom row, and
//! column-0 reserved for the host-facing CPM.

use noc_core::Device;

use crate::error::DeviceBuildError;
use crate::family::{self, DeviceSpec};

/// Number of HBM banks wired on this part by default: four banks per side, with column-0's
/// CPM reservation meaning only the rest of the columns carry user traffic.
pub const DEFAULT_HBM_BANKS: usize = 4;

/// Builds the VH1582 device for a design spanning `num_col` columns and the given per-die
/// row counts. Column 0 is excluded from admissible ingress/egress candidacy, reserved for
/// the CPM (control/platform management).
pub fn build(num_col: usize, rows_per_slr: Vec<usize>) -> Result<Device, DeviceBuildError> {
    build_with_hbm_banks(num_col, rows_per_slr, DEFAULT_HBM_BANKS)
}

pub fn build_with_hbm_banks(
    num_col: usize,
    rows_per_slr: Vec<usize>,
    hbm_banks: usize,
) -> Result<Device, DeviceBuildError> {
    let spec = DeviceSpec::builder()
        .num_col(num_col)
        .rows_per_slr(rows_per_slr)
        .hbm_banks(hbm_banks)
        .column_zero_restricted(true)
        .build();
    family::build(&spec)
}
