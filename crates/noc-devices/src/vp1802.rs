//! Device builder for the VP1802-class part: no HBM banks and no column-0 CPM reservation,
//! unlike [`crate::vh1582`].

use noc_core::Device;

use crate::error::DeviceBuildError;
use crate::family::{self, DeviceSpec};

pub fn build(num_col: usize, rows_per_slr: Vec<usize>) -> Result<Device, DeviceBuildError> {
    let spec = DeviceSpec::builder()
        .num_col(num_col)
        .rows_per_slr(rows_per_slr)
        .hbm_banks(0)
        .column_zero_restricted(false)
        .build();
    family::build(&spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vp1802_has_no_hbm_banks_and_no_column_reservation() {
        let device = build(4, vec![7, 6]).unwrap();
        assert!(!device.topology().column_zero_restricted());
        assert!(device.topology().idx_of("memory_port_bank0").is_none());
    }
}
