//! Errors surfaced while assembling a built-in device.

#[derive(Debug, thiserror::Error)]
pub enum DeviceBuildError {
    #[error(transparent)]
    Topology(#[from] noc_core::TopologyError),
    #[error(transparent)]
    Device(#[from] noc_core::DeviceError),
    #[error("hbm_banks ({hbm_banks}) must not exceed num_col ({num_col})")]
    TooManyHbmBanks { hbm_banks: usize, num_col: usize },
}
