//! Device-builder subcommand glue: selects one of the device builders (`vh1582`, `vp1802`,
//! or a caller-provided topology) and builds it from the given flags.

use noc_core::Device;

/// Which device builder to invoke, and its parameters.
#[derive(Debug, Clone, clap::Subcommand)]
pub enum DeviceKind {
    /// The VH1582-class part: HBM banks and a reserved host-facing column.
    Vh1582 {
        #[arg(long)]
        num_col: usize,
        #[arg(long, value_delimiter = ',')]
        rows_per_slr: Vec<usize>,
        #[arg(long, default_value_t = noc_devices::vh1582::DEFAULT_HBM_BANKS)]
        hbm_banks: usize,
    },
    /// The VP1802-class part: no HBM, no column reservation.
    Vp1802 {
        #[arg(long)]
        num_col: usize,
        #[arg(long, value_delimiter = ',')]
        rows_per_slr: Vec<usize>,
    },
}

impl DeviceKind {
    pub fn build(&self) -> Result<Device, noc_devices::DeviceBuildError> {
        match self {
            DeviceKind::Vh1582 {
                num_col,
                rows_per_slr,
                hbm_banks,
            } => noc_devices::vh1582::build_with_hbm_banks(*num_col, rows_per_slr.clone(), *hbm_banks),
            DeviceKind::Vp1802 { num_col, rows_per_slr } => {
                noc_devices::vp1802::build(*num_col, rows_per_slr.clone())
            }
        }
    }
}
