//! The pluggable mapping-strategy seam: the core only knows it's talking to
//! something that turns a device and a batch of streams into an [`Assignment`], and
//! `noc-selectors` supplies the `none`/`empty`/`random`/`greedy` variants against the same
//! seam this crate's `ilp` module implements.

use crate::assignment::Assignment;
use crate::config::Config;
use crate::device::Device;
use crate::error::CoreError;
use crate::stream::{MmapPort, Stream};

/// A strategy for turning a device and a batch of streams/MMAP ports into an [`Assignment`].
pub trait Selector {
    fn select(
        &self,
        device: &Device,
        streams: &[Stream],
        mmap_ports: &[MmapPort],
        config: &Config,
    ) -> Result<Assignment, CoreError>;
}

/// The ILP selector: builds the model, solves it, and extracts the assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct IlpSelector;

impl Selector for IlpSelector {
    fn select(
        &self,
        device: &Device,
        streams: &[Stream],
        mmap_ports: &[MmapPort],
        config: &Config,
    ) -> Result<Assignment, CoreError> {
        let model = crate::ilp::build(device, streams, mmap_ports, config)?;
        let solved = crate::solver::solve(model, config.solver_time_limit_s)?;
        crate::decision::extract(&solved, device.topology(), streams, mmap_ports, config)
    }
}
