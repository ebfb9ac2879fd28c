//! Command-line glue wiring the placement compiler's crates together. Unlike `noc-core`,
//! which never substitutes one selector for another, this binary is where the `ilp`-to-
//! `greedy` fallback lives: a solver timeout or infeasibility here falls back to the
//! deterministic `greedy` selector and logs a warning, rather than failing the whole run.

#![warn(unreachable_pub, missing_debug_implementations)]

mod device;

use std::path::PathBuf;

use anyhow::Context;
use noc_core::{Assignment, Config, CoreError, Selector, SelectorKind};
use noc_ir::{extract_mmap_ports, extract_streams};

pub use device::DeviceKind;

/// Reads the design IR, MMAP table, and configuration, runs the configured selector,
/// transforms the IR for every mapped stream, and writes the transformed IR and the
/// assignment back out.
#[derive(Debug, clap::Parser)]
#[command(name = "noc", about = "NoC-aware routing and placement compiler")]
pub struct Cli {
    #[command(subcommand)]
    pub device: DeviceKind,

    /// Path to the design IR (JSON).
    #[arg(long)]
    pub ir: PathBuf,

    /// Path to the MMAP table (JSON).
    #[arg(long)]
    pub mmap_table: PathBuf,

    /// Path to the run configuration (JSON or TOML).
    #[arg(long)]
    pub config: PathBuf,

    /// Where to write the transformed IR.
    #[arg(long)]
    pub out_ir: PathBuf,

    /// Where to write the assignment record.
    #[arg(long)]
    pub out_assignment: PathBuf,

    /// Where to write multi-site pblock assignments. Required when the run configuration
    /// sets `multi_site_noc: true`; ignored otherwise.
    #[arg(long)]
    pub out_pblocks: Option<PathBuf>,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let device = cli.device.build().with_context(|| "failed to build device")?;
    log::info!(
        "device built: {} nodes, slot grid {}x{}",
        device.topology().node_count(),
        device.slot_width(),
        device.slot_height()
    );

    let mut ir = noc_utils::read_design_ir(&cli.ir).with_context(|| "failed to read design IR")?;
    let mmap_table = noc_utils::read_mmap_table(&cli.mmap_table).with_context(|| "failed to read MMAP table")?;
    let config = noc_utils::read_config(&cli.config).with_context(|| "failed to read configuration")?;

    let pending_streams = extract_streams(&ir).with_context(|| "failed to extract streams from design IR")?;
    let streams: Vec<_> = pending_streams.iter().map(|p| p.stream.clone()).collect();
    let mmap_ports = extract_mmap_ports(&mmap_table);

    let assignment = select(&device, &streams, &mmap_ports, &config)?;
    log::info!(
        "placement: {} mapped, {} unmapped",
        assignment.streams.len(),
        assignment.unmapped.len()
    );

    noc_ir::apply_transformation(&mut ir, &pending_streams, &assignment)
        .with_context(|| "failed to apply IR transformation")?;

    noc_utils::write_json(&cli.out_ir, &ir).with_context(|| "failed to write transformed IR")?;
    noc_utils::write_assignment(&cli.out_assignment, &assignment)
        .with_context(|| "failed to write assignment")?;

    if config.multi_site_noc {
        let out_pblocks = cli
            .out_pblocks
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("config sets multi_site_noc but --out-pblocks was not given"))?;
        let pblocks = noc_emit::emit_multi_site_pblocks(&ir, &device, &assignment);
        log::info!("multi-site pblocks: {} slot cells", pblocks.len());
        noc_utils::write_json(out_pblocks, &pblocks).with_context(|| "failed to write multi-site pblocks")?;
    }

    Ok(())
}

/// Runs the configured selector, falling back from `ilp` to `greedy` on solver failure.
/// The fallback lives here rather than in `noc-core`: the core itself never substitutes
/// one selector for another.
fn select(
    device: &noc_core::Device,
    streams: &[noc_core::Stream],
    mmap_ports: &[noc_core::MmapPort],
    config: &Config,
) -> anyhow::Result<Assignment> {
    let selected = match config.selector {
        SelectorKind::None => noc_selectors::NoneSelector.select(device, streams, mmap_ports, config),
        SelectorKind::Empty => noc_selectors::EmptySelector.select(device, streams, mmap_ports, config),
        SelectorKind::Random => noc_selectors::RandomSelector.select(device, streams, mmap_ports, config),
        SelectorKind::Greedy => noc_selectors::GreedySelector.select(device, streams, mmap_ports, config),
        SelectorKind::Ilp => match noc_core::IlpSelector.select(device, streams, mmap_ports, config) {
            Ok(assignment) => Ok(assignment),
            Err(err @ (CoreError::SolverTimeout { .. } | CoreError::InfeasibleTopology)) => {
                log::warn!("ilp selector failed ({err}), falling back to greedy");
                noc_selectors::GreedySelector.select(device, streams, mmap_ports, config)
            }
            Err(err) => Err(err),
        },
    };
    Ok(selected?)
}
