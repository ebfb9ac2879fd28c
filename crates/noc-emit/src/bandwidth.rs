//! Bandwidth annotations for MMAP ports, mirroring the
//! `read_bw`/`write_bw`/`read_avg_burst`/`write_avg_burst`/`sep_rt_group` fields a
//! memory-mapped interface template attaches to each port.

use noc_core::MmapPort;

/// Default average-burst estimate for both directions, used wherever nothing upstream
/// plumbs a per-port burst estimate.
const DEFAULT_AVG_BURST: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BandwidthAnnotation {
    pub port: String,
    pub read_bw: u64,
    pub write_bw: u64,
    pub read_avg_burst: u32,
    pub write_avg_burst: u32,
    /// A separate routability group per port, indexed by its position in the sorted
    /// emission order (mirrors `noc-ir::extract_mmap_ports`'s name-sorted determinism).
    pub sep_rt_group: u32,
}

/// Emits one [`BandwidthAnnotation`] per MMAP port, sorted by name for determinism.
pub fn emit_bandwidth_annotations(mmap_ports: &[MmapPort]) -> Vec<BandwidthAnnotation> {
    let mut ports: Vec<&MmapPort> = mmap_ports.iter().collect();
    ports.sort_by(|a, b| a.name.cmp(&b.name));
    ports
        .into_iter()
        .enumerate()
        .map(|(i, port)| BandwidthAnnotation {
            port: port.name.clone(),
            read_bw: port.read_bw.into_u64(),
            write_bw: port.write_bw.into_u64(),
            read_avg_burst: DEFAULT_AVG_BURST,
            write_avg_burst: DEFAULT_AVG_BURST,
            sep_rt_group: i as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use noc_core::{BytesPerSec, MmapPortId};

    #[test]
    fn annotations_are_sorted_by_port_name_with_sequential_groups() {
        let ports = vec![
            MmapPort::new(MmapPortId::new(0), "zeta", 0, BytesPerSec::new(100), BytesPerSec::new(200), None),
            MmapPort::new(MmapPortId::new(1), "alpha", 1, BytesPerSec::new(10), BytesPerSec::new(20), None),
        ];
        let annotations = emit_bandwidth_annotations(&ports);
        assert_eq!(annotations[0].port, "alpha");
        assert_eq!(annotations[0].sep_rt_group, 0);
        assert_eq!(annotations[0].read_avg_burst, 4);
        assert_eq!(annotations[1].port, "zeta");
        assert_eq!(annotations[1].sep_rt_group, 1);
    }
}
