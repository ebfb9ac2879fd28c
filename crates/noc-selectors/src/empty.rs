//! The `empty` selector: a trivial stub that leaves every stream unmapped and does not even
//! attempt MMAP port routing. Used as a cheap placeholder when no NoC wiring is wanted at
//! all (e.g. in unit tests of the surrounding pipeline).

use noc_core::{Assignment, Config, Device, MmapPort, Selector, SelectorKind, Stream};

#[derive(Debug, Default)]
pub struct EmptySelector;

impl Selector for EmptySelector {
    fn select(
        &self,
        _device: &Device,
        streams: &[Stream],
        _mmap_ports: &[MmapPort],
        _config: &Config,
    ) -> Result<Assignment, noc_core::CoreError> {
        Ok(Assignment {
            unmapped: streams.iter().map(|s| s.id).collect(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::single_edge_device;
    use noc_core::{SlotRange, StreamId};

    #[test]
    fn never_routes_mmap_ports() {
        let device = single_edge_device();
        let streams = vec![Stream::new(
            StreamId::new(0),
            "s0",
            SlotRange::single(0, 0),
            SlotRange::single(1, 0),
            8,
        )];
        let assignment = EmptySelector
            .select(&device, &streams, &[], &Config::builder().selector(SelectorKind::Empty).frequency_mhz(0.008).build())
            .unwrap();
        assert!(assignment.mmap_ports.is_empty());
        assert_eq!(assignment.unmapped.len(), 1);
    }
}
