//! The `none` selector: no stream is diverted onto the NoC, but MMAP ports still get routed
//! since their wiring is a fixed hardware requirement, not a placement choice.

use noc_core::{Assignment, Config, Device, MmapPort, Selector, SelectorKind, Stream};

use crate::common::route_mmap_ports;

#[derive(Debug, Default)]
pub struct NoneSelector;

impl Selector for NoneSelector {
    fn select(
        &self,
        device: &Device,
        streams: &[Stream],
        mmap_ports: &[MmapPort],
        _config: &Config,
    ) -> Result<Assignment, noc_core::CoreError> {
        let mut assignment = Assignment {
            unmapped: streams.iter().map(|s| s.id).collect(),
            ..Default::default()
        };
        route_mmap_ports(device, mmap_ports, &mut assignment);
        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::single_edge_device;
    use noc_core::{SlotRange, StreamId};

    #[test]
    fn leaves_every_stream_unmapped() {
        let device = single_edge_device();
        let streams = vec![Stream::new(
            StreamId::new(0),
            "s0",
            SlotRange::single(0, 0),
            SlotRange::single(1, 0),
            8,
        )];
        let assignment = NoneSelector
            .select(&device, &streams, &[], &Config::builder().selector(SelectorKind::None).frequency_mhz(0.008).build())
            .unwrap();
        assert_eq!(assignment.unmapped, vec![StreamId::new(0)]);
        assert!(assignment.streams.is_empty());
    }
}
