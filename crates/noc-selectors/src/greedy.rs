//! The `greedy` selector: visits streams in descending raw-bandwidth order and maps each one
//! that still has a free ingress and egress candidate. Deterministic (no sampling), biasing
//! towards the highest-bandwidth streams first, so it serves as the CLI's fallback from
//! `ilp` when the solver times out or can't find a feasible assignment.

use noc_core::{Assignment, Config, Device, MmapPort, Selector, SelectorKind, Stream};

use crate::common::{route_mmap_ports, try_route_stream, EndpointPool};

#[derive(Debug, Default)]
pub struct GreedySelector;

impl Selector for GreedySelector {
    fn select(
        &self,
        device: &Device,
        streams: &[Stream],
        mmap_ports: &[MmapPort],
        config: &Config,
    ) -> Result<Assignment, noc_core::CoreError> {
        let mut order: Vec<&Stream> = streams.iter().collect();
        order.sort_by(|a, b| {
            b.bandwidth(config.frequency_mhz, config.bandwidth_quantum)
                .cmp(&a.bandwidth(config.frequency_mhz, config.bandwidth_quantum))
                .then(a.id.inner().cmp(&b.id.inner()))
        });

        let mut assignment = Assignment::default();
        let mut ingress_pool = EndpointPool::default();
        let mut egress_pool = EndpointPool::default();
        for stream in order {
            match try_route_stream(device, stream, &mut ingress_pool, &mut egress_pool) {
                Some(placement) => {
                    assignment.streams.insert(stream.id, placement);
                }
                None => assignment.unmapped.push(stream.id),
            }
        }
        route_mmap_ports(device, mmap_ports, &mut assignment);
        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{single_edge_device, two_sibling_device};
    use noc_core::{SlotRange, StreamId};

    #[test]
    fn maps_the_only_stream_when_capacity_allows() {
        let device = single_edge_device();
        let streams = vec![Stream::new(
            StreamId::new(0),
            "s0",
            SlotRange::single(0, 0),
            SlotRange::single(1, 0),
            8,
        )];
        let assignment = GreedySelector
            .select(&device, &streams, &[], &Config::builder().selector(SelectorKind::Greedy).frequency_mhz(0.008).build())
            .unwrap();
        assert!(assignment.unmapped.is_empty());
        assert_eq!(assignment.streams.len(), 1);
    }

    #[test]
    fn larger_bandwidth_stream_wins_the_shared_endpoint() {
        let device = two_sibling_device();
        let config = Config::builder().selector(SelectorKind::Greedy).frequency_mhz(0.008).build();
        let small = Stream::new(StreamId::new(0), "small", SlotRange::single(0, 0), SlotRange::single(1, 0), 8);
        let big = Stream::new(StreamId::new(1), "big", SlotRange::single(0, 0), SlotRange::single(1, 0), 64);
        // Both streams admit either of the two ingress/egress siblings in this slot, so
        // whichever is visited first claims a pair; greedy visits the larger stream first.
        let assignment = GreedySelector.select(&device, &[small, big], &[], &config).unwrap();
        assert_eq!(assignment.streams.len(), 2);
        assert!(assignment.is_mapped(StreamId::new(1)));
    }
}
