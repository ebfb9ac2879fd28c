//! The `random` selector: shuffles stream order and maps each one that still has a free
//! ingress/egress candidate, using the same capacity-respecting greedy acceptance
//! `noc-selectors::greedy` uses but over a randomized visitation order.

use noc_core::{Assignment, Config, Device, MmapPort, Selector, SelectorKind, Stream};
use rand::seq::SliceRandom;

use crate::common::{route_mmap_ports, try_route_stream, EndpointPool};

#[derive(Debug, Default)]
pub struct RandomSelector;

impl Selector for RandomSelector {
    fn select(
        &self,
        device: &Device,
        streams: &[Stream],
        mmap_ports: &[MmapPort],
        _config: &Config,
    ) -> Result<Assignment, noc_core::CoreError> {
        let mut order: Vec<&Stream> = streams.iter().collect();
        order.shuffle(&mut rand::thread_rng());

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
