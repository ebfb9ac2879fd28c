//! Placement constraint records: AXIS index -> physical location bindings
//! for mapped streams, and `PHYSICAL_LOC` constraints for MMAP ports.

use noc_core::{Assignment, Device, MmapPort, StreamId};

use crate::loc::PhysicalLoc;

/// Binds a mapped stream's AXIS index to its chosen ingress and egress coordinates.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AxisIndexConstraint {
    pub axis_index: u32,
    pub stream: StreamId,
    pub ingress: PhysicalLoc,
    pub egress: PhysicalLoc,
}

/// The admissible-location constraint for one MMAP port. `noc-core`'s device API only
/// resolves a single ingress per port once routed, so the "admissible set" this crate emits
/// collapses to that one routed location unless the port's `noc_hint` was absent, in which
/// case every ingress candidate the device offers in column 1+ is listed, mirroring the
/// unconstrained memory-side placement a hint-less port is otherwise free to land on.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MmapPhysicalLocConstraint {
    pub port: String,
    pub admissible: Vec<PhysicalLoc>,
    /// The port's HBM base address, as a `44'h...`-formatted Verilog literal.
    pub addr: String,
}

/// Emits one [`AxisIndexConstraint`] per mapped stream, indexed in ascending [`StreamId`]
/// order for determinism.
pub fn emit_axis_constraints(assignment: &Assignment) -> Vec<AxisIndexConstraint> {
    let mut ids: Vec<&StreamId> = assignment.streams.keys().collect();
    ids.sort();
    ids.into_iter()
        .enumerate()
        .filter_map(|(axis_index, &stream)| {
            let placement = assignment.placement(stream)?;
            let ingress = PhysicalLoc::parse(&placement.ingress)?;
            let egress = PhysicalLoc::parse(&placement.egress)?;
            Some(AxisIndexConstraint {
                axis_index: axis_index as u32,
                stream,
                ingress,
                egress,
            })
        })
        .collect()
}

/// Emits the `PHYSICAL_LOC` constraint for every MMAP port, using its actually-routed
/// forward path's first hop when one was found, or, for a hint-less port, every ingress
/// node the device exposes outside column 0. Each port's HBM base address is assigned by
/// bank in the same pass, so two ports sharing a bank split its address range.
pub fn emit_mmap_constraints(device: &Device, mmap_ports: &[MmapPort], assignment: &Assignment) -> Vec<MmapPhysicalLocConstraint> {
    let mut ports: Vec<&MmapPort> = mmap_ports.iter().collect();
    ports.sort_by_key(|p| p.id);

    let bank_inputs: Vec<(String, u32)> = ports.iter().map(|p| (p.name.clone(), p.bank)).collect();
    let addrs = noc_devices::hbm::bank_to_addr(&bank_inputs);

    ports
        .into_iter()
        .map(|port| {
            let admissible = match assignment.mmap_ports.get(&port.id) {
                Some(placement) => placement
                    .forward_path
                    .first()
                    .and_then(|n| PhysicalLoc::parse(n))
                    .into_iter()
                    .collect(),
                None => all_non_column_zero_ingresses(device),
            };
            MmapPhysicalLocConstraint {
                port: port.name.clone(),
                admissible,
                addr: addrs[&port.name].clone(),
            }
        })
        .collect()
}

fn all_non_column_zero_ingresses(device: &Device) -> Vec<PhysicalLoc> {
    let topology = device.topology();
    (1..device.slot_width())
        .flat_map(|x| (0..device.slot_height()).map(move |y| (x, y)))
        .flat_map(|(x, y)| device.ingress_nodes_in(x, y))
        .filter_map(|idx| PhysicalLoc::parse(&topology.node(idx).name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use noc_core::{BytesPerSec, EdgeSpec, MmapPortId, Node, NodeKind, StreamPlacement, Topology};

    fn device() -> Device {
        let bw = BytesPerSec::new(16_000);
        let nodes = vec![
            Node::new("ingress_x0y0", NodeKind::Ingress, 0, 0),
            Node::new("ingress_x1y0", NodeKind::Ingress, 1, 0),
            Node::new("egress_x1y0", NodeKind::Egress, 1, 0),
            Node::new("sw_x0y0", NodeKind::VerticalSwitch, 0, 0),
            Node::new("sw_x1y0", NodeKind::VerticalSwitch, 1, 0),
        ];
        let edges = vec![
            EdgeSpec::new("ingress_x0y0", "sw_x0y0", bw),
            EdgeSpec::new("sw_x0y0", "sw_x1y0", bw),
            EdgeSpec::new("sw_x1y0", "ingress_x1y0", bw),
            EdgeSpec::new("sw_x1y0", "egress_x1y0", bw),
        ];
        let topology = Topology::new(&nodes, &edges, 1, vec![1], 2).unwrap();
        Device::new(topology, 2, 1, vec![]).unwrap()
    }

    #[test]
    fn emits_one_constraint_per_mapped_stream_in_id_order() {
        let mut assignment = Assignment::default();
        assignment.streams.insert(
            StreamId::new(1),
            StreamPlacement {
                ingress: "ingress_x0y0".to_string(),
                egress: "egress_x1y0".to_string(),
                path: vec![],
            },
        );
        let constraints = emit_axis_constraints(&assignment);
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].axis_index, 0);
        assert_eq!(constraints[0].ingress, PhysicalLoc { x: 0, y: 0 });
    }

    #[test]
    fn mmap_port_without_hint_lists_every_non_column_zero_ingress() {
        let device = device();
        let port = MmapPort::new(MmapPortId::new(0), "mmap0", 0, BytesPerSec::new(1), BytesPerSec::new(1), None);
        let constraints = emit_mmap_constraints(&device, &[port], &Assignment::default());
        assert_eq!(constraints[0].admissible, vec![PhysicalLoc { x: 1, y: 0 }]);
    }

    #[test]
    fn two_ports_on_the_same_bank_get_distinct_addresses() {
        let device = device();
        let p0 = MmapPort::new(MmapPortId::new(0), "mmap0", 2, BytesPerSec::new(1), BytesPerSec::new(1), None);
        let p1 = MmapPort::new(MmapPortId::new(1), "mmap1", 2, BytesPerSec::new(1), BytesPerSec::new(1), None);
        let constraints = emit_mmap_constraints(&device, &[p0, p1], &Assignment::default());
        assert_eq!(
            noc_devices::hbm::bank_to_addr(&[("mmap0".to_string(), 2), ("mmap1".to_string(), 2)])["mmap0"],
            constraints[0].addr,
        );
        assert_ne!(constraints[0].addr, constraints[1].addr);
    }
}
