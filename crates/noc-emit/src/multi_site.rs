//! Multi-site pblock assignment: binds each slot cell's floorplanned logic modules to the
//! same pblock as the NoC endpoints any mapped stream actually routed through that cell.
//! Gated by `Config::multi_site_noc` at the call site, same as the rest of this crate's
//! emitters are gated by whatever output the caller chooses to write.

use noc_core::{Assignment, Device, StreamId};
use noc_ir::DesignIr;
use petgraph::graph::NodeIndex;
use rustc_hash::FxHashMap;

use crate::loc::PhysicalLoc;

/// One slot cell's pblock: the logic modules floorplanned there, plus the NoC node
/// locations a mapped stream's endpoints actually landed on inside that cell.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MultiSitePblock {
    pub pblock: String,
    pub slot_x: usize,
    pub slot_y: usize,
    pub modules: Vec<String>,
    pub noc_nodes: Vec<PhysicalLoc>,
}

impl MultiSitePblock {
    fn new(slot_x: usize, slot_y: usize) -> Self {
        Self {
            pblock: format!("pblock_slot_x{slot_x}y{slot_y}"),
            slot_x,
            slot_y,
            modules: Vec::new(),
            noc_nodes: Vec::new(),
        }
    }
}

/// Emits one [`MultiSitePblock`] per slot cell referenced by either a module's
/// `floorplan_region` or a mapped stream's chosen ingress/egress, sorted by `(x, y)`.
pub fn emit_multi_site_pblocks(ir: &DesignIr, device: &Device, assignment: &Assignment) -> Vec<MultiSitePblock> {
    let topology = device.topology();

    let mut slot_of: FxHashMap<NodeIndex, (usize, usize)> = FxHashMap::default();
    for x in 0..device.slot_width() {
        for y in 0..device.slot_height() {
            for n in device.ingress_nodes_in(x, y).into_iter().chain(device.egress_nodes_in(x, y)) {
                slot_of.insert(n, (x, y));
            }
        }
    }

    let mut by_slot: FxHashMap<(usize, usize), MultiSitePblock> = FxHashMap::default();

    let mut module_names: Vec<&String> = ir.module_definitions.keys().collect();
    module_names.sort();
    for name in module_names {
        let Some(region) = ir.module_definitions[name].floorplan_region.as_deref() else {
            continue;
        };
        let Ok(slot) = noc_core::SlotRange::parse(region) else {
            continue;
        };
        let cell = slot.lower_left();
        by_slot
            .entry(cell)
            .or_insert_with(|| MultiSitePblock::new(cell.0, cell.1))
            .modules
            .push(name.clone());
    }

    let mut stream_ids: Vec<&StreamId> = assignment.streams.keys().collect();
    stream_ids.sort();
    for id in stream_ids {
        let placement = &assignment.streams[id];
        for node_name in [&placement.ingress, &placement.egress] {
            let Some(idx) = topology.idx_of(node_name) else { continue };
            let Some(&cell) = slot_of.get(&idx) else { continue };
            let Some(loc) = PhysicalLoc::parse(node_name) else { continue };
            let entry = by_slot.entry(cell).or_insert_with(|| MultiSitePblock::new(cell.0, cell.1));
            if !entry.noc_nodes.contains(&loc) {
                entry.noc_nodes.push(loc);
            }
        }
    }

    let mut out: Vec<MultiSitePblock> = by_slot.into_values().collect();
    out.sort_by_key(|p| (p.slot_x, p.slot_y));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use noc_core::{BytesPerSec, EdgeSpec, Node, NodeKind, StreamPlacement, Topology};
    use noc_ir::ModuleDef;

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
    fn groups_floorplanned_logic_with_the_noc_endpoint_it_shares_a_slot_with() {
        let mut ir = DesignIr::default();
        ir.top_name = "top".to_string();
        ir.module_definitions.insert(
            "consumer".to_string(),
            ModuleDef {
                floorplan_region: Some("SLOT_X1Y0".to_string()),
                ..Default::default()
            },
        );

        let mut assignment = Assignment::default();
        assignment.streams.insert(
            StreamId::new(0),
            StreamPlacement {
                ingress: "ingress_x0y0".to_string(),
                egress: "egress_x1y0".to_string(),
                path: vec!["ingress_x0y0".to_string(), "sw_x0y0".to_string(), "sw_x1y0".to_string(), "egress_x1y0".to_string()],
            },
        );

        let pblocks = emit_multi_site_pblocks(&ir, &device(), &assignment);
        assert_eq!(pblocks.len(), 2, "slot (0,0) for the ingress, slot (1,0) for the egress+module");

        let slot10 = pblocks.iter().find(|p| (p.slot_x, p.slot_y) == (1, 0)).unwrap();
        assert_eq!(slot10.modules, vec!["consumer".to_string()]);
        assert_eq!(slot10.noc_nodes, vec![PhysicalLoc { x: 1, y: 0 }]);

        let slot00 = pblocks.iter().find(|p| (p.slot_x, p.slot_y) == (0, 0)).unwrap();
        assert!(slot00.modules.is_empty());
        assert_eq!(slot00.noc_nodes, vec![PhysicalLoc { x: 0, y: 0 }]);
    }

    #[test]
    fn a_module_with_no_floorplan_region_is_skipped() {
        let mut ir = DesignIr::default();
        ir.module_definitions.insert("unplaced".to_string(), ModuleDef::default());
        let pblocks = emit_multi_site_pblocks(&ir, &device(), &Assignment::default());
        assert!(pblocks.is_empty());
    }
}
