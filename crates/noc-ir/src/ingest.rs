//! Stream and MMAP port ingestion from a [`DesignIr`].

use rustc_hash::FxHashMap;

use noc_core::{BytesPerSec, MmapPort, MmapPortId, NocHint, SlotRange, Stream, StreamId};

use crate::error::IrError;
use crate::model::DesignIr;

const HEAD_REGION_PARAM: &str = "__HEAD_REGION";
const TAIL_REGION_PARAM: &str = "__TAIL_REGION";
const ROUTE_PRAGMA: &str = "RS_ROUTE";
const WIDTH_PARAM: &str = "width";
const DEPTH_PARAM: &str = "depth";

/// A cross-slot pipeline stage found in the IR, before it has been assigned an endpoint.
#[derive(Debug, Clone)]
pub struct PendingStream {
    pub stream: Stream,
    pub module_name: String,
    pub submodule_name: String,
    /// The `RS_ROUTE` pragma's slot sequence, if present; informational only, since the
    /// placement core makes its own endpoint choice.
    pub route_hint: Option<Vec<String>>,
    pub depth: u64,
    /// The FIFO's raw `width` parameter, including the end-of-transfer flag bit that
    /// `stream.bit_width` excludes.
    pub width: u64,
}

/// Walks every module's submodules and collects the FIFOs whose head and tail regions
/// differ, assigning them sequential [`StreamId`]s in submodule-name order so the result is
/// deterministic regardless of the underlying map's iteration order.
pub fn extract_streams(ir: &DesignIr) -> Result<Vec<PendingStream>, IrError> {
    let mut found = Vec::new();
    let mut module_names: Vec<&String> = ir.module_definitions.keys().collect();
    module_names.sort();

    for module_name in module_names {
        let module = &ir.module_definitions[module_name];
        let mut sub_names: Vec<&String> = module.submodules.keys().collect();
        sub_names.sort();
        for sub_name in sub_names {
            let sub = &module.submodules[sub_name];
            let (Some(head), Some(tail)) = (
                sub.parameter_str(HEAD_REGION_PARAM),
                sub.parameter_str(TAIL_REGION_PARAM),
            ) else {
                continue;
            };
            if head == tail {
                continue;
            }
            let src_slot = SlotRange::parse(head)?;
            let dst_slot = SlotRange::parse(tail)?;
            let width = sub.parameter_u64(WIDTH_PARAM).ok_or_else(|| IrError::MissingParameter {
                module: module_name.clone(),
                submodule: sub_name.clone(),
                key: WIDTH_PARAM.to_string(),
            })?;
            let depth = sub.parameter_u64(DEPTH_PARAM).ok_or_else(|| IrError::MissingParameter {
                module: module_name.clone(),
                submodule: sub_name.clone(),
                key: DEPTH_PARAM.to_string(),
            })?;
            // The FIFO's width parameter includes the one-bit end-of-transfer flag the
            // data stream itself excludes.
            let bit_width = width.saturating_sub(1) as u32;

            let route_hint = sub.pragmas.get(ROUTE_PRAGMA).and_then(|v| v.as_array()).map(|arr| {
                arr.iter()
                    .filter_map(|e| e.as_str().map(str::to_string))
                    .collect::<Vec<_>>()
            });

            let id = StreamId::new(found.len());
            log::debug!("stream {sub_name} ({module_name}): {head} -> {tail}, {bit_width} bits");
            found.push(PendingStream {
                stream: Stream::new(id, sub_name.clone(), src_slot, dst_slot, bit_width),
                module_name: module_name.clone(),
                submodule_name: sub_name.clone(),
                route_hint,
                depth,
                width,
            });
        }
    }
    Ok(found)
}

/// One row of the external MMAP table.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MmapTableEntry {
    pub bank: u32,
    pub read_bw: u64,
    pub write_bw: u64,
    /// The pre-placed ingress node name, when the port must route from a regular ingress
    /// rather than a dedicated memory-side one.
    pub noc: Option<String>,
}

pub type MmapTable = FxHashMap<String, MmapTableEntry>;

/// Converts the external MMAP table into [`MmapPort`]s in name order, for the same
/// determinism reason [`extract_streams`] sorts by submodule name.
pub fn extract_mmap_ports(table: &MmapTable) -> Vec<MmapPort> {
    let mut names: Vec<&String> = table.keys().collect();
    names.sort();
    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let entry = &table[name];
            let noc_hint = entry.noc.as_ref().map(|ingress| NocHint {
                ingress: ingress.clone(),
                egress: format!("memory_port_bank{}", entry.bank),
            });
            MmapPort::new(
                MmapPortId::new(i),
                name.clone(),
                entry.bank,
                BytesPerSec::new(entry.read_bw),
                BytesPerSec::new(entry.write_bw),
                noc_hint,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModuleDef, Submodule};
    use serde_json::json;

    fn pipeline_module(head: &str, tail: &str, width: u64, depth: u64) -> ModuleDef {
        let mut module = ModuleDef::default();
        let mut sub = Submodule {
            module_type: "fifo".to_string(),
            ..Default::default()
        };
        sub.parameters.insert(HEAD_REGION_PARAM.to_string(), json!(head));
        sub.parameters.insert(TAIL_REGION_PARAM.to_string(), json!(tail));
        sub.parameters.insert(WIDTH_PARAM.to_string(), json!(width));
        sub.parameters.insert(DEPTH_PARAM.to_string(), json!(depth));
        module.submodules.insert("pipe_fifo_0".to_string(), sub);
        module
    }

    #[test]
    fn cross_slot_fifo_becomes_a_stream() {
        let mut ir = DesignIr::default();
        ir.top_name = "top".to_string();
        ir.module_definitions.insert(
            "top".to_string(),
            pipeline_module("SLOT_X0Y0", "SLOT_X1Y0", 33, 8),
        );
        let streams = extract_streams(&ir).unwrap();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].stream.bit_width, 32);
        assert!(streams[0].stream.is_cross_slot());
    }

    #[test]
    fn same_slot_fifo_is_not_a_stream() {
        let mut ir = DesignIr::default();
        ir.top_name = "top".to_string();
        ir.module_definitions.insert(
            "top".to_string(),
            pipeline_module("SLOT_X0Y0", "SLOT_X0Y0", 33, 8),
        );
        assert!(extract_streams(&ir).unwrap().is_empty());
    }

    #[test]
    fn mmap_table_preserves_noc_hint() {
        let mut table = MmapTable::default();
        table.insert(
            "mmap0".to_string(),
            MmapTableEntry {
                bank: 2,
                read_bw: 1000,
                write_bw: 2000,
                noc: Some("ingress_x0y0".to_string()),
            },
        );
        let ports = extract_mmap_ports(&table);
        assert_eq!(ports.len(), 1);
        let hint = ports[0].noc_hint.as_ref().unwrap();
        assert_eq!(hint.ingress, "ingress_x0y0");
        assert_eq!(hint.egress, "memory_port_bank2");
    }
}
