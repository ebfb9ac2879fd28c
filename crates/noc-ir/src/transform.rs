//! FIFO-splitting IR transformation: for every mapped stream, the original
//! FIFO is replaced by an NMU-side half driving a new master AXIS port and an NSU-side half
//! driven by a new slave AXIS port, with a constant driver tying the master's `tlast` high.

use noc_core::Assignment;

use crate::error::IrError;
use crate::ingest::PendingStream;
use crate::model::{Connection, DesignIr, ModuleDef, Port, PortDirection, Submodule};

const NMU_UPSTREAM_PORTS: [&str; 3] = ["write", "din", "full_n"];
const NSU_DOWNSTREAM_PORTS: [&str; 3] = ["read", "dout", "empty_n"];
const SUPPORTED_TDATA_BYTES: [u32; 4] = [8, 16, 32, 64];

/// Rounds a data width in bits up to the next NoC-supported TDATA byte count.
pub fn roundup_tdata_bytes(bit_width: u32) -> Result<u32, IrError> {
    let bytes = bit_width.div_ceil(8);
    SUPPORTED_TDATA_BYTES
        .into_iter()
        .find(|&b| b >= bytes)
        .ok_or(IrError::UnsupportedTdataWidth { bit_width })
}

fn axis_ports(stream_name: &str, prefix: &str, tdata_bits: u32, master: bool) -> Vec<Port> {
    let dir = |out: bool| if master == out { PortDirection::Output } else { PortDirection::Input };
    vec![
        Port::new(format!("{prefix}_{stream_name}_tdata"), dir(true), tdata_bits),
        Port::new(format!("{prefix}_{stream_name}_tvalid"), dir(true), 1),
        Port::new(format!("{prefix}_{stream_name}_tready"), dir(false), 1),
        Port::new(format!("{prefix}_{stream_name}_tlast"), dir(true), 1),
    ]
}

fn filtered_connections(
    original: &Submodule,
    keys: &[&str],
) -> rustc_hash::FxHashMap<String, String> {
    keys.iter()
        .filter_map(|&k| original.connections.get(k).map(|net| (k.to_string(), net.clone())))
        .collect()
}

/// Splits one mapped stream's FIFO in place. No-op on streams the caller has already
/// determined are unmapped; callers should only invoke this for names present in
/// `Assignment::streams`.
pub fn split_mapped_stream(ir: &mut DesignIr, pending: &PendingStream) -> Result<(), IrError> {
    let tdata_bits = roundup_tdata_bytes(pending.stream.bit_width)? * 8;
    let name = &pending.submodule_name;

    let module = ir
        .module_definitions
        .get_mut(&pending.module_name)
        .ok_or_else(|| IrError::UndeclaredModule(pending.module_name.clone()))?;
    let original = module
        .submodules
        .remove(name)
        .ok_or_else(|| IrError::NoMatchingSubmodule(name.clone()))?;

    let depth_nmu = pending.depth.div_ceil(2);
    let depth_nsu = pending.depth / 2;

    let mut nmu = Submodule {
        module_type: "split_fifo_nmu".to_string(),
        connections: filtered_connections(&original, &NMU_UPSTREAM_PORTS),
        ..Default::default()
    };
    nmu.parameters.insert("depth".to_string(), depth_nmu.into());
    nmu.parameters.insert("width".to_string(), pending.width.into());
    nmu.parameters
        .insert("__HEAD_REGION".to_string(), original.parameters["__HEAD_REGION"].clone());
    nmu.parameters
        .insert("__TAIL_REGION".to_string(), original.parameters["__HEAD_REGION"].clone());
    nmu.connections.insert("m_axis_tdata".to_string(), format!("m_axis_{name}_tdata"));
    nmu.connections.insert("m_axis_tvalid".to_string(), format!("m_axis_{name}_tvalid"));
    nmu.connections.insert("m_axis_tready".to_string(), format!("m_axis_{name}_tready"));
    nmu.connections.insert("m_axis_tlast".to_string(), format!("m_axis_{name}_tlast"));

    let mut nsu = Submodule {
        module_type: "split_fifo_nsu".to_string(),
        connections: filtered_connections(&original, &NSU_DOWNSTREAM_PORTS),
        ..Default::default()
    };
    nsu.parameters.insert("depth".to_string(), depth_nsu.into());
    nsu.parameters.insert("width".to_string(), pending.width.into());
    nsu.parameters
        .insert("__HEAD_REGION".to_string(), original.parameters["__TAIL_REGION"].clone());
    nsu.parameters
        .insert("__TAIL_REGION".to_string(), original.parameters["__TAIL_REGION"].clone());
    nsu.connections.insert("s_axis_tdata".to_string(), format!("s_axis_{name}_tdata"));
    nsu.connections.insert("s_axis_tvalid".to_string(), format!("s_axis_{name}_tvalid"));
    nsu.connections.insert("s_axis_tready".to_string(), format!("s_axis_{name}_tready"));
    nsu.connections.insert("s_axis_tlast".to_string(), format!("s_axis_{name}_tlast"));

    let mut tie_high = Submodule {
        module_type: "const_driver".to_string(),
        ..Default::default()
    };
    tie_high.parameters.insert("value".to_string(), 1.into());
    tie_high.connections.insert("dout".to_string(), format!("m_axis_{name}_tlast"));

    module.submodules.insert(format!("{name}_nmu"), nmu);
    module.submodules.insert(format!("{name}_nsu"), nsu);
    module.submodules.insert(format!("{name}_tlast_tie"), tie_high);

    module.ports.extend(axis_ports(name, "m_axis", tdata_bits, true));
    module.ports.extend(axis_ports(name, "s_axis", tdata_bits, false));

    if pending.module_name != ir.top_name {
        let wrapper_module_name = pending.module_name.clone();
        let top_name = ir.top_name.clone();
        let top = ir
            .top_module_mut()
            .ok_or_else(|| IrError::UndeclaredModule(top_name))?;
        for port in axis_ports(name, "m_axis", tdata_bits, true)
            .into_iter()
            .chain(axis_ports(name, "s_axis", tdata_bits, false))
        {
            top.connections.push(Connection {
                from: port.name.clone(),
                to: format!("{wrapper_module_name}.{}", port.name),
            });
            top.ports.push(port);
        }
    }

    Ok(())
}

/// Splits the FIFO of every stream the [`Assignment`] maps, then removes any wrapper module
/// left with no content and applies `dont_touch` to the top module's pipeline registers.
pub fn apply_transformation(
    ir: &mut DesignIr,
    pending_streams: &[PendingStream],
    assignment: &Assignment,
) -> Result<(), IrError> {
    for pending in pending_streams {
        if assignment.is_mapped(pending.stream.id) {
            log::info!("splitting fifo for mapped stream {}", pending.submodule_name);
            split_mapped_stream(ir, pending)?;
        }
    }
    remove_empty_wrappers(ir);
    apply_dont_touch(ir);
    Ok(())
}

/// Removes module definitions with no submodules, ports, or wires, and the submodule
/// instances in other modules that reference them.
pub fn remove_empty_wrappers(ir: &mut DesignIr) {
    loop {
        let empty: Vec<String> = ir
            .module_definitions
            .iter()
            .filter(|(name, m)| *name != &ir.top_name && m.is_empty_wrapper())
            .map(|(name, _)| name.clone())
            .collect();
        if empty.is_empty() {
            break;
        }
        for name in &empty {
            ir.module_definitions.remove(name);
        }
        for module in ir.module_definitions.values_mut() {
            module.submodules.retain(|_, sub| !empty.contains(&sub.module_type));
        }
    }
}

fn apply_dont_touch(ir: &mut DesignIr) {
    if let Some(top) = ir.top_module_mut() {
        for wire in top.wires.iter_mut().filter(|w| w.is_pipeline_register) {
            wire.dont_touch = true;
        }
    }
}
