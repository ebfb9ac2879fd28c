//! The design IR data model: a nested mapping of module definitions, each
//! carrying submodule instances, ports, wires, parameters, connections, and pragmas.
//! `parameters`/`pragmas` keep the IR's schema-flexible `serde_json::Value` payload since
//! only a handful of keys this crate actually reads (`__HEAD_REGION`,
//! `__TAIL_REGION`, `RS_ROUTE`, `depth`, `width`) are pinned down; everything else passes
//! through untouched.

use rustc_hash::FxHashMap;

/// The top-level design, keyed by module name.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DesignIr {
    pub top_name: String,
    pub module_definitions: FxHashMap<String, ModuleDef>,
}

impl DesignIr {
    pub fn top_module(&self) -> Option<&ModuleDef> {
        self.module_definitions.get(&self.top_name)
    }

    pub fn top_module_mut(&mut self) -> Option<&mut ModuleDef> {
        self.module_definitions.get_mut(&self.top_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PortDirection {
    Input,
    Output,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Port {
    pub name: String,
    pub direction: PortDirection,
    /// Width in bits.
    pub width: u32,
}

impl Port {
    pub fn new(name: impl Into<String>, direction: PortDirection, width: u32) -> Self {
        Self {
            name: name.into(),
            direction,
            width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Wire {
    pub name: String,
    pub width: u32,
    /// Set during ingestion for nets the source design already tags as pipeline-body
    /// registers; the transform pass applies `dont_touch` to every such wire in the top
    /// module.
    #[serde(default)]
    pub is_pipeline_register: bool,
    #[serde(default)]
    pub dont_touch: bool,
}

impl Wire {
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
            is_pipeline_register: false,
            dont_touch: false,
        }
    }
}

/// One submodule instance within a [`ModuleDef`].
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Submodule {
    pub module_type: String,
    #[serde(default)]
    pub parameters: FxHashMap<String, serde_json::Value>,
    #[serde(default)]
    pub pragmas: FxHashMap<String, serde_json::Value>,
    /// Instance port name -> net name it's wired to in the enclosing module.
    #[serde(default)]
    pub connections: FxHashMap<String, String>,
}

impl Submodule {
    pub fn parameter_str(&self, key: &str) -> Option<&str> {
        self.parameters.get(key)?.as_str()
    }

    pub fn parameter_u64(&self, key: &str) -> Option<u64> {
        self.parameters.get(key)?.as_u64()
    }
}

/// A net-to-net connection at the enclosing module's level, e.g. wiring a submodule's
/// output directly to another submodule's input or to an exposed port.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModuleDef {
    #[serde(default)]
    pub submodules: FxHashMap<String, Submodule>,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub wires: Vec<Wire>,
    #[serde(default)]
    pub parameters: FxHashMap<String, serde_json::Value>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub pragmas: FxHashMap<String, serde_json::Value>,
    #[serde(default)]
    pub floorplan_region: Option<String>,
}

impl ModuleDef {
    pub fn is_empty_wrapper(&self) -> bool {
        self.submodules.is_empty() && self.ports.is_empty() && self.wires.is_empty()
    }
}
