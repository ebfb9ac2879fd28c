//! IR ingestion and transformation errors.

#[derive(Debug, thiserror::Error)]
pub enum IrError {
    #[error("module {0} is not declared in module_definitions")]
    UndeclaredModule(String),
    #[error("submodule {submodule} in module {module} is missing parameter {key}")]
    MissingParameter {
        module: String,
        submodule: String,
        key: String,
    },
    #[error("stream {0}: malformed slot region")]
    MalformedSlotRegion(#[from] noc_core::SlotParseError),
    #[error("stream {0} has no matching submodule to transform")]
    NoMatchingSubmodule(String),
    #[error("data width of {bit_width} bits exceeds the NoC's 64-byte TDATA maximum")]
    UnsupportedTdataWidth { bit_width: u32 },
}
