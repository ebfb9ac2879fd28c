//! File I/O for interfacing with the placement compiler: reading the design IR, MMAP
//! table, and run configuration, and writing the transformed IR and assignment back out.

#![warn(unreachable_pub, missing_debug_implementations)]

use std::path::Path;

use noc_core::{Assignment, Config};
use noc_ir::{DesignIr, MmapTable};

/// Reads a [`DesignIr`] from a file in JSON format.
pub fn read_design_ir(path: impl AsRef<Path>) -> Result<DesignIr, Error> {
    read_json(path)
}

/// Reads an [`MmapTable`] from a file in JSON format.
pub fn read_mmap_table(path: impl AsRef<Path>) -> Result<MmapTable, Error> {
    read_json(path)
}

/// Reads a [`Config`] from a file in JSON or TOML format, dispatching on extension.
pub fn read_config(path: impl AsRef<Path>) -> Result<Config, Error> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(serde_json::from_str(&contents)?),
        Some("toml") => Ok(toml::from_str(&contents)?),
        _ => Err(Error::UnknownFileType(path.into())),
    }
}

/// Writes any serialisable value to a file as pretty-printed JSON, used for the transformed
/// IR and the final [`Assignment`].
pub fn write_json(path: impl AsRef<Path>, value: &impl serde::Serialize) -> Result<(), Error> {
    let contents = serde_json::to_string_pretty(value)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Convenience wrapper for [`write_json`] over an [`Assignment`].
pub fn write_assignment(path: impl AsRef<Path>, assignment: &Assignment) -> Result<(), Error> {
    write_json(path, assignment)
}

fn read_json<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, Error> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        }
        _ => Err(Error::UnknownFileType(path.into())),
    }
}

/// Error kinds for reading and writing the compiler's external artifacts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown file type: {0}")]
    UnknownFileType(std::path::PathBuf),
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
    #[error("TOML error")]
    Toml(#[from] toml::de::Error),
    #[error("IO error")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_config_dispatches_on_extension() {
        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            json_file,
            r#"{{"selector": "greedy", "frequency_mhz": 200.0}}"#
        )
        .unwrap();
        let cfg = read_config(json_file.path()).unwrap();
        assert_eq!(cfg.frequency_mhz, 200.0);

        let mut toml_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(toml_file, "selector = \"ilp\"\nfrequency_mhz = 300.0\n").unwrap();
        let cfg = read_config(toml_file.path()).unwrap();
        assert_eq!(cfg.frequency_mhz, 300.0);
    }

    #[test]
    fn read_config_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(read_config(file.path()), Err(Error::UnknownFileType(_))));
    }

    #[test]
    fn write_json_then_read_design_ir_round_trips() {
        let ir = DesignIr::default();
        let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write_json(file.path(), &ir).unwrap();
        let back = read_design_ir(file.path()).unwrap();
        assert_eq!(back.top_name, ir.top_name);
    }
}
