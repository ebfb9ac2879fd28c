//! Node-name parsing shared by both emission kinds, following the `<kind>_x<int>y<int>`
//! naming format every device builder produces.

/// A physical NoC node location, as emitted into a `PHYSICAL_LOC`-style constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PhysicalLoc {
    pub x: u32,
    pub y: u32,
}

impl PhysicalLoc {
    /// Parses the `x<int>y<int>` suffix out of a node name, regardless of its `<kind>`
    /// prefix: split on the last `_`, strip the `x`, split the remainder on `y`.
    pub fn parse(node_name: &str) -> Option<Self> {
        let (_, suffix) = node_name.rsplit_once('_')?;
        let suffix = suffix.strip_prefix('x')?;
        let (x, y) = suffix.split_once('y')?;
        Some(Self {
            x: x.parse().ok()?,
            y: y.parse().ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ingress_and_memory_port_names() {
        assert_eq!(PhysicalLoc::parse("ingress_x2y5"), Some(PhysicalLoc { x: 2, y: 5 }));
        assert_eq!(PhysicalLoc::parse("memory_port_bank0"), None);
    }
}
