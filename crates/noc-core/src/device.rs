//! Slots, slot ranges, and the [`Device`] that partitions a [`Topology`] into slot cells.

use petgraph::graph::NodeIndex;

use crate::topology::Topology;

/// A rectangular placement region, expanded from a slot name matching
/// `SLOT_X\d+Y\d+(_TO_SLOT_X\d+Y\d+)?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SlotRange {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl SlotRange {
    pub fn single(x: usize, y: usize) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x,
            y1: y,
        }
    }

    /// Parses a slot name, e.g. `SLOT_X0Y1_TO_SLOT_X2Y3` or the single-cell `SLOT_X0Y1`.
    pub fn parse(name: &str) -> Result<Self, SlotParseError> {
        let mut parts = name.split("_TO_");
        let first = parts.next().ok_or(SlotParseError::Malformed)?;
        let (x0, y0) = parse_corner(first)?;
        let (x1, y1) = match parts.next() {
            Some(second) => parse_corner(second)?,
            None => (x0, y0),
        };
        if parts.next().is_some() {
            return Err(SlotParseError::Malformed);
        }
        if x0 > x1 || y0 > y1 {
            return Err(SlotParseError::NotLowerLeftToUpperRight);
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    /// The lower-left corner, used for Manhattan-distance weighting.
    pub fn lower_left(&self) -> (usize, usize) {
        (self.x0, self.y0)
    }

    /// All integer grid cells in the rectangle.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.x0..=self.x1).flat_map(move |x| (self.y0..=self.y1).map(move |y| (x, y)))
    }
}

fn parse_corner(s: &str) -> Result<(usize, usize), SlotParseError> {
    let rest = s.strip_prefix("SLOT_X").ok_or(SlotParseError::Malformed)?;
    let (x, rest) = rest.split_once('Y').ok_or(SlotParseError::Malformed)?;
    let x: usize = x.parse().map_err(|_| SlotParseError::Malformed)?;
    let y: usize = rest.parse().map_err(|_| SlotParseError::Malformed)?;
    Ok((x, y))
}

#[derive(Debug, thiserror::Error)]
pub enum SlotParseError {
    #[error("malformed slot name")]
    Malformed,
    #[error("slot range must run from lower-left to upper-right")]
    NotLowerLeftToUpperRight,
}

/// A device: a [`Topology`] plus the slot grid's dimensions and clock-region mapping.
/// Invariant: `slot_height == topology.num_slr()`.
#[derive(Debug, Clone)]
pub struct Device {
    topology: Topology,
    slot_width: usize,
    slot_height: usize,
    /// `cr_mapping[x][y]`: the clock region name covering slot cell `(x, y)`.
    cr_mapping: Vec<Vec<String>>,
}

impl Device {
    pub fn new(
        topology: Topology,
        slot_width: usize,
        slot_height: usize,
        cr_mapping: Vec<Vec<String>>,
    ) -> Result<Self, DeviceError> {
        if slot_height != topology.num_slr() {
            return Err(DeviceError::SlotHeightMismatch {
                slot_height,
                num_slr: topology.num_slr(),
            });
        }
        Ok(Self {
            topology,
            slot_width,
            slot_height,
            cr_mapping,
        })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn slot_width(&self) -> usize {
        self.slot_width
    }

    pub fn slot_height(&self) -> usize {
        self.slot_height
    }

    pub fn clock_region(&self, x: usize, y: usize) -> Option<&str> {
        self.cr_mapping.get(x)?.get(y).map(String::as_str)
    }

    fn cols_per_slot(&self) -> usize {
        self.topology.num_col() / self.slot_width
    }

    fn col_range(&self, x: usize) -> (usize, usize) {
        let cols_per_slot = self.cols_per_slot();
        (cols_per_slot * x, cols_per_slot * (x + 1))
    }

    /// Ordered list of admissible ingress nodes in slot cell `(x, y)`.
    pub fn ingress_nodes_in(&self, x: usize, y: usize) -> Vec<NodeIndex> {
        let (col_start, col_end) = self.col_range(x);
        let (row_start, row_end) = self.topology.row_range_for_die(y);
        (col_start..col_end)
            .flat_map(|col| {
                (row_start..row_end).filter_map(move |row| self.topology.ingress_nodes_in(col, row))
            })
            .collect()
    }

    /// Ordered list of admissible egress nodes in slot cell `(x, y)`.
    pub fn egress_nodes_in(&self, x: usize, y: usize) -> Vec<NodeIndex> {
        let (col_start, col_end) = self.col_range(x);
        let (row_start, row_end) = self.topology.row_range_for_die(y);
        (col_start..col_end)
            .flat_map(|col| {
                (row_start..row_end).filter_map(move |row| self.topology.egress_nodes_in(col, row))
            })
            .collect()
    }

    /// Admissible ingress nodes across every cell in a slot range.
    pub fn ingress_nodes_in_range(&self, range: &SlotRange) -> Vec<NodeIndex> {
        range
            .cells()
            .flat_map(|(x, y)| self.ingress_nodes_in(x, y))
            .collect()
    }

    /// Admissible egress nodes across every cell in a slot range.
    pub fn egress_nodes_in_range(&self, range: &SlotRange) -> Vec<NodeIndex> {
        range
            .cells()
            .flat_map(|(x, y)| self.egress_nodes_in(x, y))
            .collect()
    }

    /// Number of ingress (== number of egress, by construction) nodes in a slot cell.
    /// Kept as a derived method rather than a cached field since it's cheap and avoids a
    /// second invariant to maintain.
    pub fn nmu_or_nsu_count_in(&self, x: usize, y: usize) -> usize {
        self.ingress_nodes_in(x, y).len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("slot_height ({slot_height}) must equal the topology's die count ({num_slr})")]
    SlotHeightMismatch { slot_height: usize, num_slr: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_cell_slot() {
        let s = SlotRange::parse("SLOT_X0Y1").unwrap();
        assert_eq!(s, SlotRange::single(0, 1));
    }

    #[test]
    fn parse_range_slot() {
        let s = SlotRange::parse("SLOT_X0Y1_TO_SLOT_X2Y3").unwrap();
        assert_eq!(s.lower_left(), (0, 1));
        assert_eq!(s.cells().count(), 3 * 3);
    }

    #[test]
    fn parse_rejects_backwards_range() {
        let res = SlotRange::parse("SLOT_X2Y3_TO_SLOT_X0Y1");
        assert!(matches!(
            res,
            Err(SlotParseError::NotLowerLeftToUpperRight)
        ));
    }

    #[test]
    fn device_rejects_mismatched_slot_height() {
        let (nodes, edges) = crate::testing::two_die_topology(4, vec![7, 6]);
        let topo = Topology::new(&nodes, &edges, 2, vec![7, 6], 4).unwrap();
        let res = Device::new(topo, 2, 1, vec![]);
        assert!(matches!(res, Err(DeviceError::SlotHeightMismatch { .. })));
    }
}
