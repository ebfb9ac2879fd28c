//! Manhattan distance and objective weighting.

use crate::device::SlotRange;
use crate::units::{BytesPerSec, Distance};

/// Manhattan distance between the lower-left corners of two slot ranges.
pub fn manhattan(a: &SlotRange, b: &SlotRange) -> Distance {
    let (x1, y1) = a.lower_left();
    let (x2, y2) = b.lower_left();
    let dx = x1.abs_diff(x2) as u64;
    let dy = y1.abs_diff(y2) as u64;
    Distance::new(dx + dy)
}

/// The objective weight for leaving a stream unmapped: `bandwidth * distance`.
pub fn stream_weight(bandwidth: BytesPerSec, distance: Distance) -> u64 {
    bandwidth.into_u64() * distance.into_u64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_symmetric() {
        let a = SlotRange::single(0, 0);
        let b = SlotRange::single(3, 2);
        assert_eq!(manhattan(&a, &b), manhattan(&b, &a));
        assert_eq!(manhattan(&a, &b).into_u64(), 5);
    }

    #[test]
    fn distance_uses_lower_left_corner() {
        let a = SlotRange::single(0, 0);
        let b = crate::device::SlotRange {
            x0: 2,
            y0: 2,
            x1: 5,
            y1: 5,
        };
        assert_eq!(manhattan(&a, &b).into_u64(), 4);
    }
}
