//! Stream and MMAP-port models.

use crate::device::SlotRange;
use crate::units::BytesPerSec;

identifier!(StreamId, usize);
identifier!(MmapPortId, usize);

/// An inter-partition pipelined handshake stream. Only [`cross_slot`](Stream::cross_slot)
/// streams are candidates for NoC diversion.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Stream {
    pub id: StreamId,
    pub name: String,
    pub src_slot: SlotRange,
    pub dst_slot: SlotRange,
    /// Data width in bits, excluding the one-bit end-of-transfer flag.
    pub bit_width: u32,
}

impl Stream {
    pub fn new(id: StreamId, name: impl Into<String>, src: SlotRange, dst: SlotRange, bit_width: u32) -> Self {
        Self {
            id,
            name: name.into(),
            src_slot: src,
            dst_slot: dst,
            bit_width,
        }
    }

    pub fn is_cross_slot(&self) -> bool {
        self.src_slot != self.dst_slot
    }

    /// Raw bandwidth, before rounding to the NoC's port quantum: `width * freq / 8`.
    pub fn raw_bandwidth(&self, frequency_mhz: f64) -> BytesPerSec {
        let bytes_per_sec = (self.bit_width as f64) * frequency_mhz * 1e6 / 8.0;
        BytesPerSec::new(bytes_per_sec.ceil() as u64)
    }

    /// Bandwidth rounded up to the NoC's per-port quantum.
    pub fn bandwidth(&self, frequency_mhz: f64, quantum: BytesPerSec) -> BytesPerSec {
        self.raw_bandwidth(frequency_mhz).round_up_to(quantum)
    }
}

/// A memory-mapped AXI port. When `noc_hint` is `None` the port may use a
/// dedicated memory-side ingress; when set, it carries pre-placed ingress/egress node
/// names and must route from a regular ingress to the bank's memory port and back.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MmapPort {
    pub id: MmapPortId,
    pub name: String,
    pub bank: u32,
    pub read_bw: BytesPerSec,
    pub write_bw: BytesPerSec,
    pub noc_hint: Option<NocHint>,
}

/// Pre-placed ingress/egress names carried by an MMAP port's `noc_hint`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NocHint {
    pub ingress: String,
    pub egress: String,
}

impl MmapPort {
    pub fn new(
        id: MmapPortId,
        name: impl Into<String>,
        bank: u32,
        read_bw: BytesPerSec,
        write_bw: BytesPerSec,
        noc_hint: Option<NocHint>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            bank,
            read_bw,
            write_bw,
            noc_hint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_slot_detection() {
        let s = Stream::new(
            StreamId::new(0),
            "a",
            SlotRange::single(0, 0),
            SlotRange::single(1, 0),
            33,
        );
        assert!(s.is_cross_slot());
        let t = Stream::new(
            StreamId::new(1),
            "b",
            SlotRange::single(0, 0),
            SlotRange::single(0, 0),
            33,
        );
        assert!(!t.is_cross_slot());
    }

    #[test]
    fn bandwidth_rounds_up_to_quantum() {
        let s = Stream::new(
            StreamId::new(0),
            "a",
            SlotRange::single(0, 0),
            SlotRange::single(1, 0),
            33,
        );
        let raw = s.raw_bandwidth(200.0);
        let rounded = s.bandwidth(200.0, BytesPerSec::new(1000));
        assert!(rounded.into_u64() >= raw.into_u64());
        assert_eq!(rounded.into_u64() % 1000, 0);
    }
}
