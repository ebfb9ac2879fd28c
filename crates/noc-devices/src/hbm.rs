//! HBM bank address assignment.

use rustc_hash::FxHashMap;

const START_ADDR: u64 = 0x4000000000;
const BANK_INCR: u64 = 0x40000000;
const SHARING_INCR: u64 = 0x20000000;
const NUM_BANKS: usize = 32;

/// Assigns each memory port a starting address within its HBM bank. Up to two ports may
/// share a bank, in which case each gets half of the bank's address range.
///
/// `ports` maps a port name to its bank index (`< 32`). Returns a `44'h...`-formatted
/// Verilog-literal address string per port.
pub fn bank_to_addr(ports: &[(String, u32)]) -> FxHashMap<String, String> {
    let mut bank_cnt = [0u64; NUM_BANKS];
    let mut addr = FxHashMap::default();
    for (port, bank) in ports {
        let bank = *bank as usize % NUM_BANKS;
        let addr_p = START_ADDR + (bank as u64) * BANK_INCR + bank_cnt[bank] * SHARING_INCR;
        bank_cnt[bank] += 1;
        addr.insert(port.clone(), format!("44'h{addr_p:011x}"));
    }
    addr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_port_gets_the_banks_base_address() {
        let addr = bank_to_addr(&[("mmap0".to_string(), 0)]);
        assert_eq!(addr["mmap0"], format!("44'h{START_ADDR:011x}"));
    }

    #[test]
    fn two_ports_sharing_a_bank_split_the_range() {
        let addr = bank_to_addr(&[("mmap0".to_string(), 2), ("mmap1".to_string(), 2)]);
        let base = START_ADDR + 2 * BANK_INCR;
        assert_eq!(addr["mmap0"], format!("44'h{base:011x}"));
        assert_eq!(addr["mmap1"], format!("44'h{:011x}", base + SHARING_INCR));
    }
}
