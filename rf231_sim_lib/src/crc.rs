//! Frame check sequence engine.
//!
//! The transceiver runs a CRC-16/CCITT shift register over bit-reversed octets and
//! sends both result bytes bit-reversed as well, which makes the on-air FCS equal to
//! the little-endian CRC-16/KERMIT of the frame.

pub const POLYNOMIAL: u16 = 0x1021;

pub const fn reverse_bits(byte: u8) -> u8 {
    byte.reverse_bits()
}

/// Feeds one frame octet into the accumulator.
pub fn accumulate(crc: u16, byte: u8) -> u16 {
    let mut crc = crc ^ ((reverse_bits(byte) as u16) << 8);
    for _ in 0..8 {
        crc = if crc & 0x8000 != 0 {
            (crc << 1) ^ POLYNOMIAL
        } else {
            crc << 1
        };
    }
    crc
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crc16(u16);

impl Crc16 {
    pub const fn new() -> Self {
        Self(0)
    }

    pub fn update(&mut self, byte: u8) {
        self.0 = accumulate(self.0, byte);
    }

    pub fn value(&self) -> u16 {
        self.0
    }

    /// The two FCS octets in transmission order.
    pub fn fcs(&self) -> [u8; 2] {
        let [high, low] = self.0.to_be_bytes();
        [reverse_bits(high), reverse_bits(low)]
    }

    pub fn matches(&self, fcs: [u8; 2]) -> bool {
        self.fcs() == fcs
    }
}

pub fn checksum(bytes: &[u8]) -> Crc16 {
    bytes.iter().fold(Crc16::new(), |mut crc, byte| {
        crc.update(*byte);
        crc
    })
}
