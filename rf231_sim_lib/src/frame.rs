//! IEEE 802.15.4 MAC header helpers.

use heapless::Vec;

/// Largest PSDU, FCS included.
pub const MAX_PSDU_LEN: usize = 127;
pub const FCS_LEN: usize = 2;
/// PHR length byte followed by the largest PSDU.
pub const MAX_FRAME_IMAGE_LEN: usize = MAX_PSDU_LEN + 1;

pub const SHORT_BROADCAST: [u8; 2] = [0xFF, 0xFF];
pub const LONG_BROADCAST: [u8; 8] = [0xFF; 8];

pub mod fcf {
    // Low octet
    pub const FRAME_TYPE_MASK: u8 = 0x07;
    pub const RESERVED_TYPE: u8 = 1 << 2;
    pub const SECURITY_ENABLED: u8 = 1 << 3;
    pub const FRAME_PENDING: u8 = 1 << 4;
    pub const ACK_REQUEST: u8 = 1 << 5;
    pub const PAN_ID_COMPRESSION: u8 = 1 << 6;

    // High octet
    pub const DEST_MODE_OFFSET: u8 = 2;
    pub const SRC_MODE_OFFSET: u8 = 6;
    pub const MODE_MASK: u8 = 0x03;
    /// Set in an addressing mode when a PAN identifier precedes the address.
    pub const MODE_HAS_PAN: u8 = 0x02;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Beacon,
    Data,
    Ack,
    Command,
    Reserved(u8),
}

impl From<u8> for FrameType {
    fn from(value: u8) -> Self {
        match value & fcf::FRAME_TYPE_MASK {
            0 => FrameType::Beacon,
            1 => FrameType::Data,
            2 => FrameType::Ack,
            3 => FrameType::Command,
            other => FrameType::Reserved(other),
        }
    }
}

impl FrameType {
    pub const fn bits(self) -> u8 {
        match self {
            FrameType::Beacon => 0,
            FrameType::Data => 1,
            FrameType::Ack => 2,
            FrameType::Command => 3,
            FrameType::Reserved(value) => value & fcf::FRAME_TYPE_MASK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    None,
    Reserved,
    Short,
    Long,
}

impl From<u8> for AddressingMode {
    fn from(value: u8) -> Self {
        match value & fcf::MODE_MASK {
            0 => AddressingMode::None,
            1 => AddressingMode::Reserved,
            2 => AddressingMode::Short,
            _ => AddressingMode::Long,
        }
    }
}

/// The two frame control octets as they appear on air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameControl {
    pub low: u8,
    pub high: u8,
}

impl FrameControl {
    pub const fn new(low: u8, high: u8) -> Self {
        Self { low, high }
    }

    pub fn frame_type(&self) -> FrameType {
        FrameType::from(self.low)
    }

    /// Frame types 4 to 7 are flagged by bit 2 of the type field.
    pub fn is_reserved(&self) -> bool {
        self.low & fcf::RESERVED_TYPE != 0
    }

    pub fn ack_request(&self) -> bool {
        self.low & fcf::ACK_REQUEST != 0
    }

    pub fn frame_pending(&self) -> bool {
        self.low & fcf::FRAME_PENDING != 0
    }

    pub fn dest_mode(&self) -> AddressingMode {
        AddressingMode::from(self.high >> fcf::DEST_MODE_OFFSET)
    }

    pub fn src_mode(&self) -> AddressingMode {
        AddressingMode::from(self.high >> fcf::SRC_MODE_OFFSET)
    }

    pub fn dest_pan_present(&self) -> bool {
        (self.high >> fcf::DEST_MODE_OFFSET) & fcf::MODE_HAS_PAN != 0
    }

    pub fn src_pan_present(&self) -> bool {
        (self.high >> fcf::SRC_MODE_OFFSET) & fcf::MODE_HAS_PAN != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    None,
    Short(u16),
    Long(u64),
}

impl Address {
    fn mode_bits(&self) -> u8 {
        match self {
            Address::None => 0,
            Address::Short(_) => 2,
            Address::Long(_) => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    TooLong,
}

/// MAC header of an outgoing frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub frame_type: FrameType,
    pub frame_pending: bool,
    pub ack_request: bool,
    pub sequence: u8,
    pub dest_pan: u16,
    pub dest: Address,
    /// `None` compresses the source PAN into the destination PAN.
    pub src_pan: Option<u16>,
    pub src: Address,
}

impl Header {
    pub fn data(sequence: u8, dest_pan: u16, dest: Address, src: Address) -> Self {
        Self {
            frame_type: FrameType::Data,
            frame_pending: false,
            ack_request: false,
            sequence,
            dest_pan,
            dest,
            src_pan: None,
            src,
        }
    }

    pub fn with_ack_request(mut self, ack_request: bool) -> Self {
        self.ack_request = ack_request;
        self
    }

    pub fn frame_control(&self) -> FrameControl {
        let mut low = self.frame_type.bits();
        if self.frame_pending {
            low |= fcf::FRAME_PENDING;
        }
        if self.ack_request {
            low |= fcf::ACK_REQUEST;
        }
        let compressed = self.src_pan.is_none()
            && self.dest != Address::None
            && self.src != Address::None;
        if compressed {
            low |= fcf::PAN_ID_COMPRESSION;
        }

        let high = (self.dest.mode_bits() << fcf::DEST_MODE_OFFSET)
            | (self.src.mode_bits() << fcf::SRC_MODE_OFFSET);

        FrameControl::new(low, high)
    }

    /// Frame buffer image for upload: PHR length byte, MAC header and payload.
    ///
    /// The length accounts for the FCS appended by the transmitter.
    pub fn frame_image(&self, payload: &[u8]) -> Result<Vec<u8, MAX_FRAME_IMAGE_LEN>, Error> {
        let mut image = Vec::new();
        image.push(0).map_err(|_| Error::TooLong)?;

        let fc = self.frame_control();
        push_all(&mut image, &[fc.low, fc.high, self.sequence])?;

        if self.dest != Address::None {
            push_all(&mut image, &self.dest_pan.to_le_bytes())?;
            push_address(&mut image, self.dest)?;
        }
        if self.src != Address::None {
            let src_pan = match (self.src_pan, self.dest) {
                (Some(pan), _) => Some(pan),
                (None, Address::None) => Some(self.dest_pan),
                (None, _) => None,
            };
            if let Some(pan) = src_pan {
                push_all(&mut image, &pan.to_le_bytes())?;
            }
            push_address(&mut image, self.src)?;
        }
        push_all(&mut image, payload)?;

        let psdu_len = image.len() - 1 + FCS_LEN;
        if psdu_len > MAX_PSDU_LEN {
            return Err(Error::TooLong);
        }
        image[0] = psdu_len as u8;

        Ok(image)
    }
}

fn push_all(image: &mut Vec<u8, MAX_FRAME_IMAGE_LEN>, bytes: &[u8]) -> Result<(), Error> {
    image.extend_from_slice(bytes).map_err(|_| Error::TooLong)
}

fn push_address(image: &mut Vec<u8, MAX_FRAME_IMAGE_LEN>, address: Address) -> Result<(), Error> {
    match address {
        Address::None => Ok(()),
        Address::Short(short) => push_all(image, &short.to_le_bytes()),
        Address::Long(long) => push_all(image, &long.to_le_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_frame_control() {
        // Data frame, ack request, PAN compression, short destination and source
        let fc = FrameControl::new(0x61, 0x88);
        assert_eq!(fc.frame_type(), FrameType::Data);
        assert!(fc.ack_request());
        assert!(!fc.frame_pending());
        assert!(!fc.is_reserved());
        assert_eq!(fc.dest_mode(), AddressingMode::Short);
        assert_eq!(fc.src_mode(), AddressingMode::Short);
        assert!(fc.dest_pan_present());
        assert!(fc.src_pan_present());

        let beacon = FrameControl::new(0x00, 0x80);
        assert_eq!(beacon.frame_type(), FrameType::Beacon);
        assert_eq!(beacon.dest_mode(), AddressingMode::None);
        assert!(!beacon.dest_pan_present());
        assert!(beacon.src_pan_present());

        assert!(FrameControl::new(0x05, 0x00).is_reserved());
    }

    #[test]
    fn short_addressed_image() {
        let header = Header::data(0x2A, 0xABCD, Address::Short(0x0001), Address::Short(0x0002))
            .with_ack_request(true);
        let image = header.frame_image(&[0xDE, 0xAD]).unwrap();
        assert_eq!(
            &image[..],
            &[
                13, // 3 + 2 + 2 + 2 + 2 payload + 2 FCS
                0x61, 0x88, 0x2A, 0xCD, 0xAB, 0x01, 0x00, 0x02, 0x00, 0xDE, 0xAD
            ]
        );
    }

    #[test]
    fn long_addressed_image_places_address_after_pan() {
        let header = Header::data(
            7,
            0x0022,
            Address::Long(0x0807_0605_0403_0201),
            Address::None,
        );
        let image = header.frame_image(&[]).unwrap();
        assert_eq!(image[0] as usize, image.len() - 1 + FCS_LEN);
        assert_eq!(image[2], 0x0C);
        assert_eq!(&image[4..6], &[0x22, 0x00]);
        assert_eq!(&image[6..14], &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn rejects_oversized_payload() {
        let header = Header::data(0, 0xFFFF, Address::Short(0xFFFF), Address::None);
        assert_eq!(header.frame_image(&[0u8; 120]), Err(Error::TooLong));
        assert!(header.frame_image(&[0u8; 118]).is_ok());
    }
}
