//! Byte protocol of the AT86RF231 SPI port.
//!
//! Every CS assertion starts a new transaction. The first byte selects the access
//! mode and returns 0; the following bytes carry data in both directions.

use rand_core::RngCore;

use crate::chip::RadioChip;
use crate::host::RadioHost;

pub mod command_byte {
    pub const REGISTER: u8 = 1 << 7;
    pub const WRITE: u8 = 1 << 6;
    pub const FRAME_BUFFER: u8 = 1 << 5;
    pub const REGISTER_ADDR_MASK: u8 = 0x3F;
    pub const SRAM_ADDR_MASK: u8 = 0x7F;

    pub const fn register_read(address: u8) -> u8 {
        REGISTER | (address & REGISTER_ADDR_MASK)
    }

    pub const fn register_write(address: u8) -> u8 {
        REGISTER | WRITE | (address & REGISTER_ADDR_MASK)
    }

    pub const FRAME_BUFFER_READ: u8 = FRAME_BUFFER;
    pub const FRAME_BUFFER_WRITE: u8 = FRAME_BUFFER | WRITE;
    pub const SRAM_READ: u8 = 0;
    pub const SRAM_WRITE: u8 = WRITE;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadRegister(u8),
    WriteRegister(u8),
    ReadFrameBuffer,
    WriteFrameBuffer,
    ReadSram,
    WriteSram,
}

impl From<u8> for Access {
    fn from(byte: u8) -> Self {
        let write = byte & command_byte::WRITE != 0;
        if byte & command_byte::REGISTER != 0 {
            let address = byte & command_byte::REGISTER_ADDR_MASK;
            if write {
                Access::WriteRegister(address)
            } else {
                Access::ReadRegister(address)
            }
        } else if byte & command_byte::FRAME_BUFFER != 0 {
            if write {
                Access::WriteFrameBuffer
            } else {
                Access::ReadFrameBuffer
            }
        } else if write {
            Access::WriteSram
        } else {
            Access::ReadSram
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfigProtocol {
    byte_count: usize,
    access: Option<Access>,
    sram_address: u8,
}

impl ConfigProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called on every CS edge.
    pub fn restart(&mut self) {
        self.byte_count = 0;
        self.access = None;
    }

    pub fn access(&self) -> Option<Access> {
        self.access
    }

    /// Shifts one byte in and returns the byte shifted out in the same frame.
    pub fn exchange<H: RadioHost, R: RngCore>(
        &mut self,
        chip: &mut RadioChip<H, R>,
        mosi: u8,
    ) -> u8 {
        self.byte_count = self.byte_count.saturating_add(1);

        if self.byte_count == 1 {
            let access = Access::from(mosi);
            log::trace!("Rf231 - SPI {:?}", access);
            self.access = Some(access);
            return 0;
        }

        let access = match self.access {
            Some(access) => access,
            None => return 0,
        };

        match (access, self.byte_count) {
            (Access::ReadRegister(address), 2) => chip.read_register(address),
            (Access::WriteRegister(address), 2) => {
                chip.write_register(address, mosi);
                0
            }
            // A register access is a single data byte
            (Access::ReadRegister(_) | Access::WriteRegister(_), _) => 0,
            (Access::ReadFrameBuffer, _) => chip.frame_buffer_mut().pop().unwrap_or(0),
            (Access::WriteFrameBuffer, _) => {
                if let Err(err) = chip.frame_buffer_mut().push(mosi) {
                    log::warn!("Rf231 - SPI frame buffer write dropped: {}", err);
                }
                0
            }
            (Access::ReadSram | Access::WriteSram, 2) => {
                self.sram_address = mosi & command_byte::SRAM_ADDR_MASK;
                0
            }
            (Access::ReadSram, _) => {
                let value = chip
                    .frame_buffer()
                    .peek(usize::from(self.sram_address))
                    .unwrap_or(0);
                self.next_sram_address();
                value
            }
            (Access::WriteSram, _) => {
                if let Err(err) = chip
                    .frame_buffer_mut()
                    .upload(usize::from(self.sram_address), mosi)
                {
                    log::warn!("Rf231 - SPI SRAM write dropped: {}", err);
                }
                self.next_sram_address();
                0
            }
        }
    }

    fn next_sram_address(&mut self) {
        self.sram_address = self.sram_address.wrapping_add(1) & command_byte::SRAM_ADDR_MASK;
    }
}
