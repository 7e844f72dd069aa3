use rand_core::RngCore;
use rand_wyrand::WyRand;

use super::RegisterAccess;
use crate::chip::{registers, RadioChip};
use crate::error::AccessError;
use crate::host::RadioHost;

/// First transceiver register in the data space.
pub const TRANSCEIVER_BASE: u16 = 0x140;
pub const TRANSCEIVER_END: u16 = TRANSCEIVER_BASE + registers::NUM_REGISTERS as u16 - 1;
/// Frame buffer window. A frame loaded for transmission starts with its PHR at
/// TRXFBST, a received frame starts with its first PSDU octet and keeps the length
/// in TST_RX_LENGTH.
pub const TRXFBST: u16 = 0x180;
pub const TRXFBEND: u16 = 0x1FF;

pub mod trxpr {
    pub const ADDR: u16 = 0x139;
    pub const TRXRST: u8 = 1 << 0;
    pub const SLPTR: u8 = 1 << 1;
}

/// Transceiver of the ATmega128RFA1, seen through the MCU data space.
pub struct MemoryMappedRadio<H, R = WyRand> {
    chip: RadioChip<H, R>,
    trxpr: u8,
}

impl<H: RadioHost, R: RngCore> MemoryMappedRadio<H, R> {
    pub fn new(chip: RadioChip<H, R>) -> Self {
        Self { chip, trxpr: 0 }
    }

    pub fn chip(&self) -> &RadioChip<H, R> {
        &self.chip
    }

    pub fn chip_mut(&mut self) -> &mut RadioChip<H, R> {
        &mut self.chip
    }

    pub fn into_chip(self) -> RadioChip<H, R> {
        self.chip
    }

    pub fn read(&mut self, address: u16) -> Result<u8, AccessError> {
        match address {
            trxpr::ADDR => Ok(self.trxpr),
            TRANSCEIVER_BASE..=TRANSCEIVER_END => {
                Ok(self.chip.read_register((address - TRANSCEIVER_BASE) as u8))
            }
            TRXFBST..=TRXFBEND => {
                let buffer = self.chip.frame_buffer();
                let mut index = usize::from(address - TRXFBST);
                if buffer.holds_received_frame() {
                    index += 1;
                }
                // The last byte of a received frame window lies past the buffer
                Ok(buffer.peek(index).unwrap_or(0))
            }
            _ => Err(AccessError::Unmapped(address)),
        }
    }

    pub fn write(&mut self, address: u16, value: u8) -> Result<(), AccessError> {
        match address {
            trxpr::ADDR => {
                self.write_trxpr(value);
                Ok(())
            }
            TRANSCEIVER_BASE..=TRANSCEIVER_END => {
                self.chip
                    .write_register((address - TRANSCEIVER_BASE) as u8, value);
                Ok(())
            }
            TRXFBST..=TRXFBEND => self
                .chip
                .frame_buffer_mut()
                .upload(usize::from(address - TRXFBST), value)
                .map_err(|_| AccessError::Unmapped(address)),
            _ => Err(AccessError::Unmapped(address)),
        }
    }

    fn write_trxpr(&mut self, value: u8) {
        let previous = self.trxpr;
        // TRXRST always reads back as zero
        self.trxpr = value & trxpr::SLPTR;

        if value & trxpr::TRXRST != 0 {
            self.chip.reset();
        }
        if (previous ^ value) & trxpr::SLPTR != 0 {
            self.chip.sleep_pin_changed(value & trxpr::SLPTR != 0);
        }
    }
}

impl<H: RadioHost, R: RngCore> RegisterAccess for MemoryMappedRadio<H, R> {
    fn read_register(&mut self, address: u8) -> u8 {
        let address = TRANSCEIVER_BASE + u16::from(address & registers::ADDR_MASK);
        self.read(address).unwrap_or_default()
    }

    fn write_register(&mut self, address: u8, value: u8) {
        let address = TRANSCEIVER_BASE + u16::from(address & registers::ADDR_MASK);
        if let Err(err) = self.write(address, value) {
            log::warn!("Rf231 - {}", err);
        }
    }

    fn read_frame_buffer(&mut self, index: u8) -> u8 {
        let index = index & 0x7F;
        if self.chip.frame_buffer().holds_received_frame() {
            return match index.checked_sub(1) {
                Some(offset) => self.read(TRXFBST + u16::from(offset)).unwrap_or_default(),
                None => self.read_register(registers::tst_rx_length::ADDR),
            };
        }
        self.read(TRXFBST + u16::from(index)).unwrap_or_default()
    }

    fn write_frame_buffer(&mut self, index: u8, value: u8) {
        if let Err(err) = self.write(TRXFBST + u16::from(index & 0x7F), value) {
            log::warn!("Rf231 - {}", err);
        }
    }

    fn set_sleep(&mut self, level: bool) {
        let value = if level {
            self.trxpr | trxpr::SLPTR
        } else {
            self.trxpr & !trxpr::SLPTR
        };
        self.write_trxpr(value);
    }

    /// TRXRST is a strobe, releasing it has no effect.
    fn set_reset(&mut self, asserted: bool) {
        if asserted {
            self.write_trxpr(self.trxpr | trxpr::TRXRST);
        }
    }
}
