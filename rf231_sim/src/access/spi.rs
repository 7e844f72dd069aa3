use rand_core::RngCore;
use rand_wyrand::WyRand;

use super::RegisterAccess;
use crate::chip::RadioChip;
use crate::config_protocol::{command_byte, ConfigProtocol};
use crate::host::RadioHost;

/// AT86RF231 behind its SPI port and control pins.
///
/// Pin levels are electrical: CS and RSTN are active low.
pub struct SpiRadio<H, R = WyRand> {
    chip: RadioChip<H, R>,
    protocol: ConfigProtocol,
    cs: bool,
    rstn: bool,
    slp_tr: bool,
}

impl<H: RadioHost, R: RngCore> SpiRadio<H, R> {
    pub fn new(chip: RadioChip<H, R>) -> Self {
        Self {
            chip,
            protocol: ConfigProtocol::new(),
            cs: true,
            rstn: true,
            slp_tr: false,
        }
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

    pub fn set_cs(&mut self, level: bool) {
        if self.cs != level {
            self.cs = level;
            self.protocol.restart();
        }
    }

    pub fn set_rstn(&mut self, level: bool) {
        if self.rstn != level {
            self.rstn = level;
            if !level {
                self.chip.reset();
            }
        }
    }

    pub fn set_slp_tr(&mut self, level: bool) {
        if self.slp_tr != level {
            self.slp_tr = level;
            self.chip.sleep_pin_changed(level);
        }
    }

    /// One SPI byte frame. MISO is 0 unless the chip is selected and out of reset.
    pub fn exchange(&mut self, mosi: u8) -> u8 {
        if self.cs || !self.rstn {
            return 0;
        }
        self.protocol.exchange(&mut self.chip, mosi)
    }

    /// Full transaction: selects the chip, exchanges `bytes` in place and deselects it.
    pub fn transfer(&mut self, bytes: &mut [u8]) {
        self.set_cs(false);
        for byte in bytes.iter_mut() {
            *byte = self.exchange(*byte);
        }
        self.set_cs(true);
    }
}

impl<H: RadioHost, R: RngCore> RegisterAccess for SpiRadio<H, R> {
    fn read_register(&mut self, address: u8) -> u8 {
        let mut frame = [command_byte::register_read(address), 0];
        self.transfer(&mut frame);
        frame[1]
    }

    fn write_register(&mut self, address: u8, value: u8) {
        let mut frame = [command_byte::register_write(address), value];
        self.transfer(&mut frame);
    }

    fn read_frame_buffer(&mut self, index: u8) -> u8 {
        let mut frame = [command_byte::SRAM_READ, index, 0];
        self.transfer(&mut frame);
        frame[2]
    }

    fn write_frame_buffer(&mut self, index: u8, value: u8) {
        let mut frame = [command_byte::SRAM_WRITE, index, value];
        self.transfer(&mut frame);
    }

    fn set_sleep(&mut self, level: bool) {
        self.set_slp_tr(level);
    }

    fn set_reset(&mut self, asserted: bool) {
        self.set_rstn(!asserted);
    }

    /// Streams the image through a single frame buffer write.
    fn upload_frame(&mut self, image: &[u8]) {
        self.set_cs(false);
        self.exchange(command_byte::FRAME_BUFFER_WRITE);
        for byte in image {
            self.exchange(*byte);
        }
        self.set_cs(true);
    }
}
