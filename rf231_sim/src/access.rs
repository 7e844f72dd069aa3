//! MCU side register interfaces.
//!
//! The AT86RF231 is reached over SPI, the ATmega128RFA1 maps the same transceiver
//! into its data space. Both are driven through [`RegisterAccess`].

pub mod memory_mapped;
pub mod spi;

use rf231_sim_lib::radio::Command;

use crate::chip::registers;

pub trait RegisterAccess {
    fn read_register(&mut self, address: u8) -> u8;

    fn write_register(&mut self, address: u8, value: u8);

    /// Frame buffer byte at `index`, index 0 being the PHR.
    fn read_frame_buffer(&mut self, index: u8) -> u8;

    fn write_frame_buffer(&mut self, index: u8, value: u8);

    /// Drives SLP_TR.
    fn set_sleep(&mut self, level: bool);

    /// Holds the transceiver in reset while `asserted`.
    fn set_reset(&mut self, asserted: bool);

    fn reset(&mut self) {
        self.set_reset(true);
        self.set_reset(false);
    }

    fn modify_register<U>(&mut self, address: u8, closure: U)
    where
        Self: Sized,
        U: Fn(u8) -> u8,
    {
        let value = closure(self.read_register(address));
        self.write_register(address, value);
    }

    fn command(&mut self, command: Command) {
        self.write_register(registers::trx_state::ADDR, command.bits());
    }

    /// Loads a frame image starting with its PHR.
    fn upload_frame(&mut self, image: &[u8]) {
        for (index, byte) in image.iter().enumerate() {
            self.write_frame_buffer(index as u8, *byte);
        }
    }

    /// Copies the received PHR, PSDU and LQI into `out`. Returns the number of bytes
    /// copied.
    fn download_frame(&mut self, out: &mut [u8]) -> usize {
        let length = usize::from(self.read_frame_buffer(0) & 0x7F);
        let count = (length + 1).min(out.len());
        for (index, byte) in out.iter_mut().take(count).enumerate() {
            *byte = self.read_frame_buffer(index as u8);
        }
        count
    }
}
