//! Byte-cycle model of the AT86RF231 IEEE 802.15.4 transceiver and of the same
//! transceiver integrated into the ATmega128RFA1.
//!
//! A host simulator owns a [`RadioChip`] through one of the MCU interfaces
//! ([`SpiRadio`] or [`MemoryMappedRadio`]), implements [`RadioHost`] for time, the
//! medium and interrupt delivery, and clocks one octet per byte period through
//! [`RadioChip::transmit_byte`] and [`RadioChip::receive_byte`].

pub mod access;
pub mod address_filter;
pub mod chip;
pub mod clock;
pub mod command_fsm;
pub mod config;
pub mod config_protocol;
pub mod error;
pub mod frame_buffer;
pub mod host;
pub mod link_quality;
pub mod receiver;
pub mod transmitter;

pub use access::{memory_mapped::MemoryMappedRadio, spi::SpiRadio, RegisterAccess};
pub use chip::RadioChip;
pub use clock::{Duration, Instant};
pub use config::RadioConfig;
pub use error::{AccessError, BufferError, ConfigError};
pub use host::{PowerMode, RadioHost};
pub use rf231_sim_lib::radio::{Command, OperatingState, RadioEvent, SendAck, Variant};
