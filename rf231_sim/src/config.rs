use serde::{Deserialize, Serialize};

use rf231_sim_lib::radio::Variant;

use crate::error::ConfigError;

/// Per-mote transceiver configuration supplied by the host simulator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RadioConfig {
    pub variant: Variant,
    /// Loaded into IEEE_ADDR_0..7 on every reset, IEEE_ADDR_0 first.
    pub ieee_address: [u8; 8],
    /// Vector posted for every interrupt of the SPI attached chip. The ATmega128RFA1
    /// uses its fixed per-source vectors instead.
    pub irq_vector: Option<u8>,
    /// Seed of the LQI sampler.
    pub correlation_seed: u64,
}

impl RadioConfig {
    pub fn spi(irq_vector: u8) -> Self {
        Self {
            variant: Variant::At86rf231,
            irq_vector: Some(irq_vector),
            ..Self::default()
        }
    }

    pub fn memory_mapped() -> Self {
        Self {
            variant: Variant::Atmega128rfa1,
            ..Self::default()
        }
    }

    pub fn with_ieee_address(mut self, ieee_address: [u8; 8]) -> Self {
        self.ieee_address = ieee_address;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.correlation_seed = seed;
        self
    }

    pub fn to_slice<'a>(&self, buffer: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buffer).map_err(ConfigError::Encode)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(ConfigError::Decode)
    }
}
