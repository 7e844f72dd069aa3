#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("frame buffer is full")]
    Overflow,
    #[error("frame buffer index {0} is out of range")]
    OutOfRange(usize),
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    #[error("data address {0:#06x} is not mapped to the transceiver")]
    Unmapped(u16),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not encode radio configuration: {0:?}")]
    Encode(postcard::Error),
    #[error("could not decode radio configuration: {0:?}")]
    Decode(postcard::Error),
}
