use heapless::Vec;

use crate::error::BufferError;

pub const FRAME_BUFFER_SIZE: usize = 128;

/// The transceiver's single 128 byte frame buffer.
///
/// Frames stream in and out through the FIFO end while the register interfaces and
/// the receiver may address any byte directly. Index 0 holds the PHR length byte.
#[derive(Debug, Default, Clone)]
pub struct FrameBuffer {
    data: Vec<u8, FRAME_BUFFER_SIZE>,
    read_pos: usize,
    /// The content was stored by the receiver rather than loaded by the MCU.
    received: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.read_pos = 0;
        self.received = false;
    }

    /// Empties the buffer for a frame coming off the air.
    pub fn start_received(&mut self) {
        self.clear();
        self.received = true;
    }

    pub fn holds_received_frame(&self) -> bool {
        self.received
    }

    /// MCU write at `index`. The buffer no longer holds a received frame.
    pub fn upload(&mut self, index: usize, byte: u8) -> Result<(), BufferError> {
        self.received = false;
        self.poke(index, byte)
    }

    /// Bytes written so far, including those already read out.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes not yet consumed through [`FrameBuffer::pop`].
    pub fn remaining(&self) -> usize {
        self.data.len() - self.read_pos
    }

    pub fn push(&mut self, byte: u8) -> Result<(), BufferError> {
        self.data.push(byte).map_err(|_| BufferError::Overflow)
    }

    /// Next byte [`FrameBuffer::pop`] would return.
    pub fn front(&self) -> Option<u8> {
        self.data.get(self.read_pos).copied()
    }

    pub fn pop(&mut self) -> Option<u8> {
        let byte = self.front()?;
        self.read_pos += 1;
        Some(byte)
    }

    /// Byte at `index`, unwritten bytes read as zero.
    pub fn peek(&self, index: usize) -> Result<u8, BufferError> {
        if index >= FRAME_BUFFER_SIZE {
            return Err(BufferError::OutOfRange(index));
        }
        Ok(self.data.get(index).copied().unwrap_or(0))
    }

    /// Overwrites the byte at `index`, zero filling any gap before it.
    pub fn poke(&mut self, index: usize, byte: u8) -> Result<(), BufferError> {
        if index >= FRAME_BUFFER_SIZE {
            return Err(BufferError::OutOfRange(index));
        }
        if index >= self.data.len() {
            self.data
                .resize(index + 1, 0)
                .map_err(|_| BufferError::OutOfRange(index))?;
        }
        self.data[index] = byte;
        Ok(())
    }
}
