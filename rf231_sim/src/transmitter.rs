//! Transmit framer.
//!
//! Produces one on-air octet per call: four preamble zeros, the SFD, the PHR and the
//! PSDU, with the FCS generated on the fly when TX_AUTO_CRC_ON is set.

use rf231_sim_lib::{crc::Crc16, radio::SendAck};

pub const PREAMBLE_LEN: u8 = 4;
/// Start of frame delimiter put on air, independent of the SFD_VALUE register.
pub const SFD: u8 = 0x7A;
pub const ACK_FRAME_LEN: u8 = 5;

const ACK_FCF_LOW: u8 = 0x02;
const ACK_FCF_LOW_PENDING: u8 = 0x12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Preamble,
    Sfd,
    Length,
    InPacket,
    Crc1,
    Crc2,
    End,
}

/// What the framer needs from the chip for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxInput {
    pub send_ack: SendAck,
    pub dsn: u8,
    pub auto_crc: bool,
    /// Next unread frame buffer byte, if any.
    pub next: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxOutput {
    pub byte: u8,
    /// `next` was taken out of the frame buffer.
    pub consumed: bool,
    /// The sequence number of the pending ACK went out; the chip clears SendAck.
    pub ack_sent: bool,
    /// The frame buffer ran dry and a zero was sent instead.
    pub underrun: bool,
    /// Last octet of the frame; the chip runs the end of transmission.
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transmitter {
    state: TxState,
    counter: u8,
    length: u8,
    payload: u8,
    crc: Crc16,
    was_ack: bool,
}

impl Default for Transmitter {
    fn default() -> Self {
        Self {
            state: TxState::Preamble,
            counter: 0,
            length: 0,
            payload: 0,
            crc: Crc16::new(),
            was_ack: false,
        }
    }
}

impl Transmitter {
    pub fn state(&self) -> TxState {
        self.state
    }

    pub fn was_ack(&self) -> bool {
        self.was_ack
    }

    pub fn step(mut self, input: TxInput) -> (Self, TxOutput) {
        let mut output = TxOutput::default();

        match self.state {
            TxState::End => return (self, output),
            TxState::Preamble => {
                self.counter += 1;
                if self.counter >= PREAMBLE_LEN {
                    self.state = TxState::Sfd;
                }
            }
            TxState::Sfd => {
                output.byte = SFD;
                self.state = TxState::Length;
            }
            TxState::Length => {
                if input.send_ack != SendAck::None {
                    self.was_ack = true;
                    self.length = ACK_FRAME_LEN;
                } else {
                    self.was_ack = false;
                    self.length = match input.next {
                        Some(length) => {
                            output.consumed = true;
                            length
                        }
                        None => {
                            output.underrun = true;
                            0
                        }
                    };
                }
                self.counter = 0;
                self.crc = Crc16::new();
                self.payload = if input.auto_crc {
                    self.length.saturating_sub(2)
                } else {
                    self.length
                };
                self.state = match (self.payload, input.auto_crc) {
                    (0, true) => TxState::Crc1,
                    (0, false) => TxState::End,
                    _ => TxState::InPacket,
                };
                output.byte = self.length;
            }
            TxState::InPacket => {
                let byte = if self.was_ack {
                    self.ack_byte(&input, &mut output)
                } else {
                    match input.next {
                        Some(byte) => {
                            output.consumed = true;
                            byte
                        }
                        None => {
                            output.underrun = true;
                            0
                        }
                    }
                };
                output.byte = byte;
                self.counter += 1;

                if input.auto_crc {
                    self.crc.update(output.byte);
                    if self.counter >= self.payload {
                        self.state = TxState::Crc1;
                    }
                } else if self.counter >= self.length {
                    self.state = TxState::End;
                }
            }
            TxState::Crc1 => {
                output.byte = self.crc.fcs()[0];
                self.state = TxState::Crc2;
            }
            TxState::Crc2 => {
                output.byte = self.crc.fcs()[1];
                self.state = TxState::End;
            }
        }

        output.finished = self.state == TxState::End;
        (self, output)
    }

    fn ack_byte(&self, input: &TxInput, output: &mut TxOutput) -> u8 {
        match self.counter {
            0 if input.send_ack == SendAck::Pend => ACK_FCF_LOW_PENDING,
            0 => ACK_FCF_LOW,
            2 => {
                output.ack_sent = true;
                input.dsn
            }
            _ => 0,
        }
    }
}
