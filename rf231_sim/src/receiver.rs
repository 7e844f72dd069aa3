//! Receive framer.
//!
//! Hunts for the preamble/SFD pair, then moves the PHR and PSDU into the frame buffer
//! while the chip runs the address filter and checks the FCS.

use heapless::Vec;
use rf231_sim_lib::{crc::Crc16, radio::RadioEvent};

use crate::address_filter::CHECK_OFFSETS;
use crate::transmitter::SFD;

const PHR_LENGTH_MASK: u8 = 0x7F;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxState {
    SfdScan,
    SfdMatched1,
    SfdMatched2,
    InPacket,
    Crc1,
    Crc2,
    End,
    Overflow,
    Wait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxInput {
    pub byte: u8,
    /// The medium still holds a carrier for this receiver.
    pub lock: bool,
    pub auto_crc: bool,
}

/// Side effects of one step, to be applied by the chip in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxEffect {
    Raise(RadioEvent),
    /// A new frame with this PHR length begins; it is stored at buffer index 0.
    FrameStart(u8),
    Push(u8),
    /// Run the address filter over the buffer up to this offset.
    FilterCheck(usize),
    /// All PSDU bytes are in. `None` when no FCS was checked.
    FrameComplete(Option<bool>),
    /// First byte after a completed frame.
    EndOfFrame { lock: bool },
    /// A rejected frame has passed.
    Discarded,
}

pub const MAX_EFFECTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RxOutput {
    pub byte: u8,
    pub effects: Vec<RxEffect, MAX_EFFECTS>,
}

impl RxOutput {
    fn new(byte: u8) -> Self {
        Self {
            byte,
            effects: Vec::new(),
        }
    }

    fn emit(&mut self, effect: RxEffect) {
        // No step produces more than MAX_EFFECTS
        let _ = self.effects.push(effect);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receiver {
    state: RxState,
    counter: u8,
    length: u8,
    crc: Crc16,
    fcs_first: u8,
}

impl Default for Receiver {
    fn default() -> Self {
        Self {
            state: RxState::SfdScan,
            counter: 0,
            length: 0,
            crc: Crc16::new(),
            fcs_first: 0,
        }
    }
}

impl Receiver {
    pub fn state(&self) -> RxState {
        self.state
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    /// The address filter turned the frame down; drain the rest silently.
    pub fn reject(&mut self) {
        self.state = RxState::Wait;
    }

    /// The frame buffer could not take another byte.
    pub fn overflow(&mut self) {
        self.state = RxState::Overflow;
    }

    pub fn step(mut self, input: RxInput) -> (Self, RxOutput) {
        let b = input.byte;
        let mut output = RxOutput::new(b);

        if self.state == RxState::End {
            self.state = RxState::SfdScan;
            output.emit(RxEffect::EndOfFrame { lock: input.lock });
            return (self, output);
        }

        if !input.lock {
            match self.state {
                RxState::SfdMatched2 | RxState::InPacket | RxState::Crc1 | RxState::Crc2 => {
                    output.emit(RxEffect::Raise(RadioEvent::PllUnlock));
                    self.state = RxState::SfdScan;
                    output.emit(RxEffect::Raise(RadioEvent::RxStart));
                }
                RxState::SfdMatched1 => {
                    self.state = RxState::SfdScan;
                    output.emit(RxEffect::Raise(RadioEvent::RxStart));
                }
                RxState::Wait => {
                    self.state = RxState::SfdScan;
                    output.emit(RxEffect::Discarded);
                }
                _ => {}
            }
            return (self, output);
        }

        match self.state {
            RxState::SfdMatched1 if b == SFD => {
                self.state = RxState::SfdMatched2;
                output.emit(RxEffect::Raise(RadioEvent::RxStart));
            }
            // A failed second SFD byte may itself be the start of a new preamble
            RxState::SfdMatched1 | RxState::SfdScan => {
                self.state = if b == 0 {
                    RxState::SfdMatched1
                } else {
                    RxState::SfdScan
                };
            }
            RxState::SfdMatched2 => {
                let length = b & PHR_LENGTH_MASK;
                let fcs_len = if input.auto_crc { 2 } else { 0 };
                if length == 0 || length < fcs_len {
                    self.state = RxState::SfdScan;
                } else {
                    self.length = length;
                    self.counter = 0;
                    self.crc = Crc16::new();
                    output.emit(RxEffect::FrameStart(length));
                    self.state = if length == fcs_len {
                        RxState::Crc1
                    } else {
                        RxState::InPacket
                    };
                }
            }
            RxState::InPacket => {
                self.counter += 1;
                output.emit(RxEffect::Push(b));
                let offset = usize::from(self.counter);
                if CHECK_OFFSETS.contains(&offset) {
                    output.emit(RxEffect::FilterCheck(offset));
                }

                if input.auto_crc {
                    self.crc.update(b);
                    if self.counter >= self.length.saturating_sub(2) {
                        self.state = RxState::Crc1;
                    }
                } else if self.counter >= self.length {
                    self.state = RxState::End;
                    output.emit(RxEffect::FrameComplete(None));
                }
            }
            RxState::Crc1 => {
                output.emit(RxEffect::Push(b));
                self.fcs_first = b;
                self.state = RxState::Crc2;
            }
            RxState::Crc2 => {
                output.emit(RxEffect::Push(b));
                let crc_ok = self.crc.matches([self.fcs_first, b]);
                self.state = RxState::End;
                output.emit(RxEffect::FrameComplete(Some(crc_ok)));
            }
            RxState::Overflow => {}
            RxState::Wait => {
                self.counter = self.counter.saturating_add(1);
                if self.counter >= self.length {
                    self.state = RxState::SfdScan;
                    output.emit(RxEffect::Discarded);
                }
            }
            RxState::End => {}
        }

        (self, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf231_sim_lib::crc::checksum;

    fn locked(byte: u8) -> RxInput {
        RxInput {
            byte,
            lock: true,
            auto_crc: true,
        }
    }

    fn feed(rx: Receiver, bytes: &[u8]) -> (Receiver, std::vec::Vec<RxEffect>) {
        bytes.iter().fold((rx, std::vec::Vec::new()), |(rx, mut all), byte| {
            let (rx, output) = rx.step(locked(*byte));
            all.extend(output.effects.iter().copied());
            (rx, all)
        })
    }

    #[test]
    fn receives_frame_and_checks_fcs() {
        let psdu = [0x41, 0x88, 0x07];
        let fcs = checksum(&psdu).fcs();
        let wire = [0, 0, 0, 0, SFD, 5, psdu[0], psdu[1], psdu[2], fcs[0], fcs[1]];

        let (rx, effects) = feed(Receiver::default(), &wire);
        assert_eq!(rx.state(), RxState::End);
        assert_eq!(effects[0], RxEffect::Raise(RadioEvent::RxStart));
        assert_eq!(effects[1], RxEffect::FrameStart(5));
        assert_eq!(effects.last(), Some(&RxEffect::FrameComplete(Some(true))));

        let pushed: std::vec::Vec<u8> = effects
            .iter()
            .filter_map(|effect| match effect {
                RxEffect::Push(byte) => Some(*byte),
                _ => None,
            })
            .collect();
        assert_eq!(pushed, [0x41, 0x88, 0x07, fcs[0], fcs[1]]);

        let (rx, output) = rx.step(locked(0));
        assert_eq!(rx.state(), RxState::SfdScan);
        assert_eq!(&output.effects[..], &[RxEffect::EndOfFrame { lock: true }]);
    }

    #[test]
    fn corrupted_fcs_fails() {
        let wire = [0, SFD, 4, 0x01, 0x02, 0xFF, 0xFF];
        let (_, effects) = feed(Receiver::default(), &wire);
        assert_eq!(effects.last(), Some(&RxEffect::FrameComplete(Some(false))));
    }

    #[test]
    fn sfd_mismatch_rescans_same_byte() {
        let (rx, _) = feed(Receiver::default(), &[0, 0x55]);
        assert_eq!(rx.state(), RxState::SfdScan);
        let (rx, _) = feed(Receiver::default(), &[0, 0]);
        assert_eq!(rx.state(), RxState::SfdMatched1);
        let (rx, _) = feed(rx, &[SFD]);
        assert_eq!(rx.state(), RxState::SfdMatched2);
    }

    #[test]
    fn zero_length_frames_are_ignored() {
        let (rx, effects) = feed(Receiver::default(), &[0, SFD, 0x80]);
        assert_eq!(rx.state(), RxState::SfdScan);
        assert!(!effects
            .iter()
            .any(|effect| matches!(effect, RxEffect::FrameStart(_))));
    }

    #[test]
    fn filter_checks_cover_header_only() {
        let mut wire = vec![0, SFD, 20];
        wire.extend(1..=20u8);
        let (_, effects) = feed(Receiver::default(), &wire);
        let offsets: std::vec::Vec<usize> = effects
            .iter()
            .filter_map(|effect| match effect {
                RxEffect::FilterCheck(offset) => Some(*offset),
                _ => None,
            })
            .collect();
        assert_eq!(offsets, CHECK_OFFSETS);
    }

    #[test]
    fn carrier_loss_mid_frame() {
        let (rx, _) = feed(Receiver::default(), &[0, SFD, 10, 0x41]);
        let (rx, output) = rx.step(RxInput {
            byte: 0,
            lock: false,
            auto_crc: true,
        });
        assert_eq!(rx.state(), RxState::SfdScan);
        assert_eq!(
            &output.effects[..],
            &[
                RxEffect::Raise(RadioEvent::PllUnlock),
                RxEffect::Raise(RadioEvent::RxStart)
            ]
        );
    }

    #[test]
    fn rejected_frame_is_drained() {
        let (mut rx, _) = feed(Receiver::default(), &[0, SFD, 6, 0x41]);
        rx.reject();
        let (rx, effects) = feed(rx, &[1, 2, 3, 4]);
        assert_eq!(rx.state(), RxState::Wait);
        assert!(effects.is_empty());
        let (rx, effects) = feed(rx, &[5]);
        assert_eq!(rx.state(), RxState::SfdScan);
        assert_eq!(effects, [RxEffect::Discarded]);
    }

    #[test]
    fn carrier_loss_while_draining() {
        let (mut rx, _) = feed(Receiver::default(), &[0, SFD, 20, 0x41]);
        rx.reject();
        let (rx, output) = rx.step(RxInput {
            byte: 0,
            lock: false,
            auto_crc: true,
        });
        assert_eq!(rx.state(), RxState::SfdScan);
        assert_eq!(&output.effects[..], &[RxEffect::Discarded]);

        // The next frame is picked up from its preamble
        let (rx, effects) = feed(rx, &[0, SFD, 5]);
        assert_eq!(rx.state(), RxState::InPacket);
        assert_eq!(
            effects,
            [
                RxEffect::Raise(RadioEvent::RxStart),
                RxEffect::FrameStart(5)
            ]
        );
    }

    #[test]
    fn overflow_freezes() {
        let mut rx = Receiver::default();
        rx.overflow();
        let (rx, effects) = feed(rx, &[0, SFD, 5, 1, 2]);
        assert_eq!(rx.state(), RxState::Overflow);
        assert!(effects.is_empty());
    }

    #[test]
    fn frame_without_fcs() {
        let mut rx = Receiver::default();
        let mut last = RxOutput::default();
        for byte in [0, SFD, 2, 0xAB, 0xCD] {
            let (next, output) = rx.step(RxInput {
                byte,
                lock: true,
                auto_crc: false,
            });
            rx = next;
            last = output;
        }
        assert_eq!(rx.state(), RxState::End);
        assert_eq!(last.effects.last(), Some(&RxEffect::FrameComplete(None)));
    }
}
