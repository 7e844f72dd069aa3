//! Glue between the pure framers and the chip state.

use rand_core::RngCore;

use rf231_sim_lib::frame::{FrameControl, FrameType};
use rf231_sim_lib::radio::{OperatingState, RadioEvent, SendAck};

use super::{registers, RadioChip};
use crate::address_filter::{self, ADDRESS_MATCH_OFFSET};
use crate::clock::Duration;
use crate::host::{PowerMode, RadioHost};
use crate::receiver::{Receiver, RxEffect, RxInput};
use crate::transmitter::{Transmitter, TxInput};

const LQI_MASK: u8 = 0x7F;
const LQI_CRC_OK: u8 = 0x80;
/// PHY_RSSI becomes valid 8 symbol periods after the receiver is enabled.
const RSSI_VALID_DELAY: Duration = Duration::from_us(128);

impl<H: RadioHost, R: RngCore> RadioChip<H, R> {
    pub(super) fn start_transmitter(&mut self) {
        if self.transmitter.is_some() {
            return;
        }
        // An automatic ACK leaves the received frame readable
        if self.send_ack == SendAck::None {
            self.buffer.clear();
        }
        self.transmitter = Some(Transmitter::default());

        let level = registers::phy_tx_pwr::TX_PWR_MASK - self.tx_power_setting();
        self.host.power_transition(PowerMode::Transmit(level));
        let (power, frequency) = (self.output_power_dbm(), self.frequency_mhz());
        log::info!("Rf231 - TX on {} MHz at {} dBm", frequency, power);
        self.host.begin_transmit(power, frequency);
    }

    /// Stops the transmitter, abandoning an ACK that has not gone out.
    pub(super) fn stop_transmitter(&mut self) {
        self.send_ack = SendAck::None;
        if self.transmitter.take().is_some() {
            log::info!("Rf231 - TX off");
            self.host.end_transmit();
        }
    }

    pub(super) fn start_receiver(&mut self) {
        if self.receiver.is_some() {
            return;
        }
        self.buffer.clear();
        self.receiver = Some(Receiver::default());
        self.bit_errors.clear();

        self.host.power_transition(PowerMode::Receive);
        let frequency = self.frequency_mhz();
        log::info!("Rf231 - RX on {} MHz", frequency);
        self.host.begin_receive(frequency);

        let deadline = self.host.now() + RSSI_VALID_DELAY;
        self.rssi_valid.arm(deadline);
    }

    /// Stops the receiver and cancels any ACK it scheduled.
    pub(super) fn stop_receiver(&mut self) {
        self.send_ack = SendAck::None;
        self.halt_receiver();
    }

    fn halt_receiver(&mut self) {
        if self.receiver.take().is_some() {
            log::info!("Rf231 - RX off");
            self.host.end_receive();
            self.registers.modify(registers::phy_rssi::ADDR, |reg| {
                reg & !registers::phy_rssi::RSSI_MASK
            });
            self.rssi_valid.disarm();
        }
    }

    /// Next octet put on the air. Returns 0 while the transmitter is off.
    pub fn transmit_byte(&mut self) -> u8 {
        let transmitter = match self.transmitter {
            Some(transmitter) => transmitter,
            None => {
                log::warn!("Rf231 - Byte requested with the transmitter off");
                return 0;
            }
        };

        let input = TxInput {
            send_ack: self.send_ack,
            dsn: self.dsn,
            auto_crc: self.auto_crc(),
            next: self.buffer.front(),
        };
        let (transmitter, output) = transmitter.step(input);
        self.transmitter = Some(transmitter);

        if output.consumed {
            self.buffer.pop();
        }
        if output.ack_sent {
            self.send_ack = SendAck::None;
        }
        if output.underrun {
            log::warn!("Rf231 - Frame buffer underrun");
            self.raise(RadioEvent::Underrun);
        }
        log::trace!("Rf231 - TX {:#04x}", output.byte);

        if output.finished {
            self.finish_transmission();
        }
        output.byte
    }

    fn finish_transmission(&mut self) {
        self.switch_state(OperatingState::PllOn);
        self.registers.modify(registers::trx_state::ADDR, |reg| {
            reg & !registers::trx_state::TRAC_STATUS_MASK
        });
        self.raise(RadioEvent::TxEnd);
        self.stop_transmitter();
    }

    /// Feeds one octet heard on the medium. `lock` is false once the sender's carrier
    /// is gone. Returns the octet unchanged.
    pub fn receive_byte(&mut self, lock: bool, byte: u8) -> u8 {
        let now = self.host.now();
        self.advance(now);

        let receiver = match self.receiver {
            Some(receiver) => receiver,
            None => return byte,
        };
        log::trace!("Rf231 - RX {:#04x}", byte);

        let input = RxInput {
            byte,
            lock,
            auto_crc: self.auto_crc(),
        };
        let (receiver, output) = receiver.step(input);
        self.receiver = Some(receiver);

        for effect in output.effects.iter().copied() {
            if !self.apply(effect) {
                break;
            }
        }
        output.byte
    }

    /// Returns false when the rest of the frame is to be dropped.
    fn apply(&mut self, effect: RxEffect) -> bool {
        match effect {
            RxEffect::Raise(event) => self.raise(event),
            RxEffect::FrameStart(length) => {
                self.buffer.start_received();
                self.registers.set(registers::tst_rx_length::ADDR, length);
                return self.store(length);
            }
            RxEffect::Push(byte) => return self.store(byte),
            RxEffect::FilterCheck(offset) => return self.filter(offset),
            RxEffect::FrameComplete(Some(crc_ok)) => self.complete_frame(crc_ok),
            RxEffect::FrameComplete(None) => {
                self.bit_errors.clear();
                self.last_crc_ok = false;
                self.raise(RadioEvent::RxEnd);
            }
            RxEffect::EndOfFrame { lock } => self.end_of_frame(lock),
            RxEffect::Discarded => {
                self.bit_errors.clear();
                self.send_ack = SendAck::None;
            }
        }
        true
    }

    fn store(&mut self, byte: u8) -> bool {
        match self.buffer.push(byte) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Rf231 - {}, frame dropped", err);
                if let Some(receiver) = self.receiver.as_mut() {
                    receiver.overflow();
                }
                false
            }
        }
    }

    fn filter(&mut self, offset: usize) -> bool {
        let local = self.local_address();
        let verdict = address_filter::check(self.buffer.as_slice(), offset, &local);

        // A new DSN supersedes any ACK still owed to the previous frame
        if let Some(sequence) = verdict.sequence {
            self.dsn = sequence;
            self.last_crc_ok = false;
            self.send_ack = SendAck::None;
        }

        if self.state != OperatingState::RxAackOn || local.coordinator {
            return true;
        }

        if !verdict.accepted {
            log::debug!("Rf231 - Frame filtered at offset {}", offset);
            if let Some(receiver) = self.receiver.as_mut() {
                receiver.reject();
            }
            return false;
        }

        if offset == ADDRESS_MATCH_OFFSET {
            self.raise(RadioEvent::AddressMatch);
        }
        true
    }

    fn complete_frame(&mut self, crc_ok: bool) {
        let per = self.bit_errors.packet_error_rate();
        let mut lqi = self.correlation.sample(per) & LQI_MASK;
        if crc_ok {
            lqi |= LQI_CRC_OK;
        }
        // The LQI takes the place of the last FCS octet
        let index = self.buffer.len().saturating_sub(1);
        if let Err(err) = self.buffer.poke(index, lqi) {
            log::warn!("Rf231 - LQI not stored: {}", err);
        }
        self.raise(RadioEvent::RxEnd);

        if crc_ok {
            self.last_crc_ok = true;
            self.schedule_ack();
        } else {
            log::debug!("Rf231 - FCS mismatch");
            self.last_crc_ok = false;
            self.send_ack = SendAck::None;
        }
    }

    fn schedule_ack(&mut self) {
        let fc = FrameControl::new(
            self.buffer.peek(1).unwrap_or(0),
            self.buffer.peek(2).unwrap_or(0),
        );
        let csma_seed_1 = self.registers.get(registers::csma_seed_1::ADDR);

        if self.state != OperatingState::RxAackOn
            || !fc.ack_request()
            || fc.frame_type() == FrameType::Ack
            || csma_seed_1 & registers::csma_seed_1::AACK_DIS_ACK != 0
        {
            return;
        }

        self.send_ack =
            if self.auto_ack_pending || csma_seed_1 & registers::csma_seed_1::AACK_SET_PD != 0 {
                SendAck::Pend
            } else {
                SendAck::Normal
            };
        log::debug!("Rf231 - {:?} ACK due for DSN {}", self.send_ack, self.dsn);
    }

    fn end_of_frame(&mut self, lock: bool) {
        if self.send_ack != SendAck::None && self.last_crc_ok {
            self.halt_receiver();
            self.start_transmitter();
        } else if lock {
            log::trace!("Rf231 - Carrier still present after the frame");
        }
    }
}

