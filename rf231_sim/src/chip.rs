pub mod registers;

mod framing;
mod register_file;

pub use register_file::RegisterFile;

use rand_core::{RngCore, SeedableRng};
use rand_wyrand::WyRand;

use rf231_sim_lib::radio::{Command, OperatingState, RadioEvent, SendAck, Variant};

use crate::address_filter::LocalAddress;
use crate::clock::{Instant, OneShot};
use crate::command_fsm::{self, FramerAction};
use crate::config::RadioConfig;
use crate::frame_buffer::FrameBuffer;
use crate::host::{PowerMode, RadioHost};
use crate::link_quality::{self, BitErrorStats, CorrelationModel};
use crate::receiver::Receiver;
use crate::transmitter::Transmitter;

/// Lowest 2.4 GHz channel and its carrier frequency.
const FIRST_CHANNEL: u8 = 11;
const FIRST_CHANNEL_MHZ: f32 = 2405.0;
const CHANNEL_SPACING_MHZ: f32 = 5.0;

/// Transceiver core shared by the SPI attached AT86RF231 and the ATmega128RFA1.
///
/// The chip is driven from three directions: the MCU through the register interface,
/// the medium through [`RadioChip::transmit_byte`] and [`RadioChip::receive_byte`],
/// and the host clock through [`RadioChip::advance`]. All calls are expected from a
/// single simulation thread.
pub struct RadioChip<H, R = WyRand> {
    variant: Variant,
    irq_vector: Option<u8>,
    ieee_address: [u8; 8],
    host: H,
    registers: RegisterFile,
    buffer: FrameBuffer,
    state: OperatingState,
    /// Present while the framer is running.
    transmitter: Option<Transmitter>,
    receiver: Option<Receiver>,
    send_ack: SendAck,
    auto_ack_pending: bool,
    last_crc_ok: bool,
    dsn: u8,
    correlation: CorrelationModel<R>,
    bit_errors: BitErrorStats,
    rssi_valid: OneShot,
}

impl<H: RadioHost> RadioChip<H, WyRand> {
    pub fn new(config: &RadioConfig, host: H) -> Self {
        Self::with_rng(config, host, WyRand::seed_from_u64(config.correlation_seed))
    }
}

impl<H: RadioHost, R: RngCore> RadioChip<H, R> {
    pub fn with_rng(config: &RadioConfig, host: H, rng: R) -> Self {
        let mut chip = Self {
            variant: config.variant,
            irq_vector: config.irq_vector,
            ieee_address: config.ieee_address,
            host,
            registers: RegisterFile::new(&config.ieee_address),
            buffer: FrameBuffer::new(),
            state: OperatingState::TrxOff,
            transmitter: None,
            receiver: None,
            send_ack: SendAck::None,
            auto_ack_pending: false,
            last_crc_ok: false,
            dsn: 0,
            correlation: CorrelationModel::new(rng),
            bit_errors: BitErrorStats::default(),
            rssi_valid: OneShot::default(),
        };
        chip.registers
            .set(registers::trx_status::ADDR, chip.state.bits());

        log::info!("Rf231 - {:?} attached", chip.variant);
        chip
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn state(&self) -> OperatingState {
        self.state
    }

    /// Register read as seen by the MCU, with the read side effects of IRQ_STATUS.
    pub fn read_register(&mut self, address: u8) -> u8 {
        let value = self.registers.read(address);
        log::trace!(
            "Rf231 - Read {} = {:#04x}",
            register_name(address).unwrap_or("reserved"),
            value
        );
        value
    }

    /// Register value without side effects.
    pub fn peek_register(&self, address: u8) -> u8 {
        self.registers.get(address)
    }

    pub fn write_register(&mut self, address: u8, value: u8) {
        let address = address & registers::ADDR_MASK;
        log::trace!(
            "Rf231 - Write {} = {:#04x}",
            register_name(address).unwrap_or("reserved"),
            value
        );

        match address {
            // Read only, it always mirrors the operating state
            registers::trx_status::ADDR => {}
            registers::trx_state::ADDR => {
                self.registers.set(address, value);
                self.command(value & registers::trx_state::TRX_CMD_MASK);
            }
            _ => self.registers.set(address, value),
        }
    }

    /// Executes a TRX_CMD value. Unknown codes act as NOP.
    pub fn command(&mut self, bits: u8) {
        let command = match Command::try_from(bits) {
            Ok(command) => command,
            Err(_) => {
                log::warn!("Rf231 - Unknown TRX_CMD {:#04x}, ignored", bits);
                Command::Nop
            }
        };
        log::debug!("Rf231 - Command {:?}", command);

        let transition = command_fsm::on_command(self.state, command);
        if transition.trac_invalid {
            self.registers.modify(registers::trx_state::ADDR, |reg| {
                (reg & registers::trx_state::TRX_CMD_MASK) | registers::trx_state::TRAC_INVALID
            });
        }
        self.switch_state(transition.next);

        if transition.transmitter == FramerAction::Stop {
            self.stop_transmitter();
        }
        if transition.receiver == FramerAction::Stop {
            self.stop_receiver();
        }
        if transition.transmitter == FramerAction::Start {
            self.start_transmitter();
        }
        if transition.receiver == FramerAction::Start {
            self.start_receiver();
        }
    }

    /// SLP_TR level change. Only the edges listed in the state machine have an effect.
    pub fn sleep_pin_changed(&mut self, level: bool) {
        log::debug!("Rf231 - SLP_TR {}", if level { "high" } else { "low" });

        if let Some((next, power)) = command_fsm::on_sleep_pin(self.state, level) {
            if let Some(mode) = power {
                self.host.power_transition(mode);
            }
            self.switch_state(next);
        }
    }

    /// Power-on reset, also reached through RSTN or TRXRST.
    pub fn reset(&mut self) {
        log::info!("Rf231 - Reset");

        self.registers.reset(&self.ieee_address);
        self.send_ack = SendAck::None;
        self.auto_ack_pending = false;
        self.last_crc_ok = false;
        self.stop_transmitter();
        self.stop_receiver();
        self.buffer.clear();
        self.switch_state(OperatingState::TrxOff);
        self.host.power_transition(PowerMode::Idle);
    }

    fn switch_state(&mut self, next: OperatingState) {
        if next != self.state {
            log::debug!("Rf231 - State switch: {:?} => {:?}", self.state, next);
        }
        self.state = next;
        self.registers
            .set(registers::trx_status::ADDR, self.state.bits());
    }

    /// Latches `event` in IRQ_STATUS and posts it when unmasked.
    fn raise(&mut self, event: RadioEvent) {
        let bit = event.status_bit();
        let mask = self.registers.get(registers::irq_mask::ADDR);

        if mask & bit != 0 {
            self.registers
                .modify(registers::irq_status::ADDR, |reg| reg | bit);
            match self.vector(event) {
                Some(vector) => {
                    log::debug!("Rf231 - {:?} interrupt on vector {}", event, vector);
                    self.host.post_interrupt(vector);
                }
                None => log::warn!("Rf231 - {:?} interrupt without a vector", event),
            }
        } else if self.registers.get(registers::trx_ctrl_1::ADDR)
            & registers::trx_ctrl_1::IRQ_MASK_MODE
            != 0
        {
            self.registers
                .modify(registers::irq_status::ADDR, |reg| reg | bit);
        }
    }

    fn vector(&self, event: RadioEvent) -> Option<u8> {
        use registers::rfa1_vectors;

        match self.variant {
            Variant::At86rf231 => self.irq_vector,
            Variant::Atmega128rfa1 => Some(match event {
                RadioEvent::PllUnlock => rfa1_vectors::PLL_UNLOCK,
                RadioEvent::RxStart => rfa1_vectors::RX_START,
                RadioEvent::RxEnd => rfa1_vectors::RX_END,
                RadioEvent::AddressMatch => rfa1_vectors::XAH_AMI,
                RadioEvent::TxEnd | RadioEvent::Underrun => rfa1_vectors::TX_END,
            }),
        }
    }

    pub fn is_radio_on(&self) -> bool {
        self.transmitter.is_some() || self.receiver.is_some()
    }

    pub fn is_transmitting(&self) -> bool {
        self.transmitter.is_some()
    }

    pub fn is_receiving(&self) -> bool {
        self.receiver.is_some()
    }

    pub fn channel(&self) -> u8 {
        self.registers.get(registers::phy_cc_cca::ADDR) & registers::phy_cc_cca::CHANNEL_MASK
    }

    pub fn frequency_mhz(&self) -> f32 {
        FIRST_CHANNEL_MHZ
            + CHANNEL_SPACING_MHZ * (f32::from(self.channel()) - f32::from(FIRST_CHANNEL))
    }

    pub fn output_power_dbm(&self) -> f32 {
        registers::phy_tx_pwr::POWER_DBM[usize::from(self.tx_power_setting())]
    }

    fn tx_power_setting(&self) -> u8 {
        self.registers.get(registers::phy_tx_pwr::ADDR) & registers::phy_tx_pwr::TX_PWR_MASK
    }

    /// Clear channel assessment. The medium is never reported busy.
    pub fn is_channel_clear(&self) -> bool {
        true
    }

    pub fn send_ack(&self) -> SendAck {
        self.send_ack
    }

    /// Sequence number of the last frame seen by the address filter.
    pub fn sequence_number(&self) -> u8 {
        self.dsn
    }

    /// Frame pending bit of the next automatic ACK, on top of AACK_SET_PD.
    pub fn set_auto_ack_pending(&mut self, pending: bool) {
        self.auto_ack_pending = pending;
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn frame_buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.buffer
    }

    /// Updates PHY_RSSI from the medium, keeping the upper bits.
    pub fn set_rssi(&mut self, dbm: f64) {
        let rssi = link_quality::rssi_from_dbm(dbm);
        self.registers.modify(registers::phy_rssi::ADDR, |reg| {
            (reg & !link_quality::RSSI_MASK) | rssi
        });
    }

    pub fn rssi_dbm(&self) -> f64 {
        link_quality::dbm_from_rssi(self.registers.get(registers::phy_rssi::ADDR))
    }

    pub fn record_bit_error_rate(&mut self, ber: f64) {
        self.bit_errors.record(ber);
    }

    /// Packet error rate of the current frame. Consumes the recorded samples.
    pub fn packet_error_rate(&mut self) -> f64 {
        self.bit_errors.packet_error_rate()
    }

    /// Fires the timers due at `now`.
    pub fn advance(&mut self, now: Instant) {
        if self.rssi_valid.poll(now) && self.receiver.is_some() {
            log::trace!("Rf231 - RSSI valid");
            self.registers.modify(registers::phy_rssi::ADDR, |reg| {
                (reg & !link_quality::RSSI_MASK) | link_quality::RSSI_VALID
            });
        }
    }

    fn local_address(&self) -> LocalAddress {
        LocalAddress {
            pan_id: self.registers.get_many(registers::pan_id::ADDR_0),
            short: self.registers.get_many(registers::short_addr::ADDR_0),
            ieee: self.registers.get_many(registers::ieee_addr::ADDR_0),
            coordinator: self.registers.get(registers::csma_seed_1::ADDR)
                & registers::csma_seed_1::AACK_I_AM_COORD
                != 0,
        }
    }

    fn auto_crc(&self) -> bool {
        self.registers.get(registers::trx_ctrl_1::ADDR) & registers::trx_ctrl_1::TX_AUTO_CRC_ON
            != 0
    }
}

pub fn register_name(address: u8) -> Option<&'static str> {
    registers::name(address)
}
