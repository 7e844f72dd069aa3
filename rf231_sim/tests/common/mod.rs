#![allow(dead_code)]

use heapless::Vec as FrameImage;
use rf231_sim::clock::BYTE_PERIOD;
use rf231_sim::{Instant, MemoryMappedRadio, PowerMode, RadioChip, RadioConfig, RadioHost, SpiRadio};
use rf231_sim_lib::frame::{Address, Header, MAX_FRAME_IMAGE_LEN};

pub const PAN: u16 = 0xABCD;
pub const SENDER: u16 = 0x0001;
pub const RECEIVER: u16 = 0x0002;

/// Host that records everything the transceiver asks of it.
#[derive(Debug, Default)]
pub struct Recorder {
    pub now: u64,
    pub interrupts: Vec<u8>,
    pub power: Vec<PowerMode>,
    pub transmissions: Vec<(f32, f32)>,
    pub receptions: Vec<f32>,
    pub transmitting: bool,
    pub receiving: bool,
}

impl Recorder {
    pub fn tick(&mut self) {
        self.now += BYTE_PERIOD.into_us();
    }
}

impl RadioHost for Recorder {
    fn now(&self) -> Instant {
        Instant::from_us(self.now)
    }

    fn begin_transmit(&mut self, power_dbm: f32, frequency_mhz: f32) {
        self.transmitting = true;
        self.transmissions.push((power_dbm, frequency_mhz));
    }

    fn end_transmit(&mut self) {
        self.transmitting = false;
    }

    fn begin_receive(&mut self, frequency_mhz: f32) {
        self.receiving = true;
        self.receptions.push(frequency_mhz);
    }

    fn end_receive(&mut self) {
        self.receiving = false;
    }

    fn post_interrupt(&mut self, vector: u8) {
        self.interrupts.push(vector);
    }

    fn power_transition(&mut self, mode: PowerMode) {
        self.power.push(mode);
    }
}

pub fn spi_radio(irq_vector: u8) -> SpiRadio<Recorder> {
    SpiRadio::new(RadioChip::new(&RadioConfig::spi(irq_vector), Recorder::default()))
}

pub fn memory_mapped_radio() -> MemoryMappedRadio<Recorder> {
    MemoryMappedRadio::new(RadioChip::new(
        &RadioConfig::memory_mapped(),
        Recorder::default(),
    ))
}

/// Clocks the transmitter until it shuts down and returns the octets put on the air.
pub fn drain(chip: &mut RadioChip<Recorder>) -> Vec<u8> {
    let mut wire = Vec::new();
    while chip.is_transmitting() {
        chip.host_mut().tick();
        wire.push(chip.transmit_byte());
    }
    wire
}

/// Feeds `wire` to the receiver, followed by one octet of silence.
pub fn deliver(chip: &mut RadioChip<Recorder>, wire: &[u8]) {
    for byte in wire {
        chip.host_mut().tick();
        chip.receive_byte(true, *byte);
    }
    chip.host_mut().tick();
    chip.receive_byte(false, 0);
}

pub fn data_frame(
    sequence: u8,
    dest_pan: u16,
    dest: u16,
    ack_request: bool,
    payload: &[u8],
) -> FrameImage<u8, MAX_FRAME_IMAGE_LEN> {
    Header::data(sequence, dest_pan, Address::Short(dest), Address::Short(SENDER))
        .with_ack_request(ack_request)
        .frame_image(payload)
        .expect("frame fits in the frame buffer")
}
