use crate::clock::Instant;

/// Energy accounting modes reported on every power-relevant transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerMode {
    Off,
    Idle,
    Receive,
    /// Transmit at the given level, 0 being the weakest of the 16 PHY_TX_PWR steps.
    Transmit(u8),
}

/// Everything the transceiver needs from the surrounding simulator.
///
/// The medium is expected to call [`crate::RadioChip::transmit_byte`] and
/// [`crate::RadioChip::receive_byte`] once per byte period between the matching
/// `begin_*` and `end_*` calls.
pub trait RadioHost {
    fn now(&self) -> Instant;

    fn begin_transmit(&mut self, power_dbm: f32, frequency_mhz: f32);

    fn end_transmit(&mut self);

    fn begin_receive(&mut self, frequency_mhz: f32);

    fn end_receive(&mut self);

    fn post_interrupt(&mut self, vector: u8);

    fn power_transition(&mut self, _mode: PowerMode) {}
}
