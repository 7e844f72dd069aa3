//! RSSI quantisation, bit error bookkeeping and LQI sampling.

use rand_core::RngCore;

/// Upper bound of the correlation value for each integer PER percentage.
pub const CORRELATION_MAX: [u8; 101] = [
    110, 109, 109, 109, 107, 107, 107, 107, 107, 107, 107, 107, 103, 102, 102, 102, 101, 101,
    101, 101, 99, 94, 92, 94, 101, 97, 98, 97, 97, 97, 97, 97, 94, 94, 94, 94, 94, 94, 94, 94,
    94, 94, 94, 94, 92, 89, 89, 89, 89, 89, 88, 88, 88, 88, 88, 86, 86, 86, 86, 86, 86, 86, 86,
    86, 85, 85, 85, 85, 85, 85, 83, 83, 83, 83, 83, 83, 83, 83, 79, 78, 78, 78, 78, 78, 76, 76,
    76, 74, 74, 74, 74, 74, 74, 74, 74, 74, 74, 66, 65, 65, 65,
];

/// Lower bound of the correlation value for each integer PER percentage.
pub const CORRELATION_MIN: [u8; 101] = [
    95, 95, 94, 91, 90, 90, 89, 89, 89, 88, 88, 88, 82, 82, 82, 82, 76, 76, 76, 76, 76, 76, 74,
    74, 74, 74, 74, 74, 72, 72, 72, 72, 72, 72, 72, 72, 69, 69, 69, 69, 69, 69, 69, 69, 69, 69,
    69, 69, 69, 69, 69, 69, 69, 69, 69, 69, 67, 67, 67, 67, 67, 67, 65, 65, 65, 65, 65, 65, 65,
    64, 64, 63, 63, 63, 63, 63, 63, 63, 63, 63, 61, 61, 61, 60, 60, 60, 58, 58, 56, 56, 56, 55,
    55, 55, 50, 50, 50, 50, 50, 50, 50,
];

pub const RSSI_MASK: u8 = 0x1F;
pub const RSSI_MAX: u8 = 28;
/// PHY_RSSI value reported once the RSSI settles after receiver startup.
pub const RSSI_VALID: u8 = 20;

/// PHY_RSSI field for a received power, 3 dB steps starting at -90 dBm.
pub fn rssi_from_dbm(dbm: f64) -> u8 {
    let value = ((dbm.round() as i32 + 90) / 3) + 1;
    value.clamp(0, RSSI_MAX as i32) as u8
}

pub fn dbm_from_rssi(rssi: u8) -> f64 {
    -90.0 + 3.0 * (f64::from(rssi & RSSI_MASK) - 1.0)
}

/// Samples covering the synchronisation header are not counted.
const SYNC_HEADER_SAMPLES: u32 = 5;

/// Per-byte bit error rates reported by the medium for the frame in flight.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitErrorStats {
    count: u32,
    total: f64,
}

impl BitErrorStats {
    pub fn record(&mut self, ber: f64) {
        self.count += 1;
        if self.count > SYNC_HEADER_SAMPLES {
            self.total += ber;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Packet error rate over the samples seen so far, assuming independent bit errors.
    /// Consumes the samples.
    pub fn packet_error_rate(&mut self) -> f64 {
        let mut per = 0.0;
        if self.count > SYNC_HEADER_SAMPLES {
            let samples = self.count - SYNC_HEADER_SAMPLES;
            let ber = self.total / f64::from(samples);
            per = 1.0 - (1.0 - ber).powf(f64::from(samples * 8));
        }
        self.clear();
        per
    }
}

/// Draws correlation values for the LQI byte appended to received frames.
#[derive(Debug, Clone)]
pub struct CorrelationModel<R> {
    rng: R,
}

impl<R: RngCore> CorrelationModel<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn sample(&mut self, packet_error_rate: f64) -> u8 {
        // NaN and negative rates saturate to index 0
        let index = ((packet_error_rate * 100.0) as usize).min(CORRELATION_MAX.len() - 1);
        let min = u32::from(CORRELATION_MIN[index]);
        let range = u32::from(CORRELATION_MAX[index]) - min + 1;
        let fraction = (f64::from(range) * self.uniform()) as u32;
        (min + fraction.min(range - 1)) as u8
    }

    /// Uniform sample in [0, 1) from the top 53 bits of the generator.
    fn uniform(&mut self) -> f64 {
        (self.rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
