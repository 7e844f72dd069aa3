//! Simulation time as seen by the transceiver.

use core::ops::Add;

/// One octet at 250 kbit/s.
pub const BYTE_PERIOD: Duration = Duration(32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Instant(u64);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration(u64);

impl Instant {
    pub const fn from_us(us: u64) -> Self {
        Self(us)
    }

    pub fn into_us(self) -> u64 {
        self.0
    }

    pub fn elapsed_since(self, earlier: Instant) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }
}

impl Duration {
    pub const fn from_us(us: u64) -> Self {
        Self(us)
    }

    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes * BYTE_PERIOD.0)
    }

    pub fn into_us(self) -> u64 {
        self.0
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        Instant(self.0.saturating_add(rhs.0))
    }
}

/// Timer that fires once when simulation time reaches its deadline.
#[derive(Clone, Copy, Debug, Default)]
pub struct OneShot {
    deadline: Option<Instant>,
}

impl OneShot {
    pub fn arm(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true on the first poll at or after the deadline, then disarms.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
