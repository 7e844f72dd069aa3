//! Inline frame filter evaluated while a frame streams into the frame buffer.
//!
//! The filter looks at the buffer image (PHR at index 0) right after the byte at
//! `offset` has been stored, so every field it inspects is already present.

use rf231_sim_lib::frame::{
    AddressingMode, FrameControl, FrameType, LONG_BROADCAST, SHORT_BROADCAST,
};

/// Offsets at which a verdict can change.
pub const CHECK_OFFSETS: [usize; 5] = [1, 3, 5, 7, 13];
/// Last header offset; a frame still accepted here raises the address match interrupt.
pub const ADDRESS_MATCH_OFFSET: usize = 13;

const DEST_PAN: core::ops::Range<usize> = 4..6;
const DEST_SHORT: core::ops::Range<usize> = 6..8;
const DEST_LONG: core::ops::Range<usize> = 6..14;

/// Local addressing configuration, as found in the PAN_ID, SHORT_ADDR and IEEE_ADDR
/// registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalAddress {
    pub pan_id: [u8; 2],
    pub short: [u8; 2],
    pub ieee: [u8; 8],
    pub coordinator: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub accepted: bool,
    /// Sequence number captured at offset 3 for frames that carry one.
    pub sequence: Option<u8>,
}

impl Verdict {
    const fn accept() -> Self {
        Self {
            accepted: true,
            sequence: None,
        }
    }

    const fn reject() -> Self {
        Self {
            accepted: false,
            sequence: None,
        }
    }
}

pub fn check(frame: &[u8], offset: usize, local: &LocalAddress) -> Verdict {
    let fc = FrameControl::new(
        frame.get(1).copied().unwrap_or(0),
        frame.get(2).copied().unwrap_or(0),
    );

    // Reserved frame types are only rejected on their type field
    if offset > 1 && fc.is_reserved() {
        return Verdict::accept();
    }

    match offset {
        1 if fc.is_reserved() => Verdict::reject(),
        3 => match (fc.frame_type(), frame.get(3)) {
            (FrameType::Beacon, _) | (_, None) => Verdict::accept(),
            (_, Some(sequence)) => Verdict {
                accepted: true,
                sequence: Some(*sequence),
            },
        },
        5 => verdict(pan_matches(frame, &fc, local)),
        7 if fc.dest_mode() == AddressingMode::Short => {
            verdict(field_matches(frame, DEST_SHORT, &local.short, &SHORT_BROADCAST))
        }
        13 if fc.dest_mode() == AddressingMode::Long => {
            verdict(field_matches(frame, DEST_LONG, &local.ieee, &LONG_BROADCAST))
        }
        _ => Verdict::accept(),
    }
}

fn verdict(accepted: bool) -> Verdict {
    if accepted {
        Verdict::accept()
    } else {
        Verdict::reject()
    }
}

fn field_matches(
    frame: &[u8],
    range: core::ops::Range<usize>,
    local: &[u8],
    broadcast: &[u8],
) -> bool {
    match frame.get(range) {
        Some(field) => field == local || field == broadcast,
        None => true,
    }
}

fn pan_matches(frame: &[u8], fc: &FrameControl, local: &LocalAddress) -> bool {
    let pan = match frame.get(DEST_PAN) {
        Some(pan) => pan,
        None => return true,
    };

    if fc.dest_pan_present() {
        return pan == local.pan_id || pan == SHORT_BROADCAST;
    }

    // Without destination fields the PAN at this offset is the source PAN
    if fc.dest_mode() != AddressingMode::None || !fc.src_pan_present() {
        return true;
    }

    match fc.frame_type() {
        FrameType::Beacon => pan == local.pan_id || local.pan_id == SHORT_BROADCAST,
        FrameType::Data | FrameType::Command => local.coordinator && pan == local.pan_id,
        _ => true,
    }
}
