//! Airborne velocity (type code 19)
use crate::report::{AirspeedHeading, Message, SignedMagnitude, VelocityOverGround};

use super::field;

/// Signed 10 bit velocity component: 0 is "no data", value is offset by one.
fn component(me: u64, sign_bit: u32, start: u32, supersonic: bool) -> Option<SignedMagnitude> {
    let raw = field(me, start, 10) as u16;
    if raw == 0 {
        return None;
    }
    let scale = if supersonic { 4 } else { 1 };
    let magnitude = (raw - 1).saturating_mul(scale);
    Some(SignedMagnitude::new(field(me, sign_bit, 1) == 1, magnitude))
}

/// Vertical rate [ft/min]
fn vertical_rate(me: u64) -> Option<SignedMagnitude> {
    let raw = field(me, 37, 9) as u16;
    if raw == 0 {
        None
    } else {
        Some(SignedMagnitude::new(field(me, 36, 1) == 1, (raw - 1) * 64))
    }
}

/// Geometric minus barometric height [ft]
fn height_difference(me: u64) -> Option<SignedMagnitude> {
    let raw = field(me, 49, 7) as u16;
    if raw == 0 {
        None
    } else {
        Some(SignedMagnitude::new(field(me, 48, 1) == 1, (raw - 1) * 25))
    }
}

pub(crate) fn decode(me: u64) -> Message {
    let subtype = field(me, 5, 3);
    let supersonic = subtype == 2 || subtype == 4;

    match subtype {
        1 | 2 => Message::VelocityOverGround(VelocityOverGround {
            east_west: component(me, 13, 14, supersonic),
            north_south: component(me, 24, 25, supersonic),
            vertical_rate: vertical_rate(me),
            height_difference: height_difference(me),
            supersonic,
        }),
        3 | 4 => {
            let heading_deg = if field(me, 13, 1) == 1 {
                Some(field(me, 14, 10) as f64 * 360.0 / 1024.0)
            } else {
                None
            };
            let airspeed_kt = component(me, 24, 25, supersonic).map(|speed| speed.magnitude);
            Message::AirspeedHeading(AirspeedHeading {
                heading_deg,
                airspeed_kt,
                true_airspeed: field(me, 24, 1) == 1,
                vertical_rate: vertical_rate(me),
                height_difference: height_difference(me),
                supersonic,
            })
        },
        _ => Message::Unknown,
    }
}
