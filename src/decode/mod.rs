//! Mode S extended squitter (DF17) decoding
use hifitime::Epoch;
use log::trace;

use crate::{
    cpr::{CompactPosition, Parity},
    position::Position,
    report::{Address, AirbornePosition, Message, Report, SurfacePosition},
};

mod altitude;
mod ident;
mod status;
mod velocity;

/// Length of an extended squitter [bytes]
pub const EXTENDED_SQUITTER_LEN: usize = 14;

/// Downlink format of (long) extended squitters
pub const DF_EXTENDED_SQUITTER: u8 = 17;

/// Extracts `len` bits starting at bit `start` of the 56 bit ME field.
/// Bit 0 is the most significant bit.
pub(crate) fn field(me: u64, start: u32, len: u32) -> u64 {
    (me >> (56 - start - len)) & ((1_u64 << len) - 1)
}

/// Returns the downlink format of a Mode S frame
pub fn downlink_format(frame: &[u8]) -> Option<u8> {
    frame.first().map(|byte| byte >> 3)
}

/// True if `frame` is a (14 byte) DF17 extended squitter
pub fn is_extended_squitter(frame: &[u8]) -> bool {
    frame.len() == EXTENDED_SQUITTER_LEN && downlink_format(frame) == Some(DF_EXTENDED_SQUITTER)
}

/// Type code of a DF17 frame, None for other frames
pub fn type_code(frame: &[u8]) -> Option<u8> {
    if is_extended_squitter(frame) {
        Some(frame[4] >> 3)
    } else {
        None
    }
}

fn message_field(frame: &[u8]) -> u64 {
    frame[4..11]
        .iter()
        .fold(0_u64, |me, byte| (me << 8) | *byte as u64)
}

fn compact_position(me: u64) -> CompactPosition {
    let parity = if field(me, 21, 1) == 1 {
        Parity::Odd
    } else {
        Parity::Even
    };
    CompactPosition::new(
        parity,
        field(me, 22, 17) as u32,
        field(me, 39, 17) as u32,
    )
}

/// Ground speed [kt] of surface movement codes
fn movement(code: u8) -> Option<f64> {
    let v = code as f64;
    match code {
        1 => Some(0.0),
        2..=8 => Some(0.125 * (v - 1.0)),
        9..=12 => Some(1.0 + 0.25 * (v - 8.0)),
        13..=38 => Some(2.0 + 0.5 * (v - 12.0)),
        39..=93 => Some(15.0 + (v - 38.0)),
        94..=108 => Some(70.0 + 2.0 * (v - 93.0)),
        109..=123 => Some(100.0 + 5.0 * (v - 108.0)),
        124 => Some(175.0),
        _ => None,
    }
}

fn surface_position(me: u64) -> SurfacePosition {
    let track_deg = if field(me, 12, 1) == 1 {
        Some(field(me, 13, 7) as f64 * 360.0 / 128.0)
    } else {
        None
    };
    SurfacePosition {
        cpr: compact_position(me),
        movement_kt: movement(field(me, 5, 7) as u8),
        track_deg,
    }
}

fn airborne_position(type_code: u8, me: u64) -> AirbornePosition {
    let code = field(me, 8, 12) as u16;
    let gnss_altitude = type_code >= 20;
    AirbornePosition {
        cpr: compact_position(me),
        altitude_ft: if gnss_altitude {
            altitude::gnss(code)
        } else {
            altitude::barometric(code)
        },
        gnss_altitude,
    }
}

/// Decodes the message field of a DF17 frame.
pub fn decode_message(type_code: u8, me: u64) -> Message {
    match type_code {
        1..=4 => Message::Identification(ident::identification(type_code, me)),
        5..=8 => Message::SurfacePosition(surface_position(me)),
        9..=18 | 20..=22 => Message::AirbornePosition(airborne_position(type_code, me)),
        19 => velocity::decode(me),
        24 => Message::SurfaceSystemStatus,
        28 => status::aircraft_status(me),
        29 => status::target_state(me),
        31 => status::operational_status(me),
        _ => Message::Unknown,
    }
}

/// Decodes a Mode S frame received at `t`. Returns None unless
/// `frame` is a DF17 extended squitter. Parity is not verified.
pub fn decode(t: Epoch, receiver: Option<Position>, frame: &[u8]) -> Option<Report> {
    let type_code = type_code(frame)?;
    let address = Address(
        (frame[1] as u32) << 16 | (frame[2] as u32) << 8 | frame[3] as u32,
    );
    let me = message_field(frame);
    let message = decode_message(type_code, me);

    trace!("{} ({}) - type code {}: {:?}", t, address, type_code, message);

    Some(Report {
        t,
        address,
        receiver,
        type_code,
        message,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    #[test]
    fn bit_fields() {
        let me = 0x58C382D690C8AC_u64;
        assert_eq!(field(me, 0, 5), 11);
        assert_eq!(field(me, 8, 12), 0xC38);
        assert_eq!(field(me, 21, 1), 0);
        assert_eq!(field(me, 22, 17), 93000);
        assert_eq!(field(me, 39, 17), 51372);
    }

    #[rstest]
    #[case(0, None)]
    #[case(1, Some(0.0))]
    #[case(2, Some(0.125))]
    #[case(9, Some(1.25))]
    #[case(40, Some(17.0))]
    #[case(42, Some(19.0))]
    #[case(94, Some(72.0))]
    #[case(124, Some(175.0))]
    #[case(125, None)]
    fn surface_movement(#[case] code: u8, #[case] expected: Option<f64>) {
        assert_eq!(movement(code), expected);
    }

    #[test]
    fn framing() {
        let frame = [
            0x8D, 0x40, 0x62, 0x1D, 0x58, 0xC3, 0x82, 0xD6, 0x90, 0xC8, 0xAC, 0x28, 0x63, 0xA7,
        ];
        assert!(is_extended_squitter(&frame));
        assert_eq!(type_code(&frame), Some(11));
        assert!(!is_extended_squitter(&frame[..7]));

        let mut df18 = frame;
        df18[0] = 0x90;
        assert_eq!(downlink_format(&df18), Some(18));
        assert!(decode(Epoch::from_gpst_seconds(0.0), None, &df18).is_none());
    }
}
