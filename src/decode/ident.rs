//! Identification (type codes 1..=4) and Mode A code
use crate::report::{EmitterCategory, Identification, Squawk};

use super::field;

const CHARSET: &[u8; 64] = b"?ABCDEFGHIJKLMNOPQRSTUVWXYZ????? ???????????????0123456789??????";

pub(crate) fn identification(type_code: u8, me: u64) -> Identification {
    let callsign = (0..8)
        .map(|i| CHARSET[field(me, 8 + 6 * i, 6) as usize] as char)
        .collect::<String>()
        .trim_end()
        .to_string();

    Identification {
        callsign,
        category: EmitterCategory::from_codes(type_code, field(me, 5, 3) as u8),
    }
}

/// Decodes a 13 bit identity field, laid out as
/// C1 A1 C2 A2 C4 A4 X B1 D1 B2 D2 B4 D4.
pub(crate) fn squawk(code: u16) -> Squawk {
    let bit = |index: u16| (code >> (12 - index)) & 1;

    let a = bit(5) << 2 | bit(3) << 1 | bit(1);
    let b = bit(11) << 2 | bit(9) << 1 | bit(7);
    let c = bit(4) << 2 | bit(2) << 1 | bit(0);
    let d = bit(12) << 2 | bit(10) << 1 | bit(8);

    Squawk(a << 9 | b << 6 | c << 3 | d)
}
