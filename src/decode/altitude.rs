//! Altitude field decoding

/// Decodes the 12 bit altitude field of airborne position messages
/// (barometric altitude, type codes 9..=18) in feet.
/// Bit layout is C1 A1 C2 A2 C4 A4 B1 Q B2 D2 B4 D4.
pub(crate) fn barometric(code: u16) -> Option<i32> {
    if code == 0 {
        return None;
    }
    if code & 0x010 != 0 {
        // 25 ft increments
        let n = ((code & 0xFE0) >> 1) | (code & 0x00F);
        Some(n as i32 * 25 - 1000)
    } else {
        gillham(code)
    }
}

/// Decodes the 12 bit GNSS height field (type codes 20..=22), in feet
pub(crate) fn gnss(code: u16) -> Option<i32> {
    if code == 0 {
        None
    } else {
        // transmitted in meters
        Some((code as f64 * 3.28084).round() as i32)
    }
}

fn gray_to_binary(gray: u16) -> u16 {
    let mut binary = gray;
    let mut shift = gray >> 1;
    while shift != 0 {
        binary ^= shift;
        shift >>= 1;
    }
    binary
}

/// 100 ft increments, Gillham (Mode C) encoding
fn gillham(code: u16) -> Option<i32> {
    let bit = |mask: u16, weight: u16| if code & mask != 0 { weight } else { 0 };

    // D2 D4 A1 A2 A4 B1 B2 B4
    let five_hundreds = bit(0x004, 0x80)
        | bit(0x001, 0x40)
        | bit(0x400, 0x20)
        | bit(0x100, 0x10)
        | bit(0x040, 0x08)
        | bit(0x020, 0x04)
        | bit(0x008, 0x02)
        | bit(0x002, 0x01);

    // C1 C2 C4
    let one_hundreds = bit(0x800, 0x4) | bit(0x200, 0x2) | bit(0x080, 0x1);

    let five_hundreds = gray_to_binary(five_hundreds) as i32;
    let mut one_hundreds = gray_to_binary(one_hundreds) as i32;

    if matches!(one_hundreds, 0 | 5 | 6) {
        return None;
    }
    if one_hundreds == 7 {
        one_hundreds = 5;
    }
    if five_hundreds % 2 == 1 {
        one_hundreds = 6 - one_hundreds;
    }

    Some(five_hundreds * 500 + one_hundreds * 100 - 1300)
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(0xC38, Some(38000))]
    #[case(0x010, Some(-1000))]
    #[case(0x000, None)]
    #[case(0x200, Some(-1000))]
    #[case(0x808, Some(300))]
    #[case(0x828, Some(1200))]
    #[case(0x008, None)]
    fn barometric_altitude(#[case] code: u16, #[case] expected: Option<i32>) {
        assert_eq!(barometric(code), expected);
    }

    #[test]
    fn gnss_height() {
        assert_eq!(gnss(0), None);
        assert_eq!(gnss(1000), Some(3281));
    }
}
