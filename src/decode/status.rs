//! Status messages: aircraft status (28), target state (29), operational status (31)
use crate::report::{
    EmergencyState, EmergencyStatus, Message, ModeBits, OperationalStatus, TargetStateV1,
    TargetStateV2,
};

use super::{field, ident};

pub(crate) fn aircraft_status(me: u64) -> Message {
    match field(me, 5, 3) {
        1 => Message::EmergencyStatus(EmergencyStatus {
            state: EmergencyState::from(field(me, 8, 3) as u8),
            squawk: ident::squawk(field(me, 11, 13) as u16),
        }),
        2 => Message::ResolutionAdvisory(me),
        _ => Message::Unknown,
    }
}

fn target_state_v1(me: u64) -> TargetStateV1 {
    let target_altitude_ft = if field(me, 7, 2) != 0 {
        Some(field(me, 15, 10) as i32 * 100 - 1000)
    } else {
        None
    };

    let heading = field(me, 27, 9);
    let target_heading_deg = if field(me, 25, 2) != 0 && heading < 360 {
        Some(heading as f64)
    } else {
        None
    };

    TargetStateV1 {
        target_altitude_ft,
        target_heading_deg,
    }
}

fn target_state_v2(me: u64) -> TargetStateV2 {
    let selected_altitude_ft = match field(me, 9, 11) {
        0 => None,
        raw => Some((raw as i32 - 1) * 32),
    };

    let barometric_pressure_mb = match field(me, 20, 9) {
        0 => None,
        raw => Some((raw as f64 - 1.0) * 0.8 + 800.0),
    };

    let selected_heading_deg = if field(me, 29, 1) == 1 {
        Some(field(me, 30, 9) as f64 * 180.0 / 256.0)
    } else {
        None
    };

    let mode_bits = if field(me, 46, 1) == 1 {
        Some(ModeBits {
            autopilot: field(me, 47, 1) == 1,
            vnav: field(me, 48, 1) == 1,
            altitude_hold: field(me, 49, 1) == 1,
            approach: field(me, 51, 1) == 1,
            tcas: field(me, 52, 1) == 1,
        })
    } else {
        None
    };

    TargetStateV2 {
        selected_altitude_ft,
        barometric_pressure_mb,
        selected_heading_deg,
        mode_bits,
    }
}

pub(crate) fn target_state(me: u64) -> Message {
    match field(me, 5, 2) {
        0 => Message::TargetStateV1(target_state_v1(me)),
        1 => Message::TargetStateV2(target_state_v2(me)),
        _ => Message::Unknown,
    }
}

pub(crate) fn operational_status(me: u64) -> Message {
    match field(me, 5, 3) {
        0 => Message::AirborneOperationalStatus(OperationalStatus {
            capability: field(me, 8, 16) as u16,
            mode: field(me, 24, 16) as u16,
            version: field(me, 40, 3) as u8,
            nac_p: field(me, 44, 4) as u8,
            sil: field(me, 50, 2) as u8,
        }),
        1 => Message::SurfaceOperationalStatus(OperationalStatus {
            capability: field(me, 8, 12) as u16,
            mode: field(me, 24, 16) as u16,
            version: field(me, 40, 3) as u8,
            nac_p: field(me, 44, 4) as u8,
            sil: field(me, 50, 2) as u8,
        }),
        _ => Message::Unknown,
    }
}
