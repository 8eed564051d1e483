use crate::{
    cpr::{encode, CompactPosition, FrameClass, Parity},
    prelude::{FusedPosition, FusionOpts, Position, PositionStatus, Unit},
    geodesy,
    tests::{
        assert_position, init_logger, t0, AIRBORNE_EVEN_POSITION, AIRBORNE_ODD_POSITION, SURFACE_EVEN_POSITION,
        SURFACE_ODD_POSITION, SURFACE_RECEIVER,
    },
};

const EVEN: CompactPosition = CompactPosition {
    parity: Parity::Even,
    latitude: 93000,
    longitude: 51372,
};

const ODD: CompactPosition = CompactPosition {
    parity: Parity::Odd,
    latitude: 74158,
    longitude: 50194,
};

const SURFACE_EVEN: CompactPosition = CompactPosition {
    parity: Parity::Even,
    latitude: 115609,
    longitude: 116941,
};

const SURFACE_ODD: CompactPosition = CompactPosition {
    parity: Parity::Odd,
    latitude: 39199,
    longitude: 110269,
};

#[test]
fn airborne_pairing() {
    init_logger();
    let mut fusion = FusedPosition::default();
    assert_eq!(fusion.status(), PositionStatus::Unknown);

    assert!(fusion.update_airborne(EVEN, t0()).is_none());
    assert!(fusion.position().is_none());

    let t = t0() + 2.0 * Unit::Second;
    let p = fusion.update_airborne(ODD, t).unwrap();
    assert_position(&p, AIRBORNE_ODD_POSITION, 1e-9);
    assert_eq!(fusion.position(), Some(p));
    assert_eq!(fusion.timestamp(), Some(t));
    assert!(fusion.is_airborne());
    assert!(!fusion.is_surface());
}

#[test]
fn stale_pairing() {
    init_logger();
    let mut fusion = FusedPosition::default();

    assert!(fusion.update_airborne(EVEN, t0()).is_none());
    assert!(fusion
        .update_airborne(ODD, t0() + 10.0 * Unit::Second)
        .is_none());

    // the odd frame got cached nonetheless
    assert!(fusion
        .update_airborne(EVEN, t0() + 11.0 * Unit::Second)
        .is_some());
}

#[test]
fn implausible_jump() {
    init_logger();
    let mut fusion = FusedPosition::default();

    fusion.update_airborne(EVEN, t0());
    let t = t0() + 2.0 * Unit::Second;
    let accepted = fusion.update_airborne(ODD, t).unwrap();

    // ~38 NM away, within a few seconds
    let far = Position::new(52.9, 3.92);
    let far_even = encode(&far, Parity::Even, FrameClass::Airborne);
    let far_odd = encode(&far, Parity::Odd, FrameClass::Airborne);

    assert!(fusion
        .update_airborne(far_even, t0() + 3.0 * Unit::Second)
        .is_none());
    assert!(fusion
        .update_airborne(far_odd, t0() + 4.0 * Unit::Second)
        .is_none());

    assert_eq!(fusion.position(), Some(accepted));
    assert_eq!(fusion.timestamp(), Some(t));

    // same jump is plausible an hour later
    let later = t0() + 3600.0 * Unit::Second;
    fusion.update_airborne(far_even, later);
    let p = fusion
        .update_airborne(far_odd, later + 1.0 * Unit::Second)
        .unwrap();
    assert!((p.latitude - 52.9).abs() < 1e-4);
}

#[test]
fn reception_range() {
    init_logger();
    let mut fusion = FusedPosition::default();
    fusion.set_receiver(Some(Position::new(30.0, 3.9)));

    fusion.update_airborne(EVEN, t0());
    assert!(fusion
        .update_airborne(ODD, t0() + 1.0 * Unit::Second)
        .is_none());
    assert!(fusion.position().is_none());

    fusion.set_receiver(Some(Position::new(52.0, 4.0)));
    assert!(fusion
        .update_airborne(EVEN, t0() + 2.0 * Unit::Second)
        .is_some());
}

#[test]
fn antipodal_receiver() {
    init_logger();
    let mut fusion = FusedPosition::default();
    fusion.set_receiver(Some(Position::new(52.0, 4.0)));

    fusion.update_airborne(EVEN, t0());
    let t = t0() + 2.0 * Unit::Second;
    let accepted = fusion.update_airborne(ODD, t).unwrap();

    // the next candidate lies at the antipode of the receiver:
    // its distance is unknown, which rejects it
    let (latitude, longitude) = AIRBORNE_EVEN_POSITION;
    let antipode = Position::new(-latitude, longitude - 180.0);
    assert!(geodesy::distance(&antipode, &Position::from(AIRBORNE_EVEN_POSITION)).is_err());

    fusion.set_receiver(Some(antipode));
    assert!(fusion
        .update_airborne(EVEN, t0() + 4.0 * Unit::Second)
        .is_none());
    assert_eq!(fusion.position(), Some(accepted));
    assert_eq!(fusion.timestamp(), Some(t));
    assert!(fusion.is_airborne());
}

#[test]
fn surface_resolution() {
    init_logger();
    let mut fusion = FusedPosition::default();

    // no receiver: no reference for the surface ambiguity
    fusion.update_surface(SURFACE_EVEN, t0());
    assert!(fusion
        .update_surface(SURFACE_ODD, t0() + 1.0 * Unit::Second)
        .is_none());

    fusion.set_receiver(Some(Position::from(SURFACE_RECEIVER)));
    let p = fusion
        .update_surface(SURFACE_ODD, t0() + 2.0 * Unit::Second)
        .unwrap();
    assert_position(&p, SURFACE_ODD_POSITION, 1e-9);
    assert!(fusion.is_surface());

    // locally decoded from now on, no pair needed
    let p = fusion
        .update_surface(SURFACE_EVEN, t0() + 30.0 * Unit::Second)
        .unwrap();
    assert_position(&p, SURFACE_EVEN_POSITION, 1e-9);
    assert_eq!(fusion.timestamp(), Some(t0() + 30.0 * Unit::Second));
}

#[test]
fn surface_envelope() {
    init_logger();

    for (check, accepted) in [(true, false), (false, true)] {
        let opts = FusionOpts {
            surface_local_check: check,
            ..Default::default()
        };
        let mut fusion = FusedPosition::new(opts);
        fusion.set_receiver(Some(Position::from(SURFACE_RECEIVER)));

        fusion.update_surface(SURFACE_EVEN, t0());
        let resolved = fusion
            .update_surface(SURFACE_ODD, t0() + 1.0 * Unit::Second)
            .unwrap();

        // half a surface zone away: locally decodes far from the previous position
        let elsewhere = Position::new(resolved.latitude + 0.7, resolved.longitude);
        let frame = encode(&elsewhere, Parity::Even, FrameClass::Surface);

        let p = fusion.update_surface(frame, t0() + 2.0 * Unit::Second);
        assert_eq!(p.is_some(), accepted, "check: {}", check);
        if !accepted {
            assert_eq!(fusion.position(), Some(resolved));
        }
    }
}

#[test]
fn airborne_after_surface() {
    init_logger();
    let mut fusion = FusedPosition::default();
    fusion.set_receiver(Some(Position::from(SURFACE_RECEIVER)));

    fusion.update_surface(SURFACE_EVEN, t0());
    fusion.update_surface(SURFACE_ODD, t0() + 1.0 * Unit::Second);
    assert!(fusion.is_surface());

    // 250 s later, the aircraft took off
    let t = t0() + 250.0 * Unit::Second;
    fusion.update_airborne(EVEN, t);
    fusion.update_airborne(ODD, t + 1.0 * Unit::Second).unwrap();
    assert!(fusion.is_airborne());
    assert!(!fusion.is_surface());
}
