use crate::{
    geodesy::{course, destination, distance},
    prelude::{Error, Position},
    tests::init_logger,
};

use rand::{rngs::SmallRng, Rng, SeedableRng};

const FLINDERS_PEAK: Position = Position::new(-37.95103341666667, 144.42486788888888);
const BUNINYONG: Position = Position::new(-37.65282113888889, 143.92649552777777);

#[test]
fn vincenty_inverse() {
    init_logger();

    let d = distance(&FLINDERS_PEAK, &BUNINYONG).unwrap();
    assert!((d - 54972.271).abs() < 1e-3, "distance: {}", d);

    let forward = course(&FLINDERS_PEAK, &BUNINYONG).unwrap();
    assert!((forward - 306.8681592027718).abs() < 1e-9, "course: {}", forward);

    let reverse = course(&BUNINYONG, &FLINDERS_PEAK).unwrap();
    assert!((reverse - 127.17363062891431).abs() < 1e-9, "course: {}", reverse);
}

#[test]
fn vincenty_direct() {
    init_logger();

    // 306°52'05.37"
    let bearing = 306.0 + 52.0 / 60.0 + 5.37 / 3600.0;
    let p = destination(&FLINDERS_PEAK, bearing, 54972.271).unwrap();

    assert!((p.latitude - BUNINYONG.latitude).abs() < 1e-7, "{}", p);
    assert!((p.longitude - BUNINYONG.longitude).abs() < 1e-7, "{}", p);
}

#[test]
fn identical_points() {
    assert_eq!(distance(&BUNINYONG, &BUNINYONG).unwrap(), 0.0);
    assert_eq!(course(&BUNINYONG, &BUNINYONG).unwrap(), 0.0);

    let p = destination(&BUNINYONG, 45.0, 0.0).unwrap();
    assert!(distance(&p, &BUNINYONG).unwrap() < 1e-6);
}

#[test]
fn antipodal_points() {
    init_logger();
    let origin = Position::new(0.0, 0.0);
    for p in [
        Position::new(0.5, 179.7),
        Position::new(0.0, 180.0),
        Position::new(0.0, 179.9),
    ] {
        assert!(
            matches!(distance(&origin, &p), Err(Error::IterationLimitExceeded)),
            "{} should not converge",
            p
        );
        assert!(course(&origin, &p).is_err());
    }

    // far but converging
    let d = distance(&origin, &Position::new(1.0, 179.0)).unwrap();
    assert!((d - 19860509.2376).abs() < 1e-2);
}

#[test]
fn symmetry() {
    init_logger();
    let mut rng = SmallRng::seed_from_u64(0);

    for _ in 0..500 {
        let a = Position::new(rng.random_range(-60.0..60.0), rng.random_range(-180.0..180.0));
        let b = Position::new(rng.random_range(-60.0..60.0), rng.random_range(-180.0..180.0));

        let (Ok(ab), Ok(ba)) = (distance(&a, &b), distance(&b, &a)) else {
            continue;
        };
        assert!((ab - ba).abs() < 1e-6 * ab.max(1.0), "{} {}: {} {}", a, b, ab, ba);
    }
}

#[test]
fn short_range_reciprocity() {
    init_logger();
    let mut rng = SmallRng::seed_from_u64(1);

    for _ in 0..500 {
        let a = Position::new(rng.random_range(-60.0..60.0), rng.random_range(-180.0..180.0));
        let bearing = rng.random_range(0.0..360.0);
        let range = rng.random_range(100.0..1000.0);

        let b = destination(&a, bearing, range).unwrap();

        let d = distance(&a, &b).unwrap();
        assert!((d - range).abs() < 1e-3, "{} -> {}: {} != {}", a, b, d, range);

        let forward = course(&a, &b).unwrap();
        let delta = (forward - bearing).rem_euclid(360.0);
        assert!(delta < 1e-5 || delta > 360.0 - 1e-5, "{} != {}", forward, bearing);

        let reverse = course(&b, &a).unwrap();
        let delta = (reverse - forward - 180.0).rem_euclid(360.0);
        assert!(delta < 0.1 || delta > 359.9, "{} {}", forward, reverse);
    }
}
