//! Vincenty's direct and inverse solutions on the WGS84 ellipsoid
use crate::{
    constants::{
        FLATTENING, SEMI_MAJOR_AXIS_M, SEMI_MINOR_AXIS_M, VINCENTY_MAX_ITERATIONS,
        VINCENTY_TOLERANCE,
    },
    error::Error,
    position::Position,
};

/// Inverse solution output
#[derive(Debug, Copy, Clone)]
struct Inverse {
    /// Ellipsoidal distance [m]
    distance_m: f64,
    /// Initial bearing [°] in [0, 360)
    initial_bearing_deg: f64,
}

/// Ellipsoidal distance between `p1` and `p2` in meters.
/// Returns 0 for identical points.
pub fn distance(p1: &Position, p2: &Position) -> Result<f64, Error> {
    if p1 == p2 {
        return Ok(0.0);
    }
    Ok(inverse(p1, p2)?.distance_m)
}

/// Initial bearing from `p1` towards `p2` in degrees, within [0, 360).
pub fn course(p1: &Position, p2: &Position) -> Result<f64, Error> {
    Ok(inverse(p1, p2)?.initial_bearing_deg)
}

/// [Position] reached from `p1` travelling `distance_m` along `bearing_deg`.
pub fn destination(p1: &Position, bearing_deg: f64, distance_m: f64) -> Result<Position, Error> {
    direct(p1, bearing_deg, distance_m)
}

fn normalize_bearing(deg: f64) -> f64 {
    let deg = deg.rem_euclid(360.0);
    // rem_euclid may round up to the modulus itself
    if deg >= 360.0 {
        0.0
    } else {
        deg
    }
}

fn inverse(p1: &Position, p2: &Position) -> Result<Inverse, Error> {
    let (a, b, f) = (SEMI_MAJOR_AXIS_M, SEMI_MINOR_AXIS_M, FLATTENING);

    let l = (p2.longitude - p1.longitude).to_radians();
    let u1 = ((1.0 - f) * p1.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - f) * p2.latitude.to_radians().tan()).atan();

    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut converged = false;

    let (mut sin_sigma, mut cos_sigma, mut sigma) = (0.0_f64, 0.0_f64, 0.0_f64);
    let (mut cos_sq_alpha, mut cos_2sigma_m) = (0.0_f64, 0.0_f64);
    let (mut sin_lambda, mut cos_lambda) = (0.0_f64, 0.0_f64);

    for _ in 0..VINCENTY_MAX_ITERATIONS {
        (sin_lambda, cos_lambda) = lambda.sin_cos();

        sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();

        if sin_sigma == 0.0 {
            // coincident points
            return Ok(Inverse {
                distance_m: 0.0,
                initial_bearing_deg: 0.0,
            });
        }

        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;

        cos_2sigma_m = cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha;
        if cos_2sigma_m.is_nan() {
            // equatorial line
            cos_2sigma_m = 0.0;
        }

        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;

        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - previous).abs() < VINCENTY_TOLERANCE {
            converged = true;
            break;
        }
    }

    if !converged {
        return Err(Error::IterationLimitExceeded);
    }

    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

    let distance_m = b * big_a * (sigma - delta_sigma);

    let alpha1 = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);

    Ok(Inverse {
        distance_m,
        initial_bearing_deg: normalize_bearing(alpha1.to_degrees()),
    })
}

fn direct(p1: &Position, bearing_deg: f64, distance_m: f64) -> Result<Position, Error> {
    let (a, b, f) = (SEMI_MAJOR_AXIS_M, SEMI_MINOR_AXIS_M, FLATTENING);

    let alpha1 = bearing_deg.to_radians();
    let (sin_alpha1, cos_alpha1) = alpha1.sin_cos();

    let tan_u1 = (1.0 - f) * p1.latitude.to_radians().tan();
    let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
    let sin_u1 = tan_u1 * cos_u1;

    let sigma1 = tan_u1.atan2(cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;

    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let mut sigma = distance_m / (b * big_a);
    let mut converged = false;

    let (mut sin_sigma, mut cos_sigma, mut cos_2sigma_m) = (0.0_f64, 0.0_f64, 0.0_f64);

    for _ in 0..VINCENTY_MAX_ITERATIONS {
        cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        (sin_sigma, cos_sigma) = sigma.sin_cos();

        let delta_sigma = big_b
            * sin_sigma
            * (cos_2sigma_m
                + big_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                        - big_b / 6.0
                            * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

        let previous = sigma;
        sigma = distance_m / (b * big_a) + delta_sigma;

        if (sigma - previous).abs() < VINCENTY_TOLERANCE {
            converged = true;
            break;
        }
    }

    if !converged {
        return Err(Error::IterationLimitExceeded);
    }

    // refresh the trigonometric terms with the converged σ
    cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
    (sin_sigma, cos_sigma) = sigma.sin_cos();

    let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;

    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
        .atan2((1.0 - f) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());

    let lambda =
        (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);

    let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));

    let l = lambda
        - (1.0 - c)
            * f
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

    let lon2 = (p1.longitude.to_radians() + l + 3.0 * std::f64::consts::PI)
        .rem_euclid(2.0 * std::f64::consts::PI)
        - std::f64::consts::PI;

    Ok(Position::new(lat2.to_degrees(), lon2.to_degrees()))
}
