//! Physical constants and unit conversions

/// WGS84 semi-major axis [m]
pub const SEMI_MAJOR_AXIS_M: f64 = 6378137.0;

/// WGS84 semi-minor axis [m]
pub const SEMI_MINOR_AXIS_M: f64 = 6356752.314245;

/// WGS84 flattening
pub const FLATTENING: f64 = 1.0 / 298.257223563;

/// Vincenty convergence tolerance [rad]
pub const VINCENTY_TOLERANCE: f64 = 1e-13;

/// Vincenty iteration cap
pub const VINCENTY_MAX_ITERATIONS: usize = 25;

/// One nautical mile [m]
pub const METERS_PER_NAUTICAL_MILE: f64 = 1852.0;

/// Feet to meters
pub const FEET_TO_METERS: f64 = 0.3048;

/// CPR resolution: 17 bit encoding
pub const CPR_MAX: f64 = 131072.0;

/// Number of latitude zones of an even CPR frame
pub const CPR_ZONES: f64 = 60.0;

/// Converts meters to nautical miles
pub(crate) fn meters_to_nm(meters: f64) -> f64 {
    meters / METERS_PER_NAUTICAL_MILE
}
