//! Geodetic coordinates
#[cfg(feature = "serde")]
use serde::Serialize;

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{error::Error, geodesy};

/// [Position] on the WGS84 ellipsoid, expressed in decimal degrees.
/// Equality is exact floating point equality.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Position {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
}

impl Position {
    /// Builds new [Position] from latitude and longitude in degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns true if both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Ellipsoidal distance to `rhs` in meters.
    pub fn distance(&self, rhs: &Self) -> Result<f64, Error> {
        geodesy::distance(self, rhs)
    }

    /// Initial bearing towards `rhs` in degrees, within [0, 360).
    pub fn course(&self, rhs: &Self) -> Result<f64, Error> {
        geodesy::course(self, rhs)
    }

    /// [Position] reached after travelling `distance_m` along `bearing_deg`.
    pub fn destination(&self, bearing_deg: f64, distance_m: f64) -> Result<Self, Error> {
        geodesy::destination(self, bearing_deg, distance_m)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "({:.6}°, {:.6}°)", self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for Position {
    fn from(latlon: (f64, f64)) -> Self {
        Self::new(latlon.0, latlon.1)
    }
}
