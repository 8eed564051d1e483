//! Compact Position Reporting
//!
//! Global decoding resolves an even/odd pair of frames, local decoding
//! resolves a single frame against a nearby reference. Surface frames
//! only span 90° of latitude and longitude, the resulting ambiguity is
//! lifted using a reference position (the receiver).
use itertools::iproduct;
use log::warn;

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    constants::{CPR_MAX, CPR_ZONES},
    geodesy,
    position::Position,
};

mod nl;

pub use nl::nl;

/// CPR frame [Parity]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Parity {
    /// Even frames use 60 latitude zones
    #[default]
    Even,
    /// Odd frames use 59 latitude zones
    Odd,
}

impl Parity {
    fn index(&self) -> f64 {
        match self {
            Self::Even => 0.0,
            Self::Odd => 1.0,
        }
    }

    /// Returns opposite [Parity]
    pub fn opposite(&self) -> Self {
        match self {
            Self::Even => Self::Odd,
            Self::Odd => Self::Even,
        }
    }
}

impl Display for Parity {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Even => write!(f, "even"),
            Self::Odd => write!(f, "odd"),
        }
    }
}

/// Type of position report
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameClass {
    /// Airborne frames cover 360°
    Airborne,
    /// Surface frames cover 90°
    Surface,
}

impl FrameClass {
    fn span(&self) -> f64 {
        match self {
            Self::Airborne => 360.0,
            Self::Surface => 90.0,
        }
    }
}

/// Encoded position carried by a single position report
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CompactPosition {
    /// Frame [Parity]
    pub parity: Parity,
    /// 17 bit encoded latitude
    pub latitude: u32,
    /// 17 bit encoded longitude
    pub longitude: u32,
}

impl CompactPosition {
    /// Builds new [CompactPosition]
    pub fn new(parity: Parity, latitude: u32, longitude: u32) -> Self {
        Self {
            parity,
            latitude,
            longitude,
        }
    }

    /// Zero is the reserved "no data" marker
    fn is_available(&self) -> bool {
        self.latitude != 0 && self.longitude != 0
    }

    fn y(&self) -> f64 {
        self.latitude as f64 / CPR_MAX
    }

    fn x(&self) -> f64 {
        self.longitude as f64 / CPR_MAX
    }
}

/// Floored modulo, result has the sign of `y`
fn modulo(x: f64, y: f64) -> f64 {
    x - y * (x / y).floor()
}

/// Wraps a longitude into [-180, 180)
fn normalize_longitude(longitude: f64) -> f64 {
    modulo(longitude + 180.0, 360.0) - 180.0
}

/// Latitude zone width
fn dlat(parity: Parity, span: f64) -> f64 {
    span / (CPR_ZONES - parity.index())
}

/// Longitude zone width at given latitude
fn dlon(latitude: f64, parity: Parity, span: f64) -> f64 {
    span / (nl(latitude) as f64 - parity.index()).max(1.0)
}

/// Resolves an even/odd pair, returning the raw (not yet normalized in longitude)
/// coordinates of the `latest` frame.
fn resolve_pair(
    even: &CompactPosition,
    odd: &CompactPosition,
    latest: Parity,
    span: f64,
) -> Option<(f64, f64)> {
    if even.parity != Parity::Even || odd.parity != Parity::Odd {
        return None;
    }
    if !even.is_available() || !odd.is_available() {
        return None;
    }

    let (y0, y1) = (even.y(), odd.y());
    let (x0, x1) = (even.x(), odd.x());

    let j = (59.0 * y0 - 60.0 * y1 + 0.5).floor();

    let mut rlat0 = dlat(Parity::Even, span) * (modulo(j, 60.0) + y0);
    let mut rlat1 = dlat(Parity::Odd, span) * (modulo(j, 59.0) + y1);

    // southern hemisphere
    if rlat0 >= 270.0 {
        rlat0 -= 360.0;
    }
    if rlat1 >= 270.0 {
        rlat1 -= 360.0;
    }

    let nl0 = nl(rlat0);
    if nl0 != nl(rlat1) {
        // frames straddle a zone boundary
        return None;
    }

    let nl = nl0 as f64;
    let m = (((nl - 1.0) * x0 - nl * x1) + 0.5).floor();

    let (latitude, ni, x) = match latest {
        Parity::Even => (rlat0, nl.max(1.0), x0),
        Parity::Odd => (rlat1, (nl - 1.0).max(1.0), x1),
    };

    let longitude = (span / ni) * (modulo(m, ni) + x);

    if latitude.is_finite() && longitude.is_finite() {
        Some((latitude, longitude))
    } else {
        None
    }
}

/// Globally decodes an airborne even/odd pair, returning the
/// position of the `latest` frame. Returns None for frame type
/// mismatch, missing data or a pair spread over two zone counts.
pub fn airborne_global(
    even: &CompactPosition,
    odd: &CompactPosition,
    latest: Parity,
) -> Option<Position> {
    let (latitude, longitude) = resolve_pair(even, odd, latest, FrameClass::Airborne.span())?;
    Some(Position::new(latitude, normalize_longitude(longitude)))
}

/// Globally decodes a surface even/odd pair. Among the eight
/// candidate solutions, the one closest to `reference` is retained.
pub fn surface_global(
    even: &CompactPosition,
    odd: &CompactPosition,
    latest: Parity,
    reference: &Position,
) -> Option<Position> {
    let (latitude, longitude) = resolve_pair(even, odd, latest, FrameClass::Surface.span())?;

    iproduct!([latitude, latitude - 90.0], [0.0, 90.0, 180.0, 270.0])
        .map(|(lat, offset)| Position::new(lat, normalize_longitude(longitude + offset)))
        .filter_map(|candidate| match geodesy::distance(reference, &candidate) {
            Ok(distance) => Some((candidate, distance)),
            Err(e) => {
                warn!("surface candidate {} rejected: {}", candidate, e);
                None
            },
        })
        .min_by(|(_, d1), (_, d2)| d1.total_cmp(d2))
        .map(|(candidate, _)| candidate)
}

fn local(cpr: &CompactPosition, reference: &Position, class: FrameClass) -> Option<Position> {
    if !cpr.is_available() {
        return None;
    }

    let span = class.span();
    let (y, x) = (cpr.y(), cpr.x());

    let dlat = dlat(cpr.parity, span);
    let j = (reference.latitude / dlat).floor()
        + (0.5 + modulo(reference.latitude, dlat) / dlat - y).floor();
    let latitude = dlat * (j + y);

    let dlon = dlon(latitude, cpr.parity, span);
    let m = (reference.longitude / dlon).floor()
        + (0.5 + modulo(reference.longitude, dlon) / dlon - x).floor();
    let longitude = normalize_longitude(dlon * (m + x));

    let position = Position::new(latitude, longitude);
    if position.is_finite() {
        Some(position)
    } else {
        None
    }
}

/// Locally decodes an airborne frame, `reference` must lie within
/// half a zone of the true position.
pub fn airborne_local(cpr: &CompactPosition, reference: &Position) -> Option<Position> {
    local(cpr, reference, FrameClass::Airborne)
}

/// Locally decodes a surface frame, `reference` must lie within
/// half a (surface) zone of the true position.
pub fn surface_local(cpr: &CompactPosition, reference: &Position) -> Option<Position> {
    local(cpr, reference, FrameClass::Surface)
}

/// Encodes a [Position] into a [CompactPosition] of given [Parity].
pub fn encode(position: &Position, parity: Parity, class: FrameClass) -> CompactPosition {
    let span = class.span();

    let dlat = dlat(parity, span);
    let yz = (CPR_MAX * modulo(position.latitude, dlat) / dlat + 0.5).floor();
    let rlat = dlat * (yz / CPR_MAX + (position.latitude / dlat).floor());

    let dlon = dlon(rlat, parity, span);
    let xz = (CPR_MAX * modulo(position.longitude, dlon) / dlon + 0.5).floor();

    CompactPosition {
        parity,
        latitude: (yz as u32) % CPR_MAX as u32,
        longitude: (xz as u32) % CPR_MAX as u32,
    }
}
