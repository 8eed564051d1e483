//! Track snapshots
use hifitime::Epoch;
use nalgebra::Vector2;

use crate::{
    attribute::Attribute,
    position::Position,
    report::{EmergencyState, EmitterCategory, ModeBits, Squawk},
};

/// Accepted position and its geometry relative to the receiver
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionFix {
    pub position: Position,
    pub airborne: bool,
    /// Distance from receiver [NM], zero when unknown
    pub receiver_distance_nm: f64,
    /// Bearing from receiver [°], zero when unknown
    pub receiver_bearing_deg: f64,
}

/// Ground track and speed
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GroundVelocity {
    /// Track angle [°] in [0, 360)
    pub track_deg: f64,
    /// Ground speed [kt]
    pub speed_kt: f64,
}

impl GroundVelocity {
    /// Builds [GroundVelocity] from signed east and north components [kt].
    pub fn from_components(east_kt: f64, north_kt: f64) -> Self {
        let v = Vector2::new(east_kt, north_kt);
        let track_deg = east_kt.atan2(north_kt).to_degrees().rem_euclid(360.0);
        Self {
            track_deg: if track_deg >= 360.0 { 0.0 } else { track_deg },
            speed_kt: v.norm(),
        }
    }
}

/// [TrackState] is the complete set of tracked attributes at one instant.
/// Each attribute carries its own timestamp.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct TrackState {
    /// Callsign
    pub identification: Attribute<String>,
    pub position: Attribute<PositionFix>,
    /// Altitude [ft]
    pub altitude: Attribute<i32>,
    /// Heading [°]
    pub heading: Attribute<f64>,
    /// Airspeed [kt]
    pub airspeed: Attribute<u16>,
    pub ground_velocity: Attribute<GroundVelocity>,
    /// Vertical rate [ft/min]
    pub vertical_rate: Attribute<i32>,
    /// Geometric minus barometric height [ft]
    pub height_difference: Attribute<i32>,
    pub emitter_category: Attribute<EmitterCategory>,
    pub emergency: Attribute<EmergencyState>,
    pub squawk: Attribute<Squawk>,
    /// Target altitude [ft]
    pub target_altitude: Attribute<i32>,
    /// Target heading [°]
    pub target_heading: Attribute<f64>,
    /// Selected altitude [ft]
    pub selected_altitude: Attribute<i32>,
    /// Selected heading [°]
    pub selected_heading: Attribute<f64>,
    /// Barometric pressure setting [mb]
    pub barometric_pressure: Attribute<f64>,
    pub mode_bits: Attribute<ModeBits>,
}

impl TrackState {
    fn timestamps(&self) -> [Option<Epoch>; 17] {
        [
            self.identification.timestamp(),
            self.position.timestamp(),
            self.altitude.timestamp(),
            self.heading.timestamp(),
            self.airspeed.timestamp(),
            self.ground_velocity.timestamp(),
            self.vertical_rate.timestamp(),
            self.height_difference.timestamp(),
            self.emitter_category.timestamp(),
            self.emergency.timestamp(),
            self.squawk.timestamp(),
            self.target_altitude.timestamp(),
            self.target_heading.timestamp(),
            self.selected_altitude.timestamp(),
            self.selected_heading.timestamp(),
            self.barometric_pressure.timestamp(),
            self.mode_bits.timestamp(),
        ]
    }

    /// Most recent attribute update, None if nothing was ever set.
    pub fn updated_at(&self) -> Option<Epoch> {
        self.timestamps()
            .into_iter()
            .flatten()
            .reduce(|latest, t| if t > latest { t } else { latest })
    }

    /// True if no attribute was ever set
    pub fn is_empty(&self) -> bool {
        self.updated_at().is_none()
    }

    /// Accepted [Position], if any
    pub fn location(&self) -> Option<Position> {
        self.position.value().map(|fix| fix.position)
    }

    pub fn is_airborne(&self) -> bool {
        self.position.value().map(|fix| fix.airborne).unwrap_or(false)
    }
}
