//! Decoded surveillance reports
#[cfg(feature = "serde")]
use serde::Serialize;

use hifitime::Epoch;

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{cpr::CompactPosition, position::Position};

/// 24 bit ICAO aircraft [Address]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Address(pub u32);

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{:06X}", self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = std::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = u32::from_str_radix(s.trim(), 16)?;
        Ok(Self(value & 0xFF_FFFF))
    }
}

/// Mode A identity code, stored as its 4 octal digits.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Squawk(pub u16);

impl Display for Squawk {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{:04o}", self.0)
    }
}

/// Sign and magnitude pair, as transmitted in velocity messages
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SignedMagnitude {
    /// Sign bit (west, south, descending, below baro...)
    pub negative: bool,
    /// Magnitude, in the unit of the field
    pub magnitude: u16,
}

impl SignedMagnitude {
    pub fn new(negative: bool, magnitude: u16) -> Self {
        Self {
            negative,
            magnitude,
        }
    }

    /// Signed value
    pub fn value(&self) -> i32 {
        if self.negative {
            -(self.magnitude as i32)
        } else {
            self.magnitude as i32
        }
    }
}

/// Aircraft (wake vortex) category
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EmitterCategory {
    NoInformation,
    Light,
    Small,
    Large,
    HighVortexLarge,
    Heavy,
    HighPerformance,
    Rotorcraft,
    Glider,
    LighterThanAir,
    Parachutist,
    Ultralight,
    UnmannedAerialVehicle,
    SpaceVehicle,
    SurfaceEmergencyVehicle,
    SurfaceServiceVehicle,
    PointObstacle,
    ClusterObstacle,
    LineObstacle,
    /// Reserved combination of type code and category
    Reserved { type_code: u8, category: u8 },
}

impl EmitterCategory {
    /// Builds [EmitterCategory] from the identification type code (1..=4)
    /// and its 3 bit category field.
    pub fn from_codes(type_code: u8, category: u8) -> Self {
        match (type_code, category) {
            (_, 0) => Self::NoInformation,
            (4, 1) => Self::Light,
            (4, 2) => Self::Small,
            (4, 3) => Self::Large,
            (4, 4) => Self::HighVortexLarge,
            (4, 5) => Self::Heavy,
            (4, 6) => Self::HighPerformance,
            (4, 7) => Self::Rotorcraft,
            (3, 1) => Self::Glider,
            (3, 2) => Self::LighterThanAir,
            (3, 3) => Self::Parachutist,
            (3, 4) => Self::Ultralight,
            (3, 6) => Self::UnmannedAerialVehicle,
            (3, 7) => Self::SpaceVehicle,
            (2, 1) => Self::SurfaceEmergencyVehicle,
            (2, 2) => Self::SurfaceServiceVehicle,
            (2, 3) => Self::PointObstacle,
            (2, 4) => Self::ClusterObstacle,
            (2, 5) => Self::LineObstacle,
            (type_code, category) => Self::Reserved {
                type_code,
                category,
            },
        }
    }
}

impl Display for EmitterCategory {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::NoInformation => write!(f, "No information"),
            Self::Light => write!(f, "Light"),
            Self::Small => write!(f, "Small"),
            Self::Large => write!(f, "Large"),
            Self::HighVortexLarge => write!(f, "High vortex large"),
            Self::Heavy => write!(f, "Heavy"),
            Self::HighPerformance => write!(f, "High performance"),
            Self::Rotorcraft => write!(f, "Rotorcraft"),
            Self::Glider => write!(f, "Glider / sailplane"),
            Self::LighterThanAir => write!(f, "Lighter than air"),
            Self::Parachutist => write!(f, "Parachutist / skydiver"),
            Self::Ultralight => write!(f, "Ultralight / hang glider / paraglider"),
            Self::UnmannedAerialVehicle => write!(f, "Unmanned aerial vehicle"),
            Self::SpaceVehicle => write!(f, "Space / trans-atmospheric vehicle"),
            Self::SurfaceEmergencyVehicle => write!(f, "Surface emergency vehicle"),
            Self::SurfaceServiceVehicle => write!(f, "Surface service vehicle"),
            Self::PointObstacle => write!(f, "Point obstacle"),
            Self::ClusterObstacle => write!(f, "Cluster obstacle"),
            Self::LineObstacle => write!(f, "Line obstacle"),
            Self::Reserved {
                type_code,
                category,
            } => write!(f, "Reserved ({}/{})", type_code, category),
        }
    }
}

/// Emergency / priority state
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum EmergencyState {
    #[default]
    NoEmergency,
    General,
    Medical,
    MinimumFuel,
    NoCommunications,
    UnlawfulInterference,
    DownedAircraft,
    Reserved,
}

impl From<u8> for EmergencyState {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::NoEmergency,
            1 => Self::General,
            2 => Self::Medical,
            3 => Self::MinimumFuel,
            4 => Self::NoCommunications,
            5 => Self::UnlawfulInterference,
            6 => Self::DownedAircraft,
            _ => Self::Reserved,
        }
    }
}

impl Display for EmergencyState {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::NoEmergency => write!(f, "No emergency"),
            Self::General => write!(f, "General emergency"),
            Self::Medical => write!(f, "Lifeguard / medical"),
            Self::MinimumFuel => write!(f, "Minimum fuel"),
            Self::NoCommunications => write!(f, "No communications"),
            Self::UnlawfulInterference => write!(f, "Unlawful interference"),
            Self::DownedAircraft => write!(f, "Downed aircraft"),
            Self::Reserved => write!(f, "Reserved"),
        }
    }
}

/// Autopilot and navigation mode flags
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModeBits {
    pub autopilot: bool,
    pub vnav: bool,
    pub altitude_hold: bool,
    pub approach: bool,
    pub tcas: bool,
}

/// Airborne position (type codes 9..=18 and 20..=22)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AirbornePosition {
    pub cpr: CompactPosition,
    /// Barometric (or GNSS) altitude [ft]
    pub altitude_ft: Option<i32>,
    /// True when the altitude is GNSS height
    pub gnss_altitude: bool,
}

/// Surface position (type codes 5..=8)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfacePosition {
    pub cpr: CompactPosition,
    /// Ground speed [kt]
    pub movement_kt: Option<f64>,
    /// Ground track [°]
    pub track_deg: Option<f64>,
}

/// Velocity over ground (type code 19, subtypes 1 and 2)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VelocityOverGround {
    /// East (positive) / west (negative) component [kt]
    pub east_west: Option<SignedMagnitude>,
    /// North (positive) / south (negative) component [kt]
    pub north_south: Option<SignedMagnitude>,
    /// Vertical rate [ft/min]
    pub vertical_rate: Option<SignedMagnitude>,
    /// Geometric minus barometric height [ft]
    pub height_difference: Option<SignedMagnitude>,
    pub supersonic: bool,
}

/// Airspeed and heading (type code 19, subtypes 3 and 4)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AirspeedHeading {
    /// Magnetic heading [°]
    pub heading_deg: Option<f64>,
    /// Airspeed [kt]
    pub airspeed_kt: Option<u16>,
    /// True airspeed (otherwise indicated)
    pub true_airspeed: bool,
    /// Vertical rate [ft/min]
    pub vertical_rate: Option<SignedMagnitude>,
    /// Geometric minus barometric height [ft]
    pub height_difference: Option<SignedMagnitude>,
    pub supersonic: bool,
}

/// Identification and category (type codes 1..=4)
#[derive(Debug, Clone, PartialEq)]
pub struct Identification {
    pub callsign: String,
    pub category: EmitterCategory,
}

/// Emergency status (type code 28, subtype 1)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EmergencyStatus {
    pub state: EmergencyState,
    pub squawk: Squawk,
}

/// Operational status (type code 31)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OperationalStatus {
    /// Capability class codes
    pub capability: u16,
    /// Operational mode codes
    pub mode: u16,
    /// ADS-B version number
    pub version: u8,
    /// Navigation accuracy category (position)
    pub nac_p: u8,
    /// Source integrity level
    pub sil: u8,
}

/// Target state and status, version 1 (type code 29, subtype 0)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TargetStateV1 {
    /// Target altitude [ft]
    pub target_altitude_ft: Option<i32>,
    /// Target heading or track [°]
    pub target_heading_deg: Option<f64>,
}

/// Target state and status, version 2 (type code 29, subtype 1)
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TargetStateV2 {
    /// MCP/FCU or FMS selected altitude [ft]
    pub selected_altitude_ft: Option<i32>,
    /// Barometric pressure setting [mb]
    pub barometric_pressure_mb: Option<f64>,
    /// Selected heading [°]
    pub selected_heading_deg: Option<f64>,
    pub mode_bits: Option<ModeBits>,
}

/// ADS-B [Message] content, one variant per message kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Identification(Identification),
    SurfacePosition(SurfacePosition),
    AirbornePosition(AirbornePosition),
    VelocityOverGround(VelocityOverGround),
    AirspeedHeading(AirspeedHeading),
    EmergencyStatus(EmergencyStatus),
    /// TCAS resolution advisory, raw 56 bit content
    ResolutionAdvisory(u64),
    AirborneOperationalStatus(OperationalStatus),
    SurfaceOperationalStatus(OperationalStatus),
    TargetStateV1(TargetStateV1),
    TargetStateV2(TargetStateV2),
    SurfaceSystemStatus,
    /// Reserved or unsupported type code / subtype
    Unknown,
}

/// Decoded extended squitter [Report]
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Reception time
    pub t: Epoch,
    /// Transmitting aircraft
    pub address: Address,
    /// Receiver position at reception time
    pub receiver: Option<Position>,
    /// ADS-B type code (0..=31)
    pub type_code: u8,
    pub message: Message,
}
