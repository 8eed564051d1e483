#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod aircraft;
mod attribute;
mod cfg;
mod constants;
mod error;
mod fusion;
mod position;
mod report;
mod session;
mod state;
mod statistics;

// public modules
pub mod cpr;
pub mod decode;
pub mod export;
pub mod geodesy;
pub mod reader;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::aircraft::{collapse, Aircraft};
    pub use crate::attribute::Attribute;
    pub use crate::cfg::{Config, FusionOpts, SessionOpts};
    pub use crate::constants::{FEET_TO_METERS, METERS_PER_NAUTICAL_MILE};
    pub use crate::cpr::{CompactPosition, FrameClass, Parity};
    pub use crate::error::Error;
    pub use crate::export::{KmlDirectory, NullSink, Track, TrackDocument, TrackSink};
    pub use crate::fusion::{FusedPosition, PositionStatus};
    pub use crate::position::Position;
    pub use crate::reader::{Frame, LogReader, Payload};
    pub use crate::report::{
        Address, AirbornePosition, AirspeedHeading, EmergencyState, EmergencyStatus,
        EmitterCategory, Identification, Message, ModeBits, OperationalStatus, Report,
        SignedMagnitude, Squawk, SurfacePosition, TargetStateV1, TargetStateV2,
        VelocityOverGround,
    };
    pub use crate::session::Session;
    pub use crate::state::{GroundVelocity, PositionFix, TrackState};
    pub use crate::statistics::{RangeEntry, Statistics, DISTANCE_BINS};
    // re-export
    pub use hifitime::{Duration, Epoch, Unit};
}

// pub export
pub use error::Error;
