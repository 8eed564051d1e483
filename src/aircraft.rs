//! Per aircraft track state machine
use hifitime::Epoch;
use log::{debug, warn};

use crate::{
    cfg::FusionOpts,
    constants::meters_to_nm,
    fusion::FusedPosition,
    geodesy,
    position::Position,
    report::{Address, AirspeedHeading, Message, Report, VelocityOverGround},
    state::{GroundVelocity, PositionFix, TrackState},
};

/// [Aircraft] accumulates the reports of a single address into its
/// current [TrackState], and appends a snapshot to its history
/// every time that state changes.
#[derive(Debug, Clone)]
pub struct Aircraft {
    address: Address,
    state: TrackState,
    history: Vec<TrackState>,
    fusion: FusedPosition,
    last_seen: Option<Epoch>,
}

impl Aircraft {
    /// Builds new [Aircraft]
    pub fn new(address: Address, opts: FusionOpts) -> Self {
        Self {
            address,
            state: TrackState::default(),
            history: Vec::new(),
            fusion: FusedPosition::new(opts),
            last_seen: None,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Current (accumulated) [TrackState]
    pub fn state(&self) -> &TrackState {
        &self.state
    }

    /// Snapshot history, oldest first
    pub fn history(&self) -> &[TrackState] {
        &self.history
    }

    /// Position resolver of this aircraft
    pub fn fusion(&self) -> &FusedPosition {
        &self.fusion
    }

    /// Reception time of the latest report
    pub fn last_seen(&self) -> Option<Epoch> {
        self.last_seen
    }

    /// Activity time used for retirement: latest attribute update,
    /// or latest reception when no attribute was ever set.
    pub fn updated_at(&self) -> Option<Epoch> {
        self.state.updated_at().or(self.last_seen)
    }

    /// History reduced to distinct positions, see [collapse].
    pub fn collapsed(&self) -> Vec<TrackState> {
        collapse(&self.history)
    }

    /// Applies a [Report] addressed to this aircraft.
    pub fn update(&mut self, report: &Report) {
        let t = report.t;

        self.last_seen = Some(t);
        self.fusion.set_receiver(report.receiver);

        match &report.message {
            Message::AirbornePosition(airborne) => {
                if let Some(position) = self.fusion.update_airborne(airborne.cpr, t) {
                    self.set_fix(position, true, t);
                }
                if self.fusion.position().is_some() {
                    if let Some(altitude) = airborne.altitude_ft {
                        self.state.altitude.set(altitude, t);
                    }
                }
            },
            Message::SurfacePosition(surface) => {
                if let Some(position) = self.fusion.update_surface(surface.cpr, t) {
                    self.set_fix(position, false, t);
                }
            },
            Message::VelocityOverGround(velocity) => self.apply_ground_velocity(velocity, t),
            Message::AirspeedHeading(airspeed) => self.apply_airspeed_heading(airspeed, t),
            Message::Identification(identification) => {
                self.state
                    .identification
                    .set(identification.callsign.clone(), t);
                self.state
                    .emitter_category
                    .set(identification.category, t);
            },
            Message::EmergencyStatus(status) => {
                self.state.emergency.set(status.state, t);
                self.state.squawk.set(status.squawk, t);
            },
            Message::TargetStateV1(target) => {
                if let Some(altitude) = target.target_altitude_ft {
                    self.state.target_altitude.set(altitude, t);
                }
                if let Some(heading) = target.target_heading_deg {
                    self.state.target_heading.set(heading, t);
                }
            },
            Message::TargetStateV2(target) => {
                if let Some(altitude) = target.selected_altitude_ft {
                    self.state.selected_altitude.set(altitude, t);
                }
                if let Some(heading) = target.selected_heading_deg {
                    self.state.selected_heading.set(heading, t);
                }
                if let Some(pressure) = target.barometric_pressure_mb {
                    self.state.barometric_pressure.set(pressure, t);
                }
                if let Some(bits) = target.mode_bits {
                    self.state.mode_bits.set(bits, t);
                }
            },
            Message::ResolutionAdvisory(_)
            | Message::AirborneOperationalStatus(_)
            | Message::SurfaceOperationalStatus(_)
            | Message::SurfaceSystemStatus
            | Message::Unknown => {
                debug!(
                    "{} ({}) - type code {}: not tracked",
                    t, self.address, report.type_code
                );
            },
        }

        self.snapshot();
    }

    fn apply_ground_velocity(&mut self, velocity: &VelocityOverGround, t: Epoch) {
        if let (Some(east_west), Some(north_south)) = (velocity.east_west, velocity.north_south) {
            let ground = GroundVelocity::from_components(
                east_west.value() as f64,
                north_south.value() as f64,
            );
            self.state.ground_velocity.set(ground, t);
        }
        if let Some(rate) = velocity.vertical_rate {
            self.state.vertical_rate.set(rate.value(), t);
        }
        if let Some(difference) = velocity.height_difference {
            self.state.height_difference.set(difference.value(), t);
        }
    }

    fn apply_airspeed_heading(&mut self, airspeed: &AirspeedHeading, t: Epoch) {
        if let Some(speed) = airspeed.airspeed_kt {
            self.state.airspeed.set(speed, t);
        }
        if let Some(heading) = airspeed.heading_deg {
            self.state.heading.set(heading, t);
        }
        if let Some(rate) = airspeed.vertical_rate {
            self.state.vertical_rate.set(rate.value(), t);
        }
        if let Some(difference) = airspeed.height_difference {
            self.state.height_difference.set(difference.value(), t);
        }
    }

    fn set_fix(&mut self, position: Position, airborne: bool, t: Epoch) {
        let (receiver_distance_nm, receiver_bearing_deg) = match self.fusion.receiver() {
            Some(receiver) => {
                match (
                    geodesy::distance(&receiver, &position),
                    geodesy::course(&receiver, &position),
                ) {
                    (Ok(distance), Ok(course)) => (meters_to_nm(distance), course),
                    _ => {
                        warn!(
                            "{} ({}) - receiver geometry unknown for {}",
                            t, self.address, position
                        );
                        (0.0, 0.0)
                    },
                }
            },
            None => (0.0, 0.0),
        };

        self.state.position.set(
            PositionFix {
                position,
                airborne,
                receiver_distance_nm,
                receiver_bearing_deg,
            },
            t,
        );
    }

    /// Appends a snapshot if the current state differs from the latest one.
    fn snapshot(&mut self) {
        let changed = match self.history.last() {
            Some(latest) => *latest != self.state,
            None => !self.state.is_empty(),
        };
        if changed {
            self.history.push(self.state.clone());
        }
    }
}

/// Retains the snapshots that have both a position and an altitude,
/// and whose position differs from the previously retained one.
pub fn collapse(history: &[TrackState]) -> Vec<TrackState> {
    let mut collapsed: Vec<TrackState> = Vec::with_capacity(history.len());
    let mut previous: Option<Position> = None;

    for state in history.iter() {
        if !state.altitude.is_set() {
            continue;
        }
        let Some(position) = state.location() else {
            continue;
        };
        if previous != Some(position) {
            collapsed.push(state.clone());
            previous = Some(position);
        }
    }

    collapsed
}
