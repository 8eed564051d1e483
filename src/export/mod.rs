//! Track export
use hifitime::Epoch;

use crate::{
    constants::FEET_TO_METERS,
    error::Error,
    report::Address,
    state::TrackState,
};

pub mod kml;

pub use kml::KmlDirectory;

/// Collapsed track of one aircraft, handed over when the aircraft retires.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub address: Address,
    /// Collapsed history, oldest first
    pub points: Vec<TrackState>,
}

/// (year, month, day, hour, minute, second) in UTC
fn calendar(t: Epoch) -> (i32, u8, u8, u8, u8, u8) {
    let (y, m, d, hh, mm, ss, _) = t.to_gregorian_utc();
    (y, m, d, hh, mm, ss)
}

impl Track {
    pub fn new(address: Address, points: Vec<TrackState>) -> Self {
        Self { address, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Time of the first point
    pub fn start(&self) -> Option<Epoch> {
        self.points.first().and_then(|point| point.updated_at())
    }

    /// Returns "YYYY-MM-DD-HH-MM-SS.ADDRESS", dated by the first point.
    pub fn label(&self) -> String {
        match self.start().map(calendar) {
            Some((y, m, d, hh, mm, ss)) => format!(
                "{:04}-{:02}-{:02}-{:02}-{:02}-{:02}.{}",
                y, m, d, hh, mm, ss, self.address
            ),
            None => self.address.to_string(),
        }
    }

    /// Returns "YYYY-MM-DD.HH-MM-SS.ADDRESS", dated by the first point.
    pub fn file_stem(&self) -> String {
        match self.start().map(calendar) {
            Some((y, m, d, hh, mm, ss)) => format!(
                "{:04}-{:02}-{:02}.{:02}-{:02}-{:02}.{}",
                y, m, d, hh, mm, ss, self.address
            ),
            None => self.address.to_string(),
        }
    }
}

/// Polyline vertex
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude_m: f64,
}

/// One tabulated attribute of a [PointFeature]
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: &'static str,
    pub value: String,
    /// Age of the attribute at the point time [s]
    pub age_s: f64,
}

/// One collapsed snapshot as a point feature
#[derive(Debug, Clone, PartialEq)]
pub struct PointFeature {
    pub name: String,
    pub vertex: Vertex,
    pub airborne: bool,
    pub properties: Vec<Property>,
}

/// [TrackDocument] is the exported description of a [Track]:
/// ground and airborne polylines, plus one [PointFeature] per point.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackDocument {
    pub name: String,
    pub address: Address,
    pub ground: Vec<Vertex>,
    pub airborne: Vec<Vertex>,
    pub points: Vec<PointFeature>,
}

fn vertex(state: &TrackState) -> Option<(Vertex, bool)> {
    let fix = state.position.value()?;
    let altitude_ft = state.altitude.copied()?;
    Some((
        Vertex {
            longitude: fix.position.longitude,
            latitude: fix.position.latitude,
            altitude_m: altitude_ft as f64 * FEET_TO_METERS,
        },
        fix.airborne,
    ))
}

fn properties(state: &TrackState) -> Vec<Property> {
    let mut properties = Vec::new();
    let Some(t) = state.updated_at() else {
        return properties;
    };

    let mut push = |key: &'static str, value: String, set_at: Epoch| {
        properties.push(Property {
            key,
            value,
            age_s: (t - set_at).to_seconds(),
        })
    };

    if let Some((callsign, set_at)) = state.identification.get() {
        push("Identification", callsign.clone(), set_at);
    }
    if let Some((fix, set_at)) = state.position.get() {
        push("Latitude", fix.position.latitude.to_string(), set_at);
        push("Longitude", fix.position.longitude.to_string(), set_at);
        push("Airborne", fix.airborne.to_string(), set_at);
        push("Receiver Distance", format!("{:.3}", fix.receiver_distance_nm), set_at);
        push("Receiver Bearing", format!("{:.3}", fix.receiver_bearing_deg), set_at);
    }
    if let Some((altitude, set_at)) = state.altitude.get() {
        push("Altitude", altitude.to_string(), set_at);
    }
    if let Some((heading, set_at)) = state.heading.get() {
        push("Heading", heading.to_string(), set_at);
    }
    if let Some((airspeed, set_at)) = state.airspeed.get() {
        push("Air Speed", airspeed.to_string(), set_at);
    }
    if let Some((velocity, set_at)) = state.ground_velocity.get() {
        push("Ground Track", format!("{:.3}", velocity.track_deg), set_at);
        push("Ground Speed", format!("{:.3}", velocity.speed_kt), set_at);
    }
    if let Some((rate, set_at)) = state.vertical_rate.get() {
        push("Vertical Rate", rate.to_string(), set_at);
    }
    if let Some((difference, set_at)) = state.height_difference.get() {
        push("Geometric Height Difference", difference.to_string(), set_at);
    }
    if let Some((category, set_at)) = state.emitter_category.get() {
        push("Emitter Category", category.to_string(), set_at);
    }
    if let Some((emergency, set_at)) = state.emergency.get() {
        push("Emergency State", emergency.to_string(), set_at);
    }
    if let Some((squawk, set_at)) = state.squawk.get() {
        push("Mode A Code", squawk.to_string(), set_at);
    }
    if let Some((altitude, set_at)) = state.target_altitude.get() {
        push("Target Altitude", altitude.to_string(), set_at);
    }
    if let Some((heading, set_at)) = state.target_heading.get() {
        push("Target Heading", heading.to_string(), set_at);
    }
    if let Some((altitude, set_at)) = state.selected_altitude.get() {
        push("Selected Altitude", altitude.to_string(), set_at);
    }
    if let Some((heading, set_at)) = state.selected_heading.get() {
        push("Selected Heading", heading.to_string(), set_at);
    }
    if let Some((pressure, set_at)) = state.barometric_pressure.get() {
        push("Barometric Pressure", format!("{:.1}", pressure), set_at);
    }
    if let Some((bits, set_at)) = state.mode_bits.get() {
        push("Auto Pilot", bits.autopilot.to_string(), set_at);
        push("VNAV Mode", bits.vnav.to_string(), set_at);
        push("Altitude Hold", bits.altitude_hold.to_string(), set_at);
        push("Approach", bits.approach.to_string(), set_at);
        push("TCAS Operational", bits.tcas.to_string(), set_at);
    }

    properties
}

impl From<&Track> for TrackDocument {
    fn from(track: &Track) -> Self {
        let mut ground = Vec::new();
        let mut airborne = Vec::new();
        let mut points = Vec::with_capacity(track.points.len());
        let mut previous: Option<Epoch> = None;

        for (i, state) in track.points.iter().enumerate() {
            let Some((vertex, is_airborne)) = vertex(state) else {
                continue;
            };
            if is_airborne {
                airborne.push(vertex);
            } else {
                ground.push(vertex);
            }

            let t = state.updated_at();
            let name = match (t, previous) {
                (Some(t), Some(previous)) => {
                    format!("{} - {} ({:.0} s)", i, t, (t - previous).to_seconds())
                },
                (Some(t), None) => format!("{} - {}", i, t),
                _ => i.to_string(),
            };
            previous = t;

            points.push(PointFeature {
                name,
                vertex,
                airborne: is_airborne,
                properties: properties(state),
            });
        }

        Self {
            name: track.file_stem(),
            address: track.address,
            ground,
            airborne,
            points,
        }
    }
}

/// [TrackSink] receives every qualifying [Track].
pub trait TrackSink {
    fn export(&mut self, track: &Track) -> Result<(), Error>;
}

/// [TrackSink] that drops everything
#[derive(Default, Debug, Copy, Clone)]
pub struct NullSink;

impl TrackSink for NullSink {
    fn export(&mut self, _: &Track) -> Result<(), Error> {
        Ok(())
    }
}

/// Collects the tracks in memory
impl TrackSink for Vec<Track> {
    fn export(&mut self, track: &Track) -> Result<(), Error> {
        self.push(track.clone());
        Ok(())
    }
}

impl<S: TrackSink + ?Sized> TrackSink for Box<S> {
    fn export(&mut self, track: &Track) -> Result<(), Error> {
        (**self).export(track)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{position::Position, state::PositionFix};
    use hifitime::Unit;

    fn point(t: Epoch, latitude: f64, airborne: bool) -> TrackState {
        let mut state = TrackState::default();
        state.position.set(
            PositionFix {
                position: Position::new(latitude, 4.0),
                airborne,
                receiver_distance_nm: 0.0,
                receiver_bearing_deg: 0.0,
            },
            t,
        );
        state.altitude.set(1000, t - 2.0 * Unit::Second);
        state
    }

    #[test]
    fn track_naming() {
        let t = Epoch::from_gregorian_utc(2019, 6, 1, 13, 5, 9, 0);
        let track = Track::new(Address(0x40621D), vec![point(t, 52.0, true)]);
        assert_eq!(track.label(), "2019-06-01-13-05-09.40621D");
        assert_eq!(track.file_stem(), "2019-06-01.13-05-09.40621D");

        let empty = Track::new(Address(0xABC), vec![]);
        assert_eq!(empty.label(), "000ABC");
    }

    #[test]
    fn document_layout() {
        let t = Epoch::from_gregorian_utc(2019, 6, 1, 13, 5, 9, 0);
        let track = Track::new(
            Address(0x40621D),
            vec![
                point(t, 52.0, false),
                point(t + 1.0 * Unit::Second, 52.1, true),
                point(t + 2.0 * Unit::Second, 52.2, true),
            ],
        );

        let document = TrackDocument::from(&track);
        assert_eq!(document.ground.len(), 1);
        assert_eq!(document.airborne.len(), 2);
        assert_eq!(document.points.len(), 3);
        assert!((document.airborne[0].altitude_m - 304.8).abs() < 1e-9);

        let altitude = document.points[0]
            .properties
            .iter()
            .find(|p| p.key == "Altitude")
            .unwrap();
        assert_eq!(altitude.value, "1000");
        assert_eq!(altitude.age_s, 2.0);
    }
}
