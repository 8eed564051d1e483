//! Session statistics
#[cfg(feature = "serde")]
use serde::Serialize;

use hifitime::{Duration, Epoch};
use log::warn;

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    constants::meters_to_nm,
    decode,
    export::Track,
    geodesy,
    position::Position,
    reader::{Frame, Payload},
    report::Report,
};

/// Number of 1 NM bins of the receiver distance histogram
pub const DISTANCE_BINS: usize = 300;

/// Maximal reception range at one bearing
#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RangeEntry {
    /// Maximal distance [NM]
    pub distance_nm: f64,
    /// Label of the track that reached it
    pub aircraft: String,
}

/// Counters and histograms accumulated over a whole session
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Statistics {
    /// Every frame
    pub surveillance: u64,
    /// Mode S and Mode A/C frames
    pub transponder: u64,
    /// Mode S frames (short and long)
    pub mode_s: u64,
    /// DF17 frames
    pub extended_squitter: u64,
    /// DF17 frames per type code
    pub type_codes: [u64; 32],
    /// Qualifying tracks
    pub tracks: u64,
    /// Receiver distance histogram, 1 NM bins, last bin collects everything beyond
    pub distances: Vec<u64>,
    /// Maximal range per 1° bearing sector
    pub range: Vec<RangeEntry>,
    /// First frame time
    pub first: Option<Epoch>,
    /// Last frame time
    pub last: Option<Epoch>,
    /// Largest interval between two consecutive frames
    pub max_gap: Duration,
    /// Distance percentile of the report
    pub percentile: f64,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            surveillance: 0,
            transponder: 0,
            mode_s: 0,
            extended_squitter: 0,
            type_codes: [0; 32],
            tracks: 0,
            distances: vec![0; DISTANCE_BINS],
            range: vec![RangeEntry::default(); 360],
            first: None,
            last: None,
            max_gap: Duration::ZERO,
            percentile: 0.95,
        }
    }
}

impl Statistics {
    /// Builds [Statistics] reporting the `p` distance percentile.
    pub fn with_percentile(p: f64) -> Self {
        Self {
            percentile: p,
            ..Default::default()
        }
    }

    /// Accounts for one received [Frame].
    pub fn count_frame(&mut self, frame: &Frame) {
        self.surveillance += 1;
        self.transponder += 1;

        if let Payload::ModeS(bytes) = &frame.payload {
            self.mode_s += 1;
            if let Some(type_code) = decode::type_code(bytes) {
                self.extended_squitter += 1;
                self.type_codes[type_code as usize] += 1;
            }
        }

        self.count_time(frame.t);
    }

    /// Accounts for one decoded [Report], received as a DF17 frame.
    pub fn count_report(&mut self, report: &Report) {
        self.surveillance += 1;
        self.transponder += 1;
        self.mode_s += 1;
        self.extended_squitter += 1;
        if let Some(count) = self.type_codes.get_mut(report.type_code as usize) {
            *count += 1;
        }
        self.count_time(report.t);
    }

    fn count_time(&mut self, t: Epoch) {
        if self.first.is_none() {
            self.first = Some(t);
        }
        if let Some(last) = self.last {
            let gap = t - last;
            if gap > self.max_gap {
                self.max_gap = gap;
            }
        }
        self.last = Some(t);
    }

    /// Accounts for one qualifying [Track]. Distances are measured from
    /// `receiver`, or taken from each point when the receiver is unknown.
    pub fn add_track(&mut self, track: &Track, receiver: Option<Position>) {
        self.tracks += 1;
        let label = track.label();

        for fix in track.points.iter().filter_map(|point| point.position.value()) {
            let geometry = receiver.and_then(|receiver| {
                match (
                    geodesy::distance(&receiver, &fix.position),
                    geodesy::course(&receiver, &fix.position),
                ) {
                    (Ok(distance), Ok(course)) => Some((meters_to_nm(distance), course)),
                    (Err(e), _) | (_, Err(e)) => {
                        warn!("{} - range of {} unknown: {}", track.address, fix.position, e);
                        None
                    },
                }
            });

            let distance_nm = match geometry {
                Some((distance_nm, course)) => {
                    let sector = (course.floor() as usize).min(359);
                    let entry = &mut self.range[sector];
                    if distance_nm > entry.distance_nm {
                        entry.distance_nm = distance_nm;
                        entry.aircraft = label.clone();
                    }
                    distance_nm
                },
                None => fix.receiver_distance_nm,
            };

            let bin = (distance_nm.max(0.0).floor() as usize).min(DISTANCE_BINS - 1);
            self.distances[bin] += 1;
        }
    }

    /// Number of points in the distance histogram
    pub fn distance_count(&self) -> u64 {
        self.distances.iter().sum()
    }

    /// Distance [NM] within which the `p` fraction of all points lie:
    /// upper bound of the first bin where the cumulated count reaches `p`.
    pub fn percentile_nm(&self, p: f64) -> Option<f64> {
        let total = self.distance_count();
        if total == 0 {
            return None;
        }

        let threshold = p.clamp(0.0, 1.0) * total as f64;
        let mut cumulated = 0;
        for (bin, count) in self.distances.iter().enumerate() {
            cumulated += count;
            if cumulated as f64 >= threshold {
                return Some((bin + 1) as f64);
            }
        }
        Some(DISTANCE_BINS as f64)
    }

    /// Overall maximal range and its sector
    pub fn max_range(&self) -> Option<(usize, &RangeEntry)> {
        self.range
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.distance_nm > 0.0)
            .max_by(|(_, a), (_, b)| a.distance_nm.total_cmp(&b.distance_nm))
    }
}

impl Display for Statistics {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        writeln!(f, "Message Counts")?;
        writeln!(f, "Surveillance Messages: {}", self.surveillance)?;
        writeln!(f, "Transponder Messages: {}", self.transponder)?;
        writeln!(f, "Mode S Messages: {}", self.mode_s)?;
        writeln!(f, "Extended Squitter Messages: {}", self.extended_squitter)?;
        writeln!(f)?;

        writeln!(f, "Time")?;
        match (self.first, self.last) {
            (Some(first), Some(last)) => {
                writeln!(f, "First Message: {}", first)?;
                writeln!(f, "Last Message: {}", last)?;
            },
            _ => writeln!(f, "No messages")?,
        }
        writeln!(f, "Maximum Gap: {}", self.max_gap)?;
        writeln!(f)?;

        writeln!(f, "Tracks: {}", self.tracks)?;
        let percent = self.percentile * 100.0;
        match self.percentile_nm(self.percentile) {
            Some(distance) => writeln!(f, "{}% Percentile Distance: {} NM", percent, distance)?,
            None => writeln!(f, "{}% Percentile Distance: unknown", percent)?,
        }
        writeln!(f)?;

        writeln!(f, "ADSB 1090 MHz Messages")?;
        writeln!(f, "Type\tCount")?;
        for (type_code, count) in self.type_codes.iter().enumerate() {
            writeln!(f, "{}\t{}", type_code, count)?;
        }
        writeln!(f)?;

        writeln!(f, "Distance Histogram")?;
        writeln!(f, "distance\tcount")?;
        for (bin, count) in self.distances.iter().enumerate() {
            writeln!(f, "{}\t{}", bin, count)?;
        }
        writeln!(f)?;

        writeln!(f, "Maximum Reception Distance Table")?;
        writeln!(f, "bearing\tdistance\taircraft")?;
        for (bearing, entry) in self.range.iter().enumerate() {
            writeln!(f, "{}\t{}\t{}", bearing, entry.distance_nm, entry.aircraft)?;
        }
        writeln!(f)?;

        match self.max_range() {
            Some((_, entry)) => {
                writeln!(f, "Maximum Reception Distance: {}", entry.distance_nm)?;
                writeln!(f, "Aircraft: {}", entry.aircraft)
            },
            None => {
                writeln!(f, "Maximum Reception Distance: 0")?;
                writeln!(f, "Aircraft: ")
            },
        }
    }
}
