//! Position fusion: pairs CPR frames and validates the decoded positions
use hifitime::{Duration, Epoch};
use log::{debug, warn};

use crate::{
    cfg::FusionOpts,
    constants::meters_to_nm,
    cpr::{self, CompactPosition, Parity},
    geodesy,
    position::Position,
};

#[derive(Debug, Copy, Clone, PartialEq)]
struct CachedFrame {
    cpr: CompactPosition,
    t: Epoch,
}

/// Latest even and latest odd frame of one report class
#[derive(Debug, Default, Clone, PartialEq)]
struct FrameCache {
    even: Option<CachedFrame>,
    odd: Option<CachedFrame>,
}

impl FrameCache {
    fn insert(&mut self, cpr: CompactPosition, t: Epoch) {
        let frame = Some(CachedFrame { cpr, t });
        match cpr.parity {
            Parity::Even => self.even = frame,
            Parity::Odd => self.odd = frame,
        }
    }

    /// Returns (even, odd) pair formed by `latest` and the cached
    /// opposite frame, if the latter is recent enough.
    fn pair(
        &self,
        latest: &CompactPosition,
        t: Epoch,
        max_age: Duration,
    ) -> Option<(CompactPosition, CompactPosition)> {
        let opposite = match latest.parity {
            Parity::Even => self.odd,
            Parity::Odd => self.even,
        }?;

        if t - opposite.t >= max_age {
            return None;
        }

        match latest.parity {
            Parity::Even => Some((*latest, opposite.cpr)),
            Parity::Odd => Some((opposite.cpr, *latest)),
        }
    }
}

/// Type of the currently resolved position. Sticky until overwritten.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PositionStatus {
    /// Nothing resolved yet
    #[default]
    Unknown,
    /// Resolved from airborne position reports
    Airborne,
    /// Resolved from surface position reports
    Surface,
}

/// [FusedPosition] is the per aircraft position resolver. It caches the latest
/// even and odd frames (airborne and surface separately) and only accepts
/// physically plausible positions.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedPosition {
    opts: FusionOpts,
    resolved: Option<(Position, Epoch)>,
    status: PositionStatus,
    airborne: FrameCache,
    surface: FrameCache,
    receiver: Option<Position>,
}

impl Default for FusedPosition {
    fn default() -> Self {
        Self::new(FusionOpts::default())
    }
}

impl FusedPosition {
    /// Builds new [FusedPosition] resolver.
    pub fn new(opts: FusionOpts) -> Self {
        Self {
            opts,
            resolved: None,
            status: PositionStatus::Unknown,
            airborne: FrameCache::default(),
            surface: FrameCache::default(),
            receiver: None,
        }
    }

    /// Latest accepted [Position]
    pub fn position(&self) -> Option<Position> {
        self.resolved.map(|(position, _)| position)
    }

    /// Time of the latest accepted [Position]
    pub fn timestamp(&self) -> Option<Epoch> {
        self.resolved.map(|(_, t)| t)
    }

    /// [PositionStatus] of the latest accepted position
    pub fn status(&self) -> PositionStatus {
        self.status
    }

    pub fn is_airborne(&self) -> bool {
        self.status == PositionStatus::Airborne
    }

    pub fn is_surface(&self) -> bool {
        self.status == PositionStatus::Surface
    }

    /// Receiver [Position], used for range checks and surface disambiguation.
    pub fn receiver(&self) -> Option<Position> {
        self.receiver
    }

    pub fn set_receiver(&mut self, receiver: Option<Position>) {
        self.receiver = receiver;
    }

    /// Distance [NM] between two positions. Failures are
    /// reported as infinitely far, so any bound rejects them.
    fn distance_nm(from: &Position, to: &Position) -> f64 {
        match geodesy::distance(from, to) {
            Ok(meters) => meters_to_nm(meters),
            Err(e) => {
                warn!("distance {} -> {}: {}", from, to, e);
                f64::MAX
            },
        }
    }

    /// Speed envelope: the candidate must lie within reach of the previous position.
    fn within_envelope(&self, candidate: &Position, t: Epoch) -> bool {
        let (envelope_nm, distance_nm) = match self.resolved {
            Some((previous, previous_t)) => (
                self.opts.envelope_nm(t - previous_t),
                Self::distance_nm(&previous, candidate),
            ),
            None => (self.opts.initial_envelope_nm, 0.0),
        };
        if distance_nm < envelope_nm {
            true
        } else {
            debug!(
                "{} - candidate {} rejected: {:.3} NM from previous position (max {:.3} NM)",
                t, candidate, distance_nm, envelope_nm
            );
            false
        }
    }

    fn within_reception_range(&self, candidate: &Position, t: Epoch) -> bool {
        let distance_nm = match self.receiver {
            Some(receiver) => Self::distance_nm(&receiver, candidate),
            None => 0.0,
        };
        if distance_nm < self.opts.max_receiver_range_nm {
            true
        } else {
            debug!(
                "{} - candidate {} rejected: {:.3} NM from receiver",
                t, candidate, distance_nm
            );
            false
        }
    }

    fn accept(&mut self, position: Position, t: Epoch, status: PositionStatus) -> Position {
        self.resolved = Some((position, t));
        self.status = status;
        position
    }

    /// Updates with a new airborne frame, received at `t`.
    /// Returns the newly accepted [Position], if any.
    /// The frame is cached for later pairing in any case.
    pub fn update_airborne(&mut self, frame: CompactPosition, t: Epoch) -> Option<Position> {
        let accepted = self
            .airborne
            .pair(&frame, t, self.opts.max_pairing_age())
            .and_then(|(even, odd)| cpr::airborne_global(&even, &odd, frame.parity))
            .filter(|candidate| {
                self.within_reception_range(candidate, t) && self.within_envelope(candidate, t)
            })
            .map(|candidate| self.accept(candidate, t, PositionStatus::Airborne));

        self.airborne.insert(frame, t);
        accepted
    }

    /// Updates with a new surface frame, received at `t`.
    /// The first surface position is globally decoded, which requires the
    /// receiver position. Subsequent frames are locally decoded against
    /// the latest resolved position.
    pub fn update_surface(&mut self, frame: CompactPosition, t: Epoch) -> Option<Position> {
        let (resolved, receiver) = (self.resolved, self.receiver);

        let accepted = match resolved {
            None => receiver.and_then(|receiver| {
                let (even, odd) = self.surface.pair(&frame, t, self.opts.max_pairing_age())?;
                let candidate = cpr::surface_global(&even, &odd, frame.parity, &receiver)?;
                Some(self.accept(candidate, t, PositionStatus::Surface))
            }),
            Some((reference, _)) => cpr::surface_local(&frame, &reference)
                .filter(|candidate| {
                    !self.opts.surface_local_check || self.within_envelope(candidate, t)
                })
                .map(|candidate| self.accept(candidate, t, PositionStatus::Surface)),
        };

        self.surface.insert(frame, t);
        accepted
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hifitime::Unit;

    #[test]
    fn pairing_window() {
        let t0 = Epoch::from_gpst_seconds(0.0);
        let mut cache = FrameCache::default();
        let even = CompactPosition::new(Parity::Even, 93000, 51372);
        let odd = CompactPosition::new(Parity::Odd, 74158, 50194);

        assert!(cache.pair(&odd, t0, 10.0 * Unit::Second).is_none());

        cache.insert(even, t0);
        assert!(cache.pair(&even, t0, 10.0 * Unit::Second).is_none());

        let (e, o) = cache
            .pair(&odd, t0 + 9.9 * Unit::Second, 10.0 * Unit::Second)
            .unwrap();
        assert_eq!((e, o), (even, odd));

        assert!(cache
            .pair(&odd, t0 + 10.0 * Unit::Second, 10.0 * Unit::Second)
            .is_none());
    }
}
