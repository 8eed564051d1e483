//! Fleet session
use hifitime::Epoch;
use log::{debug, error, info, warn};

use std::{collections::BTreeMap, fmt::Display, io, io::BufRead};

use crate::{
    aircraft::Aircraft,
    cfg::Config,
    decode,
    error::Error,
    export::{NullSink, Track, TrackSink},
    position::Position,
    reader::{Frame, LogReader, Payload},
    report::{Address, Report},
    statistics::Statistics,
};

/// [Session] routes reports to their [Aircraft], retires the aircraft
/// that stopped reporting, and hands their track over to a [TrackSink].
/// Input must be sorted by time.
pub struct Session<S: TrackSink = NullSink> {
    cfg: Config,
    aircraft: BTreeMap<Address, Aircraft>,
    clock: Option<Epoch>,
    receiver: Option<Position>,
    statistics: Statistics,
    sink: S,
}

impl Session<NullSink> {
    /// Builds new [Session] that discards its tracks.
    pub fn new(cfg: Config) -> Self {
        Self::with_sink(cfg, NullSink)
    }
}

impl<S: TrackSink> Session<S> {
    /// Builds new [Session] exporting to `sink`.
    pub fn with_sink(cfg: Config, sink: S) -> Self {
        Self {
            cfg,
            aircraft: BTreeMap::new(),
            clock: None,
            receiver: None,
            statistics: Statistics::with_percentile(cfg.session.percentile),
            sink,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Latest report time
    pub fn clock(&self) -> Option<Epoch> {
        self.clock
    }

    /// Latest receiver [Position]
    pub fn receiver(&self) -> Option<Position> {
        self.receiver
    }

    /// Number of aircraft currently tracked
    pub fn active_aircraft(&self) -> usize {
        self.aircraft.len()
    }

    pub fn aircraft(&self, address: &Address) -> Option<&Aircraft> {
        self.aircraft.get(address)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Processes one log [Frame].
    pub fn ingest_frame(&mut self, frame: &Frame) {
        self.statistics.count_frame(frame);
        self.receiver = Some(frame.receiver);
        self.advance(frame.t);

        if let Payload::ModeS(bytes) = &frame.payload {
            if let Some(report) = decode::decode(frame.t, Some(frame.receiver), bytes) {
                self.route(&report);
            }
        }
    }

    /// Processes one decoded [Report]. A report without receiver
    /// position is attributed to the latest known receiver.
    pub fn ingest(&mut self, report: &Report) {
        self.statistics.count_report(report);
        self.advance(report.t);

        match (report.receiver, self.receiver) {
            (Some(receiver), _) => {
                self.receiver = Some(receiver);
                self.route(report);
            },
            (None, Some(receiver)) => {
                let report = Report {
                    receiver: Some(receiver),
                    ..report.clone()
                };
                self.route(&report);
            },
            (None, None) => self.route(report),
        }
    }

    fn advance(&mut self, t: Epoch) {
        self.clock = Some(t);
        self.trim(t);
    }

    fn route(&mut self, report: &Report) {
        let fusion = self.cfg.fusion;
        self.aircraft
            .entry(report.address)
            .or_insert_with(|| {
                debug!("{} - new aircraft", report.address);
                Aircraft::new(report.address, fusion)
            })
            .update(report);
    }

    /// Retires every aircraft inactive for at least the inactivity timeout at `now`.
    pub fn trim(&mut self, now: Epoch) {
        let timeout = self.cfg.session.inactivity_timeout();
        let retired = self
            .aircraft
            .iter()
            .filter(|(_, aircraft)| match aircraft.updated_at() {
                Some(t) => now - t >= timeout,
                None => true,
            })
            .map(|(address, _)| *address)
            .collect::<Vec<_>>();

        for address in retired {
            if let Some(aircraft) = self.aircraft.remove(&address) {
                self.flush(aircraft);
            }
        }
    }

    /// Retires all aircraft, as if the clock had reached the end of time.
    pub fn finish(&mut self) {
        let aircraft = std::mem::take(&mut self.aircraft);
        for (_, aircraft) in aircraft {
            self.flush(aircraft);
        }
    }

    fn flush(&mut self, aircraft: Aircraft) {
        let track = Track::new(aircraft.address(), aircraft.collapsed());
        if track.len() < self.cfg.session.min_track_points {
            debug!(
                "{} - retired: {} points, not a track",
                track.address,
                track.len()
            );
            return;
        }

        info!("{} - retired: {} points", track.address, track.len());

        if self.cfg.session.export_tracks {
            if let Err(e) = self.sink.export(&track) {
                warn!("{} - export failed: {}", track.address, e);
            }
        }

        self.statistics.add_track(&track, self.receiver);
    }

    /// Processes a whole log. Returns the number of frames, or the first I/O error.
    pub fn process<R: BufRead>(&mut self, reader: R) -> Result<usize, Error> {
        let mut frames = 0;
        for frame in LogReader::new(reader) {
            self.ingest_frame(&frame?);
            frames += 1;
        }
        Ok(frames)
    }

    /// Processes several logs in order. A source that fails to open or read
    /// is reported and abandoned, processing moves on to the next one.
    /// Returns the number of sources processed to completion.
    pub fn process_sources<I, N, R>(&mut self, sources: I) -> usize
    where
        I: IntoIterator<Item = (N, Result<R, io::Error>)>,
        N: Display,
        R: BufRead,
    {
        let mut completed = 0;
        for (name, source) in sources {
            let reader = match source {
                Ok(reader) => reader,
                Err(e) => {
                    error!("{}: {}", name, e);
                    continue;
                },
            };

            info!("processing {}", name);
            match self.process(reader) {
                Ok(frames) => {
                    info!("{}: {} frames", name, frames);
                    completed += 1;
                },
                Err(e) => error!("{}: {}", name, e),
            }
        }
        completed
    }
}
