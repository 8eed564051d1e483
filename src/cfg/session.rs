#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use hifitime::Duration;

fn default_inactivity_timeout_s() -> f64 {
    300.0
}

fn default_min_track_points() -> usize {
    100
}

fn default_export_tracks() -> bool {
    true
}

fn default_percentile() -> f64 {
    0.95
}

/// Fleet session settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionOpts {
    /// An aircraft that has not been updated for this long [s]
    /// is retired and its track flushed.
    #[cfg_attr(feature = "serde", serde(default = "default_inactivity_timeout_s"))]
    pub inactivity_timeout_s: f64,
    /// Minimal number of collapsed points for a track to qualify
    #[cfg_attr(feature = "serde", serde(default = "default_min_track_points"))]
    pub min_track_points: usize,
    /// Hand qualifying tracks over to the export sink
    #[cfg_attr(feature = "serde", serde(default = "default_export_tracks"))]
    pub export_tracks: bool,
    /// Receiver distance percentile reported in the statistics
    #[cfg_attr(feature = "serde", serde(default = "default_percentile"))]
    pub percentile: f64,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            inactivity_timeout_s: default_inactivity_timeout_s(),
            min_track_points: default_min_track_points(),
            export_tracks: default_export_tracks(),
            percentile: default_percentile(),
        }
    }
}

impl SessionOpts {
    /// Inactivity timeout as [Duration]
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_seconds(self.inactivity_timeout_s)
    }
}
