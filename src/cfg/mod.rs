#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod fusion;
mod session;

pub use fusion::FusionOpts;
pub use session::SessionOpts;

/// Track builder [Config]uration.
/// All fields have defaults, so a partial description deserializes.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Position fusion settings
    #[cfg_attr(feature = "serde", serde(default))]
    pub fusion: FusionOpts,
    /// Fleet session settings
    #[cfg_attr(feature = "serde", serde(default))]
    pub session: SessionOpts,
}

impl Config {
    /// Returns [Config] that reproduces the historical behavior, where
    /// locally decoded surface positions are trusted without any check.
    pub fn unchecked_surface_preset() -> Self {
        let mut s = Self::default();
        s.fusion.surface_local_check = false;
        s
    }

    /// Returns [Config] with given inactivity timeout (in seconds).
    pub fn with_inactivity_timeout(&self, timeout_s: f64) -> Self {
        let mut s = *self;
        s.session.inactivity_timeout_s = timeout_s;
        s
    }

    /// Returns [Config] with given qualifying track size.
    pub fn with_min_track_points(&self, points: usize) -> Self {
        let mut s = *self;
        s.session.min_track_points = points;
        s
    }
}
