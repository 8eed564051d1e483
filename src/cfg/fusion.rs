#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use hifitime::Duration;

fn default_max_pairing_age_s() -> f64 {
    10.0
}

fn default_max_speed_kt() -> f64 {
    1000.0
}

fn default_clock_slack_s() -> f64 {
    10.0
}

fn default_max_receiver_range_nm() -> f64 {
    350.0
}

fn default_initial_envelope_nm() -> f64 {
    250.0
}

fn default_surface_local_check() -> bool {
    true
}

/// Position fusion settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FusionOpts {
    /// Maximal age of the opposite frame for an even/odd pair
    /// to be globally decoded, in seconds.
    #[cfg_attr(feature = "serde", serde(default = "default_max_pairing_age_s"))]
    pub max_pairing_age_s: f64,
    /// Maximal plausible ground speed [kt]
    #[cfg_attr(feature = "serde", serde(default = "default_max_speed_kt"))]
    pub max_speed_kt: f64,
    /// Time tolerance [s] added to the elapsed time when bounding
    /// the distance travelled since the previous position.
    #[cfg_attr(feature = "serde", serde(default = "default_clock_slack_s"))]
    pub clock_slack_s: f64,
    /// Maximal realistic reception range [NM]
    #[cfg_attr(feature = "serde", serde(default = "default_max_receiver_range_nm"))]
    pub max_receiver_range_nm: f64,
    /// Distance bound [NM] used while no previous position exists
    #[cfg_attr(feature = "serde", serde(default = "default_initial_envelope_nm"))]
    pub initial_envelope_nm: f64,
    /// Apply the speed envelope to locally decoded surface positions as well.
    #[cfg_attr(feature = "serde", serde(default = "default_surface_local_check"))]
    pub surface_local_check: bool,
}

impl Default for FusionOpts {
    fn default() -> Self {
        Self {
            max_pairing_age_s: default_max_pairing_age_s(),
            max_speed_kt: default_max_speed_kt(),
            clock_slack_s: default_clock_slack_s(),
            max_receiver_range_nm: default_max_receiver_range_nm(),
            initial_envelope_nm: default_initial_envelope_nm(),
            surface_local_check: default_surface_local_check(),
        }
    }
}

impl FusionOpts {
    /// Pairing window as [Duration]
    pub fn max_pairing_age(&self) -> Duration {
        Duration::from_seconds(self.max_pairing_age_s)
    }

    /// Maximal distance [NM] an aircraft may have travelled after `elapsed`.
    pub fn envelope_nm(&self, elapsed: Duration) -> f64 {
        (elapsed.to_seconds() + self.clock_slack_s) / 3600.0 * self.max_speed_kt
    }
}
