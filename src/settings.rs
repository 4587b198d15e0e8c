//! Player-skill configuration for the optimiser.

use thiserror::Error;

use crate::song::{Difficulty, Instrument};
use crate::timing::Second;

/// An out-of-range configuration value.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SettingsError {
    /// Squeeze outside [0, 1].
    #[error("squeeze must lie between 0 and 1")]
    SqueezeOutOfRange,
    /// Early whammy outside [0, 1] or above squeeze.
    #[error("early whammy must lie between 0 and squeeze")]
    EarlyWhammyOutOfRange,
    /// Negative lazy whammy.
    #[error("lazy whammy must be greater than or equal to 0")]
    LazyWhammyOutOfRange,
    /// Video lag outside [-0.2 s, 0.2 s].
    #[error("video lag setting unsupported by Clone Hero")]
    VideoLagOutOfRange,
    /// Speed outside [5, 5000] or not a multiple of 5.
    #[error("speed unsupported by Clone Hero")]
    SpeedOutOfRange,
}

/// Configuration for a single optimisation run.
///
/// `squeeze` and `early_whammy` are ratios of the full hit window; the
/// defaults model a perfect player at normal speed. Values are validated at
/// [`ProcessedSong`](crate::processed::ProcessedSong) construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
    /// Hit window scale, in [0, 1].
    pub squeeze: f64,
    /// Fraction of the front-end window during which pre-note whammy counts,
    /// in [0, squeeze].
    pub early_whammy: f64,
    /// Delay after a sustain starts before whammy is counted.
    pub lazy_whammy: Second,
    /// Calibration shift applied to every point position.
    pub video_lag: Second,
    /// Global tempo scale in percent, a multiple of 5 in [5, 5000].
    pub speed: u32,
    /// Difficulty of the track to optimise.
    pub difficulty: Difficulty,
    /// Instrument of the track to optimise.
    pub instrument: Instrument,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            squeeze: 1.0,
            early_whammy: 1.0,
            lazy_whammy: Second::new(0.0),
            video_lag: Second::new(0.0),
            speed: 100,
            difficulty: Difficulty::Expert,
            instrument: Instrument::Guitar,
        }
    }
}

impl Settings {
    /// Checks every value against its documented range.
    ///
    /// # Errors
    ///
    /// Returns the first [`SettingsError`] found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.squeeze) {
            return Err(SettingsError::SqueezeOutOfRange);
        }
        if !(0.0..=1.0).contains(&self.early_whammy) || self.early_whammy > self.squeeze {
            return Err(SettingsError::EarlyWhammyOutOfRange);
        }
        if self.lazy_whammy.value() < 0.0 {
            return Err(SettingsError::LazyWhammyOutOfRange);
        }
        if !(-0.2..=0.2).contains(&self.video_lag.value()) {
            return Err(SettingsError::VideoLagOutOfRange);
        }
        if self.speed < 5 || self.speed > 5000 || self.speed % 5 != 0 {
            return Err(SettingsError::SpeedOutOfRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn squeeze_above_one_is_rejected() {
        let settings = Settings {
            squeeze: 1.2,
            ..Settings::default()
        };

        assert_eq!(settings.validate(), Err(SettingsError::SqueezeOutOfRange));
    }

    #[test]
    fn early_whammy_cannot_exceed_squeeze() {
        let settings = Settings {
            squeeze: 0.5,
            early_whammy: 0.8,
            ..Settings::default()
        };

        assert_eq!(
            settings.validate(),
            Err(SettingsError::EarlyWhammyOutOfRange)
        );
    }

    #[test]
    fn negative_lazy_whammy_is_rejected() {
        let settings = Settings {
            lazy_whammy: Second::new(-0.1),
            ..Settings::default()
        };

        assert_eq!(
            settings.validate(),
            Err(SettingsError::LazyWhammyOutOfRange)
        );
    }

    #[test]
    fn video_lag_is_bounded() {
        let settings = Settings {
            video_lag: Second::new(0.25),
            ..Settings::default()
        };

        assert_eq!(settings.validate(), Err(SettingsError::VideoLagOutOfRange));
    }

    #[test]
    fn speed_must_be_a_multiple_of_five() {
        let settings = Settings {
            speed: 102,
            ..Settings::default()
        };

        assert_eq!(settings.validate(), Err(SettingsError::SpeedOutOfRange));
    }
}
