//! Tempo map events: BPM changes and time signatures keyed by tick.

use thiserror::Error;

use crate::song::Tick;

/// A BPM change. The value is stored in thousandths of a BPM, preserving the
/// precision of chart files (`150_000` is 150 BPM).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BpmEvent {
    /// Tick the change takes effect at.
    pub position: Tick,
    /// BPM in thousandths.
    pub bpm: u32,
}

/// A time signature change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSigEvent {
    /// Tick the change takes effect at.
    pub position: Tick,
    /// Beats per measure numerator.
    pub numerator: u32,
    /// Power-of-two denominator.
    pub denominator: u32,
}

/// An error found while validating a sync track.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SyncError {
    /// Events of one kind were not strictly ordered by position.
    #[error("sync events out of order or duplicated at tick {position}")]
    UnsortedEvents {
        /// Tick of the offending event.
        position: Tick,
    },
    /// A BPM event carried a zero BPM.
    #[error("BPM must be positive at tick {position}")]
    ZeroBpm {
        /// Tick of the offending event.
        position: Tick,
    },
    /// A time signature had a zero numerator or a denominator that is not a
    /// power of two.
    #[error("invalid time signature at tick {position}")]
    InvalidTimeSig {
        /// Tick of the offending event.
        position: Tick,
    },
}

/// An immutable, validated record of a chart's BPM and time signature
/// events, both sorted strictly by position.
///
/// If either kind of event is missing at tick 0 the default (120 BPM, 4/4)
/// is synthesised there, so consumers always see a complete map.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncTrack {
    bpms: Vec<BpmEvent>,
    time_sigs: Vec<TimeSigEvent>,
}

impl SyncTrack {
    /// Validates and builds a sync track.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError`] if either event list is not strictly sorted
    /// by position, a BPM is zero, or a time signature has a zero numerator
    /// or a non-power-of-two denominator.
    pub fn new(
        mut bpms: Vec<BpmEvent>,
        mut time_sigs: Vec<TimeSigEvent>,
    ) -> Result<Self, SyncError> {
        for window in bpms.windows(2) {
            if window[1].position <= window[0].position {
                return Err(SyncError::UnsortedEvents {
                    position: window[1].position,
                });
            }
        }
        for window in time_sigs.windows(2) {
            if window[1].position <= window[0].position {
                return Err(SyncError::UnsortedEvents {
                    position: window[1].position,
                });
            }
        }
        if let Some(event) = bpms.iter().find(|event| event.bpm == 0) {
            return Err(SyncError::ZeroBpm {
                position: event.position,
            });
        }
        if let Some(event) = time_sigs
            .iter()
            .find(|event| event.numerator == 0 || !event.denominator.is_power_of_two())
        {
            return Err(SyncError::InvalidTimeSig {
                position: event.position,
            });
        }

        if bpms.first().is_none_or(|event| event.position != 0) {
            bpms.insert(
                0,
                BpmEvent {
                    position: 0,
                    bpm: 120_000,
                },
            );
        }
        if time_sigs.first().is_none_or(|event| event.position != 0) {
            time_sigs.insert(
                0,
                TimeSigEvent {
                    position: 0,
                    numerator: 4,
                    denominator: 4,
                },
            );
        }

        Ok(Self { bpms, time_sigs })
    }

    /// The BPM events, sorted by position.
    #[must_use]
    pub fn bpms(&self) -> &[BpmEvent] {
        &self.bpms
    }

    /// The time signature events, sorted by position.
    #[must_use]
    pub fn time_sigs(&self) -> &[TimeSigEvent] {
        &self.time_sigs
    }

    /// Returns a copy with every BPM scaled by `speed` percent, for the
    /// global speed setting.
    #[must_use]
    pub fn with_speed(&self, speed: u32) -> Self {
        let bpms = self
            .bpms
            .iter()
            .map(|event| BpmEvent {
                position: event.position,
                bpm: (u64::from(event.bpm) * u64::from(speed) / 100) as u32,
            })
            .collect();
        Self {
            bpms,
            time_sigs: self.time_sigs.clone(),
        }
    }
}

impl Default for SyncTrack {
    fn default() -> Self {
        Self {
            bpms: vec![BpmEvent {
                position: 0,
                bpm: 120_000,
            }],
            time_sigs: vec![TimeSigEvent {
                position: 0,
                numerator: 4,
                denominator: 4,
            }],
        }
    }
}
