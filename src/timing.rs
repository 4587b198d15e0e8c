//! The three time axes of a chart and conversions between them.
//!
//! A chart position can be expressed in *beats* (tempo-agnostic musical
//! beats, `tick / resolution`), *seconds* (wall clock, depending on the BPM
//! map) or *measures* (weighted by the time signature map). The axes are
//! distinct newtypes so they cannot be mixed by accident; [`TimeConverter`]
//! translates between them with piecewise-linear maps built from a
//! [`SyncTrack`].

use crate::song::sync::SyncTrack;

/// Default BPM in thousandths, used before the first BPM event.
const DEFAULT_BPM: f64 = 120_000.0;
/// Beats per measure in 4/4, used before the first time signature event.
const DEFAULT_BEAT_RATE: f64 = 4.0;
/// Milliseconds per minute; BPMs are stored in thousandths, so dividing a
/// beat count by a stored BPM and multiplying by this yields seconds.
const MS_PER_MINUTE: f64 = 60_000.0;

/// A position on the beat axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Beat(f64);

/// A position on the measure axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measure(f64);

/// A position on the wall-clock axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Second(f64);

macro_rules! impl_axis {
    ($name:ident) => {
        impl $name {
            /// Wraps a raw value.
            #[must_use]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Returns the raw value.
            #[must_use]
            pub const fn value(self) -> f64 {
                self.0
            }
        }

        impl std::ops::Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl std::ops::Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }
    };
}

impl_axis!(Beat);
impl_axis!(Measure);
impl_axis!(Second);

/// A chart position expressed on both musical axes at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Position on the beat axis.
    pub beat: Beat,
    /// Position on the measure axis.
    pub measure: Measure,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct BeatTimestamp {
    beat: f64,
    time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct MeasureTimestamp {
    measure: f64,
    beat: f64,
}

/// Bidirectional converter between beats, seconds and measures.
///
/// Construction walks the BPM and time signature events once, emitting a
/// breakpoint per event; every conversion is then a binary search plus
/// linear interpolation. Beyond the last breakpoint the trailing rate is
/// extrapolated, before the first one the default rate is.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeConverter {
    beat_timestamps: Vec<BeatTimestamp>,
    measure_timestamps: Vec<MeasureTimestamp>,
    last_bpm: f64,
    last_beat_rate: f64,
}

impl TimeConverter {
    /// Builds a converter from a sync track at the given chart resolution.
    ///
    /// The sync track guarantees an event of each kind at tick 0, so both
    /// breakpoint tables are non-empty.
    #[must_use]
    pub fn new(sync_track: &SyncTrack, resolution: u32) -> Self {
        let resolution = f64::from(resolution);

        let mut beat_timestamps = Vec::with_capacity(sync_track.bpms().len());
        let mut last_tick = 0u32;
        let mut last_bpm = DEFAULT_BPM;
        let mut last_time = 0.0;

        for bpm in sync_track.bpms() {
            last_time +=
                f64::from(bpm.position - last_tick) * MS_PER_MINUTE / (resolution * last_bpm);
            beat_timestamps.push(BeatTimestamp {
                beat: f64::from(bpm.position) / resolution,
                time: last_time,
            });
            last_bpm = f64::from(bpm.bpm);
            last_tick = bpm.position;
        }

        let mut measure_timestamps = Vec::with_capacity(sync_track.time_sigs().len());
        let mut last_tick = 0u32;
        let mut last_beat_rate = DEFAULT_BEAT_RATE;
        let mut last_measure = 0.0;

        for ts in sync_track.time_sigs() {
            last_measure += f64::from(ts.position - last_tick) / (resolution * last_beat_rate);
            measure_timestamps.push(MeasureTimestamp {
                measure: last_measure,
                beat: f64::from(ts.position) / resolution,
            });
            last_beat_rate = f64::from(ts.numerator) * DEFAULT_BEAT_RATE / f64::from(ts.denominator);
            last_tick = ts.position;
        }

        Self {
            beat_timestamps,
            measure_timestamps,
            last_bpm,
            last_beat_rate,
        }
    }

    /// Converts a beat position to wall-clock seconds.
    #[must_use]
    pub fn beats_to_seconds(&self, beats: Beat) -> Second {
        let beats = beats.value();
        let index = self
            .beat_timestamps
            .partition_point(|entry| entry.beat < beats);
        Second::new(if index == self.beat_timestamps.len() {
            let back = &self.beat_timestamps[index - 1];
            back.time + (beats - back.beat) * MS_PER_MINUTE / self.last_bpm
        } else if index == 0 {
            let front = &self.beat_timestamps[0];
            front.time - (front.beat - beats) * MS_PER_MINUTE / DEFAULT_BPM
        } else {
            let prev = &self.beat_timestamps[index - 1];
            let next = &self.beat_timestamps[index];
            prev.time + (next.time - prev.time) * (beats - prev.beat) / (next.beat - prev.beat)
        })
    }

    /// Converts wall-clock seconds to a beat position.
    #[must_use]
    pub fn seconds_to_beats(&self, seconds: Second) -> Beat {
        let seconds = seconds.value();
        let index = self
            .beat_timestamps
            .partition_point(|entry| entry.time < seconds);
        Beat::new(if index == self.beat_timestamps.len() {
            let back = &self.beat_timestamps[index - 1];
            back.beat + (seconds - back.time) * self.last_bpm / MS_PER_MINUTE
        } else if index == 0 {
            let front = &self.beat_timestamps[0];
            front.beat - (front.time - seconds) * DEFAULT_BPM / MS_PER_MINUTE
        } else {
            let prev = &self.beat_timestamps[index - 1];
            let next = &self.beat_timestamps[index];
            prev.beat + (next.beat - prev.beat) * (seconds - prev.time) / (next.time - prev.time)
        })
    }

    /// Converts a beat position to a measure position.
    #[must_use]
    pub fn beats_to_measures(&self, beats: Beat) -> Measure {
        let beats = beats.value();
        let index = self
            .measure_timestamps
            .partition_point(|entry| entry.beat < beats);
        Measure::new(if index == self.measure_timestamps.len() {
            let back = &self.measure_timestamps[index - 1];
            back.measure + (beats - back.beat) / self.last_beat_rate
        } else if index == 0 {
            let front = &self.measure_timestamps[0];
            front.measure - (front.beat - beats) / DEFAULT_BEAT_RATE
        } else {
            let prev = &self.measure_timestamps[index - 1];
            let next = &self.measure_timestamps[index];
            prev.measure
                + (next.measure - prev.measure) * (beats - prev.beat) / (next.beat - prev.beat)
        })
    }

    /// Converts a measure position to a beat position.
    #[must_use]
    pub fn measures_to_beats(&self, measures: Measure) -> Beat {
        let measures = measures.value();
        let index = self
            .measure_timestamps
            .partition_point(|entry| entry.measure < measures);
        Beat::new(if index == self.measure_timestamps.len() {
            let back = &self.measure_timestamps[index - 1];
            back.beat + (measures - back.measure) * self.last_beat_rate
        } else if index == 0 {
            let front = &self.measure_timestamps[0];
            front.beat - (front.measure - measures) * DEFAULT_BEAT_RATE
        } else {
            let prev = &self.measure_timestamps[index - 1];
            let next = &self.measure_timestamps[index];
            prev.beat
                + (next.beat - prev.beat) * (measures - prev.measure)
                    / (next.measure - prev.measure)
        })
    }

    /// Converts a measure position to wall-clock seconds.
    #[must_use]
    pub fn measures_to_seconds(&self, measures: Measure) -> Second {
        self.beats_to_seconds(self.measures_to_beats(measures))
    }

    /// Converts wall-clock seconds to a measure position.
    #[must_use]
    pub fn seconds_to_measures(&self, seconds: Second) -> Measure {
        self.beats_to_measures(self.seconds_to_beats(seconds))
    }

    /// Resolves a beat into a [`Position`] on both musical axes.
    #[must_use]
    pub fn position_of(&self, beat: Beat) -> Position {
        Position {
            beat,
            measure: self.beats_to_measures(beat),
        }
    }

    /// Beats of every time signature breakpoint, for piecewise integration
    /// over the measure axis.
    pub(crate) fn measure_breakpoints(&self) -> impl Iterator<Item = f64> + '_ {
        self.measure_timestamps.iter().map(|entry| entry.beat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::sync::{BpmEvent, TimeSigEvent};

    fn approx(lhs: f64, rhs: f64) {
        assert!((lhs - rhs).abs() < 1e-9, "{lhs} != {rhs}");
    }

    #[test]
    fn default_sync_track_is_120_bpm_four_four() {
        let converter = TimeConverter::new(&SyncTrack::default(), 192);

        approx(converter.beats_to_seconds(Beat::new(2.0)).value(), 1.0);
        approx(converter.seconds_to_beats(Second::new(1.0)).value(), 2.0);
        approx(converter.beats_to_measures(Beat::new(6.0)).value(), 1.5);
        approx(converter.measures_to_beats(Measure::new(1.5)).value(), 6.0);
    }

    #[test]
    fn bpm_changes_partition_the_second_axis() {
        let sync_track = SyncTrack::new(
            vec![
                BpmEvent {
                    position: 0,
                    bpm: 150_000,
                },
                BpmEvent {
                    position: 768,
                    bpm: 200_000,
                },
            ],
            vec![],
        )
        .unwrap();
        let converter = TimeConverter::new(&sync_track, 192);

        approx(converter.beats_to_seconds(Beat::new(1.0)).value(), 0.4);
        approx(converter.beats_to_seconds(Beat::new(4.0)).value(), 1.6);
        // Past the last event the trailing BPM is extrapolated.
        approx(converter.beats_to_seconds(Beat::new(5.0)).value(), 1.9);
        approx(converter.seconds_to_beats(Second::new(1.9)).value(), 5.0);
    }

    #[test]
    fn time_signatures_partition_the_measure_axis() {
        let sync_track = SyncTrack::new(
            vec![],
            vec![TimeSigEvent {
                position: 768,
                numerator: 3,
                denominator: 4,
            }],
        )
        .unwrap();
        let converter = TimeConverter::new(&sync_track, 192);

        approx(converter.beats_to_measures(Beat::new(4.0)).value(), 1.0);
        approx(converter.beats_to_measures(Beat::new(7.0)).value(), 2.0);
        approx(converter.measures_to_beats(Measure::new(2.0)).value(), 7.0);
        approx(converter.measures_to_seconds(Measure::new(1.0)).value(), 2.0);
    }

    #[test]
    fn conversions_round_trip() {
        let sync_track = SyncTrack::new(
            vec![
                BpmEvent {
                    position: 0,
                    bpm: 150_000,
                },
                BpmEvent {
                    position: 384,
                    bpm: 93_000,
                },
            ],
            vec![TimeSigEvent {
                position: 384,
                numerator: 7,
                denominator: 8,
            }],
        )
        .unwrap();
        let converter = TimeConverter::new(&sync_track, 192);

        for i in 0..40 {
            let beat = Beat::new(f64::from(i) * 0.75);
            let through_seconds = converter.seconds_to_beats(converter.beats_to_seconds(beat));
            let through_measures = converter.measures_to_beats(converter.beats_to_measures(beat));
            assert!((through_seconds.value() - beat.value()).abs() < 1e-6);
            assert!((through_measures.value() - beat.value()).abs() < 1e-6);
        }
    }
}
