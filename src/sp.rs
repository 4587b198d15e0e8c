//! The Star Power meter: how SP is gained and spent.
//!
//! SP is a scalar in [0, 1]. A quarter bar arrives with every completed
//! phrase; whammy on a sustain inside a phrase produces SP continuously
//! while the meter is inactive, and at half rate while it is active. An
//! active meter drains by a full bar every eight measures, so activation
//! length depends on the time signature map.

use itertools::Itertools;

use crate::points::{HIT_WINDOW_SECONDS, adjusted_beat};
use crate::settings::Settings;
use crate::song::notes::NoteTrack;
use crate::timing::{Beat, Second, TimeConverter};

/// SP gained per beat of whammied sustain while the meter is inactive.
pub(crate) const SP_GAIN_RATE: f64 = 1.0 / 30.0;
/// SP granted by completing one phrase.
pub(crate) const SP_PER_PHRASE: f64 = 0.25;
/// Measures one full bar of SP lasts for.
pub(crate) const MEASURES_PER_BAR: f64 = 8.0;
/// Smallest amount of SP an activation can start with.
pub(crate) const MINIMUM_SP_AMOUNT: f64 = 0.5;

/// The whammy schedule of a track: merged beat intervals over which a
/// sustain inside a Star Power phrase can be whammied.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpData {
    /// Half-open `(start, end)` beat intervals, sorted and disjoint.
    ranges: Vec<(f64, f64)>,
}

impl SpData {
    /// Collects the whammyable intervals of a track.
    ///
    /// A sustained note starting inside a phrase contributes its whole
    /// notated length. The front of each interval is widened by the early
    /// whammy allowance, or delayed by the lazy whammy setting instead when
    /// that is non-zero. Overlapping intervals merge.
    #[must_use]
    pub fn new<C>(
        track: &NoteTrack<C>,
        resolution: u32,
        converter: &TimeConverter,
        settings: &Settings,
    ) -> Self {
        let phrases = track.sp_phrases();
        let ranges = track
            .notes()
            .iter()
            .filter(|note| note.length > 0)
            .filter(|note| {
                let index = phrases
                    .partition_point(|phrase| phrase.position + phrase.length <= note.position);
                phrases
                    .get(index)
                    .is_some_and(|phrase| phrase.contains(note.position))
            })
            .filter_map(|note| {
                let note_beat = adjusted_beat(note.position, resolution, converter, settings.video_lag);
                let end_beat = adjusted_beat(
                    note.position + note.length,
                    resolution,
                    converter,
                    settings.video_lag,
                );
                let note_seconds = converter.beats_to_seconds(note_beat).value();
                let start_seconds = if settings.lazy_whammy.value() > 0.0 {
                    note_seconds + settings.lazy_whammy.value()
                } else {
                    note_seconds - HIT_WINDOW_SECONDS * settings.early_whammy
                };
                let start = converter
                    .seconds_to_beats(Second::new(start_seconds))
                    .value();
                (start < end_beat.value()).then_some((start, end_beat.value()))
            })
            .sorted_by(|lhs, rhs| lhs.0.total_cmp(&rhs.0))
            .coalesce(|lhs, rhs| {
                if rhs.0 <= lhs.1 {
                    Ok((lhs.0, lhs.1.max(rhs.1)))
                } else {
                    Err((lhs, rhs))
                }
            })
            .collect();
        Self { ranges }
    }

    /// The merged whammy intervals in beats.
    #[must_use]
    pub fn ranges(&self) -> &[(f64, f64)] {
        &self.ranges
    }

    /// SP obtainable by whammying between two beats, uncapped.
    #[must_use]
    pub fn available_whammy(&self, start: Beat, end: Beat) -> f64 {
        self.coverage(start.value(), end.value()) * SP_GAIN_RATE
    }

    /// Meter level at `at`, accumulating whammy from `from` and the given
    /// phrase grants (sorted beats, each no earlier than `from`), clamped to
    /// one bar. `from` may be negative infinity at the start of a song,
    /// which is what makes pre-song early whammy count.
    #[must_use]
    pub fn sp_at(&self, from: Beat, grants: &[Beat], at: Beat) -> f64 {
        let at = at.value();
        let mut sp: f64 = 0.0;
        let mut cursor = from.value();
        for grant in grants {
            if grant.value() > at {
                break;
            }
            sp = (sp + self.coverage(cursor, grant.value()) * SP_GAIN_RATE).min(1.0);
            sp = (sp + SP_PER_PHRASE).min(1.0);
            cursor = grant.value();
        }
        (sp + self.coverage(cursor, at) * SP_GAIN_RATE).min(1.0)
    }

    /// Earliest beat at which half a bar is available, or `None` if the
    /// grants and whammy from `from` onwards never reach it.
    #[must_use]
    pub fn earliest_half_bar(&self, from: Beat, grants: &[Beat]) -> Option<Beat> {
        let mut sp: f64 = 0.0;
        let mut cursor = from.value();
        for grant in grants {
            if let Some(beat) = self.whammy_crossing(cursor, grant.value(), sp) {
                return Some(Beat::new(beat));
            }
            sp = (sp + self.coverage(cursor, grant.value()) * SP_GAIN_RATE).min(1.0);
            sp = (sp + SP_PER_PHRASE).min(1.0);
            if sp >= MINIMUM_SP_AMOUNT {
                return Some(Beat::new(grant.value()));
            }
            cursor = grant.value();
        }
        self.whammy_crossing(cursor, f64::INFINITY, sp).map(Beat::new)
    }

    /// Simulates an active meter from `start` carrying `sp` bars, applying
    /// the given in-activation phrase grants (sorted beats) as they are
    /// passed, and returns the beat the meter empties at. With `whammy` the
    /// player whammies every covered sustain at half rate; without it the
    /// meter drains unassisted, which bounds how early an activation can be
    /// made to end.
    #[must_use]
    pub fn drain_end(
        &self,
        converter: &TimeConverter,
        start: Beat,
        sp: f64,
        grants: &[Beat],
        whammy: bool,
    ) -> Beat {
        let mut sp = sp.min(1.0);
        let mut cursor = start.value();
        if sp <= 0.0 {
            return start;
        }

        // A granting point notated at or before the start is hit the moment
        // the meter switches on.
        for grant in grants {
            if grant.value() <= cursor {
                sp = (sp + SP_PER_PHRASE).min(1.0);
            }
        }

        let mut events: Vec<f64> = grants
            .iter()
            .map(|grant| grant.value())
            .filter(|&beat| beat > cursor)
            .collect();
        if whammy {
            for &(range_start, range_end) in &self.ranges {
                if range_start > cursor {
                    events.push(range_start);
                }
                if range_end > cursor {
                    events.push(range_end);
                }
            }
        }
        events.extend(converter.measure_breakpoints().filter(|&beat| beat > cursor));
        events.sort_by(f64::total_cmp);
        events.dedup();

        for event in events {
            let slope = self.active_slope(converter, cursor, event, whammy);
            if slope < 0.0 && sp + slope * (event - cursor) < 0.0 {
                return Beat::new(cursor + sp / -slope);
            }
            sp = (sp + slope * (event - cursor)).min(1.0);
            cursor = event;
            for _ in grants.iter().filter(|grant| grant.value() == event) {
                sp = (sp + SP_PER_PHRASE).min(1.0);
            }
        }

        // Beyond the last event the measure axis is linear and no whammy is
        // left, so the remainder drains in one step.
        let measure_rate = (converter.beats_to_measures(Beat::new(cursor + 1.0))
            - converter.beats_to_measures(Beat::new(cursor)))
        .value();
        Beat::new(cursor + sp * MEASURES_PER_BAR / measure_rate)
    }

    /// Beats of whammy coverage within an interval.
    fn coverage(&self, start: f64, end: f64) -> f64 {
        self.ranges
            .iter()
            .map(|&(range_start, range_end)| {
                (range_end.min(end) - range_start.max(start)).max(0.0)
            })
            .sum()
    }

    /// Whether a beat lies inside a whammy interval.
    fn covers(&self, beat: f64) -> bool {
        let index = self.ranges.partition_point(|range| range.0 <= beat);
        index > 0 && self.ranges[index - 1].1 > beat
    }

    /// Net SP change per beat over `(start, end)` while active, assuming no
    /// event boundary falls inside the interval.
    fn active_slope(&self, converter: &TimeConverter, start: f64, end: f64, whammy: bool) -> f64 {
        if end <= start {
            return 0.0;
        }
        let measures = (converter.beats_to_measures(Beat::new(end))
            - converter.beats_to_measures(Beat::new(start)))
        .value();
        let mut slope = -measures / (MEASURES_PER_BAR * (end - start));
        if whammy && self.covers(0.5 * (start + end)) {
            slope += SP_GAIN_RATE / 2.0;
        }
        slope
    }

    /// Beat at which continuous whammy from `start` pushes the meter from
    /// `sp` to half a bar, if it does before `end`.
    fn whammy_crossing(&self, start: f64, end: f64, sp: f64) -> Option<f64> {
        let mut sp = sp;
        for &(range_start, range_end) in &self.ranges {
            let overlap_start = range_start.max(start);
            let overlap_end = range_end.min(end);
            if overlap_start >= overlap_end {
                continue;
            }
            let gain = (overlap_end - overlap_start) * SP_GAIN_RATE;
            if sp + gain >= MINIMUM_SP_AMOUNT {
                return Some(overlap_start + (MINIMUM_SP_AMOUNT - sp) / SP_GAIN_RATE);
            }
            sp += gain;
        }
        None
    }
}
