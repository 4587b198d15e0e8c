//! Scoring points derived from a note track.
//!
//! A [`PointSet`] flattens notes, chords and sustains into one ordered
//! sequence of [`Point`]s: one point per chord, plus a stream of 1-value
//! tick points along every sustain. Each point knows its hit window in
//! beats and whether hitting it completes a Star Power phrase.

use itertools::Itertools;

use crate::settings::Settings;
use crate::song::Tick;
use crate::song::notes::NoteTrack;
use crate::sp::SP_PER_PHRASE;
use crate::timing::{Beat, Position, Second, TimeConverter};

/// Base score of a single note before any multiplier.
const NOTE_VALUE: u32 = 50;
/// Half-width of the hit window in seconds, before squeeze scaling.
pub(crate) const HIT_WINDOW_SECONDS: f64 = 0.07;

/// One scoring opportunity: a chord or a sustain tick.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Where the point lies, on both musical axes.
    pub position: Position,
    /// Earliest beat the point can be hit at.
    pub hit_window_start: Beat,
    /// Latest beat the point can be hit at.
    pub hit_window_end: Beat,
    /// Score value with the combo multiplier applied.
    pub value: u32,
    /// Whether this is a sustain tick point rather than a chord.
    pub is_hold_point: bool,
    /// Whether hitting this point completes a Star Power phrase.
    pub is_sp_granting: bool,
}

/// The ordered point sequence of one note track, with a parallel table of
/// cumulative Star Power granted up to and including each point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointSet {
    points: Vec<Point>,
    cumulative_sp: Vec<f64>,
}

struct RawPoint {
    tick: Tick,
    value: u32,
    is_hold_point: bool,
    is_sp_granting: bool,
}

impl PointSet {
    /// Builds the point sequence for a note track.
    ///
    /// Chords are grouped by tick; the chord's base value is 50 per member
    /// and its sustain is the longest member. Sustain tick points are spaced
    /// `max(resolution / 25, 1)` ticks apart, so a resolution of 1 still
    /// terminates. The combo multiplier is applied once the sequence is
    /// sorted.
    #[must_use]
    pub fn new<C>(
        track: &NoteTrack<C>,
        resolution: u32,
        converter: &TimeConverter,
        settings: &Settings,
    ) -> Self {
        let tick_gap = (resolution / 25).max(1);

        let grouped = track.notes().iter().chunk_by(|note| note.position);
        let chords: Vec<(Tick, u32, Tick)> = grouped
            .into_iter()
            .map(|(position, members)| {
                let mut size = 0;
                let mut length = 0;
                for note in members {
                    size += 1;
                    length = length.max(note.length);
                }
                (position, size, length)
            })
            .collect();

        let phrases = track.sp_phrases();
        let mut phrase_index = 0;
        let mut raw = Vec::new();

        for (chord_index, &(position, size, length)) in chords.iter().enumerate() {
            // Phrases containing no chord must not block the ones after them.
            while phrase_index < phrases.len()
                && phrases[phrase_index].position + phrases[phrase_index].length <= position
            {
                phrase_index += 1;
            }
            let mut is_sp_granting = false;
            if let Some(phrase) = phrases.get(phrase_index) {
                let next_in_phrase = chords
                    .get(chord_index + 1)
                    .is_some_and(|&(next, _, _)| phrase.contains(next));
                if phrase.contains(position) && !next_in_phrase {
                    is_sp_granting = true;
                    phrase_index += 1;
                }
            }

            raw.push(RawPoint {
                tick: position,
                value: NOTE_VALUE * size,
                is_hold_point: false,
                is_sp_granting,
            });

            let mut tick = position;
            let mut remaining = i64::from(length);
            while remaining > 0 {
                tick += tick_gap;
                remaining -= i64::from(tick_gap);
                raw.push(RawPoint {
                    tick,
                    value: 1,
                    is_hold_point: true,
                    is_sp_granting: false,
                });
            }
        }

        raw.sort_by_key(|point| point.tick);

        let mut note_count = 0u32;
        let mut multiplier = 1;
        for point in &mut raw {
            if !point.is_hold_point {
                note_count += 1;
                multiplier = 1 + (note_count / 10).min(3);
            }
            point.value *= multiplier;
        }

        let window = HIT_WINDOW_SECONDS * settings.squeeze;
        let mut points = Vec::with_capacity(raw.len());
        let mut cumulative_sp = Vec::with_capacity(raw.len());
        let mut granted = 0.0;
        for point in raw {
            let beat = adjusted_beat(point.tick, resolution, converter, settings.video_lag);
            let (hit_window_start, hit_window_end) = if point.is_hold_point {
                (beat, beat)
            } else {
                let seconds = converter.beats_to_seconds(beat);
                (
                    converter.seconds_to_beats(Second::new(seconds.value() - window)),
                    converter.seconds_to_beats(Second::new(seconds.value() + window)),
                )
            };
            if point.is_sp_granting {
                granted += SP_PER_PHRASE;
            }
            points.push(Point {
                position: converter.position_of(beat),
                hit_window_start,
                hit_window_end,
                value: point.value,
                is_hold_point: point.is_hold_point,
                is_sp_granting: point.is_sp_granting,
            });
            cumulative_sp.push(granted);
        }

        Self {
            points,
            cumulative_sp,
        }
    }

    /// The points, nondecreasing by beat.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Star Power granted up to and including each point, in bars.
    #[must_use]
    pub fn cumulative_sp(&self) -> &[f64] {
        &self.cumulative_sp
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the track produced no points at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of every point value, the score of a no-Star-Power run before
    /// solo bonuses.
    #[must_use]
    pub fn base_score(&self) -> u32 {
        self.points.iter().map(|point| point.value).sum()
    }
}

/// Beat of a tick, shifted by the video lag calibration.
pub(crate) fn adjusted_beat(
    tick: Tick,
    resolution: u32,
    converter: &TimeConverter,
    video_lag: Second,
) -> Beat {
    let beat = Beat::new(f64::from(tick) / f64::from(resolution));
    if video_lag.value() == 0.0 {
        return beat;
    }
    let seconds = converter.beats_to_seconds(beat);
    converter.seconds_to_beats(Second::new(seconds.value() + video_lag.value()))
}
