//! A note track prepared for optimisation.
//!
//! [`ProcessedSong`] runs the whole pipeline once — validation, speed
//! scaling, the time converter, the point sequence and the whammy schedule
//! — and is then queried read-only by the optimiser and by summary
//! rendering.

use std::fmt::Write as _;

use crate::optimiser::Path;
use crate::points::PointSet;
use crate::settings::Settings;
use crate::song::notes::NoteTrack;
use crate::song::sync::SyncTrack;
use crate::song::{Instrument, Song, SongError};
use crate::sp::SpData;
use crate::timing::TimeConverter;

/// Everything the optimiser needs to know about one note track.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessedSong {
    points: PointSet,
    converter: TimeConverter,
    sp_data: SpData,
    total_base_score: u32,
}

impl ProcessedSong {
    /// Runs the preparation pipeline for a note track.
    ///
    /// # Errors
    ///
    /// Returns [`SongError::InvalidResolution`] for a zero resolution and
    /// [`SongError::Config`] when a setting is out of range.
    pub fn new<C>(
        track: &NoteTrack<C>,
        resolution: u32,
        sync_track: &SyncTrack,
        settings: &Settings,
    ) -> Result<Self, SongError> {
        if resolution == 0 {
            return Err(SongError::InvalidResolution);
        }
        settings.validate()?;

        let sync_track = if settings.speed == 100 {
            sync_track.clone()
        } else {
            sync_track.with_speed(settings.speed)
        };
        let converter = TimeConverter::new(&sync_track, resolution);
        let points = PointSet::new(track, resolution, &converter, settings);
        let sp_data = SpData::new(track, resolution, &converter, settings);
        let solo_bonus: u32 = track.solos().iter().map(|solo| solo.bonus).sum();
        let total_base_score = points.base_score() + solo_bonus;

        Ok(Self {
            points,
            converter,
            sp_data,
            total_base_score,
        })
    }

    /// Prepares the track selected by the settings' instrument and
    /// difficulty.
    ///
    /// # Errors
    ///
    /// Returns [`SongError::MissingTrack`] when the song has no such track,
    /// plus everything [`ProcessedSong::new`] can return.
    pub fn from_song(song: &Song, settings: &Settings) -> Result<Self, SongError> {
        let difficulty = settings.difficulty;
        match settings.instrument {
            Instrument::Drums => Self::new(
                song.drum_track(difficulty)?,
                song.resolution(),
                song.sync_track(),
                settings,
            ),
            instrument if instrument.is_six_fret() => Self::new(
                song.six_fret_track(instrument, difficulty)?,
                song.resolution(),
                song.sync_track(),
                settings,
            ),
            instrument => Self::new(
                song.five_fret_track(instrument, difficulty)?,
                song.resolution(),
                song.sync_track(),
                settings,
            ),
        }
    }

    /// The point sequence.
    #[must_use]
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// The time axis converter, after speed scaling.
    #[must_use]
    pub fn converter(&self) -> &TimeConverter {
        &self.converter
    }

    /// The whammy schedule.
    #[must_use]
    pub fn sp_data(&self) -> &SpData {
        &self.sp_data
    }

    /// Score of a full-combo run without any activation, solo bonuses
    /// included.
    #[must_use]
    pub fn total_base_score(&self) -> u32 {
        self.total_base_score
    }

    /// Renders a path the way players share them.
    ///
    /// Each activation is written as the number of phrases charged since the
    /// previous one, with `(+n)` when the activation itself overlaps further
    /// phrases; a trailing `ES<n>` counts phrases whose Star Power is earned
    /// but never spent. Measure positions are 1-indexed.
    #[must_use]
    pub fn path_summary(&self, path: &Path) -> String {
        let points = self.points.points();
        let granting: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, point)| point.is_sp_granting)
            .map(|(index, _)| index)
            .collect();

        let mut summary = String::from("Path: ");
        if path.activations.is_empty() {
            summary.push_str("None");
        } else {
            let mut labels = Vec::with_capacity(path.activations.len() + 1);
            let mut unattributed = 0usize;
            for activation in &path.activations {
                let charged = granting
                    .iter()
                    .filter(|&&index| index >= unattributed && index < activation.act_start)
                    .count();
                let overlapped = granting
                    .iter()
                    .filter(|&&index| {
                        index >= activation.act_start && index <= activation.act_end
                    })
                    .count();
                if overlapped > 0 {
                    labels.push(format!("{charged}(+{overlapped})"));
                } else {
                    labels.push(charged.to_string());
                }
                unattributed = activation.act_end + 1;
            }
            let eaten = granting
                .iter()
                .filter(|&&index| index >= unattributed)
                .count();
            if eaten > 0 {
                labels.push(format!("ES{eaten}"));
            }
            summary.push_str(&labels.join("-"));
        }

        let _ = write!(summary, "\nNo SP score: {}", self.total_base_score);
        let _ = write!(
            summary,
            "\nTotal score: {}",
            self.total_base_score + path.score_boost
        );
        for (index, activation) in path.activations.iter().enumerate() {
            let from = format_measure(1.0 + points[activation.act_start].position.measure.value());
            let to = format_measure(1.0 + points[activation.act_end].position.measure.value());
            let _ = write!(
                summary,
                "\nActivation {}: Measure {from} to Measure {to}",
                index + 1
            );
        }
        summary
    }
}

/// Renders a measure number to at most two decimal places.
fn format_measure(value: f64) -> String {
    let mut text = format!("{value:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text
}
