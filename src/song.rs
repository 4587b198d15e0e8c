//! The immutable data model a parsed chart is loaded into.
//!
//! A [`Song`] couples the chart-wide sync track and metadata with one
//! [`NoteTrack`] per (instrument, difficulty) pair, grouped into the three
//! note colour families. Everything here is a plain value: parsers build it
//! once and the rest of the crate only reads it.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::settings::SettingsError;

pub mod notes;
pub mod sync;

use self::notes::{DrumColour, FiveFretColour, NoteTrack, SixFretColour};
use self::sync::{SyncError, SyncTrack};

/// Native time unit of a chart; one beat is `resolution` ticks.
pub type Tick = u32;

/// Default chart resolution in ticks per beat.
pub const DEFAULT_RESOLUTION: u32 = 192;

/// The instruments a chart can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Instrument {
    /// Lead guitar.
    Guitar,
    /// Co-op guitar.
    GuitarCoop,
    /// Bass.
    Bass,
    /// Rhythm guitar.
    Rhythm,
    /// Keys.
    Keys,
    /// Guitar Hero Live guitar.
    GhlGuitar,
    /// Guitar Hero Live bass.
    GhlBass,
    /// Drums.
    Drums,
}

impl Instrument {
    /// Whether this instrument uses five fret note tracks.
    #[must_use]
    pub fn is_five_fret(self) -> bool {
        matches!(
            self,
            Self::Guitar | Self::GuitarCoop | Self::Bass | Self::Rhythm | Self::Keys
        )
    }

    /// Whether this instrument uses six fret note tracks.
    #[must_use]
    pub fn is_six_fret(self) -> bool {
        matches!(self, Self::GhlGuitar | Self::GhlBass)
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Guitar => "guitar",
            Self::GuitarCoop => "coop",
            Self::Bass => "bass",
            Self::Rhythm => "rhythm",
            Self::Keys => "keys",
            Self::GhlGuitar => "ghl",
            Self::GhlBass => "ghlbass",
            Self::Drums => "drums",
        };
        f.write_str(name)
    }
}

/// The difficulties a note track can be charted at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Difficulty {
    /// Easy.
    Easy,
    /// Medium.
    Medium,
    /// Hard.
    Hard,
    /// Expert.
    #[default]
    Expert,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Expert => "expert",
        };
        f.write_str(name)
    }
}

/// Chart-level metadata from the song.ini or chart header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IniValues {
    /// Song title.
    pub name: String,
    /// Song artist.
    pub artist: String,
    /// Chart author.
    pub charter: String,
}

impl Default for IniValues {
    fn default() -> Self {
        Self {
            name: "Unknown Song".to_owned(),
            artist: "Unknown Artist".to_owned(),
            charter: "Unknown Charter".to_owned(),
        }
    }
}

/// An error raised while assembling or querying a [`Song`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SongError {
    /// The chart resolution was zero.
    #[error("chart resolution must be positive")]
    InvalidResolution,
    /// The requested (instrument, difficulty) pair has no note track.
    #[error("chart has no {difficulty} {instrument} track")]
    MissingTrack {
        /// Requested instrument.
        instrument: Instrument,
        /// Requested difficulty.
        difficulty: Difficulty,
    },
    /// The sync track failed validation.
    #[error(transparent)]
    MalformedSync(#[from] SyncError),
    /// A configuration value was out of range.
    #[error(transparent)]
    Config(#[from] SettingsError),
}

/// A parsed song: metadata, sync track and the per-instrument note tracks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Song {
    resolution: u32,
    ini: IniValues,
    sync_track: SyncTrack,
    five_fret_tracks: BTreeMap<(Instrument, Difficulty), NoteTrack<FiveFretColour>>,
    six_fret_tracks: BTreeMap<(Instrument, Difficulty), NoteTrack<SixFretColour>>,
    drum_tracks: BTreeMap<Difficulty, NoteTrack<DrumColour>>,
}

impl Default for Song {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            ini: IniValues::default(),
            sync_track: SyncTrack::default(),
            five_fret_tracks: BTreeMap::new(),
            six_fret_tracks: BTreeMap::new(),
            drum_tracks: BTreeMap::new(),
        }
    }
}

impl Song {
    /// Assembles a song from parsed parts.
    ///
    /// # Errors
    ///
    /// Returns [`SongError::InvalidResolution`] when `resolution` is zero.
    pub fn new(
        resolution: u32,
        ini: IniValues,
        sync_track: SyncTrack,
        five_fret_tracks: BTreeMap<(Instrument, Difficulty), NoteTrack<FiveFretColour>>,
        six_fret_tracks: BTreeMap<(Instrument, Difficulty), NoteTrack<SixFretColour>>,
        drum_tracks: BTreeMap<Difficulty, NoteTrack<DrumColour>>,
    ) -> Result<Self, SongError> {
        if resolution == 0 {
            return Err(SongError::InvalidResolution);
        }
        Ok(Self {
            resolution,
            ini,
            sync_track,
            five_fret_tracks,
            six_fret_tracks,
            drum_tracks,
        })
    }

    /// Ticks per beat of the chart.
    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Song title.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.ini.name
    }

    /// Song artist.
    #[must_use]
    pub fn artist(&self) -> &str {
        &self.ini.artist
    }

    /// Chart author.
    #[must_use]
    pub fn charter(&self) -> &str {
        &self.ini.charter
    }

    /// The chart's tempo map.
    #[must_use]
    pub fn sync_track(&self) -> &SyncTrack {
        &self.sync_track
    }

    /// Looks up a five fret note track.
    ///
    /// # Errors
    ///
    /// Returns [`SongError::MissingTrack`] when the pair is absent.
    pub fn five_fret_track(
        &self,
        instrument: Instrument,
        difficulty: Difficulty,
    ) -> Result<&NoteTrack<FiveFretColour>, SongError> {
        self.five_fret_tracks
            .get(&(instrument, difficulty))
            .ok_or(SongError::MissingTrack {
                instrument,
                difficulty,
            })
    }

    /// Looks up a six fret note track.
    ///
    /// # Errors
    ///
    /// Returns [`SongError::MissingTrack`] when the pair is absent.
    pub fn six_fret_track(
        &self,
        instrument: Instrument,
        difficulty: Difficulty,
    ) -> Result<&NoteTrack<SixFretColour>, SongError> {
        self.six_fret_tracks
            .get(&(instrument, difficulty))
            .ok_or(SongError::MissingTrack {
                instrument,
                difficulty,
            })
    }

    /// Looks up a drum note track.
    ///
    /// # Errors
    ///
    /// Returns [`SongError::MissingTrack`] when the difficulty is absent.
    pub fn drum_track(&self, difficulty: Difficulty) -> Result<&NoteTrack<DrumColour>, SongError> {
        self.drum_tracks
            .get(&difficulty)
            .ok_or(SongError::MissingTrack {
                instrument: Instrument::Drums,
                difficulty,
            })
    }

    /// Every instrument with at least one charted track.
    #[must_use]
    pub fn instruments(&self) -> Vec<Instrument> {
        let mut found: BTreeSet<Instrument> = BTreeSet::new();
        found.extend(self.five_fret_tracks.keys().map(|(instrument, _)| *instrument));
        found.extend(self.six_fret_tracks.keys().map(|(instrument, _)| *instrument));
        if !self.drum_tracks.is_empty() {
            found.insert(Instrument::Drums);
        }
        found.into_iter().collect()
    }

    /// Every difficulty the given instrument is charted at.
    #[must_use]
    pub fn difficulties(&self, instrument: Instrument) -> Vec<Difficulty> {
        if instrument == Instrument::Drums {
            return self.drum_tracks.keys().copied().collect();
        }
        let source: &BTreeMap<_, _> = if instrument.is_five_fret() {
            &self.five_fret_tracks
        } else {
            return self
                .six_fret_tracks
                .keys()
                .filter(|(found, _)| *found == instrument)
                .map(|(_, difficulty)| *difficulty)
                .collect();
        };
        source
            .keys()
            .filter(|(found, _)| *found == instrument)
            .map(|(_, difficulty)| *difficulty)
            .collect()
    }
}
