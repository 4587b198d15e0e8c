//! Notes, Star Power phrases and solo sections of a single difficulty.

use crate::song::Tick;

/// Colour of a five fret (guitar family) note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FiveFretColour {
    /// Green fret.
    #[default]
    Green,
    /// Red fret.
    Red,
    /// Yellow fret.
    Yellow,
    /// Blue fret.
    Blue,
    /// Orange fret.
    Orange,
    /// Open strum.
    Open,
}

/// Colour of a six fret (GHL) note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SixFretColour {
    /// First white fret.
    #[default]
    White1,
    /// Second white fret.
    White2,
    /// Third white fret.
    White3,
    /// First black fret.
    Black1,
    /// Second black fret.
    Black2,
    /// Third black fret.
    Black3,
    /// Open strum.
    Open,
}

/// Colour of a drum note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrumColour {
    /// Kick pedal.
    #[default]
    Kick,
    /// Red pad.
    Red,
    /// Yellow pad.
    Yellow,
    /// Blue pad.
    Blue,
    /// Green pad.
    Green,
}

/// A single note. `length == 0` is an ordinary note, `length > 0` a sustain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note<C> {
    /// Tick the note lies on.
    pub position: Tick,
    /// Sustain length in ticks.
    pub length: Tick,
    /// Fret or pad of the note.
    pub colour: C,
}

/// A Star Power phrase over the half-open tick interval
/// `[position, position + length)`. Hitting every note inside grants a
/// quarter bar of Star Power on the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StarPowerPhrase {
    /// First tick of the phrase.
    pub position: Tick,
    /// Length of the phrase in ticks.
    pub length: Tick,
}

impl StarPowerPhrase {
    /// Whether a tick position lies inside the phrase.
    #[must_use]
    pub fn contains(&self, position: Tick) -> bool {
        position >= self.position && position < self.position + self.length
    }
}

/// A solo section, worth a flat score bonus when fully hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solo {
    /// First tick of the section.
    pub start: Tick,
    /// Last tick of the section.
    pub end: Tick,
    /// Bonus score for completing the section.
    pub bonus: u32,
}

/// The notes, phrases and solos of one (instrument, difficulty) pair.
///
/// Notes are kept sorted by position; all notes sharing a tick form one
/// chord. Phrases are kept sorted and are consumed in order by the point
/// builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteTrack<C> {
    notes: Vec<Note<C>>,
    sp_phrases: Vec<StarPowerPhrase>,
    solos: Vec<Solo>,
}

impl<C> NoteTrack<C> {
    /// Builds a track, sorting notes and phrases by position. The sorts are
    /// stable so chord members keep their relative order.
    #[must_use]
    pub fn new(
        mut notes: Vec<Note<C>>,
        mut sp_phrases: Vec<StarPowerPhrase>,
        mut solos: Vec<Solo>,
    ) -> Self {
        notes.sort_by_key(|note| note.position);
        sp_phrases.sort_by_key(|phrase| phrase.position);
        solos.sort_by_key(|solo| solo.start);
        Self {
            notes,
            sp_phrases,
            solos,
        }
    }

    /// The notes, sorted by position.
    #[must_use]
    pub fn notes(&self) -> &[Note<C>] {
        &self.notes
    }

    /// The Star Power phrases, sorted by position.
    #[must_use]
    pub fn sp_phrases(&self) -> &[StarPowerPhrase] {
        &self.sp_phrases
    }

    /// The solo sections, sorted by start.
    #[must_use]
    pub fn solos(&self) -> &[Solo] {
        &self.solos
    }
}
