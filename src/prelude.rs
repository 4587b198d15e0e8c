//! Prelude module for the crate.
//!
//! Re-exports every type needed to go from a parsed chart to an optimal
//! path, so `use starpath::prelude::*;` is enough for most callers.

pub use crate::optimiser::{Activation, Optimiser, Path};
pub use crate::points::{Point, PointSet};
pub use crate::processed::ProcessedSong;
pub use crate::settings::{Settings, SettingsError};
pub use crate::song::{
    DEFAULT_RESOLUTION, Difficulty, IniValues, Instrument, Song, SongError, Tick,
    notes::{DrumColour, FiveFretColour, Note, NoteTrack, SixFretColour, Solo, StarPowerPhrase},
    sync::{BpmEvent, SyncError, SyncTrack, TimeSigEvent},
};
pub use crate::sp::SpData;
pub use crate::timing::{Beat, Measure, Position, Second, TimeConverter};
