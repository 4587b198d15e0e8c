//! Star Power path optimiser for Clone Hero style charts.
//!
//! Given a parsed chart — notes, sustains, Star Power phrases, tempo and
//! time signature changes — this crate decides where the player should
//! activate Star Power so that the total score boost is as large as
//! possible.
//!
//! The pipeline is:
//!
//! 1. A [`song::Song`] holds the immutable data model a parser produces:
//!    a [`song::sync::SyncTrack`] and one [`song::notes::NoteTrack`] per
//!    (instrument, difficulty) pair.
//! 2. [`timing::TimeConverter`] translates between beats, seconds and
//!    measures under the chart's tempo and time signature maps.
//! 3. [`points::PointSet`] flattens a note track into an ordered sequence
//!    of scoring points with combo multipliers, sustain tick points and
//!    per-point hit windows.
//! 4. [`sp::SpData`] knows how Star Power is gained (phrase ends, whammy)
//!    and spent (a bar per eight measures while active).
//! 5. [`optimiser::Optimiser`] searches activation sets and returns the
//!    best [`optimiser::Path`], which [`processed::ProcessedSong`] can
//!    render as the textual summaries players share.
//!
//! # Usage
//!
//! ```
//! use starpath::prelude::*;
//!
//! let track = NoteTrack::new(
//!     vec![
//!         Note { position: 0, length: 0, colour: FiveFretColour::Green },
//!         Note { position: 192, length: 0, colour: FiveFretColour::Red },
//!         Note { position: 384, length: 0, colour: FiveFretColour::Yellow },
//!     ],
//!     vec![
//!         StarPowerPhrase { position: 0, length: 50 },
//!         StarPowerPhrase { position: 192, length: 50 },
//!     ],
//!     vec![],
//! );
//! let song = ProcessedSong::new(&track, 192, &SyncTrack::default(), &Settings::default())?;
//! let path = Optimiser::new(&song).optimal_path();
//!
//! assert_eq!(path.score_boost, 50);
//! println!("{}", song.path_summary(&path));
//! # Ok::<(), SongError>(())
//! ```
//!
//! Chart and MIDI parsing, rendering and the command line live in separate
//! crates; everything here is a pure function of its inputs.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod optimiser;
pub mod points;
pub mod prelude;
pub mod processed;
pub mod settings;
pub mod song;
pub mod sp;
pub mod timing;

pub use optimiser::{Activation, Optimiser, Path};
pub use processed::ProcessedSong;
pub use settings::Settings;
pub use song::{Song, SongError};
