//! path_summary output scenarios.

use starpath::prelude::*;

fn note(position: Tick) -> Note<FiveFretColour> {
    Note {
        position,
        length: 0,
        colour: FiveFretColour::Green,
    }
}

fn phrase(position: Tick, length: Tick) -> StarPowerPhrase {
    StarPowerPhrase { position, length }
}

fn act(act_start: usize, act_end: usize) -> Activation {
    Activation {
        act_start,
        act_end,
        sp_start: Beat::new(0.0),
        sp_end: Beat::new(0.0),
    }
}

fn summary_song(phrases: Vec<StarPowerPhrase>) -> ProcessedSong {
    let track = NoteTrack::new(
        vec![note(0), note(192), note(384), note(576), note(6144)],
        phrases,
        vec![Solo {
            start: 0,
            end: 50,
            bonus: 100,
        }],
    );
    ProcessedSong::new(&track, 192, &SyncTrack::default(), &Settings::default()).unwrap()
}

fn four_phrases() -> Vec<StarPowerPhrase> {
    vec![
        phrase(0, 50),
        phrase(192, 50),
        phrase(384, 50),
        phrase(6144, 50),
    ]
}

#[test]
fn overlap_and_es_are_denoted_correctly() {
    let song = summary_song(four_phrases());
    let path = Path {
        activations: vec![act(2, 3)],
        score_boost: 100,
    };

    assert_eq!(
        song.path_summary(&path),
        "Path: 2(+1)-ES1\n\
         No SP score: 350\n\
         Total score: 450\n\
         Activation 1: Measure 1.5 to Measure 1.75"
    );
}

#[test]
fn no_overlap_is_denoted_correctly() {
    let song = summary_song(four_phrases());
    let path = Path {
        activations: vec![act(3, 3)],
        score_boost: 50,
    };

    assert_eq!(
        song.path_summary(&path),
        "Path: 3-ES1\n\
         No SP score: 350\n\
         Total score: 400\n\
         Activation 1: Measure 1.75 to Measure 1.75"
    );
}

#[test]
fn no_es_is_denoted_correctly() {
    let song = summary_song(four_phrases());
    let path = Path {
        activations: vec![act(4, 4)],
        score_boost: 50,
    };

    assert_eq!(
        song.path_summary(&path),
        "Path: 3(+1)\n\
         No SP score: 350\n\
         Total score: 400\n\
         Activation 1: Measure 9 to Measure 9"
    );
}

#[test]
fn no_sp_is_denoted_correctly() {
    let song = summary_song(vec![]);
    let path = Path::default();

    assert_eq!(
        song.path_summary(&path),
        "Path: None\n\
         No SP score: 350\n\
         Total score: 350"
    );
}

#[test]
fn multiple_activations_are_numbered() {
    let song = summary_song(four_phrases());
    let path = Path {
        activations: vec![act(2, 2), act(4, 4)],
        score_boost: 100,
    };

    assert_eq!(
        song.path_summary(&path),
        "Path: 2(+1)-0(+1)\n\
         No SP score: 350\n\
         Total score: 450\n\
         Activation 1: Measure 1.5 to Measure 1.5\n\
         Activation 2: Measure 9 to Measure 9"
    );
}
