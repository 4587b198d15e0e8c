//! optimal_path scenarios.

use starpath::prelude::*;

fn note(position: Tick) -> Note<FiveFretColour> {
    Note {
        position,
        length: 0,
        colour: FiveFretColour::Green,
    }
}

fn sustain(position: Tick, length: Tick) -> Note<FiveFretColour> {
    Note {
        position,
        length,
        colour: FiveFretColour::Green,
    }
}

fn coloured(position: Tick, colour: FiveFretColour) -> Note<FiveFretColour> {
    Note {
        position,
        length: 0,
        colour,
    }
}

fn phrase(position: Tick, length: Tick) -> StarPowerPhrase {
    StarPowerPhrase { position, length }
}

fn process(notes: Vec<Note<FiveFretColour>>, phrases: Vec<StarPowerPhrase>) -> ProcessedSong {
    ProcessedSong::new(
        &NoteTrack::new(notes, phrases, vec![]),
        192,
        &SyncTrack::default(),
        &Settings::default(),
    )
    .unwrap()
}

/// (act_start, act_end, sp_start, sp_end) per activation, beats to within
/// a hundredth.
fn assert_path(path: &Path, boost: u32, expected: &[(usize, usize, f64, f64)]) {
    assert_eq!(path.score_boost, boost);
    assert_eq!(path.activations.len(), expected.len());
    for (activation, &(act_start, act_end, sp_start, sp_end)) in
        path.activations.iter().zip(expected)
    {
        assert_eq!(activation.act_start, act_start);
        assert_eq!(activation.act_end, act_end);
        assert!(
            (activation.sp_start.value() - sp_start).abs() < 0.01,
            "sp_start {} != {sp_start}",
            activation.sp_start.value()
        );
        assert!(
            (activation.sp_end.value() - sp_end).abs() < 0.01,
            "sp_end {} != {sp_end}",
            activation.sp_end.value()
        );
    }
}

#[test]
fn simplest_song_with_a_non_empty_path() {
    let song = process(
        vec![note(0), note(192), note(384)],
        vec![phrase(0, 50), phrase(192, 50)],
    );
    let path = Optimiser::new(&song).optimal_path();

    assert_path(&path, 50, &[(2, 2, 2.0, 18.0)]);
}

#[test]
fn simplest_song_with_multiple_activations() {
    let song = process(
        vec![
            note(0),
            note(192),
            coloured(384, FiveFretColour::Green),
            coloured(384, FiveFretColour::Red),
            coloured(384, FiveFretColour::Yellow),
            note(3840),
            note(4032),
            coloured(10368, FiveFretColour::Green),
            coloured(10368, FiveFretColour::Red),
            coloured(10368, FiveFretColour::Yellow),
        ],
        vec![
            phrase(0, 50),
            phrase(192, 50),
            phrase(3840, 50),
            phrase(4032, 50),
        ],
    );
    let path = Optimiser::new(&song).optimal_path();

    assert_path(&path, 300, &[(2, 2, 2.0, 18.0), (5, 5, 54.0, 70.0)]);
}

#[test]
fn an_activation_can_cover_more_than_one_point() {
    let song = process(
        vec![note(0), note(192), note(384), note(576)],
        vec![phrase(0, 50), phrase(192, 50)],
    );
    let path = Optimiser::new(&song).optimal_path();

    assert_path(&path, 100, &[(2, 3, 2.0, 18.0)]);
}

#[test]
fn activations_run_as_long_as_possible() {
    let song = process(
        vec![note(0), note(192), note(384), note(3360)],
        vec![phrase(0, 50), phrase(192, 50)],
    );
    let path = Optimiser::new(&song).optimal_path();

    assert_path(&path, 100, &[(2, 3, 2.0, 18.0)]);
}

#[test]
fn greedy_activation_on_the_first_note_loses() {
    let song = process(
        vec![
            note(0),
            note(192),
            note(384),
            coloured(3840, FiveFretColour::Green),
            coloured(3840, FiveFretColour::Red),
        ],
        vec![phrase(0, 50), phrase(192, 50)],
    );
    let path = Optimiser::new(&song).optimal_path();

    // Activating on point 2 only boosts 50; waiting for the chord doubles
    // the payoff.
    assert_path(&path, 100, &[(3, 3, 20.0, 36.0)]);
}

#[test]
fn a_phrase_can_require_hitting_early() {
    let song = process(
        vec![
            note(0),
            note(192),
            note(384),
            note(3224),
            note(9378),
            note(15714),
            note(15715),
        ],
        vec![
            phrase(0, 50),
            phrase(192, 50),
            phrase(3224, 50),
            phrase(9378, 50),
        ],
    );
    let path = Optimiser::new(&song).optimal_path();

    // The first activation must die before the tick-3224 note's window
    // closes, so it starts well before its own note.
    assert_path(
        &path,
        150,
        &[(2, 2, 0.8958, 16.8958), (5, 6, 81.843_75, 97.843_75)],
    );
}

#[test]
fn activations_ending_late_matter() {
    let mut notes = vec![note(0), note(192), note(384), sustain(3234, 1440)];
    notes.extend((10_944..10_954).map(note));
    let song = process(
        notes,
        vec![phrase(0, 50), phrase(192, 50), phrase(3234, 50)],
    );
    let path = Optimiser::new(&song).optimal_path();

    // Spending the first two phrases early squeezes the third one so hard
    // that nothing is left for the ten-note burst; saving everything for one
    // full bar wins.
    assert_eq!(path.score_boost, 750);
    assert_eq!(path.activations.len(), 1);
}

#[test]
fn early_whammy_at_the_start_of_a_phrase_counts() {
    let song = process(
        vec![sustain(0, 1420), note(1500), note(1600)],
        vec![phrase(0, 1550)],
    );
    let path = Optimiser::new(&song).optimal_path();

    // The pre-note whammy on the opening sustain is exactly what pushes the
    // meter over half a bar.
    assert_eq!(path.score_boost, 50);
    assert_eq!(path.activations.len(), 1);
}

#[test]
fn charts_without_phrases_get_the_empty_path() {
    let song = process(vec![note(0), note(192), note(384)], vec![]);
    let path = Optimiser::new(&song).optimal_path();

    assert_eq!(path, Path::default());
}

#[test]
fn optimisation_is_deterministic() {
    let song = process(
        vec![
            note(0),
            note(192),
            note(384),
            note(3224),
            note(9378),
            note(15714),
            note(15715),
        ],
        vec![
            phrase(0, 50),
            phrase(192, 50),
            phrase(3224, 50),
            phrase(9378, 50),
        ],
    );

    let first = Optimiser::new(&song).optimal_path();
    let second = Optimiser::new(&song).optimal_path();
    assert_eq!(first, second);
}

#[test]
fn activations_never_overlap() {
    let mut notes: Vec<_> = (0..10).map(|i| note(192 * i)).collect();
    notes.extend((200..210).map(|i| note(192 * i)));
    let phrases = vec![
        phrase(0, 50),
        phrase(192, 50),
        phrase(200 * 192, 50),
        phrase(201 * 192, 50),
    ];
    let song = process(notes, phrases);
    let path = Optimiser::new(&song).optimal_path();

    assert_eq!(path.activations.len(), 2);
    for pair in path.activations.windows(2) {
        assert!(pair[0].act_end < pair[1].act_start);
        assert!(pair[0].sp_end.value() <= pair[1].sp_start.value());
    }
}
