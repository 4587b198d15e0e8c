//! Benchmark for activation path optimisation.

use criterion::Criterion;
use starpath::prelude::*;

/// A chart shaped like a real song: sections of steady eighth notes with a
/// pair of Star Power phrases opening each section and the odd sustain.
fn synthetic_track(sections: u32) -> NoteTrack<FiveFretColour> {
    let section_len = 24u32;
    let mut notes = Vec::new();
    let mut phrases = Vec::new();
    for section in 0..sections {
        let base = section * section_len;
        for offset in 0..section_len {
            let position = (base + offset) * 192;
            let length = if offset == 11 { 96 } else { 0 };
            notes.push(Note {
                position,
                length,
                colour: FiveFretColour::Green,
            });
        }
        phrases.push(StarPowerPhrase {
            position: base * 192,
            length: 50,
        });
        phrases.push(StarPowerPhrase {
            position: (base + 1) * 192,
            length: 50,
        });
    }
    NoteTrack::new(notes, phrases, vec![])
}

fn bench_optimal_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimal_path");

    for sections in [4u32, 8] {
        let track = synthetic_track(sections);
        let song = ProcessedSong::new(&track, 192, &SyncTrack::default(), &Settings::default())
            .expect("synthetic chart is valid");
        group.bench_function(format!("{sections}_sections"), |b| {
            b.iter(|| {
                let optimiser = Optimiser::new(std::hint::black_box(&song));
                optimiser.optimal_path()
            });
        });
    }

    group.finish();
}

fn bench_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_song");

    let track = synthetic_track(8);
    group.bench_function("8_sections", |b| {
        b.iter(|| {
            ProcessedSong::new(
                std::hint::black_box(&track),
                192,
                &SyncTrack::default(),
                &Settings::default(),
            )
        });
    });

    group.finish();
}

fn main() {
    let mut criterion = Criterion::default();
    bench_optimal_path(&mut criterion);
    bench_processing(&mut criterion);
    criterion.final_summary();
}
