//! Benchmarks for the per-transition hot path
//!
//! The resolver runs on every switch change, so it has to stay cheap even
//! with every fret held.
//!
//! Run with: cargo bench resolver

use stratokeister::fretboard::{FretResolver, HidReport, KeyRecord, Matrix, MatrixPos, STRING_COUNT};
use stratokeister::{Action, Keyboard, Layer};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

const STRUM: MatrixPos = MatrixPos::new(3, 11);

/// Matrix with the first `frets` frets of every string held and string 0 strummed
fn held_matrix(frets: u8) -> Matrix {
    let mut matrix = Matrix::with_pressed(&[STRUM]);
    for string in 0..STRING_COUNT as u8 {
        for fret in 0..frets.min(12) {
            matrix.press(MatrixPos::new(string, fret));
        }
    }
    matrix
}

// ============================================================================
// Scanner
// ============================================================================

#[divan::bench(args = [0, 1, 6, 12])]
fn highest_fret(bencher: divan::Bencher, frets: u8) {
    let resolver = FretResolver::default();
    let matrix = held_matrix(frets);

    bencher.bench_local(|| {
        for string in 0..STRING_COUNT {
            divan::black_box(resolver.highest_fret(&matrix, string));
        }
    });
}

// ============================================================================
// Event resolver
// ============================================================================

#[divan::bench(args = [0, 6, 12])]
fn process_press(bencher: divan::Bencher, frets: u8) {
    let resolver = FretResolver::default();
    let matrix = held_matrix(frets);
    let record = KeyRecord::press(STRUM);

    bencher
        .with_inputs(HidReport::new)
        .bench_local_values(|mut hid| {
            resolver.process_record(
                Action::Transparent,
                &record,
                Layer::Default,
                &matrix,
                &mut hid,
            );
            hid
        });
}

#[divan::bench]
fn process_release_unstrummed(bencher: divan::Bencher) {
    let resolver = FretResolver::default();
    let matrix = Matrix::new();
    let record = KeyRecord::release(STRUM);

    bencher
        .with_inputs(HidReport::new)
        .bench_local_values(|mut hid| {
            resolver.process_record(
                Action::Transparent,
                &record,
                Layer::Default,
                &matrix,
                &mut hid,
            );
            hid
        });
}

// ============================================================================
// Full keyboard
// ============================================================================

#[divan::bench]
fn strum_cycle(bencher: divan::Bencher) {
    bencher.with_inputs(Keyboard::default).bench_local_values(|mut keyboard| {
        keyboard.press(MatrixPos::new(0, 9));
        keyboard.press(STRUM);
        keyboard.release(MatrixPos::new(0, 9));
        keyboard.release(STRUM);
        keyboard
    });
}
