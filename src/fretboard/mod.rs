//! Fret resolution for the guitar-style neck
//!
//! # Architecture
//!
//! ```text
//! switch transition → Matrix → FretResolver::process_record() → KeySink
//!                                ├─ highest_fret()  (per string)
//!                                └─ is_strummed()   (per string)
//! ```
//!
//! The resolver owns no switch or key state. It reads the matrix through
//! [`MatrixView`] and emits through [`KeySink`], both passed in per call.

mod board;
mod matrix;
mod resolver;
mod sink;

pub use board::{
    Fretboard, FALLBACK_KEY, FRETBOARD, MAX_FRETS, NUM_FRETS, STRING_COUNT, STRUM_WIRING,
};
pub use matrix::{Matrix, MatrixPos, MatrixView, MATRIX_COLS, MATRIX_ROWS};
pub use resolver::{FretResolver, KeyRecord};
pub use sink::{
    Emission, HidReport, KeySink, BOOT_REPORT_KEYS, BOOT_REPORT_LEN, ERROR_ROLL_OVER,
};
