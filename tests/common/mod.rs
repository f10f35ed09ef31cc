//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use stratokeister::fretboard::{Emission, MatrixPos};
use stratokeister::{KeyCode, Keyboard};

/// Strum contacts, one per string (the first of each redundant pair)
pub const STRUM: [MatrixPos; 3] = [
    MatrixPos::new(1, 13),
    MatrixPos::new(2, 12),
    MatrixPos::new(2, 13),
];

/// Second contact of each strum pair
pub const STRUM_ALT: [MatrixPos; 3] = [
    MatrixPos::new(3, 11),
    MatrixPos::new(3, 12),
    MatrixPos::new(3, 13),
];

/// Matrix cell of a fret
pub fn fret(string: u8, fret: u8) -> MatrixPos {
    MatrixPos::new(string, fret)
}

pub fn key(c: char) -> KeyCode {
    KeyCode::char(c)
}

/// A keyboard on the default (play) layer with the shipped wiring
pub fn play_keyboard() -> Keyboard {
    Keyboard::default()
}

/// Registered keys, in registration order
pub fn held(keyboard: &Keyboard) -> Vec<KeyCode> {
    keyboard.hid().held().to_vec()
}

/// Keys registered by a batch of emissions
pub fn registered(emissions: &[Emission]) -> Vec<KeyCode> {
    emissions
        .iter()
        .filter_map(|e| match e {
            Emission::Register(key) => Some(*key),
            _ => None,
        })
        .collect()
}

/// Keys unregistered by a batch of emissions
pub fn unregistered(emissions: &[Emission]) -> Vec<KeyCode> {
    emissions
        .iter()
        .filter_map(|e| match e {
            Emission::Unregister(key) => Some(*key),
            _ => None,
        })
        .collect()
}
