//! Stratokeister - guitar-style keyboard firmware logic
//!
//! This crate provides the fret resolution, layer stack and encoder handling
//! for a guitar-shaped keyboard, plus a host model that plays scripted
//! sessions against them.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod encoder;
pub mod fretboard;
pub mod keyboard;
pub mod keymap;
pub mod script;
pub mod tracing;

// Re-export commonly used types
pub use config::SimConfig;
pub use encoder::Encoder;
pub use fretboard::{Emission, FretResolver, Fretboard, HidReport, KeySink, Matrix, MatrixPos};
pub use keyboard::{Keyboard, LayerDebug, LayerObserver};
pub use keymap::{Action, KeyCode, Layer, LayerState};
pub use script::{Script, Step, StepOutcome};
