//! Keymap: key codes, layers and the per-layer layout table
//!
//! # Architecture
//!
//! ```text
//! MatrixPos + LayerState → resolve_action() → (Layer, Action)
//! wiring.yaml → parse_wiring_yaml() → WiringConfig::apply() → Fretboard
//! ```
//!
//! # Loading Wiring
//!
//! ```ignore
//! // Embedded defaults plus ./wiring.yaml and the user file
//! let board = load_default_fretboard();
//!
//! // Or one explicit file on top of the defaults
//! let board = load_fretboard_with(Path::new("wiring.yaml"))?;
//! ```

mod config;
mod defaults;
mod layer;
pub mod layout;
mod types;

pub use config::{
    load_wiring_file, parse_key_code, parse_wiring_yaml, StringConfig, WiringConfig, WiringError,
};
pub use defaults::{get_default_wiring_yaml, load_default_fretboard, load_fretboard_with};
pub use layer::{Layer, LayerState, LAYER_COUNT};
pub use layout::{action_at, resolve_action, LayerMap, KEYMAPS};
pub use types::{Action, KeyCode};
