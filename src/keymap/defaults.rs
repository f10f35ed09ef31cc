//! Default fretboard wiring
//!
//! The shipped wiring is embedded from wiring.yaml at the project root and
//! falls back to the compiled-in board if that file fails to parse.

use std::path::Path;

use crate::fretboard::Fretboard;

use super::config::{load_wiring_file, parse_wiring_yaml, WiringError};

/// Default wiring YAML embedded at compile time
const DEFAULT_WIRING_YAML: &str = include_str!("../../wiring.yaml");

/// Get the embedded default wiring YAML content
pub fn get_default_wiring_yaml() -> &'static str {
    DEFAULT_WIRING_YAML
}

/// Load the wiring with local and user overrides applied
///
/// Loading order (each layer overrides the previous):
/// 1. Embedded default wiring (compiled into binary)
/// 2. wiring.yaml in current directory (project-local overrides)
/// 3. User config at ~/.config/stratokeister/wiring.yaml
///
/// A file that fails to load or validate is skipped with a warning.
pub fn load_default_fretboard() -> Fretboard {
    let mut board = match parse_wiring_yaml(DEFAULT_WIRING_YAML)
        .and_then(|config| config.apply(&Fretboard::default()))
    {
        Ok(board) => {
            tracing::info!("Loaded embedded default wiring");
            board
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse embedded wiring: {}, using hardcoded defaults",
                e
            );
            Fretboard::default()
        }
    };

    let local = Path::new("wiring.yaml");
    if local.exists() {
        board = merge_file(board, local);
    }

    if let Some(user_path) = crate::config_paths::wiring_file() {
        if user_path.exists() {
            board = merge_file(board, &user_path);
        }
    }

    board
}

/// Load the defaults, then apply one explicit wiring file on top
///
/// Unlike [`load_default_fretboard`], a broken file here is an error.
pub fn load_fretboard_with(path: &Path) -> Result<Fretboard, WiringError> {
    let board = load_default_fretboard();
    let config = load_wiring_file(path)?;
    let board = config.apply(&board)?;
    tracing::info!("Applied wiring from {}", path.display());
    Ok(board)
}

fn merge_file(board: Fretboard, path: &Path) -> Fretboard {
    match load_wiring_file(path).and_then(|config| config.apply(&board)) {
        Ok(merged) => {
            tracing::info!("Merged wiring from {}", path.display());
            merged
        }
        Err(e) => {
            tracing::warn!("Failed to load wiring from {}: {}", path.display(), e);
            board
        }
    }
}
