//! YAML configuration parsing for fretboard wiring
//!
//! Parses wiring.yaml files into a [`Fretboard`]. A wiring file may replace
//! the strings (fret keys and strum contacts) and the open-string key; any
//! section it leaves out is taken from the board it is applied to.

use std::path::Path;

use serde::Deserialize;

use crate::fretboard::{Fretboard, MatrixPos, MAX_FRETS, STRING_COUNT};

use super::types::KeyCode;

/// Root structure of a wiring YAML file
#[derive(Debug, Default, Deserialize)]
pub struct WiringConfig {
    #[serde(default)]
    pub strings: Option<Vec<StringConfig>>,
    #[serde(default)]
    pub fallback: Option<String>,
}

/// One string entry from YAML
#[derive(Debug, Deserialize)]
pub struct StringConfig {
    /// Key names, lowest fret first
    pub frets: Vec<String>,
    /// Strum-bar contacts as `[row, col]`
    pub strum: Vec<[u8; 2]>,
}

/// Load a wiring file from disk
pub fn load_wiring_file(path: &Path) -> Result<WiringConfig, WiringError> {
    let content = std::fs::read_to_string(path).map_err(|e| WiringError::IoError(e.to_string()))?;

    parse_wiring_yaml(&content)
}

/// Parse a wiring file from a YAML string
pub fn parse_wiring_yaml(yaml: &str) -> Result<WiringConfig, WiringError> {
    // An empty document is a valid "change nothing" file
    if yaml.trim().is_empty() {
        return Ok(WiringConfig::default());
    }
    serde_yaml::from_str(yaml).map_err(|e| WiringError::ParseError(e.to_string()))
}

impl WiringConfig {
    /// Apply this file on top of `base`, validating the result
    pub fn apply(&self, base: &Fretboard) -> Result<Fretboard, WiringError> {
        let fallback = match &self.fallback {
            Some(name) => parse_key_code(name)?,
            None => base.fallback(),
        };

        let Some(strings) = &self.strings else {
            return Ok(Fretboard::new(
                table_of(base),
                counts_of(base),
                strum_of(base),
                fallback,
            ));
        };

        if strings.len() != STRING_COUNT {
            return Err(WiringError::InvalidString(format!(
                "expected {} strings, found {}",
                STRING_COUNT,
                strings.len()
            )));
        }

        let mut frets = [[None; MAX_FRETS]; STRING_COUNT];
        let mut num_frets = [0; STRING_COUNT];
        let mut strum: [Vec<MatrixPos>; STRING_COUNT] = Default::default();

        for (idx, string) in strings.iter().enumerate() {
            if string.frets.is_empty() || string.frets.len() > MAX_FRETS {
                return Err(WiringError::InvalidString(format!(
                    "string {} has {} frets (expected 1..={})",
                    idx,
                    string.frets.len(),
                    MAX_FRETS
                )));
            }
            if string.strum.is_empty() {
                return Err(WiringError::InvalidString(format!(
                    "string {} has no strum contacts",
                    idx
                )));
            }

            for (fret, name) in string.frets.iter().enumerate() {
                frets[idx][fret] = Some(parse_key_code(name)?);
            }
            num_frets[idx] = string.frets.len();
            strum[idx] = string
                .strum
                .iter()
                .map(|&[row, col]| MatrixPos::new(row, col))
                .collect();
        }

        let board = Fretboard::new(frets, num_frets, strum, fallback);
        validate_cells(&board)?;
        Ok(board)
    }
}

/// Strum contacts must exist and must not sit inside any string's fret range
fn validate_cells(board: &Fretboard) -> Result<(), WiringError> {
    for string in 0..STRING_COUNT {
        for &cell in board.strum_cells(string) {
            if !cell.in_bounds() {
                return Err(WiringError::InvalidCell(format!(
                    "strum contact {} for string {} is off the matrix",
                    cell, string
                )));
            }
            if board.is_fret_cell(cell) {
                return Err(WiringError::InvalidCell(format!(
                    "strum contact {} for string {} overlaps a fret",
                    cell, string
                )));
            }
        }
    }
    Ok(())
}

fn table_of(board: &Fretboard) -> [[Option<KeyCode>; MAX_FRETS]; STRING_COUNT] {
    let mut table = [[None; MAX_FRETS]; STRING_COUNT];
    for (string, row) in table.iter_mut().enumerate() {
        for (fret, cell) in row.iter_mut().enumerate() {
            *cell = board.fret_key(string, fret);
        }
    }
    table
}

fn counts_of(board: &Fretboard) -> [usize; STRING_COUNT] {
    std::array::from_fn(|string| board.num_frets(string))
}

fn strum_of(board: &Fretboard) -> [Vec<MatrixPos>; STRING_COUNT] {
    std::array::from_fn(|string| board.strum_cells(string).to_vec())
}

/// Parse a key name into a KeyCode
///
/// Accepts QMK spellings (`KC_TAB`, `kc_lbrc`), plain names (`tab`,
/// `left_bracket`) and single characters (`q`, `[`).
pub fn parse_key_code(name: &str) -> Result<KeyCode, WiringError> {
    let trimmed = name.trim();
    let lower = trimmed.to_lowercase();
    let key = lower.strip_prefix("kc_").unwrap_or(&lower);

    // Single character
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return if KeyCode::char(c).hid_usage().is_some() {
            Ok(KeyCode::char(c))
        } else {
            Err(WiringError::InvalidKey(trimmed.to_string()))
        };
    }

    match key {
        "enter" | "ent" | "return" => Ok(KeyCode::Enter),
        "escape" | "esc" => Ok(KeyCode::Escape),
        "tab" => Ok(KeyCode::Tab),
        "backspace" | "bspc" => Ok(KeyCode::Backspace),
        "space" | "spc" => Ok(KeyCode::Space),
        "caps_lock" | "capslock" | "caps" => Ok(KeyCode::CapsLock),
        "locking_caps_lock" | "lockingcapslock" | "lcap" => Ok(KeyCode::LockingCapsLock),

        "left_shift" | "leftshift" | "lshift" | "lsft" => Ok(KeyCode::LeftShift),
        "right_shift" | "rightshift" | "rshift" | "rsft" => Ok(KeyCode::RightShift),

        "mute" | "audio_mute" => Ok(KeyCode::Mute),
        "volume_up" | "volumeup" | "audio_vol_up" | "volu" => Ok(KeyCode::VolumeUp),
        "volume_down" | "volumedown" | "audio_vol_down" | "vold" => Ok(KeyCode::VolumeDown),

        // Punctuation
        "minus" | "mins" => Ok(KeyCode::char('-')),
        "equal" | "eql" => Ok(KeyCode::char('=')),
        "left_bracket" | "lbrc" => Ok(KeyCode::char('[')),
        "right_bracket" | "rbrc" => Ok(KeyCode::char(']')),
        "backslash" | "bsls" => Ok(KeyCode::char('\\')),
        "semicolon" | "scln" => Ok(KeyCode::char(';')),
        "quote" | "quot" => Ok(KeyCode::char('\'')),
        "grave" | "grv" => Ok(KeyCode::char('`')),
        "comma" | "comm" => Ok(KeyCode::char(',')),
        "dot" | "period" => Ok(KeyCode::char('.')),
        "slash" | "slsh" => Ok(KeyCode::char('/')),

        _ => Err(WiringError::InvalidKey(trimmed.to_string())),
    }
}

/// Errors that can occur when loading a wiring file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WiringError {
    IoError(String),
    ParseError(String),
    InvalidKey(String),
    InvalidString(String),
    InvalidCell(String),
}

impl std::fmt::Display for WiringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WiringError::IoError(e) => write!(f, "IO error: {}", e),
            WiringError::ParseError(e) => write!(f, "Parse error: {}", e),
            WiringError::InvalidKey(k) => write!(f, "Invalid key: {}", k),
            WiringError::InvalidString(s) => write!(f, "Invalid string: {}", s),
            WiringError::InvalidCell(c) => write!(f, "Invalid cell: {}", c),
        }
    }
}

impl std::error::Error for WiringError {}
