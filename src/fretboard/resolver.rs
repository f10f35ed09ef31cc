//! Fret resolution: which key each string sounds right now
//!
//! Called once per raw switch transition while a play layer is on top. Each
//! string is monophonic: of the frets held on it, only the highest one
//! sounds, and only while that string's strum bar is held. A strummed string
//! with no fret held sounds the open-string fallback key.
//!
//! Every strummed string is re-evaluated on every event, not just the string
//! of the switch that changed, because a fret and the strum bar can close in
//! either order and each must land on the same note.

use crate::keymap::{Action, KeyCode, Layer};

use super::board::{Fretboard, STRING_COUNT};
use super::matrix::{MatrixPos, MatrixView};
use super::sink::KeySink;

/// A raw switch transition as reported by the platform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyRecord {
    pub pos: MatrixPos,
    pub pressed: bool,
}

impl KeyRecord {
    pub const fn press(pos: MatrixPos) -> Self {
        Self { pos, pressed: true }
    }

    pub const fn release(pos: MatrixPos) -> Self {
        Self {
            pos,
            pressed: false,
        }
    }
}

/// Fret resolver over a fixed fretboard description
#[derive(Debug, Clone, Default)]
pub struct FretResolver {
    board: Fretboard,
}

impl FretResolver {
    pub fn new(board: Fretboard) -> Self {
        Self { board }
    }

    pub fn board(&self) -> &Fretboard {
        &self.board
    }

    /// Highest held fret on a string, scanning from the bridge end down
    ///
    /// Returns None when no fret is held or the string does not exist.
    pub fn highest_fret(&self, matrix: &impl MatrixView, string: usize) -> Option<usize> {
        (0..self.board.num_frets(string))
            .rev()
            .find(|&fret| {
                self.board
                    .fret_pos(string, fret)
                    .is_some_and(|pos| matrix.is_on(pos))
            })
    }

    /// Whether any strum-bar contact wired to this string is closed
    pub fn is_strummed(&self, matrix: &impl MatrixView, string: usize) -> bool {
        self.board
            .strum_cells(string)
            .iter()
            .any(|&pos| matrix.is_on(pos))
    }

    /// Whether any string is strummed
    pub fn any_strummed(&self, matrix: &impl MatrixView) -> bool {
        (0..STRING_COUNT).any(|string| self.is_strummed(matrix, string))
    }

    /// Key a strummed string should sound: its highest fret, or the fallback
    pub fn sounding_key(&self, matrix: &impl MatrixView, string: usize) -> Option<KeyCode> {
        if !self.is_strummed(matrix, string) {
            return None;
        }
        match self.highest_fret(matrix, string) {
            Some(fret) => self.board.fret_key(string, fret),
            None => Some(self.board.fallback()),
        }
    }

    /// Handle one raw transition
    ///
    /// `action` is the layout meaning of the switch and is only used for the
    /// diagnostic trace. Always returns true so the platform carries on with
    /// its default handling of the key.
    pub fn process_record(
        &self,
        action: Action,
        record: &KeyRecord,
        layer: Layer,
        matrix: &impl MatrixView,
        sink: &mut impl KeySink,
    ) -> bool {
        tracing::trace!(
            "KL: row: {}, column: {}, pressed: {}, action: {}",
            record.pos.row,
            record.pos.col,
            record.pressed,
            action
        );

        if !layer.is_play() {
            return true;
        }

        if record.pressed {
            self.on_press(matrix, sink);
        } else {
            self.on_release(matrix, sink);
        }

        true
    }

    fn on_press(&self, matrix: &impl MatrixView, sink: &mut impl KeySink) {
        for string in 0..STRING_COUNT {
            if let Some(key) = self.sounding_key(matrix, string) {
                sink.register_code(key);
            }
        }
    }

    fn on_release(&self, matrix: &impl MatrixView, sink: &mut impl KeySink) {
        // The open-string key is shared, so it only goes up once every bar is released
        if !self.any_strummed(matrix) {
            sink.unregister_code(self.board.fallback());
        }

        for string in 0..STRING_COUNT {
            if self.is_strummed(matrix, string) {
                // Fall through to a lower fret that is still held
                if let Some(key) = self
                    .highest_fret(matrix, string)
                    .and_then(|fret| self.board.fret_key(string, fret))
                {
                    sink.register_code(key);
                }
            } else {
                for key in self.board.string_keys(string) {
                    sink.unregister_code(key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fretboard::matrix::Matrix;
    use crate::fretboard::sink::{Emission, HidReport};

    fn fret(string: u8, fret: u8) -> MatrixPos {
        MatrixPos::new(string, fret)
    }

    #[test]
    fn test_highest_fret_picks_rightmost() {
        let resolver = FretResolver::default();
        let matrix = Matrix::with_pressed(&[fret(0, 2), fret(0, 5), fret(0, 9)]);
        assert_eq!(resolver.highest_fret(&matrix, 0), Some(9));
    }

    #[test]
    fn test_highest_fret_none_when_open() {
        let resolver = FretResolver::default();
        assert_eq!(resolver.highest_fret(&Matrix::new(), 1), None);
    }

    #[test]
    fn test_highest_fret_ignores_strum_cells() {
        let resolver = FretResolver::default();
        // (1,13) is string 0's strum contact, outside string 1's 13 frets
        let matrix = Matrix::with_pressed(&[MatrixPos::new(1, 13)]);
        assert_eq!(resolver.highest_fret(&matrix, 1), None);
    }

    #[test]
    fn test_invalid_string_falls_through() {
        let resolver = FretResolver::default();
        let matrix = Matrix::with_pressed(&[MatrixPos::new(3, 11), MatrixPos::new(3, 0)]);
        assert_eq!(resolver.highest_fret(&matrix, 3), None);
        assert!(!resolver.is_strummed(&matrix, 3));
    }

    #[test]
    fn test_either_contact_strums() {
        let resolver = FretResolver::default();
        assert!(resolver.is_strummed(&Matrix::with_pressed(&[MatrixPos::new(1, 13)]), 0));
        assert!(resolver.is_strummed(&Matrix::with_pressed(&[MatrixPos::new(3, 11)]), 0));
        assert!(resolver.is_strummed(&Matrix::with_pressed(&[MatrixPos::new(3, 12)]), 1));
        assert!(resolver.is_strummed(&Matrix::with_pressed(&[MatrixPos::new(2, 13)]), 2));
        assert!(!resolver.is_strummed(&Matrix::with_pressed(&[MatrixPos::new(3, 12)]), 0));
    }

    #[test]
    fn test_press_registers_highest_fret() {
        let resolver = FretResolver::default();
        let matrix = Matrix::with_pressed(&[MatrixPos::new(3, 11), fret(0, 3), fret(0, 7)]);
        let mut hid = HidReport::new();

        let handled = resolver.process_record(
            Action::Transparent,
            &KeyRecord::press(MatrixPos::new(3, 11)),
            Layer::Tone0,
            &matrix,
            &mut hid,
        );

        assert!(handled);
        assert_eq!(hid.log(), &[Emission::Register(KeyCode::char('u'))]);
    }

    #[test]
    fn test_press_without_fret_sounds_open_string() {
        let resolver = FretResolver::default();
        let matrix = Matrix::with_pressed(&[MatrixPos::new(2, 12)]);
        let mut hid = HidReport::new();

        resolver.process_record(
            Action::Transparent,
            &KeyRecord::press(MatrixPos::new(2, 12)),
            Layer::Default,
            &matrix,
            &mut hid,
        );

        assert_eq!(hid.held(), &[KeyCode::Space]);
    }

    #[test]
    fn test_pass_through_layer_emits_nothing() {
        let resolver = FretResolver::default();
        let matrix = Matrix::with_pressed(&[MatrixPos::new(3, 11), fret(0, 1)]);
        let mut hid = HidReport::new();

        for layer in [Layer::Normal, Layer::Config] {
            assert!(resolver.process_record(
                Action::Transparent,
                &KeyRecord::press(fret(0, 1)),
                layer,
                &matrix,
                &mut hid,
            ));
            assert!(resolver.process_record(
                Action::Transparent,
                &KeyRecord::release(fret(0, 1)),
                layer,
                &matrix,
                &mut hid,
            ));
        }

        assert!(hid.log().is_empty());
    }

    #[test]
    fn test_release_with_no_strum_cleans_every_string() {
        let resolver = FretResolver::default();
        let mut hid = HidReport::new();

        resolver.process_record(
            Action::Transparent,
            &KeyRecord::release(MatrixPos::new(3, 11)),
            Layer::Tone1,
            &Matrix::new(),
            &mut hid,
        );

        let log = hid.log();
        assert_eq!(log[0], Emission::Unregister(KeyCode::Space));
        // fallback + 14 + 13 + 12 fret keys
        assert_eq!(log.len(), 1 + 14 + 13 + 12);
        assert!(log.iter().all(|e| matches!(e, Emission::Unregister(_))));
    }

    #[test]
    fn test_release_keeps_fallback_while_any_string_strummed() {
        let resolver = FretResolver::default();
        let matrix = Matrix::with_pressed(&[MatrixPos::new(2, 13)]);
        let mut hid = HidReport::new();

        resolver.process_record(
            Action::Transparent,
            &KeyRecord::release(MatrixPos::new(3, 11)),
            Layer::Tone1,
            &matrix,
            &mut hid,
        );

        assert!(!hid.log().contains(&Emission::Unregister(KeyCode::Space)));
        // Strings 0 and 1 are not strummed and get cleaned up
        assert!(hid.log().contains(&Emission::Unregister(KeyCode::Tab)));
        assert!(hid.log().contains(&Emission::Unregister(KeyCode::Enter)));
        // String 2 is strummed and keeps its keys
        assert!(!hid.log().contains(&Emission::Unregister(KeyCode::LeftShift)));
    }

    #[test]
    fn test_sounding_key() {
        let resolver = FretResolver::default();
        let matrix = Matrix::with_pressed(&[MatrixPos::new(3, 12), fret(1, 4), fret(0, 2)]);
        assert_eq!(resolver.sounding_key(&matrix, 0), None);
        assert_eq!(resolver.sounding_key(&matrix, 1), Some(KeyCode::char('f')));
        assert_eq!(resolver.sounding_key(&matrix, 2), None);
    }
}
