//! Fretboard layout: fret keys per string and strum-bar wiring

use crate::keymap::KeyCode;

use super::matrix::MatrixPos;

/// Number of string rows on the neck
pub const STRING_COUNT: usize = 3;
/// Widest string row
pub const MAX_FRETS: usize = 14;

/// Key sent when a string is strummed with no fret held
pub const FALLBACK_KEY: KeyCode = KeyCode::Space;

const fn c(ch: char) -> Option<KeyCode> {
    Some(KeyCode::char(ch))
}

const fn k(key: KeyCode) -> Option<KeyCode> {
    Some(key)
}

/// Key emitted for each fret, indexed `[string][fret]`
///
/// Cells past a string's fret count are padding; on the real board those
/// matrix cells carry strum-bar contacts.
pub const FRETBOARD: [[Option<KeyCode>; MAX_FRETS]; STRING_COUNT] = [
    [
        k(KeyCode::Tab),
        c('q'),
        c('w'),
        c('e'),
        c('r'),
        c('t'),
        c('y'),
        c('u'),
        c('i'),
        c('o'),
        c('p'),
        c('['),
        c(']'),
        c('\\'),
    ],
    [
        k(KeyCode::CapsLock),
        c('a'),
        c('s'),
        c('d'),
        c('f'),
        c('g'),
        c('h'),
        c('j'),
        c('k'),
        c('l'),
        c(';'),
        c('\''),
        k(KeyCode::Enter),
        None,
    ],
    [
        k(KeyCode::LeftShift),
        c('z'),
        c('x'),
        c('c'),
        c('v'),
        c('b'),
        c('n'),
        c('m'),
        c(','),
        c('.'),
        c('/'),
        k(KeyCode::RightShift),
        None,
        None,
    ],
];

/// Frets scanned per string (bounds the scan, independent of table width)
pub const NUM_FRETS: [usize; STRING_COUNT] = [14, 13, 12];

/// Strum-bar contacts per string. The bar is wired redundantly across two
/// matrix rows, so each string watches a pair of cells.
pub const STRUM_WIRING: [[MatrixPos; 2]; STRING_COUNT] = [
    [MatrixPos::new(1, 13), MatrixPos::new(3, 11)],
    [MatrixPos::new(2, 12), MatrixPos::new(3, 12)],
    [MatrixPos::new(2, 13), MatrixPos::new(3, 13)],
];

/// A complete fretboard description: fret keys, fret counts and strum wiring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fretboard {
    frets: [[Option<KeyCode>; MAX_FRETS]; STRING_COUNT],
    num_frets: [usize; STRING_COUNT],
    strum: [Vec<MatrixPos>; STRING_COUNT],
    fallback: KeyCode,
}

impl Fretboard {
    /// Build a fretboard from its parts
    ///
    /// Fret counts are clamped to the table width.
    pub fn new(
        frets: [[Option<KeyCode>; MAX_FRETS]; STRING_COUNT],
        num_frets: [usize; STRING_COUNT],
        strum: [Vec<MatrixPos>; STRING_COUNT],
        fallback: KeyCode,
    ) -> Self {
        Self {
            frets,
            num_frets: num_frets.map(|n| n.min(MAX_FRETS)),
            strum,
            fallback,
        }
    }

    /// The board as shipped
    pub fn stratokeister() -> Self {
        Self::new(
            FRETBOARD,
            NUM_FRETS,
            STRUM_WIRING.map(|pair| pair.to_vec()),
            FALLBACK_KEY,
        )
    }

    /// Number of frets scanned on a string (0 for an invalid string)
    pub fn num_frets(&self, string: usize) -> usize {
        self.num_frets.get(string).copied().unwrap_or(0)
    }

    /// Key bound to a fret, if the fret exists
    pub fn fret_key(&self, string: usize, fret: usize) -> Option<KeyCode> {
        if fret >= self.num_frets(string) {
            return None;
        }
        self.frets[string][fret]
    }

    /// Every key bound on a string, in fret order
    pub fn string_keys(&self, string: usize) -> impl Iterator<Item = KeyCode> + '_ {
        (0..self.num_frets(string)).filter_map(move |fret| self.fret_key(string, fret))
    }

    /// Matrix cell for a fret. Frets sit on the matrix row of their string.
    pub fn fret_pos(&self, string: usize, fret: usize) -> Option<MatrixPos> {
        if fret >= self.num_frets(string) {
            return None;
        }
        Some(MatrixPos::new(string as u8, fret as u8))
    }

    /// Strum-bar cells wired to a string (empty for an invalid string)
    pub fn strum_cells(&self, string: usize) -> &[MatrixPos] {
        self.strum.get(string).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fallback(&self) -> KeyCode {
        self.fallback
    }

    /// Check if a cell is inside any string's scanned fret range
    pub fn is_fret_cell(&self, pos: MatrixPos) -> bool {
        let string = pos.row as usize;
        string < STRING_COUNT && (pos.col as usize) < self.num_frets(string)
    }
}

impl Default for Fretboard {
    fn default() -> Self {
        Self::stratokeister()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fret_counts_cover_every_bound_key() {
        let board = Fretboard::default();
        for string in 0..STRING_COUNT {
            assert_eq!(board.string_keys(string).count(), NUM_FRETS[string]);
        }
    }

    #[test]
    fn test_padding_is_not_a_fret() {
        let board = Fretboard::default();
        assert_eq!(board.fret_key(1, 13), None);
        assert_eq!(board.fret_key(2, 12), None);
        assert_eq!(board.fret_pos(2, 12), None);
    }

    #[test]
    fn test_invalid_string() {
        let board = Fretboard::default();
        assert_eq!(board.num_frets(3), 0);
        assert_eq!(board.fret_key(3, 0), None);
        assert!(board.strum_cells(7).is_empty());
    }

    #[test]
    fn test_strum_cells_never_overlap_frets() {
        let board = Fretboard::default();
        for string in 0..STRING_COUNT {
            for &cell in board.strum_cells(string) {
                assert!(!board.is_fret_cell(cell), "{} is also a fret", cell);
                assert!(cell.in_bounds());
            }
        }
    }

    #[test]
    fn test_known_keys() {
        let board = Fretboard::default();
        assert_eq!(board.fret_key(0, 0), Some(KeyCode::Tab));
        assert_eq!(board.fret_key(0, 9), Some(KeyCode::char('o')));
        assert_eq!(board.fret_key(1, 12), Some(KeyCode::Enter));
        assert_eq!(board.fret_key(2, 11), Some(KeyCode::RightShift));
        assert_eq!(board.fallback(), KeyCode::Space);
    }

    #[test]
    fn test_new_clamps_fret_counts() {
        let board = Fretboard::new(
            FRETBOARD,
            [20, 13, 12],
            STRUM_WIRING.map(|pair| pair.to_vec()),
            FALLBACK_KEY,
        );
        assert_eq!(board.num_frets(0), MAX_FRETS);
    }
}
