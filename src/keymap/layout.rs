//! Static per-layer layout table
//!
//! Each layer is written in physical groups (the three strings, the strum
//! bar contacts, the control row, the encoder push and the thumb keys) and
//! placed onto the switch matrix by [`layout`].

use crate::fretboard::{MatrixPos, MATRIX_COLS, MATRIX_ROWS};

use super::layer::{Layer, LayerState, LAYER_COUNT};
use super::types::{Action, KeyCode};

/// One layer, indexed `[row][col]` like the switch matrix
pub type LayerMap = [[Action; MATRIX_COLS]; MATRIX_ROWS];

const _______: Action = Action::Transparent;
const XXXXXXX: Action = Action::No;

/// Strum-bar contacts, paired per string
pub const STRUM_CELLS: [MatrixPos; 6] = [
    MatrixPos::new(1, 13),
    MatrixPos::new(3, 11),
    MatrixPos::new(2, 12),
    MatrixPos::new(3, 12),
    MatrixPos::new(2, 13),
    MatrixPos::new(3, 13),
];

/// Control row above the neck
pub const CONTROL_CELLS: [MatrixPos; 6] = [
    MatrixPos::new(3, 0),
    MatrixPos::new(3, 1),
    MatrixPos::new(3, 2),
    MatrixPos::new(3, 3),
    MatrixPos::new(3, 4),
    MatrixPos::new(3, 5),
];

/// Rotary encoder push switch
pub const ENCODER_CELL: MatrixPos = MatrixPos::new(3, 6);

pub const THUMB_CELLS: [MatrixPos; 4] = [
    MatrixPos::new(4, 0),
    MatrixPos::new(4, 1),
    MatrixPos::new(4, 2),
    MatrixPos::new(4, 3),
];

const fn kc(c: char) -> Action {
    Action::Key(KeyCode::char(c))
}

const fn key(key: KeyCode) -> Action {
    Action::Key(key)
}

/// Place one layer's physical groups onto the matrix
///
/// Matrix cells that carry no switch stay `No`.
pub const fn layout(
    string0: [Action; 14],
    string1: [Action; 13],
    string2: [Action; 12],
    strum: [Action; 6],
    controls: [Action; 6],
    encoder: Action,
    thumbs: [Action; 4],
) -> LayerMap {
    let mut map = [[XXXXXXX; MATRIX_COLS]; MATRIX_ROWS];

    let mut i = 0;
    while i < 14 {
        map[0][i] = string0[i];
        i += 1;
    }
    let mut i = 0;
    while i < 13 {
        map[1][i] = string1[i];
        i += 1;
    }
    let mut i = 0;
    while i < 12 {
        map[2][i] = string2[i];
        i += 1;
    }
    let mut i = 0;
    while i < 6 {
        let pos = STRUM_CELLS[i];
        map[pos.row as usize][pos.col as usize] = strum[i];
        i += 1;
    }
    let mut i = 0;
    while i < 6 {
        let pos = CONTROL_CELLS[i];
        map[pos.row as usize][pos.col as usize] = controls[i];
        i += 1;
    }
    map[ENCODER_CELL.row as usize][ENCODER_CELL.col as usize] = encoder;
    let mut i = 0;
    while i < 4 {
        let pos = THUMB_CELLS[i];
        map[pos.row as usize][pos.col as usize] = thumbs[i];
        i += 1;
    }

    map
}

const TRANSPARENT: LayerMap = layout(
    [_______; 14],
    [_______; 13],
    [_______; 12],
    [_______; 6],
    [_______; 6],
    _______,
    [_______; 4],
);

/// Pick-up selector layer: the first fret of string 0 types a digit
const fn pick_up(digit: char) -> LayerMap {
    let mut string0 = [_______; 14];
    string0[0] = kc(digit);
    layout(
        string0,
        [_______; 13],
        [_______; 12],
        [_______; 6],
        [_______; 6],
        _______,
        [_______; 4],
    )
}

/// Every layer, indexed by [`Layer::index`]
pub static KEYMAPS: [LayerMap; LAYER_COUNT] = [
    // DEFAULT
    layout(
        [_______; 14],
        [_______; 13],
        [_______; 12],
        [_______; 6],
        [
            Action::Momentary(Layer::Pu0),
            Action::Momentary(Layer::Pu2),
            Action::Momentary(Layer::Pu4),
            _______,
            _______,
            _______,
        ],
        key(KeyCode::Mute),
        [
            key(KeyCode::LockingCapsLock),
            key(KeyCode::LeftShift),
            Action::Momentary(Layer::Tone2),
            Action::Momentary(Layer::Config),
        ],
    ),
    // TONE0..TONE3
    TRANSPARENT,
    TRANSPARENT,
    TRANSPARENT,
    TRANSPARENT,
    // PU0..PU4
    pick_up('0'),
    pick_up('1'),
    pick_up('2'),
    pick_up('3'),
    pick_up('4'),
    // NORMAL
    layout(
        [
            key(KeyCode::Tab),
            kc('q'),
            kc('w'),
            kc('e'),
            kc('r'),
            kc('t'),
            kc('t'),
            kc('y'),
            kc('u'),
            kc('i'),
            kc('o'),
            kc('p'),
            kc('['),
            kc(']'),
        ],
        [
            key(KeyCode::CapsLock),
            kc('a'),
            kc('s'),
            kc('d'),
            kc('f'),
            kc('g'),
            kc('h'),
            kc('j'),
            kc('k'),
            kc('l'),
            kc(';'),
            kc('\''),
            key(KeyCode::Enter),
        ],
        [
            key(KeyCode::LeftShift),
            kc('z'),
            kc('x'),
            kc('c'),
            kc('v'),
            kc('b'),
            kc('n'),
            kc('m'),
            kc(','),
            kc('.'),
            kc('/'),
            key(KeyCode::RightShift),
        ],
        [_______; 6],
        [_______; 6],
        Action::To(Layer::Normal),
        [_______; 4],
    ),
    // CONFIG
    layout(
        [XXXXXXX; 14],
        [XXXXXXX; 13],
        [
            XXXXXXX,
            XXXXXXX,
            XXXXXXX,
            XXXXXXX,
            XXXXXXX,
            XXXXXXX,
            XXXXXXX,
            XXXXXXX,
            XXXXXXX,
            XXXXXXX,
            XXXXXXX,
            Action::To(Layer::Normal),
        ],
        [XXXXXXX; 6],
        [XXXXXXX; 6],
        Action::Bootloader,
        [_______; 4],
    ),
];

/// Action bound to a cell on one layer (`No` for cells off the board)
pub fn action_at(layer: Layer, pos: MatrixPos) -> Action {
    if !pos.in_bounds() {
        return Action::No;
    }
    KEYMAPS[layer.index()][pos.row as usize][pos.col as usize]
}

/// Resolve a cell through the layer stack
///
/// Walks the active layers from the top down and returns the first cell
/// that is not transparent, with the layer it came from. If every active
/// layer is transparent the default layer's cell is returned.
pub fn resolve_action(state: LayerState, pos: MatrixPos) -> (Layer, Action) {
    state
        .iter_desc()
        .map(|layer| (layer, action_at(layer, pos)))
        .find(|(_, action)| !action.is_transparent())
        .unwrap_or((Layer::Default, action_at(Layer::Default, pos)))
}
