//! Host model of the keyboard platform
//!
//! Owns everything the firmware platform would: the switch matrix, the
//! layer stack, the HID report and the encoder. Each switch transition goes
//! through the fret resolver first and then through default key processing,
//! the same order the platform uses.

use crate::config::SimConfig;
use crate::encoder::Encoder;
use crate::fretboard::{
    Emission, FretResolver, Fretboard, HidReport, KeyRecord, KeySink, Matrix, MatrixPos,
    MATRIX_COLS, MATRIX_ROWS,
};
use crate::keymap::{action_at, resolve_action, Action, Layer, LayerState};

/// Hook called on every layer-state change
///
/// Observers run in registration order, each receiving the state returned by
/// the previous one. The state returned by the last observer is applied.
pub trait LayerObserver {
    fn layer_state_set(&mut self, state: LayerState) -> LayerState;
}

/// Logs every layer change and leaves the state untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct LayerDebug;

impl LayerObserver for LayerDebug {
    fn layer_state_set(&mut self, state: LayerState) -> LayerState {
        tracing::debug!("layer state {} (top: {})", state, state.highest());
        state
    }
}

pub struct Keyboard {
    matrix: Matrix,
    /// Momentary and toggled layers
    layers: LayerState,
    /// Always-on base of the stack
    default_layers: LayerState,
    hid: HidReport,
    resolver: FretResolver,
    encoder: Encoder,
    observers: Vec<Box<dyn LayerObserver>>,
    /// Layer each held switch was resolved on at press time
    press_layers: [[Option<Layer>; MATRIX_COLS]; MATRIX_ROWS],
    bootloader_requested: bool,
    trace_matrix: bool,
}

impl Keyboard {
    /// Create a keyboard on the default layer with the layer-debug observer
    pub fn new(board: Fretboard) -> Self {
        Self {
            matrix: Matrix::new(),
            layers: LayerState::EMPTY,
            default_layers: LayerState::only(Layer::Default),
            hid: HidReport::new(),
            resolver: FretResolver::new(board),
            encoder: Encoder::new(),
            observers: vec![Box::new(LayerDebug)],
            press_layers: [[None; MATRIX_COLS]; MATRIX_ROWS],
            bootloader_requested: false,
            trace_matrix: false,
        }
    }

    /// Create a keyboard with simulator preferences applied
    pub fn with_config(board: Fretboard, config: &SimConfig) -> Self {
        let mut keyboard = Self::new(board);
        keyboard.encoder = Encoder::with_tap_delay(config.encoder_tap_delay());
        keyboard.trace_matrix = config.trace_matrix;
        if config.start_layer != Layer::Default {
            keyboard.layer_move(config.start_layer);
        }
        keyboard
    }

    // ========================================================================
    // Switch events
    // ========================================================================

    /// Apply one raw switch transition
    ///
    /// Returns false when the transition was dropped: off the matrix, or the
    /// switch was already in that state.
    pub fn process_transition(&mut self, pos: MatrixPos, pressed: bool) -> bool {
        if !pos.in_bounds() {
            tracing::warn!("ignoring transition at {} outside the switch matrix", pos);
            return false;
        }
        if !self.matrix.set(pos, pressed) {
            tracing::debug!("switch {} already {}", pos, if pressed { "down" } else { "up" });
            return false;
        }
        if self.trace_matrix {
            tracing::info!("matrix {} {}", pos, if pressed { "down" } else { "up" });
        }

        let action = self.action_for(pos, pressed);
        let record = KeyRecord { pos, pressed };
        let top = self.layer_state().highest();

        let handled = self
            .resolver
            .process_record(action, &record, top, &self.matrix, &mut self.hid);
        if handled {
            self.apply_action(action, pressed);
        }
        handled
    }

    pub fn press(&mut self, pos: MatrixPos) -> bool {
        self.process_transition(pos, true)
    }

    pub fn release(&mut self, pos: MatrixPos) -> bool {
        self.process_transition(pos, false)
    }

    /// Press then release one switch
    pub fn tap(&mut self, pos: MatrixPos) {
        self.press(pos);
        self.release(pos);
    }

    /// One detent on a rotary encoder
    pub fn encoder(&mut self, index: u8, clockwise: bool) -> bool {
        self.encoder.update(index, clockwise, &mut self.hid)
    }

    /// Resolve a switch through the layer stack
    ///
    /// A release uses the layer its press resolved on, so a key keeps its
    /// meaning even if the stack changed while it was held.
    fn action_for(&mut self, pos: MatrixPos, pressed: bool) -> Action {
        let slot = &mut self.press_layers[pos.row as usize][pos.col as usize];
        if pressed {
            let (layer, action) = resolve_action(self.layers | self.default_layers, pos);
            *slot = Some(layer);
            action
        } else {
            match slot.take() {
                Some(layer) => action_at(layer, pos),
                None => resolve_action(self.layers | self.default_layers, pos).1,
            }
        }
    }

    fn apply_action(&mut self, action: Action, pressed: bool) {
        match action {
            Action::Key(key) => {
                if pressed {
                    self.hid.register_code(key);
                } else {
                    self.hid.unregister_code(key);
                }
            }
            Action::Momentary(layer) => {
                if pressed {
                    self.layer_on(layer);
                } else {
                    self.layer_off(layer);
                }
            }
            Action::To(layer) => {
                if pressed {
                    self.layer_move(layer);
                }
            }
            Action::Bootloader => {
                if pressed {
                    tracing::info!("bootloader requested");
                    self.bootloader_requested = true;
                }
            }
            Action::Transparent | Action::No => {}
        }
    }

    // ========================================================================
    // Layer stack
    // ========================================================================

    pub fn layer_on(&mut self, layer: Layer) {
        self.set_layer_state(self.layers.with(layer));
    }

    pub fn layer_off(&mut self, layer: Layer) {
        self.set_layer_state(self.layers.without(layer));
    }

    /// Turn every layer off except `layer`
    pub fn layer_move(&mut self, layer: Layer) {
        self.set_layer_state(LayerState::only(layer));
    }

    fn set_layer_state(&mut self, state: LayerState) {
        let state = self
            .observers
            .iter_mut()
            .fold(state, |state, observer| observer.layer_state_set(state));
        self.layers = state;
    }

    /// Register an observer after the existing ones
    pub fn add_observer(&mut self, observer: impl LayerObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Active layers including the default layer
    pub fn layer_state(&self) -> LayerState {
        self.layers | self.default_layers
    }

    pub fn highest_layer(&self) -> Layer {
        self.layer_state().highest()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn hid(&self) -> &HidReport {
        &self.hid
    }

    /// Take every emission since the last call
    pub fn drain_emissions(&mut self) -> Vec<Emission> {
        self.hid.drain_log()
    }

    pub fn resolver(&self) -> &FretResolver {
        &self.resolver
    }

    pub fn encoder_mut(&mut self) -> &mut Encoder {
        &mut self.encoder
    }

    pub fn bootloader_requested(&self) -> bool {
        self.bootloader_requested
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new(Fretboard::default())
    }
}
