//! Layer names and the active-layer bitmask
//!
//! Mirrors the platform's layer stack: a 32-bit mask where bit `n` means
//! layer `n` is on. The highest set bit is the active layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of layers in the keymap
pub const LAYER_COUNT: usize = 12;

/// Named keymap layers, in stack order (higher index wins)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Default,
    Tone0,
    Tone1,
    Tone2,
    Tone3,
    Pu0,
    Pu1,
    Pu2,
    Pu3,
    Pu4,
    /// Plain typing layer
    Normal,
    /// Device configuration layer
    Config,
}

impl Layer {
    pub const ALL: [Layer; LAYER_COUNT] = [
        Layer::Default,
        Layer::Tone0,
        Layer::Tone1,
        Layer::Tone2,
        Layer::Tone3,
        Layer::Pu0,
        Layer::Pu1,
        Layer::Pu2,
        Layer::Pu3,
        Layer::Pu4,
        Layer::Normal,
        Layer::Config,
    ];

    /// Position in the layer stack
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a layer by stack position
    pub fn from_index(index: usize) -> Option<Layer> {
        Self::ALL.get(index).copied()
    }

    /// Whether fret resolution runs while this layer is on top
    ///
    /// Everything except the typing and configuration layers is a play layer.
    pub const fn is_play(self) -> bool {
        !matches!(self, Layer::Normal | Layer::Config)
    }

    /// Upper-case name as used in the keymap source
    pub const fn name(self) -> &'static str {
        match self {
            Layer::Default => "DEFAULT",
            Layer::Tone0 => "TONE0",
            Layer::Tone1 => "TONE1",
            Layer::Tone2 => "TONE2",
            Layer::Tone3 => "TONE3",
            Layer::Pu0 => "PU0",
            Layer::Pu1 => "PU1",
            Layer::Pu2 => "PU2",
            Layer::Pu3 => "PU3",
            Layer::Pu4 => "PU4",
            Layer::Normal => "NORMAL",
            Layer::Config => "CONFIG",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|layer| layer.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown layer: {}", s))
    }
}

/// Bitmask of active layers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerState(u32);

impl LayerState {
    pub const EMPTY: LayerState = LayerState(0);

    /// Create a state with exactly one layer on
    pub const fn only(layer: Layer) -> Self {
        LayerState(1 << layer.index())
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if a layer is on
    #[inline]
    pub const fn is_on(self, layer: Layer) -> bool {
        self.0 & (1 << layer.index()) != 0
    }

    /// Return this state with a layer turned on
    pub const fn with(self, layer: Layer) -> Self {
        LayerState(self.0 | (1 << layer.index()))
    }

    /// Return this state with a layer turned off
    pub const fn without(self, layer: Layer) -> Self {
        LayerState(self.0 & !(1 << layer.index()))
    }

    /// Combine two states
    #[inline]
    pub const fn union(self, other: LayerState) -> Self {
        LayerState(self.0 | other.0)
    }

    /// The highest active layer; an empty state reports the default layer
    pub fn highest(self) -> Layer {
        if self.is_empty() {
            return Layer::Default;
        }
        let top = 31 - self.0.leading_zeros() as usize;
        Layer::from_index(top).unwrap_or(Layer::Default)
    }

    /// Active layers from highest to lowest
    pub fn iter_desc(self) -> impl Iterator<Item = Layer> {
        Layer::ALL
            .into_iter()
            .rev()
            .filter(move |layer| self.is_on(*layer))
    }
}

impl std::ops::BitOr for LayerState {
    type Output = LayerState;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for LayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Layer::ALL
            .iter()
            .filter(|layer| self.is_on(**layer))
            .map(|layer| layer.name())
            .collect();
        write!(f, "{:#010x} [{}]", self.0, names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state_is_default_layer() {
        assert!(LayerState::EMPTY.is_empty());
        assert_eq!(LayerState::EMPTY.highest(), Layer::Default);
    }

    #[test]
    fn test_highest_layer_wins() {
        let state = LayerState::EMPTY.with(Layer::Tone2).with(Layer::Pu4);
        assert_eq!(state.highest(), Layer::Pu4);
        assert_eq!(state.without(Layer::Pu4).highest(), Layer::Tone2);
    }

    #[test]
    fn test_play_layers() {
        assert!(Layer::Default.is_play());
        assert!(Layer::Tone0.is_play());
        assert!(Layer::Pu3.is_play());
        assert!(!Layer::Normal.is_play());
        assert!(!Layer::Config.is_play());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("tone2".parse::<Layer>(), Ok(Layer::Tone2));
        assert_eq!("CONFIG".parse::<Layer>(), Ok(Layer::Config));
        assert!("tone9".parse::<Layer>().is_err());
    }

    #[test]
    fn test_index_round_trip() {
        for layer in Layer::ALL {
            assert_eq!(Layer::from_index(layer.index()), Some(layer));
        }
        assert_eq!(Layer::from_index(LAYER_COUNT), None);
    }

    #[test]
    fn test_iter_desc() {
        let state = LayerState::only(Layer::Default).with(Layer::Tone1).with(Layer::Normal);
        let layers: Vec<Layer> = state.iter_desc().collect();
        assert_eq!(layers, vec![Layer::Normal, Layer::Tone1, Layer::Default]);
    }

    #[test]
    fn test_display_lists_names() {
        let state = LayerState::only(Layer::Tone2);
        let shown = state.to_string();
        assert!(shown.contains("TONE2"));
        assert!(shown.starts_with("0x"));
    }
}
