//! Rotary encoder adapter
//!
//! Turns encoder detents into volume taps, giving a user hook the first say.

use std::fmt;
use std::time::Duration;

use crate::fretboard::KeySink;
use crate::keymap::KeyCode;

/// Hold time for a volume tap
pub const TAP_DELAY: Duration = Duration::from_millis(10);

/// User-level encoder hook: `(index, clockwise) -> continue`
///
/// Returning false vetoes the default volume tap.
pub type EncoderHook = Box<dyn FnMut(u8, bool) -> bool>;

pub struct Encoder {
    user_hook: Option<EncoderHook>,
    tap_delay: Duration,
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_tap_delay(TAP_DELAY)
    }

    pub fn with_tap_delay(tap_delay: Duration) -> Self {
        Self {
            user_hook: None,
            tap_delay,
        }
    }

    /// Install the user hook, replacing any previous one
    pub fn set_user_hook(&mut self, hook: impl FnMut(u8, bool) -> bool + 'static) {
        self.user_hook = Some(Box::new(hook));
    }

    pub fn tap_delay(&self) -> Duration {
        self.tap_delay
    }

    /// Handle one detent on encoder `index`
    ///
    /// Every encoder index maps to volume. Returns false only when the user
    /// hook vetoed the event.
    pub fn update(&mut self, index: u8, clockwise: bool, sink: &mut impl KeySink) -> bool {
        if let Some(hook) = self.user_hook.as_mut() {
            if !hook(index, clockwise) {
                tracing::debug!("encoder {} event vetoed by user hook", index);
                return false;
            }
        }

        let key = if clockwise {
            KeyCode::VolumeUp
        } else {
            KeyCode::VolumeDown
        };
        sink.tap_code_delay(key, self.tap_delay);
        true
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder")
            .field("user_hook", &self.user_hook.is_some())
            .field("tap_delay", &self.tap_delay)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fretboard::{Emission, HidReport};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_clockwise_taps_volume_up() {
        let mut encoder = Encoder::new();
        let mut hid = HidReport::new();

        assert!(encoder.update(0, true, &mut hid));
        assert_eq!(
            hid.log(),
            &[Emission::Tap {
                key: KeyCode::VolumeUp,
                delay: Duration::from_millis(10)
            }]
        );
    }

    #[test]
    fn test_counter_clockwise_taps_volume_down() {
        let mut encoder = Encoder::new();
        let mut hid = HidReport::new();

        assert!(encoder.update(3, false, &mut hid));
        assert_eq!(hid.log()[0].key(), KeyCode::VolumeDown);
    }

    #[test]
    fn test_vetoing_hook_suppresses_tap() {
        let mut encoder = Encoder::new();
        let mut hid = HidReport::new();
        encoder.set_user_hook(|_, _| false);

        assert!(!encoder.update(0, true, &mut hid));
        assert!(hid.log().is_empty());
    }

    #[test]
    fn test_hook_sees_every_event() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();

        let mut encoder = Encoder::with_tap_delay(Duration::from_millis(25));
        let mut hid = HidReport::new();
        assert_eq!(encoder.tap_delay(), Duration::from_millis(25));
        encoder.set_user_hook(move |index, _| {
            seen.set(seen.get() + 1);
            index == 0
        });

        assert!(encoder.update(0, true, &mut hid));
        assert!(!encoder.update(1, true, &mut hid));
        assert_eq!(calls.get(), 2);
        assert_eq!(
            hid.log(),
            &[Emission::Tap {
                key: KeyCode::VolumeUp,
                delay: Duration::from_millis(25)
            }]
        );
    }
}
