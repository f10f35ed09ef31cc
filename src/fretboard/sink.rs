//! Key-event sink: where press/release emissions go
//!
//! On hardware this is the platform's HID layer. `HidReport` is the host
//! stand-in: it keeps the set of registered keys, logs every emission in
//! order and can render a boot-protocol report.

use std::fmt;
use std::time::Duration;

use crate::keymap::KeyCode;

/// Imperative press/release emission
///
/// Registering a key that is already registered, or unregistering one that
/// is not, must be harmless.
pub trait KeySink {
    fn register_code(&mut self, key: KeyCode);

    fn unregister_code(&mut self, key: KeyCode);

    /// Press and release a key, holding it for `delay`
    fn tap_code_delay(&mut self, key: KeyCode, delay: Duration) {
        self.register_code(key);
        std::thread::sleep(delay);
        self.unregister_code(key);
    }
}

/// One call made against a sink
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emission {
    Register(KeyCode),
    Unregister(KeyCode),
    Tap { key: KeyCode, delay: Duration },
}

impl Emission {
    pub fn key(&self) -> KeyCode {
        match *self {
            Emission::Register(key) | Emission::Unregister(key) => key,
            Emission::Tap { key, .. } => key,
        }
    }
}

impl fmt::Display for Emission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Emission::Register(key) => write!(f, "+{}", key),
            Emission::Unregister(key) => write!(f, "-{}", key),
            Emission::Tap { key, delay } => write!(f, "tap {} ({}ms)", key, delay.as_millis()),
        }
    }
}

/// Boot-protocol keyboard report size
pub const BOOT_REPORT_LEN: usize = 8;
/// Key slots in a boot-protocol report
pub const BOOT_REPORT_KEYS: usize = 6;
/// Usage reported in every slot when more than six keys are down
pub const ERROR_ROLL_OVER: u8 = 0x01;

/// Recording HID sink
#[derive(Debug, Clone, Default)]
pub struct HidReport {
    /// Registered keys in registration order
    held: Vec<KeyCode>,
    /// Every emission since the last drain
    log: Vec<Emission>,
}

impl HidReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key is currently registered
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Registered keys in registration order
    pub fn held(&self) -> &[KeyCode] {
        &self.held
    }

    /// Emissions recorded since the last drain
    pub fn log(&self) -> &[Emission] {
        &self.log
    }

    /// Take the emission log, leaving it empty
    pub fn drain_log(&mut self) -> Vec<Emission> {
        std::mem::take(&mut self.log)
    }

    /// Render the 8-byte boot-protocol report for the registered keys
    ///
    /// Byte 0 is the modifier mask, byte 1 is reserved, bytes 2..8 hold up to
    /// six usage ids in registration order.
    pub fn boot_report(&self) -> [u8; BOOT_REPORT_LEN] {
        let mut report = [0u8; BOOT_REPORT_LEN];
        let mut keys = Vec::with_capacity(BOOT_REPORT_KEYS);

        for key in &self.held {
            if let Some(bit) = key.modifier_bit() {
                report[0] |= bit;
            } else if let Some(usage) = key.hid_usage() {
                keys.push(usage);
            }
        }

        if keys.len() > BOOT_REPORT_KEYS {
            report[2..].fill(ERROR_ROLL_OVER);
        } else {
            report[2..2 + keys.len()].copy_from_slice(&keys);
        }
        report
    }
}

impl KeySink for HidReport {
    fn register_code(&mut self, key: KeyCode) {
        self.log.push(Emission::Register(key));
        if !self.held.contains(&key) {
            tracing::debug!("register {}", key);
            self.held.push(key);
        }
    }

    fn unregister_code(&mut self, key: KeyCode) {
        self.log.push(Emission::Unregister(key));
        if let Some(idx) = self.held.iter().position(|k| *k == key) {
            tracing::debug!("unregister {}", key);
            self.held.remove(idx);
        }
    }

    fn tap_code_delay(&mut self, key: KeyCode, delay: Duration) {
        tracing::debug!("tap {} for {:?}", key, delay);
        self.log.push(Emission::Tap { key, delay });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut hid = HidReport::new();
        hid.register_code(KeyCode::Space);
        hid.register_code(KeyCode::Space);
        assert_eq!(hid.held(), &[KeyCode::Space]);
        assert_eq!(hid.log().len(), 2);
    }

    #[test]
    fn test_unregister_missing_key_is_noop() {
        let mut hid = HidReport::new();
        hid.unregister_code(KeyCode::Tab);
        assert!(hid.held().is_empty());
        assert_eq!(hid.log(), &[Emission::Unregister(KeyCode::Tab)]);
    }

    #[test]
    fn test_tap_does_not_hold() {
        let mut hid = HidReport::new();
        hid.tap_code_delay(KeyCode::VolumeUp, Duration::from_millis(10));
        assert!(!hid.is_held(KeyCode::VolumeUp));
        assert_eq!(hid.log()[0].key(), KeyCode::VolumeUp);
    }

    #[test]
    fn test_drain_log() {
        let mut hid = HidReport::new();
        hid.register_code(KeyCode::char('q'));
        let drained = hid.drain_log();
        assert_eq!(drained, vec![Emission::Register(KeyCode::char('q'))]);
        assert!(hid.log().is_empty());
        assert!(hid.is_held(KeyCode::char('q')));
    }

    #[test]
    fn test_boot_report_layout() {
        let mut hid = HidReport::new();
        hid.register_code(KeyCode::LeftShift);
        hid.register_code(KeyCode::char('q'));
        hid.register_code(KeyCode::Space);
        assert_eq!(hid.boot_report(), [0x02, 0, 0x14, 0x2C, 0, 0, 0, 0]);
    }

    #[test]
    fn test_boot_report_rollover() {
        let mut hid = HidReport::new();
        for c in ['a', 'b', 'c', 'd', 'e', 'f', 'g'] {
            hid.register_code(KeyCode::char(c));
        }
        hid.register_code(KeyCode::RightShift);
        let report = hid.boot_report();
        assert_eq!(report[0], 0x20);
        assert!(report[2..].iter().all(|b| *b == ERROR_ROLL_OVER));
    }

    #[test]
    fn test_emission_display() {
        assert_eq!(Emission::Register(KeyCode::Space).to_string(), "+Space");
        assert_eq!(Emission::Unregister(KeyCode::char('o')).to_string(), "-O");
    }
}
