//! Scripted play sessions
//!
//! A script is a YAML list of switch and encoder events:
//!
//! ```yaml
//! steps:
//!   - press: [0, 9]     # fret O on string 0
//!   - press: [3, 11]    # strum string 0
//!   - release: [3, 11]
//!   - tap: [4, 2]       # MO(TONE2) down and up
//!   - encoder: cw
//! ```

use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::fretboard::{MatrixPos, BOOT_REPORT_LEN};
use crate::keyboard::Keyboard;
use crate::keymap::Layer;

/// Encoder turn direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Cw,
    Ccw,
}

impl Rotation {
    pub fn is_clockwise(self) -> bool {
        self == Rotation::Cw
    }
}

/// One scripted event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Press(MatrixPos),
    Release(MatrixPos),
    Tap(MatrixPos),
    Encoder(Rotation),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Press(pos) => write!(f, "press {}", pos),
            Step::Release(pos) => write!(f, "release {}", pos),
            Step::Tap(pos) => write!(f, "tap {}", pos),
            Step::Encoder(Rotation::Cw) => write!(f, "encoder cw"),
            Step::Encoder(Rotation::Ccw) => write!(f, "encoder ccw"),
        }
    }
}

/// A step as written in YAML; exactly one field must be set
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStep {
    press: Option<[u8; 2]>,
    release: Option<[u8; 2]>,
    tap: Option<[u8; 2]>,
    encoder: Option<Rotation>,
}

impl RawStep {
    fn into_step(self, index: usize) -> Result<Step> {
        let cell = |[row, col]: [u8; 2]| MatrixPos::new(row, col);
        let steps: Vec<Step> = [
            self.press.map(|c| Step::Press(cell(c))),
            self.release.map(|c| Step::Release(cell(c))),
            self.tap.map(|c| Step::Tap(cell(c))),
            self.encoder.map(Step::Encoder),
        ]
        .into_iter()
        .flatten()
        .collect();

        match steps.as_slice() {
            [step] => Ok(*step),
            [] => bail!("step {} has no event", index),
            _ => bail!("step {} has more than one event", index),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScript {
    #[serde(default)]
    steps: Vec<RawStep>,
}

/// A parsed script
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse a script from a YAML string
    pub fn parse(yaml: &str) -> Result<Self> {
        let raw: RawScript = serde_yaml::from_str(yaml).context("Failed to parse script")?;
        let steps = raw
            .steps
            .into_iter()
            .enumerate()
            .map(|(i, step)| step.into_step(i))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { steps })
    }

    /// Load a script file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid script {}", path.display()))
    }
}

/// What one step did
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: String,
    pub emissions: Vec<String>,
    pub held: Vec<String>,
    pub layer: Layer,
    pub report: [u8; BOOT_REPORT_LEN],
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16} [{}] {:<40} held: {}",
            self.step,
            self.layer.name(),
            self.emissions.join(" "),
            if self.held.is_empty() {
                "-".to_string()
            } else {
                self.held.join(" ")
            }
        )
    }
}

/// Apply one step and report what it emitted
pub fn run_step(keyboard: &mut Keyboard, step: Step) -> StepOutcome {
    match step {
        Step::Press(pos) => {
            keyboard.press(pos);
        }
        Step::Release(pos) => {
            keyboard.release(pos);
        }
        Step::Tap(pos) => keyboard.tap(pos),
        Step::Encoder(rotation) => {
            keyboard.encoder(0, rotation.is_clockwise());
        }
    }

    StepOutcome {
        step: step.to_string(),
        emissions: keyboard
            .drain_emissions()
            .iter()
            .map(ToString::to_string)
            .collect(),
        held: keyboard.hid().held().iter().map(ToString::to_string).collect(),
        layer: keyboard.highest_layer(),
        report: keyboard.hid().boot_report(),
    }
}

/// Run every step of a script in order
pub fn run(keyboard: &mut Keyboard, script: &Script) -> Vec<StepOutcome> {
    script
        .steps
        .iter()
        .map(|&step| run_step(keyboard, step))
        .collect()
}
