use serde::Serialize;

/// Vibration request in milliseconds: a single pulse, or alternating on/off durations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum VibrationPattern {
    Pulse(u32),
    Sequence(Vec<u32>),
}

impl VibrationPattern {
    pub fn total_ms(&self) -> u32 {
        match self {
            Self::Pulse(ms) => *ms,
            Self::Sequence(steps) => steps.iter().sum(),
        }
    }
}

/// Best-effort haptic output. Hosts without the capability use [`NoHaptics`].
pub trait HapticSink {
    fn vibrate(&mut self, pattern: &VibrationPattern);
}

pub struct NoHaptics;

impl HapticSink for NoHaptics {
    fn vibrate(&mut self, _pattern: &VibrationPattern) {}
}

/// Desktop stand-in: logs the request.
pub struct LogHaptics;

impl HapticSink for LogHaptics {
    fn vibrate(&mut self, pattern: &VibrationPattern) {
        eprintln!("[OMIKUJI] vibrate {pattern:?} ({} ms)", pattern.total_ms());
    }
}

/// Keeps every request; used by QA runs and tests.
#[derive(Default)]
pub struct RecordingHaptics {
    pub requests: Vec<VibrationPattern>,
}

impl HapticSink for RecordingHaptics {
    fn vibrate(&mut self, pattern: &VibrationPattern) {
        self.requests.push(pattern.clone());
    }
}

/// Yes/no gate the host shows before destructive actions.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

/// A pre-answered prompt, for hosts that already asked.
impl ConfirmPrompt for bool {
    fn confirm(&mut self, _message: &str) -> bool {
        *self
    }
}

impl<F: FnMut(&str) -> bool> ConfirmPrompt for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}
