use ::rand::Rng;
use serde::Serialize;

use crate::config;
use crate::feedback::VibrationPattern;
use crate::fortune::{Fortune, FortuneCorpus};
use crate::timers::TimerKind;

/// Interaction phase. The fortune on screen travels with the phase, so a
/// current fortune exists exactly in `Result` and `Burning`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Phase {
    Idle,
    Shaking,
    Result(Fortune),
    Burning(Fortune),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Idle,
    Shaking,
    Result,
    Burning,
}

impl PhaseKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Shaking => "shaking",
            Self::Result => "result",
            Self::Burning => "burning",
        }
    }
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Idle => PhaseKind::Idle,
            Self::Shaking => PhaseKind::Shaking,
            Self::Result(_) => PhaseKind::Result,
            Self::Burning(_) => PhaseKind::Burning,
        }
    }

    pub fn fortune(&self) -> Option<&Fortune> {
        match self {
            Self::Result(f) | Self::Burning(f) => Some(f),
            Self::Idle | Self::Shaking => None,
        }
    }
}

/// Everything that can drive the machine: user requests and timer expiries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Trigger {
    Shake,
    Reveal,
    Pin,
    Burn,
    Discard,
    Extinguish,
    ResetAll { confirmed: bool },
}

/// Side effect requested by a transition, carried out by the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Haptic(VibrationPattern),
    Schedule { kind: TimerKind, delay_ms: f64 },
    Drew { index: usize },
    Ignite,
    Extinguish,
    Pinned,
    ClearedPinned { count: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub trigger: Trigger,
    pub from: PhaseKind,
    pub to: PhaseKind,
    pub effects: Vec<Effect>,
}

/// Serializable view of a session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: PhaseKind,
    pub epoch: u64,
    pub current: Option<Fortune>,
    pub pinned: Vec<Fortune>,
}

pub struct FortuneSession {
    phase: Phase,
    pinned: Vec<Fortune>,
    epoch: u64,
}

impl Default for FortuneSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FortuneSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            pinned: Vec::new(),
            epoch: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn current_fortune(&self) -> Option<&Fortune> {
        self.phase.fortune()
    }

    /// Most recent first.
    pub fn pinned(&self) -> &[Fortune] {
        &self.pinned
    }

    /// Incremented on every applied transition.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.kind(),
            epoch: self.epoch,
            current: self.current_fortune().copied(),
            pinned: self.pinned.clone(),
        }
    }

    /// Apply `trigger` if the current phase allows it. A failed guard returns
    /// `None` and leaves the session untouched.
    pub fn apply(
        &mut self,
        trigger: Trigger,
        corpus: &FortuneCorpus,
        rng: &mut impl Rng,
    ) -> Option<Transition> {
        let from = self.kind();
        let (next, effects) = match (&self.phase, trigger) {
            (Phase::Idle, Trigger::Shake) => (
                Phase::Shaking,
                vec![
                    Effect::Haptic(VibrationPattern::Pulse(config::SHAKE_PULSE_MS)),
                    Effect::Schedule {
                        kind: TimerKind::Reveal,
                        delay_ms: config::SHAKE_DURATION_MS,
                    },
                ],
            ),
            (Phase::Shaking, Trigger::Reveal) => {
                let (index, fortune) = corpus.draw(rng);
                (
                    Phase::Result(fortune),
                    vec![
                        Effect::Drew { index },
                        Effect::Haptic(VibrationPattern::Sequence(
                            config::REVEAL_PATTERN_MS.to_vec(),
                        )),
                    ],
                )
            }
            (Phase::Result(f), Trigger::Pin) if f.is_good() => {
                self.pinned.insert(0, *f);
                (Phase::Idle, vec![Effect::Pinned])
            }
            (Phase::Result(f), Trigger::Burn) if !f.is_good() => (
                Phase::Burning(*f),
                vec![
                    Effect::Ignite,
                    Effect::Schedule {
                        kind: TimerKind::Extinguish,
                        delay_ms: config::BURN_DURATION_MS,
                    },
                ],
            ),
            (Phase::Result(_), Trigger::Discard) => (Phase::Idle, Vec::new()),
            (Phase::Burning(_), Trigger::Extinguish) => (Phase::Idle, vec![Effect::Extinguish]),
            (Phase::Idle, Trigger::ResetAll { confirmed: true }) => {
                let count = self.pinned.len();
                self.pinned.clear();
                (Phase::Idle, vec![Effect::ClearedPinned { count }])
            }
            _ => return None,
        };

        self.phase = next;
        self.epoch += 1;
        Some(Transition {
            trigger,
            from,
            to: self.kind(),
            effects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fortune::{FortuneLevel, STANDARD_CORPUS};
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn good() -> Fortune {
        STANDARD_CORPUS[0]
    }

    fn bad() -> Fortune {
        STANDARD_CORPUS[7]
    }

    fn session_in(phase: Phase) -> FortuneSession {
        FortuneSession {
            phase,
            pinned: Vec::new(),
            epoch: 0,
        }
    }

    fn invariant_holds(s: &FortuneSession) -> bool {
        let has_current = s.current_fortune().is_some();
        let shows_card = matches!(s.kind(), PhaseKind::Result | PhaseKind::Burning);
        has_current == shows_card
    }

    #[test]
    fn shake_enters_shaking_with_pulse_and_reveal_timer() {
        let corpus = FortuneCorpus::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut s = FortuneSession::new();

        let t = s.apply(Trigger::Shake, &corpus, &mut rng).expect("shake from idle");
        assert_eq!((t.from, t.to), (PhaseKind::Idle, PhaseKind::Shaking));
        assert!(t.effects.contains(&Effect::Haptic(VibrationPattern::Pulse(200))));
        assert!(t.effects.contains(&Effect::Schedule {
            kind: TimerKind::Reveal,
            delay_ms: 2000.0
        }));
        assert!(invariant_holds(&s));
    }

    #[test]
    fn shake_outside_idle_is_ignored() {
        let corpus = FortuneCorpus::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for phase in [Phase::Shaking, Phase::Result(good()), Phase::Burning(bad())] {
            let mut s = session_in(phase.clone());
            assert!(s.apply(Trigger::Shake, &corpus, &mut rng).is_none());
            assert_eq!(s.phase(), &phase);
            assert_eq!(s.epoch(), 0);
        }
    }

    #[test]
    fn reveal_draws_seeded_corpus_entry() {
        let corpus = FortuneCorpus::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut expected_rng = ChaCha8Rng::seed_from_u64(3);
        let expected = expected_rng.gen_range(0..corpus.len());

        let mut s = session_in(Phase::Shaking);
        let t = s.apply(Trigger::Reveal, &corpus, &mut rng).expect("reveal");
        assert_eq!(s.current_fortune(), Some(&STANDARD_CORPUS[expected]));
        assert!(t.effects.contains(&Effect::Drew { index: expected }));
        assert!(t
            .effects
            .contains(&Effect::Haptic(VibrationPattern::Sequence(vec![100, 50, 100]))));
    }

    #[test]
    fn pin_prepends_good_fortune_and_returns_to_idle() {
        let corpus = FortuneCorpus::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut s = session_in(Phase::Result(STANDARD_CORPUS[2]));
        s.pinned.push(STANDARD_CORPUS[4]);

        s.apply(Trigger::Pin, &corpus, &mut rng).expect("pin good");
        assert_eq!(s.kind(), PhaseKind::Idle);
        assert_eq!(s.pinned().len(), 2);
        assert_eq!(s.pinned()[0], STANDARD_CORPUS[2]);
        assert!(s.current_fortune().is_none());
    }

    #[test]
    fn pin_rejects_bad_and_burn_rejects_good() {
        let corpus = FortuneCorpus::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let mut s = session_in(Phase::Result(bad()));
        assert!(s.apply(Trigger::Pin, &corpus, &mut rng).is_none());
        assert!(s.pinned().is_empty());

        let mut s = session_in(Phase::Result(good()));
        assert!(s.apply(Trigger::Burn, &corpus, &mut rng).is_none());
        assert_eq!(s.kind(), PhaseKind::Result);
    }

    #[test]
    fn burn_then_extinguish_clears_current() {
        let corpus = FortuneCorpus::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut s = session_in(Phase::Result(bad()));

        let t = s.apply(Trigger::Burn, &corpus, &mut rng).expect("burn bad");
        assert_eq!(t.to, PhaseKind::Burning);
        assert!(t.effects.contains(&Effect::Ignite));
        assert_eq!(s.current_fortune().map(|f| f.level), Some(FortuneLevel::GreatBad));

        let t = s.apply(Trigger::Extinguish, &corpus, &mut rng).expect("extinguish");
        assert_eq!(t.to, PhaseKind::Idle);
        assert!(t.effects.contains(&Effect::Extinguish));
        assert!(s.current_fortune().is_none());
    }

    #[test]
    fn discard_twice_in_idle_is_noop() {
        let corpus = FortuneCorpus::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut s = session_in(Phase::Result(good()));

        assert!(s.apply(Trigger::Discard, &corpus, &mut rng).is_some());
        let epoch = s.epoch();
        assert!(s.apply(Trigger::Discard, &corpus, &mut rng).is_none());
        assert!(s.apply(Trigger::Discard, &corpus, &mut rng).is_none());
        assert_eq!(s.epoch(), epoch);
        assert_eq!(s.kind(), PhaseKind::Idle);
    }

    #[test]
    fn stale_timers_are_rejected_by_phase() {
        let corpus = FortuneCorpus::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut s = FortuneSession::new();
        assert!(s.apply(Trigger::Reveal, &corpus, &mut rng).is_none());
        assert!(s.apply(Trigger::Extinguish, &corpus, &mut rng).is_none());

        let mut s = session_in(Phase::Result(bad()));
        assert!(s.apply(Trigger::Extinguish, &corpus, &mut rng).is_none());
        assert_eq!(s.kind(), PhaseKind::Result);
    }

    #[test]
    fn reset_all_requires_confirmation() {
        let corpus = FortuneCorpus::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut s = FortuneSession::new();
        s.pinned = STANDARD_CORPUS[..3].to_vec();

        assert!(s
            .apply(Trigger::ResetAll { confirmed: false }, &corpus, &mut rng)
            .is_none());
        assert_eq!(s.pinned().len(), 3);

        let t = s
            .apply(Trigger::ResetAll { confirmed: true }, &corpus, &mut rng)
            .expect("confirmed reset");
        assert!(t.effects.contains(&Effect::ClearedPinned { count: 3 }));
        assert!(s.pinned().is_empty());
    }

    #[test]
    fn snapshot_reflects_state() {
        let s = session_in(Phase::Burning(bad()));
        let snap = s.snapshot();
        assert_eq!(snap.phase, PhaseKind::Burning);
        assert_eq!(snap.current, Some(bad()));
        let json = serde_json::to_string(&snap).expect("snapshot serializes");
        assert!(json.contains("\"burning\""));
    }
}
