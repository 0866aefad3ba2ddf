use ::rand::{Rng, SeedableRng};
use macroquad::prelude::Vec2;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::feedback::{ConfirmPrompt, HapticSink, VibrationPattern};
use crate::fire::{self, RenderSurface};
use crate::fortune::{Fortune, FortuneCorpus, FortuneLevel};
use crate::particles::ParticlePool;
use crate::render_loop::{LoopHandle, LoopStatus, RenderLoop};
use crate::session::{Effect, FortuneSession, Phase, PhaseKind, Trigger};
use crate::timers::{TimerId, TimerKind, TimerQueue};

pub const RESET_PROMPT: &str = "确定要重置所有已固定的灵签吗？";

/// Notifications for the host, drained once per frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum SessionEvent {
    PhaseChanged {
        from: PhaseKind,
        to: PhaseKind,
        trigger: Trigger,
        at_ms: f64,
    },
    FortuneDrawn { index: usize, level: FortuneLevel },
    Pinned { level: FortuneLevel, total: usize },
    PinnedCleared { count: usize },
    Haptic(VibrationPattern),
    FireIgnited,
    FireExtinguished { frames: u64 },
    FireLost,
}

impl SessionEvent {
    pub fn describe(&self) -> String {
        match self {
            Self::PhaseChanged {
                from,
                to,
                trigger,
                at_ms,
            } => format!(
                "{} -> {} on {:?} at {:.0}ms",
                from.label(),
                to.label(),
                trigger,
                at_ms
            ),
            Self::FortuneDrawn { index, level } => {
                format!("drew #{index} ({})", level.label())
            }
            Self::Pinned { level, total } => format!("pinned {} ({total} kept)", level.label()),
            Self::PinnedCleared { count } => format!("cleared {count} pinned fortunes"),
            Self::Haptic(pattern) => format!("haptic {pattern:?}"),
            Self::FireIgnited => "fire ignited".to_string(),
            Self::FireExtinguished { frames } => format!("fire out after {frames} frames"),
            Self::FireLost => "fire surface unavailable, loop stopped".to_string(),
        }
    }
}

/// Drives a [`FortuneSession`]: validates triggers, runs timers, owns the fire
/// engine while burning, and forwards haptic requests.
pub struct SessionController<H: HapticSink> {
    session: FortuneSession,
    corpus: FortuneCorpus,
    rng: ChaCha8Rng,
    timers: TimerQueue,
    /// Timer that ends the current phase, if it has one.
    phase_timer: Option<TimerId>,
    haptics: H,
    fire: Option<RenderLoop>,
    fire_handle: Option<LoopHandle>,
    fire_bounds: Vec2,
    events: Vec<SessionEvent>,
    clock_ms: f64,
    phase_entered_ms: f64,
    torn_down: bool,
}

impl<H: HapticSink> SessionController<H> {
    /// Bounds that are not a usable surface fall back to the default fire surface.
    pub fn new(corpus: FortuneCorpus, seed: u64, fire_bounds: Vec2, haptics: H) -> Self {
        let fire_bounds = match fire::surface_size(fire_bounds.x, fire_bounds.y) {
            Ok(bounds) => bounds,
            Err(e) => {
                eprintln!("[OMIKUJI] {e}; using the default fire surface");
                fire::DEFAULT_SURFACE
            }
        };
        Self {
            session: FortuneSession::new(),
            corpus,
            rng: ChaCha8Rng::seed_from_u64(seed),
            timers: TimerQueue::new(),
            phase_timer: None,
            haptics,
            fire: None,
            fire_handle: None,
            fire_bounds,
            events: Vec::new(),
            clock_ms: 0.0,
            phase_entered_ms: 0.0,
            torn_down: false,
        }
    }

    pub fn shake(&mut self) -> bool {
        self.dispatch(Trigger::Shake)
    }

    pub fn pin(&mut self) -> bool {
        self.dispatch(Trigger::Pin)
    }

    pub fn burn(&mut self) -> bool {
        self.dispatch(Trigger::Burn)
    }

    pub fn discard(&mut self) -> bool {
        self.dispatch(Trigger::Discard)
    }

    /// Clear pinned fortunes after the host confirms. Only asks while idle.
    pub fn reset_all(&mut self, prompt: &mut impl ConfirmPrompt) -> bool {
        if self.torn_down || self.session.kind() != PhaseKind::Idle {
            return false;
        }
        let confirmed = prompt.confirm(RESET_PROMPT);
        self.dispatch(Trigger::ResetAll { confirmed })
    }

    /// Advance the clock and fire any timers that belong to the current phase.
    pub fn advance(&mut self, elapsed_ms: f64) {
        if self.torn_down {
            return;
        }
        self.clock_ms += elapsed_ms;
        for fired in self.timers.advance(elapsed_ms) {
            if self.phase_timer == Some(fired.id) {
                self.phase_timer = None;
            }
            if fired.epoch != self.session.epoch() {
                continue;
            }
            let trigger = match fired.kind {
                TimerKind::Reveal => Trigger::Reveal,
                TimerKind::Extinguish => Trigger::Extinguish,
            };
            self.dispatch(trigger);
        }
    }

    /// Draw one fire frame if burning. `None` means the host surface is gone.
    pub fn render_fire(&mut self, surface: Option<&mut dyn RenderSurface>) -> LoopStatus {
        if self.session.kind() != PhaseKind::Burning {
            return LoopStatus::Stopped;
        }
        let Some(fire) = self.fire.as_mut() else {
            return LoopStatus::Stopped;
        };
        let status = fire.tick(surface);
        if status == LoopStatus::Stopped {
            self.fire = None;
            self.fire_handle = None;
            self.events.push(SessionEvent::FireLost);
        }
        status
    }

    /// Host teardown: stop the fire and invalidate every pending timer.
    /// The controller ignores all later input.
    pub fn teardown(&mut self) {
        self.stop_fire();
        self.timers.clear();
        self.phase_timer = None;
        self.torn_down = true;
    }

    pub fn session(&self) -> &FortuneSession {
        &self.session
    }

    pub fn phase(&self) -> &Phase {
        self.session.phase()
    }

    pub fn kind(&self) -> PhaseKind {
        self.session.kind()
    }

    pub fn current_fortune(&self) -> Option<&Fortune> {
        self.session.current_fortune()
    }

    pub fn pinned(&self) -> &[Fortune] {
        self.session.pinned()
    }

    pub fn fire_pool(&self) -> Option<&ParticlePool> {
        self.fire.as_ref().map(RenderLoop::pool)
    }

    pub fn fire_handle(&self) -> Option<&LoopHandle> {
        self.fire_handle.as_ref()
    }

    pub fn is_fire_active(&self) -> bool {
        self.fire.as_ref().is_some_and(RenderLoop::is_running)
    }

    pub fn fire_bounds(&self) -> Vec2 {
        self.fire_bounds
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Time spent in the current phase.
    pub fn phase_elapsed_ms(&self) -> f64 {
        self.clock_ms - self.phase_entered_ms
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn dispatch(&mut self, trigger: Trigger) -> bool {
        if self.torn_down {
            return false;
        }
        let Some(transition) = self.session.apply(trigger, &self.corpus, &mut self.rng) else {
            return false;
        };

        if let Some(id) = self.phase_timer.take() {
            self.timers.cancel(id);
        }
        self.phase_entered_ms = self.clock_ms;
        self.events.push(SessionEvent::PhaseChanged {
            from: transition.from,
            to: transition.to,
            trigger: transition.trigger,
            at_ms: self.clock_ms,
        });

        for effect in transition.effects {
            self.perform(effect);
        }
        true
    }

    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::Haptic(pattern) => {
                self.haptics.vibrate(&pattern);
                self.events.push(SessionEvent::Haptic(pattern));
            }
            Effect::Schedule { kind, delay_ms } => {
                let id = self.timers.schedule(kind, delay_ms, self.session.epoch());
                self.phase_timer = Some(id);
            }
            Effect::Drew { index } => {
                if let Some(fortune) = self.corpus.get(index) {
                    self.events.push(SessionEvent::FortuneDrawn {
                        index,
                        level: fortune.level,
                    });
                }
            }
            Effect::Ignite => {
                // at most one loop at a time
                self.stop_fire();
                let seed = self.rng.gen::<u64>();
                let (fire, handle) = RenderLoop::start(self.fire_bounds, seed);
                self.fire = Some(fire);
                self.fire_handle = Some(handle);
                self.events.push(SessionEvent::FireIgnited);
            }
            Effect::Extinguish => self.stop_fire(),
            Effect::Pinned => {
                if let Some(first) = self.session.pinned().first() {
                    self.events.push(SessionEvent::Pinned {
                        level: first.level,
                        total: self.session.pinned().len(),
                    });
                }
            }
            Effect::ClearedPinned { count } => {
                self.events.push(SessionEvent::PinnedCleared { count });
            }
        }
    }

    fn stop_fire(&mut self) {
        if let Some(fire) = self.fire.take() {
            fire.stop();
            self.events.push(SessionEvent::FireExtinguished {
                frames: fire.frames(),
            });
        }
        self.fire_handle = None;
    }
}

impl<H: HapticSink> Drop for SessionController<H> {
    fn drop(&mut self) {
        self.stop_fire();
    }
}
