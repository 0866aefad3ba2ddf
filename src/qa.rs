use macroquad::prelude::vec2;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config;
use crate::controller::{SessionController, SessionEvent};
use crate::feedback::{RecordingHaptics, VibrationPattern};
use crate::fire::{self, BlendMode, DrawOp, RecordingSurface, RenderSurface};
use crate::fortune::{FortuneCorpus, STANDARD_CORPUS};
use crate::render_loop::LoopHandle;
use crate::session::{PhaseKind, SessionSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum QaScenario {
    Keep,
    Burn,
    Stale,
}

impl QaScenario {
    pub fn parse_cli(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "keep" | "baseline" => Some(Self::Keep),
            "burn" => Some(Self::Burn),
            "stale" | "teardown" => Some(Self::Stale),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Burn => "burn",
            Self::Stale => "stale",
        }
    }

    /// The burn scenario draws only from the bad fortunes so every round burns.
    pub fn corpus(self) -> Result<FortuneCorpus, String> {
        match self {
            Self::Burn => FortuneCorpus::new(
                STANDARD_CORPUS
                    .iter()
                    .filter(|f| !f.is_good())
                    .copied()
                    .collect(),
            ),
            Self::Keep | Self::Stale => Ok(FortuneCorpus::standard()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QaAction {
    Shake,
    /// Pin a good fortune, burn a bad one.
    ResolveCard,
    Discard,
    ResetAll { confirm: bool },
    Teardown,
    ExpectPhase(PhaseKind),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledAction {
    pub frame: u64,
    pub action: QaAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct QaActionLog {
    pub frame: u64,
    pub action: String,
    pub details: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QaCheck {
    pub name: String,
    pub passed: bool,
    pub details: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QaReport {
    pub scenario: String,
    pub seed: u64,
    pub final_frame: u64,
    pub fire_frames: u64,
    pub burns: usize,
    pub pins: usize,
    pub overall_status: String,
    pub final_state: SessionSnapshot,
    pub checks: Vec<QaCheck>,
    pub actions: Vec<QaActionLog>,
    pub events: Vec<String>,
}

impl QaReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }
}

/// Replays a fixed schedule against a real controller and audits every frame.
pub struct QaDirector {
    scenario: QaScenario,
    schedule: Vec<ScheduledAction>,
    next_action_idx: usize,
    action_logs: Vec<QaActionLog>,
    checks: Vec<QaCheck>,
    event_log: Vec<String>,
    max_frame: u64,
    corpus_len: usize,
    pool_size_violations: u64,
    dead_particle_samples: u64,
    invariant_violations: u64,
    stray_fire_samples: u64,
    frames_outside_burning: u64,
    stale_mutations: u64,
    out_of_corpus_draws: u64,
    malformed_frames: u64,
    last_fire_frames: u64,
    fire_handles: Vec<LoopHandle>,
    teardown_snapshot: Option<SessionSnapshot>,
    burns: usize,
    pins: usize,
    checks_finalized: bool,
}

impl QaDirector {
    pub fn new(scenario: QaScenario, corpus_len: usize, output_dir: &Path) -> Result<Self, String> {
        std::fs::create_dir_all(output_dir)
            .map_err(|e| format!("create QA output dir {} failed: {e}", output_dir.display()))?;

        let schedule = build_schedule(scenario);
        let max_frame = schedule.iter().map(|s| s.frame).max().unwrap_or(0);
        Ok(Self {
            scenario,
            schedule,
            next_action_idx: 0,
            action_logs: Vec::new(),
            checks: Vec::new(),
            event_log: Vec::new(),
            max_frame,
            corpus_len,
            pool_size_violations: 0,
            dead_particle_samples: 0,
            invariant_violations: 0,
            stray_fire_samples: 0,
            frames_outside_burning: 0,
            stale_mutations: 0,
            out_of_corpus_draws: 0,
            malformed_frames: 0,
            last_fire_frames: 0,
            fire_handles: Vec::new(),
            teardown_snapshot: None,
            burns: 0,
            pins: 0,
            checks_finalized: false,
        })
    }

    pub fn is_complete(&self, frame: u64) -> bool {
        frame >= self.max_frame && self.next_action_idx >= self.schedule.len()
    }

    pub fn run_actions_for_frame(
        &mut self,
        frame: u64,
        controller: &mut SessionController<RecordingHaptics>,
    ) {
        while self.next_action_idx < self.schedule.len() {
            let at = self.schedule[self.next_action_idx].frame;
            if at > frame {
                break;
            }
            if at == frame {
                let action = self.schedule[self.next_action_idx].action.clone();
                self.execute_action(frame, &action, controller);
            }
            self.next_action_idx += 1;
        }
    }

    /// Audit the controller after the frame has been advanced and rendered.
    pub fn observe_state(
        &mut self,
        controller: &mut SessionController<RecordingHaptics>,
        surface: &RecordingSurface,
    ) {
        for event in controller.drain_events() {
            if let SessionEvent::FortuneDrawn { index, .. } = event {
                if index >= self.corpus_len {
                    self.out_of_corpus_draws += 1;
                }
            }
            self.event_log.push(event.describe());
        }

        let kind = controller.kind();
        let shows_card = matches!(kind, PhaseKind::Result | PhaseKind::Burning);
        if controller.current_fortune().is_some() != shows_card {
            self.invariant_violations += 1;
        }

        match controller.fire_pool() {
            Some(pool) => {
                if kind != PhaseKind::Burning {
                    self.stray_fire_samples += 1;
                }
                if pool.len() != config::POOL_SIZE {
                    self.pool_size_violations += 1;
                }
                if !pool.all_alive() {
                    self.dead_particle_samples +=
                        pool.iter().filter(|p| !p.is_alive()).count() as u64;
                }
            }
            None => {
                if kind == PhaseKind::Burning && !controller.is_torn_down() {
                    self.stray_fire_samples += 1;
                }
            }
        }

        let rendered = surface.frames() - self.last_fire_frames;
        if rendered > 0 {
            if kind != PhaseKind::Burning {
                self.frames_outside_burning += rendered;
            }
            if !frame_is_well_formed(surface) {
                self.malformed_frames += 1;
            }
        }
        self.last_fire_frames = surface.frames();

        if let Some(ref snapshot) = self.teardown_snapshot {
            if controller.session().snapshot() != *snapshot || controller.pending_timers() > 0 {
                self.stale_mutations += 1;
            }
        }
    }

    pub fn finalize_checks(&mut self, controller: &SessionController<RecordingHaptics>) {
        if self.checks_finalized {
            return;
        }
        self.checks_finalized = true;

        self.record_check(
            "pool_size_fixed".to_string(),
            self.pool_size_violations == 0,
            format!("pool_size_violations={}", self.pool_size_violations),
        );
        self.record_check(
            "particles_always_alive".to_string(),
            self.dead_particle_samples == 0,
            format!("dead_particle_samples={}", self.dead_particle_samples),
        );
        self.record_check(
            "current_fortune_matches_phase".to_string(),
            self.invariant_violations == 0,
            format!("invariant_violations={}", self.invariant_violations),
        );
        self.record_check(
            "fire_only_while_burning".to_string(),
            self.stray_fire_samples == 0 && self.frames_outside_burning == 0,
            format!(
                "stray_fire_samples={}, frames_outside_burning={}",
                self.stray_fire_samples, self.frames_outside_burning
            ),
        );
        self.record_check(
            "fire_frames_well_formed".to_string(),
            self.malformed_frames == 0,
            format!("malformed_frames={}", self.malformed_frames),
        );
        self.record_check(
            "draws_within_corpus".to_string(),
            self.out_of_corpus_draws == 0,
            format!(
                "out_of_corpus_draws={}, corpus_len={}",
                self.out_of_corpus_draws, self.corpus_len
            ),
        );
        let live_loops = self
            .fire_handles
            .iter()
            .filter(|h| !h.is_cancelled())
            .count();
        let expected_live = usize::from(controller.is_fire_active());
        self.record_check(
            "fire_loops_stopped".to_string(),
            live_loops == expected_live,
            format!(
                "loops={}, live={live_loops}, expected_live={expected_live}",
                self.fire_handles.len()
            ),
        );
        if self.teardown_snapshot.is_some() {
            self.record_check(
                "no_effects_after_teardown".to_string(),
                self.stale_mutations == 0 && !controller.is_fire_active(),
                format!("stale_mutations={}", self.stale_mutations),
            );
        }

        let requests = &controller.haptics().requests;
        let pulses = requests
            .iter()
            .filter(|p| matches!(p, VibrationPattern::Pulse(_)))
            .count();
        let sequences = requests.len() - pulses;
        self.record_check(
            "haptics_per_draw".to_string(),
            sequences <= pulses && pulses - sequences <= 1,
            format!("pulses={pulses}, sequences={sequences}"),
        );
    }

    pub fn report(
        &self,
        seed: u64,
        final_frame: u64,
        fire_frames: u64,
        controller: &SessionController<RecordingHaptics>,
    ) -> QaReport {
        let all_passed = self.checks.iter().all(|c| c.passed);
        QaReport {
            scenario: self.scenario.label().to_string(),
            seed,
            final_frame,
            fire_frames,
            burns: self.burns,
            pins: self.pins,
            overall_status: if all_passed { "PASS" } else { "FAIL" }.to_string(),
            final_state: controller.session().snapshot(),
            checks: self.checks.clone(),
            actions: self.action_logs.clone(),
            events: self.event_log.clone(),
        }
    }

    fn execute_action(
        &mut self,
        frame: u64,
        action: &QaAction,
        controller: &mut SessionController<RecordingHaptics>,
    ) {
        let before = controller.kind();
        match action {
            QaAction::Shake => {
                let accepted = controller.shake();
                if before != PhaseKind::Idle {
                    self.record_check(
                        format!("shake_ignored_in_{}", before.label()),
                        !accepted && controller.kind() == before,
                        format!("accepted={accepted}, phase={}", controller.kind().label()),
                    );
                }
                self.record_action(frame, "Shake", format!("accepted={accepted}"));
            }
            QaAction::ResolveCard => {
                let good = controller.current_fortune().map(|f| f.is_good());
                let (label, accepted) = match good {
                    Some(true) => ("Pin", controller.pin()),
                    Some(false) => ("Burn", controller.burn()),
                    None => ("Resolve", false),
                };
                match (good, accepted) {
                    (Some(true), true) => self.pins += 1,
                    (Some(false), true) => {
                        self.burns += 1;
                        if let Some(handle) = controller.fire_handle() {
                            self.fire_handles.push(handle.clone());
                        }
                        self.record_check(
                            format!("burn_{}_ignites_full_pool", self.burns),
                            controller.fire_pool().map(|p| p.len()) == Some(config::POOL_SIZE),
                            format!("phase={}", controller.kind().label()),
                        );
                    }
                    _ => {}
                }
                self.record_action(frame, label, format!("accepted={accepted}"));
            }
            QaAction::Discard => {
                let accepted = controller.discard();
                if before != PhaseKind::Result {
                    self.record_check(
                        format!("discard_ignored_in_{}", before.label()),
                        !accepted && controller.kind() == before,
                        format!("accepted={accepted}"),
                    );
                }
                self.record_action(frame, "Discard", format!("accepted={accepted}"));
            }
            QaAction::ResetAll { confirm } => {
                let pinned_before = controller.pinned().len();
                let mut answer = *confirm;
                let accepted = controller.reset_all(&mut answer);
                let pinned_after = controller.pinned().len();
                let expected = if *confirm && before == PhaseKind::Idle {
                    0
                } else {
                    pinned_before
                };
                self.record_check(
                    format!("reset_all_confirm_{confirm}"),
                    pinned_after == expected,
                    format!("before={pinned_before}, after={pinned_after}"),
                );
                self.record_action(frame, "ResetAll", format!("confirm={confirm}, accepted={accepted}"));
            }
            QaAction::Teardown => {
                controller.teardown();
                self.teardown_snapshot = Some(controller.session().snapshot());
                self.record_action(frame, "Teardown", format!("phase={}", before.label()));
            }
            QaAction::ExpectPhase(expected) => {
                self.record_check(
                    format!("phase_{}_at_frame_{frame}", expected.label()),
                    before == *expected,
                    format!("expected={}, got={}", expected.label(), before.label()),
                );
                self.record_action(frame, "ExpectPhase", expected.label().to_string());
            }
        }
    }

    fn record_action(&mut self, frame: u64, action: &str, details: String) {
        self.action_logs.push(QaActionLog {
            frame,
            action: action.to_string(),
            details,
        });
    }

    fn record_check(&mut self, name: String, passed: bool, details: String) {
        self.checks.push(QaCheck {
            name,
            passed,
            details,
        });
    }
}

/// Run a scenario headlessly at a fixed 60 Hz step.
pub fn run_headless(
    scenario: QaScenario,
    seed: u64,
    fire_size: (f32, f32),
    output_dir: PathBuf,
) -> Result<QaReport, String> {
    let bounds = fire::surface_size(fire_size.0, fire_size.1)?;
    let corpus = scenario.corpus()?;
    let mut director = QaDirector::new(scenario, corpus.len(), &output_dir)?;
    let mut controller =
        SessionController::new(corpus, seed, bounds, RecordingHaptics::default());
    let mut surface = RecordingSurface::new(bounds);

    let mut frame = 0u64;
    loop {
        director.run_actions_for_frame(frame, &mut controller);
        controller.advance(config::QA_FRAME_MS);
        controller.render_fire(Some(&mut surface));
        director.observe_state(&mut controller, &surface);

        if director.is_complete(frame) {
            break;
        }
        frame += 1;
    }

    director.finalize_checks(&controller);
    Ok(director.report(seed, frame, surface.frames(), &controller))
}

/// A rendered frame fades the whole surface, switches to additive blending,
/// then draws one live disc per pooled particle.
fn frame_is_well_formed(surface: &RecordingSurface) -> bool {
    let ops = surface.ops();
    if ops.len() < 3 {
        return false;
    }
    let fades_surface = matches!(
        ops[1],
        DrawOp::Rect { origin, size, .. } if origin == vec2(0.0, 0.0) && size == surface.size()
    );
    ops[0] == DrawOp::Blend(BlendMode::SourceOver)
        && fades_surface
        && ops[2] == DrawOp::Blend(BlendMode::Additive)
        && surface.circles().count() == config::POOL_SIZE
        && surface.circles().all(|(_, radius, _)| radius > 0.0)
}

pub fn write_report(report: &QaReport, output_dir: &Path) -> Result<PathBuf, String> {
    let path = output_dir.join("qa_report.json");
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| format!("serialize QA report failed: {e}"))?;
    std::fs::write(&path, json)
        .map_err(|e| format!("write QA report {} failed: {e}", path.display()))?;
    Ok(path)
}

/// Frames per millisecond span at the QA step, rounded up.
fn frames_for(ms: f64) -> u64 {
    (ms / config::QA_FRAME_MS).ceil() as u64
}

pub fn build_schedule(scenario: QaScenario) -> Vec<ScheduledAction> {
    match scenario {
        QaScenario::Keep => keep_schedule(),
        QaScenario::Burn => burn_schedule(),
        QaScenario::Stale => stale_schedule(),
    }
}

fn at(frame: u64, action: QaAction) -> ScheduledAction {
    ScheduledAction { frame, action }
}

/// One draw-and-resolve round starting at `start`; returns the frame it settles back to idle.
fn round(schedule: &mut Vec<ScheduledAction>, start: u64) -> u64 {
    let reveal = start + frames_for(config::SHAKE_DURATION_MS) + 5;
    let settled = reveal + 10 + frames_for(config::BURN_DURATION_MS) + 5;
    schedule.push(at(start, QaAction::Shake));
    schedule.push(at(start + 1, QaAction::ExpectPhase(PhaseKind::Shaking)));
    schedule.push(at(start + 30, QaAction::Shake));
    schedule.push(at(reveal, QaAction::ExpectPhase(PhaseKind::Result)));
    schedule.push(at(reveal + 2, QaAction::Shake));
    schedule.push(at(reveal + 10, QaAction::ResolveCard));
    schedule.push(at(settled, QaAction::ExpectPhase(PhaseKind::Idle)));
    settled
}

fn keep_schedule() -> Vec<ScheduledAction> {
    let mut schedule = Vec::new();
    let mut next = 0;
    for _ in 0..2 {
        next = round(&mut schedule, next) + 10;
    }
    schedule.push(at(next, QaAction::Discard));
    schedule.push(at(next + 1, QaAction::Discard));
    schedule.push(at(next + 2, QaAction::ResetAll { confirm: false }));
    schedule.push(at(next + 3, QaAction::ResetAll { confirm: true }));
    schedule.push(at(next + 4, QaAction::ExpectPhase(PhaseKind::Idle)));
    schedule
}

fn burn_schedule() -> Vec<ScheduledAction> {
    let mut schedule = Vec::new();
    let mut next = 0;
    for _ in 0..8 {
        next = round(&mut schedule, next) + 10;
    }
    schedule.push(at(next, QaAction::ExpectPhase(PhaseKind::Idle)));
    schedule
}

fn stale_schedule() -> Vec<ScheduledAction> {
    let reveal = frames_for(config::SHAKE_DURATION_MS) + 5;
    let end = reveal + 20 + frames_for(config::BURN_DURATION_MS) * 2;
    vec![
        at(0, QaAction::Shake),
        at(30, QaAction::Discard),
        at(reveal, QaAction::ExpectPhase(PhaseKind::Result)),
        at(reveal + 10, QaAction::ResolveCard),
        at(reveal + 20, QaAction::Teardown),
        at(reveal + 25, QaAction::Shake),
        at(end, QaAction::Discard),
    ]
}
