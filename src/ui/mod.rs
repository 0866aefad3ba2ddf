pub mod card;
pub mod pinned;
pub mod toolbar;

use crate::controller::SessionController;
use crate::feedback::HapticSink;
use crate::session::{Phase, PhaseKind};

/// Host-side UI state that is not part of the session.
pub struct UiState {
    pub show_pinned: bool,
    /// Reset-all confirmation window is open.
    pub confirm_reset: bool,
    pub seed: u64,
}

impl UiState {
    pub fn new(seed: u64) -> Self {
        Self {
            show_pinned: true,
            confirm_reset: false,
            seed,
        }
    }

    /// The reset confirmation only makes sense while idle; close it otherwise.
    pub fn sync_phase(&mut self, kind: PhaseKind) {
        if kind != PhaseKind::Idle {
            self.confirm_reset = false;
        }
    }
}

/// Draw all egui UI panels.
pub fn draw_ui<H: HapticSink>(controller: &mut SessionController<H>, ui_state: &mut UiState) {
    ui_state.sync_phase(controller.kind());

    egui_macroquad::ui(|ctx| {
        toolbar::draw_toolbar(ctx, controller, ui_state);
        toolbar::draw_footer(ctx);

        match controller.phase().clone() {
            Phase::Idle => {
                card::draw_shake_prompt(ctx, controller);
                if ui_state.show_pinned {
                    pinned::draw_pinned(ctx, controller, ui_state);
                }
            }
            Phase::Shaking => card::draw_caption(ctx, "诚心祈福...", false),
            Phase::Result(fortune) => card::draw_result(ctx, controller, &fortune),
            Phase::Burning(fortune) => {
                card::draw_burning_label(ctx, &fortune);
                card::draw_caption(ctx, "烈火焚煞，百无禁忌", true);
            }
        }

        if ui_state.confirm_reset {
            pinned::draw_reset_confirm(ctx, controller, ui_state);
        }
    });

    egui_macroquad::draw();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_confirmation_closes_when_leaving_idle() {
        let mut ui_state = UiState::new(1);
        ui_state.confirm_reset = true;

        ui_state.sync_phase(PhaseKind::Idle);
        assert!(ui_state.confirm_reset);

        for kind in [PhaseKind::Shaking, PhaseKind::Result, PhaseKind::Burning] {
            ui_state.confirm_reset = true;
            ui_state.sync_phase(kind);
            assert!(!ui_state.confirm_reset, "still open in {}", kind.label());
        }
    }
}
