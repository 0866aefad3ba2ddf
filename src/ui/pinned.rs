use egui;

use super::UiState;
use crate::controller::{SessionController, RESET_PROMPT};
use crate::feedback::HapticSink;
use crate::fortune::Tint;

/// Kept fortunes, newest first, with a reset-all button.
pub fn draw_pinned<H: HapticSink>(
    ctx: &egui::Context,
    controller: &SessionController<H>,
    ui_state: &mut UiState,
) {
    if controller.pinned().is_empty() {
        return;
    }
    egui::SidePanel::right("pinned")
        .resizable(false)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(format!("今日福运 ({})", controller.pinned().len()));
                if ui.small_button("重置").clicked() {
                    ui_state.confirm_reset = true;
                }
            });
            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                for fortune in controller.pinned() {
                    let [r, g, b] = fortune.color.rgb();
                    ui.group(|ui| {
                        ui.label(
                            egui::RichText::new(fortune.level.label())
                                .strong()
                                .color(egui::Color32::from_rgb(r, g, b)),
                        );
                        let [r, g, b] = Tint::Gray600.rgb();
                        ui.label(
                            egui::RichText::new(fortune.poem)
                                .small()
                                .color(egui::Color32::from_rgb(r, g, b)),
                        );
                    });
                }
            });
        });
}

/// Yes/no window gating reset-all.
pub fn draw_reset_confirm<H: HapticSink>(
    ctx: &egui::Context,
    controller: &mut SessionController<H>,
    ui_state: &mut UiState,
) {
    egui::Window::new("确认")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(RESET_PROMPT);
            ui.horizontal(|ui| {
                if ui.button("确定").clicked() {
                    controller.reset_all(&mut true);
                    ui_state.confirm_reset = false;
                }
                if ui.button("取消").clicked() {
                    controller.reset_all(&mut false);
                    ui_state.confirm_reset = false;
                }
            });
        });
}
