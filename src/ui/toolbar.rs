use egui;

use super::UiState;
use crate::controller::SessionController;
use crate::feedback::HapticSink;

const AMBER: egui::Color32 = egui::Color32::from_rgb(251, 191, 36);
const AMBER_SOFT: egui::Color32 = egui::Color32::from_rgba_premultiplied(200, 170, 110, 200);
const LACQUER: egui::Color32 = egui::Color32::from_rgb(69, 10, 10);
const EMBER: egui::Color32 = egui::Color32::from_rgb(251, 146, 60);

/// Header strip: title, motto and session status.
pub fn draw_toolbar<H: HapticSink>(
    ctx: &egui::Context,
    controller: &SessionController<H>,
    ui_state: &mut UiState,
) {
    egui::TopBottomPanel::top("toolbar")
        .frame(egui::Frame::new().fill(LACQUER).inner_margin(6.0))
        .show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                title_badge(ui, "每日灵签");
                ui.separator();
                metric_chip(ui, "状态", controller.kind().label().to_string());
                metric_chip(ui, "福运", format!("{}", controller.pinned().len()));
                if controller.is_fire_active() {
                    status_chip(ui, "焚", EMBER);
                }
                metric_chip(ui, "seed", format!("{}", ui_state.seed));
                ui.toggle_value(&mut ui_state.show_pinned, "今日福运");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new("心诚则灵").small().color(AMBER_SOFT));
                });
            });
        });
}

pub fn draw_footer(ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("footer")
        .frame(egui::Frame::new().inner_margin(4.0))
        .show_separator_line(false)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new("灵签应用 · 每日一签")
                        .small()
                        .color(egui::Color32::from_rgba_unmultiplied(253, 230, 138, 100)),
                );
            });
        });
}

fn title_badge(ui: &mut egui::Ui, label: &str) {
    ui.label(egui::RichText::new(label).size(20.0).strong().color(AMBER));
}

/// Amber-on-lacquer key/value tag.
fn metric_chip(ui: &mut egui::Ui, key: &str, value: String) {
    egui::Frame::new()
        .stroke(egui::Stroke::new(1.0, AMBER_SOFT))
        .corner_radius(3.0)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(key).small().color(AMBER_SOFT));
            ui.label(egui::RichText::new(value).small().strong().color(AMBER));
        });
}

fn status_chip(ui: &mut egui::Ui, label: &str, color: egui::Color32) {
    egui::Frame::new()
        .fill(color.gamma_multiply(0.25))
        .stroke(egui::Stroke::new(1.0, color))
        .corner_radius(3.0)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(label).small().strong().color(color));
        });
}
