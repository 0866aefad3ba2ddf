use egui;

use crate::controller::SessionController;
use crate::feedback::HapticSink;
use crate::fortune::{Fortune, Tint};

fn color32(tint: Tint) -> egui::Color32 {
    let [r, g, b] = tint.rgb();
    egui::Color32::from_rgb(r, g, b)
}

const INK: egui::Color32 = egui::Color32::from_rgb(68, 40, 20);
const GOLD: egui::Color32 = egui::Color32::from_rgb(252, 211, 77);

pub fn draw_shake_prompt<H: HapticSink>(ctx: &egui::Context, controller: &mut SessionController<H>) {
    egui::Area::new(egui::Id::new("shake_prompt"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -120.0])
        .show(ctx, |ui| {
            let button = egui::Button::new(
                egui::RichText::new("点击摇签").size(22.0).color(GOLD),
            )
            .fill(egui::Color32::from_rgb(153, 27, 27))
            .min_size(egui::vec2(200.0, 48.0));
            if ui.add(button).clicked() {
                controller.shake();
            }
            ui.label(
                egui::RichText::new("摇一摇 或 按空格键")
                    .small()
                    .color(egui::Color32::from_rgba_unmultiplied(252, 211, 77, 120)),
            );
        });
}

/// Caption under the stage. `pulse` makes it breathe like a flame.
pub fn draw_caption(ctx: &egui::Context, text: &str, pulse: bool) {
    let alpha = if pulse {
        let t = ctx.input(|i| i.time) as f32;
        (0.6 + 0.4 * (t * std::f32::consts::TAU * 0.5).sin().abs()) * 255.0
    } else {
        255.0
    };
    let color = egui::Color32::from_rgba_unmultiplied(251, 146, 60, alpha as u8);
    egui::Area::new(egui::Id::new("caption"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -60.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(text).size(22.0).color(color));
        });
    if pulse {
        ctx.request_repaint();
    }
}

pub fn draw_result<H: HapticSink>(
    ctx: &egui::Context,
    controller: &mut SessionController<H>,
    fortune: &Fortune,
) {
    egui::Window::new("fortune_card")
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(
            egui::Frame::window(&ctx.style())
                .fill(egui::Color32::from_rgb(255, 251, 235))
                .stroke(egui::Stroke::new(3.0, egui::Color32::from_rgb(180, 83, 9))),
        )
        .fixed_size([300.0, 380.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                egui::Frame::new()
                    .fill(color32(fortune.background))
                    .corner_radius(8.0)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(fortune.level.label())
                                .size(48.0)
                                .strong()
                                .color(color32(fortune.color)),
                        );
                    });
                ui.add_space(8.0);
                ui.label(egui::RichText::new(fortune.description).size(16.0).color(INK));
                ui.separator();
                ui.add_space(6.0);
                ui.label(egui::RichText::new(fortune.poem).size(18.0).italics().color(INK));
                ui.add_space(16.0);

                ui.horizontal(|ui| {
                    if fortune.is_good() {
                        let pin = egui::Button::new(
                            egui::RichText::new("纳福固定").color(GOLD),
                        )
                        .fill(egui::Color32::from_rgb(185, 28, 28));
                        if ui.add(pin).clicked() {
                            controller.pin();
                        }
                    } else {
                        let burn = egui::Button::new(
                            egui::RichText::new("化解厄运").color(egui::Color32::WHITE),
                        )
                        .fill(egui::Color32::from_rgb(55, 65, 81));
                        if ui.add(burn).clicked() {
                            controller.burn();
                        }
                    }
                    if ui.button("放弃").clicked() {
                        controller.discard();
                    }
                });
            });
        });
}

/// Tier text on the card while it burns.
pub fn draw_burning_label(ctx: &egui::Context, fortune: &Fortune) {
    egui::Area::new(egui::Id::new("burning_label"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(fortune.level.label())
                        .size(40.0)
                        .strong()
                        .color(egui::Color32::from_rgba_unmultiplied(31, 41, 55, 128)),
                );
                ui.label(
                    egui::RichText::new("厄运退散")
                        .small()
                        .color(egui::Color32::from_rgb(107, 114, 128)),
                );
            });
        });
}
