use macroquad::prelude::*;

use crate::config;
use crate::controller::SessionController;
use crate::feedback::HapticSink;
use crate::fortune::Fortune;
use crate::session::Phase;
use crate::surface::FireCanvas;

const BG_TOP: Color = Color::new(0.27, 0.04, 0.04, 1.0);
const BG_BOTTOM: Color = Color::new(0.10, 0.02, 0.02, 1.0);
const TUBE_COLOR: Color = Color::new(0.55, 0.22, 0.08, 1.0);
const TUBE_RIM: Color = Color::new(0.85, 0.65, 0.25, 1.0);
const STICK_COLOR: Color = Color::new(0.93, 0.82, 0.55, 1.0);

/// Card appearance while it burns away.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharState {
    pub scale: f32,
    pub lift: f32,
    pub brightness: f32,
    pub alpha: f32,
}

/// Keyframes: flare at 20 %, charred at 50 %, gone at 100 %.
const CHAR_KEYS: [(f32, CharState); 4] = [
    (0.0, CharState { scale: 1.0, lift: 0.0, brightness: 1.0, alpha: 1.0 }),
    (0.2, CharState { scale: 0.98, lift: 2.0, brightness: 1.5, alpha: 0.97 }),
    (0.5, CharState { scale: 0.95, lift: 5.0, brightness: 0.4, alpha: 0.9 }),
    (1.0, CharState { scale: 0.8, lift: 40.0, brightness: 0.0, alpha: 0.0 }),
];

fn ease_in_out(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

pub fn charring_at(elapsed_s: f32) -> CharState {
    let t = ease_in_out((elapsed_s / config::CHAR_DURATION_S).clamp(0.0, 1.0));
    if t >= 1.0 {
        return CHAR_KEYS[CHAR_KEYS.len() - 1].1;
    }
    for pair in CHAR_KEYS.windows(2) {
        let (t0, a) = pair[0];
        let (t1, b) = pair[1];
        if t <= t1 {
            let k = (t - t0) / (t1 - t0);
            return CharState {
                scale: a.scale + (b.scale - a.scale) * k,
                lift: a.lift + (b.lift - a.lift) * k,
                brightness: a.brightness + (b.brightness - a.brightness) * k,
                alpha: a.alpha + (b.alpha - a.alpha) * k,
            };
        }
    }
    CHAR_KEYS[CHAR_KEYS.len() - 1].1
}

/// Tube rotation in degrees while shaking. Five swings per wobble period.
pub fn tube_wobble(elapsed_s: f32) -> f32 {
    let phase = elapsed_s / config::WOBBLE_PERIOD_S * std::f32::consts::TAU * 5.0;
    config::WOBBLE_DEGREES * phase.sin()
}

/// Center of the stage where the tube or card is drawn.
pub fn stage_center() -> Vec2 {
    vec2(screen_width() * 0.5, screen_height() * 0.5)
}

pub fn draw<H: HapticSink>(controller: &SessionController<H>, fire: Option<&FireCanvas>) {
    draw_background();

    let center = stage_center();
    let elapsed_s = (controller.phase_elapsed_ms() / 1000.0) as f32;
    match controller.phase() {
        Phase::Idle => draw_tube(center, 0.0),
        Phase::Shaking => draw_tube(center, tube_wobble(elapsed_s)),
        Phase::Result(_) => {}
        Phase::Burning(fortune) => {
            draw_burning_card(center, fortune, charring_at(elapsed_s));
            if let Some(canvas) = fire {
                let bounds = controller.fire_bounds();
                canvas.present(center - bounds * 0.5);
            }
        }
    }

    draw_fps();
}

fn draw_background() {
    clear_background(BG_BOTTOM);
    let bands = 24;
    let band_h = screen_height() / bands as f32;
    for i in 0..bands {
        let t = i as f32 / (bands - 1) as f32;
        let c = Color::new(
            BG_TOP.r + (BG_BOTTOM.r - BG_TOP.r) * t,
            BG_TOP.g + (BG_BOTTOM.g - BG_TOP.g) * t,
            BG_TOP.b + (BG_BOTTOM.b - BG_TOP.b) * t,
            1.0,
        );
        draw_rectangle(0.0, i as f32 * band_h, screen_width(), band_h + 1.0, c);
    }
}

fn draw_tube(center: Vec2, degrees: f32) {
    let angle = degrees.to_radians();
    let dir = Vec2::from_angle(angle - std::f32::consts::FRAC_PI_2);
    let perp = vec2(-dir.y, dir.x);
    let base = center + vec2(0.0, 90.0);
    let half_w = 40.0;
    let height = 180.0;

    // sticks poking out of the mouth
    for i in 0..5 {
        let offset = (i as f32 - 2.0) * 12.0;
        let from = base + dir * height + perp * offset;
        let to = from + dir * (30.0 + (i % 2) as f32 * 12.0);
        draw_line(from.x, from.y, to.x, to.y, 6.0, STICK_COLOR);
    }

    let bl = base - perp * half_w;
    let br = base + perp * half_w;
    let tl = bl + dir * height;
    let tr = br + dir * height;
    draw_triangle(bl, br, tr, TUBE_COLOR);
    draw_triangle(bl, tr, tl, TUBE_COLOR);
    draw_line(tl.x, tl.y, tr.x, tr.y, 4.0, TUBE_RIM);
    draw_line(bl.x, bl.y, br.x, br.y, 4.0, TUBE_RIM);
}

fn draw_burning_card(center: Vec2, fortune: &Fortune, state: CharState) {
    let [r, g, b] = fortune.background.rgb();
    let tint = |c: u8| ((c as f32 / 255.0) * state.brightness).min(1.0);
    let w = config::CARD_WIDTH * state.scale;
    let h = config::CARD_HEIGHT * state.scale;
    let top_left = center - vec2(w, h) * 0.5 - vec2(0.0, state.lift);

    draw_rectangle(
        top_left.x,
        top_left.y,
        w,
        h,
        Color::new(tint(r), tint(g), tint(b), state.alpha),
    );
    draw_rectangle_lines(
        top_left.x,
        top_left.y,
        w,
        h,
        3.0,
        Color::new(0.2, 0.1, 0.05, state.alpha),
    );
}

fn draw_fps() {
    let text = format!("FPS: {}", get_fps());
    draw_text(&text, 11.0, screen_height() - 9.0, 16.0, Color::new(0.0, 0.0, 0.0, 0.5));
    draw_text(&text, 10.0, screen_height() - 10.0, 16.0, Color::new(1.0, 0.85, 0.6, 0.4));
}
