use clap::Parser;
use macroquad::prelude::*;
use std::path::PathBuf;

mod config;
mod controller;
mod feedback;
mod fire;
mod fonts;
mod fortune;
mod particles;
mod qa;
mod render_loop;
mod renderer;
mod session;
mod surface;
mod timers;
mod ui;

use controller::SessionController;
use feedback::LogHaptics;
use fire::RenderSurface;
use fortune::FortuneCorpus;
use qa::QaScenario;
use surface::FireCanvas;
use ui::UiState;

#[derive(Parser, Debug)]
#[command(name = "omikuji")]
#[command(about = "Draw a fortune; keep the good ones, burn the bad ones", long_about = None)]
struct Cli {
    /// RNG seed (defaults to the system clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Fire canvas width in pixels
    #[arg(long, default_value_t = config::BURN_SURFACE_WIDTH, value_parser = parse_dimension)]
    fire_width: f32,

    /// Fire canvas height in pixels
    #[arg(long, default_value_t = config::BURN_SURFACE_HEIGHT, value_parser = parse_dimension)]
    fire_height: f32,

    /// Run a scripted QA scenario headlessly (keep, burn, stale) and exit
    #[arg(long)]
    qa: Option<String>,

    /// Directory for the QA report
    #[arg(long, default_value = "qa_output")]
    qa_out: PathBuf,
}

/// Surface sides must be finite and positive.
fn parse_dimension(value: &str) -> Result<f32, String> {
    let side: f32 = value
        .parse()
        .map_err(|e| format!("'{value}' is not a number: {e}"))?;
    fire::surface_size(side, 1.0)?;
    Ok(side)
}

fn window_conf() -> Conf {
    Conf {
        window_title: "灵签 · Omikuji".to_string(),
        window_width: 720,
        window_height: 900,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

fn main() {
    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(clock_seed);

    if let Some(ref name) = cli.qa {
        std::process::exit(run_qa(name, seed, &cli));
    }

    macroquad::Window::from_config(window_conf(), run(seed, vec2(cli.fire_width, cli.fire_height)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_size_flags_reject_unusable_values() {
        for bad in ["-10", "0", "NaN", "inf", "wide"] {
            let parsed = Cli::try_parse_from(["omikuji", "--fire-width", bad]);
            assert!(parsed.is_err(), "--fire-width {bad} accepted");
            let parsed = Cli::try_parse_from(["omikuji", "--fire-height", bad]);
            assert!(parsed.is_err(), "--fire-height {bad} accepted");
        }
    }

    #[test]
    fn fire_size_flags_default_to_burn_surface() {
        let cli = Cli::try_parse_from(["omikuji", "--fire-width", "300"]).expect("valid flags");
        assert_eq!(cli.fire_width, 300.0);
        assert_eq!(cli.fire_height, config::BURN_SURFACE_HEIGHT);
    }
}

fn run_qa(name: &str, seed: u64, cli: &Cli) -> i32 {
    let Some(scenario) = QaScenario::parse_cli(name) else {
        eprintln!("[OMIKUJI] Unknown QA scenario '{name}' (expected keep, burn or stale)");
        return 2;
    };
    let report = match qa::run_headless(
        scenario,
        seed,
        (cli.fire_width, cli.fire_height),
        cli.qa_out.clone(),
    ) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("[OMIKUJI] QA run failed: {e}");
            return 1;
        }
    };
    match qa::write_report(&report, &cli.qa_out) {
        Ok(path) => eprintln!(
            "[OMIKUJI] QA {} seed {}: {} ({} checks) -> {}",
            report.scenario,
            seed,
            report.overall_status,
            report.checks.len(),
            path.display()
        ),
        Err(e) => {
            eprintln!("[OMIKUJI] {e}");
            return 1;
        }
    }
    if report.passed() {
        0
    } else {
        1
    }
}

async fn run(seed: u64, fire_bounds: Vec2) {
    eprintln!("[OMIKUJI] Starting with seed {seed}");
    fonts::install_cjk_fallback();
    prevent_quit();

    let mut controller =
        SessionController::new(FortuneCorpus::standard(), seed, fire_bounds, LogHaptics);
    let mut ui_state = UiState::new(seed);
    let mut fire_canvas: Option<FireCanvas> = None;

    loop {
        let frame_ms = (get_frame_time() as f64 * 1000.0).min(config::MAX_FRAME_MS);
        controller.advance(frame_ms);

        // The canvas lives exactly as long as the fire.
        if controller.is_fire_active() {
            if fire_canvas.is_none() {
                fire_canvas = FireCanvas::new(fire_bounds);
            }
        } else {
            fire_canvas = None;
        }
        controller.render_fire(fire_canvas.as_mut().map(|c| c as &mut dyn RenderSurface));

        if is_key_pressed(KeyCode::Space) {
            controller.shake();
        }
        if is_key_pressed(KeyCode::Escape) {
            controller.discard();
        }

        renderer::draw(&controller, fire_canvas.as_ref());
        ui::draw_ui(&mut controller, &mut ui_state);

        for event in controller.drain_events() {
            eprintln!("[OMIKUJI] {}", event.describe());
        }

        if is_quit_requested() {
            break;
        }
        next_frame().await;
    }

    controller.teardown();
    eprintln!(
        "[OMIKUJI] Session closed after {:.1}s with {} pinned",
        controller.clock_ms() / 1000.0,
        controller.pinned().len()
    );
}
