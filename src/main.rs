use clap::Parser;
use macroquad::prelude::*;
use tracing::{error, info, warn};

mod arena;
mod cli;
mod config;
mod disturbance;
mod error;
mod event_log;
mod history;
mod layout;
mod markers;
mod obstacles;
mod phosphor;
mod renderer;
mod room;
mod scheduler;
mod signal_field;
mod simulation;
mod soak;
mod sonar;
mod ui;
mod waveform;

use cli::Cli;
use renderer::ScopeRenderer;
use room::{FloorPlan, Room};
use simulation::SimState;
use ui::UiState;

fn window_conf() -> Conf {
    Conf {
        window_title: "Sonarscope - Wi-Fi Interference Monitor".to_string(),
        window_width: 1380,
        window_height: 840,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .init();

    let room = match &cli.layout {
        Some(path) => layout::load_room(path).map_err(|e| e.to_string()),
        None => Room::build(FloorPlan::default_apartment()).map_err(|e| e.to_string()),
    };
    let room = match room {
        Ok(room) => room,
        Err(e) => {
            error!("failed to build room: {e}");
            std::process::exit(1);
        }
    };

    if cli.headless {
        std::process::exit(run_headless(&cli));
    }

    macroquad::Window::from_config(window_conf(), run_display(cli, room));
}

fn run_headless(cli: &Cli) -> i32 {
    let report = soak::run(cli.seed, cli.clamped_sensitivity(), cli.soak_ticks);
    for check in &report.checks {
        if check.passed {
            info!(check = %check.name, details = %check.details, "pass");
        } else {
            warn!(check = %check.name, details = %check.details, "FAIL");
        }
    }
    info!(
        status = %report.overall_status,
        min = report.value.min,
        max = report.value.max,
        mean = report.value.mean,
        excursions = report.excursions,
        "soak finished"
    );

    if let Some(path) = &cli.report {
        match report.write_json(path) {
            Ok(()) => info!(path = %path.display(), "report written"),
            Err(e) => {
                error!("failed to write report: {e}");
                return 1;
            }
        }
    }

    if report.passed() {
        0
    } else {
        1
    }
}

async fn run_display(cli: Cli, room: Room) {
    let mut scope = ScopeRenderer::new(&room);
    let mut sim = SimState::new(room, cli.seed, cli.clamped_sensitivity());
    let mut ui_state = UiState::default();

    if cli.autostart {
        sim.set_scanning(true);
    }

    loop {
        if !ui::wants_keyboard() {
            if is_key_pressed(KeyCode::Space) {
                sim.toggle_scanning();
            }
            if is_key_pressed(KeyCode::T) {
                sim.trigger_manual_event();
            }
            if is_key_pressed(KeyCode::D) {
                sim.inject_demo_detection();
            }
            if is_key_pressed(KeyCode::P) {
                sim.toggle_animation();
            }
        }

        sim.frame(get_frame_time());

        scope.draw(&sim);
        ui::draw_ui(&mut sim, &mut ui_state);

        next_frame().await;
    }
}
