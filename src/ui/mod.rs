pub mod graphs;
pub mod readouts;
pub mod toolbar;

use crate::simulation::SimState;

/// Tracks which UI panels are open.
pub struct UiState {
    pub show_waveform: bool,
    pub show_zones: bool,
    pub show_detections: bool,
    pub show_log: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            show_waveform: true,
            show_zones: true,
            show_detections: true,
            show_log: true,
        }
    }
}

/// Draw all egui UI panels.
pub fn draw_ui(sim: &mut SimState, ui_state: &mut UiState) {
    egui_macroquad::ui(|ctx| {
        toolbar::draw_toolbar(ctx, sim, ui_state);

        egui::SidePanel::right("readouts")
            .exact_width(crate::renderer::PANEL_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    graphs::draw_gauge(ui, sim);

                    if ui_state.show_waveform {
                        ui.separator();
                        graphs::draw_waveform(ui, sim);
                    }
                    if ui_state.show_zones {
                        ui.separator();
                        readouts::draw_zones(ui, sim);
                    }
                    if ui_state.show_detections {
                        ui.separator();
                        readouts::draw_detections(ui, sim);
                    }
                    if ui_state.show_log {
                        ui.separator();
                        readouts::draw_event_log(ui, sim);
                    }
                });
            });
    });

    egui_macroquad::draw();
}

/// Whether egui is currently consuming the keyboard.
pub fn wants_keyboard() -> bool {
    let mut wants = false;
    egui_macroquad::cfg(|ctx| {
        wants = ctx.wants_keyboard_input();
    });
    wants
}
