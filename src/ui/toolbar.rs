use super::UiState;
use crate::simulation::SimState;

/// Status strip plus scan controls.
pub fn draw_toolbar(ctx: &egui::Context, sim: &mut SimState, ui_state: &mut UiState) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.add_space(3.0);
        ui.horizontal_wrapped(|ui| {
            title_badge(ui, "SONARSCOPE");

            ui.separator();
            compact_group(ui, "Scan", |ui| {
                let scanning = sim.engine.is_scanning();
                let label = if scanning { "Stop scan" } else { "Start scan" };
                if ui.selectable_label(scanning, label).clicked() {
                    sim.toggle_scanning();
                }
                let trigger = ui.add_enabled(scanning, egui::Button::new("Trigger event"));
                if trigger.clicked() {
                    sim.trigger_manual_event();
                }
            });

            compact_group(ui, "Sensitivity", |ui| {
                let mut sensitivity = sim.engine.sensitivity();
                let slider = egui::Slider::new(&mut sensitivity, 0.0..=100.0).integer();
                if ui.add(slider).changed() {
                    sim.set_sensitivity(sensitivity);
                }
            });

            compact_group(ui, "Sweep", |ui| {
                let running = sim.clock.is_running();
                let label = if running { "Pause" } else { "Animate" };
                if ui.button(label).clicked() {
                    sim.toggle_animation();
                }
                if ui.button("Demo detection").clicked() {
                    sim.inject_demo_detection();
                }
            });

            compact_group(ui, "Panels", |ui| {
                ui.toggle_value(&mut ui_state.show_waveform, "Waveform");
                ui.toggle_value(&mut ui_state.show_zones, "Zones");
                ui.toggle_value(&mut ui_state.show_detections, "Detections");
                ui.toggle_value(&mut ui_state.show_log, "Log");
            });
        });

        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            let snapshot = sim.disturbance();
            metric_chip(ui, "Disturbance", format!("{:.0}", snapshot.value));
            metric_chip(
                ui,
                "Quality",
                format!("{:.0}%", snapshot.history.last().copied().unwrap_or(0.0)),
            );
            metric_chip(ui, "Echoes", format!("{}", sim.clock.echo_count()));
            metric_chip(ui, "Laps", format!("{}", sim.clock.sweep().lap_count));
            metric_chip(ui, "Markers", format!("{}", sim.markers.live().len()));
            if snapshot.scanning && snapshot.level == crate::disturbance::AlertLevel::Alert {
                status_chip(ui, "ALERT", egui::Color32::from_rgb(230, 70, 60));
            }
        });
        ui.add_space(3.0);
    });
}

fn title_badge(ui: &mut egui::Ui, label: &str) {
    let text = egui::RichText::new(label)
        .strong()
        .color(egui::Color32::from_rgb(120, 255, 160));
    ui.label(text);
}

fn compact_group(ui: &mut egui::Ui, heading: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(heading)
                    .small()
                    .color(egui::Color32::from_rgb(150, 185, 165)),
            );
            add_contents(ui);
        });
    });
}

fn metric_chip(ui: &mut egui::Ui, key: &str, value: String) {
    let text = egui::RichText::new(format!("{key}: {value}"))
        .small()
        .color(egui::Color32::from_rgb(205, 225, 215));
    ui.group(|ui| {
        ui.label(text);
    });
}

fn status_chip(ui: &mut egui::Ui, label: &str, color: egui::Color32) {
    ui.group(|ui| {
        ui.label(egui::RichText::new(label).small().strong().color(color));
    });
}
