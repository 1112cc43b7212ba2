use crate::event_log::Severity;
use crate::simulation::SimState;

fn severity_color(severity: Severity) -> egui::Color32 {
    match severity {
        Severity::Info => egui::Color32::from_rgb(180, 200, 210),
        Severity::Warning => egui::Color32::from_rgb(235, 190, 70),
        Severity::Danger => egui::Color32::from_rgb(235, 80, 65),
        Severity::Success => egui::Color32::from_rgb(90, 220, 130),
        Severity::System => egui::Color32::from_rgb(140, 150, 170),
    }
}

/// Per-zone signal quality from the static field.
pub fn draw_zones(ui: &mut egui::Ui, sim: &SimState) {
    ui.collapsing("Zones", |ui| {
        for (name, quality) in sim.room.zone_readouts() {
            ui.horizontal(|ui| {
                ui.label(format!("{name:<12}"));
                let bar = egui::ProgressBar::new(quality / 100.0).text(format!("{quality:.0}%"));
                ui.add(bar);
            });
        }
    });
}

pub fn draw_detections(ui: &mut egui::Ui, sim: &SimState) {
    ui.collapsing("Detections", |ui| {
        let mut any = false;
        for (marker, opacity) in sim.markers.history() {
            any = true;
            let alpha = (opacity * 255.0) as u8;
            let color = egui::Color32::from_rgba_unmultiplied(255, 210, 120, alpha);
            ui.label(
                egui::RichText::new(format!(
                    "{:<10} {:.2} m tall  {:.1} m away  {:.0}%",
                    marker.kind.label(),
                    marker.metrics.height_m,
                    marker.metrics.distance_m,
                    marker.metrics.confidence_pct
                ))
                .monospace()
                .color(color),
            );
        }
        if !any {
            ui.label("No detections yet (press D)");
        }
    });
}

pub fn draw_event_log(ui: &mut egui::Ui, sim: &SimState) {
    let heading = format!("Event log ({})", sim.log.len());
    egui::CollapsingHeader::new(heading).id_salt("event_log").show(ui, |ui| {
        if sim.log.is_empty() {
            ui.label("Nothing logged yet (press Space to scan)");
            return;
        }
        egui::ScrollArea::vertical()
            .max_height(220.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for entry in sim.log.entries() {
                    ui.label(
                        egui::RichText::new(format!("[{:>6.1}s] {}", entry.time, entry.message))
                            .small()
                            .color(severity_color(entry.severity)),
                    );
                }
            });
    });
}
