use crate::config;
use crate::disturbance::AlertLevel;
use crate::simulation::SimState;

fn level_color(level: AlertLevel) -> egui::Color32 {
    match level {
        AlertLevel::Calm => egui::Color32::from_rgb(90, 220, 130),
        AlertLevel::Elevated => egui::Color32::from_rgb(235, 190, 70),
        AlertLevel::Alert => egui::Color32::from_rgb(235, 80, 65),
    }
}

/// Disturbance gauge and signal-quality history.
pub fn draw_gauge(ui: &mut egui::Ui, sim: &SimState) {
    let snapshot = sim.disturbance();
    ui.heading("Interference");

    ui.horizontal(|ui| {
        ui.label("Level:");
        let color = if snapshot.scanning {
            level_color(snapshot.level)
        } else {
            egui::Color32::from_gray(120)
        };
        let label = if snapshot.scanning {
            snapshot.level.label()
        } else {
            "IDLE"
        };
        ui.label(egui::RichText::new(label).strong().color(color));
    });

    let bar = egui::ProgressBar::new(snapshot.value / config::DISTURBANCE_MAX)
        .text(format!("{:.0} / {:.0}", snapshot.value, config::DISTURBANCE_MAX))
        .fill(level_color(snapshot.level));
    ui.add(bar);
    ui.label(
        egui::RichText::new(format!("Sensitivity {:.0}", snapshot.sensitivity))
            .small()
            .color(egui::Color32::from_gray(170)),
    );

    ui.label(
        egui::RichText::new("Signal quality")
            .small()
            .color(egui::Color32::from_gray(170)),
    );
    draw_series(
        ui,
        &snapshot.history,
        (0.0, 100.0),
        egui::Color32::from_rgb(100, 200, 255),
        snapshot.history.last().map(|v| format!("{v:.0}%")),
    );
}

pub fn draw_waveform(ui: &mut egui::Ui, sim: &SimState) {
    ui.label(
        egui::RichText::new("Waveform")
            .small()
            .color(egui::Color32::from_gray(170)),
    );
    let samples = sim.waveform_samples();
    let level = sim.disturbance().level;
    draw_series(ui, &samples, (-1.0, 1.0), level_color(level), None);
}

/// Line plot over a fixed value range, with an optional corner label.
fn draw_series(
    ui: &mut egui::Ui,
    samples: &[f32],
    (min_val, max_val): (f32, f32),
    color: egui::Color32,
    caption: Option<String>,
) {
    let size = egui::vec2(ui.available_width(), 80.0);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let rect = response.rect;

    painter.rect_filled(rect, 2.0, egui::Color32::from_gray(20));

    let len = samples.len();
    if len >= 2 {
        let range = (max_val - min_val).max(f32::EPSILON);
        let points: Vec<egui::Pos2> = samples
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let x = rect.left() + (i as f32 / (len - 1) as f32) * rect.width();
                let t = ((v - min_val) / range).clamp(0.0, 1.0);
                egui::pos2(x, rect.bottom() - t * rect.height())
            })
            .collect();
        for pair in points.windows(2) {
            painter.line_segment([pair[0], pair[1]], egui::Stroke::new(1.5, color));
        }
    }

    if let Some(text) = caption {
        painter.text(
            egui::pos2(rect.right() - 4.0, rect.top() + 2.0),
            egui::Align2::RIGHT_TOP,
            text,
            egui::FontId::proportional(10.0),
            egui::Color32::from_gray(200),
        );
    }
}
