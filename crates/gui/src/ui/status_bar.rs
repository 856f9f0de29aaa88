use egui::Ui;

use crate::i18n::t;
use crate::state::{AppState, ExportStatus};

pub fn show(ui: &mut Ui, state: &AppState, camera_distance: Option<f32>) {
    ui.horizontal(|ui| {
        ui.weak(format!("{} {}", t("status.objects"), state.scene.len()));

        ui.separator();

        match state.get_selection().and_then(|id| state.scene.get(id)) {
            Some(object) => {
                ui.label(format!("{} {}", t("status.selected"), object.name));
            }
            None => {
                ui.weak(t("status.ready"));
            }
        }

        if let Some(distance) = camera_distance {
            ui.separator();
            ui.weak(format!("{} {distance:.2}", t("status.distance")));
        }

        match &state.last_export {
            Some(ExportStatus::Pending) => {
                ui.separator();
                ui.colored_label(egui::Color32::from_rgb(255, 200, 100), t("status.export_pending"));
            }
            Some(ExportStatus::Saved(path)) => {
                ui.separator();
                ui.weak(format!("{} {}", t("status.export_saved"), path.display()));
            }
            Some(ExportStatus::Failed(e)) => {
                ui.separator();
                ui.colored_label(
                    egui::Color32::from_rgb(220, 80, 80),
                    format!("{} {e}", t("status.export_failed")),
                );
            }
            None => {}
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(concat!("Scene Viewer v", env!("CARGO_PKG_VERSION")));
        });
    });
}
