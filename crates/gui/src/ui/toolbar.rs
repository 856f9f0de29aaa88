//! Toolbar actions and UI

use egui::Ui;
use shared::PrimitiveKind;

use crate::i18n::{kind_label, t};
use crate::state::AppState;
use crate::viewport::ViewportPanel;

// ── Public actions (callable from menus and shortcuts too) ───

pub fn action_add(state: &mut AppState, kind: PrimitiveKind) {
    let id = state.add_object(kind);
    state.select(Some(&id));
}

pub fn action_duplicate(state: &mut AppState) {
    if state.duplicate_selected().is_none() {
        tracing::debug!("Duplicate: nothing selected");
    }
}

pub fn action_delete(state: &mut AppState) {
    if !state.delete_selected() {
        tracing::debug!("Delete: nothing selected");
    }
}

pub fn action_export(state: &mut AppState, viewport: &mut ViewportPanel) {
    if viewport.export_in_flight() {
        tracing::debug!("Export already running");
        return;
    }
    viewport.request_export(state);
}

// ── Toolbar UI ───────────────────────────────────────────────

pub fn show(ui: &mut Ui, state: &mut AppState, viewport: &mut ViewportPanel) {
    ui.horizontal(|ui| {
        ui.label(t("tb.add"));
        for &kind in PrimitiveKind::all() {
            if ui.button(kind_label(kind)).clicked() {
                action_add(state, kind);
            }
        }

        ui.separator();

        let has_selection = state.get_selection().is_some();
        if ui
            .add_enabled(has_selection, egui::Button::new(t("tb.duplicate")))
            .clicked()
        {
            action_duplicate(state);
        }
        if ui
            .add_enabled(has_selection, egui::Button::new(t("tb.delete")))
            .clicked()
        {
            action_delete(state);
        }

        ui.separator();

        if ui.button(t("tb.reset_camera")).clicked() {
            viewport.reset_camera();
        }

        let exporting = viewport.export_in_flight();
        if ui
            .add_enabled(!exporting, egui::Button::new(t("tb.export")))
            .on_hover_text(t("tb.export_hint"))
            .clicked()
        {
            action_export(state, viewport);
        }
    });
}
