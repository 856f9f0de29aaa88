//! Object list panel: every scene object with visibility, selection and
//! per-object actions

use egui::Ui;
use shared::ObjectId;

use crate::i18n::t;
use crate::state::scene::{kind_icon, object_display_name};
use crate::state::AppState;
use crate::viewport::ViewportPanel;

/// Deferred row action, applied once the list is drawn
enum RowAction {
    Select(ObjectId),
    SetVisible(ObjectId, bool),
    SetColor(ObjectId, [f32; 3]),
    Focus(ObjectId),
    Duplicate(ObjectId),
    Delete(ObjectId),
}

pub fn show(ui: &mut Ui, state: &mut AppState, viewport: &mut ViewportPanel) {
    ui.horizontal(|ui| {
        ui.heading(t("scene.title"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("({})", state.scene.len()));
        });
    });
    ui.separator();

    if state.scene.is_empty() {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.weak(t("scene.empty"));
        });
        return;
    }

    let mut actions = Vec::new();

    egui::ScrollArea::vertical()
        .id_salt("scene_list_scroll")
        .show(ui, |ui| {
            let selected = state.get_selection();
            for object in state.scene.objects() {
                let is_selected = selected == Some(&object.id);

                let label_color = if !object.visible {
                    egui::Color32::from_rgb(100, 100, 100)
                } else if is_selected {
                    egui::Color32::from_rgb(100, 200, 255)
                } else {
                    egui::Color32::from_rgb(200, 200, 200)
                };

                ui.horizontal(|ui| {
                    let eye = if object.visible { "👁" } else { "—" };
                    let hint = if object.visible { t("scene.hide") } else { t("scene.show") };
                    if ui.small_button(eye).on_hover_text(hint).clicked() {
                        actions.push(RowAction::SetVisible(object.id.clone(), !object.visible));
                    }

                    let mut color = object.material.color;
                    if ui
                        .color_edit_button_rgb(&mut color)
                        .on_hover_text(t("scene.color"))
                        .changed()
                    {
                        actions.push(RowAction::SetColor(object.id.clone(), color));
                    }

                    let text = egui::RichText::new(format!(
                        "{} {}",
                        kind_icon(object.kind),
                        object_display_name(object)
                    ))
                    .color(label_color);
                    let response = ui.selectable_label(is_selected, text);

                    if response.clicked() {
                        actions.push(RowAction::Select(object.id.clone()));
                    }
                    if response.double_clicked() {
                        actions.push(RowAction::Focus(object.id.clone()));
                    }

                    response.context_menu(|ui| {
                        if ui.button(t("scene.focus")).clicked() {
                            actions.push(RowAction::Focus(object.id.clone()));
                            ui.close_menu();
                        }
                        if ui.button(t("scene.duplicate")).clicked() {
                            actions.push(RowAction::Duplicate(object.id.clone()));
                            ui.close_menu();
                        }
                        ui.separator();
                        if ui
                            .button(
                                egui::RichText::new(t("scene.delete"))
                                    .color(egui::Color32::from_rgb(220, 80, 80)),
                            )
                            .clicked()
                        {
                            actions.push(RowAction::Delete(object.id.clone()));
                            ui.close_menu();
                        }
                    });
                });
            }
        });

    for action in actions {
        apply(action, state, viewport);
    }
}

fn apply(action: RowAction, state: &mut AppState, viewport: &mut ViewportPanel) {
    match action {
        RowAction::Select(id) => {
            state.select(Some(&id));
        }
        RowAction::SetVisible(id, visible) => {
            state.set_visible(&id, visible);
        }
        RowAction::SetColor(id, color) => {
            state.set_color(&id, color);
        }
        RowAction::Focus(id) => {
            state.select(Some(&id));
            viewport.focus_selected(state);
        }
        RowAction::Duplicate(id) => {
            if let Some(copy) = state.duplicate_object(&id) {
                state.select(Some(&copy));
            }
        }
        RowAction::Delete(id) => {
            state.delete_object(&id);
        }
    }
}
