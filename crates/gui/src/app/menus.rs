//! Application menu bar and settings window

use eframe::egui;
use shared::PrimitiveKind;

use crate::i18n::{kind_label, lang, set_lang, t, Lang};
use crate::state::{AppSettings, AppState, IdStrategy};
use crate::ui::toolbar;
use crate::viewport::ViewportPanel;

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, state: &mut AppState, viewport: &mut ViewportPanel) {
    ui.menu_button(t("menu.file"), |ui| {
        if ui
            .add_enabled(!viewport.export_in_flight(), egui::Button::new(t("menu.export_png")))
            .clicked()
        {
            toolbar::action_export(state, viewport);
            ui.close_menu();
        }
        if ui.button(t("menu.export_dir")).clicked() {
            ui.close_menu();
            if let Some(dir) = rfd::FileDialog::new()
                .set_title(t("menu.export_dir_title"))
                .set_directory(state.settings.export.resolved_output_dir())
                .pick_folder()
            {
                tracing::info!("Export folder set to {}", dir.display());
                state.settings.export.output_dir = Some(dir);
                state.settings.save();
            }
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// Show the edit menu
pub fn edit_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.edit"), |ui| {
        let has_selection = state.get_selection().is_some();
        if ui
            .add_enabled(has_selection, egui::Button::new(t("menu.duplicate")))
            .clicked()
        {
            toolbar::action_duplicate(state);
            ui.close_menu();
        }
        if ui
            .add_enabled(has_selection, egui::Button::new(t("menu.delete")))
            .clicked()
        {
            toolbar::action_delete(state);
            ui.close_menu();
        }
        ui.separator();
        if ui
            .add_enabled(has_selection, egui::Button::new(t("menu.deselect_all")))
            .clicked()
        {
            state.clear_selection();
            ui.close_menu();
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState, viewport: &mut ViewportPanel) {
    ui.menu_button(t("menu.view"), |ui| {
        ui.checkbox(&mut state.panels.scene_list, t("menu.scene_list"));
        ui.checkbox(&mut state.panels.status_bar, t("menu.status_bar"));
        ui.separator();
        if ui.button(t("menu.reset_camera")).clicked() {
            viewport.reset_camera();
            ui.close_menu();
        }
        if ui
            .add_enabled(state.get_selection().is_some(), egui::Button::new(t("menu.focus")))
            .clicked()
        {
            viewport.focus_selected(state);
            ui.close_menu();
        }
        ui.separator();
        ui.menu_button(t("menu.language"), |ui| {
            for (l, name) in [(Lang::Ru, "Русский"), (Lang::En, "English")] {
                if ui.selectable_label(lang() == l, name).clicked() {
                    set_lang(l);
                    state.settings.ui.language = l.code().to_string();
                    state.settings.save();
                    ui.close_menu();
                }
            }
        });
    });
}

/// Show the create menu
pub fn create_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.create"), |ui| {
        for &kind in PrimitiveKind::all() {
            if ui.button(kind_label(kind)).clicked() {
                toolbar::action_add(state, kind);
                ui.close_menu();
            }
        }
    });
}

/// Show the settings menu
pub fn settings_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.settings"), |ui| {
        if ui.button(t("menu.preferences")).clicked() {
            state.show_settings_window = true;
            ui.close_menu();
        }
    });
}

/// Show the settings window
pub fn settings_window(ctx: &egui::Context, state: &mut AppState, viewport: &mut ViewportPanel) {
    let mut open = state.show_settings_window;
    egui::Window::new(t("settings.title"))
        .open(&mut open)
        .resizable(true)
        .default_width(400.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                show_camera_settings(ui, state);
                show_scene_settings(ui, state);
                show_grid_settings(ui, state);
                show_viewport_settings(ui, state);
                show_export_settings(ui, state);
                show_ui_settings(ui, state);
                show_settings_buttons(ui, state, viewport);
            });
        });
    state.show_settings_window = open && state.show_settings_window;
}

fn show_camera_settings(ui: &mut egui::Ui, state: &mut AppState) {
    let camera = &mut state.settings.camera;
    ui.heading(t("settings.camera"));
    ui.checkbox(&mut camera.damping_enabled, t("settings.damping"));

    ui.horizontal(|ui| {
        ui.label(t("settings.damping_factor"));
        ui.add_enabled(
            camera.damping_enabled,
            egui::Slider::new(&mut camera.damping_factor, 0.0..=0.9),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.min_distance"));
        ui.add(
            egui::DragValue::new(&mut camera.min_distance)
                .speed(0.1)
                .range(0.1..=camera.max_distance),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.max_distance"));
        ui.add(
            egui::DragValue::new(&mut camera.max_distance)
                .speed(1.0)
                .range(camera.min_distance..=10_000.0),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.fov"));
        ui.add(
            egui::DragValue::new(&mut camera.fov_degrees)
                .speed(1.0)
                .range(10.0..=120.0)
                .suffix("°"),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.zoom_step"));
        ui.add(egui::Slider::new(&mut camera.zoom_step, 0.5..=0.99));
    });

    ui.checkbox(&mut camera.clamp_polar, t("settings.clamp_polar"));
    ui.add_space(10.0);
}

fn show_scene_settings(ui: &mut egui::Ui, state: &mut AppState) {
    let scene = &mut state.settings.scene;
    ui.heading(t("settings.scene"));
    ui.horizontal(|ui| {
        ui.label(t("settings.id_strategy"));
        egui::ComboBox::from_id_salt("id_strategy_combo")
            .selected_text(format!("{:?}", scene.id_strategy))
            .show_ui(ui, |ui| {
                for strategy in [IdStrategy::Uuid, IdStrategy::Sequential, IdStrategy::Timestamp] {
                    ui.selectable_value(&mut scene.id_strategy, strategy, format!("{strategy:?}"));
                }
            });
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.spawn_extent"));
        ui.add(
            egui::DragValue::new(&mut scene.spawn_extent)
                .speed(0.1)
                .range(0.0..=100.0),
        );
    });
    ui.weak(t("settings.restart_hint"));
    ui.add_space(10.0);
}

fn show_grid_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.grid"));
    ui.checkbox(&mut state.settings.grid.visible, t("settings.grid_visible"));

    ui.horizontal(|ui| {
        ui.label(t("settings.grid_size"));
        ui.add(
            egui::DragValue::new(&mut state.settings.grid.size)
                .speed(0.1)
                .range(0.1..=100.0),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.grid_range"));
        ui.add(
            egui::DragValue::new(&mut state.settings.grid.range)
                .speed(1)
                .range(1..=50),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.grid_opacity"));
        ui.add(egui::Slider::new(&mut state.settings.grid.opacity, 0.0..=1.0));
    });
    ui.add_space(10.0);
}

fn show_viewport_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.viewport"));
    ui.horizontal(|ui| {
        ui.label(t("settings.bg_color"));
        let [r, g, b] = state.settings.viewport.background_color;
        let mut color = egui::Color32::from_rgb(r, g, b);
        if ui.color_edit_button_srgba(&mut color).changed() {
            state.settings.viewport.background_color = [color.r(), color.g(), color.b()];
        }
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.highlight"));
        let mut tint = state.settings.viewport.highlight_tint;
        if ui.color_edit_button_rgb(&mut tint).changed() {
            state.set_highlight_tint(tint);
        }
    });

    ui.checkbox(&mut state.settings.viewport.axes_visible, t("settings.axes_visible"));
    ui.checkbox(&mut state.settings.viewport.camera_info, t("settings.camera_info"));
    ui.add_space(10.0);
}

fn show_export_settings(ui: &mut egui::Ui, state: &mut AppState) {
    let export = &mut state.settings.export;
    ui.heading(t("settings.export"));

    ui.horizontal(|ui| {
        ui.label(t("settings.multiplier"));
        ui.add(
            egui::DragValue::new(&mut export.multiplier)
                .speed(0.1)
                .range(0.25..=8.0)
                .suffix("×"),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.hard_cap"));
        ui.add(
            egui::DragValue::new(&mut export.hard_cap)
                .speed(0.1)
                .range(1.0..=8.0),
        );
    });

    ui.horizontal(|ui| {
        ui.label(t("settings.output_dir"));
        ui.weak(export.resolved_output_dir().display().to_string());
        if ui.button(t("settings.browse")).clicked() {
            if let Some(dir) = rfd::FileDialog::new()
                .set_title(t("menu.export_dir_title"))
                .pick_folder()
            {
                export.output_dir = Some(dir);
            }
        }
    });
    ui.add_space(10.0);
}

fn show_ui_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.ui"));
    ui.horizontal(|ui| {
        ui.label(t("settings.font_size"));
        ui.add(
            egui::DragValue::new(&mut state.settings.ui.font_size)
                .speed(0.5)
                .range(8.0..=24.0)
                .suffix(" pt"),
        );
    });
    ui.add_space(10.0);
}

fn show_settings_buttons(ui: &mut egui::Ui, state: &mut AppState, viewport: &mut ViewportPanel) {
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button(t("settings.apply")).clicked() {
            viewport.configure_camera(&state.settings.camera);
            state.settings.save();
        }
        if ui.button(t("settings.reset")).clicked() {
            state.settings = AppSettings::default();
            let tint = state.settings.viewport.highlight_tint;
            state.set_highlight_tint(tint);
            viewport.configure_camera(&state.settings.camera);
        }
        if ui.button(t("settings.close")).clicked() {
            state.show_settings_window = false;
        }
    });
}
