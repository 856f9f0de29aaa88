//! Main application module

mod keyboard;
mod menus;
mod styles;

use std::path::PathBuf;

use eframe::egui;

use crate::i18n::{set_lang, Lang};
use crate::state::{AppSettings, AppState};
use crate::ui::{scene_list, status_bar, toolbar};
use crate::viewport::ViewportPanel;

/// Command-line overrides applied on top of the saved settings
#[derive(Debug, Default)]
pub struct LaunchOptions {
    pub seed: Option<u64>,
    pub export_dir: Option<PathBuf>,
}

/// Main application
pub struct ViewerApp {
    state: AppState,
    viewport: ViewportPanel,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let mut settings = AppSettings::load();
        if let Some(seed) = options.seed {
            settings.scene.seed = Some(seed);
        }
        if let Some(dir) = options.export_dir {
            settings.export.output_dir = Some(dir);
        }

        set_lang(Lang::from_code(&settings.ui.language));
        styles::configure_styles(&cc.egui_ctx, settings.ui.font_size);

        let mut viewport = ViewportPanel::new();

        // Initialize GL renderer if glow context is available
        match cc.gl.as_ref() {
            Some(gl) => viewport.init_gl(gl),
            None => tracing::warn!("No GL context, viewport falls back to software rendering"),
        }

        let last_font_size = settings.ui.font_size;
        tracing::info!(
            "Viewer started (ids: {:?}, seed: {:?})",
            settings.scene.id_strategy,
            settings.scene.seed
        );

        Self {
            state: AppState::new(settings),
            viewport,
            last_font_size,
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        keyboard::handle_keyboard(ctx, &mut self.state, &mut self.viewport);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.state, &mut self.viewport);
                menus::edit_menu(ui, &mut self.state);
                menus::view_menu(ui, &mut self.state, &mut self.viewport);
                menus::create_menu(ui, &mut self.state);
                menus::settings_menu(ui, &mut self.state);
            });
        });

        // ── Settings window ──────────────────────────────────
        menus::settings_window(ctx, &mut self.state, &mut self.viewport);

        // ── Toolbar ───────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                toolbar::show(ui, &mut self.state, &mut self.viewport);
            });

        // ── Status bar ───────────────────────────────────────
        if self.state.panels.status_bar {
            egui::TopBottomPanel::bottom("status_bar")
                .exact_height(22.0)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style())
                        .inner_margin(egui::Margin::symmetric(8, 2)),
                )
                .show(ctx, |ui| {
                    status_bar::show(ui, &self.state, self.viewport.camera_distance());
                });
        }

        // ── Left panel: object list ──────────────────────────
        if self.state.panels.scene_list {
            egui::SidePanel::left("scene_list")
                .default_width(230.0)
                .width_range(160.0..=420.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    scene_list::show(ui, &mut self.state, &mut self.viewport);
                });
        }

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state);
            });
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        self.viewport.destroy(gl);
        tracing::info!("Viewer closed with {} objects", self.state.scene.len());
    }
}
