//! 3D viewport panel with OpenGL rendering

mod fallback;
mod gl_renderer;
mod overlays;
mod surface;

pub use scene_viewer_lib::viewport::{camera, engine, input, mesh, raster};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::sync::{Arc, Mutex};

use egui::Ui;
use shared::ObjectId;

use crate::error::{Result, ViewerError};
use crate::export::CapturedFrame;
use crate::i18n::t;
use crate::state::settings::CameraSettings;
use crate::state::{AppState, ExportStatus};
use camera::CameraPose;
use engine::ViewportEngine;
use fallback::SoftwareView;
use gl_renderer::{GlRenderer, RenderParams};
use input::{Gesture, InputEvent, PointerButton};
use mesh::MeshData;
use surface::GlFrameSurface;

/// Frame read back inside a paint callback, picked up on the next update
type CaptureSlot = Arc<Mutex<Option<Result<CapturedFrame>>>>;

/// Export settings captured when the user asked for a frame
#[derive(Clone, Copy)]
struct ExportRequest {
    multiplier: f32,
    hard_cap: f32,
}

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    /// Created on the first frame with a usable rect
    engine: Option<ViewportEngine>,
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    software: SoftwareView,
    /// CPU meshes of visible objects, rebuilt when the registry version moves
    meshes: Arc<HashMap<ObjectId, MeshData>>,
    meshes_version: Option<u64>,
    export_request: Option<ExportRequest>,
    captured: CaptureSlot,
    saving: Option<mpsc::Receiver<Result<PathBuf>>>,
    /// Avoid repeating the same warning every frame
    surface_warned: bool,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            engine: None,
            gl_renderer: None,
            software: SoftwareView::default(),
            meshes: Arc::new(HashMap::new()),
            meshes_version: None,
            export_request: None,
            captured: Arc::new(Mutex::new(None)),
            saving: None,
            surface_warned: false,
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        match GlRenderer::new(gl) {
            Ok(renderer) => self.gl_renderer = Some(Arc::new(Mutex::new(renderer))),
            Err(e) => tracing::error!("GL renderer unavailable, using software view: {e}"),
        }
    }

    pub fn reset_camera(&mut self) {
        if let Some(engine) = &mut self.engine {
            engine.reset_camera();
        }
    }

    /// Orbit around the selected object
    pub fn focus_selected(&mut self, state: &AppState) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        if let Some(object) = state.get_selection().and_then(|id| state.scene.get(id)) {
            engine.focus_object(object);
        }
    }

    pub fn configure_camera(&mut self, settings: &CameraSettings) {
        if let Some(engine) = &mut self.engine {
            engine.configure(settings);
        }
    }

    pub fn camera_distance(&self) -> Option<f32> {
        self.engine.as_ref().map(|e| e.pose().radius())
    }

    /// Queue a PNG export of the next frame
    pub fn request_export(&mut self, state: &mut AppState) {
        if self.export_in_flight() {
            return;
        }
        self.export_request = Some(ExportRequest {
            multiplier: state.settings.export.multiplier,
            hard_cap: state.settings.export.hard_cap,
        });
        state.last_export = Some(ExportStatus::Pending);
    }

    pub fn export_in_flight(&self) -> bool {
        self.export_request.is_some() || self.saving.is_some()
    }

    /// Stop the engine and release GPU resources
    pub fn destroy(&mut self, gl: Option<&glow::Context>) {
        if let Some(engine) = &mut self.engine {
            engine.dispose();
        }
        if let (Some(gl), Some(renderer)) = (gl, &self.gl_renderer) {
            if let Ok(mut r) = renderer.lock() {
                r.destroy(gl);
            }
        }
        self.gl_renderer = None;
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        self.poll_export(ui.ctx(), state);

        let (rect, response) = ui.allocate_exact_size(
            ui.available_size(),
            egui::Sense::click_and_drag(),
        );

        if !self.ensure_engine(rect, &state.settings.camera) {
            overlays::draw_placeholder(&ui.painter_at(rect), rect, t("viewport.no_surface"));
            return;
        }
        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        // ── Input ────────────────────────────────────────────
        let hovered = response.hovered();
        let events = ui.input(|i| i.events.clone());
        for event in &events {
            if let Some(input) = to_input_event(event, rect, hovered) {
                engine.handle_event(input);
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let hit = engine.pick(&state.scene, pos);
                state.select(hit.as_deref());
            }
        }

        match engine.gesture() {
            Gesture::Rotating => ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing),
            Gesture::Panning => ui.ctx().set_cursor_icon(egui::CursorIcon::AllScroll),
            Gesture::Idle => {}
        }

        // ── Tick ─────────────────────────────────────────────
        let mut frame_pose = None;
        let moving = engine.tick(|pose| frame_pose = Some(pose.clone()));
        if moving || engine.gesture() != Gesture::Idle {
            ui.ctx().request_repaint();
        }
        let Some(pose) = frame_pose else {
            overlays::draw_placeholder(&ui.painter_at(rect), rect, t("viewport.no_surface"));
            return;
        };

        // ── Render ───────────────────────────────────────────
        if self.gl_renderer.is_some() {
            self.render_gl(ui, rect, state, &pose);
        } else {
            self.render_software(ui, rect, state, &pose);
        }

        self.draw_overlays(ui, rect, state, &pose);
    }

    /// Create or resize the engine. False when the rect can't host a viewport.
    fn ensure_engine(&mut self, rect: egui::Rect, settings: &CameraSettings) -> bool {
        let result = if let Some(engine) = &mut self.engine {
            engine.resize(rect)
        } else {
            ViewportEngine::new(rect, settings).map(|engine| self.engine = Some(engine))
        };
        match result {
            Ok(()) => {
                self.surface_warned = false;
                true
            }
            Err(e) => {
                if !self.surface_warned {
                    tracing::warn!("Viewport not rendered: {e}");
                    self.surface_warned = true;
                }
                false
            }
        }
    }

    fn sync_meshes(&mut self, state: &AppState) {
        let version = state.scene.version();
        if self.meshes_version == Some(version) {
            return;
        }
        let meshes: HashMap<ObjectId, MeshData> = state
            .scene
            .visible()
            .map(|object| (object.id.clone(), mesh::object_mesh(object)))
            .collect();
        self.meshes = Arc::new(meshes);
        self.meshes_version = Some(version);
    }

    fn render_gl(&mut self, ui: &mut Ui, rect: egui::Rect, state: &AppState, pose: &CameraPose) {
        let Some(gl_renderer) = &self.gl_renderer else {
            return;
        };
        let renderer_clone = gl_renderer.clone();

        self.sync_meshes(state);
        let meshes = self.meshes.clone();
        let version = self.meshes_version.unwrap_or_default();

        let grid_settings = state.settings.grid.clone();
        let base_params = RenderParams {
            viewport: [0.0; 4],
            grid_visible: grid_settings.visible,
            axes_visible: state.settings.viewport.axes_visible,
            bg_color: state.settings.viewport.background_color,
        };

        let pose = pose.clone();
        let export_request = self.export_request.take();
        if export_request.is_some() {
            ui.ctx().request_repaint();
        }
        let captured = self.captured.clone();
        let dpr = ui.ctx().pixels_per_point();
        let logical_size = rect.size();

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(eframe::egui_glow::CallbackFn::new(
                move |info, painter| {
                    let gl = painter.gl();

                    let clip = info.clip_rect_in_pixels();
                    let params = RenderParams {
                        viewport: [
                            clip.left_px as f32,
                            clip.from_bottom_px as f32,
                            clip.width_px as f32,
                            clip.height_px as f32,
                        ],
                        ..base_params
                    };

                    let Ok(mut r) = renderer_clone.lock() else {
                        return;
                    };
                    r.update_grid(gl, &grid_settings);
                    r.sync_from_meshes(gl, &meshes, version);
                    r.paint(gl, &pose, &params);

                    if let Some(request) = export_request {
                        let mut surface =
                            GlFrameSurface::new(gl, &r, &pose, base_params, logical_size, dpr);
                        let result = crate::export::capture_frame(
                            &mut surface,
                            request.multiplier,
                            request.hard_cap,
                        );
                        if let Ok(mut slot) = captured.lock() {
                            *slot = Some(result);
                        }
                    }
                },
            )),
        };

        ui.painter().add(callback);
    }

    fn render_software(
        &mut self,
        ui: &mut Ui,
        rect: egui::Rect,
        state: &AppState,
        pose: &CameraPose,
    ) {
        if let Err(e) = self.software.paint(ui, rect, pose, state) {
            tracing::warn!("Software view failed: {e}");
            overlays::draw_placeholder(&ui.painter_at(rect), rect, t("viewport.no_gl"));
        }

        if self.export_request.take().is_some() {
            ui.ctx().request_repaint();
            let dpr = ui.ctx().pixels_per_point();
            let result = self.software.capture(rect, dpr, pose, state);
            if let Ok(mut slot) = self.captured.lock() {
                *slot = Some(result);
            }
        }
    }

    fn draw_overlays(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState, pose: &CameraPose) {
        let painter = ui.painter_at(rect);

        if state.settings.viewport.axes_visible {
            overlays::draw_axis_labels(&painter, rect, pose);
        }
        if state.settings.viewport.camera_info {
            overlays::draw_camera_info(&painter, rect, pose);
        }
        if state.scene.is_empty() {
            overlays::draw_nav_hint(&painter, rect);
        }
    }

    /// Move a read-back frame to the encoder thread and collect finished saves
    fn poll_export(&mut self, ctx: &egui::Context, state: &mut AppState) {
        let captured = self.captured.lock().ok().and_then(|mut slot| slot.take());
        match captured {
            Some(Ok(frame)) => {
                let dir = state.settings.export.resolved_output_dir();
                tracing::info!(
                    "Captured {}x{} frame at density {}",
                    frame.image.width(),
                    frame.image.height(),
                    frame.density
                );
                self.saving = Some(frame.save_in_background(dir));
            }
            Some(Err(e)) => {
                tracing::error!("Frame capture failed: {e}");
                state.last_export = Some(ExportStatus::Failed(e.to_string()));
            }
            None => {}
        }

        if let Some(rx) = &self.saving {
            match rx.try_recv() {
                Ok(Ok(path)) => {
                    state.last_export = Some(ExportStatus::Saved(path));
                    self.saving = None;
                }
                Ok(Err(e)) => {
                    tracing::error!("Frame export failed: {e}");
                    state.last_export = Some(ExportStatus::Failed(e.to_string()));
                    self.saving = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    let e = ViewerError::Capture("encoder thread stopped".into());
                    state.last_export = Some(ExportStatus::Failed(e.to_string()));
                    self.saving = None;
                }
            }
        }

        if self.export_in_flight() {
            ctx.request_repaint();
        }
    }
}

/// Translate a raw egui event into viewport input. Presses only count
/// inside the viewport; moves and releases are tracked everywhere so a drag
/// that leaves the panel still ends cleanly.
fn to_input_event(event: &egui::Event, rect: egui::Rect, hovered: bool) -> Option<InputEvent> {
    match event {
        egui::Event::PointerButton {
            pos,
            button,
            pressed,
            ..
        } => {
            let button = match button {
                egui::PointerButton::Primary => PointerButton::Primary,
                egui::PointerButton::Middle => PointerButton::Middle,
                egui::PointerButton::Secondary => PointerButton::Secondary,
                _ => return None,
            };
            let inside = rect.contains(*pos);
            let pos = glam::Vec2::new(pos.x, pos.y);
            if *pressed {
                inside.then_some(InputEvent::PointerDown { button, pos })
            } else {
                Some(InputEvent::PointerUp { button, pos })
            }
        }
        egui::Event::PointerMoved(pos) => Some(InputEvent::PointerMove {
            pos: glam::Vec2::new(pos.x, pos.y),
        }),
        // egui reports scroll-up as positive; wheel input counts it negative
        egui::Event::MouseWheel { delta, .. } if hovered && delta.y != 0.0 => {
            Some(InputEvent::Wheel { delta_y: -delta.y })
        }
        _ => None,
    }
}
