//! Headless test harness for programmatic scene manipulation.
//!
//! Wires the application state to a viewport engine and a software
//! surface so the whole interaction path (input, camera ticks, picking,
//! selection, export) can be driven without a window.

use std::path::{Path, PathBuf};

use glam::Vec2;
use shared::{ObjectId, PrimitiveKind, SceneObject, Transform};

use crate::error::Result;
use crate::export;
use crate::state::scene::IdStrategy;
use crate::state::{AppSettings, AppState, ExportStatus};
use crate::viewport::engine::ViewportEngine;
use crate::viewport::input::{InputEvent, PointerButton};
use crate::viewport::picking::object_bounds;
use crate::viewport::raster::SoftwareSurface;

/// Logical size of the headless viewport
pub const HARNESS_WIDTH: f32 = 800.0;
pub const HARNESS_HEIGHT: f32 = 600.0;

/// Seed used unless the settings carry one
const HARNESS_SEED: u64 = 0x5EED;

/// Upper bound for `settle`
const MAX_SETTLE_TICKS: usize = 10_000;

/// Headless test harness: state, viewport engine and software surface
pub struct TestHarness {
    pub state: AppState,
    pub viewport: ViewportEngine,
    surface: SoftwareSurface,
}

impl TestHarness {
    /// Deterministic harness: sequential ids, fixed seed, default camera
    pub fn new() -> Self {
        let mut settings = AppSettings::default();
        settings.scene.id_strategy = IdStrategy::Sequential;
        Self::with_settings(settings)
    }

    pub fn with_settings(mut settings: AppSettings) -> Self {
        settings.scene.seed.get_or_insert(HARNESS_SEED);
        let rect = egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(HARNESS_WIDTH, HARNESS_HEIGHT),
        );
        let viewport = ViewportEngine::with_valid_rect(rect, &settings.camera);
        let mut surface = SoftwareSurface::with_valid_size(HARNESS_WIDTH, HARNESS_HEIGHT, 1.0);
        surface.set_background(settings.viewport.background_color);
        Self {
            state: AppState::new(settings),
            viewport,
            surface,
        }
    }

    /// Harness with a custom viewport size and device pixel ratio
    pub fn with_size(settings: AppSettings, width: f32, height: f32, dpr: f32) -> Result<Self> {
        let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(width, height));
        let viewport = ViewportEngine::new(rect, &settings.camera)?;
        let mut surface = SoftwareSurface::new(width, height, dpr)?;
        surface.set_background(settings.viewport.background_color);
        Ok(Self {
            state: AppState::new(settings),
            viewport,
            surface,
        })
    }

    // ── Scene manipulation ────────────────────────────────────

    pub fn add(&mut self, kind: PrimitiveKind) -> ObjectId {
        self.state.add_object(kind)
    }

    /// Add an object and move it to `position`
    pub fn add_at(&mut self, kind: PrimitiveKind, position: [f64; 3]) -> ObjectId {
        let id = self.state.add_object(kind);
        self.state.set_transform(&id, Transform::at(position));
        id
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.state.delete_object(id)
    }

    pub fn duplicate(&mut self, id: &str) -> Option<ObjectId> {
        self.state.duplicate_object(id)
    }

    pub fn hide(&mut self, id: &str) -> bool {
        self.state.set_visible(id, false)
    }

    pub fn show(&mut self, id: &str) -> bool {
        self.state.set_visible(id, true)
    }

    pub fn object(&self, id: &str) -> Option<&SceneObject> {
        self.state.scene.get(id)
    }

    pub fn objects(&self) -> &[SceneObject] {
        self.state.list_objects()
    }

    pub fn object_count(&self) -> usize {
        self.state.scene.len()
    }

    // ── Selection ─────────────────────────────────────────────

    pub fn select(&mut self, id: &str) -> Option<ObjectId> {
        self.state.select(Some(id))
    }

    pub fn clear_selection(&mut self) {
        self.state.select(None);
    }

    pub fn selection(&self) -> Option<&ObjectId> {
        self.state.get_selection()
    }

    /// Number of objects currently showing a highlight
    pub fn highlighted_count(&self) -> usize {
        self.objects()
            .iter()
            .filter(|o| o.material.is_highlighted())
            .count()
    }

    // ── Input ─────────────────────────────────────────────────

    pub fn pointer_down(&mut self, button: PointerButton, x: f32, y: f32) {
        self.viewport.handle_event(InputEvent::PointerDown {
            button,
            pos: Vec2::new(x, y),
        });
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.viewport
            .handle_event(InputEvent::PointerMove { pos: Vec2::new(x, y) });
    }

    pub fn pointer_up(&mut self, button: PointerButton, x: f32, y: f32) {
        self.viewport.handle_event(InputEvent::PointerUp {
            button,
            pos: Vec2::new(x, y),
        });
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.viewport.handle_event(InputEvent::Wheel { delta_y });
    }

    /// Press, move and release in one go
    pub fn drag(&mut self, button: PointerButton, from: (f32, f32), to: (f32, f32)) {
        self.pointer_down(button, from.0, from.1);
        self.pointer_move(to.0, to.1);
        self.pointer_up(button, to.0, to.1);
    }

    // ── Render loop ───────────────────────────────────────────

    /// One render tick. Returns true while the camera is still moving.
    pub fn tick(&mut self) -> bool {
        let surface = &mut self.surface;
        let objects = self.state.scene.objects();
        self.viewport.tick(|pose| surface.prepare(pose, objects))
    }

    /// Tick until the camera comes to rest; returns the number of ticks
    pub fn settle(&mut self) -> usize {
        let mut ticks = 0;
        while ticks < MAX_SETTLE_TICKS {
            ticks += 1;
            if !self.tick() {
                break;
            }
        }
        ticks
    }

    pub fn camera_radius(&self) -> f32 {
        self.viewport.pose().radius()
    }

    // ── Picking ───────────────────────────────────────────────

    pub fn pick_at(&self, x: f32, y: f32) -> Option<ObjectId> {
        self.viewport.pick(&self.state.scene, egui::pos2(x, y))
    }

    /// Pick and select what is under the point (or clear on a miss)
    pub fn click(&mut self, x: f32, y: f32) -> Option<ObjectId> {
        let hit = self.pick_at(x, y);
        self.state.select(hit.as_deref())
    }

    /// Screen position of an object's bounding-box center
    pub fn screen_point_of(&self, id: &str) -> Option<(f32, f32)> {
        let object = self.state.scene.get(id)?;
        let p = self
            .viewport
            .pose()
            .project(object_bounds(object).center(), self.viewport.rect())?;
        Some((p.x, p.y))
    }

    // ── Export ────────────────────────────────────────────────

    pub fn surface(&self) -> &SoftwareSurface {
        &self.surface
    }

    /// Export the current view into `dir` with the configured multiplier
    pub fn export_frame(&mut self, dir: &Path) -> Result<PathBuf> {
        let multiplier = self.state.settings.export.multiplier;
        self.export_frame_with(dir, multiplier)
    }

    pub fn export_frame_with(&mut self, dir: &Path, multiplier: f32) -> Result<PathBuf> {
        let hard_cap = self.state.settings.export.hard_cap;
        self.surface
            .prepare(self.viewport.pose(), self.state.scene.objects());
        let result = export::export_frame(&mut self.surface, multiplier, hard_cap, dir);
        self.state.last_export = Some(match &result {
            Ok(path) => ExportStatus::Saved(path.clone()),
            Err(e) => ExportStatus::Failed(e.to_string()),
        });
        result
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_harness_empty() {
        let h = TestHarness::new();
        assert_eq!(h.object_count(), 0);
        assert!(h.selection().is_none());
    }

    #[test]
    fn test_add_every_kind() {
        let mut h = TestHarness::new();
        for &kind in PrimitiveKind::all() {
            h.add(kind);
        }
        assert_eq!(h.object_count(), PrimitiveKind::all().len());
        assert_eq!(h.objects()[0].id, "obj-1");
    }

    #[test]
    fn test_same_seed_same_scene() {
        let mut a = TestHarness::new();
        let mut b = TestHarness::new();
        a.add(PrimitiveKind::Cone);
        b.add(PrimitiveKind::Cone);
        assert_eq!(a.objects(), b.objects());
    }

    #[test]
    fn test_click_selects_and_misses_clear() {
        let mut h = TestHarness::new();
        let id = h.add_at(PrimitiveKind::Cube, [0.0, 0.0, 0.0]);
        let (x, y) = h.screen_point_of(&id).unwrap();
        assert_eq!(h.click(x, y), Some(id.clone()));
        assert_eq!(h.highlighted_count(), 1);

        assert_eq!(h.click(2.0, 2.0), None);
        assert!(h.selection().is_none());
        assert_eq!(h.highlighted_count(), 0);
    }

    #[test]
    fn test_wheel_zooms_after_tick() {
        let mut h = TestHarness::new();
        let before = h.camera_radius();
        h.wheel(-1.0);
        h.settle();
        assert!(h.camera_radius() < before);
    }

    #[test]
    fn test_tick_counts_frames() {
        let mut h = TestHarness::new();
        h.tick();
        h.tick();
        assert_eq!(h.viewport.frames(), 2);
    }

    #[test]
    fn test_with_size_rejects_empty_surface() {
        assert!(TestHarness::with_size(AppSettings::default(), 0.0, 10.0, 1.0).is_err());
    }
}
