//! Viewport engine: input routing, camera rig and render loop behind one
//! owner with an explicit teardown.

use glam::Vec3;
use shared::{ObjectId, SceneObject};

use super::camera::{CameraPose, CameraRig};
use super::input::{Gesture, InputEffect, InputEvent, InputStateMachine};
use super::picking::{self, object_bounds};
use super::render_loop::{LoopState, RenderLoop};
use crate::error::{Result, ViewerError};
use crate::state::scene::SceneRegistry;
use crate::state::settings::CameraSettings;

pub struct ViewportEngine {
    rect: egui::Rect,
    rig: CameraRig,
    input: InputStateMachine,
    render_loop: RenderLoop,
}

fn validate(rect: egui::Rect) -> Result<()> {
    let (width, height) = (rect.width(), rect.height());
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(ViewerError::InvalidSurface { width, height })
    }
}

impl ViewportEngine {
    /// Set up for a surface covering `rect`. Fails without side effects when
    /// the surface has no usable area.
    pub fn new(rect: egui::Rect, settings: &CameraSettings) -> Result<Self> {
        validate(rect)?;
        Ok(Self::with_valid_rect(rect, settings))
    }

    /// Caller guarantees `rect` has a positive finite size
    pub(crate) fn with_valid_rect(rect: egui::Rect, settings: &CameraSettings) -> Self {
        let mut render_loop = RenderLoop::new();
        render_loop.start();
        tracing::debug!("Viewport engine ready at {}x{}", rect.width(), rect.height());
        Self {
            rect,
            rig: CameraRig::new(settings),
            input: InputStateMachine::new(settings.zoom_step),
            render_loop,
        }
    }

    pub fn rect(&self) -> egui::Rect {
        self.rect
    }

    /// Track a moved or resized surface. An unusable rect is rejected and
    /// the previous one kept.
    pub fn resize(&mut self, rect: egui::Rect) -> Result<()> {
        validate(rect)?;
        self.rect = rect;
        Ok(())
    }

    pub fn pose(&self) -> &CameraPose {
        self.rig.pose()
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn gesture(&self) -> Gesture {
        self.input.gesture()
    }

    pub fn frames(&self) -> u64 {
        self.render_loop.frames()
    }

    pub fn is_disposed(&self) -> bool {
        self.render_loop.state() == LoopState::Disposed
    }

    /// Route one input event into the camera accumulator
    pub fn handle_event(&mut self, event: InputEvent) -> InputEffect {
        if self.is_disposed() {
            return InputEffect::None;
        }
        let effect = self.input.handle(event);
        tracing::trace!(?event, ?effect, "viewport input");
        self.rig.feed(effect, self.rect.height());
        effect
    }

    /// One render tick. Returns true while the camera is still settling.
    pub fn tick<F>(&mut self, draw: F) -> bool
    where
        F: FnOnce(&CameraPose),
    {
        self.render_loop.tick(&mut self.rig, self.rect.height(), draw)
    }

    /// Object under a screen point
    pub fn pick(&self, scene: &SceneRegistry, screen_point: egui::Pos2) -> Option<ObjectId> {
        picking::pick(self.rig.pose(), scene, screen_point, self.rect)
    }

    pub fn focus_on(&mut self, point: Vec3) {
        self.rig.focus_on(point);
    }

    /// Center the orbit on an object's bounding box
    pub fn focus_object(&mut self, object: &SceneObject) {
        self.rig.focus_on(object_bounds(object).center());
    }

    pub fn reset_camera(&mut self) {
        self.rig.reset();
    }

    pub fn configure(&mut self, settings: &CameraSettings) {
        self.rig.configure(settings);
        self.input = InputStateMachine::new(settings.zoom_step);
        if self.is_disposed() {
            self.input.detach();
        }
    }

    /// Stop the loop and detach input. Ticks and events are ignored from
    /// here on. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.render_loop.dispose();
        self.input.detach();
        tracing::info!("Viewport disposed after {} frames", self.render_loop.frames());
    }
}

impl Drop for ViewportEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::input::PointerButton;
    use glam::Vec2;

    fn rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0))
    }

    #[test]
    fn test_invalid_surface_rejected() {
        let empty = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(0.0, 600.0));
        assert!(matches!(
            ViewportEngine::new(empty, &CameraSettings::default()),
            Err(ViewerError::InvalidSurface { .. })
        ));
        let nan = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(f32::NAN, 1.0));
        assert!(ViewportEngine::new(nan, &CameraSettings::default()).is_err());
    }

    #[test]
    fn test_bad_resize_keeps_rect() {
        let mut engine = ViewportEngine::new(rect(), &CameraSettings::default()).unwrap();
        let flat = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 0.0));
        assert!(engine.resize(flat).is_err());
        assert_eq!(engine.rect(), rect());
    }

    #[test]
    fn test_drag_then_tick_moves_camera() {
        let settings = CameraSettings {
            damping_enabled: false,
            ..Default::default()
        };
        let mut engine = ViewportEngine::new(rect(), &settings).unwrap();
        let before = engine.pose().position;
        engine.handle_event(InputEvent::PointerDown {
            button: PointerButton::Primary,
            pos: Vec2::new(100.0, 100.0),
        });
        engine.handle_event(InputEvent::PointerMove {
            pos: Vec2::new(160.0, 100.0),
        });
        assert!(!engine.tick(|_| {}));
        assert!((engine.pose().position - before).length() > 0.1);
        assert_eq!(engine.frames(), 1);
    }

    #[test]
    fn test_dispose_ignores_events_and_ticks() {
        let mut engine = ViewportEngine::new(rect(), &CameraSettings::default()).unwrap();
        engine.dispose();
        engine.dispose();
        assert!(engine.is_disposed());
        let effect = engine.handle_event(InputEvent::Wheel { delta_y: -1.0 });
        assert_eq!(effect, InputEffect::None);
        assert!(engine.rig().is_settled());
        let mut drew = false;
        engine.tick(|_| drew = true);
        assert!(!drew);
    }
}
