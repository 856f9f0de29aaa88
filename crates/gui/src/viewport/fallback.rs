//! CPU-rendered viewport for when no GL context is available.

use egui::{Rect, TextureHandle, TextureOptions, Ui};

use super::camera::CameraPose;
use super::raster::SoftwareSurface;
use crate::error::Result;
use crate::export::{self, CapturedFrame, FrameSurface};
use crate::state::AppState;

/// What the current texture was rendered from
#[derive(PartialEq)]
struct FrameStamp {
    pose: CameraPose,
    scene_version: u64,
    background: [u8; 3],
}

#[derive(Default)]
pub struct SoftwareView {
    surface: Option<SoftwareSurface>,
    /// Logical size and pixels-per-point the surface was built for
    built_for: Option<(egui::Vec2, f32)>,
    texture: Option<TextureHandle>,
    drawn: Option<FrameStamp>,
}

impl SoftwareView {
    fn surface_for(&mut self, rect: Rect, dpr: f32) -> Result<&mut SoftwareSurface> {
        let key = (rect.size(), dpr);
        let surface = match self.surface.take() {
            Some(surface) if self.built_for == Some(key) => surface,
            _ => {
                let surface = SoftwareSurface::new(rect.width(), rect.height(), dpr)?;
                self.built_for = Some(key);
                self.drawn = None;
                surface
            }
        };
        Ok(self.surface.insert(surface))
    }

    /// Rasterize when the camera or the scene changed, then blit the texture
    pub fn paint(&mut self, ui: &Ui, rect: Rect, pose: &CameraPose, state: &AppState) -> Result<()> {
        let dpr = ui.ctx().pixels_per_point();
        let stamp = FrameStamp {
            pose: pose.clone(),
            scene_version: state.scene.version(),
            background: state.settings.viewport.background_color,
        };

        let stale = self.surface.is_none() || self.built_for != Some((rect.size(), dpr));
        if stale || self.drawn.as_ref() != Some(&stamp) {
            let surface = self.surface_for(rect, dpr)?;
            surface.set_background(stamp.background);
            surface.prepare(pose, state.scene.objects());
            surface.render_frame()?;
            let image = surface.capture()?;

            let size = [image.width() as usize, image.height() as usize];
            let color = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
            match &mut self.texture {
                Some(texture) => texture.set(color, TextureOptions::LINEAR),
                None => {
                    self.texture =
                        Some(ui.ctx().load_texture("software_viewport", color, TextureOptions::LINEAR));
                }
            }
            self.drawn = Some(stamp);
        }

        if let Some(texture) = &self.texture {
            ui.painter().image(
                texture.id(),
                rect,
                Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        Ok(())
    }

    /// Capture the current view at export density
    pub fn capture(
        &mut self,
        rect: Rect,
        dpr: f32,
        pose: &CameraPose,
        state: &AppState,
    ) -> Result<CapturedFrame> {
        let export_settings = &state.settings.export;
        let surface = self.surface_for(rect, dpr)?;
        surface.set_background(state.settings.viewport.background_color);
        surface.prepare(pose, state.scene.objects());
        export::capture_frame(surface, export_settings.multiplier, export_settings.hard_cap)
    }
}
