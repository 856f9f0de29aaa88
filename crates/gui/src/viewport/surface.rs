//! Off-screen GL target used for frame export.

use glow::HasContext;
use image::RgbaImage;

use super::camera::CameraPose;
use super::gl_renderer::{GlRenderer, RenderParams};
use crate::error::{Result, ViewerError};
use crate::export::FrameSurface;

/// Renders the scene into a throwaway framebuffer sized `logical size *
/// pixel density` and reads it back. Lives only for the duration of one
/// paint callback, so the screen framebuffer is never resized.
pub struct GlFrameSurface<'a> {
    gl: &'a glow::Context,
    renderer: &'a GlRenderer,
    pose: &'a CameraPose,
    params: RenderParams,
    logical_size: egui::Vec2,
    device_pixel_ratio: f32,
    density: f32,
    frame: Option<RgbaImage>,
}

impl<'a> GlFrameSurface<'a> {
    pub fn new(
        gl: &'a glow::Context,
        renderer: &'a GlRenderer,
        pose: &'a CameraPose,
        params: RenderParams,
        logical_size: egui::Vec2,
        device_pixel_ratio: f32,
    ) -> Self {
        Self {
            gl,
            renderer,
            pose,
            params,
            logical_size,
            device_pixel_ratio,
            density: device_pixel_ratio,
            frame: None,
        }
    }

    fn pixel_size(&self) -> (u32, u32) {
        let max_edge = unsafe { self.gl.get_parameter_i32(glow::MAX_RENDERBUFFER_SIZE) }.max(1) as u32;
        let edge = |v: f32| ((v * self.density).round() as u32).clamp(1, max_edge);
        (edge(self.logical_size.x), edge(self.logical_size.y))
    }
}

/// Creation and deletion of the GL objects behind an off-screen target
trait TargetAllocator {
    type Framebuffer: Copy;
    type Renderbuffer: Copy;

    fn new_framebuffer(&self) -> std::result::Result<Self::Framebuffer, String>;
    fn new_renderbuffer(&self) -> std::result::Result<Self::Renderbuffer, String>;
    fn free_framebuffer(&self, fbo: Self::Framebuffer);
    fn free_renderbuffer(&self, rbo: Self::Renderbuffer);
}

impl TargetAllocator for glow::Context {
    type Framebuffer = glow::Framebuffer;
    type Renderbuffer = glow::Renderbuffer;

    fn new_framebuffer(&self) -> std::result::Result<glow::Framebuffer, String> {
        unsafe { self.create_framebuffer() }
    }

    fn new_renderbuffer(&self) -> std::result::Result<glow::Renderbuffer, String> {
        unsafe { self.create_renderbuffer() }
    }

    fn free_framebuffer(&self, fbo: glow::Framebuffer) {
        unsafe { self.delete_framebuffer(fbo) }
    }

    fn free_renderbuffer(&self, rbo: glow::Renderbuffer) {
        unsafe { self.delete_renderbuffer(rbo) }
    }
}

/// Framebuffer with color and depth renderbuffers. Either all three
/// objects exist or none do.
struct OffscreenTarget<A: TargetAllocator> {
    fbo: A::Framebuffer,
    color: A::Renderbuffer,
    depth: A::Renderbuffer,
}

impl<A: TargetAllocator> OffscreenTarget<A> {
    fn create(alloc: &A) -> Result<Self> {
        let fbo = alloc.new_framebuffer().map_err(ViewerError::Capture)?;
        let color = match alloc.new_renderbuffer() {
            Ok(color) => color,
            Err(e) => {
                alloc.free_framebuffer(fbo);
                return Err(ViewerError::Capture(e));
            }
        };
        let depth = match alloc.new_renderbuffer() {
            Ok(depth) => depth,
            Err(e) => {
                alloc.free_renderbuffer(color);
                alloc.free_framebuffer(fbo);
                return Err(ViewerError::Capture(e));
            }
        };
        Ok(Self { fbo, color, depth })
    }

    fn delete(self, alloc: &A) {
        alloc.free_framebuffer(self.fbo);
        alloc.free_renderbuffer(self.color);
        alloc.free_renderbuffer(self.depth);
    }
}

impl FrameSurface for GlFrameSurface<'_> {
    fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    fn pixel_density(&self) -> f32 {
        self.density
    }

    fn set_pixel_density(&mut self, density: f32) {
        if density.is_finite() && density > 0.0 {
            self.density = density;
        }
    }

    fn render_frame(&mut self) -> Result<()> {
        let (width, height) = self.pixel_size();
        let gl = self.gl;
        let target = OffscreenTarget::create(gl)?;
        let (fbo, color, depth) = (target.fbo, target.color, target.depth);

        unsafe {
            let previous = gl.get_parameter_framebuffer(glow::FRAMEBUFFER_BINDING);

            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));

            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(color));
            gl.renderbuffer_storage(glow::RENDERBUFFER, glow::RGBA8, width as i32, height as i32);
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::RENDERBUFFER,
                Some(color),
            );

            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(depth));
            gl.renderbuffer_storage(
                glow::RENDERBUFFER,
                glow::DEPTH_COMPONENT24,
                width as i32,
                height as i32,
            );
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(depth),
            );
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);

            let result = if gl.check_framebuffer_status(glow::FRAMEBUFFER)
                == glow::FRAMEBUFFER_COMPLETE
            {
                self.renderer
                    .paint(gl, self.pose, &self.params.full_target(width, height));

                let mut pixels = vec![0u8; width as usize * height as usize * 4];
                gl.pixel_store_i32(glow::PACK_ALIGNMENT, 1);
                gl.read_pixels(
                    0,
                    0,
                    width as i32,
                    height as i32,
                    glow::RGBA,
                    glow::UNSIGNED_BYTE,
                    glow::PixelPackData::Slice(Some(&mut pixels)),
                );
                RgbaImage::from_raw(width, height, pixels)
                    .ok_or_else(|| ViewerError::Capture("pixel buffer size mismatch".into()))
            } else {
                Err(ViewerError::Capture(format!(
                    "incomplete framebuffer at {width}x{height}"
                )))
            };

            gl.bind_framebuffer(glow::FRAMEBUFFER, previous);
            target.delete(gl);

            // GL rows start at the bottom
            let mut image = result?;
            image::imageops::flip_vertical_in_place(&mut image);
            self.frame = Some(image);
        }
        Ok(())
    }

    fn capture(&mut self) -> Result<RgbaImage> {
        self.frame
            .take()
            .ok_or_else(|| ViewerError::Capture("no frame rendered".into()))
    }
}
