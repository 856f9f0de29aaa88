//! CPU rasterizer implementing [`FrameSurface`] for headless rendering.

use glam::{Vec3, Vec4};
use image::{Rgba, RgbaImage};
use shared::SceneObject;

use super::camera::CameraPose;
use super::mesh::{self, MeshData};
use crate::error::{Result, ViewerError};
use crate::export::FrameSurface;

/// Largest frame edge in pixels
const MAX_EDGE: u32 = 8192;

/// Depth-buffered, flat-shaded triangle rasterizer.
///
/// `prepare` records what to draw; `render_frame` rasterizes it into an
/// off-screen buffer sized `logical size * pixel density`.
pub struct SoftwareSurface {
    width: f32,
    height: f32,
    device_pixel_ratio: f32,
    density: f32,
    background: [u8; 3],
    pose: CameraPose,
    objects: Vec<SceneObject>,
    frame: Option<RgbaImage>,
    frames_rendered: u64,
}

impl SoftwareSurface {
    /// Surface of `width` x `height` logical pixels
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Result<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !(valid(width) && valid(height)) {
            return Err(ViewerError::InvalidSurface { width, height });
        }
        Ok(Self::with_valid_size(width, height, device_pixel_ratio))
    }

    /// Caller guarantees a positive finite size
    pub(crate) fn with_valid_size(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            width,
            height,
            device_pixel_ratio,
            density: device_pixel_ratio,
            background: [30, 30, 35],
            pose: CameraPose::default(),
            objects: Vec::new(),
            frame: None,
            frames_rendered: 0,
        }
    }

    pub fn set_background(&mut self, color: [u8; 3]) {
        self.background = color;
    }

    /// Record the camera and the objects for the next frame. Hidden
    /// objects are dropped here.
    pub fn prepare<'a>(
        &mut self,
        pose: &CameraPose,
        objects: impl IntoIterator<Item = &'a SceneObject>,
    ) {
        self.pose = pose.clone();
        self.objects = objects.into_iter().filter(|o| o.visible).cloned().collect();
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Pixel size of a frame at the current density
    pub fn pixel_size(&self) -> (u32, u32) {
        let edge = |v: f32| ((v * self.density).round() as u32).clamp(1, MAX_EDGE);
        (edge(self.width), edge(self.height))
    }

    fn rasterize(&self) -> RgbaImage {
        let (w, h) = self.pixel_size();
        let [r, g, b] = self.background;
        let mut image = RgbaImage::from_pixel(w, h, Rgba([r, g, b, 255]));
        let mut depth = vec![f32::INFINITY; (w * h) as usize];

        let vp = self.pose.view_projection(w as f32 / h as f32);
        let light = (self.pose.position - self.pose.target).normalize_or_zero();

        for object in &self.objects {
            let mesh = mesh::object_mesh(object);
            draw_mesh(&mesh, vp, light, &mut image, &mut depth);
        }
        image
    }
}

fn draw_mesh(mesh: &MeshData, vp: glam::Mat4, light: Vec3, image: &mut RgbaImage, depth: &mut [f32]) {
    let (w, h) = image.dimensions();
    let (wf, hf) = (w as f32, h as f32);

    for tri in mesh.indices.chunks_exact(3) {
        let world = [
            mesh.position(tri[0] as usize),
            mesh.position(tri[1] as usize),
            mesh.position(tri[2] as usize),
        ];

        let mut screen = [Vec3::ZERO; 3];
        let mut clipped = false;
        for (s, p) in screen.iter_mut().zip(world) {
            let clip = vp * Vec4::new(p.x, p.y, p.z, 1.0);
            // Triangles crossing the near plane are dropped whole
            if clip.w <= 1e-4 {
                clipped = true;
                break;
            }
            let ndc = clip.truncate() / clip.w;
            *s = Vec3::new((ndc.x + 1.0) * 0.5 * wf, (1.0 - ndc.y) * 0.5 * hf, ndc.z);
        }
        if clipped {
            continue;
        }

        let area = edge(screen[0], screen[1], screen[2]);
        if area.abs() < 1e-8 {
            continue;
        }

        // Two-sided headlight shading
        let normal = (world[1] - world[0]).cross(world[2] - world[0]).normalize_or_zero();
        let intensity = 0.3 + 0.7 * normal.dot(light).abs();
        let base = tri[0] as usize * 9 + 6;
        let c = &mesh.vertices[base..base + 3];
        let color = Rgba([
            channel(c[0] * intensity),
            channel(c[1] * intensity),
            channel(c[2] * intensity),
            255,
        ]);

        let min_x = screen.iter().map(|p| p.x).fold(f32::MAX, f32::min).floor().max(0.0) as u32;
        let max_x = screen.iter().map(|p| p.x).fold(f32::MIN, f32::max).ceil().min(wf - 1.0);
        let min_y = screen.iter().map(|p| p.y).fold(f32::MAX, f32::min).floor().max(0.0) as u32;
        let max_y = screen.iter().map(|p| p.y).fold(f32::MIN, f32::max).ceil().min(hf - 1.0);
        if max_x < 0.0 || max_y < 0.0 {
            continue;
        }

        for y in min_y..=max_y as u32 {
            for x in min_x..=max_x as u32 {
                let p = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);
                let w0 = edge(screen[1], screen[2], p) / area;
                let w1 = edge(screen[2], screen[0], p) / area;
                let w2 = edge(screen[0], screen[1], p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let z = w0 * screen[0].z + w1 * screen[1].z + w2 * screen[2].z;
                if !(-1.0..=1.0).contains(&z) {
                    continue;
                }
                let idx = (y * w + x) as usize;
                if z < depth[idx] {
                    depth[idx] = z;
                    image.put_pixel(x, y, color);
                }
            }
        }
    }
}

fn edge(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl FrameSurface for SoftwareSurface {
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
        self.frame = Some(self.rasterize());
        self.frames_rendered += 1;
        Ok(())
    }

    fn capture(&mut self) -> Result<RgbaImage> {
        self.frame
            .take()
            .ok_or_else(|| ViewerError::Capture("no frame rendered".into()))
    }
}
