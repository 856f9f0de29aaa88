//! Frame export: render one high-density frame and encode it as PNG.
//!
//! The density change is bracketed by [`DensityGuard`]: the frame is
//! rendered and read back while the guard is alive, and the original density
//! comes back when it drops, on success and on every error path. Encoding
//! happens afterwards and may run on another thread.

use std::fs;
use std::io::Cursor;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use chrono::{DateTime, Local};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::error::{Result, ViewerError};

/// Upper bound on export pixel density
pub const DEFAULT_HARD_CAP: f32 = 4.0;

/// Something that can render the current scene off-screen at an adjustable
/// pixel density and hand back the pixels.
pub trait FrameSurface {
    /// Native pixels per logical pixel of the display
    fn device_pixel_ratio(&self) -> f32;

    /// Density frames are currently rendered at
    fn pixel_density(&self) -> f32;

    fn set_pixel_density(&mut self, density: f32);

    /// Render exactly one frame at the current density without presenting it
    fn render_frame(&mut self) -> Result<()>;

    /// Read back the frame produced by the last `render_frame`
    fn capture(&mut self) -> Result<RgbaImage>;
}

/// Holds a surface at a temporary pixel density and restores the previous
/// density when dropped.
pub struct DensityGuard<'a, S: FrameSurface + ?Sized> {
    surface: &'a mut S,
    original: f32,
}

impl<'a, S: FrameSurface + ?Sized> DensityGuard<'a, S> {
    pub fn new(surface: &'a mut S, density: f32) -> Self {
        let original = surface.pixel_density();
        surface.set_pixel_density(density);
        Self { surface, original }
    }

    pub fn original(&self) -> f32 {
        self.original
    }
}

impl<S: FrameSurface + ?Sized> Deref for DensityGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: FrameSurface + ?Sized> DerefMut for DensityGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: FrameSurface + ?Sized> Drop for DensityGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.set_pixel_density(self.original);
    }
}

/// `min(multiplier * device_pixel_ratio, hard_cap)`, falling back to the
/// device ratio when the inputs don't give a usable density. An unusable
/// cap leaves the product uncapped.
pub fn export_density(multiplier: f32, device_pixel_ratio: f32, hard_cap: f32) -> f32 {
    let usable = |v: f32| v.is_finite() && v > 0.0;
    let density = multiplier * device_pixel_ratio;
    if usable(density) {
        if usable(hard_cap) {
            density.min(hard_cap)
        } else {
            density
        }
    } else if usable(device_pixel_ratio) {
        device_pixel_ratio
    } else {
        1.0
    }
}

/// A read-back frame waiting to be encoded
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub image: RgbaImage,
    /// Pixel density the frame was rendered at
    pub density: f32,
    pub captured_at: DateTime<Local>,
}

impl CapturedFrame {
    /// Timestamped output file name
    pub fn file_name(&self) -> String {
        self.captured_at
            .format("scene-%Y%m%d-%H%M%S-%3f.png")
            .to_string()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        PngEncoder::new(Cursor::new(&mut bytes)).write_image(
            self.image.as_raw(),
            self.image.width(),
            self.image.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(bytes)
    }

    /// Encode and write into `dir`, returning the file path
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let bytes = self.encode_png()?;
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, bytes)?;
        tracing::info!(
            "Exported {}x{} frame to {}",
            self.image.width(),
            self.image.height(),
            path.display()
        );
        Ok(path)
    }

    /// Encode and write on a worker thread. The result arrives on the
    /// returned channel.
    pub fn save_in_background(self, dir: PathBuf) -> mpsc::Receiver<Result<PathBuf>> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = self.save_to(&dir);
            if let Err(e) = &result {
                tracing::error!("Export failed: {e}");
            }
            // Receiver may be gone if the app closed meanwhile
            let _ = tx.send(result);
        });
        rx
    }
}

/// Render and read back one frame at the export density. The surface is
/// back at its original density when this returns, whatever the outcome.
pub fn capture_frame<S: FrameSurface + ?Sized>(
    surface: &mut S,
    multiplier: f32,
    hard_cap: f32,
) -> Result<CapturedFrame> {
    let density = export_density(multiplier, surface.device_pixel_ratio(), hard_cap);
    tracing::debug!("Capturing frame at density {density}");

    let mut guard = DensityGuard::new(surface, density);
    guard.render_frame()?;
    let image = guard.capture()?;
    drop(guard);

    if image.width() == 0 || image.height() == 0 {
        return Err(ViewerError::Capture("empty frame".into()));
    }

    Ok(CapturedFrame {
        image,
        density,
        captured_at: Local::now(),
    })
}

/// Capture, encode and save one frame into `dir`
pub fn export_frame<S: FrameSurface + ?Sized>(
    surface: &mut S,
    multiplier: f32,
    hard_cap: f32,
    dir: &Path,
) -> Result<PathBuf> {
    capture_frame(surface, multiplier, hard_cap)?.save_to(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Surface that records the density each frame was rendered at
    struct FakeSurface {
        dpr: f32,
        density: f32,
        rendered_at: Vec<f32>,
        fail_render: bool,
        fail_capture: bool,
    }

    impl FakeSurface {
        fn new(dpr: f32) -> Self {
            Self {
                dpr,
                density: dpr,
                rendered_at: Vec::new(),
                fail_render: false,
                fail_capture: false,
            }
        }
    }

    impl FrameSurface for FakeSurface {
        fn device_pixel_ratio(&self) -> f32 {
            self.dpr
        }

        fn pixel_density(&self) -> f32 {
            self.density
        }

        fn set_pixel_density(&mut self, density: f32) {
            self.density = density;
        }

        fn render_frame(&mut self) -> Result<()> {
            if self.fail_render {
                return Err(ViewerError::Capture("lost context".into()));
            }
            self.rendered_at.push(self.density);
            Ok(())
        }

        fn capture(&mut self) -> Result<RgbaImage> {
            if self.fail_capture {
                return Err(ViewerError::Capture("readback failed".into()));
            }
            let side = (10.0 * self.density) as u32;
            Ok(RgbaImage::from_pixel(side, side, Rgba([10, 20, 30, 255])))
        }
    }

    #[test]
    fn test_export_density_caps() {
        assert_eq!(export_density(2.0, 1.0, 4.0), 2.0);
        assert_eq!(export_density(2.0, 3.0, 4.0), 4.0);
        assert_eq!(export_density(f32::NAN, 1.5, 4.0), 1.5);
        assert_eq!(export_density(-1.0, 1.0, 4.0), 1.0);
    }

    #[test]
    fn test_export_density_unusable_inputs() {
        assert_eq!(export_density(f32::NAN, 2.0, 4.0), 2.0);
        assert_eq!(export_density(f32::INFINITY, 1.5, 4.0), 1.5);
        assert_eq!(export_density(2.0, f32::NAN, 4.0), 1.0);
        assert_eq!(export_density(2.0, 1.5, f32::NAN), 3.0);
        assert_eq!(export_density(2.0, 1.5, 0.0), 3.0);
        assert_eq!(export_density(2.0, 1.5, -1.0), 3.0);
    }

    #[test]
    fn test_capture_renders_once_at_export_density() {
        let mut surface = FakeSurface::new(1.5);
        let frame = capture_frame(&mut surface, 2.0, 4.0).unwrap();
        assert_eq!(surface.rendered_at, vec![3.0]);
        assert_eq!(frame.density, 3.0);
        assert_eq!(frame.image.width(), 30);
        assert_eq!(surface.pixel_density(), 1.5);
    }

    #[test]
    fn test_density_restored_on_render_failure() {
        let mut surface = FakeSurface::new(2.0);
        surface.set_pixel_density(1.25);
        surface.fail_render = true;
        assert!(capture_frame(&mut surface, 2.0, 4.0).is_err());
        assert_eq!(surface.pixel_density(), 1.25);
    }

    #[test]
    fn test_density_restored_on_capture_failure() {
        let mut surface = FakeSurface::new(1.0);
        surface.fail_capture = true;
        assert!(matches!(
            capture_frame(&mut surface, 2.0, 4.0),
            Err(ViewerError::Capture(_))
        ));
        assert_eq!(surface.pixel_density(), 1.0);
    }

    #[test]
    fn test_guard_restores_on_drop() {
        let mut surface = FakeSurface::new(1.0);
        {
            let guard = DensityGuard::new(&mut surface, 3.0);
            assert_eq!(guard.pixel_density(), 3.0);
            assert_eq!(guard.original(), 1.0);
        }
        assert_eq!(surface.pixel_density(), 1.0);
    }

    #[test]
    fn test_png_round_trip() {
        let mut surface = FakeSurface::new(1.0);
        let frame = capture_frame(&mut surface, 1.0, 4.0).unwrap();
        let bytes = frame.encode_png().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, frame.image);
    }

    #[test]
    fn test_file_name_is_timestamped() {
        let mut surface = FakeSurface::new(1.0);
        let frame = capture_frame(&mut surface, 1.0, 4.0).unwrap();
        let name = frame.file_name();
        assert!(name.starts_with("scene-"));
        assert!(name.ends_with(".png"));
        assert!(name.contains(&frame.captured_at.format("%Y%m%d").to_string()));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = FakeSurface::new(1.0);
        let path = export_frame(&mut surface, 2.0, 4.0, dir.path()).unwrap();
        assert!(path.exists());
        assert_eq!(path.parent(), Some(dir.path()));
    }

    #[test]
    fn test_write_failure_is_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();
        let mut surface = FakeSurface::new(1.0);
        let result = export_frame(&mut surface, 2.0, 4.0, &blocker);
        assert!(matches!(result, Err(ViewerError::Io(_))));
        assert_eq!(surface.pixel_density(), 1.0);
    }

    #[test]
    fn test_background_save_reports_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = FakeSurface::new(1.0);
        let frame = capture_frame(&mut surface, 1.0, 4.0).unwrap();
        let rx = frame.save_in_background(dir.path().to_path_buf());
        let path = rx.recv().unwrap().unwrap();
        assert!(path.exists());
    }
}
