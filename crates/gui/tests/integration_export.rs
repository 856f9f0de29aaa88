//! Frame export through the software surface.

use scene_viewer_lib::export::FrameSurface;
use scene_viewer_lib::harness::TestHarness;
use scene_viewer_lib::state::{AppSettings, ExportStatus};
use shared::PrimitiveKind;
use tempfile::TempDir;

fn harness(width: f32, height: f32, dpr: f32) -> TestHarness {
    let mut settings = AppSettings::default();
    settings.scene.seed = Some(7);
    TestHarness::with_size(settings, width, height, dpr).expect("valid surface")
}

#[test]
fn test_export_renders_at_multiplied_density() {
    let dir = TempDir::new().unwrap();
    let mut h = harness(200.0, 150.0, 1.5);
    h.add_at(PrimitiveKind::Cube, [0.0, 0.0, 0.0]);

    let path = h.export_frame_with(dir.path(), 2.0).expect("export");

    assert!(path.starts_with(dir.path()));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
    let image = image::open(&path).unwrap();
    assert_eq!((image.width(), image.height()), (600, 450));

    assert_eq!(h.surface().pixel_density(), 1.5);
    assert_eq!(h.state.last_export, Some(ExportStatus::Saved(path)));
}

#[test]
fn test_export_density_is_capped() {
    let dir = TempDir::new().unwrap();
    let mut h = harness(100.0, 50.0, 2.0);
    h.state.settings.export.multiplier = 3.0;
    h.state.settings.export.hard_cap = 4.0;

    let path = h.export_frame(dir.path()).expect("export");

    let image = image::open(&path).unwrap();
    assert_eq!((image.width(), image.height()), (400, 200));
    assert_eq!(h.surface().pixel_density(), 2.0);
}

#[test]
fn test_export_creates_missing_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("frames").join("today");
    let mut h = harness(64.0, 64.0, 1.0);

    let path = h.export_frame_with(&nested, 1.0).expect("export");
    assert!(path.starts_with(&nested));
    assert!(path.is_file());
}

#[test]
fn test_failed_export_restores_density() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"occupied").unwrap();
    let mut h = harness(120.0, 90.0, 1.25);

    let result = h.export_frame_with(&blocker, 2.0);

    assert!(result.is_err());
    assert_eq!(h.surface().pixel_density(), 1.25);
    assert!(matches!(h.state.last_export, Some(ExportStatus::Failed(_))));
}

#[test]
fn test_export_shows_selected_highlight() {
    let dir = TempDir::new().unwrap();
    let mut h = harness(160.0, 120.0, 1.0);
    let id = h.add_at(PrimitiveKind::Cube, [0.0, 0.0, 0.0]);
    h.state.set_color(&id, [0.4, 0.4, 0.4]);

    let plain = image::open(h.export_frame_with(&dir.path().join("plain"), 1.0).unwrap())
        .unwrap()
        .to_rgba8();
    h.select(&id);
    let lit = image::open(h.export_frame_with(&dir.path().join("lit"), 1.0).unwrap())
        .unwrap()
        .to_rgba8();

    let center = (80, 60);
    let before = plain.get_pixel(center.0, center.1);
    let after = lit.get_pixel(center.0, center.1);
    assert_ne!(before, after);
    // Selection never touches the camera
    assert_eq!(plain.dimensions(), lit.dimensions());
}
