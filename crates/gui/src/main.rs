mod app;
pub mod i18n;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state`, `crate::export`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use scene_viewer_lib::error;
pub use scene_viewer_lib::export;
pub use scene_viewer_lib::state;

use std::path::PathBuf;

use app::{LaunchOptions, ViewerApp};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene_viewer=info,scene_viewer_lib=info".into()),
        )
        .init();

    let options = parse_args(std::env::args().skip(1));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Scene Viewer")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 400.0]),
        depth_buffer: 24,
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "scene-viewer",
        native_options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, options)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

/// Parse `--seed <u64>` and `--export-dir <path>`; anything else is ignored
/// with a warning.
fn parse_args(args: impl IntoIterator<Item = String>) -> LaunchOptions {
    let mut options = LaunchOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => match args.next().map(|v| v.parse::<u64>()) {
                Some(Ok(seed)) => options.seed = Some(seed),
                Some(Err(e)) => tracing::error!("Invalid --seed value: {e}"),
                None => tracing::error!("--seed needs a value"),
            },
            "--export-dir" => match args.next() {
                Some(dir) => options.export_dir = Some(PathBuf::from(dir)),
                None => tracing::error!("--export-dir needs a value"),
            },
            other => tracing::warn!("Ignoring unknown argument {other}"),
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_seed_and_export_dir() {
        let options = parse_args(args(&["--seed", "42", "--export-dir", "/tmp/shots"]));
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.export_dir, Some(PathBuf::from("/tmp/shots")));
    }

    #[test]
    fn test_parse_bad_seed_ignored() {
        let options = parse_args(args(&["--seed", "many"]));
        assert!(options.seed.is_none());
    }

    #[test]
    fn test_parse_missing_value() {
        let options = parse_args(args(&["--export-dir"]));
        assert!(options.export_dir.is_none());
    }
}
