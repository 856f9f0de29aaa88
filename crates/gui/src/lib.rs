// Library crate: exposes testable modules for integration tests and the JSON command interface.
// GUI-specific modules (app, ui, GL rendering) remain in the binary crate.

pub mod command;
pub mod error;
pub mod export;
pub mod harness;
pub mod state;

/// Display-independent viewport: camera math, input, picking, software
/// rasterizer and render loop. The GL renderer and egui panel stay in the
/// binary crate.
pub mod viewport {
    pub mod camera;
    pub mod engine;
    pub mod input;
    pub mod mesh;
    pub mod picking;
    pub mod raster;
    pub mod render_loop;
}
