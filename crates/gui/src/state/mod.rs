pub mod scene;
pub mod selection;
pub mod settings;

use std::path::PathBuf;

use shared::{ObjectId, PrimitiveKind, SceneObject, Transform};

pub use scene::{kind_icon, object_display_name, short_id, IdGenerator, IdStrategy, SceneRegistry};
pub use selection::SelectionController;
pub use settings::{AppSettings, CameraSettings, ExportSettings, SceneSettings};

/// Panel visibility flags
pub struct PanelVisibility {
    pub scene_list: bool,
    pub status_bar: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            scene_list: true,
            status_bar: true,
        }
    }
}

/// Outcome of the most recent frame export
#[derive(Debug, Clone, PartialEq)]
pub enum ExportStatus {
    /// Frame captured, encoding on a worker thread
    Pending,
    Saved(PathBuf),
    Failed(String),
}

/// Combined application state.
///
/// This is the mutation and query surface used by panels, keyboard
/// shortcuts and the command protocol. Selection is private: every
/// highlight change goes through the methods below so deletion can never
/// leave a dangling selection behind.
pub struct AppState {
    pub scene: SceneRegistry,
    selection: SelectionController,
    pub panels: PanelVisibility,
    pub settings: AppSettings,
    /// Show settings window
    pub show_settings_window: bool,
    pub last_export: Option<ExportStatus>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppSettings::load())
    }
}

impl AppState {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            scene: SceneRegistry::new(&settings.scene),
            selection: SelectionController::new(settings.viewport.highlight_tint),
            panels: PanelVisibility::default(),
            settings,
            show_settings_window: false,
            last_export: None,
        }
    }

    /// Add a primitive and return its id
    pub fn add_object(&mut self, kind: PrimitiveKind) -> ObjectId {
        let id = self.scene.add(kind).id.clone();
        self.selection.forget(&id);
        id
    }

    /// Delete an object. A selection on it is released first.
    pub fn delete_object(&mut self, id: &str) -> bool {
        self.selection.release(id, &mut self.scene);
        match self.scene.remove(id) {
            Some(obj) => {
                tracing::info!("Deleted {} ({})", obj.name, obj.id);
                true
            }
            None => false,
        }
    }

    pub fn duplicate_object(&mut self, id: &str) -> Option<ObjectId> {
        let copy = self.scene.duplicate(id)?.id.clone();
        self.selection.forget(&copy);
        Some(copy)
    }

    /// Hidden objects keep their selection; they just can't be picked
    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        self.scene.set_visible(id, visible)
    }

    pub fn set_transform(&mut self, id: &str, transform: Transform) -> bool {
        self.scene.set_transform(id, transform)
    }

    pub fn set_color(&mut self, id: &str, color: [f32; 3]) -> bool {
        self.selection.recolor(id, color, &mut self.scene)
    }

    /// Select an object, or clear the selection with `None`
    pub fn select(&mut self, id: Option<&str>) -> Option<ObjectId> {
        self.selection.select(id, &mut self.scene)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear(&mut self.scene);
    }

    /// Objects in insertion order
    pub fn list_objects(&self) -> &[SceneObject] {
        self.scene.objects()
    }

    pub fn get_selection(&self) -> Option<&ObjectId> {
        self.selection.selected()
    }

    /// Read-only view of the selection controller
    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Delete the selected object, if any
    pub fn delete_selected(&mut self) -> bool {
        match self.get_selection().cloned() {
            Some(id) => self.delete_object(&id),
            None => false,
        }
    }

    /// Duplicate the selected object and select the copy
    pub fn duplicate_selected(&mut self) -> Option<ObjectId> {
        let id = self.get_selection().cloned()?;
        let copy = self.duplicate_object(&id)?;
        self.select(Some(&copy));
        Some(copy)
    }

    /// Change the highlight tint. Applies from the next selection on.
    pub fn set_highlight_tint(&mut self, tint: [f32; 3]) {
        self.settings.viewport.highlight_tint = tint;
        self.selection.set_tint(tint);
    }
}
