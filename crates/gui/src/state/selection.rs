use shared::{Material, ObjectId};

use super::scene::SceneRegistry;

/// Default emissive tint for the highlighted object
pub const DEFAULT_HIGHLIGHT_TINT: [f32; 3] = [0.25, 0.25, 0.05];

/// The selected object together with its material as it was before highlighting
#[derive(Debug, Clone)]
struct ActiveSelection {
    id: ObjectId,
    snapshot: Material,
}

/// Single-object selection with highlight/restore.
///
/// Every highlight transition goes through here: the selected object shows a
/// highlighted material while its original is kept in a snapshot, and the
/// snapshot is written back on deselect, on selecting something else, and
/// before the object is deleted. A snapshot exists exactly when an object is
/// selected.
pub struct SelectionController {
    active: Option<ActiveSelection>,
    tint: [f32; 3],
    /// Version counter for selection changes
    version: u64,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT_TINT)
    }
}

impl SelectionController {
    pub fn new(tint: [f32; 3]) -> Self {
        Self {
            active: None,
            tint,
            version: 0,
        }
    }

    /// Currently selected object
    pub fn selected(&self) -> Option<&ObjectId> {
        self.active.as_ref().map(|a| &a.id)
    }

    /// Check if an object is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.active.as_ref().is_some_and(|a| a.id == id)
    }

    /// Whether an original material is being held
    pub fn has_snapshot(&self) -> bool {
        self.active.is_some()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Highlight tint used for the next selection
    pub fn set_tint(&mut self, tint: [f32; 3]) {
        self.tint = tint;
    }

    /// Select `target`, or clear the selection with `None`.
    ///
    /// Re-selecting the current object is a no-op. Selecting an id that is
    /// not in the registry leaves nothing selected. Returns the new selection.
    pub fn select(&mut self, target: Option<&str>, scene: &mut SceneRegistry) -> Option<ObjectId> {
        if let (Some(active), Some(id)) = (&self.active, target) {
            if active.id == id {
                return Some(active.id.clone());
            }
        }

        self.restore(scene);

        let id = target?;
        let Some(object) = scene.get(id) else {
            tracing::debug!("Select ignored: {id} is not in the scene");
            return None;
        };
        let snapshot = object.material.clone();
        let highlighted = snapshot.highlighted(self.tint);
        if let Some(material) = scene.material_mut(id) {
            *material = highlighted;
        }

        self.active = Some(ActiveSelection {
            id: id.to_string(),
            snapshot,
        });
        self.version += 1;
        tracing::debug!("Selected {id}");
        Some(id.to_string())
    }

    /// Clear the selection, restoring the object's original material
    pub fn clear(&mut self, scene: &mut SceneRegistry) {
        self.restore(scene);
    }

    /// Drop the selection if it points at `id`. Must run before `id` is
    /// removed from the registry.
    pub(crate) fn release(&mut self, id: &str, scene: &mut SceneRegistry) {
        if self.is_selected(id) {
            self.restore(scene);
        }
    }

    /// Drop the selection on `id` without restoring. Used when the record
    /// was replaced by a new object with the same id, so the snapshot no
    /// longer belongs to anything in the registry.
    pub(crate) fn forget(&mut self, id: &str) {
        if self.is_selected(id) {
            tracing::debug!("Selection on {id} dropped: record replaced");
            self.active = None;
            self.version += 1;
        }
    }

    /// Change the base color of an object. For the selected object both the
    /// snapshot and the displayed highlight are updated so a later restore
    /// keeps the new color.
    pub(crate) fn recolor(&mut self, id: &str, color: [f32; 3], scene: &mut SceneRegistry) -> bool {
        match &mut self.active {
            Some(active) if active.id == id => {
                active.snapshot.color = color;
                let highlighted = active.snapshot.highlighted(self.tint);
                match scene.material_mut(id) {
                    Some(material) => {
                        *material = highlighted;
                        true
                    }
                    None => false,
                }
            }
            _ => scene.set_base_color(id, color),
        }
    }

    /// Write the snapshot back and forget the selection. An object that has
    /// disappeared from the registry is skipped.
    fn restore(&mut self, scene: &mut SceneRegistry) {
        let Some(active) = self.active.take() else {
            return;
        };
        match scene.material_mut(&active.id) {
            Some(material) => *material = active.snapshot,
            None => tracing::debug!("Selected object {} vanished; nothing to restore", active.id),
        }
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::scene::IdStrategy;
    use crate::state::settings::SceneSettings;
    use shared::PrimitiveKind;

    fn scene() -> SceneRegistry {
        SceneRegistry::new(&SceneSettings {
            id_strategy: IdStrategy::Sequential,
            seed: Some(3),
            ..Default::default()
        })
    }

    fn highlighted_count(scene: &SceneRegistry) -> usize {
        scene.objects().iter().filter(|o| o.material.is_highlighted()).count()
    }

    #[test]
    fn test_initial_empty() {
        let s = SelectionController::default();
        assert!(s.selected().is_none());
        assert!(!s.has_snapshot());
    }

    #[test]
    fn test_select_highlights() {
        let mut scene = scene();
        let id = scene.add(PrimitiveKind::Cube).id.clone();
        let before = scene.get(&id).unwrap().material.clone();

        let mut s = SelectionController::default();
        assert_eq!(s.select(Some(&id), &mut scene), Some(id.clone()));

        let now = &scene.get(&id).unwrap().material;
        assert!(now.is_highlighted());
        assert_eq!(now.color, before.color);
        assert!(s.is_selected(&id));
        assert!(s.has_snapshot());
    }

    #[test]
    fn test_select_twice_is_idempotent() {
        let mut scene = scene();
        let id = scene.add(PrimitiveKind::Cube).id.clone();
        let before = scene.get(&id).unwrap().material.clone();

        let mut s = SelectionController::default();
        s.select(Some(&id), &mut scene);
        s.select(Some(&id), &mut scene);
        assert_eq!(highlighted_count(&scene), 1);
        assert!(s.has_snapshot());

        s.select(None, &mut scene);
        assert_eq!(scene.get(&id).unwrap().material, before);
    }

    #[test]
    fn test_restore_round_trip() {
        let mut scene = scene();
        let id = scene.add(PrimitiveKind::Sphere).id.clone();
        let before = scene.get(&id).unwrap().material.clone();

        let mut s = SelectionController::default();
        s.select(Some(&id), &mut scene);
        s.select(None, &mut scene);
        assert_eq!(scene.get(&id).unwrap().material, before);
        assert!(s.selected().is_none());
        assert!(!s.has_snapshot());
    }

    #[test]
    fn test_switching_restores_previous() {
        let mut scene = scene();
        let a = scene.add(PrimitiveKind::Cube).id.clone();
        let b = scene.add(PrimitiveKind::Cone).id.clone();
        let a_before = scene.get(&a).unwrap().material.clone();

        let mut s = SelectionController::default();
        s.select(Some(&a), &mut scene);
        s.select(Some(&b), &mut scene);
        assert_eq!(scene.get(&a).unwrap().material, a_before);
        assert!(scene.get(&b).unwrap().material.is_highlighted());
        assert_eq!(highlighted_count(&scene), 1);
    }

    #[test]
    fn test_select_missing_clears() {
        let mut scene = scene();
        let a = scene.add(PrimitiveKind::Cube).id.clone();
        let mut s = SelectionController::default();
        s.select(Some(&a), &mut scene);
        assert_eq!(s.select(Some("ghost"), &mut scene), None);
        assert!(s.selected().is_none());
        assert_eq!(highlighted_count(&scene), 0);
    }

    #[test]
    fn test_vanished_object_restore_is_skipped() {
        let mut scene = scene();
        let a = scene.add(PrimitiveKind::Cube).id.clone();
        let mut s = SelectionController::default();
        s.select(Some(&a), &mut scene);

        // Removed behind the controller's back
        scene.remove(&a);
        s.clear(&mut scene);
        assert!(s.selected().is_none());
        assert!(!s.has_snapshot());
    }

    #[test]
    fn test_release_only_matching() {
        let mut scene = scene();
        let a = scene.add(PrimitiveKind::Cube).id.clone();
        let b = scene.add(PrimitiveKind::Cube).id.clone();
        let mut s = SelectionController::default();
        s.select(Some(&a), &mut scene);
        s.release(&b, &mut scene);
        assert!(s.is_selected(&a));
        s.release(&a, &mut scene);
        assert!(s.selected().is_none());
    }

    #[test]
    fn test_recolor_selected_survives_restore() {
        let mut scene = scene();
        let a = scene.add(PrimitiveKind::Cube).id.clone();
        let mut s = SelectionController::default();
        s.select(Some(&a), &mut scene);
        assert!(s.recolor(&a, [0.1, 0.2, 0.3], &mut scene));
        assert!(scene.get(&a).unwrap().material.is_highlighted());
        s.clear(&mut scene);
        assert_eq!(scene.get(&a).unwrap().material, Material::new([0.1, 0.2, 0.3]));
    }

    #[test]
    fn test_recolor_unselected() {
        let mut scene = scene();
        let a = scene.add(PrimitiveKind::Cube).id.clone();
        let mut s = SelectionController::default();
        assert!(s.recolor(&a, [0.5, 0.5, 0.5], &mut scene));
        assert_eq!(scene.get(&a).unwrap().material.color, [0.5, 0.5, 0.5]);
        assert!(!s.recolor("ghost", [0.5, 0.5, 0.5], &mut scene));
    }
}
