//! Object lifecycle operations

use rand::Rng;
use shared::{Material, PrimitiveKind, SceneObject, Transform};

use super::SceneRegistry;

impl SceneRegistry {
    /// Create an object of `kind` at a random spot inside the spawn volume
    /// with a random color.
    pub fn add(&mut self, kind: PrimitiveKind) -> &SceneObject {
        let id = self.next_id();
        self.name_counter += 1;

        let e = self.spawn_extent;
        let position = [
            self.rng.random_range(-e..=e),
            self.rng.random_range(-e..=e),
            self.rng.random_range(-e..=e),
        ];
        let color = [
            self.rng.random_range(0.25..=1.0_f32),
            self.rng.random_range(0.25..=1.0_f32),
            self.rng.random_range(0.25..=1.0_f32),
        ];

        let object = SceneObject {
            id,
            name: format!("{} {}", kind.label(), self.name_counter),
            kind,
            transform: Transform::at(position),
            material: Material::new(color),
            visible: true,
            selectable: true,
        };
        tracing::info!("Added {} ({})", object.name, object.id);

        let idx = self.insert(object);
        &self.objects[idx]
    }

    /// Copy an object under a new id, offset by the duplicate offset.
    /// The copy never carries the source's highlight.
    pub fn duplicate(&mut self, id: &str) -> Option<&SceneObject> {
        let source = self.get(id)?.clone();
        let new_id = self.next_id();

        let mut transform = source.transform.clone();
        for (p, d) in transform.position.iter_mut().zip(self.duplicate_offset) {
            *p += d;
        }

        let object = SceneObject {
            id: new_id,
            name: format!("{} Copy", source.name),
            kind: source.kind,
            transform,
            material: Material::new(source.material.color),
            visible: source.visible,
            selectable: source.selectable,
        };
        tracing::info!("Duplicated {} as {}", source.id, object.id);

        let idx = self.insert(object);
        Some(&self.objects[idx])
    }

    /// Show or hide an object. Hidden objects stay in the registry.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        match self.get_mut(id) {
            Some(obj) => {
                obj.visible = visible;
                self.notify_mutated();
                true
            }
            None => false,
        }
    }

    /// Allow or forbid picking an object
    pub fn set_selectable(&mut self, id: &str, selectable: bool) -> bool {
        match self.get_mut(id) {
            Some(obj) => {
                obj.selectable = selectable;
                self.notify_mutated();
                true
            }
            None => false,
        }
    }

    pub fn set_transform(&mut self, id: &str, transform: Transform) -> bool {
        match self.get_mut(id) {
            Some(obj) => {
                obj.transform = transform;
                self.notify_mutated();
                true
            }
            None => false,
        }
    }

    /// Apply a translation delta (drag)
    pub fn translate(&mut self, id: &str, delta: [f64; 3]) -> bool {
        match self.get_mut(id) {
            Some(obj) => {
                for (p, d) in obj.transform.position.iter_mut().zip(delta) {
                    *p += d;
                }
                self.notify_mutated();
                true
            }
            None => false,
        }
    }

    pub fn rename(&mut self, id: &str, name: String) -> bool {
        match self.get_mut(id) {
            Some(obj) => {
                obj.name = name;
                self.notify_mutated();
                true
            }
            None => false,
        }
    }

    /// Replace the displayed base color. Goes through the selection
    /// controller when the object is highlighted.
    pub(crate) fn set_base_color(&mut self, id: &str, color: [f32; 3]) -> bool {
        match self.material_mut(id) {
            Some(material) => {
                material.color = color;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::scene::{IdGenerator, IdStrategy};
    use crate::state::settings::SceneSettings;

    fn seeded() -> SceneRegistry {
        SceneRegistry::new(&SceneSettings {
            id_strategy: IdStrategy::Sequential,
            seed: Some(42),
            ..Default::default()
        })
    }

    #[test]
    fn test_add_defaults() {
        let mut reg = seeded();
        let obj = reg.add(PrimitiveKind::Cube).clone();
        assert_eq!(obj.name, "Cube 1");
        assert!(obj.visible);
        assert!(obj.selectable);
        assert_eq!(obj.transform.rotation, [0.0; 3]);
        assert_eq!(obj.transform.scale, [1.0; 3]);
        assert!(obj.transform.position.iter().all(|p| p.abs() <= 3.0));
        assert!(obj.material.color.iter().all(|c| (0.25..=1.0).contains(c)));
        assert!(obj.material.emissive.is_none());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a = seeded();
        let mut b = seeded();
        let pa = a.add(PrimitiveKind::Sphere).transform.clone();
        let pb = b.add(PrimitiveKind::Sphere).transform.clone();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut reg = seeded();
        let a = reg.add(PrimitiveKind::Cube).id.clone();
        let b = reg.add(PrimitiveKind::Cone).id.clone();
        let c = reg.add(PrimitiveKind::Torus).id.clone();
        let ids: Vec<_> = reg.objects().iter().map(|o| o.id.clone()).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn test_duplicate_offsets_and_renames() {
        let mut reg = seeded();
        let src = reg.add(PrimitiveKind::Cylinder).clone();
        let dup = reg.duplicate(&src.id).unwrap().clone();
        assert_ne!(dup.id, src.id);
        assert_eq!(dup.name, format!("{} Copy", src.name));
        assert_eq!(dup.kind, src.kind);
        assert_eq!(dup.material, src.material);
        assert!((dup.transform.position[0] - src.transform.position[0] - 0.5).abs() < 1e-9);
        assert!((dup.transform.position[2] - src.transform.position[2] - 0.5).abs() < 1e-9);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_duplicate_drops_highlight() {
        let mut reg = seeded();
        let id = reg.add(PrimitiveKind::Cube).id.clone();
        let highlighted = reg.get(&id).unwrap().material.highlighted([0.3; 3]);
        *reg.material_mut(&id).unwrap() = highlighted;
        let dup = reg.duplicate(&id).unwrap();
        assert!(dup.material.emissive.is_none());
    }

    #[test]
    fn test_duplicate_missing_is_none() {
        let mut reg = seeded();
        assert!(reg.duplicate("nope").is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_hidden_objects_stay_addressable() {
        let mut reg = seeded();
        let id = reg.add(PrimitiveKind::Cube).id.clone();
        assert!(reg.set_visible(&id, false));
        assert!(reg.contains(&id));
        assert_eq!(reg.visible().count(), 0);
        assert!(reg.set_visible(&id, true));
        assert_eq!(reg.visible().count(), 1);
    }

    #[test]
    fn test_mutations_bump_version() {
        let mut reg = seeded();
        let v0 = reg.version();
        let id = reg.add(PrimitiveKind::Cube).id.clone();
        let v1 = reg.version();
        assert!(v1 > v0);
        reg.set_transform(&id, Transform::at([1.0, 2.0, 3.0]));
        assert!(reg.version() > v1);
        assert!(!reg.set_transform("missing", Transform::new()));
    }

    #[test]
    fn test_remove() {
        let mut reg = seeded();
        let id = reg.add(PrimitiveKind::Cube).id.clone();
        assert!(reg.remove(&id).is_some());
        assert!(reg.remove(&id).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_timestamp_collision_overwrites_silently() {
        // Two adds inside one clock millisecond share an id: the second
        // record replaces the first and only one object remains.
        let settings = SceneSettings {
            id_strategy: IdStrategy::Timestamp,
            seed: Some(1),
            ..Default::default()
        };
        let ids = IdGenerator::with_clock(IdStrategy::Timestamp, || 1_700_000_000_123);
        let mut reg = SceneRegistry::with_ids(&settings, ids);
        let first = reg.add(PrimitiveKind::Cube).id.clone();
        let second = reg.add(PrimitiveKind::Sphere).id.clone();
        assert_eq!(first, second);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(&first).unwrap().kind, PrimitiveKind::Sphere);
    }
}
