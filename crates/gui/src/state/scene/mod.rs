//! Scene registry
//!
//! The registry is the single owner of every scene object. Objects are kept
//! in insertion order and addressed by id; UI panels and the renderer read it
//! by reference and never hold copies.

mod display;
mod ids;
mod object_ops;

pub use display::{kind_icon, object_display_name, short_id};
pub use ids::{IdGenerator, IdStrategy};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shared::{Material, ObjectId, SceneObject};

use super::settings::SceneSettings;

/// Arena of scene objects keyed by id
pub struct SceneRegistry {
    objects: Vec<SceneObject>,
    ids: IdGenerator,
    rng: ChaCha8Rng,
    spawn_extent: f64,
    duplicate_offset: [f64; 3],
    /// Running number used in default names
    name_counter: u64,
    /// Monotonically increasing version counter for cache invalidation
    version: u64,
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new(&SceneSettings::default())
    }
}

impl SceneRegistry {
    pub fn new(settings: &SceneSettings) -> Self {
        Self::with_ids(settings, IdGenerator::new(settings.id_strategy))
    }

    /// Registry with a caller-supplied id generator
    pub fn with_ids(settings: &SceneSettings, ids: IdGenerator) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        Self {
            objects: Vec::new(),
            ids,
            rng: ChaCha8Rng::seed_from_u64(seed),
            spawn_extent: settings.spawn_extent.abs(),
            duplicate_offset: settings.duplicate_offset,
            name_counter: 0,
            version: 0,
        }
    }

    /// Current registry version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Bump version after an in-place change
    pub(crate) fn notify_mutated(&mut self) {
        self.version += 1;
    }

    /// All objects in insertion order
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn get(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects that take part in picking and drawing
    pub fn visible(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| o.visible)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Material access for the selection controller
    pub(crate) fn material_mut(&mut self, id: &str) -> Option<&mut Material> {
        let material = self.objects.iter_mut().find(|o| o.id == id).map(|o| &mut o.material)?;
        self.version += 1;
        Some(material)
    }

    /// Insert a record, returning its index. A record with the same id is
    /// replaced in place.
    pub(crate) fn insert(&mut self, object: SceneObject) -> usize {
        self.version += 1;
        if let Some(idx) = self.objects.iter().position(|o| o.id == object.id) {
            self.objects[idx] = object;
            idx
        } else {
            self.objects.push(object);
            self.objects.len() - 1
        }
    }

    /// Remove a record. Callers must release any selection on it first.
    pub(crate) fn remove(&mut self, id: &str) -> Option<SceneObject> {
        let idx = self.objects.iter().position(|o| o.id == id)?;
        self.version += 1;
        Some(self.objects.remove(idx))
    }

    fn next_id(&mut self) -> ObjectId {
        self.ids.next_id()
    }
}
