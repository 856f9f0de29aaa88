use glam::Vec3;
use shared::{ObjectId, SceneObject};

use super::camera::CameraPose;
use super::mesh::{self, MeshData};
use crate::state::scene::SceneRegistry;

/// A ray in world space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Compute AABB from MeshData (9 floats per vertex: pos+normal+color)
    pub fn from_mesh(data: &MeshData) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for v in data.vertices.chunks_exact(9) {
            let p = Vec3::new(v[0], v[1], v[2]);
            min = min.min(p);
            max = max.max(p);
        }

        Self { min, max }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// World-space bounding box of an object's transformed mesh
pub fn object_bounds(object: &SceneObject) -> Aabb {
    let local = mesh::primitive_mesh(object.kind, object.material.color);
    Aabb::from_mesh(&local.transformed(mesh::model_matrix(&object.transform)))
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Nearest object hit by the ray among the pickable ones (visible and
/// selectable). On an exact distance tie the earlier object wins.
pub fn pick_along<'a>(
    ray: &Ray,
    objects: impl IntoIterator<Item = &'a SceneObject>,
) -> Option<&'a SceneObject> {
    let mut best: Option<(&SceneObject, f32)> = None;

    for object in objects {
        if !(object.visible && object.selectable) {
            continue;
        }
        if let Some(dist) = ray_aabb(ray, &object_bounds(object)) {
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((object, dist));
            }
        }
    }

    best.map(|(object, _)| object)
}

/// Object under a screen point, or `None` for empty space.
/// Has no side effects; acting on the result is up to the caller.
pub fn pick(
    pose: &CameraPose,
    scene: &SceneRegistry,
    screen_point: egui::Pos2,
    rect: egui::Rect,
) -> Option<ObjectId> {
    if !(rect.width() > 0.0 && rect.height() > 0.0) {
        return None;
    }
    let ray = pose.screen_ray(screen_point, rect);
    pick_along(&ray, scene.objects()).map(|o| o.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Material, PrimitiveKind, Transform};

    fn object(id: &str, position: [f64; 3]) -> SceneObject {
        SceneObject {
            id: id.to_string(),
            name: id.to_string(),
            kind: PrimitiveKind::Cube,
            transform: Transform::at(position),
            material: Material::default(),
            visible: true,
            selectable: true,
        }
    }

    fn ray_down_z() -> Ray {
        Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        }
    }

    #[test]
    fn test_ray_aabb_hit_and_miss() {
        let aabb = Aabb {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        let t = ray_aabb(&ray_down_z(), &aabb).unwrap();
        assert!((t - 9.0).abs() < 1e-5);

        let away = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::Z,
        };
        assert!(ray_aabb(&away, &aabb).is_none());
    }

    #[test]
    fn test_ray_from_inside_box() {
        let aabb = Aabb {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::X,
        };
        assert!((ray_aabb(&ray, &aabb).unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_object_bounds_follow_transform() {
        let mut obj = object("a", [2.0, 0.0, 0.0]);
        obj.transform.scale = [2.0, 1.0, 1.0];
        let b = object_bounds(&obj);
        assert!((b.center() - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
        assert!((b.size() - Vec3::new(2.0, 1.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_nearest_wins() {
        let objects = vec![object("far", [0.0, 0.0, -3.0]), object("near", [0.0, 0.0, 3.0])];
        let hit = pick_along(&ray_down_z(), &objects).unwrap();
        assert_eq!(hit.id, "near");
    }

    #[test]
    fn test_tie_goes_to_first() {
        let objects = vec![object("first", [0.0, 0.0, 0.0]), object("second", [0.0, 0.0, 0.0])];
        for _ in 0..5 {
            assert_eq!(pick_along(&ray_down_z(), &objects).unwrap().id, "first");
        }
    }

    #[test]
    fn test_hidden_and_unselectable_skipped() {
        let mut hidden = object("hidden", [0.0, 0.0, 3.0]);
        hidden.visible = false;
        let mut locked = object("locked", [0.0, 0.0, 1.0]);
        locked.selectable = false;
        let back = object("back", [0.0, 0.0, -3.0]);
        let objects = vec![hidden, locked, back];
        assert_eq!(pick_along(&ray_down_z(), &objects).unwrap().id, "back");
    }

    #[test]
    fn test_empty_is_none() {
        let objects: Vec<SceneObject> = Vec::new();
        assert!(pick_along(&ray_down_z(), &objects).is_none());
    }

    #[test]
    fn test_ray_at() {
        assert_eq!(ray_down_z().at(4.0), Vec3::new(0.0, 0.0, 6.0));
    }
}
