//! CPU-side meshes for primitives, grid and axes

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use shared::{PrimitiveKind, SceneObject, Transform};

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 9
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex position by index
    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * 9;
        Vec3::new(self.vertices[base], self.vertices[base + 1], self.vertices[base + 2])
    }

    /// Copy with positions moved by `model` and normals by its normal matrix
    pub fn transformed(&self, model: Mat4) -> MeshData {
        let normal_matrix = Mat3::from_mat4(model).inverse().transpose();
        let mut vertices = self.vertices.clone();
        for v in vertices.chunks_exact_mut(9) {
            let p = model.transform_point3(Vec3::new(v[0], v[1], v[2]));
            let n = (normal_matrix * Vec3::new(v[3], v[4], v[5])).normalize_or_zero();
            v[..6].copy_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z]);
        }
        MeshData {
            vertices,
            indices: self.indices.clone(),
        }
    }
}

// ── Scene objects ────────────────────────────────────────────

const SEGMENTS: u32 = 32;

/// Unit-size mesh for a primitive kind, centered on the origin
pub fn primitive_mesh(kind: PrimitiveKind, color: [f32; 3]) -> MeshData {
    match kind {
        PrimitiveKind::Cube => cube(1.0, 1.0, 1.0, color),
        PrimitiveKind::Sphere => sphere(0.5, 16, SEGMENTS, color),
        PrimitiveKind::Cylinder => cylinder(0.5, 1.0, SEGMENTS, color),
        PrimitiveKind::Cone => cone(0.5, 1.0, SEGMENTS, color),
        PrimitiveKind::Torus => torus(0.35, 0.15, SEGMENTS, 16, color),
    }
}

/// Object-to-world matrix (scale, then XYZ Euler rotation, then translation)
pub fn model_matrix(transform: &Transform) -> Mat4 {
    let [px, py, pz] = transform.position;
    let [rx, ry, rz] = transform.rotation;
    let [sx, sy, sz] = transform.scale;
    Mat4::from_scale_rotation_translation(
        Vec3::new(sx as f32, sy as f32, sz as f32),
        Quat::from_euler(EulerRot::XYZ, rx as f32, ry as f32, rz as f32),
        Vec3::new(px as f32, py as f32, pz as f32),
    )
}

/// World-space mesh of an object, colored with its displayed material
pub fn object_mesh(object: &SceneObject) -> MeshData {
    primitive_mesh(object.kind, object.material.shaded_color())
        .transformed(model_matrix(&object.transform))
}

/// Lines mesh: interleaved [pos.x, pos.y, pos.z, r, g, b, a]
pub struct LineMeshData {
    /// 7 floats per vertex: position(3) + color(4)
    pub vertices: Vec<f32>,
}

// ── Primitive generation ──

pub fn cube(w: f32, h: f32, d: f32, color: [f32; 3]) -> MeshData {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let faces: [([Vec3; 4], Vec3); 6] = [
        // Front (+Z)
        ([Vec3::new(-hw, -hh, hd), Vec3::new(hw, -hh, hd), Vec3::new(hw, hh, hd), Vec3::new(-hw, hh, hd)], Vec3::Z),
        // Back (-Z)
        ([Vec3::new(hw, -hh, -hd), Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, hh, -hd), Vec3::new(hw, hh, -hd)], Vec3::NEG_Z),
        // Right (+X)
        ([Vec3::new(hw, -hh, hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, hh, -hd), Vec3::new(hw, hh, hd)], Vec3::X),
        // Left (-X)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, -hh, hd), Vec3::new(-hw, hh, hd), Vec3::new(-hw, hh, -hd)], Vec3::NEG_X),
        // Top (+Y)
        ([Vec3::new(-hw, hh, hd), Vec3::new(hw, hh, hd), Vec3::new(hw, hh, -hd), Vec3::new(-hw, hh, -hd)], Vec3::Y),
        // Bottom (-Y)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, -hh, hd), Vec3::new(-hw, -hh, hd)], Vec3::NEG_Y),
    ];

    let mut vertices = Vec::with_capacity(24 * 9);
    let mut indices = Vec::with_capacity(36);

    for (quad, normal) in &faces {
        let base = (vertices.len() / 9) as u32;
        for v in quad {
            vertices.extend_from_slice(&[v.x, v.y, v.z, normal.x, normal.y, normal.z, color[0], color[1], color[2]]);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

pub fn cylinder(radius: f32, height: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let hh = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side faces
    for i in 0..segments {
        let a0 = (i as f32) * std::f32::consts::TAU / segments as f32;
        let a1 = ((i + 1) as f32) * std::f32::consts::TAU / segments as f32;

        let c0 = a0.cos();
        let s0 = a0.sin();
        let c1 = a1.cos();
        let s1 = a1.sin();

        let n0 = Vec3::new(c0, 0.0, s0).normalize();
        let n1 = Vec3::new(c1, 0.0, s1).normalize();

        let base = (vertices.len() / 9) as u32;

        // 4 vertices for this quad
        push_vert(&mut vertices, radius * c0, -hh, radius * s0, n0, color);
        push_vert(&mut vertices, radius * c1, -hh, radius * s1, n1, color);
        push_vert(&mut vertices, radius * c1, hh, radius * s1, n1, color);
        push_vert(&mut vertices, radius * c0, hh, radius * s0, n0, color);

        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    // Top cap
    add_cap(&mut vertices, &mut indices, radius, hh, segments, Vec3::Y, color);
    // Bottom cap
    add_cap_reversed(&mut vertices, &mut indices, radius, -hh, segments, Vec3::NEG_Y, color);

    MeshData { vertices, indices }
}

pub fn sphere(radius: f32, rings: u32, sectors: u32, color: [f32; 3]) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for r in 0..=rings {
        let phi = std::f32::consts::PI * r as f32 / rings as f32;
        let sp = phi.sin();
        let cp = phi.cos();

        for s in 0..=sectors {
            let theta = std::f32::consts::TAU * s as f32 / sectors as f32;
            let st = theta.sin();
            let ct = theta.cos();

            let x = sp * ct;
            let y = cp;
            let z = sp * st;

            let n = Vec3::new(x, y, z);
            push_vert(&mut vertices, radius * x, radius * y, radius * z, n, color);
        }
    }

    for r in 0..rings {
        for s in 0..sectors {
            let i0 = r * (sectors + 1) + s;
            let i1 = i0 + 1;
            let i2 = i0 + sectors + 1;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }

    MeshData { vertices, indices }
}

pub fn cone(radius: f32, height: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let hh = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side faces
    let slope = radius / height;
    for i in 0..segments {
        let a0 = (i as f32) * std::f32::consts::TAU / segments as f32;
        let a1 = ((i + 1) as f32) * std::f32::consts::TAU / segments as f32;

        let c0 = a0.cos();
        let s0 = a0.sin();
        let c1 = a1.cos();
        let s1 = a1.sin();

        // Normal for cone side
        let n0 = Vec3::new(c0, slope, s0).normalize();
        let n1 = Vec3::new(c1, slope, s1).normalize();
        let n_top = (n0 + n1).normalize();

        let base = (vertices.len() / 9) as u32;

        push_vert(&mut vertices, 0.0, hh, 0.0, n_top, color); // apex
        push_vert(&mut vertices, radius * c0, -hh, radius * s0, n0, color);
        push_vert(&mut vertices, radius * c1, -hh, radius * s1, n1, color);

        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    // Bottom cap
    add_cap_reversed(&mut vertices, &mut indices, radius, -hh, segments, Vec3::NEG_Y, color);

    MeshData { vertices, indices }
}

pub fn torus(major: f32, minor: f32, rings: u32, sides: u32, color: [f32; 3]) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for r in 0..=rings {
        let u = std::f32::consts::TAU * r as f32 / rings as f32;
        let (su, cu) = u.sin_cos();

        for s in 0..=sides {
            let v = std::f32::consts::TAU * s as f32 / sides as f32;
            let (sv, cv) = v.sin_cos();

            let n = Vec3::new(cv * cu, sv, cv * su);
            let ring = major + minor * cv;
            push_vert(&mut vertices, ring * cu, minor * sv, ring * su, n, color);
        }
    }

    for r in 0..rings {
        for s in 0..sides {
            let i0 = r * (sides + 1) + s;
            let i1 = i0 + 1;
            let i2 = i0 + sides + 1;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i1, i2, i1, i3, i2]);
        }
    }

    MeshData { vertices, indices }
}

// ── Grid and axes ────────────────────────────────────────────

pub fn grid(range: i32, cell_size: f32, opacity: f32) -> LineMeshData {
    let mut vertices = Vec::new();
    let grid_color = [0.25_f32, 0.25, 0.25, opacity];
    let origin_color_x = [0.5_f32, 0.2, 0.2, opacity * 0.7];
    let origin_color_z = [0.2_f32, 0.2, 0.5, opacity * 0.7];

    let extent = range as f32 * cell_size;

    for i in -range..=range {
        let f = i as f32 * cell_size;
        let color = if i == 0 {
            origin_color_z
        } else {
            grid_color
        };
        // Line along Z
        push_line_vert(&mut vertices, f, 0.0, -extent, color);
        push_line_vert(&mut vertices, f, 0.0, extent, color);

        let color = if i == 0 {
            origin_color_x
        } else {
            grid_color
        };
        // Line along X
        push_line_vert(&mut vertices, -extent, 0.0, f, color);
        push_line_vert(&mut vertices, extent, 0.0, f, color);
    }

    LineMeshData { vertices }
}

pub fn axes(length: f32) -> LineMeshData {
    let mut vertices = Vec::new();
    let r = [0.9_f32, 0.2, 0.2, 1.0];
    let g = [0.2_f32, 0.8, 0.2, 1.0];
    let b = [0.2_f32, 0.3, 0.9, 1.0];

    // X axis
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, r);
    push_line_vert(&mut vertices, length, 0.0, 0.0, r);
    // Y axis
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, g);
    push_line_vert(&mut vertices, 0.0, length, 0.0, g);
    // Z axis
    push_line_vert(&mut vertices, 0.0, 0.0, 0.0, b);
    push_line_vert(&mut vertices, 0.0, 0.0, length, b);

    LineMeshData { vertices }
}

// ── Helpers ──────────────────────────────────────────────────

fn push_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, n: Vec3, c: [f32; 3]) {
    v.extend_from_slice(&[px, py, pz, n.x, n.y, n.z, c[0], c[1], c[2]]);
}

fn push_line_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, c: [f32; 4]) {
    v.extend_from_slice(&[px, py, pz, c[0], c[1], c[2], c[3]]);
}

fn add_cap(
    vertices: &mut Vec<f32>,
    indices: &mut Vec<u32>,
    radius: f32,
    y: f32,
    segments: u32,
    normal: Vec3,
    color: [f32; 3],
) {
    let center_idx = (vertices.len() / 9) as u32;
    push_vert(vertices, 0.0, y, 0.0, normal, color);

    for i in 0..segments {
        let angle = (i as f32) * std::f32::consts::TAU / segments as f32;
        push_vert(vertices, radius * angle.cos(), y, radius * angle.sin(), normal, color);
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        indices.extend_from_slice(&[center_idx, center_idx + 1 + i, center_idx + 1 + next]);
    }
}

fn add_cap_reversed(
    vertices: &mut Vec<f32>,
    indices: &mut Vec<u32>,
    radius: f32,
    y: f32,
    segments: u32,
    normal: Vec3,
    color: [f32; 3],
) {
    let center_idx = (vertices.len() / 9) as u32;
    push_vert(vertices, 0.0, y, 0.0, normal, color);

    for i in 0..segments {
        let angle = (i as f32) * std::f32::consts::TAU / segments as f32;
        push_vert(vertices, radius * angle.cos(), y, radius * angle.sin(), normal, color);
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        indices.extend_from_slice(&[center_idx, center_idx + 1 + next, center_idx + 1 + i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(mesh: &MeshData) -> (Vec3, Vec3) {
        (0..mesh.vertex_count()).map(|i| mesh.position(i)).fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(p), hi.max(p)),
        )
    }

    #[test]
    fn test_primitives_fit_unit_box() {
        for &kind in PrimitiveKind::all() {
            let mesh = primitive_mesh(kind, [1.0, 0.0, 0.0]);
            assert!(mesh.triangle_count() > 0, "{kind:?}");
            let (lo, hi) = extent(&mesh);
            assert!(lo.cmpge(Vec3::splat(-0.5 - 1e-5)).all(), "{kind:?}");
            assert!(hi.cmple(Vec3::splat(0.5 + 1e-5)).all(), "{kind:?}");
            assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        }
    }

    #[test]
    fn test_transformed_moves_and_scales() {
        let transform = Transform {
            position: [1.0, 2.0, 3.0],
            rotation: [0.0; 3],
            scale: [2.0, 2.0, 2.0],
        };
        let mesh = cube(1.0, 1.0, 1.0, [1.0; 3]).transformed(model_matrix(&transform));
        let (lo, hi) = extent(&mesh);
        assert!((lo - Vec3::new(0.0, 1.0, 2.0)).length() < 1e-5);
        assert!((hi - Vec3::new(2.0, 3.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn test_rotation_keeps_unit_normals() {
        let transform = Transform {
            rotation: [0.3, 1.1, -0.4],
            scale: [1.0, 3.0, 0.5],
            ..Transform::new()
        };
        let mesh = cube(1.0, 1.0, 1.0, [1.0; 3]).transformed(model_matrix(&transform));
        for v in mesh.vertices.chunks_exact(9) {
            let n = Vec3::new(v[3], v[4], v[5]);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }
}
