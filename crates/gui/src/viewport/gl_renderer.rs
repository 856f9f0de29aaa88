use std::collections::HashMap;

use glow::HasContext;
use shared::ObjectId;

use super::camera::CameraPose;
use super::mesh::{self, LineMeshData, MeshData};
use crate::state::settings::GridSettings;

/// Length of the world axes gizmo
const AXES_LENGTH: f32 = 1.5;

// ── Render parameters ────────────────────────────────────────

/// Parameters for rendering the viewport
#[derive(Clone, Copy)]
pub struct RenderParams {
    /// Viewport rectangle [x, y, width, height] in pixels
    pub viewport: [f32; 4],
    /// Show grid
    pub grid_visible: bool,
    /// Show axes
    pub axes_visible: bool,
    /// Background color RGB
    pub bg_color: [u8; 3],
}

impl RenderParams {
    /// Same parameters aimed at a target of `width` x `height` pixels
    pub fn full_target(self, width: u32, height: u32) -> Self {
        Self {
            viewport: [0.0, 0.0, width as f32, height as f32],
            ..self
        }
    }
}

// ── GPU mesh handles ─────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

struct GpuLines {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: i32,
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    mesh_program: glow::Program,
    line_program: glow::Program,
    grid: Option<GpuLines>,
    axes: Option<GpuLines>,
    /// Cached grid settings to detect changes
    cached_grid_settings: Option<(i32, f32, f32)>,
    /// One GPU mesh per visible scene object
    scene_meshes: HashMap<ObjectId, GpuMesh>,
    /// Registry version the GPU meshes were built from
    last_scene_version: Option<u64>,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context) -> Result<Self, String> {
        let mesh_program = compile_program(gl, MESH_VERT, MESH_FRAG)?;
        let line_program = compile_program(gl, LINE_VERT, LINE_FRAG)?;
        let axes = upload_lines(gl, &mesh::axes(AXES_LENGTH))?;

        Ok(Self {
            mesh_program,
            line_program,
            grid: None,
            axes: Some(axes),
            cached_grid_settings: None,
            scene_meshes: HashMap::new(),
            last_scene_version: None,
        })
    }

    /// Update grid mesh based on settings
    pub fn update_grid(&mut self, gl: &glow::Context, settings: &GridSettings) {
        let new_settings = (settings.range, settings.size, settings.opacity);
        if self.cached_grid_settings == Some(new_settings) {
            return;
        }

        if let Some(old) = self.grid.take() {
            delete_lines(gl, &old);
        }

        let grid_data = mesh::grid(settings.range, settings.size, settings.opacity);
        match upload_lines(gl, &grid_data) {
            Ok(grid) => self.grid = Some(grid),
            Err(e) => tracing::warn!("Grid upload failed: {e}"),
        }
        self.cached_grid_settings = Some(new_settings);
    }

    /// Replace the GPU meshes when the scene version moved on
    pub fn sync_from_meshes(
        &mut self,
        gl: &glow::Context,
        meshes: &HashMap<ObjectId, MeshData>,
        version: u64,
    ) {
        if self.last_scene_version == Some(version) {
            return;
        }
        self.last_scene_version = Some(version);

        for (_, mesh) in self.scene_meshes.drain() {
            delete_mesh(gl, &mesh);
        }

        for (id, mesh_data) in meshes {
            match upload_mesh(gl, mesh_data) {
                Ok(gpu_mesh) => {
                    self.scene_meshes.insert(id.clone(), gpu_mesh);
                }
                Err(e) => tracing::warn!("Mesh upload failed for {id}: {e}"),
            }
        }
        tracing::trace!("Synced {} meshes at scene version {version}", self.scene_meshes.len());
    }

    /// Render the scene into the currently bound framebuffer
    pub fn paint(&self, gl: &glow::Context, pose: &CameraPose, params: &RenderParams) {
        let [x, y, w, h] = params.viewport;
        let vp = pose.view_projection(w / h);

        unsafe {
            gl.viewport(x as i32, y as i32, w as i32, h as i32);
            gl.scissor(x as i32, y as i32, w as i32, h as i32);
            gl.enable(glow::SCISSOR_TEST);

            gl.clear_color(
                params.bg_color[0] as f32 / 255.0,
                params.bg_color[1] as f32 / 255.0,
                params.bg_color[2] as f32 / 255.0,
                1.0,
            );
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);

            gl.use_program(Some(self.line_program));
            set_uniform_mat4(gl, self.line_program, "u_mvp", &vp);

            if params.grid_visible {
                if let Some(ref grid) = self.grid {
                    draw_lines(gl, grid);
                }
            }

            if params.axes_visible {
                if let Some(ref axes) = self.axes {
                    draw_lines(gl, axes);
                }
            }

            gl.use_program(Some(self.mesh_program));
            set_uniform_mat4(gl, self.mesh_program, "u_mvp", &vp);

            // Headlight: lit from the camera
            let light_dir = (pose.position - pose.target).normalize_or_zero();
            set_uniform_vec3(gl, self.mesh_program, "u_light_dir", &light_dir);

            for mesh in self.scene_meshes.values() {
                draw_mesh(gl, mesh);
            }

            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.use_program(None);
        }
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.mesh_program);
            gl.delete_program(self.line_program);
        }
        if let Some(grid) = self.grid.take() {
            delete_lines(gl, &grid);
        }
        if let Some(axes) = self.axes.take() {
            delete_lines(gl, &axes);
        }
        for (_, mesh) in self.scene_meshes.drain() {
            delete_mesh(gl, &mesh);
        }
        self.last_scene_version = None;
    }
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> Result<GpuMesh, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 9 * 4; // 9 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
        // color: location 2
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 3, glow::FLOAT, false, stride, 6 * 4);

        let ibo = gl.create_buffer()?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck_cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        })
    }
}

fn upload_lines(gl: &glow::Context, data: &LineMeshData) -> Result<GpuLines, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 7 * 4; // 7 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // color: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, stride, 3 * 4);

        gl.bind_vertex_array(None);

        Ok(GpuLines {
            vao,
            vbo,
            vertex_count: (data.vertices.len() / 7) as i32,
        })
    }
}

fn delete_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    unsafe {
        gl.delete_vertex_array(mesh.vao);
        gl.delete_buffer(mesh.vbo);
        gl.delete_buffer(mesh.ibo);
    }
}

fn delete_lines(gl: &glow::Context, lines: &GpuLines) {
    unsafe {
        gl.delete_vertex_array(lines.vao);
        gl.delete_buffer(lines.vbo);
    }
}

// ── Draw calls ───────────────────────────────────────────────

unsafe fn draw_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    gl.bind_vertex_array(Some(mesh.vao));
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
    gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
    gl.bind_vertex_array(None);
}

unsafe fn draw_lines(gl: &glow::Context, lines: &GpuLines) {
    gl.bind_vertex_array(Some(lines.vao));
    gl.draw_arrays(glow::LINES, 0, lines.vertex_count);
    gl.bind_vertex_array(None);
}

// ── Shader compilation ───────────────────────────────────────

fn compile_shader(gl: &glow::Context, kind: u32, src: &str) -> Result<glow::Shader, String> {
    unsafe {
        let shader = gl.create_shader(kind)?;
        gl.shader_source(shader, src);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(format!("shader compile error: {log}"));
        }
        Ok(shader)
    }
}

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Result<glow::Program, String> {
    unsafe {
        let vert = compile_shader(gl, glow::VERTEX_SHADER, vert_src)?;
        let frag = match compile_shader(gl, glow::FRAGMENT_SHADER, frag_src) {
            Ok(frag) => frag,
            Err(e) => {
                gl.delete_shader(vert);
                return Err(e);
            }
        };

        let program = gl.create_program()?;
        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);
        gl.delete_shader(vert);
        gl.delete_shader(frag);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(format!("program link error: {log}"));
        }
        Ok(program)
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &glam::Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: &glam::Vec3) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v.x, v.y, v.z);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            slice.as_ptr() as *const u8,
            std::mem::size_of_val(slice),
        )
    }
}

// ── Shaders ──────────────────────────────────────────────────

const MESH_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec3 a_color;

out vec3 v_normal;
out vec3 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_normal = a_normal;
    v_color = a_color;
}
"#;

// Two-sided so open or inverted faces stay visible
const MESH_FRAG: &str = r#"#version 330 core
uniform vec3 u_light_dir;

in vec3 v_normal;
in vec3 v_color;

out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    float diffuse = abs(dot(n, u_light_dir));
    float light = 0.3 + diffuse * 0.7;
    frag_color = vec4(v_color * light, 1.0);
}
"#;

const LINE_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

out vec4 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_color = a_color;
}
"#;

const LINE_FRAG: &str = r#"#version 330 core
in vec4 v_color;
out vec4 frag_color;

void main() {
    frag_color = v_color;
}
"#;
