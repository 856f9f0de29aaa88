//! Orbit camera: pose data, gesture accumulator and the pure integration step.
//!
//! Pointer input never moves the camera directly. Gestures are fed into a
//! [`GestureAccumulator`], and [`integrate`] folds the accumulator into a new
//! [`CameraPose`] once per render tick. With damping enabled only a fraction
//! of the pending motion is applied per tick and the rest carries over.

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::input::InputEffect;
use super::picking::Ray;
use crate::state::settings::CameraSettings;

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 1000.0;
/// Polar limit used when `clamp_polar` is on
const POLAR_EPSILON: f32 = 1e-6;
/// Smallest orbit radius accepted from settings
const MIN_RADIUS: f32 = 1e-3;

/// Spherical coordinates of the camera around its target (Y up).
/// `theta` is the azimuth measured from +Z towards +X, `phi` the polar angle from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return Self {
                radius: 0.0,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let ring = self.radius * self.phi.sin();
        Vec3::new(
            ring * self.theta.sin(),
            self.radius * self.phi.cos(),
            ring * self.theta.cos(),
        )
    }
}

/// Camera placement and the limits that apply to it
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub damping: bool,
    /// Fraction of pending motion applied per tick, in [0, 1)
    pub damping_factor: f32,
    pub clamp_polar: bool,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default())
    }
}

impl CameraPose {
    pub fn from_settings(settings: &CameraSettings) -> Self {
        let min_distance = settings.min_distance.max(MIN_RADIUS);
        Self {
            position: Vec3::from(settings.initial_position),
            target: Vec3::from(settings.initial_target),
            fov: settings.fov_degrees.clamp(1.0, 179.0).to_radians(),
            min_distance,
            max_distance: settings.max_distance.max(min_distance),
            damping: settings.damping_enabled,
            damping_factor: settings.damping_factor.clamp(0.0, 0.999),
            clamp_polar: settings.clamp_polar,
        }
    }

    pub fn spherical(&self) -> Spherical {
        Spherical::from_offset(self.position - self.target)
    }

    /// Distance from the camera to its target
    pub fn radius(&self) -> f32 {
        (self.position - self.target).length()
    }

    fn damping_active(&self) -> bool {
        self.damping && self.damping_factor > 0.0
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        let forward = (self.target - self.position).normalize_or_zero();
        // Looking straight along Y leaves the Y up-hint degenerate
        let up = if forward.cross(Vec3::Y).length_squared() < 1e-12 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        Mat4::look_at_rh(self.position, self.target, up)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, NEAR_PLANE, FAR_PLANE)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Camera-local right and up axes in world space
    pub fn basis(&self) -> (Vec3, Vec3) {
        let inv = self.view_matrix().inverse();
        (inv.x_axis.truncate(), inv.y_axis.truncate())
    }

    /// Project a 3D point to 2D screen coords (for overlay text)
    pub fn project(&self, point: Vec3, rect: egui::Rect) -> Option<egui::Pos2> {
        let aspect = rect.width() / rect.height();
        let vp = self.view_projection(aspect);
        let p = vp * point.extend(1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let screen_x = rect.center().x + ndc.x * rect.width() * 0.5;
        let screen_y = rect.center().y - ndc.y * rect.height() * 0.5;
        Some(egui::pos2(screen_x, screen_y))
    }

    /// Cast a ray from a screen position into the 3D scene
    pub fn screen_ray(&self, screen_pos: egui::Pos2, rect: egui::Rect) -> Ray {
        let aspect = rect.width() / rect.height();

        // Screen → NDC
        let ndc_x = (screen_pos.x - rect.center().x) / (rect.width() * 0.5);
        let ndc_y = -(screen_pos.y - rect.center().y) / (rect.height() * 0.5);

        let vp_inv = self.view_projection(aspect).inverse();

        let near_world = vp_inv * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray {
            origin: self.position,
            direction: (far - near).normalize_or_zero(),
        }
    }
}

/// Motion waiting to be applied to the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureAccumulator {
    /// Orbit drag in viewport pixels
    pub angular_delta: Vec2,
    /// World-space target displacement
    pub pan_offset: Vec3,
    /// Multiplicative radius change (1 = none)
    pub scale_factor: f32,
}

impl Default for GestureAccumulator {
    fn default() -> Self {
        Self {
            angular_delta: Vec2::ZERO,
            pan_offset: Vec3::ZERO,
            scale_factor: 1.0,
        }
    }
}

impl GestureAccumulator {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    fn is_negligible(&self) -> bool {
        self.angular_delta.length() < 1e-3
            && self.pan_offset.length() < 1e-6
            && (self.scale_factor - 1.0).abs() < 1e-6
    }

    /// Split into the part applied this tick and the part left over.
    /// The leftover is the excess scaled by `1 - factor`; a leftover too
    /// small to see is folded into the applied part.
    fn split(&self, factor: f32) -> (Self, Self) {
        let keep = 1.0 - factor;
        let remaining = Self {
            angular_delta: self.angular_delta * keep,
            pan_offset: self.pan_offset * keep,
            scale_factor: 1.0 + (self.scale_factor - 1.0) * keep,
        };
        if remaining.is_negligible() {
            return (*self, Self::default());
        }
        let applied = Self {
            angular_delta: self.angular_delta - remaining.angular_delta,
            pan_offset: self.pan_offset - remaining.pan_offset,
            scale_factor: self.scale_factor / remaining.scale_factor,
        };
        (applied, remaining)
    }
}

/// World-space pan for a pixel drag. Scaled by the visible half-height at
/// the target so the scene tracks the cursor at any zoom level.
pub fn pan_offset(pose: &CameraPose, delta: Vec2, viewport_height: f32) -> Vec3 {
    if !(viewport_height.is_finite() && viewport_height > 0.0) {
        return Vec3::ZERO;
    }
    let target_distance = pose.radius() * (pose.fov * 0.5).tan();
    let (right, up) = pose.basis();
    -right * (2.0 * delta.x * target_distance / viewport_height)
        + up * (2.0 * delta.y * target_distance / viewport_height)
}

/// Fold pending gesture motion into the pose.
///
/// Returns the new pose and what is left of the accumulator: the decayed
/// remainder when damping is on, identity otherwise. Rotation is normalized
/// by viewport height on both axes. The radius always ends up inside
/// `[min_distance, max_distance]`.
pub fn integrate(
    pose: &CameraPose,
    pending: &GestureAccumulator,
    viewport_height: f32,
) -> (CameraPose, GestureAccumulator) {
    let (applied, remaining) = if pose.damping_active() {
        pending.split(pose.damping_factor)
    } else {
        (*pending, GestureAccumulator::default())
    };
    (apply(pose, &applied, viewport_height), remaining)
}

fn apply(pose: &CameraPose, delta: &GestureAccumulator, viewport_height: f32) -> CameraPose {
    let mut spherical = pose.spherical();

    if viewport_height.is_finite() && viewport_height > 0.0 {
        spherical.theta -= TAU * delta.angular_delta.x / viewport_height;
        spherical.phi -= TAU * delta.angular_delta.y / viewport_height;
    }
    if pose.clamp_polar {
        spherical.phi = spherical.phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
    }

    spherical.radius =
        (spherical.radius * delta.scale_factor).clamp(pose.min_distance, pose.max_distance);

    let target = pose.target + delta.pan_offset;
    CameraPose {
        position: target + spherical.to_offset(),
        target,
        ..pose.clone()
    }
}

/// Camera state driven by the render loop
pub struct CameraRig {
    pose: CameraPose,
    pending: GestureAccumulator,
    home: CameraPose,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::from_pose(CameraPose::default())
    }
}

impl CameraRig {
    pub fn new(settings: &CameraSettings) -> Self {
        Self::from_pose(CameraPose::from_settings(settings))
    }

    pub fn from_pose(pose: CameraPose) -> Self {
        Self {
            home: pose.clone(),
            pose,
            pending: GestureAccumulator::default(),
        }
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn pending(&self) -> &GestureAccumulator {
        &self.pending
    }

    /// Nothing left to integrate
    pub fn is_settled(&self) -> bool {
        self.pending.is_identity()
    }

    /// Queue an input effect
    pub fn feed(&mut self, effect: InputEffect, viewport_height: f32) {
        match effect {
            InputEffect::Rotate(delta) => self.pending.angular_delta += delta,
            InputEffect::Pan(delta) => {
                self.pending.pan_offset += pan_offset(&self.pose, delta, viewport_height)
            }
            InputEffect::Zoom(factor) if factor.is_finite() && factor > 0.0 => {
                self.pending.scale_factor *= factor
            }
            InputEffect::Zoom(_) | InputEffect::None => {}
        }
    }

    /// Integrate once. Returns true while motion is still pending.
    pub fn tick(&mut self, viewport_height: f32) -> bool {
        let (pose, remaining) = integrate(&self.pose, &self.pending, viewport_height);
        self.pose = pose;
        self.pending = remaining;
        !self.pending.is_identity()
    }

    /// Back to the startup pose, dropping pending motion
    pub fn reset(&mut self) {
        self.pose = self.home.clone();
        self.pending = GestureAccumulator::default();
    }

    /// Move the orbit target to `point`, keeping distance and angles
    pub fn focus_on(&mut self, point: Vec3) {
        let shift = point - self.pose.target;
        self.pose.target = point;
        self.pose.position += shift;
        self.pending.pan_offset = Vec3::ZERO;
    }

    /// Apply changed settings without moving the camera
    pub fn configure(&mut self, settings: &CameraSettings) {
        let fresh = CameraPose::from_settings(settings);
        self.pose = CameraPose {
            position: self.pose.position,
            target: self.pose.target,
            ..fresh.clone()
        };
        self.home = fresh;
    }
}
