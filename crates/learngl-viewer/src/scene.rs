//! Scene state and transform composition.

use glam::{Mat4, Vec3};
use learngl_engine::paint::Color;

use crate::controls::FrameInput;

/// Interleaved `[x, y, z, u, v]` corners of a unit quad centered on the origin.
#[rustfmt::skip]
pub const QUAD_VERTICES: [f32; 20] = [
    // positions          // texture coords
     0.5,  0.5, 0.0,      1.0, 1.0, // top right
     0.5, -0.5, 0.0,      1.0, 0.0, // bottom right
    -0.5, -0.5, 0.0,      0.0, 0.0, // bottom left
    -0.5,  0.5, 0.0,      0.0, 1.0, // top left
];

/// Two triangles sharing the top-right/bottom-left diagonal.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Per-frame render parameters that never change while running.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderState {
    /// Blend factor between the two textures, uploaded as `mixValue`.
    pub mix_value: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Fixed rotation of the quad about the X axis, in degrees.
    pub model_tilt_degrees: f32,
    pub clear_color: Color,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            mix_value: 0.2,
            fov_degrees: 90.0,
            near: 0.1,
            far: 100.0,
            model_tilt_degrees: -55.0,
            clear_color: Color::BLACK,
        }
    }
}

/// Mutable state carried across frames.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneState {
    /// Camera-space offset applied through the view matrix.
    pub translation: Vec3,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            translation: Vec3::new(0.0, 0.0, -3.0),
        }
    }
}

impl SceneState {
    /// Moves the quad by one frame of input: LEFT/RIGHT along -X, UP/DOWN along +Z.
    pub fn advance(&mut self, input: &FrameInput, dt: f32) {
        self.translation.x -= input.horizontal * dt;
        self.translation.z += input.vertical * dt;
    }
}

/// The three matrices uploaded each frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Transforms {
    pub fn compose(render: &RenderState, scene: &SceneState, aspect: f32) -> Self {
        Self {
            model: model_matrix(render.model_tilt_degrees),
            view: view_matrix(scene.translation),
            projection: projection_matrix(render.fov_degrees, aspect, render.near, render.far),
        }
    }
}

pub fn model_matrix(tilt_degrees: f32) -> Mat4 {
    Mat4::from_rotation_x(tilt_degrees.to_radians())
}

pub fn view_matrix(translation: Vec3) -> Mat4 {
    Mat4::from_translation(translation)
}

/// Right-handed perspective with GL's `[-1, 1]` clip depth.
pub fn projection_matrix(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov_degrees.to_radians(), aspect, near, far)
}
