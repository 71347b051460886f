use glam::{Mat4, Vec3};
use gochi_engine::input::{InputFrame, InputState, Key, MouseButton};

use crate::config::ControlsConfig;

/// Per-frame movement intent, each axis in `[-1, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Motion {
    pub forward: f32,
    pub strafe: f32,
}

impl Motion {
    /// Reads arrow keys and WASD.
    pub fn from_keys(input: &InputState) -> Self {
        let axis = |pos: &[Key], neg: &[Key]| {
            (input.any_key_down(pos) as i32 - input.any_key_down(neg) as i32) as f32
        };
        Self {
            forward: axis(&[Key::ArrowUp, Key::W], &[Key::ArrowDown, Key::S]),
            strafe: axis(&[Key::ArrowRight, Key::D], &[Key::ArrowLeft, Key::A]),
        }
    }
}

/// Free-look camera: position, yaw/pitch and field of view.
///
/// Right-handed, +Y up. The right mouse button must be held to look around so
/// the cursor stays usable.
#[derive(Debug, Clone)]
pub struct Controls {
    config: ControlsConfig,
    position: Vec3,
    horizontal_angle: f32,
    vertical_angle: f32,
    fov_degrees: f32,
}

impl Controls {
    pub fn new(config: ControlsConfig) -> Self {
        let mut controls = Self {
            position: config.position,
            horizontal_angle: config.horizontal_angle,
            vertical_angle: 0.0,
            fov_degrees: config.fov_degrees,
            config,
        };
        controls.set_vertical_angle(controls.config.vertical_angle);
        controls.set_fov_degrees(controls.fov_degrees);
        controls
    }

    /// Applies one frame of input.
    pub fn update(&mut self, input: &InputState, frame: &InputFrame, dt: f32) {
        let look = if input.button_down(MouseButton::Right) {
            frame.pointer_delta
        } else {
            (0.0, 0.0)
        };
        self.apply(Motion::from_keys(input), look, frame.wheel_lines, dt);
    }

    /// Moves, turns and zooms. `look` is pointer motion in logical pixels,
    /// `wheel_lines` positive zooms in.
    pub fn apply(&mut self, motion: Motion, look: (f32, f32), wheel_lines: f32, dt: f32) {
        self.horizontal_angle -= self.config.mouse_speed * look.0;
        self.set_vertical_angle(self.vertical_angle - self.config.mouse_speed * look.1);

        let step = self.config.speed * dt;
        self.position += self.direction() * motion.forward * step;
        self.position += self.right() * motion.strafe * step;

        if wheel_lines != 0.0 {
            self.set_fov_degrees(self.fov_degrees - wheel_lines * self.config.wheel_step_degrees);
        }
    }

    fn set_vertical_angle(&mut self, angle: f32) {
        let max = self.config.max_pitch_degrees.to_radians();
        self.vertical_angle = angle.clamp(-max, max);
    }

    fn set_fov_degrees(&mut self, fov: f32) {
        let (lo, hi) = self.config.fov_range;
        self.fov_degrees = fov.clamp(lo, hi);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn vertical_angle(&self) -> f32 {
        self.vertical_angle
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    /// Unit view direction.
    pub fn direction(&self) -> Vec3 {
        let (sh, ch) = self.horizontal_angle.sin_cos();
        let (sv, cv) = self.vertical_angle.sin_cos();
        Vec3::new(cv * sh, sv, cv * ch)
    }

    /// Unit vector to the right of the view, parallel to the floor.
    pub fn right(&self) -> Vec3 {
        let h = self.horizontal_angle - std::f32::consts::FRAC_PI_2;
        Vec3::new(h.sin(), 0.0, h.cos())
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.direction())
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.direction(), self.up())
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            aspect,
            self.config.near,
            self.config.far,
        )
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(ControlsConfig::default())
    }
}
