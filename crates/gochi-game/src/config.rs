use std::f32::consts::PI;

use glam::Vec3;
use gochi_engine::coords::ColorRgba;
use gochi_geometry::Rgb;

/// Arena and gameplay constants.
///
/// Distances are world units, speeds units per second, times seconds.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub clear_color: ColorRgba,

    pub floor_half_extent: f32,
    pub floor_color: Rgb,

    /// Fireballs and targets whose center is farther than this from the
    /// origin are removed.
    pub max_distance: f32,

    /// Expected target spawns per second.
    pub spawn_rate: f32,
    /// Horizontal distance from the origin at which targets appear.
    pub spawn_radius: f32,
    /// Height range of spawned targets.
    pub spawn_height: (f32, f32),
    pub target_size: f32,
    pub target_speed_min: f32,
    pub target_speed_max: f32,
    pub target_colors: Vec<Rgb>,
    pub max_targets: usize,

    pub fireball_radius: f32,
    pub fireball_stacks: u32,
    pub fireball_sectors: u32,
    pub fireball_speed: f32,
    pub fireball_color: Rgb,
    /// Minimum time between two shots.
    pub fire_cooldown: f32,
    pub max_fireballs: usize,

    pub shard_count: usize,
    pub shard_size: f32,
    pub shard_speed: f32,
    pub shard_lifetime: f32,
    pub gravity: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            clear_color: ColorRgba::rgb(0.2, 0.2, 0.2),

            floor_half_extent: 5.0,
            floor_color: Rgb::new(0.5, 0.3, 0.1),

            max_distance: 20.0,

            spawn_rate: 0.6,
            spawn_radius: 12.0,
            spawn_height: (0.5, 3.0),
            target_size: 0.6,
            target_speed_min: 1.0,
            target_speed_max: 3.0,
            target_colors: vec![
                Rgb::new(0.2, 0.6, 0.9),
                Rgb::new(0.3, 0.8, 0.3),
                Rgb::new(0.8, 0.2, 0.7),
                Rgb::new(0.9, 0.9, 0.2),
            ],
            max_targets: 16,

            fireball_radius: 0.2,
            fireball_stacks: 8,
            fireball_sectors: 12,
            fireball_speed: 12.0,
            fireball_color: Rgb::new(1.0, 0.45, 0.1),
            fire_cooldown: 0.25,
            max_fireballs: 32,

            shard_count: 8,
            shard_size: 0.15,
            shard_speed: 3.0,
            shard_lifetime: 1.2,
            gravity: 9.8,
        }
    }
}

/// Free-look camera parameters.
#[derive(Debug, Clone)]
pub struct ControlsConfig {
    pub position: Vec3,
    /// Yaw in radians; `PI` looks down -Z.
    pub horizontal_angle: f32,
    /// Pitch in radians.
    pub vertical_angle: f32,
    pub fov_degrees: f32,
    pub fov_range: (f32, f32),
    /// Field-of-view change per wheel line, in degrees.
    pub wheel_step_degrees: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Look speed in radians per logical pixel.
    pub mouse_speed: f32,
    pub max_pitch_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.5, 8.0),
            horizontal_angle: PI,
            vertical_angle: -0.1,
            fov_degrees: 45.0,
            fov_range: (20.0, 90.0),
            wheel_step_degrees: 5.0,
            speed: 3.0,
            mouse_speed: 0.005,
            max_pitch_degrees: 89.0,
            near: 0.1,
            far: 100.0,
        }
    }
}
