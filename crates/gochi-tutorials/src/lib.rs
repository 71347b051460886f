//! Two fixed scenes viewed from a camera circling the origin.
//!
//! `triangles` draws two overlapping translucent triangles; `octahedron` draws
//! an octahedron with per-vertex colors. Both run on [`Tutorial`].

use anyhow::Result;
use glam::{Mat4, Vec3};
use gochi_engine::coords::ColorRgba;
use gochi_engine::core::{App, AppControl, FrameCtx};
use gochi_engine::device::GpuInit;
use gochi_engine::input::Key;
use gochi_engine::logging::{LoggingConfig, init_logging};
use gochi_engine::render::{Mesh, MeshRenderer, MeshStyle};
use gochi_engine::window::{Runtime, RuntimeConfig};
use gochi_geometry::{BufferError, Rgb, Rgba, Triangle, VertexBuffer, shapes};

/// Camera on a horizontal circle, always looking at the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    pub radius: f32,
    pub height: f32,
    /// Radians per second.
    pub angular_speed: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: 2.0,
            height: 2.0,
            angular_speed: 0.6,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl OrbitCamera {
    /// Eye position `seconds` after start.
    pub fn eye(&self, seconds: f32) -> Vec3 {
        let a = self.angular_speed * seconds;
        Vec3::new(self.radius * a.cos(), self.height, self.radius * a.sin())
    }

    pub fn view_projection(&self, seconds: f32, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(seconds), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far);
        proj * view
    }
}

/// A static scene: flattened geometry plus how to draw it.
#[derive(Debug)]
pub struct Scene {
    pub title: &'static str,
    pub clear: ColorRgba,
    pub style: MeshStyle,
    pub buffer: VertexBuffer,
}

/// Two overlapping triangles, the second half a unit behind the first.
pub fn triangles_scene() -> Result<Scene, BufferError> {
    let front = Triangle::new(
        Vec3::new(0.5, 0.5, 0.0),
        Vec3::new(-0.9, 0.0, 0.0),
        Vec3::new(0.0, -0.9, 0.0),
    );
    let back = Triangle::new(
        Vec3::new(0.0, 0.0, 0.5),
        Vec3::new(0.0, 0.9, 0.5),
        Vec3::new(0.9, 0.0, 0.5),
    );

    let mut buffer = VertexBuffer::new();
    for (tri, color) in [
        (front, Rgb::new(0.9, 0.2, 0.2).with_alpha(0.7)),
        (back, Rgb::new(0.2, 0.3, 0.9).with_alpha(0.7)),
    ] {
        buffer.add_raw(&tri.vertices.map(|v| v.to_array()), &[color.to_array(); 3])?;
    }

    Ok(Scene {
        title: "GoChi - triangles",
        clear: ColorRgba::rgb(0.5, 0.5, 0.5),
        style: MeshStyle::TWO_SIDED_BLENDED,
        buffer,
    })
}

/// Octahedron with one color per vertex.
pub fn octahedron_scene() -> Result<Scene, BufferError> {
    let positions: Vec<[f32; 3]> = shapes::octahedron()
        .iter()
        .flat_map(|t| t.vertices)
        .map(|v| v.to_array())
        .collect();
    let colors: Vec<[f32; 4]> = shapes::OCTAHEDRON_COLORS
        .iter()
        .map(|&[r, g, b]| Rgba::new(r, g, b, 1.0).to_array())
        .collect();

    let mut buffer = VertexBuffer::new();
    buffer.add_raw(&positions, &colors)?;

    Ok(Scene {
        title: "GoChi - octahedron",
        clear: ColorRgba::rgb(0.0, 0.0, 0.4),
        style: MeshStyle::TWO_SIDED,
        buffer,
    })
}

/// Draws a [`Scene`] from an [`OrbitCamera`] until Escape.
pub struct Tutorial {
    scene: Scene,
    camera: OrbitCamera,
    renderer: MeshRenderer,
}

impl Tutorial {
    pub fn new(scene: Scene, camera: OrbitCamera) -> Self {
        let renderer = MeshRenderer::new(scene.style);
        Self { scene, camera, renderer }
    }

    /// Opens the window and blocks until it closes.
    pub fn run(self) -> Result<()> {
        let config = RuntimeConfig {
            title: self.scene.title.to_string(),
            ..RuntimeConfig::default()
        };
        Runtime::run(config, GpuInit::default(), self)
    }
}

impl App for Tutorial {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        let mvp = self.camera.view_projection(ctx.time.elapsed, ctx.aspect());
        let (scene, renderer) = (&self.scene, &mut self.renderer);
        ctx.render(scene.clear, |rctx, target| {
            let mesh = Mesh::new(scene.buffer.positions(), scene.buffer.colors());
            renderer.render(rctx, target, mvp, &mesh);
        })
    }
}

/// Shared `main` body: logging, run, report.
pub fn main_with(scene: Result<Scene, BufferError>) {
    init_logging(LoggingConfig::default());

    let result = scene
        .map_err(anyhow::Error::from)
        .and_then(|scene| Tutorial::new(scene, OrbitCamera::default()).run());

    if let Err(err) = result {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── camera ────────────────────────────────────────────────────────────

    #[test]
    fn camera_starts_on_positive_x() {
        let cam = OrbitCamera::default();
        assert!((cam.eye(0.0) - Vec3::new(2.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn camera_keeps_radius_and_height() {
        let cam = OrbitCamera::default();
        for t in [0.5, 3.0, 17.0] {
            let e = cam.eye(t);
            assert!((Vec3::new(e.x, 0.0, e.z).length() - 2.0).abs() < 1e-5);
            assert_eq!(e.y, 2.0);
        }
    }

    #[test]
    fn origin_projects_to_center() {
        let clip = OrbitCamera::default().view_projection(1.0, 4.0 / 3.0) * Vec3::ZERO.extend(1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }

    // ── scenes ────────────────────────────────────────────────────────────

    #[test]
    fn triangles_scene_has_two_translucent_triangles() {
        let scene = triangles_scene().unwrap();
        assert_eq!(scene.buffer.triangle_count(), 2);
        assert_eq!(scene.buffer.positions()[3], [0.0, 0.0, 0.5]);
        assert!(scene.buffer.colors().iter().all(|c| c[3] < 1.0));
        assert!(scene.style.alpha_blend && !scene.style.cull_back_faces);
    }

    #[test]
    fn near_triangle_is_drawn_first() {
        let scene = triangles_scene().unwrap();
        let p = scene.buffer.positions();
        assert!(p[..3].iter().all(|v| v[2] == 0.0));
        assert!(p[3..].iter().all(|v| v[2] == 0.5));
    }

    #[test]
    fn octahedron_scene_uses_per_vertex_colors() {
        let scene = octahedron_scene().unwrap();
        assert_eq!(scene.buffer.vertex_count(), 24);
        assert_eq!(scene.buffer.slot_count(), 1);
        assert_eq!(scene.buffer.colors()[1], [0.1, 0.8, 0.1, 1.0]);
        assert_eq!(scene.clear, ColorRgba::rgb(0.0, 0.0, 0.4));
    }
}
