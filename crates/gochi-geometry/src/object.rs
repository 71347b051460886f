use glam::{Quat, Vec3};

use crate::color::Rgb;
use crate::shapes;
use crate::Triangle;

/// What an [`Object`] represents in the scene.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShapeKind {
    Floor,
    Fireball,
    Target,
    Shard,
    /// Anything built from raw triangles.
    Custom,
}

/// A rigid collection of triangles sharing one flat color.
///
/// Built once by a shape constructor and afterwards only moved as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    kind: ShapeKind,
    triangles: Vec<Triangle>,
    color: Rgb,
}

impl Object {
    pub fn new(kind: ShapeKind, triangles: Vec<Triangle>, color: Rgb) -> Self {
        Self { kind, triangles, color }
    }

    pub fn floor(half_extent: f32, color: Rgb) -> Self {
        Self::new(ShapeKind::Floor, shapes::floor(half_extent), color)
    }

    pub fn fireball(center: Vec3, radius: f32, stacks: u32, sectors: u32, color: Rgb) -> Self {
        Self::new(
            ShapeKind::Fireball,
            shapes::uv_sphere(center, radius, stacks, sectors),
            color,
        )
    }

    pub fn target(center: Vec3, size: f32, color: Rgb) -> Self {
        Self::new(ShapeKind::Target, shapes::cube(center, size), color)
    }

    pub fn shard(center: Vec3, size: f32, color: Rgb) -> Self {
        Self::new(ShapeKind::Shard, shapes::tetrahedron(center, size), color)
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// Iterates vertices in buffer order.
    pub fn vertices(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.triangles.iter().flat_map(|t| t.vertices)
    }

    pub fn translate(&mut self, shift: Vec3) {
        for t in &mut self.triangles {
            t.translate(shift);
        }
    }

    /// Scales about the object's center.
    pub fn scale(&mut self, factor: f32) {
        let pivot = self.center();
        for t in &mut self.triangles {
            t.scale(factor, pivot);
        }
    }

    /// Rotates about the object's center.
    pub fn rotate(&mut self, rotation: Quat) {
        let pivot = self.center();
        for t in &mut self.triangles {
            t.rotate(rotation, pivot);
        }
    }

    /// Mean of all vertices; the origin for an empty object.
    pub fn center(&self) -> Vec3 {
        let n = self.vertex_count();
        if n == 0 {
            return Vec3::ZERO;
        }
        self.vertices().sum::<Vec3>() / n as f32
    }

    /// Largest vertex distance from [`center`](Self::center).
    pub fn bounding_radius(&self) -> f32 {
        let c = self.center();
        self.vertices().map(|v| v.distance(c)).fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn constructors_tag_kind() {
        assert_eq!(Object::floor(5.0, RED).kind(), ShapeKind::Floor);
        assert_eq!(Object::target(Vec3::ZERO, 1.0, RED).kind(), ShapeKind::Target);
        assert_eq!(Object::fireball(Vec3::ZERO, 1.0, 4, 6, RED).kind(), ShapeKind::Fireball);
        assert_eq!(Object::shard(Vec3::ZERO, 1.0, RED).kind(), ShapeKind::Shard);
    }

    #[test]
    fn target_center_and_radius() {
        let c = Vec3::new(3.0, 1.0, -2.0);
        let o = Object::target(c, 2.0, RED);
        assert!((o.center() - c).length() < 1e-5);
        assert!((o.bounding_radius() - 3f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn empty_object_is_centered_at_origin() {
        let o = Object::new(ShapeKind::Custom, Vec::new(), RED);
        assert_eq!(o.center(), Vec3::ZERO);
        assert_eq!(o.bounding_radius(), 0.0);
        assert_eq!(o.vertex_count(), 0);
    }

    // ── transforms ────────────────────────────────────────────────────────

    #[test]
    fn translate_moves_center_by_shift() {
        let mut o = Object::fireball(Vec3::ZERO, 0.5, 6, 8, RED);
        let before = o.center();
        o.translate(Vec3::new(0.0, 0.0, -3.0));
        assert!((o.center() - (before + Vec3::new(0.0, 0.0, -3.0))).length() < 1e-5);
    }

    #[test]
    fn scale_keeps_center_and_grows_radius() {
        let c = Vec3::new(1.0, 1.0, 1.0);
        let mut o = Object::target(c, 1.0, RED);
        let r = o.bounding_radius();
        o.scale(3.0);
        assert!((o.center() - c).length() < 1e-5);
        assert!((o.bounding_radius() - r * 3.0).abs() < 1e-4);
    }

    #[test]
    fn rotate_keeps_center() {
        let c = Vec3::new(-1.0, 2.0, 0.5);
        let mut o = Object::target(c, 1.0, RED);
        o.rotate(Quat::from_rotation_y(0.7));
        assert!((o.center() - c).length() < 1e-5);
    }
}
