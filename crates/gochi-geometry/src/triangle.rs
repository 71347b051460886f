use glam::{Quat, Vec3};

/// Three vertices forming one drawable facet.
///
/// Front faces wind counter-clockwise when viewed from outside.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
}

impl Triangle {
    #[inline]
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { vertices: [a, b, c] }
    }

    /// Adds `shift` to every vertex.
    #[inline]
    pub fn translate(&mut self, shift: Vec3) {
        for v in &mut self.vertices {
            *v += shift;
        }
    }

    /// Scales every vertex about `pivot`.
    #[inline]
    pub fn scale(&mut self, factor: f32, pivot: Vec3) {
        for v in &mut self.vertices {
            *v = pivot + (*v - pivot) * factor;
        }
    }

    /// Rotates every vertex about `pivot`.
    #[inline]
    pub fn rotate(&mut self, rotation: Quat, pivot: Vec3) {
        for v in &mut self.vertices {
            *v = pivot + rotation * (*v - pivot);
        }
    }

    #[inline]
    pub fn centroid(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (a + b + c) / 3.0
    }

    /// Unit normal of the counter-clockwise front face.
    ///
    /// Degenerate triangles yield `Vec3::ZERO`.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a).normalize_or_zero()
    }

    /// Flips the winding (and thus the facing) of the triangle.
    #[inline]
    pub fn flipped(self) -> Self {
        let [a, b, c] = self.vertices;
        Self::new(a, c, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    fn unit() -> Triangle {
        Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y)
    }

    // ── translate / scale / rotate ────────────────────────────────────────

    #[test]
    fn translate_moves_all_vertices() {
        let mut t = unit();
        t.translate(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.vertices[0], Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.vertices[1], Vec3::new(2.0, 2.0, 3.0));
        assert_eq!(t.vertices[2], Vec3::new(1.0, 3.0, 3.0));
    }

    #[test]
    fn scale_about_pivot_keeps_pivot_fixed() {
        let mut t = unit();
        t.scale(2.0, Vec3::ZERO);
        assert_eq!(t.vertices[0], Vec3::ZERO);
        assert_eq!(t.vertices[1], Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(t.vertices[2], Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn rotate_quarter_turn_about_z() {
        let mut t = unit();
        t.rotate(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2), Vec3::ZERO);
        assert!(approx(t.vertices[1], Vec3::Y));
        assert!(approx(t.vertices[2], -Vec3::X));
    }

    // ── normal ────────────────────────────────────────────────────────────

    #[test]
    fn ccw_in_xy_plane_faces_plus_z() {
        assert!(approx(unit().normal(), Vec3::Z));
        assert!(approx(unit().flipped().normal(), -Vec3::Z));
    }

    #[test]
    fn degenerate_normal_is_zero() {
        let t = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(t.normal(), Vec3::ZERO);
    }

    #[test]
    fn centroid_is_vertex_mean() {
        let t = Triangle::new(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0));
        assert!(approx(t.centroid(), Vec3::new(1.0, 1.0, 0.0)));
    }
}
