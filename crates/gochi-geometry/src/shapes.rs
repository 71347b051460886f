//! Parametric tessellations.
//!
//! Every generator returns counter-clockwise, outward-facing triangles unless
//! noted otherwise.

use std::f32::consts::{PI, SQRT_2, TAU};

use glam::Vec3;

use crate::Triangle;

/// Two triangles spanning `[-half_extent, half_extent]²` on the `y = 0` plane,
/// facing `+Y`.
pub fn floor(half_extent: f32) -> Vec<Triangle> {
    let h = half_extent;
    vec![
        Triangle::new(Vec3::new(-h, 0.0, -h), Vec3::new(h, 0.0, h), Vec3::new(h, 0.0, -h)),
        Triangle::new(Vec3::new(h, 0.0, h), Vec3::new(-h, 0.0, -h), Vec3::new(-h, 0.0, h)),
    ]
}

/// Axis-aligned cube with edge length `size`, 12 triangles.
pub fn cube(center: Vec3, size: f32) -> Vec<Triangle> {
    // (normal, u, v) with u × v == normal.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let h = size * 0.5;
    let mut out = Vec::with_capacity(12);
    for (n, u, v) in FACES {
        let p0 = center + (n - u - v) * h;
        let p1 = center + (n + u - v) * h;
        let p2 = center + (n + u + v) * h;
        let p3 = center + (n - u + v) * h;
        out.push(Triangle::new(p0, p1, p2));
        out.push(Triangle::new(p0, p2, p3));
    }
    out
}

/// UV sphere with `stacks` latitude bands and `sectors` longitude slices.
///
/// Pole bands contribute one triangle per sector, so the result holds
/// `2 * sectors * (stacks - 1)` triangles. `stacks` is raised to at least 2
/// and `sectors` to at least 3.
pub fn uv_sphere(center: Vec3, radius: f32, stacks: u32, sectors: u32) -> Vec<Triangle> {
    let stacks = stacks.max(2);
    let sectors = sectors.max(3);

    let point = |i: u32, j: u32| -> Vec3 {
        let phi = PI * i as f32 / stacks as f32;
        let theta = TAU * (j % sectors) as f32 / sectors as f32;
        center
            + Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                -radius * phi.sin() * theta.sin(),
            )
    };

    let mut out = Vec::with_capacity((2 * sectors * (stacks - 1)) as usize);
    for i in 0..stacks {
        for j in 0..sectors {
            let k1 = point(i, j);
            let k1n = point(i, j + 1);
            let k2 = point(i + 1, j);
            let k2n = point(i + 1, j + 1);

            if i != 0 {
                out.push(Triangle::new(k1, k2n, k1n));
            }
            if i != stacks - 1 {
                out.push(Triangle::new(k1, k2, k2n));
            }
        }
    }
    out
}

/// Regular tetrahedron inscribed in a cube of edge `size`.
pub fn tetrahedron(center: Vec3, size: f32) -> Vec<Triangle> {
    let h = size * 0.5;
    let corners = [
        center + Vec3::new(h, h, h),
        center + Vec3::new(h, -h, -h),
        center + Vec3::new(-h, h, -h),
        center + Vec3::new(-h, -h, h),
    ];

    [[1, 2, 3], [0, 3, 2], [0, 1, 3], [0, 2, 1]]
        .into_iter()
        .map(|[a, b, c]| {
            let t = Triangle::new(corners[a], corners[b], corners[c]);
            if t.normal().dot(t.centroid() - center) < 0.0 { t.flipped() } else { t }
        })
        .collect()
}

/// Octahedron with a square equator at `±1` and poles at `z = ±√2`.
///
/// Face order and winding match [`OCTAHEDRON_COLORS`]; the lower half winds
/// the same way as the upper half, so draw it with culling disabled.
pub fn octahedron() -> Vec<Triangle> {
    let h = SQRT_2;
    let ring = [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
    ];

    let mut out = Vec::with_capacity(8);
    for pole in [Vec3::new(0.0, 0.0, h), Vec3::new(0.0, 0.0, -h)] {
        for i in 0..4 {
            out.push(Triangle::new(ring[i], ring[(i + 1) % 4], pole));
        }
    }
    out
}

/// Per-vertex colors for [`octahedron`], three per face.
pub const OCTAHEDRON_COLORS: [[f32; 3]; 24] = [
    [0.3, 0.3, 0.3], [0.1, 0.8, 0.1], [0.8, 0.8, 0.8],
    [0.3, 0.8, 0.3], [0.5, 0.05, 0.2], [0.8, 0.8, 0.8],
    [0.5, 0.2, 0.05], [0.2, 0.5, 0.7], [0.8, 0.8, 0.8],
    [0.0, 0.7, 0.7], [0.3, 0.3, 0.3], [0.8, 0.8, 0.8],
    [0.3, 0.3, 0.3], [0.2, 0.8, 0.2], [0.2, 0.2, 0.2],
    [0.4, 0.8, 0.4], [0.5, 0.15, 0.10], [0.2, 0.2, 0.2],
    [0.5, 0.10, 0.15], [0.5, 0.7, 0.0], [0.2, 0.2, 0.2],
    [0.5, 0.7, 0.0], [0.3, 0.3, 0.3], [0.2, 0.2, 0.2],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn outward(tris: &[Triangle], center: Vec3) -> bool {
        tris.iter().all(|t| t.normal().dot(t.centroid() - center) > 0.0)
    }

    // ── floor ─────────────────────────────────────────────────────────────

    #[test]
    fn floor_is_two_upward_triangles_on_ground() {
        let f = floor(5.0);
        assert_eq!(f.len(), 2);
        for t in &f {
            assert!(t.vertices.iter().all(|v| v.y == 0.0));
            assert!((t.normal() - Vec3::Y).length() < 1e-6);
        }
    }

    // ── cube ──────────────────────────────────────────────────────────────

    #[test]
    fn cube_has_twelve_outward_faces() {
        let c = Vec3::new(1.0, 2.0, 3.0);
        let tris = cube(c, 2.0);
        assert_eq!(tris.len(), 12);
        assert!(outward(&tris, c));
    }

    #[test]
    fn cube_vertices_lie_on_the_box() {
        let tris = cube(Vec3::ZERO, 2.0);
        for v in tris.iter().flat_map(|t| t.vertices) {
            assert_eq!(v.abs(), Vec3::ONE);
        }
    }

    // ── uv_sphere ─────────────────────────────────────────────────────────

    #[test]
    fn sphere_triangle_count() {
        assert_eq!(uv_sphere(Vec3::ZERO, 1.0, 8, 12).len(), 2 * 12 * 7);
        assert_eq!(uv_sphere(Vec3::ZERO, 1.0, 2, 3).len(), 2 * 3);
    }

    #[test]
    fn sphere_degenerate_params_are_raised() {
        assert_eq!(uv_sphere(Vec3::ZERO, 1.0, 0, 0).len(), 2 * 3);
    }

    #[test]
    fn sphere_vertices_on_surface_and_outward() {
        let c = Vec3::new(0.0, 1.0, -4.0);
        let tris = uv_sphere(c, 0.5, 6, 10);
        for v in tris.iter().flat_map(|t| t.vertices) {
            assert!(((v - c).length() - 0.5).abs() < 1e-5);
        }
        assert!(outward(&tris, c));
    }

    // ── tetrahedron / octahedron ──────────────────────────────────────────

    #[test]
    fn tetrahedron_faces_outward() {
        let c = Vec3::new(-2.0, 0.5, 1.0);
        let tris = tetrahedron(c, 0.3);
        assert_eq!(tris.len(), 4);
        assert!(outward(&tris, c));
    }

    #[test]
    fn octahedron_matches_color_table() {
        let tris = octahedron();
        assert_eq!(tris.len() * 3, OCTAHEDRON_COLORS.len());
        assert_eq!(tris[0].vertices[2].z, SQRT_2);
        assert_eq!(tris[7].vertices[2].z, -SQRT_2);
    }
}
