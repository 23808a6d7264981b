use super::utils::MidpointCache;
use super::RenderMesh;
use glamx::Vec3;

/// Maximum subdivision level accepted by [`icosphere`].
pub const MAX_ICOSPHERE_DETAIL: u32 = 4;

/// Generates an icosahedron-based sphere of the given radius.
///
/// Each `detail` level splits every face in four, so the mesh has
/// `20 * 4^detail` triangles. `detail` is clamped to
/// [`MAX_ICOSPHERE_DETAIL`]; `detail == 0` is a plain icosahedron.
///
/// # Example
/// ```
/// # use glowfield::procedural::icosphere;
/// let mesh = icosphere(1.0, 1);
/// assert_eq!(mesh.num_triangles(), 80);
/// ```
pub fn icosphere(radius: f32, detail: u32) -> RenderMesh {
    let mut mesh = unit_icosphere(detail);
    mesh.scale_by_scalar(radius);
    mesh
}

/// Generates an icosphere of radius 1.
pub fn unit_icosphere(detail: u32) -> RenderMesh {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;

    let mut coords: Vec<Vec3> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .iter()
    .map(|p| Vec3::from_array(*p).normalize())
    .collect();

    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..detail.min(MAX_ICOSPHERE_DETAIL) {
        let mut cache = MidpointCache::default();
        let mut subdivided = Vec::with_capacity(faces.len() * 4);

        for [a, b, c] in faces {
            let ab = cache.midpoint(a, b, &mut coords);
            let bc = cache.midpoint(b, c, &mut coords);
            let ca = cache.midpoint(c, a, &mut coords);

            subdivided.push([a, ab, ca]);
            subdivided.push([b, bc, ab]);
            subdivided.push([c, ca, bc]);
            subdivided.push([ab, bc, ca]);
        }

        faces = subdivided;
    }

    // Every vertex of a unit sphere is its own normal.
    let normals = coords.clone();
    RenderMesh::new(coords, Some(normals), Some(faces))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn triangle_count_grows_by_four_per_level() {
        for detail in 0..=3 {
            let mesh = icosphere(1.0, detail);
            assert_eq!(mesh.num_triangles(), 20 * 4usize.pow(detail));
        }
    }

    #[test]
    fn detail_is_clamped() {
        let capped = unit_icosphere(MAX_ICOSPHERE_DETAIL);
        let over = unit_icosphere(MAX_ICOSPHERE_DETAIL + 3);
        assert_eq!(capped.num_triangles(), over.num_triangles());
    }

    #[test]
    fn vertices_lie_on_the_sphere() {
        let mesh = icosphere(2.5, 2);
        for c in &mesh.coords {
            assert_relative_eq!(c.length(), 2.5, epsilon = 1.0e-4);
        }
        assert_relative_eq!(mesh.bounding_radius(), 2.5, epsilon = 1.0e-4);
    }

    #[test]
    fn faces_point_outward() {
        let mesh = unit_icosphere(1);
        for i in 0..mesh.num_triangles() {
            let [a, b, c] = mesh.triangle(i);
            let n = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(n.dot(centroid) > 0.0, "triangle {} is inward facing", i);
        }
    }

    #[test]
    fn subdivision_shares_vertices() {
        // 12 + 30 edge midpoints for the first level.
        assert_eq!(unit_icosphere(1).coords.len(), 42);
    }
}
