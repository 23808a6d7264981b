use super::utils;
use glamx::Vec3;

/// Geometric description of a triangle mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderMesh {
    /// Coordinates of the mesh vertices.
    pub coords: Vec<Vec3>,
    /// Per-vertex normals.
    pub normals: Option<Vec<Vec3>>,
    /// Index buffer of the mesh, counterclockwise triangles.
    pub indices: Vec<[u32; 3]>,
}

impl RenderMesh {
    /// Creates a new `RenderMesh`.
    ///
    /// If no `indices` is provided, trivial, sequential indices are generated.
    pub fn new(
        coords: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        indices: Option<Vec<[u32; 3]>>,
    ) -> RenderMesh {
        let indices = indices.unwrap_or_else(|| {
            (0..coords.len() / 3)
                .map(|i| [i as u32 * 3, i as u32 * 3 + 1, i as u32 * 3 + 2])
                .collect()
        });

        RenderMesh {
            coords,
            normals,
            indices,
        }
    }

    /// Whether or not this triangle mesh has normals.
    #[inline]
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// The number of triangles on this mesh.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len()
    }

    /// The three corners of the `i`-th triangle.
    #[inline]
    pub fn triangle(&self, i: usize) -> [Vec3; 3] {
        let [a, b, c] = self.indices[i];
        [
            self.coords[a as usize],
            self.coords[b as usize],
            self.coords[c as usize],
        ]
    }

    /// Recomputes the mesh normals using its vertex coordinates and adjacency information
    /// inferred from the index buffer.
    #[inline]
    pub fn recompute_normals(&mut self) {
        let mut new_normals = Vec::new();
        utils::compute_normals(&self.coords[..], &self.indices[..], &mut new_normals);
        self.normals = Some(new_normals);
    }

    /// Flips the orientation of every triangle of this mesh.
    #[inline]
    pub fn flip_triangles(&mut self) {
        for i in self.indices.iter_mut() {
            i.swap(1, 2);
        }
    }

    /// Scales each vertex of this mesh uniformly.
    #[inline]
    pub fn scale_by_scalar(&mut self, s: f32) {
        for c in self.coords.iter_mut() {
            *c *= s;
        }
    }

    /// Radius of the smallest origin-centered sphere containing every vertex.
    pub fn bounding_radius(&self) -> f32 {
        self.coords
            .iter()
            .map(|c| c.length())
            .fold(0.0, f32::max)
    }
}
