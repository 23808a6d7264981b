//! Immutable, shareable mesh shapes.

use crate::procedural::RenderMesh;

/// A triangle mesh shared by every drawable that references it.
///
/// Geometry never changes after creation; drawables hold a
/// [`GeometryHandle`](crate::resource::GeometryHandle) to it.
#[derive(Clone, Debug)]
pub struct Geometry {
    mesh: RenderMesh,
    bounding_radius: f32,
}

impl Geometry {
    /// Wraps a render mesh, computing its normals if they are missing.
    pub fn new(mut mesh: RenderMesh) -> Geometry {
        if !mesh.has_normals() {
            mesh.recompute_normals();
        }

        let bounding_radius = mesh.bounding_radius();
        Geometry {
            mesh,
            bounding_radius,
        }
    }

    /// The underlying mesh.
    #[inline]
    pub fn mesh(&self) -> &RenderMesh {
        &self.mesh
    }

    /// Radius of the origin-centered sphere enclosing the geometry, in local units.
    #[inline]
    pub fn bounding_radius(&self) -> f32 {
        self.bounding_radius
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.mesh.num_triangles()
    }
}
