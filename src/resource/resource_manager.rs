//! Ownership and disposal of geometries and materials.

use crate::resource::{Geometry, Material};
use std::collections::HashMap;

/// Handle to a [`Geometry`] owned by a [`ResourceManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(u32);

/// Handle to a [`Material`] owned by a [`ResourceManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(u32);

/// Owns every live geometry and material.
///
/// Handles are never reused, so a stale handle kept by a discarded scene
/// resolves to `None` instead of aliasing a newer resource. Resources stay
/// alive until explicitly disposed.
#[derive(Default)]
pub struct ResourceManager {
    geometries: HashMap<GeometryHandle, Geometry>,
    materials: HashMap<MaterialHandle, Material>,
    next_geometry: u32,
    next_material: u32,
}

impl ResourceManager {
    /// Creates an empty resource manager.
    pub fn new() -> ResourceManager {
        ResourceManager::default()
    }

    /// Registers a geometry.
    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryHandle {
        let handle = GeometryHandle(self.next_geometry);
        self.next_geometry += 1;
        let _ = self.geometries.insert(handle, geometry);
        handle
    }

    /// Registers a material.
    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        let handle = MaterialHandle(self.next_material);
        self.next_material += 1;
        let _ = self.materials.insert(handle, material);
        handle
    }

    /// The geometry behind `handle`, if it is still alive.
    #[inline]
    pub fn geometry(&self, handle: GeometryHandle) -> Option<&Geometry> {
        self.geometries.get(&handle)
    }

    /// The material behind `handle`, if it is still alive.
    #[inline]
    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(&handle)
    }

    /// Mutable access to the material behind `handle`.
    #[inline]
    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(&handle)
    }

    /// Releases a geometry. Returns `false` if it was already released.
    pub fn dispose_geometry(&mut self, handle: GeometryHandle) -> bool {
        self.geometries.remove(&handle).is_some()
    }

    /// Releases a material. Returns `false` if it was already released.
    pub fn dispose_material(&mut self, handle: MaterialHandle) -> bool {
        self.materials.remove(&handle).is_some()
    }

    /// Number of geometries currently alive.
    #[inline]
    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    /// Number of materials currently alive.
    #[inline]
    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::procedural;

    #[test]
    fn disposal_is_idempotent() {
        let mut resources = ResourceManager::new();
        let g = resources.add_geometry(Geometry::new(procedural::icosphere(1.0, 0)));
        let m = resources.add_material(Material::basic(color::WHITE));

        assert_eq!(resources.live_geometries(), 1);
        assert_eq!(resources.live_materials(), 1);

        assert!(resources.dispose_geometry(g));
        assert!(!resources.dispose_geometry(g));
        assert!(resources.dispose_material(m));
        assert!(!resources.dispose_material(m));

        assert_eq!(resources.live_geometries(), 0);
        assert_eq!(resources.live_materials(), 0);
        assert!(resources.geometry(g).is_none());
        assert!(resources.material(m).is_none());
    }

    #[test]
    fn handles_are_not_reused() {
        let mut resources = ResourceManager::new();
        let first = resources.add_material(Material::Null);
        assert!(resources.dispose_material(first));
        let second = resources.add_material(Material::basic(color::RED));
        assert_ne!(first, second);
        assert!(resources.material(first).is_none());
    }
}
