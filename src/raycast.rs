//! Picking drawables under the pointer.

use crate::camera::Camera3d;
use crate::resource::ResourceManager;
use crate::scene::{Layers, NodeId, Scene};
use glamx::{Vec2, Vec3};

/// A half-line with a unit direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Creates a ray; `dir` is normalized.
    pub fn new(origin: Vec3, dir: Vec3) -> Ray {
        Ray {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    /// The point at distance `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Distance to the first hit of the sphere, if any.
    ///
    /// An origin inside the sphere counts as a hit at distance 0.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        if c <= 0.0 {
            return Some(0.0);
        }

        let disc = b * b - c;
        if disc < 0.0 || b > 0.0 {
            return None;
        }
        Some(-b - disc.sqrt())
    }

    /// Möller-Trumbore intersection with a counterclockwise triangle, seen
    /// from its front side.
    ///
    /// Edges are slightly widened so that rays through a shared edge or vertex
    /// never slip between adjacent triangles.
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        const EPS: f32 = 1.0e-7;
        const EDGE_TOLERANCE: f32 = 1.0e-5;

        let e1 = b - a;
        let e2 = c - a;
        let p = self.dir.cross(e2);
        let det = e1.dot(p);
        if det < EPS {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&u) {
            return None;
        }

        let q = s.cross(e1);
        let v = self.dir.dot(q) * inv_det;
        if v < -EDGE_TOLERANCE || u + v > 1.0 + EDGE_TOLERANCE {
            return None;
        }

        let t = e2.dot(q) * inv_det;
        (t > EPS).then_some(t)
    }
}

/// One hit of a [`Raycaster`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// The drawable hit.
    pub node: NodeId,
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Casts rays against the drawables of a scene.
#[derive(Clone, Debug)]
pub struct Raycaster {
    ray: Ray,
    near: f32,
    far: f32,
    layers: Layers,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self::new(Ray::new(Vec3::ZERO, -Vec3::Z))
    }
}

impl Raycaster {
    /// A raycaster testing every layer, with no distance limit.
    pub fn new(ray: Ray) -> Raycaster {
        Raycaster {
            ray,
            near: 0.0,
            far: f32::INFINITY,
            layers: Layers::all(),
        }
    }

    /// The current ray.
    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    /// Replaces the ray.
    pub fn set_ray(&mut self, ray: Ray) {
        self.ray = ray;
    }

    /// Restricts hits to distances in `[near, far]`.
    pub fn set_range(&mut self, near: f32, far: f32) {
        self.near = near.max(0.0);
        self.far = far.max(self.near);
    }

    /// Only drawables intersecting `layers` are tested.
    pub fn set_layers(&mut self, layers: Layers) {
        self.layers = layers;
    }

    /// Aims the ray through `ndc` (both axes in `[-1, 1]`, `y` upward).
    pub fn set_from_camera(&mut self, ndc: Vec2, camera: &dyn Camera3d) {
        let (origin, dir) = camera.unproject_ndc(ndc);
        self.ray = Ray::new(origin, dir);
    }

    /// Every visible drawable hit by the ray, nearest first.
    ///
    /// Drawables are first rejected against their bounding sphere. Only the
    /// nearest hit of each drawable is reported.
    pub fn intersect(&self, scene: &Scene, resources: &ResourceManager) -> Vec<Intersection> {
        let mut hits = Vec::new();

        scene.visit_visible(|node, world| {
            let Some(drawable) = node.drawable() else {
                return;
            };
            if !node.layers().test(self.layers) {
                return;
            }
            let Some(geometry) = resources.geometry(drawable.geometry) else {
                return;
            };

            let radius = geometry.bounding_radius() * world.max_scale();
            if self.ray.intersect_sphere(world.position, radius).is_none() {
                return;
            }

            let mesh = geometry.mesh();
            let nearest = (0..mesh.num_triangles())
                .filter_map(|i| {
                    let [a, b, c] = mesh.triangle(i);
                    self.ray.intersect_triangle(
                        world.transform_point(a),
                        world.transform_point(b),
                        world.transform_point(c),
                    )
                })
                .filter(|t| *t >= self.near && *t <= self.far)
                .min_by(|a, b| a.total_cmp(b));

            if let Some(distance) = nearest {
                hits.push(Intersection {
                    node: node.id(),
                    distance,
                    point: self.ray.at(distance),
                });
            }
        });

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// The nearest hit, if any.
    pub fn intersect_first(&self, scene: &Scene, resources: &ResourceManager) -> Option<Intersection> {
        self.intersect(scene, resources).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PerspectiveCamera;
    use crate::color;
    use crate::procedural;
    use crate::resource::{Geometry, Material};
    use approx::assert_relative_eq;

    fn row_of_spheres() -> (Scene, ResourceManager, Vec<NodeId>) {
        let mut scene = Scene::new();
        let mut resources = ResourceManager::new();
        let g = resources.add_geometry(Geometry::new(procedural::icosphere(0.5, 2)));
        let m = resources.add_material(Material::basic(color::WHITE));

        let ids = [-4.0, -1.0, 2.0]
            .into_iter()
            .map(|z| {
                let node = scene.create_drawable(g, m).with_position(Vec3::new(0.0, 0.0, z));
                scene.add(node)
            })
            .collect();
        (scene, resources, ids)
    }

    #[test]
    fn sphere_hits_and_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        assert_relative_eq!(ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap(), 4.0);
        assert!(ray.intersect_sphere(Vec3::new(3.0, 0.0, 0.0), 1.0).is_none());
        assert!(ray.intersect_sphere(Vec3::new(0.0, 0.0, 8.0), 1.0).is_none());
    }

    #[test]
    fn triangle_back_faces_are_ignored() {
        let (a, b, c) = (
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let front = Ray::new(Vec3::new(0.0, 0.0, 2.0), -Vec3::Z);
        let back = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);

        assert_relative_eq!(front.intersect_triangle(a, b, c).unwrap(), 2.0);
        assert!(back.intersect_triangle(a, b, c).is_none());
    }

    #[test]
    fn hits_are_sorted_by_distance() {
        let (scene, resources, ids) = row_of_spheres();
        let raycaster = Raycaster::new(Ray::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z));

        let hits = raycaster.intersect(&scene, &resources);
        let order: Vec<NodeId> = hits.iter().map(|h| h.node).collect();
        assert_eq!(order, vec![ids[2], ids[1], ids[0]]);
        assert_relative_eq!(hits[0].distance, 7.5, epsilon = 1.0e-3);
        assert_relative_eq!(hits[0].point.z, 2.5, epsilon = 1.0e-3);
    }

    #[test]
    fn range_and_visibility_filter_hits() {
        let (mut scene, resources, ids) = row_of_spheres();
        scene.node_mut(ids[2]).unwrap().set_visible(false);

        let mut raycaster = Raycaster::new(Ray::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z));
        raycaster.set_range(0.0, 12.0);

        let hits = raycaster.intersect(&scene, &resources);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, ids[1]);
    }

    #[test]
    fn camera_rays_go_through_the_screen_center() {
        let (scene, resources, ids) = row_of_spheres();
        let mut camera = PerspectiveCamera::default();
        camera.look_at_from(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);

        let mut raycaster = Raycaster::default();
        raycaster.set_from_camera(Vec2::ZERO, &camera);
        assert_eq!(raycaster.intersect_first(&scene, &resources).map(|h| h.node), Some(ids[2]));

        raycaster.set_from_camera(Vec2::new(0.9, 0.9), &camera);
        assert!(raycaster.intersect_first(&scene, &resources).is_none());
    }
}
