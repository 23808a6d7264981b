//! A scanline-free, edge-function triangle rasterizer writing HDR colors.

use crate::camera::Camera3d;
use crate::color::Color;
use crate::light::LightCollection;
use crate::procedural::RenderMesh;
use crate::renderer::Renderer3d;
use crate::resource::{Material, RenderTarget, ResourceManager};
use crate::scene::{Layers, Scene, WorldTransform};
use glamx::{Mat4, Vec2, Vec3, Vec4};

/// Statistics about the last frame rendered by a [`Rasterizer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Drawables submitted.
    pub drawables: usize,
    /// Triangles that survived culling and clipping.
    pub triangles: usize,
    /// Fragments that passed the depth test.
    pub fragments: usize,
}

#[derive(Clone, Copy)]
struct ClipVertex {
    pos: Vec4,
    color: Vec3,
}

/// Software renderer: perspective-correct, depth-tested, Gouraud-shaded.
///
/// Lit materials are shaded per vertex from the scene lights. The
/// [`Material::Null`] material writes black and still fills the depth
/// buffer, so it hides whatever lies behind it.
pub struct Rasterizer {
    cull_back_faces: bool,
    clear_color: Option<Color>,
    stats: RenderStats,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    /// Creates a rasterizer with back-face culling enabled.
    pub fn new() -> Rasterizer {
        Rasterizer {
            cull_back_faces: true,
            clear_color: None,
            stats: RenderStats::default(),
        }
    }

    /// Overrides the color targets are cleared to. `None` uses the scene
    /// background.
    pub fn set_clear_color(&mut self, clear_color: Option<Color>) {
        self.clear_color = clear_color;
    }

    /// Enables or disables back-face culling.
    pub fn set_backface_culling(&mut self, enabled: bool) {
        self.cull_back_faces = enabled;
    }

    /// Statistics about the last call to `render`.
    #[inline]
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    fn draw_mesh(
        &mut self,
        mesh: &RenderMesh,
        world: &WorldTransform,
        material: &Material,
        lights: &LightCollection,
        eye: Vec3,
        clip_from_world: &Mat4,
        target: &mut RenderTarget,
    ) {
        let inv_scale = world.scale.recip();

        for (i, face) in mesh.indices.iter().enumerate() {
            let [a, b, c] = mesh.triangle(i);
            let wa = world.transform_point(a);
            let wb = world.transform_point(b);
            let wc = world.transform_point(c);

            let face_normal = (wb - wa).cross(wc - wa);
            if self.cull_back_faces && face_normal.dot(wa - eye) >= 0.0 {
                continue;
            }
            let face_normal = face_normal.normalize_or_zero();

            let mut corners = [
                ClipVertex {
                    pos: Vec4::ZERO,
                    color: Vec3::ZERO,
                },
                ClipVertex {
                    pos: Vec4::ZERO,
                    color: Vec3::ZERO,
                },
                ClipVertex {
                    pos: Vec4::ZERO,
                    color: Vec3::ZERO,
                },
            ];

            for (k, (world_pos, vid)) in [(wa, face[0]), (wb, face[1]), (wc, face[2])]
                .into_iter()
                .enumerate()
            {
                let normal = mesh
                    .normals
                    .as_ref()
                    .map(|n| (n[vid as usize] * inv_scale).normalize_or_zero())
                    .unwrap_or(face_normal);

                corners[k] = ClipVertex {
                    pos: *clip_from_world * world_pos.extend(1.0),
                    color: shade(material, lights, world_pos, normal),
                };
            }

            let polygon = clip_near(&corners);
            if polygon.len() < 3 {
                continue;
            }

            for k in 1..polygon.len() - 1 {
                self.stats.triangles += 1;
                self.fill(&polygon[0], &polygon[k], &polygon[k + 1], target);
            }
        }
    }

    fn fill(&mut self, v0: &ClipVertex, v1: &ClipVertex, v2: &ClipVertex, target: &mut RenderTarget) {
        let (w, h) = target.size();
        let to_screen = |v: &ClipVertex| {
            let inv_w = 1.0 / v.pos.w;
            let ndc = v.pos.truncate() * inv_w;
            (
                Vec2::new((ndc.x + 1.0) * 0.5 * w as f32, (1.0 - ndc.y) * 0.5 * h as f32),
                ndc.z,
                inv_w,
            )
        };

        let (p0, z0, iw0) = to_screen(v0);
        let (p1, z1, iw1) = to_screen(v1);
        let (p2, z2, iw2) = to_screen(v2);

        let area = edge(p0, p1, p2);
        if area.abs() <= f32::EPSILON {
            return;
        }

        let min = p0.min(p1).min(p2).floor().max(Vec2::ZERO);
        let max = p0.max(p1).max(p2).ceil().min(Vec2::new(w as f32, h as f32));
        if min.x >= max.x || min.y >= max.y {
            return;
        }

        let c0 = v0.color * iw0;
        let c1 = v1.color * iw1;
        let c2 = v2.color * iw2;

        for y in min.y as u32..max.y as u32 {
            for x in min.x as u32..max.x as u32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let b0 = edge(p1, p2, p) / area;
                let b1 = edge(p2, p0, p) / area;
                let b2 = edge(p0, p1, p) / area;

                if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                    continue;
                }

                let z = b0 * z0 + b1 * z1 + b2 * z2;
                if !(-1.0..=1.0).contains(&z) {
                    continue;
                }

                if !target.test_and_set_depth(x, y, z) {
                    continue;
                }

                let inv_w = b0 * iw0 + b1 * iw1 + b2 * iw2;
                let rgb = (c0 * b0 + c1 * b1 + c2 * b2) / inv_w;
                target.set_pixel(x, y, Color::new(rgb.x, rgb.y, rgb.z, 1.0));
                self.stats.fragments += 1;
            }
        }
    }
}

impl Renderer3d for Rasterizer {
    fn render(
        &mut self,
        scene: &Scene,
        camera: &dyn Camera3d,
        resources: &ResourceManager,
        layers: Layers,
        target: &mut RenderTarget,
    ) {
        self.stats = RenderStats::default();
        target.clear(self.clear_color.unwrap_or_else(|| scene.background()));

        let lights = scene.collect_lights();
        let clip_from_world = camera.transformation();
        let eye = camera.eye();

        scene.visit_visible(|node, world| {
            let Some(drawable) = node.drawable() else {
                return;
            };
            if !node.layers().test(layers) {
                return;
            }

            let (Some(geometry), Some(material)) = (
                resources.geometry(drawable.geometry),
                resources.material(drawable.material),
            ) else {
                log::trace!("skipping {:?}: released resource", node.id());
                return;
            };

            self.stats.drawables += 1;
            self.draw_mesh(
                geometry.mesh(),
                world,
                material,
                &lights,
                eye,
                &clip_from_world,
                target,
            );
        });
    }
}

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn shade(material: &Material, lights: &LightCollection, point: Vec3, normal: Vec3) -> Vec3 {
    match *material {
        Material::Basic { color } => Vec3::new(color.r, color.g, color.b),
        Material::Standard {
            color,
            emissive,
            emissive_intensity,
        } => {
            let diffuse = Vec3::new(color.r, color.g, color.b) * lights.irradiance(point, normal);
            diffuse + Vec3::new(emissive.r, emissive.g, emissive.b) * emissive_intensity
        }
        Material::Null => Vec3::ZERO,
    }
}

/// Clips a triangle against the near plane (`z >= -w`), returning a convex polygon.
fn clip_near(triangle: &[ClipVertex; 3]) -> Vec<ClipVertex> {
    let dist = |v: &ClipVertex| v.pos.z + v.pos.w;
    let mut out = Vec::with_capacity(4);

    for i in 0..3 {
        let cur = &triangle[i];
        let next = &triangle[(i + 1) % 3];
        let (dc, dn) = (dist(cur), dist(next));

        if dc >= 0.0 {
            out.push(*cur);
        }
        if (dc >= 0.0) != (dn >= 0.0) {
            let t = dc / (dc - dn);
            out.push(ClipVertex {
                pos: cur.pos + (next.pos - cur.pos) * t,
                color: cur.color + (next.color - cur.color) * t,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PerspectiveCamera;
    use crate::color;
    use crate::procedural;
    use crate::resource::{Geometry, MaterialHandle};
    use crate::scene::NodeId;

    fn single_sphere(material: Material) -> (Scene, ResourceManager, NodeId, MaterialHandle) {
        let mut resources = ResourceManager::new();
        let mut scene = Scene::new();
        scene.set_background(color::BLACK);
        let g = resources.add_geometry(Geometry::new(procedural::icosphere(1.0, 2)));
        let m = resources.add_material(material);
        let node = scene.create_drawable(g, m);
        let id = scene.add(node);
        (scene, resources, id, m)
    }

    fn camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        camera.look_at_from(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
        camera
    }

    #[test]
    fn basic_material_fills_the_center() {
        let (scene, resources, _, _) = single_sphere(Material::basic(color::RED));
        let mut target = RenderTarget::new(32, 32);
        let mut rasterizer = Rasterizer::new();

        rasterizer.render(&scene, &camera(), &resources, Layers::all(), &mut target);

        let center = target.pixel(16, 16);
        assert!((center.r - 1.0).abs() < 1.0e-4);
        assert!(center.g.abs() < 1.0e-4);
        assert_eq!(target.pixel(0, 0), color::BLACK);
        assert_eq!(rasterizer.stats().drawables, 1);
        assert!(rasterizer.stats().fragments > 0);
    }

    #[test]
    fn excluded_layers_are_not_drawn() {
        let (scene, resources, _, _) = single_sphere(Material::basic(color::RED));
        let mut target = RenderTarget::new(16, 16);
        let mut rasterizer = Rasterizer::new();

        rasterizer.render(&scene, &camera(), &resources, Layers::BLOOM, &mut target);

        assert_eq!(target.pixel(8, 8), color::BLACK);
        assert_eq!(rasterizer.stats().drawables, 0);
    }

    #[test]
    fn null_material_occludes_in_black() {
        let (mut scene, mut resources, _, _) = single_sphere(Material::Null);
        scene.set_background(color::WHITE);

        // A bright sphere hidden right behind the null one.
        let g = resources.add_geometry(Geometry::new(procedural::icosphere(0.5, 1)));
        let m = resources.add_material(Material::basic(color::RED));
        let behind = scene
            .create_drawable(g, m)
            .with_position(Vec3::new(0.0, 0.0, -2.0));
        let _ = scene.add(behind);

        let mut target = RenderTarget::new(16, 16);
        Rasterizer::new().render(&scene, &camera(), &resources, Layers::all(), &mut target);

        let center = target.pixel(8, 8);
        assert_eq!((center.r, center.g, center.b), (0.0, 0.0, 0.0));
        assert_eq!(target.pixel(0, 0), color::WHITE);
    }

    #[test]
    fn emissive_term_adds_hdr_energy() {
        let (scene, resources, _, _) = single_sphere(Material::standard(color::WHITE, 3.0));
        let mut target = RenderTarget::new(16, 16);
        Rasterizer::new().render(&scene, &camera(), &resources, Layers::all(), &mut target);

        assert!(target.pixel(8, 8).r > 3.0);
    }

    #[test]
    fn released_materials_are_skipped() {
        let (scene, mut resources, _, m) = single_sphere(Material::basic(color::RED));
        assert!(resources.dispose_material(m));

        let mut target = RenderTarget::new(16, 16);
        let mut rasterizer = Rasterizer::new();
        rasterizer.render(&scene, &camera(), &resources, Layers::all(), &mut target);
        assert_eq!(rasterizer.stats().drawables, 0);
        assert_eq!(target.pixel(8, 8), color::BLACK);
    }

    #[test]
    fn geometry_crossing_the_near_plane_is_clipped() {
        let (scene, resources, _, _) = single_sphere(Material::basic(color::RED));
        let mut cam = camera();
        cam.set_position(Vec3::new(0.0, 0.0, 1.02));

        let mut target = RenderTarget::new(16, 16);
        let mut rasterizer = Rasterizer::new();
        rasterizer.set_backface_culling(false);
        rasterizer.render(&scene, &cam, &resources, Layers::all(), &mut target);

        for v in [target.pixel(8, 8).r, target.pixel(0, 0).r] {
            assert!(v.is_finite());
        }
        assert!(rasterizer.stats().triangles > 0);
    }
}
