//! Random sphere fields.

use crate::color::ColorGenerator;
use crate::config::SceneParams;
use crate::procedural;
use crate::resource::{Geometry, GeometryHandle, Material, ResourceManager};
use crate::scene::{Layers, NodeId, Scene};
use glamx::Vec3;
use rand::Rng;

/// The drawables of one generated field.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// The icosphere shared by every sphere.
    pub geometry: GeometryHandle,
    /// Every sphere, in generation order.
    pub nodes: Vec<NodeId>,
    /// The spheres tagged with [`Layers::BLOOM`].
    pub glowing: Vec<NodeId>,
}

impl Field {
    /// Number of spheres.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the field has no sphere.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Adds `params.count` spheres to `scene`.
///
/// All spheres share one geometry; each gets its own standard material whose
/// color is drawn from `params.colors`. Positions are uniform in the cube of
/// edge `params.spread` centered on the origin.
pub fn populate<R: Rng>(
    scene: &mut Scene,
    resources: &mut ResourceManager,
    params: &SceneParams,
    rng: &mut R,
) -> Field {
    let params = params.clamped();
    let colors = ColorGenerator::new(params.colors);
    let geometry = resources.add_geometry(Geometry::new(procedural::unit_icosphere(params.detail)));

    let mut nodes = Vec::with_capacity(params.count as usize);
    let mut glowing = Vec::new();

    for i in 0..params.count {
        let color = colors.generate(rng);
        let material = resources.add_material(Material::standard(color, params.emissive_intensity));

        let position = Vec3::new(
            (rng.random::<f32>() - 0.5) * params.spread,
            (rng.random::<f32>() - 0.5) * params.spread,
            (rng.random::<f32>() - 0.5) * params.spread,
        );
        let scale = rng.random::<f32>() * params.size + 0.05;
        let glows = rng.random_bool(params.glow_ratio as f64);

        let layers = if glows {
            Layers::DEFAULT | Layers::BLOOM
        } else {
            Layers::DEFAULT
        };

        let node = scene
            .create_drawable(geometry, material)
            .with_name(&format!("sphere-{}", i))
            .with_position(position)
            .with_scale(Vec3::splat(scale))
            .with_layers(layers);
        let id = scene.add(node);

        nodes.push(id);
        if glows {
            glowing.push(id);
        }
    }

    Field {
        geometry,
        nodes,
        glowing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn one_geometry_and_one_material_per_sphere() {
        let mut scene = Scene::new();
        let mut resources = ResourceManager::new();
        let params = SceneParams {
            count: 25,
            ..SceneParams::default()
        };

        let field = populate(&mut scene, &mut resources, &params, &mut StdRng::seed_from_u64(3));

        assert_eq!(field.len(), 25);
        assert_eq!(scene.count_drawables(), 25);
        assert_eq!(resources.live_geometries(), 1);
        assert_eq!(resources.live_materials(), 25);
    }

    #[test]
    fn glow_ratio_extremes() {
        let mut scene = Scene::new();
        let mut resources = ResourceManager::new();
        let mut rng = StdRng::seed_from_u64(11);

        let all = SceneParams {
            count: 30,
            glow_ratio: 1.0,
            ..SceneParams::default()
        };
        assert_eq!(populate(&mut scene, &mut resources, &all, &mut rng).glowing.len(), 30);

        let none = SceneParams {
            glow_ratio: 0.0,
            ..all
        };
        assert!(populate(&mut scene, &mut resources, &none, &mut rng).glowing.is_empty());
    }

    #[test]
    fn scales_follow_the_size_parameter() {
        let mut scene = Scene::new();
        let mut resources = ResourceManager::new();
        let params = SceneParams {
            count: 200,
            size: 0.3,
            ..SceneParams::default()
        };

        let field = populate(&mut scene, &mut resources, &params, &mut StdRng::seed_from_u64(5));
        for id in field.nodes {
            let s = scene.node(id).unwrap().scale().x;
            assert!((0.05..0.35 + 1.0e-6).contains(&s));
        }
    }

    #[test]
    fn same_seed_same_field() {
        let params = SceneParams {
            count: 10,
            ..SceneParams::default()
        };
        let positions = |seed| {
            let mut scene = Scene::new();
            let mut resources = ResourceManager::new();
            let field =
                populate(&mut scene, &mut resources, &params, &mut StdRng::seed_from_u64(seed));
            field
                .nodes
                .iter()
                .map(|id| scene.node(*id).unwrap().position())
                .collect::<Vec<_>>()
        };

        assert_eq!(positions(8), positions(8));
        assert_ne!(positions(8), positions(9));
    }
}
