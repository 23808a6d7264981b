use glowfield::camera::PerspectiveCamera;
use glowfield::color;
use glowfield::compositor::SelectiveBloomCompositor;
use glowfield::config::BloomParams;
use glowfield::glamx::Vec3;
use glowfield::procedural;
use glowfield::resource::{Geometry, Material, MaterialHandle, ResourceManager};
use glowfield::scene::{Layers, NodeId, Scene};

struct Fixture {
    scene: Scene,
    resources: ResourceManager,
    nodes: Vec<(NodeId, MaterialHandle)>,
}

/// Ten spheres in a row; the ones listed in `glowing` carry the bloom layer.
fn row_of_spheres(glowing: &[usize]) -> Fixture {
    let mut scene = Scene::new();
    let mut resources = ResourceManager::new();
    let geometry = resources.add_geometry(Geometry::new(procedural::unit_icosphere(1)));

    let nodes = (0..10)
        .map(|i| {
            let material = resources.add_material(Material::standard(color::WHITE, 0.5));
            let layers = if glowing.contains(&i) {
                Layers::DEFAULT | Layers::BLOOM
            } else {
                Layers::DEFAULT
            };
            let node = scene
                .create_drawable(geometry, material)
                .with_position(Vec3::new(i as f32 - 4.5, 0.0, 0.0))
                .with_scale(Vec3::splat(0.3))
                .with_layers(layers);
            (scene.add(node), material)
        })
        .collect();

    Fixture {
        scene,
        resources,
        nodes,
    }
}

fn material_of(scene: &Scene, id: NodeId) -> MaterialHandle {
    scene.node(id).and_then(|n| n.drawable()).unwrap().material
}

fn camera() -> PerspectiveCamera {
    let mut camera = PerspectiveCamera::new(60.0, 2.0, 0.1, 100.0);
    camera.look_at_from(Vec3::new(0.0, 0.0, 8.0), Vec3::ZERO);
    camera
}

#[test]
fn darkening_substitutes_exactly_the_non_glowing_drawables() {
    let mut f = row_of_spheres(&[2, 5, 7]);
    let mut compositor = SelectiveBloomCompositor::new(32, 16, BloomParams::default());

    compositor.darken_non_bloomed(&mut f.scene, &mut f.resources);
    let null = compositor.null_material().unwrap();

    assert_eq!(compositor.substitutions().len(), 7);
    for (i, &(id, original)) in f.nodes.iter().enumerate() {
        if [2, 5, 7].contains(&i) {
            assert!(!compositor.substitutions().contains(id));
            assert_eq!(material_of(&f.scene, id), original);
        } else {
            assert_eq!(compositor.substitutions().get(id), Some(original));
            assert_eq!(material_of(&f.scene, id), null);
        }
    }
}

#[test]
fn restoring_drains_the_table_and_is_idempotent() {
    let mut f = row_of_spheres(&[0, 9]);
    let mut compositor = SelectiveBloomCompositor::new(32, 16, BloomParams::default());

    compositor.darken_non_bloomed(&mut f.scene, &mut f.resources);
    compositor.restore_materials(&mut f.scene);
    assert!(compositor.substitutions().is_empty());

    compositor.restore_materials(&mut f.scene);
    assert!(compositor.substitutions().is_empty());
    for &(id, original) in &f.nodes {
        assert_eq!(material_of(&f.scene, id), original);
    }
}

#[test]
fn restoring_a_node_without_entry_changes_nothing() {
    let mut f = row_of_spheres(&[3]);
    let mut compositor = SelectiveBloomCompositor::new(32, 16, BloomParams::default());

    let (glowing, original) = f.nodes[3];
    compositor.darken_non_bloomed(&mut f.scene, &mut f.resources);
    let before = compositor.substitutions().len();

    let node = f.scene.node_mut(glowing).unwrap();
    assert!(!compositor.restore_one(node));
    assert_eq!(material_of(&f.scene, glowing), original);
    assert_eq!(compositor.substitutions().len(), before);
}

#[test]
fn a_full_frame_leaves_every_material_in_place() {
    let mut f = row_of_spheres(&[1, 4]);
    let mut compositor = SelectiveBloomCompositor::new(64, 32, BloomParams::default());
    let camera = camera();

    for _ in 0..3 {
        let _ = compositor.render(&mut f.scene, &camera, &mut f.resources);
        assert!(compositor.substitutions().is_empty());
    }
    for &(id, original) in &f.nodes {
        assert_eq!(material_of(&f.scene, id), original);
    }
    // One null material, shared by every frame.
    assert_eq!(f.resources.live_materials(), f.nodes.len() + 1);
}

#[test]
fn darkened_objects_occlude_the_glow_behind_them() {
    let mut scene = Scene::new();
    scene.set_background(color::BLACK);
    let mut resources = ResourceManager::new();
    let geometry = resources.add_geometry(Geometry::new(procedural::unit_icosphere(2)));

    let front = resources.add_material(Material::basic(color::WHITE));
    let back = resources.add_material(Material::standard(color::RED, 1.0));
    let blocker = scene
        .create_drawable(geometry, front)
        .with_position(Vec3::new(0.0, 0.0, 2.0))
        .with_scale(Vec3::splat(0.8));
    let _ = scene.add(blocker);
    let glowing = scene
        .create_drawable(geometry, back)
        .with_position(Vec3::new(0.0, 0.0, -2.0))
        .with_scale(Vec3::splat(0.4))
        .with_layers(Layers::DEFAULT | Layers::BLOOM);
    let _ = scene.add(glowing);

    let mut camera = PerspectiveCamera::new(60.0, 1.0, 0.1, 100.0);
    camera.look_at_from(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);

    let mut compositor = SelectiveBloomCompositor::new(48, 48, BloomParams::default());
    let _ = compositor.render(&mut scene, &camera, &mut resources);

    let glow = compositor.glow_output();
    let center = glow.pixel(24, 24);
    assert!(color::luminance(center) < 1.0e-3, "{:?}", center);

    // The blocker is drawn with its own material in the final frame.
    let composed = compositor.output().pixel(24, 24);
    assert!(composed.r > 0.9 && composed.g > 0.9 && composed.b > 0.9);
}
