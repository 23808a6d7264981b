use glowfield::animation::EmissivePulses;
use glowfield::app::{AppContext, SurfaceSize, PULSE_DURATION};
use glowfield::camera::{Camera3d, PerspectiveCamera};
use glowfield::color;
use glowfield::config::{SceneParams, ViewerConfig};
use glowfield::glamx::{Vec2, Vec3};
use glowfield::procedural;
use glowfield::raycast::Raycaster;
use glowfield::resource::{Geometry, Material, ResourceManager};
use glowfield::scene::{NodeKind, Scene};
use glowfield::Error;

fn config(count: u32, spread: f32) -> ViewerConfig {
    ViewerConfig {
        seed: Some(42),
        scene: SceneParams {
            count,
            spread,
            detail: 0,
            ..SceneParams::default()
        },
        ..ViewerConfig::default()
    }
}

#[test]
fn missing_surface_aborts_startup() {
    let err = AppContext::new(None, config(10, 2.0)).err();
    assert!(matches!(err, Some(Error::SurfaceNotFound)));
}

#[test]
fn generated_spheres_stay_inside_the_spread() {
    let app = AppContext::new(Some(SurfaceSize::new(32, 24)), config(100, 2.0)).unwrap();

    assert_eq!(app.scene().count_drawables(), 100);
    app.scene().visit(|node, world| {
        if let NodeKind::Drawable(_) = node.kind() {
            let p = world.position;
            for v in [p.x, p.y, p.z] {
                assert!((-1.0..=1.0).contains(&v), "{:?}", p);
            }
        }
    });
}

#[test]
fn regeneration_releases_the_previous_field() {
    let count = 30;
    let mut app = AppContext::new(Some(SurfaceSize::new(32, 24)), config(count, 5.0)).unwrap();
    assert_eq!(app.resources().live_geometries(), 1);
    assert_eq!(app.resources().live_materials(), count as usize);

    for _ in 0..4 {
        let _ = app.frame(1.0 / 60.0);
        app.regenerate();
        let _ = app.frame(1.0 / 60.0);

        assert_eq!(app.resources().live_geometries(), 1);
        assert_eq!(app.resources().live_materials(), count as usize + 1);
        assert_eq!(app.scene().count_drawables(), count as usize);
    }
}

#[test]
fn parameter_changes_keep_only_the_latest_field_alive() {
    let mut app = AppContext::new(Some(SurfaceSize::new(32, 24)), config(20, 5.0)).unwrap();
    let _ = app.frame(1.0 / 60.0);

    for count in [50, 10, 80, 3] {
        let params = SceneParams {
            count,
            ..app.config().scene
        };
        app.set_params(params);
        let _ = app.frame(1.0 / 60.0);

        let count = count as usize;
        assert_eq!(app.resources().live_geometries(), 1);
        assert_eq!(app.resources().live_materials(), count + 1);
        assert_eq!(app.scene().count_drawables(), count);
        assert_eq!(app.field().map(|f| f.len()), Some(count));
    }
}

#[test]
fn hovering_the_center_pulses_the_sphere_under_the_cursor() {
    let surface = SurfaceSize::new(64, 48);
    let mut app = AppContext::new(Some(surface), config(1, 5.0)).unwrap();
    app.controls_mut().auto_rotate = false;

    for id in app.scene().drawable_ids() {
        let _ = app.scene_mut().remove(id);
    }
    let geometry = app
        .resources_mut()
        .add_geometry(Geometry::new(procedural::unit_icosphere(2)));
    let material = app
        .resources_mut()
        .add_material(Material::standard(color::RED, 0.5));
    let sphere = app.scene_mut().create_drawable(geometry, material);
    let sphere = app.scene_mut().add(sphere);

    let eye = app.camera().eye();
    assert!((eye - Vec3::new(0.0, 0.0, 3.0)).length() < 1.0e-4);

    app.set_cursor(surface.width as f64 / 2.0, surface.height as f64 / 2.0);
    assert_eq!(app.cursor(), Some(Vec2::ZERO));
    app.update(0.0);

    let hit = app.last_hit().unwrap();
    assert_eq!(hit.node, sphere);
    assert!((hit.point.z - 1.0).abs() < 1.0e-2, "{:?}", hit.point);
    assert!(app.pulses().is_active(sphere));

    let intensity = |app: &AppContext| {
        app.resources()
            .material(material)
            .and_then(|m| m.emissive_intensity())
            .unwrap()
    };

    app.update(PULSE_DURATION / 2.0);
    assert!(intensity(&app) > 0.5);

    app.clear_cursor();
    app.update(PULSE_DURATION / 2.0);
    assert_eq!(intensity(&app), 0.5);
    assert!(!app.pulses().is_active(sphere));
    assert!(app.last_hit().is_none());
}

#[test]
fn raycast_hit_starts_a_single_pulse() {
    let mut scene = Scene::new();
    let mut resources = ResourceManager::new();
    let geometry = resources.add_geometry(Geometry::new(procedural::unit_icosphere(2)));
    let material = resources.add_material(Material::standard(color::RED, 0.5));
    let sphere = scene.create_drawable(geometry, material);
    let sphere = scene.add(sphere);

    let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
    camera.look_at_from(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);

    let mut raycaster = Raycaster::default();
    raycaster.set_from_camera(Vec2::ZERO, &camera);
    let hit = raycaster.intersect_first(&scene, &resources).unwrap();
    assert_eq!(hit.node, sphere);
    assert!((hit.point.z - 1.0).abs() < 1.0e-2, "{:?}", hit.point);

    let mut pulses = EmissivePulses::new(1.0, PULSE_DURATION);
    assert!(pulses.start(hit.node, &scene, &resources));
    assert!(!pulses.start(hit.node, &scene, &resources));

    let intensity = |resources: &ResourceManager| {
        resources.material(material).and_then(|m| m.emissive_intensity()).unwrap()
    };

    pulses.update(PULSE_DURATION / 2.0, &scene, &mut resources);
    assert!(intensity(&resources) > 0.5);

    pulses.update(PULSE_DURATION / 2.0, &scene, &mut resources);
    assert_eq!(intensity(&resources), 0.5);
    assert!(!pulses.is_active(sphere));
}

#[test]
fn frames_match_the_surface_and_pixel_ratio() {
    let surface = SurfaceSize::new(40, 30).with_pixel_ratio(3.0);
    let mut app = AppContext::new(Some(surface), config(20, 5.0)).unwrap();
    assert_eq!(app.frame(0.0).size(), (80, 60));

    assert!(app.resize(50, 20, 1.0));
    assert!(!app.resize(50, 20, 1.0));
    assert_eq!(app.frame(0.0).size(), (50, 20));
    assert_eq!(app.frame_count(), 2);
}
