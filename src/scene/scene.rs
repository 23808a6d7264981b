//! The scene graph: an ordered, mutable collection of nodes.

use crate::camera::PerspectiveCamera;
use crate::color::{self, Color};
use crate::light::{CollectedLight, Light, LightCollection, LightType};
use crate::resource::{GeometryHandle, MaterialHandle, ResourceManager};
use crate::scene::{Drawable, NodeId, NodeKind, SceneNode, WorldTransform};
use glamx::Vec3;
use std::collections::BTreeSet;

/// Counts of the resources released by [`Scene::dispose`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Disposed {
    /// Geometries released.
    pub geometries: usize,
    /// Materials released.
    pub materials: usize,
}

/// An ordered collection of top-level nodes, each possibly a group.
///
/// The scene allocates node identities, so nodes are created through it
/// ([`Scene::create_drawable`] and friends) and then inserted with
/// [`Scene::add`] or [`Scene::add_to`].
pub struct Scene {
    nodes: Vec<SceneNode>,
    next_id: u64,
    background: Color,
    ambient: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates an empty scene with the default dark background.
    pub fn new() -> Scene {
        Scene {
            nodes: Vec::new(),
            next_id: 0,
            background: color::NIGHT,
            ambient: 0.2,
        }
    }

    /// The clear color.
    #[inline]
    pub fn background(&self) -> Color {
        self.background
    }

    /// Sets the clear color.
    #[inline]
    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    /// Ambient light intensity applied to lit materials.
    #[inline]
    pub fn ambient(&self) -> f32 {
        self.ambient
    }

    /// Sets the ambient light intensity.
    #[inline]
    pub fn set_ambient(&mut self, ambient: f32) {
        self.ambient = ambient;
    }

    /// Creates an unattached node with a fresh identity.
    pub fn create(&mut self, kind: NodeKind) -> SceneNode {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        SceneNode::new(id, kind)
    }

    /// Creates an unattached drawable node.
    pub fn create_drawable(
        &mut self,
        geometry: GeometryHandle,
        material: MaterialHandle,
    ) -> SceneNode {
        self.create(NodeKind::Drawable(Drawable { geometry, material }))
    }

    /// Creates an unattached, empty group node.
    pub fn create_group(&mut self) -> SceneNode {
        self.create(NodeKind::Group(Vec::new()))
    }

    /// Creates an unattached light node.
    pub fn create_light(&mut self, light: Light) -> SceneNode {
        self.create(NodeKind::Light(light))
    }

    /// Creates an unattached camera node.
    pub fn create_camera(&mut self, camera: PerspectiveCamera) -> SceneNode {
        self.create(NodeKind::Camera(camera))
    }

    /// Appends a top-level node.
    pub fn add(&mut self, node: SceneNode) -> NodeId {
        let id = node.id();
        self.nodes.push(node);
        id
    }

    /// Appends `node` to the group `parent`.
    ///
    /// Gives the node back if `parent` does not exist or is not a group.
    pub fn add_to(&mut self, parent: NodeId, node: SceneNode) -> Result<NodeId, SceneNode> {
        let id = node.id();
        match self.node_mut(parent) {
            Some(p) => p.add_child(node).map(|_| id),
            None => Err(node),
        }
    }

    /// Detaches and returns the node `id`, wherever it is in the graph.
    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        fn remove_from(nodes: &mut Vec<SceneNode>, id: NodeId) -> Option<SceneNode> {
            if let Some(i) = nodes.iter().position(|n| n.id() == id) {
                return Some(nodes.remove(i));
            }

            nodes
                .iter_mut()
                .filter_map(|n| n.children_mut())
                .find_map(|children| remove_from(children, id))
        }

        remove_from(&mut self.nodes, id)
    }

    /// Detaches every node and returns them, without releasing any resource.
    pub fn clear(&mut self) -> Vec<SceneNode> {
        std::mem::take(&mut self.nodes)
    }

    /// Releases every geometry and material referenced by the scene's
    /// drawables, then detaches all nodes.
    ///
    /// Shared resources are released once.
    pub fn dispose(&mut self, resources: &mut ResourceManager) -> Disposed {
        let mut geometries = BTreeSet::new();
        let mut materials = BTreeSet::new();

        self.visit(|node, _| {
            if let Some(d) = node.drawable() {
                let _ = geometries.insert(d.geometry);
                let _ = materials.insert(d.material);
            }
        });

        let mut disposed = Disposed::default();
        for g in geometries {
            if resources.dispose_geometry(g) {
                disposed.geometries += 1;
            }
        }
        for m in materials {
            if resources.dispose_material(m) {
                disposed.materials += 1;
            }
        }

        let _ = self.clear();
        disposed
    }

    /// Top-level nodes, in insertion order.
    #[inline]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Number of top-level nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no node at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node `id`, wherever it is in the graph.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        fn find(nodes: &[SceneNode], id: NodeId) -> Option<&SceneNode> {
            nodes
                .iter()
                .find_map(|n| if n.id() == id { Some(n) } else { find(n.children(), id) })
        }

        find(&self.nodes, id)
    }

    /// Mutable access to the node `id`, wherever it is in the graph.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        fn find(nodes: &mut [SceneNode], id: NodeId) -> Option<&mut SceneNode> {
            for n in nodes.iter_mut() {
                if n.id() == id {
                    return Some(n);
                }
                if let Some(children) = n.children_mut() {
                    if let Some(found) = find(children, id) {
                        return Some(found);
                    }
                }
            }
            None
        }

        find(&mut self.nodes, id)
    }

    /// Visits every node depth-first, in order, with its world transform.
    ///
    /// Hidden nodes are visited too; see [`visit_visible`](Self::visit_visible).
    pub fn visit<F: FnMut(&SceneNode, &WorldTransform)>(&self, mut f: F) {
        visit_nodes(&self.nodes, &WorldTransform::default(), false, &mut f);
    }

    /// Visits every node whose whole ancestry is visible.
    pub fn visit_visible<F: FnMut(&SceneNode, &WorldTransform)>(&self, mut f: F) {
        visit_nodes(&self.nodes, &WorldTransform::default(), true, &mut f);
    }

    /// Visits every node depth-first, in order, mutably.
    pub fn visit_mut<F: FnMut(&mut SceneNode)>(&mut self, mut f: F) {
        fn visit(nodes: &mut [SceneNode], f: &mut dyn FnMut(&mut SceneNode)) {
            for n in nodes.iter_mut() {
                f(n);
                if let Some(children) = n.children_mut() {
                    visit(children, f);
                }
            }
        }

        visit(&mut self.nodes, &mut f);
    }

    /// Identities of every drawable, in traversal order.
    pub fn drawable_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.visit(|node, _| {
            if node.drawable().is_some() {
                ids.push(node.id());
            }
        });
        ids
    }

    /// Number of drawables in the whole graph.
    pub fn count_drawables(&self) -> usize {
        let mut count = 0;
        self.visit(|node, _| {
            if node.drawable().is_some() {
                count += 1;
            }
        });
        count
    }

    /// Gathers the enabled lights of the visible part of the graph.
    pub fn collect_lights(&self) -> LightCollection {
        let mut lights = LightCollection::with_ambient(self.ambient);

        self.visit_visible(|node, world| {
            if let NodeKind::Light(light) = node.kind() {
                if light.enabled {
                    let c = light.color;
                    let _ = lights.add(CollectedLight {
                        light_type: light.light_type.clone(),
                        radiance: Vec3::new(c.r, c.g, c.b) * light.intensity,
                        world_position: match light.light_type {
                            LightType::Directional(_) => Vec3::ZERO,
                            LightType::Point { .. } => world.position,
                        },
                    });
                }
            }
        });

        lights
    }
}

fn visit_nodes(
    nodes: &[SceneNode],
    parent: &WorldTransform,
    visible_only: bool,
    f: &mut dyn FnMut(&SceneNode, &WorldTransform),
) {
    for n in nodes {
        if visible_only && !n.is_visible() {
            continue;
        }

        let world = parent.compose(n.position(), n.scale());
        f(n, &world);
        visit_nodes(n.children(), &world, visible_only, f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedural;
    use crate::resource::{Geometry, Material};
    use crate::scene::Layers;

    fn populated() -> (Scene, ResourceManager, NodeId, NodeId) {
        let mut resources = ResourceManager::new();
        let mut scene = Scene::new();
        let g = resources.add_geometry(Geometry::new(procedural::icosphere(1.0, 0)));

        let group = scene.create_group().with_position(Vec3::new(1.0, 0.0, 0.0));
        let group_id = scene.add(group);

        let m = resources.add_material(Material::basic(color::RED));
        let child = scene
            .create_drawable(g, m)
            .with_position(Vec3::new(0.0, 2.0, 0.0))
            .with_layers(Layers::DEFAULT | Layers::BLOOM);
        let child_id = scene.add_to(group_id, child).unwrap();

        let m2 = resources.add_material(Material::basic(color::WHITE));
        let top = scene.create_drawable(g, m2);
        let _ = scene.add(top);

        (scene, resources, group_id, child_id)
    }

    #[test]
    fn nested_nodes_are_found_and_transformed() {
        let (scene, _, _, child_id) = populated();

        assert!(scene.node(child_id).unwrap().layers().is_bloom());
        assert_eq!(scene.count_drawables(), 2);

        let mut world_of_child = None;
        scene.visit(|node, world| {
            if node.id() == child_id {
                world_of_child = Some(world.position);
            }
        });
        assert_eq!(world_of_child, Some(Vec3::new(1.0, 2.0, 0.0)));
    }

    #[test]
    fn adding_to_a_drawable_fails() {
        let (mut scene, _, _, child_id) = populated();
        let orphan = scene.create_group();
        assert!(scene.add_to(child_id, orphan).is_err());
    }

    #[test]
    fn remove_detaches_nested_nodes() {
        let (mut scene, _, _, child_id) = populated();
        let removed = scene.remove(child_id).unwrap();
        assert_eq!(removed.id(), child_id);
        assert!(scene.node(child_id).is_none());
        assert_eq!(scene.count_drawables(), 1);
        assert!(scene.remove(child_id).is_none());
    }

    #[test]
    fn dispose_releases_shared_geometry_once() {
        let (mut scene, mut resources, _, _) = populated();
        let disposed = scene.dispose(&mut resources);

        assert_eq!(
            disposed,
            Disposed {
                geometries: 1,
                materials: 2
            }
        );
        assert!(scene.is_empty());
        assert_eq!(resources.live_geometries(), 0);
        assert_eq!(resources.live_materials(), 0);
    }

    #[test]
    fn hidden_subtrees_are_skipped_by_visible_traversal() {
        let (mut scene, _, group_id, child_id) = populated();
        scene.node_mut(group_id).unwrap().set_visible(false);

        let mut seen = Vec::new();
        scene.visit_visible(|node, _| seen.push(node.id()));
        assert!(!seen.contains(&child_id));

        let mut all = Vec::new();
        scene.visit(|node, _| all.push(node.id()));
        assert!(all.contains(&child_id));
    }

    #[test]
    fn lights_are_collected_with_world_positions() {
        let mut scene = Scene::new();
        let light = scene
            .create_light(Light::point(50.0).with_intensity(2.0))
            .with_position(Vec3::new(0.0, 4.0, 0.0));
        let _ = scene.add(light);
        let off = scene.create_light(Light::point(50.0).with_enabled(false));
        let _ = scene.add(off);

        let lights = scene.collect_lights();
        assert_eq!(lights.len(), 1);
        assert_eq!(lights.lights[0].world_position, Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(lights.lights[0].radiance, Vec3::splat(2.0));
    }
}
