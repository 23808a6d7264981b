//! Nodes of the scene graph.

use crate::camera::PerspectiveCamera;
use crate::light::Light;
use crate::resource::{GeometryHandle, MaterialHandle};
use crate::scene::Layers;
use glamx::{Mat4, Quat, Vec3};

/// Identity of a node, stable for the node's whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn new(raw: u64) -> NodeId {
        NodeId(raw)
    }

    /// The raw identifier.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A renderable unit: a shared geometry shaded by a material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Drawable {
    /// The (shared, immutable) shape.
    pub geometry: GeometryHandle,
    /// The current material. May be temporarily swapped during rendering.
    pub material: MaterialHandle,
}

/// What a node is.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// A mesh that is rendered.
    Drawable(Drawable),
    /// A container whose children inherit its transform.
    Group(Vec<SceneNode>),
    /// A light source positioned by the node.
    Light(Light),
    /// A camera placed in the scene. Not used for rendering the scene itself.
    Camera(PerspectiveCamera),
}

/// World-space placement of a node: translation and per-axis scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldTransform {
    /// World position.
    pub position: Vec3,
    /// World scale.
    pub scale: Vec3,
}

impl Default for WorldTransform {
    fn default() -> Self {
        WorldTransform {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl WorldTransform {
    /// Composes a child's local placement with this (parent) transform.
    #[inline]
    pub fn compose(&self, position: Vec3, scale: Vec3) -> WorldTransform {
        WorldTransform {
            position: self.position + self.scale * position,
            scale: self.scale * scale,
        }
    }

    /// Maps a point from local to world space.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.position + self.scale * p
    }

    /// The equivalent 4×4 matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, Quat::IDENTITY, self.position)
    }

    /// Largest absolute scale factor.
    #[inline]
    pub fn max_scale(&self) -> f32 {
        self.scale.abs().max_element()
    }
}

/// A node of the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    id: NodeId,
    name: String,
    position: Vec3,
    scale: Vec3,
    visible: bool,
    layers: Layers,
    kind: NodeKind,
}

impl SceneNode {
    pub(crate) fn new(id: NodeId, kind: NodeKind) -> SceneNode {
        SceneNode {
            id,
            name: String::new(),
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            visible: true,
            layers: Layers::default(),
            kind,
        }
    }

    /// Sets the local position (builder style).
    pub fn with_position(mut self, position: Vec3) -> SceneNode {
        self.position = position;
        self
    }

    /// Sets the local scale (builder style).
    pub fn with_scale(mut self, scale: Vec3) -> SceneNode {
        self.scale = scale;
        self
    }

    /// Sets the layers (builder style).
    pub fn with_layers(mut self, layers: Layers) -> SceneNode {
        self.layers = layers;
        self
    }

    /// Sets the name (builder style).
    pub fn with_name(mut self, name: &str) -> SceneNode {
        self.name = name.to_string();
        self
    }

    /// This node's identity.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// This node's name. Empty by default.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local position relative to the parent.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Sets the local position.
    #[inline]
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Local scale relative to the parent.
    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Sets the local scale.
    #[inline]
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Whether this node (and its subtree) is rendered.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides this node and its subtree.
    #[inline]
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// The render passes this node takes part in.
    #[inline]
    pub fn layers(&self) -> Layers {
        self.layers
    }

    /// Replaces the layer mask.
    #[inline]
    pub fn set_layers(&mut self, layers: Layers) {
        self.layers = layers;
    }

    /// Adds `layers` to this node's mask.
    #[inline]
    pub fn enable_layers(&mut self, layers: Layers) {
        self.layers.insert(layers);
    }

    /// Removes `layers` from this node's mask.
    #[inline]
    pub fn disable_layers(&mut self, layers: Layers) {
        self.layers.remove(layers);
    }

    /// What this node is.
    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Mutable access to what this node is.
    #[inline]
    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// The drawable carried by this node, if any.
    #[inline]
    pub fn drawable(&self) -> Option<&Drawable> {
        match &self.kind {
            NodeKind::Drawable(d) => Some(d),
            _ => None,
        }
    }

    /// Mutable access to the drawable carried by this node, if any.
    #[inline]
    pub fn drawable_mut(&mut self) -> Option<&mut Drawable> {
        match &mut self.kind {
            NodeKind::Drawable(d) => Some(d),
            _ => None,
        }
    }

    /// Children of a group node; empty for every other kind.
    #[inline]
    pub fn children(&self) -> &[SceneNode] {
        match &self.kind {
            NodeKind::Group(children) => children,
            _ => &[],
        }
    }

    /// Appends a child. Returns the child back if this node is not a group.
    pub fn add_child(&mut self, child: SceneNode) -> Result<(), SceneNode> {
        match &mut self.kind {
            NodeKind::Group(children) => {
                children.push(child);
                Ok(())
            }
            _ => Err(child),
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<SceneNode>> {
        match &mut self.kind {
            NodeKind::Group(children) => Some(children),
            _ => None,
        }
    }
}
