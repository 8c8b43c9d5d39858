/// Rigid scene-graph hierarchy.
///
/// Each [`TransformNode`] owns its children outright, so the graph is always a
/// finite tree and dropping a node drops its whole subtree. World transforms
/// are never stored: they are composed top-down during [`TransformNode::draw`]
/// as `parent * local`.
use nalgebra::Matrix4;

use crate::animation::AnimationRule;
use crate::geometry::MeshData;
use crate::material::Material;
use crate::projection::RenderContext;

/// A mesh attached to the tree together with its surface material
#[derive(Debug, Clone)]
pub struct MeshLeaf {
    pub mesh: MeshData,
    pub material: Material,
}

impl MeshLeaf {
    pub fn new(mesh: MeshData, material: impl Into<Material>) -> Self {
        Self {
            mesh,
            material: material.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Child {
    Node(TransformNode),
    Mesh(MeshLeaf),
}

/// Everything the renderer receives for one mesh leaf
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub world: &'a Matrix4<f32>,
    pub mesh: &'a MeshData,
    pub material: &'a Material,
    pub context: &'a RenderContext,
}

/// Receives draw calls in traversal order
pub trait Renderer {
    fn draw(&mut self, call: DrawCall<'_>);
}

impl<F: FnMut(DrawCall<'_>)> Renderer for F {
    fn draw(&mut self, call: DrawCall<'_>) {
        self(call)
    }
}

/// Child indices leading from a root node to a descendant
pub type NodePath = Vec<usize>;

#[derive(Debug, Clone)]
pub struct TransformNode {
    name: String,
    base: Matrix4<f32>,
    animation: Option<AnimationRule>,
    phase: f32,
    local: Matrix4<f32>,
    children: Vec<Child>,
}

impl TransformNode {
    /// A static node with the given offset from its parent
    pub fn new(name: impl Into<String>, base: Matrix4<f32>) -> Self {
        Self {
            name: name.into(),
            base,
            animation: None,
            phase: 0.0,
            local: base,
            children: Vec::new(),
        }
    }

    pub fn with_animation(mut self, rule: AnimationRule) -> Self {
        self.animation = Some(rule);
        self.recompose();
        self
    }

    /// Start the animation at `phase` instead of zero
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self.recompose();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn animation(&self) -> Option<&AnimationRule> {
        self.animation.as_ref()
    }

    pub fn local_transform(&self) -> &Matrix4<f32> {
        &self.local
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Append a child node, returning its index
    pub fn add_child(&mut self, node: TransformNode) -> usize {
        self.children.push(Child::Node(node));
        self.children.len() - 1
    }

    pub fn add_mesh(&mut self, leaf: MeshLeaf) -> usize {
        self.children.push(Child::Mesh(leaf));
        self.children.len() - 1
    }

    /// Advance the animation by one step. Children are not touched.
    pub fn update(&mut self) {
        if let Some(rule) = self.animation {
            self.phase += rule.rate();
            self.recompose();
        }
    }

    /// Update this node and every descendant
    pub fn update_subtree(&mut self) {
        self.update();
        for child in &mut self.children {
            if let Child::Node(node) = child {
                node.update_subtree();
            }
        }
    }

    fn recompose(&mut self) {
        self.local = match &self.animation {
            Some(rule) => self.base * rule.matrix(self.phase),
            None => self.base,
        };
    }

    /// Compose `parent * local` and emit one draw call per mesh leaf
    pub fn draw<R: Renderer + ?Sized>(&self, parent: &Matrix4<f32>, context: &RenderContext, renderer: &mut R) {
        let world = parent * self.local;
        for child in &self.children {
            match child {
                Child::Mesh(leaf) => renderer.draw(DrawCall {
                    world: &world,
                    mesh: &leaf.mesh,
                    material: &leaf.material,
                    context,
                }),
                Child::Node(node) => node.draw(&world, context, renderer),
            }
        }
    }

    /// World transform of every node in the subtree, depth first
    pub fn world_transforms(&self, parent: &Matrix4<f32>) -> Vec<(String, Matrix4<f32>)> {
        let mut out = Vec::new();
        self.collect_world(parent, &mut out);
        out
    }

    fn collect_world(&self, parent: &Matrix4<f32>, out: &mut Vec<(String, Matrix4<f32>)>) {
        let world = parent * self.local;
        out.push((self.name.clone(), world));
        for child in &self.children {
            if let Child::Node(node) = child {
                node.collect_world(&world, out);
            }
        }
    }

    pub fn node(&self, path: &[usize]) -> Option<&TransformNode> {
        match path.split_first() {
            None => Some(self),
            Some((&index, rest)) => match self.children.get(index)? {
                Child::Node(node) => node.node(rest),
                Child::Mesh(_) => None,
            },
        }
    }

    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut TransformNode> {
        match path.split_first() {
            None => Some(self),
            Some((&index, rest)) => match self.children.get_mut(index)? {
                Child::Node(node) => node.node_mut(rest),
                Child::Mesh(_) => None,
            },
        }
    }

    /// Path to the first node named `name`, searching depth first
    pub fn find(&self, name: &str) -> Option<NodePath> {
        if self.name == name {
            return Some(Vec::new());
        }
        self.children.iter().enumerate().find_map(|(index, child)| match child {
            Child::Node(node) => node.find(name).map(|mut path| {
                path.insert(0, index);
                path
            }),
            Child::Mesh(_) => None,
        })
    }

    /// Number of nodes in the subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| match child {
                Child::Node(node) => node.node_count(),
                Child::Mesh(_) => 0,
            })
            .sum::<usize>()
    }

    /// Number of mesh leaves in the subtree
    pub fn mesh_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Child::Node(node) => node.mesh_count(),
                Child::Mesh(_) => 1,
            })
            .sum()
    }
}
