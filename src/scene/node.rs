use crate::geometry::{Polyline, RuledSurface};
use crate::math::Vector3;

use super::NodeType;

slotmap::new_key_type! {
    /// Unique identifier for a node in a [`super::MemoryScene`].
    pub struct NodeId;
}

/// What a scene node holds.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A transform; groups are transforms without shapes.
    Transform {
        /// Offset applied to everything below this node.
        translation: Vector3,
    },
    /// A curve shape, in the object space of its parent.
    Curve(Polyline),
    /// A lofted surface shape, in the object space of its parent.
    Surface(RuledSurface),
    /// A node this crate has no geometry for.
    Other(String),
}

impl NodeKind {
    /// A transform at the origin.
    #[must_use]
    pub fn transform() -> Self {
        Self::Transform {
            translation: Vector3::zeros(),
        }
    }

    /// Returns the host type of this node.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Transform { .. } => NodeType::Transform,
            Self::Curve(_) => NodeType::NurbsCurve,
            Self::Surface(_) => NodeType::NurbsSurface,
            Self::Other(name) => NodeType::Other(name.clone()),
        }
    }

    /// Returns `true` for nodes listed as shapes of their parent.
    ///
    /// Other-typed leaves (meshes, locators) count as shapes too.
    #[must_use]
    pub fn is_shape(&self) -> bool {
        !matches!(self, Self::Transform { .. })
    }
}

/// Data associated with a scene node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Unique short name.
    pub name: String,
    /// Parent node, `None` at the scene root.
    pub parent: Option<NodeId>,
    /// Children in creation order.
    pub children: Vec<NodeId>,
    /// Payload.
    pub kind: NodeKind,
}

impl NodeData {
    /// Creates a root-level node.
    #[must_use]
    pub fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            kind,
        }
    }
}
