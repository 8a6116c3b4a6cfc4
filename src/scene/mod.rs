//! The host scene graph, reduced to the capabilities road construction needs.
//!
//! [`SceneGraph`] is the only way the builder touches the scene. Nodes are
//! addressed by name, as hosts do; names may carry a `|`-separated path.
//! [`MemoryScene`] implements the trait in memory on top of the polyline
//! kernel in [`crate::geometry`].

mod call;
mod memory;
mod node;

pub use call::{SceneCall, SceneOp};
pub use memory::MemoryScene;
pub use node::{NodeData, NodeId, NodeKind};

use std::fmt;

use crate::error::Result;
use crate::math::Vector3;

/// The type of a scene node, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// A transform (also used for groups).
    Transform,
    /// A NURBS curve shape.
    NurbsCurve,
    /// A NURBS surface shape.
    NurbsSurface,
    /// Any other node type, by host name.
    Other(String),
}

impl NodeType {
    /// Returns the host's name for this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Transform => "transform",
            Self::NurbsCurve => "nurbsCurve",
            Self::NurbsSurface => "nurbsSurface",
            Self::Other(name) => name,
        }
    }

    /// Returns `true` for geometry shapes that hang below a transform.
    #[must_use]
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::NurbsCurve | Self::NurbsSurface)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options passed to the host's loft routine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoftOptions {
    /// Surface degree across the profiles. `1` gives a ruled surface.
    pub degree: u8,
    /// Uniform parameterisation.
    pub uniform: bool,
    /// Flip profiles that run against the first one.
    pub auto_reverse: bool,
}

impl LoftOptions {
    /// Linear, uniform, auto-reversing loft.
    #[must_use]
    pub fn ruled() -> Self {
        Self {
            degree: 1,
            uniform: true,
            auto_reverse: true,
        }
    }
}

impl Default for LoftOptions {
    fn default() -> Self {
        Self::ruled()
    }
}

/// Scene-graph capabilities consumed by the road builder.
///
/// Operations that create nodes return the host's result list; callers
/// resolve it with [`crate::adapter::resolve_first_transform`].
pub trait SceneGraph {
    /// Returns `true` if `node` names an existing node.
    fn exists(&self, node: &str) -> bool;

    /// Returns the type of `node`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    fn node_type(&self, node: &str) -> Result<NodeType>;

    /// Returns the parent of `node`, or `None` at the scene root.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    fn parent(&self, node: &str) -> Result<Option<String>>;

    /// Returns the shape children of `node`, in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    fn shapes(&self, node: &str) -> Result<Vec<String>>;

    /// Creates a curve offset from `shape` by `distance`, without history.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is missing or the offset fails.
    fn offset_curve(&mut self, shape: &str, distance: f64, tolerance: f64) -> Result<Vec<String>>;

    /// Duplicates `node` with its shapes.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    fn duplicate(&mut self, node: &str) -> Result<Vec<String>>;

    /// Moves `node` by `delta`, relative, in object space.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist or cannot move.
    fn translate(&mut self, node: &str, delta: &Vector3) -> Result<()>;

    /// Lofts a surface named `name` between two curves, without history.
    ///
    /// # Errors
    ///
    /// Returns an error if a curve is missing or the loft fails.
    fn loft(
        &mut self,
        first: &str,
        second: &str,
        name: &str,
        options: &LoftOptions,
    ) -> Result<Vec<String>>;

    /// Renames `node`, returning the name it actually received.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    fn rename(&mut self, node: &str, name: &str) -> Result<String>;

    /// Parents `nodes` under a new group named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if a member does not exist.
    fn group(&mut self, nodes: &[String], name: &str) -> Result<String>;

    /// Returns the current selection, in selection order.
    fn selection(&self) -> Vec<String>;

    /// Replaces the selection.
    ///
    /// # Errors
    ///
    /// Returns an error if a node does not exist.
    fn select(&mut self, nodes: &[String]) -> Result<()>;

    /// Shows a transient status message.
    fn notify(&mut self, message: &str);

    /// Shows a dismissible warning.
    fn warn(&mut self, message: &str);
}
