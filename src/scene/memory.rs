use std::collections::HashMap;

use slotmap::SlotMap;
use tracing::{debug, info, warn};

use crate::error::{Result, SceneError};
use crate::geometry::{Polyline, RuledSurface};
use crate::math::Vector3;

use super::call::{SceneCall, SceneOp};
use super::node::{NodeData, NodeId, NodeKind};
use super::{LoftOptions, NodeType, SceneGraph};

/// A pending injected failure.
#[derive(Debug, Clone, Copy)]
struct Fault {
    op: SceneOp,
    remaining: usize,
}

/// In-memory scene graph with a polyline geometry kernel.
///
/// Nodes live in an arena and reference each other via typed IDs. Names
/// are unique; a name that is already taken receives a numeric suffix.
/// Every edit, selection change and message is recorded in [`Self::calls`].
#[derive(Debug, Default)]
pub struct MemoryScene {
    nodes: SlotMap<NodeId, NodeData>,
    names: HashMap<String, NodeId>,
    selection: Vec<NodeId>,
    calls: Vec<SceneCall>,
    faults: Vec<Fault>,
}

impl MemoryScene {
    /// Creates a new, empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Population ---

    /// Adds a curve as a transform named `name` with one curve shape.
    ///
    /// Returns the name the transform received.
    pub fn add_curve(&mut self, name: &str, curve: Polyline) -> String {
        self.insert_shaped(name, NodeKind::Curve(curve), None)
    }

    /// Adds an empty transform.
    pub fn add_transform(&mut self, name: &str) -> String {
        let id = self.insert(name, NodeKind::transform(), None);
        self.nodes[id].name.clone()
    }

    /// Adds a transform carrying one shape of a type this scene has no
    /// geometry for, such as `"mesh"` or `"locator"`.
    pub fn add_shaped(&mut self, name: &str, shape_type: &str) -> String {
        self.insert_shaped(name, NodeKind::Other(shape_type.to_owned()), None)
    }

    /// Makes the next edit of kind `op` fail after `successes` calls of that
    /// kind have gone through.
    pub fn fail_after(&mut self, op: SceneOp, successes: usize) {
        self.faults.push(Fault {
            op,
            remaining: successes,
        });
    }

    // --- Queries ---

    /// Returns the number of nodes in the scene.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[SceneCall] {
        &self.calls
    }

    /// Returns the recorded edits, skipping selection changes and messages.
    pub fn edits(&self) -> impl Iterator<Item = &SceneCall> {
        self.calls.iter().filter(|call| call.op().is_some())
    }

    /// Returns every warning shown so far.
    #[must_use]
    pub fn warnings(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SceneCall::Warn(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Returns every status message shown so far.
    #[must_use]
    pub fn notifications(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SceneCall::Notify(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Returns the names of all children of `node`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    pub fn children(&self, node: &str) -> Result<Vec<String>> {
        let id = self.lookup(node)?;
        Ok(self.names_of(&self.node(id)?.children))
    }

    /// Returns the local translation of a transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist or is not a transform.
    pub fn translation(&self, node: &str) -> Result<Vector3> {
        let id = self.lookup(node)?;
        match &self.node(id)?.kind {
            NodeKind::Transform { translation } => Ok(*translation),
            _ => Err(SceneError::HostFailure(format!("{node} is not a transform")).into()),
        }
    }

    /// Returns the curve under `node` in world space.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist or holds no curve.
    pub fn world_curve(&self, node: &str) -> Result<Polyline> {
        let id = self.lookup(node)?;
        self.world_curve_of(id)
    }

    /// Returns the surface shape under `node`, in object space.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist or holds no surface.
    pub fn surface(&self, node: &str) -> Result<&RuledSurface> {
        let id = self.lookup(node)?;
        let data = self.node(id)?;
        let found = std::iter::once(id)
            .chain(data.children.iter().copied())
            .find_map(|cid| match &self.nodes.get(cid)?.kind {
                NodeKind::Surface(surface) => Some(surface),
                _ => None,
            });
        found.ok_or_else(|| SceneError::HostFailure(format!("{node} has no surface shape")).into())
    }

    // --- Internals ---

    fn node(&self, id: NodeId) -> Result<&NodeData> {
        self.nodes
            .get(id)
            .ok_or_else(|| SceneError::NodeNotFound("stale node id".into()).into())
    }

    /// Resolves a short name or a `|`-separated path.
    fn lookup(&self, path: &str) -> Result<NodeId> {
        let not_found = || SceneError::NodeNotFound(path.to_owned());
        let absolute = path.starts_with('|');
        let relative = path.strip_prefix('|').unwrap_or(path);
        if relative.split('|').any(str::is_empty) {
            return Err(not_found().into());
        }
        let mut segments = relative.split('|').rev();
        let leaf = segments.next().ok_or_else(not_found)?;
        let id = *self.names.get(leaf).ok_or_else(not_found)?;

        let mut cursor = self.node(id)?.parent;
        for segment in segments {
            let parent = cursor.ok_or_else(not_found)?;
            let data = self.node(parent)?;
            if data.name != segment {
                return Err(not_found().into());
            }
            cursor = data.parent;
        }
        if absolute && cursor.is_some() {
            return Err(not_found().into());
        }
        Ok(id)
    }

    fn names_of(&self, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.nodes.get(*id))
            .map(|data| data.name.clone())
            .collect()
    }

    /// Returns `wanted` if free, otherwise the first free `<stem><n>`.
    fn unique_name(&self, wanted: &str) -> String {
        if !self.names.contains_key(wanted) {
            return wanted.to_owned();
        }
        let stem = wanted.trim_end_matches(|c: char| c.is_ascii_digit());
        (1..)
            .map(|n| format!("{stem}{n}"))
            .find(|candidate| !self.names.contains_key(candidate))
            .unwrap_or_else(|| wanted.to_owned())
    }

    fn insert(&mut self, name: &str, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let name = self.unique_name(name);
        let mut data = NodeData::new(name.clone(), kind);
        data.parent = parent;
        let id = self.nodes.insert(data);
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.push(id);
        }
        self.names.insert(name, id);
        id
    }

    /// Inserts a transform with one shape below it and returns its name.
    fn insert_shaped(&mut self, name: &str, shape: NodeKind, parent: Option<NodeId>) -> String {
        let transform = self.insert(name, NodeKind::transform(), parent);
        let transform_name = self.nodes[transform].name.clone();
        self.insert(&shape_name(&transform_name), shape, Some(transform));
        debug!(node = %transform_name, "created node");
        transform_name
    }

    fn reparent(&mut self, child: NodeId, new_parent: Option<NodeId>) {
        let old_parent = self.nodes.get(child).and_then(|data| data.parent);
        if let Some(old) = old_parent.and_then(|p| self.nodes.get_mut(p)) {
            old.children.retain(|c| *c != child);
        }
        if let Some(data) = self.nodes.get_mut(child) {
            data.parent = new_parent;
        }
        if let Some(parent) = new_parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.push(child);
        }
    }

    /// Sum of the translations of `id` and all its ancestors.
    fn world_offset(&self, id: NodeId) -> Vector3 {
        let mut total = Vector3::zeros();
        let mut cursor = Some(id);
        while let Some(data) = cursor.and_then(|c| self.nodes.get(c)) {
            if let NodeKind::Transform { translation } = &data.kind {
                total += translation;
            }
            cursor = data.parent;
        }
        total
    }

    /// Finds the curve held by `id` itself or by its first curve shape.
    fn curve_shape(&self, id: NodeId) -> Result<(NodeId, &Polyline)> {
        let data = self.node(id)?;
        std::iter::once(id)
            .chain(data.children.iter().copied())
            .find_map(|cid| match &self.nodes.get(cid)?.kind {
                NodeKind::Curve(curve) => Some((cid, curve)),
                _ => None,
            })
            .ok_or_else(|| {
                SceneError::HostFailure(format!("{} has no curve shape", data.name)).into()
            })
    }

    fn world_curve_of(&self, id: NodeId) -> Result<Polyline> {
        let (shape, curve) = self.curve_shape(id)?;
        Ok(curve.translated(&self.world_offset(shape)))
    }

    /// Consumes a pending fault for `op`, if one is due.
    fn check_fault(&mut self, op: SceneOp) -> Result<()> {
        let Some(index) = self.faults.iter().position(|f| f.op == op) else {
            return Ok(());
        };
        if self.faults[index].remaining == 0 {
            self.faults.remove(index);
            return Err(SceneError::HostFailure(format!("{op} failed")).into());
        }
        self.faults[index].remaining -= 1;
        Ok(())
    }
}

impl SceneGraph for MemoryScene {
    fn exists(&self, node: &str) -> bool {
        self.lookup(node).is_ok()
    }

    fn node_type(&self, node: &str) -> Result<NodeType> {
        let id = self.lookup(node)?;
        Ok(self.node(id)?.kind.node_type())
    }

    fn parent(&self, node: &str) -> Result<Option<String>> {
        let id = self.lookup(node)?;
        let parent = self.node(id)?.parent;
        Ok(parent.and_then(|p| self.nodes.get(p)).map(|p| p.name.clone()))
    }

    fn shapes(&self, node: &str) -> Result<Vec<String>> {
        let id = self.lookup(node)?;
        let shapes: Vec<NodeId> = self
            .node(id)?
            .children
            .iter()
            .copied()
            .filter(|c| self.nodes.get(*c).is_some_and(|d| d.kind.is_shape()))
            .collect();
        Ok(self.names_of(&shapes))
    }

    fn offset_curve(&mut self, shape: &str, distance: f64, tolerance: f64) -> Result<Vec<String>> {
        self.check_fault(SceneOp::OffsetCurve)?;
        let id = self.lookup(shape)?;
        let offset = self
            .world_curve_of(id)?
            .deduplicated(tolerance)?
            .offset(distance)?;
        let result = self.insert_shaped("offsetNurbsCurve1", NodeKind::Curve(offset), None);
        self.calls.push(SceneCall::OffsetCurve {
            shape: shape.to_owned(),
            distance,
            result: result.clone(),
        });
        Ok(vec![result])
    }

    fn duplicate(&mut self, node: &str) -> Result<Vec<String>> {
        self.check_fault(SceneOp::Duplicate)?;
        let mut id = self.lookup(node)?;
        let original = self.node(id)?;
        if original.kind.is_shape() {
            if let Some(parent) = original.parent {
                id = parent;
            }
        }

        let original = self.node(id)?.clone();
        let copy = self.insert(&original.name, original.kind.clone(), original.parent);
        let copy_name = self.nodes[copy].name.clone();
        for child in &original.children {
            let Some(data) = self.nodes.get(*child) else {
                continue;
            };
            if data.kind.is_shape() {
                let kind = data.kind.clone();
                self.insert(&shape_name(&copy_name), kind, Some(copy));
            }
        }

        self.calls.push(SceneCall::Duplicate {
            node: node.to_owned(),
            result: copy_name.clone(),
        });
        Ok(vec![copy_name])
    }

    fn translate(&mut self, node: &str, delta: &Vector3) -> Result<()> {
        self.check_fault(SceneOp::Translate)?;
        let id = self.lookup(node)?;
        let data = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| SceneError::NodeNotFound(node.to_owned()))?;
        match &mut data.kind {
            NodeKind::Transform { translation } => *translation += delta,
            NodeKind::Curve(curve) => *curve = curve.translated(delta),
            NodeKind::Surface(_) | NodeKind::Other(_) => {
                return Err(SceneError::HostFailure(format!("cannot move {node}")).into());
            }
        }
        self.calls.push(SceneCall::Translate {
            node: node.to_owned(),
            delta: *delta,
        });
        Ok(())
    }

    fn loft(
        &mut self,
        first: &str,
        second: &str,
        name: &str,
        options: &LoftOptions,
    ) -> Result<Vec<String>> {
        self.check_fault(SceneOp::Loft)?;
        if options.degree != 1 {
            return Err(
                SceneError::UnsupportedOption(format!("loft degree {}", options.degree)).into(),
            );
        }
        let a = self.world_curve_of(self.lookup(first)?)?;
        let b = self.world_curve_of(self.lookup(second)?)?;
        let surface = RuledSurface::loft(&a, &b, options.auto_reverse)?;
        let result = self.insert_shaped(name, NodeKind::Surface(surface), None);
        self.calls.push(SceneCall::Loft {
            first: first.to_owned(),
            second: second.to_owned(),
            result: result.clone(),
        });
        Ok(vec![result])
    }

    fn rename(&mut self, node: &str, name: &str) -> Result<String> {
        self.check_fault(SceneOp::Rename)?;
        let id = self.lookup(node)?;
        let old = self.node(id)?.name.clone();
        let new = if old == name {
            old.clone()
        } else {
            self.unique_name(name)
        };
        self.names.remove(&old);
        self.names.insert(new.clone(), id);
        if let Some(data) = self.nodes.get_mut(id) {
            data.name.clone_from(&new);
        }
        self.calls.push(SceneCall::Rename {
            from: old,
            to: new.clone(),
        });
        Ok(new)
    }

    fn group(&mut self, nodes: &[String], name: &str) -> Result<String> {
        self.check_fault(SceneOp::Group)?;
        let members = nodes
            .iter()
            .map(|n| self.lookup(n))
            .collect::<Result<Vec<_>>>()?;
        let group = self.insert(name, NodeKind::transform(), None);
        for member in members {
            self.reparent(member, Some(group));
        }
        let result = self.nodes[group].name.clone();
        self.calls.push(SceneCall::Group {
            members: nodes.to_vec(),
            result: result.clone(),
        });
        Ok(result)
    }

    fn selection(&self) -> Vec<String> {
        self.names_of(&self.selection)
    }

    fn select(&mut self, nodes: &[String]) -> Result<()> {
        self.selection = nodes
            .iter()
            .map(|n| self.lookup(n))
            .collect::<Result<Vec<_>>>()?;
        self.calls.push(SceneCall::Select(nodes.to_vec()));
        Ok(())
    }

    fn notify(&mut self, message: &str) {
        info!(status = message, "status message shown");
        self.calls.push(SceneCall::Notify(message.to_owned()));
    }

    fn warn(&mut self, message: &str) {
        warn!(warning = message, "warning shown");
        self.calls.push(SceneCall::Warn(message.to_owned()));
    }
}

/// Host-style shape name for a transform: `curve1` becomes `curveShape1`.
fn shape_name(transform: &str) -> String {
    let stem = transform.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &transform[stem.len()..];
    format!("{stem}Shape{digits}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::RoadbedError;
    use crate::math::Point3;
    use approx::assert_relative_eq;

    fn line() -> Polyline {
        Polyline::open(vec![Point3::origin(), Point3::new(10.0, 0.0, 0.0)]).unwrap()
    }

    #[test]
    fn shape_names_follow_host_convention() {
        assert_eq!(shape_name("curve1"), "curveShape1");
        assert_eq!(shape_name("road"), "roadShape");
    }

    #[test]
    fn add_curve_creates_transform_and_shape() {
        let mut scene = MemoryScene::new();
        let name = scene.add_curve("curve1", line());
        assert_eq!(name, "curve1");
        assert_eq!(scene.node_count(), 2);
        assert_eq!(scene.shapes("curve1").unwrap(), vec!["curveShape1"]);
        assert_eq!(scene.node_type("curveShape1").unwrap(), NodeType::NurbsCurve);
        assert_eq!(scene.parent("curveShape1").unwrap().as_deref(), Some("curve1"));
    }

    #[test]
    fn colliding_names_get_suffix() {
        let mut scene = MemoryScene::new();
        scene.add_curve("curve1", line());
        assert_eq!(scene.add_curve("curve1", line()), "curve2");
        assert_eq!(scene.add_transform("road"), "road");
        assert_eq!(scene.add_transform("road"), "road1");
    }

    #[test]
    fn paths_must_match_ancestors() {
        let mut scene = MemoryScene::new();
        scene.add_curve("curve1", line());
        assert!(scene.exists("|curve1"));
        assert!(scene.exists("curve1|curveShape1"));
        assert!(scene.exists("|curve1|curveShape1"));
        assert!(!scene.exists("other|curveShape1"));
        assert!(!scene.exists("|curveShape1"));
        assert!(!scene.exists(""));
    }

    #[test]
    fn empty_path_segments_do_not_resolve() {
        let mut scene = MemoryScene::new();
        scene.add_curve("curve1", line());
        for path in ["curve1|", "curve1||", "||curve1", "curve1||curveShape1", "|"] {
            assert!(!scene.exists(path), "{path} should not resolve");
            assert!(matches!(
                scene.node_type(path),
                Err(RoadbedError::Scene(SceneError::NodeNotFound(_)))
            ));
        }
    }

    #[test]
    fn offset_creates_new_curve_at_root() {
        let mut scene = MemoryScene::new();
        scene.add_curve("curve1", line());
        let result = scene.offset_curve("curveShape1", 2.0, 1e-3).unwrap();
        assert_eq!(result, vec!["offsetNurbsCurve1"]);
        let curve = scene.world_curve("offsetNurbsCurve1").unwrap();
        assert_relative_eq!(curve.points()[0].z, -2.0);
    }

    #[test]
    fn duplicate_copies_shapes_and_translation() {
        let mut scene = MemoryScene::new();
        scene.add_curve("edge", line());
        scene.translate("edge", &Vector3::new(0.0, 1.0, 0.0)).unwrap();
        let copy = scene.duplicate("edge").unwrap();
        assert_eq!(copy, vec!["edge1"]);
        assert_eq!(scene.shapes("edge1").unwrap(), vec!["edgeShape1"]);
        assert_relative_eq!(scene.translation("edge1").unwrap().y, 1.0);
    }

    #[test]
    fn world_curve_includes_ancestor_translation() {
        let mut scene = MemoryScene::new();
        scene.add_curve("edge", line());
        let group = scene.group(&["edge".to_owned()], "grp").unwrap();
        scene.translate(&group, &Vector3::new(0.0, 0.0, 5.0)).unwrap();
        let curve = scene.world_curve("grp|edge").unwrap();
        assert_relative_eq!(curve.points()[1], Point3::new(10.0, 0.0, 5.0));
    }

    #[test]
    fn rename_uniquifies() {
        let mut scene = MemoryScene::new();
        scene.add_transform("taken");
        scene.add_transform("other");
        assert_eq!(scene.rename("other", "taken").unwrap(), "taken1");
        assert!(!scene.exists("other"));
        assert_eq!(scene.rename("taken1", "taken1").unwrap(), "taken1");
    }

    #[test]
    fn group_reparents_members() {
        let mut scene = MemoryScene::new();
        scene.add_transform("a");
        scene.add_transform("b");
        let group = scene.group(&["a".to_owned(), "b".to_owned()], "grp").unwrap();
        assert_eq!(scene.children(&group).unwrap(), vec!["a", "b"]);
        assert_eq!(scene.parent("a").unwrap().as_deref(), Some("grp"));
        assert!(scene.shapes(&group).unwrap().is_empty());
    }

    #[test]
    fn loft_rejects_higher_degree() {
        let mut scene = MemoryScene::new();
        scene.add_curve("a", line());
        scene.add_curve("b", line().translated(&Vector3::new(0.0, 0.0, 1.0)));
        let cubic = LoftOptions {
            degree: 3,
            ..LoftOptions::ruled()
        };
        assert!(scene.loft("a", "b", "srf", &cubic).is_err());
        let ok = scene.loft("a", "b", "srf", &LoftOptions::ruled()).unwrap();
        assert_eq!(ok, vec!["srf"]);
        assert_eq!(scene.node_type("srfShape").unwrap(), NodeType::NurbsSurface);
        assert_eq!(scene.surface("srf").unwrap().ruling_count(), 2);
    }

    #[test]
    fn injected_fault_fires_once() {
        let mut scene = MemoryScene::new();
        scene.add_curve("a", line());
        scene.fail_after(SceneOp::Duplicate, 1);
        assert!(scene.duplicate("a").is_ok());
        assert!(scene.duplicate("a").is_err());
        assert!(scene.duplicate("a").is_ok());
    }

    #[test]
    fn select_records_and_reports() {
        let mut scene = MemoryScene::new();
        scene.add_transform("a");
        scene.select(&["a".to_owned()]).unwrap();
        assert_eq!(scene.selection(), vec!["a"]);
        assert!(scene.select(&["missing".to_owned()]).is_err());
        assert_eq!(scene.selection(), vec!["a"]);
        scene.warn("careful");
        scene.notify("done");
        assert_eq!(scene.warnings(), vec!["careful"]);
        assert_eq!(scene.notifications(), vec!["done"]);
        assert_eq!(scene.edits().count(), 0);
    }
}
