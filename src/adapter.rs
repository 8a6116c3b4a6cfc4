//! Normalizes host return values so the builder can treat "a curve" as one
//! handle, whether the host handed back a transform or its shape.

use crate::error::{Result, SceneError};
use crate::scene::SceneGraph;

/// Returns the transform that owns `node` if it is a geometry shape,
/// otherwise `node` itself.
///
/// # Errors
///
/// Returns an error if `node` does not exist.
pub fn resolve_transform<S: SceneGraph + ?Sized>(scene: &S, node: &str) -> Result<String> {
    if scene.node_type(node)?.is_shape() {
        if let Some(parent) = scene.parent(node)? {
            return Ok(parent);
        }
    }
    Ok(node.to_owned())
}

/// [`resolve_transform`] for the single-element lists host commands return.
///
/// # Errors
///
/// Returns [`SceneError::EmptyResult`] for an empty list, or an error if the
/// first node does not exist.
pub fn resolve_first_transform<S: SceneGraph + ?Sized>(
    scene: &S,
    nodes: &[String],
    command: &'static str,
) -> Result<String> {
    let first = nodes.first().ok_or(SceneError::EmptyResult(command))?;
    resolve_transform(scene, first)
}

/// Returns the first shape below `transform`, or `transform` itself when
/// it has none.
///
/// # Errors
///
/// Returns an error if `transform` does not exist.
pub fn shape_of<S: SceneGraph + ?Sized>(scene: &S, transform: &str) -> Result<String> {
    Ok(scene
        .shapes(transform)?
        .into_iter()
        .next()
        .unwrap_or_else(|| transform.to_owned()))
}
