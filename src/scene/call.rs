use std::fmt;

use crate::math::Vector3;

/// Kinds of scene edits that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOp {
    OffsetCurve,
    Duplicate,
    Translate,
    Loft,
    Rename,
    Group,
}

impl fmt::Display for SceneOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OffsetCurve => "offsetCurve",
            Self::Duplicate => "duplicate",
            Self::Translate => "move",
            Self::Loft => "loft",
            Self::Rename => "rename",
            Self::Group => "group",
        };
        f.write_str(name)
    }
}

/// One recorded call into a [`super::MemoryScene`].
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCall {
    OffsetCurve {
        shape: String,
        distance: f64,
        result: String,
    },
    Duplicate {
        node: String,
        result: String,
    },
    Translate {
        node: String,
        delta: Vector3,
    },
    Loft {
        first: String,
        second: String,
        result: String,
    },
    Rename {
        from: String,
        to: String,
    },
    Group {
        members: Vec<String>,
        result: String,
    },
    Select(Vec<String>),
    Notify(String),
    Warn(String),
}

impl SceneCall {
    /// Returns the edit kind, or `None` for selection and messages.
    #[must_use]
    pub fn op(&self) -> Option<SceneOp> {
        match self {
            Self::OffsetCurve { .. } => Some(SceneOp::OffsetCurve),
            Self::Duplicate { .. } => Some(SceneOp::Duplicate),
            Self::Translate { .. } => Some(SceneOp::Translate),
            Self::Loft { .. } => Some(SceneOp::Loft),
            Self::Rename { .. } => Some(SceneOp::Rename),
            Self::Group { .. } => Some(SceneOp::Group),
            Self::Select(_) | Self::Notify(_) | Self::Warn(_) => None,
        }
    }
}
