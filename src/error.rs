use thiserror::Error;

/// Top-level error type for road construction.
#[derive(Debug, Error)]
pub enum RoadbedError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl RoadbedError {
    /// Returns `true` for the rejected-centerline errors the form reports
    /// as warnings.
    ///
    /// Everything else is left for the caller to surface.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Build(BuildError::MissingInput(_) | BuildError::InvalidInputType { .. })
        )
    }
}

/// Problems with what a build was asked to do, found before the host is touched.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("selected curve does not exist: {0}")]
    MissingInput(String),

    #[error("the selected object must be a NURBS curve: {node} is a {found}")]
    InvalidInputType { node: String, found: String },

    #[error("invalid value for {field}: {text:?}")]
    InvalidField { field: &'static str, text: String },

    #[error("the road builder form is closed")]
    FormClosed,

    #[error("profile rule refers to curve {0} before it is built")]
    UndefinedCurve(String),
}

/// Errors reported by a scene graph.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("{0} returned no nodes")]
    EmptyResult(&'static str),

    #[error("unsupported option: {0}")]
    UnsupportedOption(String),

    #[error("host operation failed: {0}")]
    HostFailure(String),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("at least {required} points are required, got {actual}")]
    TooFewPoints { required: usize, actual: usize },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Convenience type alias for results using [`RoadbedError`].
pub type Result<T> = std::result::Result<T, RoadbedError>;
