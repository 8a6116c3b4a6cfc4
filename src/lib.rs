pub mod adapter;
pub mod error;
pub mod form;
pub mod geometry;
pub mod math;
pub mod profile;
pub mod scene;

pub use error::{BuildError, Result, RoadbedError};
pub use form::{FormOutcome, ParameterForm};
pub use profile::{build_road, BuildOptions, BuildRoad, RoadBuild, RoadParameters};
pub use scene::{MemoryScene, SceneGraph};
