//! Derives the road's profile curves and surfaces from one centerline.

mod build;
mod params;
mod plan;
pub mod rules;

pub use build::{build_road, BuildOptions, BuildRoad, RoadBuild, RoadGroups};
pub use params::{Param, RoadParameters};
pub use plan::{CurveKey, GroupNames, PlanStep, RoadPlan, StepInput};
pub use rules::{Rule, Side, Source, ROAD_PROFILE};
