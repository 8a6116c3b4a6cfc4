use std::collections::HashMap;

use tracing::{debug, info, instrument};

use crate::adapter::{resolve_first_transform, shape_of};
use crate::error::{BuildError, Result};
use crate::math::{up, Vector3};
use crate::scene::{LoftOptions, NodeType, SceneGraph};

use super::params::RoadParameters;
use super::plan::{CurveKey, PlanStep, RoadPlan, StepInput};

/// Settings passed through to the scene's geometry routines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    /// Fitting tolerance for offset curves.
    pub offset_tolerance: f64,
    /// Options for every loft.
    pub loft: LoftOptions,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            offset_tolerance: 1e-3,
            loft: LoftOptions::ruled(),
        }
    }
}

impl BuildOptions {
    #[must_use]
    pub fn with_offset_tolerance(mut self, tolerance: f64) -> Self {
        self.offset_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_loft(mut self, loft: LoftOptions) -> Self {
        self.loft = loft;
        self
    }
}

/// The three groups a build ends with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadGroups {
    /// Holds every profile curve.
    pub curves: String,
    /// Holds every profile surface.
    pub surfaces: String,
    /// Holds the other two groups.
    pub master: String,
}

impl RoadGroups {
    /// Curves group, surfaces group, master group.
    #[must_use]
    pub fn all(&self) -> [&str; 3] {
        [&self.curves, &self.surfaces, &self.master]
    }
}

/// Everything one build created, by the names the scene assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadBuild {
    pub curves: Vec<String>,
    pub surfaces: Vec<String>,
    pub groups: RoadGroups,
}

/// Builds a road cross-section from one centerline curve.
///
/// Runs [`RoadPlan`] against a [`SceneGraph`] step by step. The centerline
/// is checked before anything is created. After that, the first failing
/// scene call aborts the build and leaves the nodes created so far in place.
#[derive(Debug, Clone)]
pub struct BuildRoad {
    centerline: String,
    params: RoadParameters,
    options: BuildOptions,
}

impl BuildRoad {
    /// Creates a new `BuildRoad` operation.
    #[must_use]
    pub fn new(centerline: impl Into<String>, params: RoadParameters) -> Self {
        Self {
            centerline: centerline.into(),
            params,
            options: BuildOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Short name of the centerline: the last segment of its path.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.centerline
            .rsplit('|')
            .next()
            .unwrap_or(&self.centerline)
    }

    /// Executes the build.
    ///
    /// # Errors
    ///
    /// - [`BuildError::MissingInput`] if the centerline does not exist
    /// - [`BuildError::InvalidInputType`] if it is not a NURBS curve
    /// - any error the scene reports while building, unchanged
    #[instrument(skip(self, scene), fields(centerline = %self.centerline))]
    pub fn execute<S: SceneGraph + ?Sized>(&self, scene: &mut S) -> Result<RoadBuild> {
        self.validate(scene)?;

        let plan = RoadPlan::new(self.base_name(), &self.params)?;
        info!(base = plan.base(), steps = plan.steps().len(), "building road");

        let mut built: HashMap<CurveKey, String> = HashMap::new();
        let mut curves = Vec::new();
        let mut surfaces = Vec::new();

        for step in plan.steps() {
            match step {
                PlanStep::Offset {
                    output,
                    name,
                    source,
                    distance,
                } => {
                    let source = match source {
                        StepInput::Centerline => self.centerline.as_str(),
                        StepInput::Curve(key) => lookup(&built, *key)?,
                    };
                    debug!(%name, source, distance, "offset");
                    let curve = self.offset(scene, source, *distance, name)?;
                    built.insert(*output, curve.clone());
                    curves.push(curve);
                }
                PlanStep::Lift {
                    output,
                    name,
                    source,
                    height,
                } => {
                    let source = lookup(&built, *source)?;
                    debug!(%name, source, height, "lift");
                    let curve = lift(scene, source, *height, name)?;
                    built.insert(*output, curve.clone());
                    curves.push(curve);
                }
                PlanStep::Loft {
                    name,
                    first,
                    second,
                } => {
                    let first = lookup(&built, *first)?;
                    let second = lookup(&built, *second)?;
                    debug!(%name, first, second, "loft");
                    let result = scene.loft(first, second, name, &self.options.loft)?;
                    surfaces.push(resolve_first_transform(scene, &result, "loft")?);
                }
            }
        }

        let names = plan.group_names();
        let curves_group = scene.group(&curves, &names.curves)?;
        let surfaces_group = scene.group(&surfaces, &names.surfaces)?;
        let master = scene.group(
            &[curves_group.clone(), surfaces_group.clone()],
            &names.master,
        )?;

        info!(
            curves = curves.len(),
            surfaces = surfaces.len(),
            %master,
            "road built"
        );

        Ok(RoadBuild {
            curves,
            surfaces,
            groups: RoadGroups {
                curves: curves_group,
                surfaces: surfaces_group,
                master,
            },
        })
    }

    /// Checks the centerline exists and is a NURBS curve.
    fn validate<S: SceneGraph + ?Sized>(&self, scene: &S) -> Result<()> {
        if !scene.exists(&self.centerline) {
            return Err(BuildError::MissingInput(self.centerline.clone()).into());
        }
        let shape = shape_of(scene, &self.centerline)?;
        let found = scene.node_type(&shape)?;
        if found != NodeType::NurbsCurve {
            return Err(BuildError::InvalidInputType {
                node: self.centerline.clone(),
                found: found.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn offset<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        source: &str,
        distance: f64,
        name: &str,
    ) -> Result<String> {
        let shape = shape_of(scene, source)?;
        let result = scene.offset_curve(&shape, distance, self.options.offset_tolerance)?;
        let transform = resolve_first_transform(scene, &result, "offsetCurve")?;
        scene.rename(&transform, name)
    }
}

/// Builds a road with default [`BuildOptions`].
///
/// # Errors
///
/// See [`BuildRoad::execute`].
pub fn build_road<S: SceneGraph + ?Sized>(
    scene: &mut S,
    centerline: &str,
    params: &RoadParameters,
) -> Result<RoadBuild> {
    BuildRoad::new(centerline, *params).execute(scene)
}

/// Copies `source` under `name` and raises the copy by `height`.
fn lift<S: SceneGraph + ?Sized>(
    scene: &mut S,
    source: &str,
    height: f64,
    name: &str,
) -> Result<String> {
    let result = scene.duplicate(source)?;
    let copy = resolve_first_transform(scene, &result, "duplicate")?;
    let copy = scene.rename(&copy, name)?;
    if height != 0.0 {
        let delta: Vector3 = up() * height;
        scene.translate(&copy, &delta)?;
    }
    Ok(copy)
}

fn lookup(built: &HashMap<CurveKey, String>, key: CurveKey) -> Result<&str> {
    built
        .get(&key)
        .map(String::as_str)
        .ok_or_else(|| BuildError::UndefinedCurve(key.to_string()).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::RoadbedError;
    use crate::geometry::Polyline;
    use crate::math::Point3;
    use crate::scene::{MemoryScene, SceneCall};

    fn scene_with_centerline() -> MemoryScene {
        let mut scene = MemoryScene::new();
        let line = Polyline::open(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(20.0, 0.0, 0.0),
            Point3::new(40.0, 0.0, 10.0),
        ])
        .unwrap();
        scene.add_curve("curve1", line);
        scene
    }

    #[test]
    fn base_name_strips_path() {
        let op = BuildRoad::new("|roads|main|curve1", RoadParameters::default());
        assert_eq!(op.base_name(), "curve1");
        assert_eq!(BuildRoad::new("curve7", RoadParameters::default()).base_name(), "curve7");
    }

    #[test]
    fn builds_every_node() {
        let mut scene = scene_with_centerline();
        let build = build_road(&mut scene, "curve1", &RoadParameters::default()).unwrap();
        assert_eq!(build.curves.len(), 12);
        assert_eq!(build.surfaces.len(), 11);
        assert_eq!(build.groups.master, "curve1_roadSystem_GRP");
        // Centerline (2) + 23 transforms with one shape each + 3 groups.
        assert_eq!(scene.node_count(), 2 + 23 * 2 + 3);
    }

    #[test]
    fn shape_path_centerline_is_accepted() {
        let mut scene = scene_with_centerline();
        let build = build_road(&mut scene, "curve1|curveShape1", &RoadParameters::default())
            .unwrap();
        assert_eq!(build.curves[0], "curveShape1_road_L_crv");
    }

    #[test]
    fn zero_height_skips_translate() {
        let mut scene = scene_with_centerline();
        let params = RoadParameters::default().with_curb_height(0.0);
        build_road(&mut scene, "curve1", &params).unwrap();
        assert!(!scene
            .calls()
            .iter()
            .any(|c| matches!(c, SceneCall::Translate { .. })));
    }

    #[test]
    fn loft_options_reach_the_scene() {
        let mut scene = scene_with_centerline();
        let cubic = LoftOptions {
            degree: 3,
            ..LoftOptions::ruled()
        };
        let err = BuildRoad::new("curve1", RoadParameters::default())
            .with_options(BuildOptions::default().with_loft(cubic))
            .execute(&mut scene)
            .unwrap_err();
        assert!(matches!(err, RoadbedError::Scene(_)));
        assert!(!err.is_input_error());
    }
}
