use std::collections::HashSet;
use std::fmt;

use crate::error::{BuildError, Result};

use super::params::RoadParameters;
use super::rules::{Rule, Side, Source, ROAD_PROFILE};

/// Identifies a profile curve by role and side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurveKey {
    pub role: &'static str,
    pub side: Side,
}

impl CurveKey {
    #[must_use]
    pub fn new(role: &'static str, side: Side) -> Self {
        Self { role, side }
    }
}

impl fmt::Display for CurveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.role, self.side.tag())
    }
}

/// Input curve of an offset step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepInput {
    Centerline,
    Curve(CurveKey),
}

/// A rule resolved against one base name, one side and concrete values.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanStep {
    /// Offset `source` by the signed `distance`.
    Offset {
        output: CurveKey,
        name: String,
        source: StepInput,
        distance: f64,
    },
    /// Duplicate `source` and raise the copy by `height`.
    Lift {
        output: CurveKey,
        name: String,
        source: CurveKey,
        height: f64,
    },
    /// Ruled surface from `first` to `second`.
    Loft {
        name: String,
        first: CurveKey,
        second: CurveKey,
    },
}

impl PlanStep {
    /// Name of the node this step produces.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Offset { name, .. } | Self::Lift { name, .. } | Self::Loft { name, .. } => name,
        }
    }

    /// The curve this step produces, if it produces one.
    #[must_use]
    pub fn output(&self) -> Option<CurveKey> {
        match self {
            Self::Offset { output, .. } | Self::Lift { output, .. } => Some(*output),
            Self::Loft { .. } => None,
        }
    }
}

/// Names of the three result groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNames {
    pub curves: String,
    pub surfaces: String,
    pub master: String,
}

/// The ordered list of steps that builds one road.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadPlan {
    base: String,
    steps: Vec<PlanStep>,
}

impl RoadPlan {
    /// Expands [`ROAD_PROFILE`] for the centerline short name `base`.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in profile; see [`Self::from_rules`].
    pub fn new(base: &str, params: &RoadParameters) -> Result<Self> {
        Self::from_rules(base, params, ROAD_PROFILE)
    }

    /// Expands an arbitrary rule table.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UndefinedCurve`] if a rule refers to a curve no
    /// earlier rule produces.
    pub fn from_rules(base: &str, params: &RoadParameters, rules: &[Rule]) -> Result<Self> {
        let mut steps = Vec::new();
        let mut built: HashSet<CurveKey> = HashSet::new();
        let require = |built: &HashSet<CurveKey>, key: CurveKey| -> Result<CurveKey> {
            if built.contains(&key) {
                Ok(key)
            } else {
                Err(BuildError::UndefinedCurve(key.to_string()).into())
            }
        };

        for rule in rules {
            match *rule {
                Rule::Offset {
                    role,
                    source,
                    param,
                } => {
                    for side in Side::BOTH {
                        let source = match source {
                            Source::Centerline => StepInput::Centerline,
                            Source::Role(r) => {
                                StepInput::Curve(require(&built, CurveKey::new(r, side))?)
                            }
                        };
                        let output = CurveKey::new(role, side);
                        steps.push(PlanStep::Offset {
                            output,
                            name: curve_name(base, output),
                            source,
                            distance: side.sign() * params.get(param),
                        });
                        built.insert(output);
                    }
                }
                Rule::Lift {
                    role,
                    source,
                    param,
                } => {
                    for side in Side::BOTH {
                        let source = require(&built, CurveKey::new(source, side))?;
                        let output = CurveKey::new(role, side);
                        steps.push(PlanStep::Lift {
                            output,
                            name: curve_name(base, output),
                            source,
                            height: params.get(param),
                        });
                        built.insert(output);
                    }
                }
                Rule::Loft {
                    role,
                    first,
                    second,
                } => {
                    for side in Side::BOTH {
                        steps.push(PlanStep::Loft {
                            name: format!("{base}_{role}_{}_srf", side.tag()),
                            first: require(&built, CurveKey::new(first, side))?,
                            second: require(&built, CurveKey::new(second, side))?,
                        });
                    }
                }
                Rule::Bridge { role, curve } => {
                    steps.push(PlanStep::Loft {
                        name: format!("{base}_{role}_srf"),
                        first: require(&built, CurveKey::new(curve, Side::Left))?,
                        second: require(&built, CurveKey::new(curve, Side::Right))?,
                    });
                }
            }
        }

        Ok(Self {
            base: base.to_owned(),
            steps,
        })
    }

    /// The centerline short name every generated name starts with.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Names of the curves, in creation order.
    #[must_use]
    pub fn curve_names(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| s.output().is_some())
            .map(PlanStep::name)
            .collect()
    }

    /// Names of the surfaces, in creation order.
    #[must_use]
    pub fn surface_names(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| s.output().is_none())
            .map(PlanStep::name)
            .collect()
    }

    #[must_use]
    pub fn group_names(&self) -> GroupNames {
        let base = &self.base;
        GroupNames {
            curves: format!("{base}_roadCurves_GRP"),
            surfaces: format!("{base}_roadSurfaces_GRP"),
            master: format!("{base}_roadSystem_GRP"),
        }
    }
}

fn curve_name(base: &str, key: CurveKey) -> String {
    format!("{base}_{key}_crv")
}
