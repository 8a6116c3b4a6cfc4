//! Presentation model for the road builder window.
//!
//! The form owns six editable values and turns a "Build Road" press into a
//! [`BuildRoad`] run on the first selected node. The host draws the window;
//! messages go through [`SceneGraph::notify`] and [`SceneGraph::warn`].

use tracing::{instrument, warn};

use crate::error::{BuildError, Result};
use crate::profile::{BuildOptions, BuildRoad, Param, RoadBuild, RoadParameters};
use crate::scene::SceneGraph;

pub const TITLE: &str = "NURBS Road Builder";
pub const HINT: &str = "Select the centerline NURBS curve before running.";
pub const BUILD_LABEL: &str = "Build Road";
pub const CLOSE_LABEL: &str = "Close";
pub const NO_SELECTION_WARNING: &str =
    "Please select a NURBS curve to use as the road centerline.";
pub const SUCCESS_STATUS: &str = "Road system created.";

/// One labelled numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormField {
    pub param: Param,
    pub label: &'static str,
    pub value: f64,
}

/// What a build press led to.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// The road was built; the master group is now selected.
    Built(RoadBuild),
    /// Nothing was selected.
    NoSelection,
    /// The builder rejected the selection; the message was shown as a warning.
    Rejected(String),
}

/// The six road parameters, pre-filled with defaults, plus build settings.
#[derive(Debug, Clone)]
pub struct ParameterForm {
    values: RoadParameters,
    options: BuildOptions,
    open: bool,
}

impl Default for ParameterForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterForm {
    /// Opens a form with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: RoadParameters::default(),
            options: BuildOptions::default(),
            open: true,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// The fields in display order.
    #[must_use]
    pub fn fields(&self) -> Vec<FormField> {
        Param::ALL
            .into_iter()
            .map(|param| FormField {
                param,
                label: param.label(),
                value: self.values.get(param),
            })
            .collect()
    }

    #[must_use]
    pub fn value(&self, param: Param) -> f64 {
        self.values.get(param)
    }

    pub fn set(&mut self, param: Param, value: f64) {
        self.values = self.values.with(param, value);
    }

    /// Sets a field from user-typed text.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidField`] if `text` is not a finite number;
    /// the field keeps its old value.
    pub fn set_text(&mut self, param: Param, text: &str) -> Result<()> {
        let value = text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| BuildError::InvalidField {
                field: param.key(),
                text: text.to_owned(),
            })?;
        self.set(param, value);
        Ok(())
    }

    /// The values as they would be passed to the builder.
    #[must_use]
    pub fn parameters(&self) -> RoadParameters {
        self.values
    }

    /// Restores every field to its default.
    pub fn reset(&mut self) {
        self.values = RoadParameters::default();
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Shows the form again, with fresh defaults.
    pub fn open(&mut self) {
        self.reset();
        self.open = true;
    }

    /// Handles a "Build Road" press.
    ///
    /// An empty selection or a rejected centerline is reported as a warning
    /// and returned as an outcome. On success the master group is selected
    /// and a status message shown.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::FormClosed`] on a closed form, and passes on any
    /// error raised by the scene while building.
    #[instrument(skip_all)]
    pub fn build<S: SceneGraph + ?Sized>(&self, scene: &mut S) -> Result<FormOutcome> {
        if !self.open {
            return Err(BuildError::FormClosed.into());
        }

        let selection = scene.selection();
        let Some(centerline) = selection.first() else {
            warn!("build pressed with nothing selected");
            scene.warn(NO_SELECTION_WARNING);
            return Ok(FormOutcome::NoSelection);
        };

        let result = BuildRoad::new(centerline.as_str(), self.values)
            .with_options(self.options)
            .execute(scene);
        match result {
            Ok(build) => {
                scene.select(&[build.groups.master.clone()])?;
                scene.notify(SUCCESS_STATUS);
                Ok(FormOutcome::Built(build))
            }
            Err(err) if err.is_input_error() => {
                let message = err.to_string();
                warn!(%message, "centerline rejected");
                scene.warn(&message);
                Ok(FormOutcome::Rejected(message))
            }
            Err(err) => Err(err),
        }
    }
}
