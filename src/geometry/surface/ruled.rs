use crate::error::{GeometryError, Result};
use crate::geometry::curve::{Curve, Polyline};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// A degree-1 loft between two profile curves.
///
/// `u` runs along the profiles, `v` across from the first profile (`v = 0`)
/// to the second (`v = 1`). Every iso-`u` line is straight.
#[derive(Debug, Clone, PartialEq)]
pub struct RuledSurface {
    first: Polyline,
    second: Polyline,
}

impl RuledSurface {
    /// Lofts two profiles.
    ///
    /// Profiles with different vertex counts are resampled by arc length to
    /// the larger count. With `auto_reverse`, the second profile is flipped
    /// when it runs against the first.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if one profile is open and the
    /// other closed.
    pub fn loft(first: &Polyline, second: &Polyline, auto_reverse: bool) -> Result<Self> {
        if first.is_closed() != second.is_closed() {
            return Err(GeometryError::Degenerate(
                "cannot loft an open profile with a closed one".to_owned(),
            )
            .into());
        }

        let count = first.len().max(second.len());
        let first = first.resampled(count)?;
        let mut second = second.resampled(count)?;

        if auto_reverse && runs_against(&first, &second) {
            second = second.reversed();
        }

        Ok(Self { first, second })
    }

    /// Returns the profile at `v = 0`.
    #[must_use]
    pub fn first(&self) -> &Polyline {
        &self.first
    }

    /// Returns the profile at `v = 1`.
    #[must_use]
    pub fn second(&self) -> &Polyline {
        &self.second
    }

    /// Returns the straight ruling line joining vertex `i` of both profiles.
    #[must_use]
    pub fn ruling(&self, i: usize) -> Option<(Point3, Point3)> {
        let a = self.first.points().get(i)?;
        let b = self.second.points().get(i)?;
        Some((*a, *b))
    }

    /// Returns the number of ruling lines through profile vertices.
    #[must_use]
    pub fn ruling_count(&self) -> usize {
        self.first.len()
    }
}

impl Surface for RuledSurface {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let a = self.first.evaluate(u)?;
        let b = self.second.evaluate(u)?;
        Ok(a + (b - a) * v)
    }

    fn normal(&self, u: f64, v: f64) -> Result<Vector3> {
        let a = self.first.evaluate(u)?;
        let b = self.second.evaluate(u)?;
        let along = self.first.tangent(u)? * (1.0 - v) + self.second.tangent(u)? * v;
        along
            .cross(&(b - a))
            .try_normalize(TOLERANCE)
            .ok_or_else(|| GeometryError::ZeroVector.into())
    }

    fn domain(&self) -> SurfaceDomain {
        let u = self.first.domain();
        SurfaceDomain::new(u.t_min, u.t_max, 0.0, 1.0)
    }
}

/// Whether pairing the first vertices gives longer rulings than pairing
/// the first of one profile with the last of the other.
fn runs_against(first: &Polyline, second: &Polyline) -> bool {
    let (Some(a0), Some(a1), Some(b0), Some(b1)) = (
        first.points().first(),
        first.points().last(),
        second.points().first(),
        second.points().last(),
    ) else {
        return false;
    };
    let straight = (b0 - a0).norm() + (b1 - a1).norm();
    let crossed = (b1 - a0).norm() + (b0 - a1).norm();
    crossed + TOLERANCE < straight
}
