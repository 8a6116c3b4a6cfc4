use crate::error::{GeometryError, Result};
use crate::math::ground::{flatten, ground_direction, left_normal, line_line_intersect};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// Maximum mitre distance as a multiple of `|distance|`. Longer mitres are
/// pulled back along the corner bisector so every input vertex still maps
/// to exactly one output vertex.
const MITER_LIMIT: f64 = 4.0;

/// A piecewise-linear approximation of a NURBS curve.
///
/// Parameter `t` runs from `0` at the first vertex to `segment_count()` at
/// the last one (or back at the first, for closed curves), one unit per
/// segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point3>,
    closed: bool,
}

impl Polyline {
    /// Creates a polyline from its vertices.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooFewPoints`] for fewer than two vertices.
    pub fn new(points: Vec<Point3>, closed: bool) -> Result<Self> {
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints {
                required: 2,
                actual: points.len(),
            }
            .into());
        }
        Ok(Self { points, closed })
    }

    /// Creates an open polyline.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than two vertices.
    pub fn open(points: Vec<Point3>) -> Result<Self> {
        Self::new(points, false)
    }

    /// Returns the vertices.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a polyline has at least two vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the number of segments, counting the closing one.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        if self.closed {
            self.points.len()
        } else {
            self.points.len() - 1
        }
    }

    /// Returns the total length of all segments.
    #[must_use]
    pub fn length(&self) -> f64 {
        (0..self.segment_count())
            .map(|i| {
                let (a, b) = self.segment(i);
                (b - a).norm()
            })
            .sum()
    }

    /// Returns a copy moved by `delta`.
    #[must_use]
    pub fn translated(&self, delta: &Vector3) -> Self {
        Self {
            points: self.points.iter().map(|p| p + delta).collect(),
            closed: self.closed,
        }
    }

    /// Returns a copy running in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
            closed: self.closed,
        }
    }

    /// Merges consecutive vertices closer than `tolerance`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooFewPoints`] if the curve collapses.
    pub fn deduplicated(&self, tolerance: f64) -> Result<Self> {
        let tol = tolerance.max(TOLERANCE);
        let mut points: Vec<Point3> = Vec::with_capacity(self.points.len());
        for &pt in &self.points {
            if points.last().is_some_and(|last| (pt - last).norm() < tol) {
                continue;
            }
            points.push(pt);
        }
        if self.closed && points.len() > 2 {
            if let (Some(first), Some(last)) = (points.first(), points.last()) {
                if (last - first).norm() < tol {
                    points.pop();
                }
            }
        }
        Self::new(points, self.closed)
    }

    /// Offsets the curve in the ground plane.
    ///
    /// Positive distances move to the left of the direction of travel when
    /// looking down the up axis, negative distances to the right. Each vertex
    /// keeps its elevation. Corners use mitre joins, clamped to
    /// [`MITER_LIMIT`] times the distance.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if a segment has no extent in the
    /// ground plane.
    pub fn offset(&self, distance: f64) -> Result<Self> {
        if distance.abs() < TOLERANCE {
            return Ok(self.clone());
        }

        let segment_count = self.segment_count();
        let mut directions = Vec::with_capacity(segment_count);
        for i in 0..segment_count {
            let (a, b) = self.segment(i);
            directions.push(ground_direction(a, b)?);
        }

        let n = self.points.len();
        let mut result = Vec::with_capacity(n);
        for (i, corner) in self.points.iter().enumerate() {
            let incoming = if i > 0 {
                Some(i - 1)
            } else if self.closed {
                Some(segment_count - 1)
            } else {
                None
            };
            let outgoing = (i < segment_count).then_some(i);

            let point = match (incoming, outgoing) {
                (Some(prev), Some(next)) => {
                    mitre_corner(corner, &directions[prev], &directions[next], distance)
                }
                (Some(seg), None) | (None, Some(seg)) => {
                    corner + left_normal(&directions[seg]) * distance
                }
                (None, None) => *corner,
            };
            result.push(point);
        }

        Self::new(result, self.closed)
    }

    /// Resamples the curve to `count` vertices spaced evenly by arc length.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooFewPoints`] if `count < 2`.
    pub fn resampled(&self, count: usize) -> Result<Self> {
        if count < 2 {
            return Err(GeometryError::TooFewPoints {
                required: 2,
                actual: count,
            }
            .into());
        }
        if count == self.points.len() {
            return Ok(self.clone());
        }

        let total = self.length();
        let spans = if self.closed { count } else { count - 1 };
        let mut cumulative = Vec::with_capacity(self.segment_count());
        let mut acc = 0.0;
        for i in 0..self.segment_count() {
            let (a, b) = self.segment(i);
            acc += (b - a).norm();
            cumulative.push(acc);
        }

        #[allow(clippy::cast_precision_loss)]
        let points = (0..count)
            .map(|k| {
                let target = total * k as f64 / spans as f64;
                let seg = cumulative
                    .iter()
                    .position(|&len| len >= target - TOLERANCE)
                    .unwrap_or(cumulative.len() - 1);
                let seg_start = if seg == 0 { 0.0 } else { cumulative[seg - 1] };
                let seg_len = cumulative[seg] - seg_start;
                let (a, b) = self.segment(seg);
                if seg_len < TOLERANCE {
                    *a
                } else {
                    a + (b - a) * ((target - seg_start) / seg_len)
                }
            })
            .collect();

        Self::new(points, self.closed)
    }

    fn segment(&self, i: usize) -> (&Point3, &Point3) {
        let j = (i + 1) % self.points.len();
        (&self.points[i], &self.points[j])
    }
}

impl Curve for Polyline {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let domain = self.domain();
        if !domain.contains(t) {
            return Err(GeometryError::Degenerate(format!(
                "parameter {t} outside [{}, {}]",
                domain.t_min, domain.t_max
            ))
            .into());
        }
        let (seg, local) = self.locate(t);
        let (a, b) = self.segment(seg);
        Ok(a + (b - a) * local)
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        let (seg, _) = self.locate(t);
        let (a, b) = self.segment(seg);
        (b - a)
            .try_normalize(TOLERANCE)
            .ok_or_else(|| GeometryError::ZeroVector.into())
    }

    #[allow(clippy::cast_precision_loss)]
    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, self.segment_count() as f64)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Polyline {
    /// Splits parameter `t` into a segment index and a local `[0, 1]` offset.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn locate(&self, t: f64) -> (usize, f64) {
        let last = self.segment_count() - 1;
        let seg = (t.max(0.0).floor() as usize).min(last);
        (seg, t - seg as f64)
    }
}

/// Places the offset vertex for a corner between two segments.
fn mitre_corner(corner: &Point3, dir_prev: &Vector3, dir_next: &Vector3, distance: f64) -> Point3 {
    let n_prev = left_normal(dir_prev);
    let n_next = left_normal(dir_next);
    let a = corner + n_prev * distance;
    let b = corner + n_next * distance;

    let Some(t) = line_line_intersect(&a, dir_prev, &b, dir_next) else {
        return a;
    };

    let mitre = flatten(&(a + dir_prev * t - corner));
    let limit = MITER_LIMIT * distance.abs();
    let mitre = if mitre.norm() > limit {
        mitre.normalize() * limit
    } else {
        mitre
    };
    corner + mitre
}
