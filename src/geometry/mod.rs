pub mod curve;
pub mod surface;

pub use curve::{Curve, CurveDomain, Polyline};
pub use surface::{RuledSurface, Surface, SurfaceDomain};
