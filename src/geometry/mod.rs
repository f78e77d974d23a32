pub mod parametric_curve;
pub mod parametric_surface;

pub use parametric_curve::*;
pub use parametric_surface::*;
