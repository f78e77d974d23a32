use nalgebra::RealField;
use num_traits::ToPrimitive;

/// Trait for floating point types (f32, f64)
/// Mainly used to identify the type of the field in nalgebra
pub trait FloatingPoint: RealField + ToPrimitive + Copy {}

impl FloatingPoint for f32 {}
impl FloatingPoint for f64 {}

/// Shared tolerance for parallelism, degeneracy, deduplication and
/// containment tests throughout the engine.
pub fn geometric_epsilon<T: FloatingPoint>() -> T {
    T::from_f64(1e-6).unwrap()
}
