//! Math utilities for the synthesis path.
//!
//! Allocation-free helpers suitable for `no_std`: saturation, denormal
//! protection, and interpolation.

use libm::tanhf;

/// Soft saturation with drive and makeup gain.
///
/// `tanh(x * drive) * makeup` bounds the signal into (-makeup, makeup)
/// while adding gentle odd-harmonic coloration. The output stage of the
/// engine uses `drive = 1.2`, `makeup = 0.8`, which keeps the final
/// signal safely inside [-1, 1].
///
/// # Example
/// ```rust
/// use tines_core::soft_saturate;
///
/// let out = soft_saturate(10.0, 1.2, 0.8);
/// assert!(out < 0.8 && out > 0.79);
/// ```
#[inline]
pub fn soft_saturate(x: f32, drive: f32, makeup: f32) -> f32 {
    tanhf(x * drive) * makeup
}

/// Flush denormal values to zero.
///
/// IEEE 754 subnormals (below ~1.2e-38) cause severe performance
/// degradation on most architectures. Feedback loops that decay toward
/// silence must flush their state before it reaches the subnormal range.
/// The 1e-20 threshold is far below audibility.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Linear interpolation between two values.
///
/// Returns `a` at `t = 0` and `b` at `t = 1`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
