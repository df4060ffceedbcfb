//! Squared-Euclidean distance kernel with SIMD acceleration.
//!
//! Uses `wide::f32x8` to process 8 lanes per step, with a scalar tail for
//! dimensions that are not a multiple of 8. The summation order (lane
//! blocks, one horizontal sum, then the tail) is fixed, so repeated calls
//! on identical inputs return identical results and distance ties resolve
//! the same way every time.
//!
//! Squared distance is monotone with Euclidean distance, so ranking never
//! needs the square root.

use wide::f32x8;

/// Number of f32 elements processed per SIMD iteration.
const LANES: usize = 8;

#[inline]
fn to_lanes(chunk: &[f32]) -> [f32; LANES] {
    chunk.try_into().unwrap_or([0.0; LANES])
}

#[inline]
fn horizontal_sum(v: f32x8) -> f32 {
    v.to_array().iter().sum()
}

/// Squared L2 distance between two vectors, accumulated in single precision.
///
/// # Panics
///
/// Debug-panics if the vectors have different lengths; callers guarantee
/// both slices hold exactly one row of the same storage dimension.
#[inline]
#[must_use]
pub fn l2_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have the same dimension");

    let len = a.len();
    let simd_len = len - (len % LANES);

    let mut sum = f32x8::ZERO;
    for i in (0..simd_len).step_by(LANES) {
        let va = f32x8::new(to_lanes(&a[i..i + LANES]));
        let vb = f32x8::new(to_lanes(&b[i..i + LANES]));
        let diff = va - vb;
        sum += diff * diff;
    }

    let mut result = horizontal_sum(sum);
    for i in simd_len..len {
        let diff = a[i] - b[i];
        result += diff * diff;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_zero_distance() {
        let a = [1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        assert_eq!(l2_distance_squared(&a, &a), 0.0);
    }

    #[test]
    fn matches_scalar_reference() {
        let a: Vec<f32> = (0..37).map(|i| (i as f32 * 0.37).sin()).collect();
        let b: Vec<f32> = (0..37).map(|i| (i as f32 * 0.91).cos()).collect();

        let reference: f32 = a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum();

        let got = l2_distance_squared(&a, &b);
        assert!((got - reference).abs() < 1e-4, "got {got}, want {reference}");
    }

    #[test]
    fn short_vectors_use_the_scalar_tail() {
        let a = [1.0_f32, 1.0];
        let b = [3.0_f32, 4.0];
        // (1-3)^2 + (1-4)^2 = 13
        assert!((l2_distance_squared(&a, &b) - 13.0).abs() < 1e-6);
    }

    #[test]
    fn stable_between_calls() {
        let a: Vec<f32> = (0..129).map(|i| (i as f32 * 0.123).sin()).collect();
        let b: Vec<f32> = (0..129).map(|i| (i as f32 * 0.456).sin()).collect();
        let first = l2_distance_squared(&a, &b);
        for _ in 0..10 {
            assert_eq!(l2_distance_squared(&a, &b), first);
        }
    }
}
