//! Distance functions for exact nearest-neighbor search

/// Squared Euclidean distance between two vectors of equal length.
///
/// The square root is skipped: ordering by squared distance is identical to
/// ordering by L2 distance.
#[inline]
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .fold(0.0, |acc, (x, y)| {
            let d = x - y;
            acc + d * d
        })
}
