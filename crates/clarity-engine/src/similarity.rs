use crate::text::TermVector;

/// Cosine similarity between two term-frequency vectors.
///
/// Returns 0 when either vector is empty. Counts are never negative, so the
/// result lies in `[0, 1]`; the upper bound is clamped to absorb rounding.
pub fn similarity(a: &TermVector, b: &TermVector) -> f64 {
    let norm = a.magnitude() * b.magnitude();
    if norm == 0.0 {
        return 0.0;
    }
    (a.dot(b) / norm).min(1.0)
}
