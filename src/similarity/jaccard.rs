use crate::similarity::FeatureSet;

/// Jaccard index of two feature sets: `|a ∩ b| / |a ∪ b|`.
///
/// A missing set on either side scores `0.0`, and so does an empty union.
/// The result is symmetric in its arguments and always lies in `[0, 1]`.
pub fn jaccard(a: Option<&FeatureSet>, b: Option<&FeatureSet>) -> f64 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return 0.0,
    };

    // Probe the larger set with the tokens of the smaller one
    let (smaller, larger) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = smaller
        .iter()
        .filter(|token| larger.contains(*token))
        .count();
    let union = a.len() + b.len() - intersection;

    if union == 0 {
        return 0.0;
    }

    let index = intersection as f64 / union as f64;
    tracing::trace!(intersection, union, index, "jaccard index");
    index
}
