// Threshold classification - pure value/threshold comparison
//
// A point "exceeds" when its value is strictly greater than the threshold;
// a value equal to the threshold classifies as within.

pub const EXCEEDED_COLOR: &str = "red";
pub const WITHIN_COLOR: &str = "green";

/// Classify every value against the threshold. The result runs parallel to
/// `values`; `result[i]` is true iff `values[i] > threshold`.
pub fn classify(values: &[f64], threshold: f64) -> Vec<bool> {
    values.iter().map(|v| *v > threshold).collect()
}

/// The per-point color encoding derived from classification.
pub fn point_colors(values: &[f64], threshold: f64) -> Vec<String> {
    classify(values, threshold)
        .into_iter()
        .map(|exceeds| {
            if exceeds { EXCEEDED_COLOR } else { WITHIN_COLOR }.to_string()
        })
        .collect()
}
