/// Ordinary least-squares slope of `values` against their positions `0, 1, 2, ...`.
///
/// Returns 0 when the fit is undefined (fewer than two points).
pub fn sequence_slope(values: &[f64]) -> f64 {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .map(|(index, value)| (index as f64, *value))
        .collect();
    least_squares_slope(&points)
}

/// `(n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)`, or 0 when the denominator vanishes.
pub fn least_squares_slope(points: &[(f64, f64)]) -> f64 {
    let n = points.len() as f64;
    let (sum_x, sum_y, sum_xy, sum_xx) = points.iter().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sxx), (x, y)| (sx + x, sy + y, sxy + x * y, sxx + x * x),
    );

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denominator
}
