//! Exponential moving average.

/// EMA with smoothing factor `2 / (period + 1)`.
///
/// The recursion is seeded with the first value and runs from the start of
/// the series, but results are reported only from index `period - 1`.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.is_empty() {
        return vec![None; values.len()];
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut current = values[0];

    for (i, &value) in values.iter().enumerate() {
        if i > 0 {
            current = alpha * value + (1.0 - alpha) * current;
        }
        out.push(if i + 1 >= period { Some(current) } else { None });
    }
    out
}
