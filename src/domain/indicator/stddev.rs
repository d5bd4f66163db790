//! Rolling standard deviation.

/// Rolling sample standard deviation (n - 1 denominator) over `period`
/// values; valid from index `period - 1`. Requires `period >= 2`.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period < 2 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i + 1 < period {
            out.push(None);
            continue;
        }
        let window = &values[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance =
            window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (period - 1) as f64;
        out.push(Some(variance.sqrt()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_warmup_is_none() {
        let out = rolling_std(&[1.0, 2.0, 3.0], 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert!(out[2].is_some());
    }

    #[test]
    fn std_constant_window_is_zero() {
        let out = rolling_std(&[4.0; 5], 3);
        assert!((out[4].unwrap() - 0.0).abs() < 1e-9);
    }

    #[test]
    fn std_known_sample_value() {
        // window [1, 2, 3]: mean 2, sample variance (1 + 0 + 1) / 2 = 1
        let out = rolling_std(&[1.0, 2.0, 3.0], 3);
        assert!((out[2].unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn std_period_below_two_all_none() {
        assert_eq!(rolling_std(&[1.0, 2.0], 1), vec![None, None]);
        assert_eq!(rolling_std(&[1.0, 2.0], 0), vec![None, None]);
    }
}
