//! RSI (Relative Strength Index).
//!
//! Uses simple rolling means of gains and losses over the period:
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss)).
//! If avg_loss == 0 with gains present: RSI = 100. If both averages are
//! zero (flat window) there is no defined value and the entry stays `None`.

/// RSI over `period` bars; valid from index `period - 1`.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    if period == 0 || n == 0 {
        return vec![None; n];
    }

    // First price change lands at index 1; index 0 carries zero gain/loss.
    let mut gains = vec![0.0; n];
    let mut losses = vec![0.0; n];
    for i in 1..n {
        let change = values[i] - values[i - 1];
        if change > 0.0 {
            gains[i] = change;
        } else {
            losses[i] = -change;
        }
    }

    let mut out = vec![None; n];
    for i in (period - 1)..n {
        let window = i + 1 - period..=i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;

        out[i] = if avg_loss > 0.0 {
            Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
        } else if avg_gain > 0.0 {
            Some(100.0)
        } else {
            None
        };
    }
    out
}
