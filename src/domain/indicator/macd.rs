//! MACD (Moving Average Convergence Divergence).

use super::ema::ema;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// MACD line (fast EMA - slow EMA), its signal-line EMA, and the histogram.
///
/// The MACD line is valid where both EMAs are; the signal line runs its own
/// EMA recursion over the valid MACD values and is reported once
/// `signal_period` of them have been seen.
pub fn macd(
    values: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdSeries {
    let n = values.len();
    let fast = ema(values, fast_period);
    let slow = ema(values, slow_period);

    let macd_line: Vec<Option<f64>> = fast
        .iter()
        .zip(&slow)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let mut signal_line = vec![None; n];
    if signal_period > 0 {
        let alpha = 2.0 / (signal_period as f64 + 1.0);
        let mut current: Option<f64> = None;
        let mut seen = 0usize;
        for (i, entry) in macd_line.iter().enumerate() {
            let Some(m) = entry else { continue };
            current = Some(match current {
                None => *m,
                Some(c) => alpha * m + (1.0 - alpha) * c,
            });
            seen += 1;
            if seen >= signal_period {
                signal_line[i] = current;
            }
        }
    }

    let histogram: Vec<Option<f64>> = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    MacdSeries {
        macd: macd_line,
        signal: signal_line,
        histogram,
    }
}
