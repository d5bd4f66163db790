//! Bollinger bands.

use super::sma::sma;
use super::stddev::rolling_std;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Bands at SMA(period) +/- `std_dev` rolling sample standard deviations.
pub fn bollinger(values: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    let middle = sma(values, period);
    let std = rolling_std(values, period);

    let upper: Vec<Option<f64>> = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m + s * std_dev),
            _ => None,
        })
        .collect();
    let lower: Vec<Option<f64>> = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s * std_dev),
            _ => None,
        })
        .collect();

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_warmup_is_none() {
        let values = [10.0, 11.0, 12.0, 13.0];
        let bands = bollinger(&values, 3, 2.0);
        assert_eq!(bands.upper[1], None);
        assert!(bands.upper[2].is_some());
        assert!(bands.lower[2].is_some());
    }

    #[test]
    fn bands_bracket_the_middle() {
        let values: Vec<f64> = (0..20)
            .map(|i| 100.0 + ((i % 5) as f64 - 2.0) * 3.0)
            .collect();
        let bands = bollinger(&values, 5, 2.0);
        for i in 0..20 {
            if let (Some(u), Some(m), Some(l)) = (bands.upper[i], bands.middle[i], bands.lower[i]) {
                assert!(u >= m);
                assert!(l <= m);
            }
        }
    }

    #[test]
    fn bands_collapse_on_constant_input() {
        let bands = bollinger(&[42.0; 6], 4, 2.0);
        assert!((bands.upper[5].unwrap() - 42.0).abs() < 1e-9);
        assert!((bands.lower[5].unwrap() - 42.0).abs() < 1e-9);
    }

    #[test]
    fn bands_known_values() {
        // window [1, 2, 3]: mean 2, sample std 1, k = 2 -> bands 4 / 2 / 0
        let bands = bollinger(&[1.0, 2.0, 3.0], 3, 2.0);
        assert!((bands.upper[2].unwrap() - 4.0).abs() < 1e-9);
        assert!((bands.middle[2].unwrap() - 2.0).abs() < 1e-9);
        assert!((bands.lower[2].unwrap() - 0.0).abs() < 1e-9);
    }
}
