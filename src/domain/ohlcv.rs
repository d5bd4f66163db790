//! OHLCV bar representation.

use chrono::NaiveDate;

use super::error::SigtraderError;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Extract the close column from a bar series.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Check that bar dates are strictly increasing.
pub fn validate_ordering(ticker: &str, bars: &[PriceBar]) -> Result<(), SigtraderError> {
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(SigtraderError::DataFormat {
                ticker: ticker.to_string(),
                reason: format!(
                    "bar dates not strictly increasing ({} followed by {})",
                    pair[0].date, pair[1].date
                ),
            });
        }
    }
    Ok(())
}
