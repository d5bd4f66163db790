//! Ticker universe parsing and pre-run validation.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;

use super::error::SigtraderError;
use crate::ports::data_port::DataPort;

/// Parse a comma-separated ticker list: trimmed, upper-cased, de-duplicated,
/// original order preserved.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, SigtraderError> {
    let mut seen = HashSet::new();
    let mut tickers = Vec::new();

    for raw in input.split(',') {
        let ticker = raw.trim().to_uppercase();
        if ticker.is_empty() {
            continue;
        }
        if seen.insert(ticker.clone()) {
            tickers.push(ticker);
        }
    }

    if tickers.is_empty() {
        return Err(SigtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "tickers".to_string(),
            reason: "no tickers given".to_string(),
        });
    }
    Ok(tickers)
}

/// Why a ticker was dropped from the universe before running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoData,
    InsufficientBars { have: usize, need: usize },
    Error(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoData => write!(f, "no data"),
            SkipReason::InsufficientBars { have, need } => {
                write!(f, "insufficient data ({have} bars, need {need})")
            }
            SkipReason::Error(reason) => write!(f, "{reason}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct UniverseReport {
    pub valid: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Probe each ticker's data range and keep the ones with at least
/// `min_bars` rows. Skipping is informational, never an error: the caller
/// reports skipped items and proceeds with the rest.
pub fn validate_universe(
    data_port: &dyn DataPort,
    tickers: &[String],
    min_bars: usize,
) -> UniverseReport {
    let mut report = UniverseReport::default();

    for ticker in tickers {
        match data_port.data_range(ticker) {
            Ok(Some((_, _, count))) if count >= min_bars => report.valid.push(ticker.clone()),
            Ok(Some((_, _, count))) => report.skipped.push((
                ticker.clone(),
                SkipReason::InsufficientBars {
                    have: count,
                    need: min_bars,
                },
            )),
            Ok(None) => report.skipped.push((ticker.clone(), SkipReason::NoData)),
            Err(SigtraderError::NoData { .. }) => {
                report.skipped.push((ticker.clone(), SkipReason::NoData));
            }
            Err(e) => report
                .skipped
                .push((ticker.clone(), SkipReason::Error(e.to_string()))),
        }
    }
    report
}
