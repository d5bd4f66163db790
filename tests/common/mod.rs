#![allow(dead_code)]

use chrono::NaiveDate;
use sigtrader::domain::backtest::BacktestConfig;
use sigtrader::domain::error::SigtraderError;
pub use sigtrader::domain::ohlcv::PriceBar;
pub use sigtrader::domain::signal::Signal;
use sigtrader::domain::strategy::Strategy;
use sigtrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SigtraderError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(SigtraderError::DataFormat {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        match self.data.get(ticker) {
            Some(bars) => Ok(bars
                .iter()
                .filter(|b| b.date >= start_date && b.date <= end_date)
                .cloned()
                .collect()),
            None => Err(SigtraderError::NoData {
                ticker: ticker.to_string(),
            }),
        }
    }

    fn list_tickers(&self) -> Result<Vec<String>, SigtraderError> {
        Ok(self.data.keys().cloned().collect())
    }

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SigtraderError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(SigtraderError::DataFormat {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(ticker).filter(|bars| !bars.is_empty()).map(
            |bars| {
                (
                    bars.first().unwrap().date,
                    bars.last().unwrap().date,
                    bars.len(),
                )
            },
        ))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(day_offset: i64, close: f64) -> PriceBar {
    PriceBar {
        date: date(2024, 1, 1) + chrono::Duration::days(day_offset),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000,
    }
}

/// Daily bars with closes interpolated linearly from `first_close` to
/// `last_close` inclusive.
pub fn linear_bars(count: usize, first_close: f64, last_close: f64) -> Vec<PriceBar> {
    let step = if count > 1 {
        (last_close - first_close) / (count - 1) as f64
    } else {
        0.0
    };
    (0..count)
        .map(|i| make_bar(i as i64, first_close + step * i as f64))
        .collect()
}

pub fn flat_bars(count: usize, close: f64) -> Vec<PriceBar> {
    (0..count).map(|i| make_bar(i as i64, close)).collect()
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        start_date: date(2024, 1, 1),
        end_date: date(2025, 12, 31),
        initial_capital: 10_000.0,
        commission: 0.0,
        slippage: 0.0,
        position_size_pct: 1.0,
        risk_free_rate: 0.0,
    }
}

/// Strategy that replays a fixed signal script, padded with holds.
#[derive(Debug)]
pub struct FixedSignals {
    pub script: Vec<Signal>,
}

impl FixedSignals {
    pub fn new(script: Vec<Signal>) -> Self {
        Self { script }
    }
}

impl Strategy for FixedSignals {
    fn name(&self) -> &str {
        "fixed_signals"
    }

    fn required_history(&self) -> usize {
        1
    }

    fn generate_signals(&self, bars: &[PriceBar]) -> Vec<Signal> {
        let mut signals = self.script.clone();
        signals.resize(bars.len(), Signal::Hold);
        signals.truncate(bars.len());
        signals
    }
}
