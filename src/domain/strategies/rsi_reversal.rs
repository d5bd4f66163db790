//! RSI overbought/oversold mean-reversion strategy.
//!
//! Buy when RSI crosses down into oversold territory, sell when it crosses
//! up into overbought territory. Works best in ranging markets; trending
//! markets can keep RSI pinned at an extreme.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::rsi;
use crate::domain::ohlcv::{closes, PriceBar};
use crate::domain::signal::Signal;
use crate::domain::strategy::{Strategy, StrategyParams};

#[derive(Debug, Clone)]
pub struct RsiReversal {
    rsi_period: usize,
    oversold: f64,
    overbought: f64,
}

/// Builder for the registry. Defaults: RSI(14), 30/70 thresholds.
pub fn build(params: &StrategyParams) -> Result<Box<dyn Strategy>, SigtraderError> {
    let rsi_period = params.get_usize("rsi_period", 14);
    let oversold = params.get_double("oversold", 30.0);
    let overbought = params.get_double("overbought", 70.0);

    if rsi_period < 2 {
        return Err(SigtraderError::InvalidParameter {
            strategy: "rsi_reversal".into(),
            reason: format!("rsi_period must be at least 2, got {rsi_period}"),
        });
    }
    for (key, value) in [("oversold", oversold), ("overbought", overbought)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(SigtraderError::InvalidParameter {
                strategy: "rsi_reversal".into(),
                reason: format!("{key} must be between 0 and 100, got {value}"),
            });
        }
    }
    if oversold >= overbought {
        return Err(SigtraderError::InvalidParameter {
            strategy: "rsi_reversal".into(),
            reason: format!(
                "oversold ({oversold}) must be less than overbought ({overbought})"
            ),
        });
    }

    Ok(Box::new(RsiReversal {
        rsi_period,
        oversold,
        overbought,
    }))
}

impl Strategy for RsiReversal {
    fn name(&self) -> &str {
        "rsi_reversal"
    }

    fn required_history(&self) -> usize {
        self.rsi_period + 10
    }

    fn generate_signals(&self, bars: &[PriceBar]) -> Vec<Signal> {
        let prices = closes(bars);
        let rsi_values = rsi(&prices, self.rsi_period);

        let mut signals = vec![Signal::Hold; bars.len()];
        for i in 1..bars.len() {
            let (Some(prev), Some(cur)) = (rsi_values[i - 1], rsi_values[i]) else {
                continue;
            };

            if prev >= self.oversold && cur < self.oversold {
                signals[i] = Signal::Buy;
            } else if prev <= self.overbought && cur > self.overbought {
                signals[i] = Signal::Sell;
            }
        }
        signals
    }
}
