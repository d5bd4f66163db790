//! MACD signal-line crossover strategy.
//!
//! Buy when the MACD line crosses above its signal line, sell on the cross
//! below. A lagging momentum strategy; signals arrive after the trend has
//! already turned.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::macd;
use crate::domain::ohlcv::{closes, PriceBar};
use crate::domain::signal::Signal;
use crate::domain::strategy::{Strategy, StrategyParams};

#[derive(Debug, Clone)]
pub struct MacdCross {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

/// Builder for the registry. Defaults: 12/26/9.
pub fn build(params: &StrategyParams) -> Result<Box<dyn Strategy>, SigtraderError> {
    let fast_period = params.get_usize("fast_period", 12);
    let slow_period = params.get_usize("slow_period", 26);
    let signal_period = params.get_usize("signal_period", 9);

    if fast_period == 0 {
        return Err(SigtraderError::InvalidParameter {
            strategy: "macd_cross".into(),
            reason: "fast_period must be positive".into(),
        });
    }
    if fast_period >= slow_period {
        return Err(SigtraderError::InvalidParameter {
            strategy: "macd_cross".into(),
            reason: format!(
                "fast_period ({fast_period}) must be less than slow_period ({slow_period})"
            ),
        });
    }
    if signal_period < 2 {
        return Err(SigtraderError::InvalidParameter {
            strategy: "macd_cross".into(),
            reason: format!("signal_period must be at least 2, got {signal_period}"),
        });
    }

    Ok(Box::new(MacdCross {
        fast_period,
        slow_period,
        signal_period,
    }))
}

impl Strategy for MacdCross {
    fn name(&self) -> &str {
        "macd_cross"
    }

    fn required_history(&self) -> usize {
        self.slow_period + self.signal_period + 10
    }

    fn generate_signals(&self, bars: &[PriceBar]) -> Vec<Signal> {
        let prices = closes(bars);
        let series = macd(
            &prices,
            self.fast_period,
            self.slow_period,
            self.signal_period,
        );

        let mut signals = vec![Signal::Hold; bars.len()];
        for i in 1..bars.len() {
            let (Some(prev_macd), Some(prev_signal), Some(cur_macd), Some(cur_signal)) = (
                series.macd[i - 1],
                series.signal[i - 1],
                series.macd[i],
                series.signal[i],
            ) else {
                continue;
            };

            if prev_macd <= prev_signal && cur_macd > cur_signal {
                signals[i] = Signal::Buy;
            } else if prev_macd >= prev_signal && cur_macd < cur_signal {
                signals[i] = Signal::Sell;
            }
        }
        signals
    }
}
