//! Bollinger band mean-reversion strategy.
//!
//! Buy when the close touches or pierces the lower band, sell when it
//! touches the upper band or (optionally) when it recovers back through the
//! middle band. The bands adapt to volatility, widening in turbulent
//! stretches and narrowing in quiet ones.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::bollinger;
use crate::domain::ohlcv::{closes, PriceBar};
use crate::domain::signal::Signal;
use crate::domain::strategy::{Strategy, StrategyParams};

#[derive(Debug, Clone)]
pub struct BollingerReversion {
    period: usize,
    std_dev: f64,
    exit_at_middle: bool,
}

/// Builder for the registry. Defaults: 20-bar bands at 2 standard
/// deviations, middle-band exit enabled.
pub fn build(params: &StrategyParams) -> Result<Box<dyn Strategy>, SigtraderError> {
    let period = params.get_usize("period", 20);
    let std_dev = params.get_double("std_dev", 2.0);
    let exit_at_middle = params.get_bool("exit_at_middle", true);

    if period < 2 {
        return Err(SigtraderError::InvalidParameter {
            strategy: "bollinger_reversion".into(),
            reason: format!("period must be at least 2, got {period}"),
        });
    }
    if std_dev <= 0.0 {
        return Err(SigtraderError::InvalidParameter {
            strategy: "bollinger_reversion".into(),
            reason: format!("std_dev must be positive, got {std_dev}"),
        });
    }

    Ok(Box::new(BollingerReversion {
        period,
        std_dev,
        exit_at_middle,
    }))
}

impl Strategy for BollingerReversion {
    fn name(&self) -> &str {
        "bollinger_reversion"
    }

    fn required_history(&self) -> usize {
        self.period + 20
    }

    fn generate_signals(&self, bars: &[PriceBar]) -> Vec<Signal> {
        let prices = closes(bars);
        let bands = bollinger(&prices, self.period, self.std_dev);

        let mut signals = vec![Signal::Hold; bars.len()];
        for i in 0..bars.len() {
            let (Some(upper), Some(middle), Some(lower)) =
                (bands.upper[i], bands.middle[i], bands.lower[i])
            else {
                continue;
            };
            let close = prices[i];

            let middle_recovery = self.exit_at_middle
                && i > 0
                && prices[i - 1] < middle
                && close >= middle;

            // A sell condition wins over a simultaneous lower-band touch.
            if close >= upper || middle_recovery {
                signals[i] = Signal::Sell;
            } else if close <= lower {
                signals[i] = Signal::Buy;
            }
        }
        signals
    }
}
