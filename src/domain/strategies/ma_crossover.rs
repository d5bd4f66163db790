//! Moving-average crossover strategy.
//!
//! Buy when the fast average crosses above the slow one (golden cross),
//! sell when it crosses back below (death cross). Trend-following; prone to
//! whipsaws in ranging markets.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{ema, sma};
use crate::domain::ohlcv::{closes, PriceBar};
use crate::domain::signal::Signal;
use crate::domain::strategy::{Strategy, StrategyParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaType {
    Sma,
    Ema,
}

#[derive(Debug, Clone)]
pub struct MaCrossover {
    fast_period: usize,
    slow_period: usize,
    ma_type: MaType,
}

/// Builder for the registry. Defaults: 20/50 SMA.
pub fn build(params: &StrategyParams) -> Result<Box<dyn Strategy>, SigtraderError> {
    let fast_period = params.get_usize("fast_period", 20);
    let slow_period = params.get_usize("slow_period", 50);
    let ma_type = match params.get_string("ma_type").unwrap_or("sma") {
        "sma" => MaType::Sma,
        "ema" => MaType::Ema,
        other => {
            return Err(SigtraderError::InvalidParameter {
                strategy: "ma_crossover".into(),
                reason: format!("ma_type must be 'sma' or 'ema', got '{other}'"),
            });
        }
    };

    if fast_period == 0 {
        return Err(SigtraderError::InvalidParameter {
            strategy: "ma_crossover".into(),
            reason: "fast_period must be positive".into(),
        });
    }
    if fast_period >= slow_period {
        return Err(SigtraderError::InvalidParameter {
            strategy: "ma_crossover".into(),
            reason: format!(
                "fast_period ({fast_period}) must be less than slow_period ({slow_period})"
            ),
        });
    }

    Ok(Box::new(MaCrossover {
        fast_period,
        slow_period,
        ma_type,
    }))
}

impl Strategy for MaCrossover {
    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn required_history(&self) -> usize {
        self.slow_period + 10
    }

    fn generate_signals(&self, bars: &[PriceBar]) -> Vec<Signal> {
        let prices = closes(bars);
        let (fast, slow) = match self.ma_type {
            MaType::Sma => (
                sma(&prices, self.fast_period),
                sma(&prices, self.slow_period),
            ),
            MaType::Ema => (
                ema(&prices, self.fast_period),
                ema(&prices, self.slow_period),
            ),
        };

        let mut signals = vec![Signal::Hold; bars.len()];
        for i in 1..bars.len() {
            let (Some(prev_fast), Some(prev_slow), Some(cur_fast), Some(cur_slow)) =
                (fast[i - 1], slow[i - 1], fast[i], slow[i])
            else {
                continue;
            };

            if prev_fast <= prev_slow && cur_fast > cur_slow {
                signals[i] = Signal::Buy;
            } else if prev_fast >= prev_slow && cur_fast < cur_slow {
                signals[i] = Signal::Sell;
            }
        }
        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    fn make_strategy(fast: usize, slow: usize) -> Box<dyn Strategy> {
        build(
            &StrategyParams::new()
                .with("fast_period", &fast.to_string())
                .with("slow_period", &slow.to_string()),
        )
        .unwrap()
    }

    #[test]
    fn build_rejects_inverted_periods() {
        let params = StrategyParams::new()
            .with("fast_period", "50")
            .with("slow_period", "20");
        assert!(matches!(
            build(&params).unwrap_err(),
            SigtraderError::InvalidParameter { .. }
        ));
    }

    #[test]
    fn build_rejects_unknown_ma_type() {
        let params = StrategyParams::new().with("ma_type", "wma");
        assert!(build(&params).is_err());
    }

    #[test]
    fn build_defaults_to_20_50_sma() {
        let strategy = build(&StrategyParams::new()).unwrap();
        assert_eq!(strategy.required_history(), 60);
    }

    #[test]
    fn golden_cross_emits_buy() {
        // sma2 crosses above sma3 at index 4
        let strategy = make_strategy(2, 3);
        let signals = strategy.generate_signals(&make_bars(&[
            10.0, 9.0, 8.0, 7.0, 10.0, 13.0, 16.0,
        ]));

        assert_eq!(signals[4], Signal::Buy);
        for (i, signal) in signals.iter().enumerate() {
            if i != 4 {
                assert_eq!(*signal, Signal::Hold, "unexpected signal at {i}");
            }
        }
    }

    #[test]
    fn death_cross_emits_sell() {
        let strategy = make_strategy(2, 3);
        let signals = strategy.generate_signals(&make_bars(&[
            10.0, 11.0, 12.0, 13.0, 10.0, 7.0, 4.0,
        ]));
        assert_eq!(signals[4], Signal::Sell);
    }

    #[test]
    fn warmup_bars_stay_hold() {
        let strategy = make_strategy(2, 3);
        let signals = strategy.generate_signals(&make_bars(&[10.0, 9.0, 8.0]));
        assert_eq!(signals, vec![Signal::Hold; 3]);
    }

    #[test]
    fn signals_align_with_bars() {
        let prices: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.4).sin() * 10.0).collect();
        let strategy = make_strategy(5, 20);
        let signals = strategy.generate_signals(&make_bars(&prices));
        assert_eq!(signals.len(), prices.len());
    }

    #[test]
    fn ema_variant_also_crosses() {
        let mut prices = vec![100.0; 10];
        prices.extend((0..20).map(|i| 90.0 - i as f64));
        prices.extend((0..30).map(|i| 70.0 + i as f64 * 3.0));

        let strategy = build(
            &StrategyParams::new()
                .with("fast_period", "5")
                .with("slow_period", "15")
                .with("ma_type", "ema"),
        )
        .unwrap();

        let signals = strategy.generate_signals(&make_bars(&prices));
        assert!(signals.contains(&Signal::Buy));
    }
}
