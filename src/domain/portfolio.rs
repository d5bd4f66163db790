//! Per-bar portfolio simulation.
//!
//! Long-only, all-in/all-out: a buy signal while flat invests
//! `position_size_pct` of current cash, a sell signal while holding
//! liquidates the whole position. Anything still open after the last bar is
//! force-closed at the final close so the trajectory always ends flat.

use chrono::NaiveDate;

use super::backtest::BacktestConfig;
use super::ohlcv::PriceBar;
use super::signal::Signal;

/// Portfolio snapshot after processing one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub date: NaiveDate,
    pub close: f64,
    pub cash: f64,
    pub shares: f64,
    pub portfolio_value: f64,
    pub in_position: bool,
}

/// Run the sequential cash/share scan over an aligned bar/signal series.
///
/// Slippage moves the execution price against the trade; the recorded
/// `portfolio_value` is always `cash + shares * close` at the bar's quoted
/// close, never the execution price. Callers guarantee equal series lengths
/// and positive closes.
pub fn simulate_portfolio(
    bars: &[PriceBar],
    signals: &[Signal],
    config: &BacktestConfig,
) -> Vec<PortfolioState> {
    debug_assert_eq!(bars.len(), signals.len());

    let mut cash = config.initial_capital;
    let mut shares = 0.0_f64;
    let mut states = Vec::with_capacity(bars.len());

    for (bar, signal) in bars.iter().zip(signals) {
        let close = bar.close;
        match signal {
            Signal::Buy if shares == 0.0 => {
                let execution_price = close * (1.0 + config.slippage);
                let invest = cash * config.position_size_pct;
                let commission_cost = invest * config.commission;
                shares += (invest - commission_cost) / execution_price;
                cash -= invest;
            }
            Signal::Sell if shares > 0.0 => {
                let execution_price = close * (1.0 - config.slippage);
                let proceeds = shares * execution_price;
                let commission_cost = proceeds * config.commission;
                cash += proceeds - commission_cost;
                shares = 0.0;
            }
            _ => {}
        }

        states.push(PortfolioState {
            date: bar.date,
            close,
            cash,
            shares,
            portfolio_value: cash + shares * close,
            in_position: shares > 0.0,
        });
    }

    // Force-close anything still open after the last bar, at the final close
    // less commission (no slippage on the synthetic exit), and overwrite the
    // final snapshot so the trajectory ends flat and fully realized.
    if shares > 0.0 {
        if let Some(last) = states.last_mut() {
            let proceeds = shares * last.close;
            let commission_cost = proceeds * config.commission;
            cash += proceeds - commission_cost;
            last.cash = cash;
            last.shares = 0.0;
            last.portfolio_value = cash;
            last.in_position = false;
        }
    }

    states
}
