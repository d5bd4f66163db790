//! Performance metrics and statistics.
//!
//! All ratios follow the documented edge-case policy (zero denominators,
//! empty trade lists) and non-finite results are passed through untouched;
//! sanitizing them for presentation is the report layer's job, not this
//! module's.

use super::backtest::BacktestConfig;
use super::portfolio::PortfolioState;
use super::trade::Trade;

/// Annualization constant for daily bars. A documented assumption; bar
/// spacing is never inspected.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    // Returns
    pub total_return: f64,
    pub cagr: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    // Drawdown
    pub max_drawdown: f64,
    pub average_drawdown: f64,
    pub max_drawdown_duration: i64,
    // Trade statistics
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub average_win: f64,
    pub average_loss: f64,
    pub average_trade: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub expectancy: f64,
    // Trade duration, calendar days
    pub average_trade_duration: f64,
    pub max_trade_duration: i64,
    pub min_trade_duration: i64,
    // Portfolio
    pub initial_portfolio_value: f64,
    pub final_portfolio_value: f64,
    // Benchmark
    pub buy_hold_return: f64,
}

impl PerformanceMetrics {
    pub fn compute(
        states: &[PortfolioState],
        trades: &[Trade],
        config: &BacktestConfig,
    ) -> Self {
        let values: Vec<f64> = states.iter().map(|s| s.portfolio_value).collect();
        let initial = values.first().copied().unwrap_or(config.initial_capital);
        let final_value = values.last().copied().unwrap_or(config.initial_capital);

        let total_return = if initial > 0.0 {
            (final_value - initial) / initial
        } else {
            0.0
        };

        let bars = values.len();
        let cagr = if bars > 0 && initial > 0.0 {
            (final_value / initial).powf(TRADING_DAYS_PER_YEAR / bars as f64) - 1.0
        } else {
            0.0
        };

        let returns = bar_returns(&values);
        let mean_return = if returns.is_empty() {
            0.0
        } else {
            returns.iter().sum::<f64>() / returns.len() as f64
        };
        let volatility = sample_std(&returns) * TRADING_DAYS_PER_YEAR.sqrt();
        let excess_return = mean_return * TRADING_DAYS_PER_YEAR - config.risk_free_rate;

        let sharpe_ratio = if returns.is_empty() || volatility == 0.0 {
            0.0
        } else {
            excess_return / volatility
        };

        let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
        let sortino_ratio = if returns.is_empty() {
            0.0
        } else if downside.is_empty() {
            f64::INFINITY
        } else {
            let downside_deviation = sample_std(&downside) * TRADING_DAYS_PER_YEAR.sqrt();
            if downside_deviation > 0.0 {
                excess_return / downside_deviation
            } else {
                0.0
            }
        };

        let (max_drawdown, average_drawdown, max_drawdown_duration) = drawdown_stats(&values);

        let mut winning_trades = 0usize;
        let mut losing_trades = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64; // signed, <= 0
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64; // signed, <= 0
        let mut profit_sum = 0.0_f64;
        let mut duration_sum = 0i64;
        let mut max_trade_duration = 0i64;
        let mut min_trade_duration = i64::MAX;

        for trade in trades {
            profit_sum += trade.profit;
            duration_sum += trade.duration_days;
            max_trade_duration = max_trade_duration.max(trade.duration_days);
            min_trade_duration = min_trade_duration.min(trade.duration_days);

            if trade.profit > 0.0 {
                winning_trades += 1;
                total_wins += trade.profit;
                largest_win = largest_win.max(trade.profit);
            } else if trade.profit < 0.0 {
                losing_trades += 1;
                total_losses += trade.profit;
                largest_loss = largest_loss.min(trade.profit);
            }
            // break-even trades count toward neither side
        }

        let total_trades = trades.len();
        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64
        } else {
            0.0
        };

        let profit_factor = if total_losses < 0.0 {
            total_wins / total_losses.abs()
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let average_win = if winning_trades > 0 {
            total_wins / winning_trades as f64
        } else {
            0.0
        };
        let average_loss = if losing_trades > 0 {
            total_losses / losing_trades as f64
        } else {
            0.0
        };
        let average_trade = if total_trades > 0 {
            profit_sum / total_trades as f64
        } else {
            0.0
        };
        let expectancy = win_rate * average_win + (1.0 - win_rate) * average_loss;

        let average_trade_duration = if total_trades > 0 {
            duration_sum as f64 / total_trades as f64
        } else {
            0.0
        };
        if total_trades == 0 {
            min_trade_duration = 0;
        }

        let buy_hold_return = buy_hold_return(states, config);

        PerformanceMetrics {
            total_return,
            cagr,
            volatility,
            sharpe_ratio,
            sortino_ratio,
            max_drawdown,
            average_drawdown,
            max_drawdown_duration,
            total_trades,
            winning_trades,
            losing_trades,
            win_rate,
            profit_factor,
            average_win,
            average_loss,
            average_trade,
            largest_win,
            largest_loss,
            expectancy,
            average_trade_duration,
            max_trade_duration,
            min_trade_duration,
            initial_portfolio_value: initial,
            final_portfolio_value: final_value,
            buy_hold_return,
        }
    }
}

/// Per-bar fractional changes of the portfolio value.
fn bar_returns(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

/// Sample standard deviation (n - 1 denominator); 0 for fewer than two
/// observations.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
}

/// Max drawdown (absolute magnitude), average drawdown over bars that are
/// strictly below the running peak, and the longest consecutive run of such
/// bars.
fn drawdown_stats(values: &[f64]) -> (f64, f64, i64) {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;
    let mut dd_sum = 0.0_f64;
    let mut dd_bars = 0usize;
    let mut run = 0i64;
    let mut max_run = 0i64;

    for &value in values {
        if value > peak {
            peak = value;
        }
        let dd = if peak > 0.0 { (value - peak) / peak } else { 0.0 };
        if dd < 0.0 {
            max_dd = max_dd.min(dd);
            dd_sum += dd;
            dd_bars += 1;
            run += 1;
            max_run = max_run.max(run);
        } else {
            run = 0;
        }
    }

    let average = if dd_bars > 0 {
        (dd_sum / dd_bars as f64).abs()
    } else {
        0.0
    };
    (max_dd.abs(), average, max_run)
}

/// Buy-and-hold benchmark sized with the strategy's own position fraction:
/// invest `initial_capital * position_size_pct` at the first close (paying
/// commission), hold to the last close (paying commission on the exit), with
/// the remainder sitting in cash throughout. The fractional sizing keeps the
/// benchmark's capital exposure comparable to the strategy's.
fn buy_hold_return(states: &[PortfolioState], config: &BacktestConfig) -> f64 {
    if states.len() < 2 {
        return 0.0;
    }

    let first_close = states[0].close;
    let last_close = states[states.len() - 1].close;

    let investment = config.initial_capital * config.position_size_pct;
    let buy_commission = investment * config.commission;
    let shares = (investment - buy_commission) / first_close;
    let cash = config.initial_capital - investment;

    let proceeds = shares * last_close;
    let sell_commission = proceeds * config.commission;
    let final_value = cash + proceeds - sell_commission;

    (final_value - config.initial_capital) / config.initial_capital
}
