//! Backtest configuration, orchestration, and result packaging.
//!
//! The orchestrator is deliberately thin: validate input, ask the strategy
//! for signals, hand them to the simulator, derive trades, compute metrics,
//! bundle everything up. Each run owns its data and strategy instance, so
//! batches are isolated item by item.

use chrono::NaiveDate;

use super::error::SigtraderError;
use super::metrics::PerformanceMetrics;
use super::ohlcv::{validate_ordering, PriceBar};
use super::portfolio::{simulate_portfolio, PortfolioState};
use super::signal::Signal;
use super::strategy::{Strategy, StrategyParams, StrategyRegistry};
use super::trade::{extract_trades, Trade};
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    /// Commission rate as a decimal (0.001 = 0.1%), applied on both sides.
    pub commission: f64,
    /// Execution-price degradation as a decimal, applied against the trade.
    pub slippage: f64,
    /// Fraction of current cash deployed per entry.
    pub position_size_pct: f64,
    /// Annual risk-free rate for Sharpe/Sortino.
    pub risk_free_rate: f64,
}

/// Everything one run produces, consumed by presentation/storage layers.
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub ticker: String,
    pub strategy_name: String,
    pub bars: Vec<PriceBar>,
    pub signals: Vec<Signal>,
    pub portfolio: Vec<PortfolioState>,
    pub trades: Vec<Trade>,
    pub metrics: PerformanceMetrics,
    /// Echo of the run parameters, as metadata for consumers.
    pub config: BacktestConfig,
}

/// Run one backtest over pre-fetched bars.
///
/// All validation happens up front; with ordered bars, aligned signals, and
/// enough history the remaining pipeline cannot fail.
pub fn run_backtest(
    strategy: &mut dyn Strategy,
    bars: Vec<PriceBar>,
    ticker: &str,
    config: &BacktestConfig,
) -> Result<BacktestResult, SigtraderError> {
    if bars.is_empty() {
        return Err(SigtraderError::NoData {
            ticker: ticker.to_string(),
        });
    }
    validate_ordering(ticker, &bars)?;

    let minimum = strategy.required_history();
    if bars.len() < minimum {
        return Err(SigtraderError::InsufficientData {
            bars: bars.len(),
            minimum,
        });
    }
    strategy.setup(&bars)?;

    let signals = strategy.generate_signals(&bars);
    if signals.len() != bars.len() {
        return Err(SigtraderError::SignalMismatch {
            expected: bars.len(),
            actual: signals.len(),
        });
    }

    let portfolio = simulate_portfolio(&bars, &signals, config);
    let trades = extract_trades(&portfolio);
    let metrics = PerformanceMetrics::compute(&portfolio, &trades, config);

    Ok(BacktestResult {
        ticker: ticker.to_string(),
        strategy_name: strategy.name().to_string(),
        bars,
        signals,
        portfolio,
        trades,
        metrics,
        config: config.clone(),
    })
}

/// Outcome of one ticker within a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub ticker: String,
    pub outcome: Result<BacktestResult, SigtraderError>,
}

/// Run the same strategy over a ticker universe, one isolated run per
/// ticker.
///
/// A fresh strategy instance is built for every ticker so runs share no
/// state. Per-ticker failures (no data, insufficient bars, malformed rows)
/// are recorded in that item's outcome and never abort the batch; only an
/// unknown strategy name or invalid parameters fail the whole call, before
/// any data is fetched.
pub fn run_batch(
    data_port: &dyn DataPort,
    registry: &StrategyRegistry,
    strategy_name: &str,
    params: &StrategyParams,
    tickers: &[String],
    config: &BacktestConfig,
) -> Result<Vec<BatchItem>, SigtraderError> {
    // Surface strategy construction problems once, up front.
    registry.create(strategy_name, params)?;

    let mut items = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        let outcome = data_port
            .fetch_ohlcv(ticker, config.start_date, config.end_date)
            .and_then(|bars| {
                let mut strategy = registry.create(strategy_name, params)?;
                run_backtest(strategy.as_mut(), bars, ticker, config)
            });
        items.push(BatchItem {
            ticker: ticker.clone(),
            outcome,
        });
    }
    Ok(items)
}
