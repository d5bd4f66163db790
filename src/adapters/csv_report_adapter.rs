//! CSV result export adapter.
//!
//! Writes three files per run into the output directory:
//! `<ticker>_equity.csv` (per-bar trajectory), `<ticker>_trades.csv`, and
//! `<ticker>_metrics.csv` (name/value pairs). Non-finite metric values are
//! serialized as `inf`, `-inf`, or `nan` here — this adapter, not the
//! metrics calculator, owns that presentation decision.

use std::fs;
use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SigtraderError;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn csv_error(e: csv::Error) -> SigtraderError {
    SigtraderError::Report {
        reason: e.to_string(),
    }
}

/// Render a metric for CSV: finite values as plain decimals, non-finite
/// ones as `inf` / `-inf` / `nan`.
fn fmt_value(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{value}")
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &BacktestResult, output_dir: &Path) -> Result<(), SigtraderError> {
        fs::create_dir_all(output_dir)?;
        let prefix = result.ticker.to_lowercase();

        let mut equity =
            csv::Writer::from_path(output_dir.join(format!("{prefix}_equity.csv")))
                .map_err(csv_error)?;
        equity
            .write_record([
                "date",
                "close",
                "signal",
                "cash",
                "shares",
                "portfolio_value",
                "in_position",
            ])
            .map_err(csv_error)?;
        for (state, signal) in result.portfolio.iter().zip(&result.signals) {
            equity
                .write_record([
                    state.date.to_string(),
                    fmt_value(state.close),
                    signal.to_string(),
                    fmt_value(state.cash),
                    fmt_value(state.shares),
                    fmt_value(state.portfolio_value),
                    i32::from(state.in_position).to_string(),
                ])
                .map_err(csv_error)?;
        }
        equity.flush()?;

        let mut trades =
            csv::Writer::from_path(output_dir.join(format!("{prefix}_trades.csv")))
                .map_err(csv_error)?;
        trades
            .write_record([
                "entry_date",
                "exit_date",
                "entry_price",
                "exit_price",
                "shares",
                "profit",
                "profit_pct",
                "duration_days",
            ])
            .map_err(csv_error)?;
        for trade in &result.trades {
            trades
                .write_record([
                    trade.entry_date.to_string(),
                    trade.exit_date.to_string(),
                    fmt_value(trade.entry_price),
                    fmt_value(trade.exit_price),
                    fmt_value(trade.shares),
                    fmt_value(trade.profit),
                    fmt_value(trade.profit_pct),
                    trade.duration_days.to_string(),
                ])
                .map_err(csv_error)?;
        }
        trades.flush()?;

        let m = &result.metrics;
        let rows: [(&str, String); 27] = [
            ("ticker", result.ticker.clone()),
            ("strategy", result.strategy_name.clone()),
            ("total_return", fmt_value(m.total_return)),
            ("cagr", fmt_value(m.cagr)),
            ("volatility", fmt_value(m.volatility)),
            ("sharpe_ratio", fmt_value(m.sharpe_ratio)),
            ("sortino_ratio", fmt_value(m.sortino_ratio)),
            ("max_drawdown", fmt_value(m.max_drawdown)),
            ("average_drawdown", fmt_value(m.average_drawdown)),
            (
                "max_drawdown_duration",
                m.max_drawdown_duration.to_string(),
            ),
            ("total_trades", m.total_trades.to_string()),
            ("winning_trades", m.winning_trades.to_string()),
            ("losing_trades", m.losing_trades.to_string()),
            ("win_rate", fmt_value(m.win_rate)),
            ("profit_factor", fmt_value(m.profit_factor)),
            ("average_win", fmt_value(m.average_win)),
            ("average_loss", fmt_value(m.average_loss)),
            ("average_trade", fmt_value(m.average_trade)),
            ("largest_win", fmt_value(m.largest_win)),
            ("largest_loss", fmt_value(m.largest_loss)),
            ("expectancy", fmt_value(m.expectancy)),
            (
                "average_trade_duration",
                fmt_value(m.average_trade_duration),
            ),
            ("max_trade_duration", m.max_trade_duration.to_string()),
            ("min_trade_duration", m.min_trade_duration.to_string()),
            (
                "initial_portfolio_value",
                fmt_value(m.initial_portfolio_value),
            ),
            (
                "final_portfolio_value",
                fmt_value(m.final_portfolio_value),
            ),
            ("buy_hold_return", fmt_value(m.buy_hold_return)),
        ];

        let mut metrics =
            csv::Writer::from_path(output_dir.join(format!("{prefix}_metrics.csv")))
                .map_err(csv_error)?;
        metrics.write_record(["metric", "value"]).map_err(csv_error)?;
        for (name, value) in rows {
            metrics
                .write_record([name, value.as_str()])
                .map_err(csv_error)?;
        }
        metrics.flush()?;

        Ok(())
    }
}
