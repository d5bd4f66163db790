//! Configuration validation.
//!
//! Every range the backtest depends on is checked here, before any data is
//! fetched or a simulation starts. Defaults mirror the ones used when the
//! config is turned into a [`super::backtest::BacktestConfig`], so an
//! omitted key validates exactly like its default value.

use chrono::NaiveDate;

use super::error::SigtraderError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;
pub const DEFAULT_COMMISSION: f64 = 0.001;
pub const DEFAULT_SLIPPAGE: f64 = 0.0005;
pub const DEFAULT_POSITION_SIZE_PCT: f64 = 0.1;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_initial_capital(config)?;
    validate_commission(config)?;
    validate_slippage(config)?;
    validate_position_size(config)?;
    validate_risk_free_rate(config)?;
    validate_dates(config)?;
    validate_data_dir(config)?;
    validate_tickers(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    match config.get_string("strategy", "name") {
        Some(name) if !name.trim().is_empty() => Ok(()),
        _ => Err(SigtraderError::ConfigMissing {
            section: "strategy".to_string(),
            key: "name".to_string(),
        }),
    }
}

fn invalid(key: &str, reason: &str) -> SigtraderError {
    SigtraderError::ConfigInvalid {
        section: "backtest".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL);
    if value <= 0.0 {
        return Err(invalid("initial_capital", "initial_capital must be positive"));
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "commission", DEFAULT_COMMISSION);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "commission",
            "commission must be at least 0 and below 1",
        ));
    }
    Ok(())
}

fn validate_slippage(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "slippage", DEFAULT_SLIPPAGE);
    if value < 0.0 {
        return Err(invalid("slippage", "slippage must be non-negative"));
    }
    Ok(())
}

fn validate_position_size(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "position_size_pct", DEFAULT_POSITION_SIZE_PCT);
    if !(value > 0.0 && value <= 1.0) {
        return Err(invalid(
            "position_size_pct",
            "position_size_pct must be above 0 and at most 1",
        ));
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "risk_free_rate", DEFAULT_RISK_FREE_RATE);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "risk_free_rate",
            "risk_free_rate must be at least 0 and below 1",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let start_date = parse_date(config.get_string("backtest", "start_date"), "start_date")?;
    let end_date = parse_date(config.get_string("backtest", "end_date"), "end_date")?;

    if start_date >= end_date {
        return Err(invalid("start_date", "start_date must be before end_date"));
    }
    Ok(())
}

fn parse_date(value: Option<String>, key: &str) -> Result<NaiveDate, SigtraderError> {
    match value {
        None => Err(SigtraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: key.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map_err(|_| invalid(key, "invalid date format (expected YYYY-MM-DD)")),
    }
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    match config.get_string("backtest", "data_dir") {
        Some(dir) if !dir.trim().is_empty() => Ok(()),
        _ => Err(SigtraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "data_dir".to_string(),
        }),
    }
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config
        .get_string("backtest", "tickers")
        .or_else(|| config.get_string("backtest", "ticker"));
    match value {
        Some(t) if !t.trim().is_empty() => Ok(()),
        _ => Err(SigtraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "tickers".to_string(),
        }),
    }
}
