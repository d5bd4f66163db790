//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_batch, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{
    validate_backtest_config, validate_strategy_config, DEFAULT_COMMISSION,
    DEFAULT_INITIAL_CAPITAL, DEFAULT_POSITION_SIZE_PCT, DEFAULT_RISK_FREE_RATE, DEFAULT_SLIPPAGE,
};
use crate::domain::error::SigtraderError;
use crate::domain::strategies::builtin_registry;
use crate::domain::strategy::StrategyParams;
use crate::domain::universe::{parse_tickers, validate_universe};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Signal-driven trading strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over the configured ticker universe
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the configured ticker list (comma-separated)
        #[arg(long)]
        ticker: Option<String>,
        /// Override the configured strategy name
        #[arg(long)]
        strategy: Option<String>,
        /// Directory to write CSV report files into
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Validate and print the run plan without fetching data
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List available strategies
    ListStrategies,
    /// Show the stored data range for configured tickers
    Info {
        #[arg(short, long)]
        config: PathBuf,
        /// Restrict to one ticker
        #[arg(long)]
        ticker: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            ticker,
            strategy,
            output,
            dry_run,
        } => run_backtest_command(
            &config,
            ticker.as_deref(),
            strategy.as_deref(),
            output.as_deref(),
            dry_run,
        ),
        Command::Validate { config } => run_validate(&config),
        Command::ListStrategies => run_list_strategies(),
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SigtraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Assemble the run parameters, falling back to documented defaults for
/// anything the file omits.
pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
) -> Result<BacktestConfig, SigtraderError> {
    let start_date = parse_config_date(adapter, "start_date")?;
    let end_date = parse_config_date(adapter, "end_date")?;

    Ok(BacktestConfig {
        start_date,
        end_date,
        initial_capital: adapter.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL),
        commission: adapter.get_double("backtest", "commission", DEFAULT_COMMISSION),
        slippage: adapter.get_double("backtest", "slippage", DEFAULT_SLIPPAGE),
        position_size_pct: adapter.get_double(
            "backtest",
            "position_size_pct",
            DEFAULT_POSITION_SIZE_PCT,
        ),
        risk_free_rate: adapter.get_double("backtest", "risk_free_rate", DEFAULT_RISK_FREE_RATE),
    })
}

fn parse_config_date(
    adapter: &dyn ConfigPort,
    key: &str,
) -> Result<NaiveDate, SigtraderError> {
    let value = adapter.get_string("backtest", key).ok_or_else(|| {
        SigtraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: key.to_string(),
        }
    })?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| SigtraderError::ConfigInvalid {
        section: "backtest".to_string(),
        key: key.to_string(),
        reason: "invalid date format (expected YYYY-MM-DD)".to_string(),
    })
}

/// Copy the free-form `[strategy]` section into strategy parameters.
pub fn build_strategy_params(adapter: &dyn ConfigPort) -> StrategyParams {
    let mut params = StrategyParams::new();
    for key in adapter.keys("strategy") {
        if key == "name" {
            continue;
        }
        if let Some(value) = adapter.get_string("strategy", &key) {
            params.insert(&key, &value);
        }
    }
    params
}

/// Ticker list from the override or the config (`tickers`, then `ticker`).
pub fn resolve_tickers(
    ticker_override: Option<&str>,
    adapter: &dyn ConfigPort,
) -> Result<Vec<String>, SigtraderError> {
    let source = match ticker_override {
        Some(t) => t.to_string(),
        None => adapter
            .get_string("backtest", "tickers")
            .or_else(|| adapter.get_string("backtest", "ticker"))
            .ok_or_else(|| SigtraderError::ConfigMissing {
                section: "backtest".to_string(),
                key: "tickers".to_string(),
            })?,
    };
    parse_tickers(&source)
}

fn run_backtest_command(
    config_path: &PathBuf,
    ticker_override: Option<&str>,
    strategy_override: Option<&str>,
    output_dir: Option<&std::path::Path>,
    dry_run: bool,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let strategy_name = match strategy_override {
        Some(name) => name.to_string(),
        None => {
            if let Err(e) = validate_strategy_config(&adapter) {
                eprintln!("error: {e}");
                return (&e).into();
            }
            adapter
                .get_string("strategy", "name")
                .unwrap_or_default()
        }
    };

    let params = build_strategy_params(&adapter);
    let registry = builtin_registry();
    let strategy = match registry.create(&strategy_name, &params) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let required_history = strategy.required_history();

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let tickers = match resolve_tickers(ticker_override, &adapter) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Strategy: {} (requires {} bars of history)",
        strategy_name, required_history
    );

    if dry_run {
        eprintln!("Config validated successfully");
        eprintln!("\nPlanned run:");
        eprintln!(
            "  period:  {} to {}",
            bt_config.start_date, bt_config.end_date
        );
        eprintln!("  capital: {:.2}", bt_config.initial_capital);
        eprintln!("  tickers: {}", tickers.join(", "));
        return ExitCode::SUCCESS;
    }

    let data_dir = adapter
        .get_string("backtest", "data_dir")
        .unwrap_or_default();
    let data_port = CsvDataAdapter::new(data_dir);

    run_backtest_pipeline(
        &data_port,
        &registry,
        &strategy_name,
        &params,
        &tickers,
        &bt_config,
        output_dir,
    )
}

/// Stages after configuration: universe validation, the batch itself,
/// console summary, report export.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    registry: &crate::domain::strategy::StrategyRegistry,
    strategy_name: &str,
    params: &StrategyParams,
    tickers: &[String],
    bt_config: &BacktestConfig,
    output_dir: Option<&std::path::Path>,
) -> ExitCode {
    let required_history = match registry.create(strategy_name, params) {
        Ok(strategy) => strategy.required_history(),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Validating {} tickers...", tickers.len());
    let report = validate_universe(data_port, tickers, required_history);
    for (ticker, reason) in &report.skipped {
        eprintln!("warning: skipping {ticker} ({reason})");
    }
    if report.valid.is_empty() {
        eprintln!("error: no tickers with usable data");
        return ExitCode::from(5);
    }

    eprintln!(
        "Running backtest: {} tickers, {} to {}",
        report.valid.len(),
        bt_config.start_date,
        bt_config.end_date,
    );

    let items = match run_batch(
        data_port,
        registry,
        strategy_name,
        params,
        &report.valid,
        bt_config,
    ) {
        Ok(items) => items,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let reporter = CsvReportAdapter::new();
    let mut succeeded = 0usize;
    for item in &items {
        match &item.outcome {
            Ok(result) => {
                succeeded += 1;
                print_summary(result);
                if let Some(dir) = output_dir {
                    if let Err(e) = reporter.write(result, dir) {
                        eprintln!("error: failed to write report for {}: {e}", item.ticker);
                        return (&e).into();
                    }
                }
            }
            Err(e) => eprintln!("warning: {} failed ({e})", item.ticker),
        }
    }

    if let Some(dir) = output_dir {
        eprintln!("\nReports written to: {}", dir.display());
    }

    if succeeded == 0 {
        eprintln!("error: every backtest in the batch failed");
        return ExitCode::from(5);
    }
    ExitCode::SUCCESS
}

fn print_summary(result: &BacktestResult) {
    let m = &result.metrics;
    eprintln!("\n=== {} / {} ===", result.ticker, result.strategy_name);
    eprintln!("Total Return:     {:.2}%", m.total_return * 100.0);
    eprintln!("CAGR:             {:.2}%", m.cagr * 100.0);
    eprintln!("Volatility:       {:.2}%", m.volatility * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", m.sharpe_ratio);
    eprintln!("Sortino Ratio:    {:.2}", m.sortino_ratio);
    eprintln!("Max Drawdown:     -{:.1}%", m.max_drawdown * 100.0);
    eprintln!("Total Trades:     {}", m.total_trades);
    eprintln!("Win Rate:         {:.1}%", m.win_rate * 100.0);
    eprintln!("Profit Factor:    {:.2}", m.profit_factor);
    eprintln!("Expectancy:       {:.2}", m.expectancy);
    eprintln!("Buy & Hold:       {:.2}%", m.buy_hold_return * 100.0);
    eprintln!(
        "Final Value:      {:.2} (from {:.2})",
        m.final_portfolio_value, m.initial_portfolio_value
    );
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let name = adapter
        .get_string("strategy", "name")
        .unwrap_or_default();
    let params = build_strategy_params(&adapter);
    if let Err(e) = builtin_registry().create(&name, &params) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Config validated successfully");
    ExitCode::SUCCESS
}

fn run_list_strategies() -> ExitCode {
    for (name, description) in builtin_registry().list() {
        println!("{name:24} {description}");
    }
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, ticker_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let tickers = match resolve_tickers(ticker_override, &adapter) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_dir = adapter
        .get_string("backtest", "data_dir")
        .unwrap_or_default();
    let data_port = CsvDataAdapter::new(data_dir);

    for ticker in &tickers {
        match data_port.data_range(ticker) {
            Ok(Some((first, last, count))) => {
                println!("{ticker}: {count} bars, {first} to {last}");
            }
            Ok(None) => println!("{ticker}: no rows"),
            Err(e) => println!("{ticker}: unavailable ({e})"),
        }
    }
    ExitCode::SUCCESS
}
