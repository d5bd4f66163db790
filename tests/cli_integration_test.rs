//! CLI configuration plumbing tests.
//!
//! Covers config parsing into run parameters (build_backtest_config,
//! build_strategy_params), ticker resolution, and validation against real
//! INI files on disk.

mod common;

use common::date;
use sigtrader::adapters::file_config_adapter::FileConfigAdapter;
use sigtrader::cli::{build_backtest_config, build_strategy_params, resolve_tickers};
use sigtrader::domain::config_validation::{
    validate_backtest_config, validate_strategy_config,
};
use sigtrader::domain::error::SigtraderError;
use sigtrader::domain::strategies::builtin_registry;
use sigtrader::ports::config_port::ConfigPort;
use std::io::Write;

const VALID_INI: &str = r#"
[backtest]
tickers = AAPL,MSFT,GOOG
start_date = 2020-01-01
end_date = 2024-12-31
initial_capital = 250000.0
commission = 0.002
slippage = 0.001
position_size_pct = 0.25
risk_free_rate = 0.03
data_dir = ./data

[strategy]
name = ma_crossover
fast_period = 10
slow_period = 40
ma_type = ema
"#;

mod config_loading {
    use super::*;

    #[test]
    fn build_backtest_config_reads_all_fields() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = build_backtest_config(&adapter).unwrap();

        assert_eq!(config.start_date, date(2020, 1, 1));
        assert_eq!(config.end_date, date(2024, 12, 31));
        assert!((config.initial_capital - 250_000.0).abs() < f64::EPSILON);
        assert!((config.commission - 0.002).abs() < f64::EPSILON);
        assert!((config.slippage - 0.001).abs() < f64::EPSILON);
        assert!((config.position_size_pct - 0.25).abs() < f64::EPSILON);
        assert!((config.risk_free_rate - 0.03).abs() < f64::EPSILON);
    }

    #[test]
    fn build_backtest_config_uses_defaults() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\nstart_date = 2020-01-01\nend_date = 2021-01-01\n",
        )
        .unwrap();
        let config = build_backtest_config(&adapter).unwrap();

        assert!((config.initial_capital - 100_000.0).abs() < f64::EPSILON);
        assert!((config.commission - 0.001).abs() < f64::EPSILON);
        assert!((config.slippage - 0.0005).abs() < f64::EPSILON);
        assert!((config.position_size_pct - 0.1).abs() < f64::EPSILON);
        assert!((config.risk_free_rate - 0.02).abs() < f64::EPSILON);
    }

    #[test]
    fn build_backtest_config_requires_dates() {
        let adapter = FileConfigAdapter::from_string("[backtest]\n").unwrap();
        assert!(matches!(
            build_backtest_config(&adapter).unwrap_err(),
            SigtraderError::ConfigMissing { .. }
        ));

        let adapter = FileConfigAdapter::from_string(
            "[backtest]\nstart_date = soon\nend_date = 2021-01-01\n",
        )
        .unwrap();
        assert!(matches!(
            build_backtest_config(&adapter).unwrap_err(),
            SigtraderError::ConfigInvalid { .. }
        ));
    }

    #[test]
    fn strategy_params_copy_the_section_without_name() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let params = build_strategy_params(&adapter);

        assert_eq!(params.get_usize("fast_period", 0), 10);
        assert_eq!(params.get_usize("slow_period", 0), 40);
        assert_eq!(params.get_string("ma_type"), Some("ema"));
        assert_eq!(params.get_string("name"), None);
    }

    #[test]
    fn strategy_params_feed_the_registry() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let params = build_strategy_params(&adapter);
        let strategy = builtin_registry().create("ma_crossover", &params).unwrap();
        assert_eq!(strategy.required_history(), 50);
    }
}

mod ticker_resolution {
    use super::*;

    #[test]
    fn override_beats_config() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let tickers = resolve_tickers(Some("tsla , nvda"), &adapter).unwrap();
        assert_eq!(tickers, vec!["TSLA", "NVDA"]);
    }

    #[test]
    fn config_list_is_used_without_override() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let tickers = resolve_tickers(None, &adapter).unwrap();
        assert_eq!(tickers, vec!["AAPL", "MSFT", "GOOG"]);
    }

    #[test]
    fn singular_ticker_key_works() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\nticker = ibm\n").unwrap();
        let tickers = resolve_tickers(None, &adapter).unwrap();
        assert_eq!(tickers, vec!["IBM"]);
    }

    #[test]
    fn missing_tickers_is_config_error() {
        let adapter = FileConfigAdapter::from_string("[backtest]\n").unwrap();
        assert!(matches!(
            resolve_tickers(None, &adapter).unwrap_err(),
            SigtraderError::ConfigMissing { .. }
        ));
    }
}

mod validation_from_disk {
    use super::*;

    fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn valid_file_passes_both_validators() {
        let file = write_temp_ini(VALID_INI);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert!(validate_backtest_config(&adapter).is_ok());
        assert!(validate_strategy_config(&adapter).is_ok());
    }

    #[test]
    fn unknown_strategy_is_caught_by_the_registry() {
        let file = write_temp_ini(&VALID_INI.replace("ma_crossover", "astrology"));
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert!(validate_strategy_config(&adapter).is_ok());

        let name = adapter.get_string("strategy", "name").unwrap();
        let err = builtin_registry()
            .create(&name, &build_strategy_params(&adapter))
            .unwrap_err();
        assert!(matches!(err, SigtraderError::UnknownStrategy { .. }));
    }

    #[test]
    fn bad_parameters_are_caught_before_running() {
        let file = write_temp_ini(&VALID_INI.replace("fast_period = 10", "fast_period = 90"));
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        let err = builtin_registry()
            .create("ma_crossover", &build_strategy_params(&adapter))
            .unwrap_err();
        assert!(matches!(err, SigtraderError::InvalidParameter { .. }));
    }
}
