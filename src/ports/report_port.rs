//! Result export port trait.

use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SigtraderError;

/// Writes one backtest result to a presentation/storage target. Any
/// sanitization of non-finite metric values happens behind this port, never
/// in the metrics calculator.
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, output_dir: &Path) -> Result<(), SigtraderError>;
}
