//! CSV file data adapter.
//!
//! One `<TICKER>.csv` per ticker under a base directory. Columns are located
//! by header name (case-insensitive), so extra columns and reordered files
//! are fine; a missing required column is a typed error. Rows may arrive in
//! any order and are sorted by date.

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;

const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvDataAdapter {
    base_dir: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_dir.join(format!("{ticker}.csv"))
    }

    fn read_all(&self, ticker: &str) -> Result<Vec<PriceBar>, SigtraderError> {
        let path = self.csv_path(ticker);
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SigtraderError::NoData {
                    ticker: ticker.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::Reader::from_reader(file);
        let headers = reader
            .headers()
            .map_err(|e| SigtraderError::DataFormat {
                ticker: ticker.to_string(),
                reason: format!("cannot read header: {e}"),
            })?
            .clone();

        let mut columns = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| SigtraderError::MissingColumn {
                    ticker: ticker.to_string(),
                    column: name.to_string(),
                })?;
        }
        let [date_col, open_col, high_col, low_col, close_col, volume_col] = columns;

        let mut bars = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result.map_err(|e| SigtraderError::DataFormat {
                ticker: ticker.to_string(),
                reason: format!("row {}: {e}", row + 1),
            })?;

            let date_str = get_field(&record, date_col, "date", ticker, row)?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                SigtraderError::DataFormat {
                    ticker: ticker.to_string(),
                    reason: format!("row {}: invalid date: {e}", row + 1),
                }
            })?;

            let volume: i64 = get_field(&record, volume_col, "volume", ticker, row)?
                .trim()
                .parse()
                .map_err(|e| SigtraderError::DataFormat {
                    ticker: ticker.to_string(),
                    reason: format!("row {}: invalid volume value: {e}", row + 1),
                })?;

            bars.push(PriceBar {
                date,
                open: parse_price(&record, open_col, "open", ticker, row)?,
                high: parse_price(&record, high_col, "high", ticker, row)?,
                low: parse_price(&record, low_col, "low", ticker, row)?,
                close: parse_price(&record, close_col, "close", ticker, row)?,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn get_field<'r>(
    record: &'r csv::StringRecord,
    col: usize,
    name: &str,
    ticker: &str,
    row: usize,
) -> Result<&'r str, SigtraderError> {
    record.get(col).ok_or_else(|| SigtraderError::DataFormat {
        ticker: ticker.to_string(),
        reason: format!("row {}: missing {name} field", row + 1),
    })
}

fn parse_price(
    record: &csv::StringRecord,
    col: usize,
    name: &str,
    ticker: &str,
    row: usize,
) -> Result<f64, SigtraderError> {
    get_field(record, col, name, ticker, row)?
        .trim()
        .parse()
        .map_err(|e| SigtraderError::DataFormat {
            ticker: ticker.to_string(),
            reason: format!("row {}: invalid {name} value: {e}", row + 1),
        })
}

impl DataPort for CsvDataAdapter {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SigtraderError> {
        let mut bars = self.read_all(ticker)?;
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, SigtraderError> {
        let mut tickers = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem() {
                    tickers.push(stem.to_string_lossy().to_uppercase());
                }
            }
        }
        tickers.sort();
        Ok(tickers)
    }

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SigtraderError> {
        let bars = self.read_all(ticker)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
