//! Historical price data access port trait.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

/// Supplies pre-materialized OHLCV bars; the domain core performs no I/O of
/// its own. Implementations report an unavailable ticker as
/// [`SigtraderError::NoData`] so a batch runner can skip just that item.
pub trait DataPort {
    /// Bars for `ticker` within the inclusive date range, sorted by date.
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SigtraderError>;

    /// Every ticker this source can serve.
    fn list_tickers(&self) -> Result<Vec<String>, SigtraderError>;

    /// `(first_date, last_date, bar_count)` for a ticker, or `None` when the
    /// source has no rows for it.
    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SigtraderError>;
}
