//! Technical indicator calculations over close-price series.
//!
//! Every function returns a vector aligned 1:1 with its input. Entries are
//! `None` until the indicator has seen enough history (warmup); strategies
//! treat `None` as "no opinion" and emit hold signals.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use bollinger::{bollinger, BollingerBands};
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use rsi::rsi;
pub use sma::sma;
pub use stddev::rolling_std;
