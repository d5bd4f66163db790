//! Round-trip trade extraction from a portfolio trajectory.

use chrono::NaiveDate;

use super::portfolio::PortfolioState;

/// One completed entry/exit round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub shares: f64,
    /// Portfolio value change across the trade, net of commission.
    pub profit: f64,
    /// Price change fraction between entry and exit closes.
    pub profit_pct: f64,
    /// Calendar days between entry and exit.
    pub duration_days: i64,
}

/// Walk the trajectory in order, opening a trade on each flat-to-long
/// transition and closing it on the following long-to-flat transition.
///
/// The simulator guarantees the trajectory ends flat, so every entry has a
/// matching exit and the result is ordered by entry date.
pub fn extract_trades(states: &[PortfolioState]) -> Vec<Trade> {
    let mut trades = Vec::new();
    let mut entry: Option<&PortfolioState> = None;

    for state in states {
        match entry {
            None if state.in_position => {
                entry = Some(state);
            }
            Some(open) if !state.in_position => {
                trades.push(Trade {
                    entry_date: open.date,
                    exit_date: state.date,
                    entry_price: open.close,
                    exit_price: state.close,
                    shares: open.shares,
                    profit: state.portfolio_value - open.portfolio_value,
                    profit_pct: (state.close - open.close) / open.close,
                    duration_days: (state.date - open.date).num_days(),
                });
                entry = None;
            }
            _ => {}
        }
    }

    trades
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn make_state(day: u32, close: f64, value: f64, shares: f64) -> PortfolioState {
        PortfolioState {
            date: date(day),
            close,
            cash: value - shares * close,
            shares,
            portfolio_value: value,
            in_position: shares > 0.0,
        }
    }

    #[test]
    fn no_position_yields_no_trades() {
        let states = vec![
            make_state(1, 100.0, 10_000.0, 0.0),
            make_state(2, 101.0, 10_000.0, 0.0),
        ];
        assert!(extract_trades(&states).is_empty());
    }

    #[test]
    fn single_round_trip() {
        let states = vec![
            make_state(1, 100.0, 10_000.0, 0.0),
            make_state(2, 100.0, 9_990.0, 50.0),
            make_state(3, 105.0, 10_240.0, 50.0),
            make_state(4, 110.0, 10_480.0, 0.0),
        ];
        let trades = extract_trades(&states);
        assert_eq!(trades.len(), 1);

        let trade = &trades[0];
        assert_eq!(trade.entry_date, date(2));
        assert_eq!(trade.exit_date, date(4));
        assert!((trade.entry_price - 100.0).abs() < f64::EPSILON);
        assert!((trade.exit_price - 110.0).abs() < f64::EPSILON);
        assert!((trade.shares - 50.0).abs() < f64::EPSILON);
        assert!((trade.profit - 490.0).abs() < 1e-9);
        assert!((trade.profit_pct - 0.10).abs() < 1e-9);
        assert_eq!(trade.duration_days, 2);
    }

    #[test]
    fn profit_is_portfolio_value_change() {
        let states = vec![
            make_state(1, 100.0, 9_950.0, 49.5),
            make_state(2, 90.0, 9_455.0, 49.5),
            make_state(3, 90.0, 9_400.0, 0.0),
        ];
        let trades = extract_trades(&states);
        assert_eq!(trades.len(), 1);
        assert!((trades[0].profit - (9_400.0 - 9_950.0)).abs() < 1e-9);
        assert!(trades[0].profit < 0.0);
    }

    #[test]
    fn multiple_round_trips_in_order() {
        let states = vec![
            make_state(1, 100.0, 10_000.0, 10.0),
            make_state(2, 101.0, 10_010.0, 0.0),
            make_state(3, 102.0, 10_010.0, 0.0),
            make_state(4, 103.0, 10_010.0, 10.0),
            make_state(5, 104.0, 10_020.0, 0.0),
        ];
        let trades = extract_trades(&states);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].entry_date, date(1));
        assert_eq!(trades[0].exit_date, date(2));
        assert_eq!(trades[1].entry_date, date(4));
        assert_eq!(trades[1].exit_date, date(5));
        assert!(trades[0].entry_date < trades[1].entry_date);
    }

    #[test]
    fn duration_counts_calendar_days() {
        let states = vec![
            PortfolioState {
                date: NaiveDate::from_ymd_opt(2024, 1, 29).unwrap(),
                close: 100.0,
                cash: 0.0,
                shares: 100.0,
                portfolio_value: 10_000.0,
                in_position: true,
            },
            PortfolioState {
                date: NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
                close: 101.0,
                cash: 10_100.0,
                shares: 0.0,
                portfolio_value: 10_100.0,
                in_position: false,
            },
        ];
        let trades = extract_trades(&states);
        assert_eq!(trades[0].duration_days, 7);
    }

    #[test]
    fn entry_without_exit_cannot_close() {
        // The simulator never produces this shape (forced liquidation), but
        // the extractor must not fabricate a trade from a dangling entry.
        let states = vec![
            make_state(1, 100.0, 10_000.0, 0.0),
            make_state(2, 100.0, 10_000.0, 100.0),
            make_state(3, 105.0, 10_500.0, 100.0),
        ];
        assert!(extract_trades(&states).is_empty());
    }
}
