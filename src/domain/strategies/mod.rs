//! Bundled signal strategies.
//!
//! Each module exposes one strategy type plus its builder; the simulation
//! core only ever consumes them through the [`StrategyRegistry`].

pub mod bollinger_reversion;
pub mod ma_crossover;
pub mod macd_cross;
pub mod rsi_reversal;

use super::strategy::StrategyRegistry;

/// Registry with every bundled strategy registered under its key.
pub fn builtin_registry() -> StrategyRegistry {
    let mut registry = StrategyRegistry::new();
    registry.register(
        "ma_crossover",
        "moving-average crossover (golden/death cross)",
        ma_crossover::build,
    );
    registry.register(
        "rsi_reversal",
        "RSI overbought/oversold mean reversion",
        rsi_reversal::build,
    );
    registry.register(
        "macd_cross",
        "MACD signal-line crossover momentum",
        macd_cross::build,
    );
    registry.register(
        "bollinger_reversion",
        "Bollinger band touch mean reversion",
        bollinger_reversion::build,
    );
    registry
}
