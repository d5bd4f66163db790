//! Strategy capability contract, parameters, and registry.
//!
//! The simulation core only ever sees `dyn Strategy`; concrete signal logic
//! lives in [`super::strategies`] and is reached through an explicit
//! [`StrategyRegistry`] built once and passed by reference. There is no
//! global mutable registry.

use std::collections::{BTreeMap, HashMap};

use super::error::SigtraderError;
use super::ohlcv::PriceBar;
use super::signal::Signal;

/// A trading strategy: turns a bar series into an aligned signal series.
///
/// `generate_signals` must be pure and free of look-ahead: the signal at
/// index `i` may only read bars up to and including `i`. The simulator
/// assumes this but cannot verify it.
pub trait Strategy: std::fmt::Debug {
    /// Registry key of this strategy.
    fn name(&self) -> &str;

    /// Minimum number of bars needed before signals are meaningful.
    fn required_history(&self) -> usize;

    /// Validate input and precompute state before a run.
    fn setup(&mut self, bars: &[PriceBar]) -> Result<(), SigtraderError> {
        if bars.len() < self.required_history() {
            return Err(SigtraderError::InsufficientData {
                bars: bars.len(),
                minimum: self.required_history(),
            });
        }
        Ok(())
    }

    /// One signal per input bar.
    fn generate_signals(&self, bars: &[PriceBar]) -> Vec<Signal>;
}

/// Free-form strategy parameters, typically the `[strategy]` config section.
///
/// Getters fall back to the default on missing or malformed values; range
/// checks belong to the strategy constructors.
#[derive(Debug, Clone, Default)]
pub struct StrategyParams {
    values: HashMap<String, String>,
}

impl StrategyParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Builder-style insert, mainly for tests and embedding callers.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_usize(&self, key: &str, default: usize) -> usize {
        self.values
            .get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    pub fn get_double(&self, key: &str, default: f64) -> f64 {
        self.values
            .get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key).map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "true" || v == "yes" || v == "1" => true,
            Some(v) if v == "false" || v == "no" || v == "0" => false,
            _ => default,
        }
    }
}

/// Constructor for a registered strategy.
pub type StrategyBuilder = fn(&StrategyParams) -> Result<Box<dyn Strategy>, SigtraderError>;

struct RegistryEntry {
    description: String,
    builder: StrategyBuilder,
}

/// Explicit mapping from strategy keys to constructors.
#[derive(Default)]
pub struct StrategyRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, description: &str, builder: StrategyBuilder) {
        debug_assert!(
            !self.entries.contains_key(name),
            "strategy '{name}' registered twice"
        );
        self.entries.insert(
            name.to_string(),
            RegistryEntry {
                description: description.to_string(),
                builder,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Build a fresh strategy instance for one backtest run.
    pub fn create(
        &self,
        name: &str,
        params: &StrategyParams,
    ) -> Result<Box<dyn Strategy>, SigtraderError> {
        match self.entries.get(name) {
            Some(entry) => (entry.builder)(params),
            None => Err(SigtraderError::UnknownStrategy {
                name: name.to_string(),
                available: self
                    .entries
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// Registered (name, description) pairs, sorted by name.
    pub fn list(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.description.clone()))
            .collect()
    }
}
