use std::collections::BTreeMap;

use crate::models::{StockRecord, DEFAULT_STRATEGY};

/// Composite score for `stock` under `strategy`.
///
/// Returns 0 whenever no score can be resolved: missing record, missing
/// composite score, or a per-strategy map without the requested key. Callers
/// that need to tell "no data" apart from a genuine zero should use
/// [`CompositeScore::lookup`](crate::models::CompositeScore::lookup) instead.
pub fn resolve_score(stock: Option<&StockRecord>, strategy: &str) -> f64 {
    let Some(stock) = stock else {
        return 0.0;
    };
    let Some(composite) = &stock.composite_score else {
        return 0.0;
    };
    composite.lookup(strategy).unwrap_or(0.0)
}

/// Effective strategy choice: one global key plus per-stock overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategySelection {
    pub global: String,
    pub overrides: BTreeMap<String, String>,
}

impl StrategySelection {
    pub fn new(global: impl Into<String>) -> Self {
        StrategySelection {
            global: global.into(),
            overrides: BTreeMap::new(),
        }
    }

    /// Add a per-stock override, builder style.
    pub fn with_override(
        mut self,
        symbol: impl Into<String>,
        strategy: impl Into<String>,
    ) -> Self {
        self.overrides.insert(symbol.into(), strategy.into());
        self
    }

    /// Strategy used for `symbol`: its override when present, else the global
    /// key.
    pub fn for_symbol(&self, symbol: &str) -> &str {
        self.overrides
            .get(symbol)
            .map(String::as_str)
            .unwrap_or(&self.global)
    }
}

impl Default for StrategySelection {
    fn default() -> Self {
        StrategySelection::new(DEFAULT_STRATEGY)
    }
}
