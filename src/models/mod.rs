use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Ranking records
// ============================================================================

/// Per-strategy composite scores keyed by strategy name.
pub type StrategyScores = BTreeMap<String, f64>;

/// A stock's overall score: either one fixed number or one number per strategy.
///
/// The backend emits both shapes, so this deserializes from a bare JSON number
/// as well as from a `{"strategy": score}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompositeScore {
    /// Strategy-independent score.
    Scalar(f64),
    /// Strategy-dependent scores.
    ByStrategy(StrategyScores),
}

impl CompositeScore {
    /// Score under `strategy`: a scalar matches every strategy, a map only
    /// those keys it actually holds.
    pub fn lookup(&self, strategy: &str) -> Option<f64> {
        match self {
            CompositeScore::Scalar(value) => Some(*value),
            CompositeScore::ByStrategy(scores) => scores.get(strategy).copied(),
        }
    }
}

/// The six component scores feeding the composite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fundamental_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money_flow_score: Option<f64>,
}

impl SubScores {
    /// Merge `overlay` on top of these scores, keeping the current value
    /// wherever the overlay has none.
    pub fn overlaid(&self, overlay: &SubScores) -> SubScores {
        SubScores {
            cycle_score: overlay.cycle_score.or(self.cycle_score),
            growth_score: overlay.growth_score.or(self.growth_score),
            fundamental_score: overlay.fundamental_score.or(self.fundamental_score),
            value_score: overlay.value_score.or(self.value_score),
            technical_score: overlay.technical_score.or(self.technical_score),
            money_flow_score: overlay.money_flow_score.or(self.money_flow_score),
        }
    }
}

/// One ranked stock as returned by the ranking backend.
///
/// Current-score fields sit next to optional per-date maps holding historical
/// snapshots keyed by `YYYYMMDD` date strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Trading date (`YYYYMMDD`) the current composite score belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite_score: Option<CompositeScore>,
    /// Historical composite scores: date -> strategy -> score.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub per_date_scores: BTreeMap<String, StrategyScores>,
    /// Historical component scores: date -> sub-score snapshot.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub per_date_fields: BTreeMap<String, SubScores>,
    #[serde(flatten)]
    pub sub_scores: SubScores,
}

impl StockRecord {
    /// Record carrying only a symbol, everything else empty.
    pub fn new(symbol: impl Into<String>) -> Self {
        StockRecord {
            symbol: symbol.into(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Backend payloads
// ============================================================================

/// Ranking API response envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingResponse {
    #[serde(default)]
    pub results: Vec<StockRecord>,
}

/// Parse a rankings payload, accepting either the `{"results": [...]}`
/// envelope or a bare record array. An envelope without `results` yields an
/// empty list.
pub fn parse_rankings(json: &str) -> serde_json::Result<Vec<StockRecord>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Payload {
        Flat(Vec<StockRecord>),
        Envelope(RankingResponse),
    }

    Ok(match serde_json::from_str(json)? {
        Payload::Flat(records) => records,
        Payload::Envelope(response) => response.results,
    })
}

// ============================================================================
// Watchlist and analysis history
// ============================================================================

/// Ordered list of watched symbols without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watchlist {
    symbols: Vec<String>,
}

impl Watchlist {
    pub fn new() -> Self {
        Watchlist::default()
    }

    /// Append a symbol unless it is already present. Returns whether the list
    /// changed.
    pub fn add(&mut self, symbol: impl Into<String>) -> bool {
        let symbol = symbol.into();
        if self.contains(&symbol) {
            return false;
        }
        self.symbols.push(symbol);
        true
    }

    /// Remove a symbol. Returns whether it was present.
    pub fn remove(&mut self, symbol: &str) -> bool {
        let before = self.symbols.len();
        self.symbols.retain(|s| s != symbol);
        self.symbols.len() < before
    }

    /// Replace the whole list, dropping duplicates while keeping the first
    /// occurrence of each symbol.
    pub fn replace(&mut self, symbols: Vec<String>) {
        self.symbols.clear();
        for symbol in symbols {
            self.add(symbol);
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl From<Vec<String>> for Watchlist {
    fn from(symbols: Vec<String>) -> Self {
        let mut watchlist = Watchlist::new();
        watchlist.replace(symbols);
        watchlist
    }
}

/// How many analysis entries are retained per symbol.
pub const HISTORY_LIMIT: usize = 10;

/// One saved analysis result for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub symbol: String,
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Per-symbol analysis history, newest entries first, capped per symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisHistory {
    #[serde(flatten)]
    entries: BTreeMap<String, Vec<HistoryEntry>>,
    #[serde(skip_serializing, default = "default_history_limit")]
    limit: usize,
}

fn default_history_limit() -> usize {
    HISTORY_LIMIT
}

impl Default for AnalysisHistory {
    fn default() -> Self {
        AnalysisHistory {
            entries: BTreeMap::new(),
            limit: HISTORY_LIMIT,
        }
    }
}

impl AnalysisHistory {
    pub fn new() -> Self {
        AnalysisHistory::default()
    }

    /// History with a custom per-symbol retention limit.
    pub fn with_limit(limit: usize) -> Self {
        AnalysisHistory {
            entries: BTreeMap::new(),
            limit,
        }
    }

    /// Save an analysis result for `symbol`, newest first, truncating the
    /// symbol's entries to the retention limit.
    pub fn record(&mut self, symbol: impl Into<String>, data: serde_json::Value) {
        let symbol = symbol.into();
        let entry = HistoryEntry {
            symbol: symbol.clone(),
            data,
            timestamp: Utc::now(),
        };
        let entries = self.entries.entry(symbol).or_default();
        entries.insert(0, entry);
        entries.truncate(self.limit);
    }

    /// Entries for `symbol`, newest first. Unknown symbols yield an empty
    /// slice.
    pub fn entries(&self, symbol: &str) -> &[HistoryEntry] {
        self.entries.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Strategy used when none is configured or selected.
pub const DEFAULT_STRATEGY: &str = "balanced";

/// Runtime configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strategy key used when the caller does not pick one.
    pub default_strategy: String,
    /// Per-symbol analysis history retention.
    pub history_limit: usize,
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// built-in defaults. Reads `.env` if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Config {
            default_strategy: std::env::var("RANKINGS_STRATEGY")
                .unwrap_or_else(|_| DEFAULT_STRATEGY.to_string()),
            history_limit: std::env::var("RANKINGS_HISTORY_LIMIT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(HISTORY_LIMIT),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_strategy: DEFAULT_STRATEGY.to_string(),
            history_limit: HISTORY_LIMIT,
        }
    }
}
