use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::StockRecord;
use crate::scoring::{resolve_score, StrategySelection};

/// How the ranking table is being viewed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One row per stock, current score only.
    #[default]
    Ranking,
    /// One row per stock per selected historical date.
    Selected,
}

impl FromStr for ViewMode {
    type Err = std::convert::Infallible;

    /// Anything other than `"selected"` means the ranking view.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "selected" => ViewMode::Selected,
            _ => ViewMode::Ranking,
        })
    }
}

/// Parameters shaping the projected table.
#[derive(Debug, Clone, Default)]
pub struct DisplayQuery {
    pub view_mode: ViewMode,
    /// Dates (`YYYYMMDD`) to expand in the selected view. Empty strings are
    /// ignored.
    pub selected_dates: Vec<String>,
    pub strategies: StrategySelection,
}

/// A ranking record as shown in the table, with view-derived fields merged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRow {
    #[serde(flatten)]
    pub record: StockRecord,
    /// Date this row represents. Only set in the selected view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_date: Option<String>,
    /// Resolved score for the row. `None` means no data exists for this
    /// date/strategy combination, as opposed to a genuine score of 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_composite_score: Option<f64>,
}

/// Expand ranking records into the rows the table renders.
///
/// In the ranking view (or when no usable dates are selected) this keeps the
/// input order and annotates each record with its score under the global
/// strategy. The selected view emits one row per stock per selected date and
/// re-sorts everything by date (newest first), then score (highest first).
pub fn project_rows(rankings: &[StockRecord], query: &DisplayQuery) -> Vec<DisplayRow> {
    let mut dates: Vec<&str> = query
        .selected_dates
        .iter()
        .map(String::as_str)
        .filter(|date| !date.is_empty())
        .collect();

    if query.view_mode != ViewMode::Selected || dates.is_empty() {
        return rankings
            .iter()
            .map(|record| DisplayRow {
                record: record.clone(),
                display_date: None,
                display_composite_score: Some(resolve_score(Some(record), &query.strategies.global)),
            })
            .collect();
    }

    dates.sort_by(|a, b| b.cmp(a));

    let mut rows = Vec::with_capacity(rankings.len() * dates.len());
    for record in rankings {
        let strategy = query.strategies.for_symbol(&record.symbol);
        for date in &dates {
            rows.push(project_dated_row(record, date, strategy));
        }
    }

    rows.sort_by(compare_rows);
    debug!(rows = rows.len(), dates = dates.len(), "projected selected view");
    rows
}

/// Row for one stock on one date.
///
/// The score comes from the per-date map when the date is present there, else
/// from the current composite score when `score_date` matches, else it is
/// `None`. Note the per-date map wins even when it lacks the strategy key.
fn project_dated_row(record: &StockRecord, date: &str, strategy: &str) -> DisplayRow {
    let score = if let Some(day_scores) = record.per_date_scores.get(date) {
        day_scores.get(strategy).copied()
    } else if record.score_date.as_deref() == Some(date) {
        record
            .composite_score
            .as_ref()
            .and_then(|composite| composite.lookup(strategy))
    } else {
        None
    };

    let mut shown = record.clone();
    if let Some(day_fields) = record.per_date_fields.get(date) {
        shown.sub_scores = shown.sub_scores.overlaid(day_fields);
    }

    DisplayRow {
        record: shown,
        display_date: Some(date.to_string()),
        display_composite_score: score,
    }
}

/// Newest date first, then highest score first. Rows without a display date
/// fall back to their record's score date; missing scores sort as 0.
fn compare_rows(a: &DisplayRow, b: &DisplayRow) -> Ordering {
    let date_a = effective_date(a);
    let date_b = effective_date(b);
    if date_a != date_b {
        return date_b.cmp(date_a);
    }
    effective_score(b).total_cmp(&effective_score(a))
}

fn effective_date(row: &DisplayRow) -> &str {
    row.display_date
        .as_deref()
        .filter(|date| !date.is_empty())
        .or_else(|| {
            row.record
                .score_date
                .as_deref()
                .filter(|date| !date.is_empty())
        })
        .unwrap_or("")
}

fn effective_score(row: &DisplayRow) -> f64 {
    match row.display_composite_score {
        Some(score) if !score.is_nan() => score,
        _ => 0.0,
    }
}
