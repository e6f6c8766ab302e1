use std::collections::HashMap;

use tracing::debug;

use crate::models::StockRecord;

/// Sort key for records without a score date. Loses against any real
/// `YYYYMMDD` date.
pub const EPOCH_DATE: &str = "19700101";

/// Collapse duplicate symbols down to each symbol's most recent record.
///
/// Output keeps the first-seen order of symbols. Within one symbol the record
/// with the lexicographically greatest `score_date` wins, which is the
/// chronological order for `YYYYMMDD` keys; on equal dates the earlier record
/// in the input survives. Missing or empty dates count as [`EPOCH_DATE`].
pub fn dedupe_latest(stocks: &[StockRecord]) -> Vec<StockRecord> {
    if stocks.is_empty() {
        return Vec::new();
    }

    let mut kept: Vec<StockRecord> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(stocks.len());

    for stock in stocks {
        match slots.get(stock.symbol.as_str()) {
            None => {
                slots.insert(stock.symbol.as_str(), kept.len());
                kept.push(stock.clone());
            }
            Some(&slot) => {
                if score_date_key(stock) > score_date_key(&kept[slot]) {
                    kept[slot] = stock.clone();
                }
            }
        }
    }

    if kept.len() < stocks.len() {
        debug!(
            input = stocks.len(),
            kept = kept.len(),
            "collapsed duplicate symbols"
        );
    }
    kept
}

fn score_date_key(stock: &StockRecord) -> &str {
    match stock.score_date.as_deref() {
        Some(date) if !date.is_empty() => date,
        _ => EPOCH_DATE,
    }
}
