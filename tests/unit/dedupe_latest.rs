//! Duplicate symbol collapsing tests

use pretty_assertions::assert_eq;
use test_log::test;

use stock_rankings::dedup::dedupe_latest;
use stock_rankings::models::parse_rankings;
use stock_rankings::scoring::resolve_score;

use crate::common::logging;

#[test]
fn test_multi_day_payload_collapses_to_latest() {
    logging::init_test_logging();

    let payload = r#"{"results": [
        {"symbol": "600519", "score_date": "20250917", "composite_score": {"balanced": 80.0}},
        {"symbol": "000001", "score_date": "20250918", "composite_score": {"balanced": 55.0}},
        {"symbol": "600519", "score_date": "20250919", "composite_score": {"balanced": 83.0}},
        {"symbol": "600519", "score_date": "20250918", "composite_score": {"balanced": 81.0}}
    ]}"#;

    let stocks = parse_rankings(payload).unwrap();
    let deduped = dedupe_latest(&stocks);

    assert_eq!(deduped.len(), 2);
    // First-seen order: 600519 appeared before 000001.
    assert_eq!(deduped[0].symbol, "600519");
    assert_eq!(deduped[0].score_date.as_deref(), Some("20250919"));
    assert_eq!(resolve_score(Some(&deduped[0]), "balanced"), 83.0);
    assert_eq!(deduped[1].symbol, "000001");
}

#[test]
fn test_undated_duplicates_lose_to_dated_ones() {
    let payload = r#"[
        {"symbol": "AAA", "composite_score": 10.0},
        {"symbol": "AAA", "score_date": "19800101", "composite_score": 20.0},
        {"symbol": "AAA", "score_date": "", "composite_score": 30.0}
    ]"#;

    let stocks = parse_rankings(payload).unwrap();
    let deduped = dedupe_latest(&stocks);

    assert_eq!(deduped.len(), 1);
    // Missing and empty dates both rank below the real 1980 date.
    assert_eq!(deduped[0].score_date.as_deref(), Some("19800101"));
}

#[test]
fn test_unique_symbols_are_untouched() {
    let payload = r#"[
        {"symbol": "AAA", "score_date": "20250919"},
        {"symbol": "BBB"},
        {"symbol": "CCC", "score_date": "20250917"}
    ]"#;

    let stocks = parse_rankings(payload).unwrap();
    assert_eq!(dedupe_latest(&stocks), stocks);
}
