//! CSV table export tests

use csv::ReaderBuilder;
use pretty_assertions::assert_eq;
use test_log::test;

use stock_rankings::export::generate_csv;
use stock_rankings::models::StockRecord;
use stock_rankings::scoring::StrategySelection;

use crate::common::{logging, test_data};

fn parse_rows(csv_text: &str) -> Vec<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_reader(csv_text.as_bytes());
    reader
        .records()
        .map(|record| {
            record
                .expect("CSV output must stay machine readable")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}

#[test]
fn test_flat_table_full_layout() {
    logging::init_test_logging();

    let stocks = vec![
        test_data::create_full_stock("600519", "贵州茅台", 83.0),
        StockRecord::new("000001"),
    ];

    let csv_text = generate_csv(&stocks, &[], &StrategySelection::default());
    let expected = concat!(
        "\"排名\",\"股票代码\",\"股票名称\",\"总分\",\"周期评分\",\"成长评分\",",
        "\"基本面评分\",\"价值评分\",\"技术面评分\",\"资金流评分\"\n",
        "\"1\",\"600519\",\"贵州茅台\",\"83\",\"73\",\"75\",\"77\",\"79\",\"81\",\"82\"\n",
        "\"2\",\"000001\",\"\",\"0\",\"\",\"\",\"\",\"\",\"\",\"\""
    );
    assert_eq!(csv_text, expected);
}

#[test]
fn test_per_date_table_keeps_requested_date_order() {
    let stocks = vec![
        test_data::create_dated_stock(
            "AAA",
            &[
                ("20250917", &[("balanced", 75.0)][..]),
                ("20250919", &[("balanced", 82.0)][..]),
            ],
        ),
        test_data::create_dated_stock("BBB", &[("20250919", &[("balanced", 64.5)][..])]),
    ];
    // Deliberately not chronological; columns must follow this order.
    let dates = vec!["20250919".to_string(), "20250917".to_string()];

    let csv_text = generate_csv(&stocks, &dates, &StrategySelection::default());
    let rows = parse_rows(&csv_text);

    assert_eq!(
        rows[0],
        ["排名", "股票代码", "股票名称", "总分(2025-09-19)", "总分(2025-09-17)"]
    );
    assert_eq!(rows[1], ["1", "AAA", "", "82", "75"]);
    assert_eq!(rows[2], ["2", "BBB", "", "64.5", ""]);
}

#[test]
fn test_every_cell_is_quoted_and_rows_align() {
    let stocks = vec![
        test_data::create_full_stock("600519", "贵州茅台", 83.0),
        test_data::create_scalar_stock("000858", "五粮液", 66.0),
        StockRecord::new("300750"),
    ];

    let csv_text = generate_csv(&stocks, &[], &StrategySelection::default());

    for line in csv_text.lines() {
        assert!(line.starts_with('"') && line.ends_with('"'), "line: {line}");
        let cells: Vec<&str> = line.split("\",\"").collect();
        assert_eq!(cells.len(), 10, "line: {line}");
    }

    // And the quoting stays valid CSV when read back.
    let rows = parse_rows(&csv_text);
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| row.len() == 10));
}

#[test]
fn test_quotes_in_names_survive_a_round_trip() {
    let stocks = vec![test_data::create_scalar_stock(
        "AAA",
        "He said \"buy, now\"",
        50.0,
    )];

    let csv_text = generate_csv(&stocks, &[], &StrategySelection::default());
    assert!(csv_text.contains("\"He said \"\"buy, now\"\"\""));

    let rows = parse_rows(&csv_text);
    assert_eq!(rows[1][2], "He said \"buy, now\"");
}

#[test]
fn test_rank_follows_input_order_not_score() {
    let stocks = vec![
        test_data::create_scalar_stock("LOW", "Low Corp", 10.0),
        test_data::create_scalar_stock("HIGH", "High Corp", 90.0),
    ];

    let csv_text = generate_csv(&stocks, &[], &StrategySelection::default());
    let rows = parse_rows(&csv_text);
    assert_eq!(rows[1][..4], ["1", "LOW", "Low Corp", "10"]);
    assert_eq!(rows[2][..4], ["2", "HIGH", "High Corp", "90"]);
}

#[test]
fn test_per_date_cells_ignore_current_scores() {
    // A current score on the matching date must not leak into date columns.
    let mut stock = test_data::create_strategy_stock("AAA", &[("balanced", 88.0)]);
    stock.score_date = Some("20250919".to_string());

    let csv_text = generate_csv(
        &[stock],
        &["20250919".to_string()],
        &StrategySelection::default(),
    );
    let rows = parse_rows(&csv_text);
    assert_eq!(rows[1], ["1", "AAA", "", ""]);
}

#[test]
fn test_strategy_overrides_change_score_columns() {
    let stocks = vec![
        test_data::create_full_stock("600519", "贵州茅台", 80.0),
        test_data::create_full_stock("000001", "平安银行", 60.0),
    ];
    let strategies = StrategySelection::new("balanced").with_override("600519", "aggressive");

    let csv_text = generate_csv(&stocks, &[], &strategies);
    let rows = parse_rows(&csv_text);
    assert_eq!(rows[1][3], "85");
    assert_eq!(rows[2][3], "60");
}
