use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::StockRecord;
use crate::scoring::{resolve_score, StrategySelection};

/// Leading header labels: rank, symbol, display name.
const BASE_HEADERS: [&str; 3] = ["排名", "股票代码", "股票名称"];

/// Flat-mode labels: composite score plus the six components (cycle, growth,
/// fundamental, value, technical, money flow).
const SCORE_HEADERS: [&str; 7] = [
    "总分",
    "周期评分",
    "成长评分",
    "基本面评分",
    "价值评分",
    "技术面评分",
    "资金流评分",
];

/// Normalize a score date for column labels.
///
/// Hyphenated inputs are parsed as ISO dates or timestamps and rendered as
/// the UTC `YYYY-MM-DD`; bare `YYYYMMDD` strings are split positionally.
/// Empty input stays empty and anything unparseable is passed through
/// unchanged rather than rejected.
pub fn format_date_label(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    if input.contains('-') {
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
            return timestamp.with_timezone(&Utc).format("%Y-%m-%d").to_string();
        }
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
            return timestamp.format("%Y-%m-%d").to_string();
        }
        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            return date.format("%Y-%m-%d").to_string();
        }
        return input.to_string();
    }

    let chars: Vec<char> = input.chars().collect();
    let segment = |from: usize, to: usize| -> String {
        chars[from.min(chars.len())..to.min(chars.len())].iter().collect()
    };
    format!("{}-{}-{}", segment(0, 4), segment(4, 6), segment(6, 8))
}

/// Wrap a cell in double quotes, doubling any quotes it contains.
pub fn escape_csv(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Render ranking records as CSV with localized headers.
///
/// With `selected_dates` empty the table is one row per stock: rank, symbol,
/// name, composite score under the stock's effective strategy, then the six
/// component scores. With dates given, the score columns are replaced by one
/// `总分(YYYY-MM-DD)` column per date, in the caller's order, filled from the
/// per-date score maps only.
///
/// Rank is the 1-based input position. The composite column always holds a
/// number (0 when unresolved); component and per-date cells are left empty
/// when no value exists. Every cell is quoted. Lines are joined with `\n`
/// and there is no trailing newline.
pub fn generate_csv(
    stocks: &[StockRecord],
    selected_dates: &[String],
    strategies: &StrategySelection,
) -> String {
    let per_date = !selected_dates.is_empty();

    let mut headers: Vec<String> = BASE_HEADERS.iter().map(|h| h.to_string()).collect();
    if per_date {
        headers.extend(
            selected_dates
                .iter()
                .map(|date| format!("总分({})", format_date_label(date))),
        );
    } else {
        headers.extend(SCORE_HEADERS.iter().map(|h| h.to_string()));
    }

    let mut lines = Vec::with_capacity(stocks.len() + 1);
    lines.push(render_line(&headers));

    for (index, stock) in stocks.iter().enumerate() {
        let strategy = strategies.for_symbol(&stock.symbol);
        let mut cells = vec![
            (index + 1).to_string(),
            stock.symbol.clone(),
            stock.name.clone().unwrap_or_default(),
        ];

        if per_date {
            for date in selected_dates {
                let score = stock
                    .per_date_scores
                    .get(date)
                    .and_then(|day| day.get(strategy))
                    .copied();
                cells.push(number_cell(score));
            }
        } else {
            cells.push(resolve_score(Some(stock), strategy).to_string());
            let subs = &stock.sub_scores;
            for value in [
                subs.cycle_score,
                subs.growth_score,
                subs.fundamental_score,
                subs.value_score,
                subs.technical_score,
                subs.money_flow_score,
            ] {
                cells.push(number_cell(value));
            }
        }

        lines.push(render_line(&cells));
    }

    lines.join("\n")
}

fn render_line(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| escape_csv(cell))
        .collect::<Vec<_>>()
        .join(",")
}

/// Absent values become empty cells rather than a fabricated 0.
fn number_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
