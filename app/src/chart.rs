// In app/src/chart.rs

use crate::report::{format_price, format_time};
use colored::Colorize;
use core_types::Position;
use indicators::IndicatorTable;

const PLOT_WIDTH: usize = 60;

/// Draws close, moving average and bands of the newest `max_rows` rows as one
/// text line per bar, oldest at the top.
///
/// `[` and `]` are the lower and upper band, `+` the moving average and `*`
/// the close, which wins when marks overlap.
pub fn render(table: &IndicatorTable, max_rows: usize) -> String {
    render_with_width(table, max_rows, PLOT_WIDTH)
}

fn render_with_width(table: &IndicatorTable, max_rows: usize, width: usize) -> String {
    let start = table.len().saturating_sub(max_rows);
    let rows = &table.rows[start..];
    let mut result = format!(
        "\nClose (*) vs {} (+) and bands ([ ]), last {} bars:\n",
        table.ma_label,
        rows.len()
    );
    if rows.is_empty() || width < 2 {
        return result;
    }

    let low = rows.iter().map(|r| r.band.lower.min(r.close)).fold(f64::INFINITY, f64::min);
    let high = rows.iter().map(|r| r.band.upper.max(r.close)).fold(f64::NEG_INFINITY, f64::max);
    let span = if high > low { high - low } else { 1.0 };
    let column = |value: f64| -> usize {
        let scaled = ((value - low) / span * (width - 1) as f64).round();
        scaled.clamp(0.0, (width - 1) as f64) as usize
    };

    result.push_str(&format!(
        "{:>16} | {:<w$}|\n",
        "",
        format!("{} .. {}", format_price(low), format_price(high)),
        w = width
    ));
    result.push_str(&"-".repeat(width + 20));
    result.push('\n');

    for row in rows {
        let mut line = vec![' '; width];
        line[column(row.band.lower)] = '[';
        line[column(row.band.upper)] = ']';
        line[column(row.moving_average)] = '+';
        line[column(row.close)] = '*';

        let marker = match row.position {
            Position::Long => " LONG".green().to_string(),
            Position::Short => " SHORT".red().to_string(),
            Position::None => String::new(),
        };
        result.push_str(&format!(
            "{:>16} | {}|{}\n",
            format_time(row.open_time),
            line.into_iter().collect::<String>(),
            marker
        ));
    }

    result
}
