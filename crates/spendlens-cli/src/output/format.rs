use std::cmp;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

impl<'a> Column<'a> {
    pub const fn left(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Left,
        }
    }

    pub const fn right(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Right,
        }
    }
}

const INDENT: usize = 2;
const COLUMN_GAP: usize = 2;
const MIN_SHRUNK_WIDTH: usize = 6;
const ELLIPSIS: char = '…';

pub fn terminal_width() -> usize {
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(100);
    cmp::max(from_env, 40)
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);
    entries
        .iter()
        .map(|(label, value)| format!("{padding}{label:<label_width$}  {value}"))
        .collect()
}

/// Aligned table; left-aligned cells are truncated to fit `max_width`, and
/// rows fall back to labelled blocks when even that cannot fit.
pub fn render_table(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    max_width: usize,
    block_label: &str,
) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }
    let natural = natural_widths(columns, rows);
    let budget = max_width
        .saturating_sub(INDENT)
        .saturating_sub(COLUMN_GAP * columns.len().saturating_sub(1));
    let Some(widths) = shrink_to_budget(columns, natural, budget) else {
        return render_blocks(columns, rows, block_label);
    };

    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    let mut output = vec![format_row(columns, &header, &widths)];
    output.extend(rows.iter().map(|row| format_row(columns, row, &widths)));
    output
}

fn natural_widths(columns: &[Column<'_>], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths = columns
        .iter()
        .map(|column| column.name.chars().count())
        .collect::<Vec<usize>>();
    for row in rows {
        for (slot, value) in widths.iter_mut().zip(row) {
            *slot = cmp::max(*slot, value.chars().count());
        }
    }
    widths
}

/// Narrows the widest left-aligned column one step at a time.
fn shrink_to_budget(
    columns: &[Column<'_>],
    mut widths: Vec<usize>,
    budget: usize,
) -> Option<Vec<usize>> {
    let mut total = widths.iter().sum::<usize>();
    while total > budget {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| {
                columns[*index].align == Align::Left && **width > MIN_SHRUNK_WIDTH
            })
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index)?;
        widths[widest] -= 1;
        total -= 1;
    }
    Some(widths)
}

fn format_row(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let pieces = columns
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (column, &width))| {
            let value = fit_cell(cells.get(index).map(String::as_str).unwrap_or(""), width);
            match column.align {
                Align::Left => format!("{value:<width$}"),
                Align::Right => format!("{value:>width$}"),
            }
        })
        .collect::<Vec<String>>();
    let line = format!("{}{}", " ".repeat(INDENT), pieces.join(&" ".repeat(COLUMN_GAP)));
    line.trim_end().to_string()
}

fn fit_cell(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut kept = value
        .chars()
        .take(width.saturating_sub(1))
        .collect::<String>();
    kept.push(ELLIPSIS);
    kept
}

fn render_blocks(columns: &[Column<'_>], rows: &[Vec<String>], block_label: &str) -> Vec<String> {
    let labels = columns
        .iter()
        .map(|column| format!("{}:", column.name))
        .collect::<Vec<String>>();
    let label_width = labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);

    let mut output = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        if row_index > 0 {
            output.push(String::new());
        }
        output.push(format!("  {block_label} {}:", row_index + 1));
        for (label, value) in labels.iter().zip(row) {
            output.push(format!("    {label:<label_width$}  {value}"));
        }
    }
    output
}

/// `1234.5` -> `1,234.50`.
pub fn money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}

pub fn percent(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}
