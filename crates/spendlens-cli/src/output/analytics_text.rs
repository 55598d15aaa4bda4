use std::io;

use serde_json::Value;

use super::format::{self, Column, key_value_rows, money, percent, render_table};

pub fn render_summary(data: &Value) -> io::Result<String> {
    let stats = data
        .get("stats")
        .ok_or_else(|| io::Error::other("summary output requires stats"))?;
    let mut lines = heading("Spending summary", data);
    lines.push(String::new());
    lines.extend(stats_block(stats));
    lines.extend(ledger_footer(data));
    Ok(lines.join("\n"))
}

pub fn render_buckets(data: &Value) -> io::Result<String> {
    let rows = required_rows(data, "rows", "buckets")?;
    let granularity = text(data, "granularity");
    let mut lines = heading(&format!("Spending by {granularity}"), data);
    lines.push(String::new());
    if rows.is_empty() {
        lines.push("  No purchases in this selection.".to_string());
    } else {
        let columns = [
            Column::left("Period"),
            Column::right("Total"),
            Column::right("Count"),
            Column::right("Rolling avg"),
            Column::right("Cumulative"),
        ];
        let table_rows = rows
            .iter()
            .map(|row| {
                vec![
                    text(row, "label"),
                    money(number(row, "total")),
                    integer(row, "count").to_string(),
                    money(number(row, "rolling_average")),
                    money(number(row, "cumulative")),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(render_table(&columns, &table_rows, format::terminal_width(), "Bucket"));
        lines.push(String::new());
        lines.push(format!(
            "  {} active of {} buckets; rolling average over {} periods; weeks start {}.",
            integer(data, "active_buckets"),
            rows.len(),
            integer(data, "rolling_window"),
            text(data, "week_start"),
        ));
    }
    lines.extend(ledger_footer(data));
    Ok(lines.join("\n"))
}

pub fn render_categories(data: &Value) -> io::Result<String> {
    let rows = required_rows(data, "rows", "categories")?;
    let mut lines = heading("Spending by category", data);
    lines.push(String::new());
    lines.extend(category_table(rows));

    if let Some(grid) = data.get("grid").filter(|grid| !grid.is_null()) {
        let categories = grid
            .get("categories")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect::<Vec<&str>>())
            .unwrap_or_default();
        let mut columns = vec![Column::left("Period")];
        columns.extend(categories.iter().map(|name| Column::right(name)));
        columns.push(Column::right("Total"));

        let table_rows = array(grid, "rows")
            .iter()
            .map(|row| {
                let mut cells = vec![text(row, "label")];
                cells.extend(
                    array(row, "cells")
                        .iter()
                        .map(|cell| money(cell.as_f64().unwrap_or(0.0))),
                );
                cells.push(money(number(row, "total")));
                cells
            })
            .collect::<Vec<Vec<String>>>();
        lines.push(String::new());
        lines.push(format!("Per {}:", text(grid, "granularity")));
        lines.extend(render_table(&columns, &table_rows, format::terminal_width(), "Period"));
    }
    lines.extend(ledger_footer(data));
    Ok(lines.join("\n"))
}

pub fn render_top(data: &Value) -> io::Result<String> {
    let rows = required_rows(data, "rows", "top")?;
    let title = if text(data, "order") == "asc" {
        format!("Cheapest {} items", integer(data, "limit"))
    } else {
        format!("Top {} items", integer(data, "limit"))
    };
    let mut lines = heading(&title, data);
    lines.push(String::new());
    lines.extend(transaction_table(rows, "No purchases in this selection."));
    lines.extend(ledger_footer(data));
    Ok(lines.join("\n"))
}

/// Shared by `recurring`, `sneaky` and `newly-recurring`.
pub fn render_pattern(command: &str, data: &Value) -> io::Result<String> {
    let rows = required_rows(data, "rows", command)?;
    let thresholds = data.get("thresholds").cloned().unwrap_or(Value::Null);
    let (title, rule) = match command {
        "sneaky" => (
            "Sneaky spending",
            format!(
                "purchases under {} adding up to more than {}",
                money(number(&thresholds, "item_cost_below")),
                money(number(&thresholds, "total_above"))
            ),
        ),
        "newly-recurring" => (
            "Newly recurring items",
            format!(
                "absent January-June, bought more than {} times July-December",
                integer(&thresholds, "count_above")
            ),
        ),
        _ => (
            "Recurring items",
            format!("bought more than {} times", integer(&thresholds, "count_above")),
        ),
    };

    let mut lines = heading(title, data);
    lines.push(format!("  Rule: {rule} ({})", text(data, "policy_version")));
    lines.push(String::new());
    lines.extend(tally_table(rows, "No items match."));
    lines.extend(ledger_footer(data));
    Ok(lines.join("\n"))
}

pub fn render_large(data: &Value) -> io::Result<String> {
    let rows = required_rows(data, "rows", "large")?;
    let mut lines = heading("Large one-off purchases", data);
    lines.push(format!(
        "  Threshold: {} (mean + one standard deviation)",
        money(number(data, "threshold"))
    ));
    lines.push(String::new());
    lines.extend(transaction_table(rows, "No one-off purchases above the threshold."));
    lines.extend(ledger_footer(data));
    Ok(lines.join("\n"))
}

pub fn render_no_spend(data: &Value) -> io::Result<String> {
    let categories = required_rows(data, "categories", "no-spend")?;
    let mut lines = heading("Categories with no spending", data);
    lines.push(String::new());
    lines.extend(name_list(categories, "Every configured category has spending."));
    lines.extend(ledger_footer(data));
    Ok(lines.join("\n"))
}

pub fn render_month(data: &Value) -> io::Result<String> {
    let rows = required_rows(data, "rows", "month")?;
    let mut lines = heading(&format!("Purchases in {}", text(data, "label")), data);
    lines.push(String::new());
    lines.extend(transaction_table(rows, "No purchases this month."));
    if !rows.is_empty() {
        lines.push(String::new());
        lines.push(format!("  Month total: {}", money(number(data, "total"))));
    }
    lines.extend(ledger_footer(data));
    Ok(lines.join("\n"))
}

pub fn render_report(data: &Value) -> io::Result<String> {
    let stats = data
        .get("stats")
        .ok_or_else(|| io::Error::other("report output requires stats"))?;
    let mut lines = heading("Spending report", data);
    let years = array(data, "available_years")
        .iter()
        .filter_map(Value::as_i64)
        .map(|year| year.to_string())
        .collect::<Vec<String>>();
    if !years.is_empty() {
        lines.push(format!("  Years in ledger: {}", years.join(", ")));
    }

    section(&mut lines, "Overview");
    lines.extend(stats_block(stats));

    section(&mut lines, "Monthly");
    let monthly = array(data, "monthly");
    if monthly.is_empty() {
        lines.push("  No purchases in this selection.".to_string());
    } else {
        let columns = [
            Column::left("Month"),
            Column::right("Total"),
            Column::right("Rolling avg"),
            Column::right("Cumulative"),
        ];
        let table_rows = monthly
            .iter()
            .map(|row| {
                vec![
                    text(row, "label"),
                    money(number(row, "total")),
                    money(number(row, "rolling_average")),
                    money(number(row, "cumulative")),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(render_table(&columns, &table_rows, format::terminal_width(), "Month"));
    }

    section(&mut lines, "Categories");
    lines.extend(category_table(array(data, "categories")));

    section(&mut lines, "Most expensive");
    lines.extend(transaction_table(array(data, "top_items"), "None."));
    section(&mut lines, "Least expensive");
    lines.extend(transaction_table(array(data, "bottom_items"), "None."));
    section(&mut lines, "Recurring");
    lines.extend(tally_table(array(data, "recurring"), "None."));
    section(&mut lines, "Sneaky spending");
    lines.extend(tally_table(array(data, "sneaky"), "None."));
    section(&mut lines, "Newly recurring");
    lines.extend(tally_table(array(data, "newly_recurring"), "None."));
    section(&mut lines, "Large one-off purchases");
    lines.extend(transaction_table(array(data, "large_purchases"), "None."));
    section(&mut lines, "No spending");
    lines.extend(name_list(array(data, "no_spend_categories"), "None."));

    section(&mut lines, "Cost quartiles");
    let columns = [
        Column::left("Band"),
        Column::right("Up to"),
        Column::right("Count"),
        Column::right("Total"),
    ];
    let table_rows = array(data, "quartiles")
        .iter()
        .map(|band| {
            vec![
                text(band, "quartile"),
                band.get("upper")
                    .and_then(Value::as_f64)
                    .map(money)
                    .unwrap_or_else(|| "-".to_string()),
                integer(band, "count").to_string(),
                money(number(band, "total")),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(render_table(&columns, &table_rows, format::terminal_width(), "Band"));

    lines.extend(ledger_footer(data));
    Ok(lines.join("\n"))
}

pub fn render_validate(data: &Value) -> io::Result<String> {
    let diagnostics = required_rows(data, "diagnostics", "validate")?;
    let ledger = data.get("ledger").cloned().unwrap_or(Value::Null);
    let summary = ledger.get("summary").cloned().unwrap_or(Value::Null);

    let mut lines = vec![if data.get("valid").and_then(Value::as_bool).unwrap_or(false) {
        "Ledger is clean.".to_string()
    } else {
        format!("Ledger loaded with {} warnings.", diagnostics.len())
    }];
    lines.push(String::new());
    lines.extend(key_value_rows(
        &[
            ("Source:", source_label(&ledger)),
            ("Rows read:", integer(&summary, "rows_read").to_string()),
            ("Rows kept:", integer(&summary, "rows_kept").to_string()),
            ("Rows dropped:", integer(&summary, "rows_dropped").to_string()),
            ("Rows coerced:", integer(&summary, "rows_coerced").to_string()),
            ("Data covers:", covers(&ledger)),
        ],
        2,
    ));

    if !diagnostics.is_empty() {
        lines.push(String::new());
        lines.push("Diagnostics:".to_string());
        let columns = [
            Column::right("Row"),
            Column::left("Field"),
            Column::left("Code"),
            Column::left("Received"),
            Column::left("Description"),
        ];
        let table_rows = diagnostics
            .iter()
            .map(|warning| {
                vec![
                    integer(warning, "row").to_string(),
                    text(warning, "field"),
                    text(warning, "code"),
                    text(warning, "received"),
                    text(warning, "description"),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(render_table(&columns, &table_rows, format::terminal_width(), "Warning"));
    }
    Ok(lines.join("\n"))
}

fn heading(title: &str, data: &Value) -> Vec<String> {
    let selection = data.get("selection").cloned().unwrap_or(Value::Null);
    let mut lines = vec![format!("{title} ({})", text(&selection, "window"))];

    let mut filters = Vec::new();
    let from = selection.get("from").and_then(Value::as_str);
    let to = selection.get("to").and_then(Value::as_str);
    if from.is_some() || to.is_some() {
        filters.push(format!(
            "dates {} to {}",
            from.unwrap_or("start"),
            to.unwrap_or("end")
        ));
    }
    if let Some(min) = selection.get("min_cost").and_then(Value::as_f64) {
        filters.push(format!("cost >= {}", money(min)));
    }
    if let Some(max) = selection.get("max_cost").and_then(Value::as_f64) {
        filters.push(format!("cost <= {}", money(max)));
    }
    let categories = array(&selection, "categories")
        .iter()
        .filter_map(Value::as_str)
        .collect::<Vec<&str>>();
    if !categories.is_empty() {
        filters.push(format!("categories {}", categories.join(", ")));
    }
    if let Some(search) = selection.get("search").and_then(Value::as_str) {
        filters.push(format!("search \"{search}\""));
    }
    if !filters.is_empty() {
        lines.push(format!("  Filters: {}", filters.join("; ")));
    }
    lines.push(format!(
        "  {} purchases selected",
        integer(&selection, "rows_selected")
    ));
    lines
}

fn stats_block(stats: &Value) -> Vec<String> {
    key_value_rows(
        &[
            ("Total:", money(number(stats, "total"))),
            ("Purchases:", integer(stats, "count").to_string()),
            ("Mean:", money(number(stats, "mean"))),
            (
                "Median:",
                format!(
                    "{} (p25 {}, p75 {})",
                    money(number(stats, "median")),
                    money(number(stats, "p25")),
                    money(number(stats, "p75"))
                ),
            ),
            ("Std dev:", money(number(stats, "stddev"))),
            (
                "Avg weekly:",
                format!(
                    "{} over {} active weeks",
                    money(number(stats, "avg_weekly")),
                    integer(stats, "active_weeks")
                ),
            ),
            (
                "Avg monthly:",
                format!(
                    "{} over {} active months",
                    money(number(stats, "avg_monthly")),
                    integer(stats, "active_months")
                ),
            ),
            (
                "Avg yearly:",
                format!(
                    "{} over {} active years",
                    money(number(stats, "avg_yearly")),
                    integer(stats, "active_years")
                ),
            ),
            ("Volatility:", money(number(stats, "volatility"))),
        ],
        2,
    )
}

fn category_table(rows: &[Value]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["  No purchases in this selection.".to_string()];
    }
    let columns = [
        Column::left("Category"),
        Column::right("Total"),
        Column::right("Share"),
        Column::right("Count"),
        Column::right("Mean"),
        Column::left("Top item"),
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                text(row, "category"),
                money(number(row, "total")),
                percent(number(row, "share")),
                integer(row, "count").to_string(),
                money(number(row, "mean")),
                format!("{} ({})", text(row, "top_item"), money(number(row, "top_item_cost"))),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    render_table(&columns, &table_rows, format::terminal_width(), "Category")
}

fn transaction_table(rows: &[Value], empty: &str) -> Vec<String> {
    if rows.is_empty() {
        return vec![format!("  {empty}")];
    }
    let columns = [
        Column::left("Date"),
        Column::left("Item"),
        Column::left("Category"),
        Column::right("Cost"),
        Column::left("Notes"),
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                text(row, "date"),
                text(row, "item"),
                text(row, "category"),
                money(number(row, "cost")),
                text(row, "notes"),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    render_table(&columns, &table_rows, format::terminal_width(), "Purchase")
}

fn tally_table(rows: &[Value], empty: &str) -> Vec<String> {
    if rows.is_empty() {
        return vec![format!("  {empty}")];
    }
    let columns = [
        Column::left("Item"),
        Column::right("Count"),
        Column::right("Total"),
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                text(row, "item"),
                integer(row, "count").to_string(),
                money(number(row, "total")),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    render_table(&columns, &table_rows, format::terminal_width(), "Item")
}

fn name_list(names: &[Value], empty: &str) -> Vec<String> {
    let names = names
        .iter()
        .filter_map(Value::as_str)
        .map(|name| format!("  - {name}"))
        .collect::<Vec<String>>();
    if names.is_empty() {
        vec![format!("  {empty}")]
    } else {
        names
    }
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(format!("{title}:"));
}

fn ledger_footer(data: &Value) -> Vec<String> {
    let Some(ledger) = data.get("ledger") else {
        return Vec::new();
    };
    let summary = ledger.get("summary").cloned().unwrap_or(Value::Null);
    let mut lines = vec![
        String::new(),
        format!(
            "Ledger: {} ({} of {} rows kept; data covers {})",
            source_label(ledger),
            integer(&summary, "rows_kept"),
            integer(&summary, "rows_read"),
            covers(ledger),
        ),
    ];
    let warnings = integer(ledger, "warning_count");
    if warnings > 0 {
        lines.push(format!(
            "  {warnings} values were coerced or dropped; run `spendlens validate` for details."
        ));
    }
    lines
}

fn source_label(ledger: &Value) -> String {
    match ledger.get("source_ref").and_then(Value::as_str) {
        Some(path) => path.to_string(),
        None => text(ledger, "source_kind"),
    }
}

fn covers(ledger: &Value) -> String {
    let hint = ledger.get("data_range_hint").cloned().unwrap_or(Value::Null);
    match (
        hint.get("earliest").and_then(Value::as_str),
        hint.get("latest").and_then(Value::as_str),
    ) {
        (Some(earliest), Some(latest)) => format!("{earliest} to {latest}"),
        _ => "no dated rows".to_string(),
    }
}

fn required_rows<'a>(data: &'a Value, key: &str, command: &str) -> io::Result<&'a [Value]> {
    data.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| io::Error::other(format!("{command} output requires {key}")))
}

fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn text(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn number(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn integer(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}
