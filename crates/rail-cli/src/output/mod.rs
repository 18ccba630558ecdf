use rail_core::MigrationSummary;
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

pub mod table;

/// Render a serializable response in the requested format.
///
/// Text renders arrays of objects as a column table and objects as a
/// `key`/`value` table with nested keys joined by dots.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => Ok(render_text(&serde_json::to_value(value)?)),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Print a run summary: the full structure as JSON, or a per-entity table
/// followed by totals as text.
pub fn summary(summary: &MigrationSummary, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = match format {
        OutputFormat::Json => render(summary, format)?,
        OutputFormat::Text => render_summary_text(summary),
    };
    println!("{rendered}");
    Ok(())
}

fn render_summary_text(summary: &MigrationSummary) -> String {
    if summary.outcomes.is_empty() {
        return format!("{}: nothing to do", summary.direction);
    }
    let rows = summary
        .outcomes
        .iter()
        .map(|o| {
            vec![
                o.entity.to_string(),
                o.succeeded.to_string(),
                o.skipped.to_string(),
                o.failed.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    let table = table::render_table(&["entity", "succeeded", "skipped", "failed"], &rows);
    let status = if summary.is_clean() { "ok" } else { "incomplete" };
    format!(
        "{table}\n\n{} {status}: {} succeeded, {} skipped, {} failed",
        summary.direction,
        summary.total_succeeded(),
        summary.total_skipped(),
        summary.total_failed()
    )
}

fn render_text(value: &Value) -> String {
    match value {
        Value::Array(items) => render_array(items),
        Value::Object(_) => {
            let mut rows = Vec::new();
            flatten("", value, &mut rows);
            table::render_table(&["key", "value"], &rows)
        }
        scalar => value_to_cell(scalar),
    }
}

fn render_array(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    if headers.is_empty() {
        let rows = items.iter().map(|item| vec![value_to_cell(item)]).collect::<Vec<_>>();
        return table::render_table(&["value"], &rows);
    }

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .map(|item| {
            headers
                .iter()
                .map(|header| item.get(header).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    table::render_table(&header_refs, &rows)
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<Vec<String>>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, nested) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, nested, rows);
            }
        }
        other => rows.push(vec![prefix.to_string(), value_to_cell(other)]),
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => other.to_string(),
    }
}
