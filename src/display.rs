use crate::filter::ParsedQuery;
use crate::record::RequestRecord;
use chrono::SecondsFormat;
use colored::{ColoredString, Colorize};
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use serde_json::json;
use std::fmt::Write;

/// One line per record: status, method, size, start time (when the
/// record carries one) and URL. With `use_color` off the rendering is
/// plain text, suitable for writing to a file.
pub fn format_records_text(records: &[&RequestRecord], use_color: bool) -> String {
    let mut out = String::new();
    for record in records {
        let _ = write!(
            out,
            "{:>7} {:<7} {:>10}",
            colored_status(record, use_color),
            record.method,
            format_size(record.content_size)
        );
        if let Some(started) = record.started {
            let _ = write!(
                out,
                "  {}",
                started.to_rfc3339_opts(SecondsFormat::Millis, true)
            );
        }
        let _ = writeln!(out, "  {}", record.url);
    }
    out
}

/// Tabular rendering of the matched records.
pub fn format_records_table(records: &[&RequestRecord]) -> String {
    let mut table = styled_table(&[
        "Status",
        "Method",
        "Domain",
        "Cause",
        "Type",
        "Transferred",
        "Size",
        "URL",
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(status_label(record)),
            Cell::new(&record.method),
            Cell::new(&record.url_details.host),
            Cell::new(record.cause.kind.as_deref().unwrap_or("")),
            Cell::new(&record.mime_type),
            Cell::new(transferred_label(record)),
            Cell::new(format_size(record.content_size)),
            Cell::new(truncate_string(&record.url, 60)),
        ]);
    }

    format!("{table}\n")
}

pub fn format_records_json(records: &[&RequestRecord]) -> String {
    serde_json::to_string_pretty(&json!({
        "requests": {
            "count": records.len(),
            "records": records,
        }
    }))
    .unwrap_or_else(|_| "{\"requests\":{\"error\":\"failed to serialize records\"}}".into())
}

/// Human-readable breakdown of a parsed query.
pub fn format_query_text(query_text: &str, parsed: &ParsedQuery) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Query: {}", query_text);

    if parsed.is_empty() {
        let _ = writeln!(out, "Empty query: matches every record.");
        return out;
    }

    if !parsed.text.is_empty() {
        let _ = writeln!(out, "\nFree-text terms ({}):", parsed.text.len());
        for term in &parsed.text {
            match term.strip_prefix('-').filter(|rest| !rest.is_empty()) {
                Some(rest) => {
                    let _ = writeln!(out, "  URL does not contain {:?}", rest);
                }
                None => {
                    let _ = writeln!(out, "  URL contains {:?}", term);
                }
            }
        }
    }

    if !parsed.flags.is_empty() {
        let _ = writeln!(out, "\nFlag clauses ({}):", parsed.flags.len());
        for clause in &parsed.flags {
            let _ = writeln!(out, "  {}", clause);
        }
    }

    out
}

pub fn format_query_json(query_text: &str, parsed: &ParsedQuery) -> String {
    serde_json::to_string_pretty(&json!({
        "query": {
            "raw": query_text,
            "text": parsed.text,
            "flags": parsed
                .flags
                .iter()
                .map(|clause| json!({
                    "key": clause.filter.key(),
                    "negative": clause.negative,
                    "clause": clause.to_string(),
                }))
                .collect::<Vec<_>>(),
        }
    }))
    .unwrap_or_else(|_| "{\"query\":{\"error\":\"failed to serialize query\"}}".into())
}

/// Approximate byte count with a binary unit suffix.
pub fn format_size(bytes: f64) -> String {
    if !bytes.is_finite() || bytes < 0.0 {
        return "n/a".to_string();
    }
    if bytes < 1024.0 {
        return format!("{} B", bytes as u64);
    }
    let kib = bytes / 1024.0;
    if kib < 1024.0 {
        return format!("{:.1} kB", kib);
    }
    format!("{:.1} MB", kib / 1024.0)
}

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h)).collect::<Vec<_>>());
    table
}

fn status_label(record: &RequestRecord) -> String {
    if record.is_pending() {
        "pending".to_string()
    } else {
        record.status.clone().unwrap_or_default()
    }
}

fn transferred_label(record: &RequestRecord) -> String {
    if record.from_cache {
        "cached".to_string()
    } else {
        format_size(record.transferred_size)
    }
}

fn colored_status(record: &RequestRecord, use_color: bool) -> ColoredString {
    let label = status_label(record);
    if !use_color {
        return label.as_str().normal();
    }
    match label.chars().next() {
        Some('2') => label.as_str().green(),
        Some('3') => label.as_str().yellow(),
        Some('4') | Some('5') => label.as_str().red(),
        _ => label.as_str().dimmed(),
    }
}

fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", truncated)
}
