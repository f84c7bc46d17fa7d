use std::fmt::Write;

use accel_core::{ListView, Record};
use chrono::DateTime;
use serde_json::Value;

const SKELETON_ROW: &str = "  ........  ................  ............  ..........";

/// Renders the list as plain text, one row per record.
pub fn render(view: &ListView, page_size: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", header(view, page_size));

    if view.is_loading {
        for _ in 0..view.skeleton_rows {
            let _ = writeln!(out, "{SKELETON_ROW}");
        }
        return out;
    }

    if view.records.is_empty() {
        let _ = writeln!(out, "  (no accelerations)");
        return out;
    }

    for record in &view.records {
        let _ = writeln!(out, "{}", row(record));
    }
    out
}

fn header(view: &ListView, page_size: u64) -> String {
    match (view.total_count, view.page_count(page_size)) {
        (Some(total), Some(pages)) => {
            format!("page {}/{} ({} accelerations)", view.page, pages, total)
        }
        _ => format!("page {}", view.page),
    }
}

fn row(record: &Record) -> String {
    let txid = record.txid.as_deref().map(shorten).unwrap_or_default();
    let status = record.status.as_deref().unwrap_or("-");
    let boost = record
        .boost
        .map(|sats| format!("{sats} sat"))
        .unwrap_or_else(|| "-".to_string());
    let added = record
        .extra
        .get("added")
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    format!(
        "  {:>8}  {:<16}  {:<12}  {:>10}  {}",
        record.height, txid, status, boost, added
    )
}

fn shorten(txid: &str) -> String {
    if txid.len() <= 16 || !txid.is_ascii() {
        return txid.to_string();
    }
    format!("{}..{}", &txid[..7], &txid[txid.len() - 7..])
}
