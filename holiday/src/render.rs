//! Text, JSON and table output.
//!
//! Every function takes plain query results and returns the full text to
//! print.  UI wording is English; weekday labels and descriptions come from
//! the dataset and are printed verbatim.

use std::collections::BTreeMap;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};
use serde::Serialize;
use serde_json::{json, Value};
use th_cache::CacheStatus;
use th_data::HolidayRecord;
use th_engine::{DateCheck, HealthReport, HolidayStats, WorkdaysStats};

use crate::cli::{GroupBy, OutputFormat};

const RECORD_HEADER: [&str; 4] = ["Date", "Weekday", "Day off", "Description"];

// ── Single day ────────────────────────────────────────────────────────────────

/// Result of `check` / `today`.
pub fn check(result: &DateCheck, format: OutputFormat) -> String {
    let date = &result.date;
    match format {
        OutputFormat::Json => match &result.record {
            Some(r) => pretty(&json!({
                "date": date.iso(),
                "compact": date.compact(),
                "week": r.week,
                "isHoliday": r.is_holiday,
                "isMakeupWorkday": r.is_makeup_workday(),
                "description": r.description,
            })),
            None => pretty(&json!({
                "date": date.iso(),
                "compact": date.compact(),
                "week": date.weekday_label(),
                "isHoliday": Value::Null,
                "error": "no data for this date",
            })),
        },
        OutputFormat::Table => match &result.record {
            Some(r) => records_table([r]),
            None => table(
                &RECORD_HEADER,
                [vec![
                    date.iso().to_string(),
                    date.weekday_label().to_string(),
                    "?".to_string(),
                    "no data".to_string(),
                ]],
            ),
        },
        OutputFormat::Simple => match &result.record {
            None => format!("{} ({}): no data for this date", date.iso(), date.weekday_label()),
            Some(r) if r.is_holiday => format!(
                "{} ({}) is a holiday: {}",
                date.iso(),
                r.week,
                r.display_description()
            ),
            Some(r) if r.is_makeup_workday() => format!(
                "{} ({}) is a makeup workday: {}",
                date.iso(),
                r.week,
                r.description
            ),
            Some(r) => format!("{} ({}) is a workday", date.iso(), r.week),
        },
    }
}

// ── Record lists ──────────────────────────────────────────────────────────────

/// Result of `range`.  `makeup` is present with `--include-workdays`.
pub fn range(
    start: &str,
    end: &str,
    holidays: &[HolidayRecord],
    makeup: Option<&[HolidayRecord]>,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Json => {
            let mut v = json!({
                "start": start,
                "end": end,
                "count": holidays.len(),
                "holidays": holidays.iter().map(day_entry).collect::<Vec<_>>(),
            });
            if let Some(m) = makeup.filter(|m| !m.is_empty()) {
                v["makeupDays"] = m.iter().map(day_entry).collect();
            }
            pretty(&v)
        }
        OutputFormat::Table => {
            let mut text = records_table(holidays);
            if let Some(m) = makeup.filter(|m| !m.is_empty()) {
                text.push_str("\nMakeup workdays\n");
                text.push_str(&records_table(m));
            }
            text
        }
        OutputFormat::Simple => {
            let mut text = titled_lines(
                &format!("Holidays from {start} to {end}"),
                holidays,
                "No holidays in this range",
            );
            if let Some(m) = makeup {
                text.push_str("\n\n");
                text.push_str(&titled_lines(
                    "Related makeup workdays",
                    m,
                    "No related makeup workdays",
                ));
            }
            text
        }
    }
}

/// Result of `list`.
pub fn list(
    year: u16,
    records: &[HolidayRecord],
    group_by: Option<GroupBy>,
    format: OutputFormat,
) -> String {
    let Some(GroupBy::Month) = group_by else {
        return match format {
            OutputFormat::Json => pretty(&records),
            OutputFormat::Table => records_table(records),
            OutputFormat::Simple => titled_lines(
                &format!("Records for {year}"),
                records,
                "No records",
            ),
        };
    };

    let mut groups: BTreeMap<String, Vec<&HolidayRecord>> = BTreeMap::new();
    for r in records {
        let key = r.date.get(4..6).unwrap_or("??").to_string();
        groups.entry(key).or_default().push(r);
    }
    match format {
        OutputFormat::Json => pretty(&groups),
        OutputFormat::Table => groups
            .iter()
            .map(|(m, rs)| format!("{year}-{m}\n{}", records_table(rs.iter().copied())))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Simple => {
            if groups.is_empty() {
                return "No records".to_string();
            }
            groups
                .iter()
                .map(|(m, rs)| {
                    let mut block = format!("{year}-{m} ({})", rs.len());
                    for r in rs {
                        block.push_str("\n  ");
                        block.push_str(&record_line(r));
                    }
                    block
                })
                .collect::<Vec<_>>()
                .join("\n\n")
        }
    }
}

/// Result of `next`.
pub fn next(records: &[HolidayRecord], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => pretty(&records),
        OutputFormat::Table => records_table(records),
        OutputFormat::Simple => match records {
            [] => "No upcoming holidays found".to_string(),
            [one] => format!("Next holiday: {}", record_line(one)),
            many => titled_lines("Upcoming holidays", many, ""),
        },
    }
}

/// Result of `month`.
pub fn month(year: u16, month: u8, records: &[HolidayRecord], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => pretty(&json!({
            "year": year,
            "month": month,
            "holidays": records,
        })),
        OutputFormat::Table => records_table(records),
        OutputFormat::Simple => titled_lines(
            &format!("Holidays in {year}-{month:02}"),
            records,
            "No holidays this month",
        ),
    }
}

// ── Aggregates ────────────────────────────────────────────────────────────────

/// Result of `stats`.
pub fn stats(stats: &HolidayStats, format: OutputFormat) -> String {
    let period = match stats.month {
        Some(m) => format!("{}-{m:02}", stats.year),
        None => stats.year.to_string(),
    };
    let counts = [
        ("Total holidays", stats.total_holidays),
        ("National holidays", stats.national_holidays),
        ("Compensatory days", stats.compensatory_days),
        ("Adjusted holidays", stats.adjusted_holidays),
        ("Makeup workdays", stats.makeup_workdays),
    ];
    match format {
        OutputFormat::Json => pretty(stats),
        OutputFormat::Table => table(
            &["Item", "Count"],
            counts
                .iter()
                .map(|(k, v)| vec![k.to_string(), v.to_string()])
                .chain(
                    stats
                        .holiday_types
                        .iter()
                        .map(|(k, v)| vec![format!("type: {k}"), v.to_string()]),
                ),
        ),
        OutputFormat::Simple => {
            let mut text = format!("Holiday statistics for {period}");
            for (k, v) in counts {
                text.push_str(&format!("\n  {k:<18} {v}"));
            }
            if !stats.holiday_types.is_empty() {
                text.push_str("\n  By type:");
                for (k, v) in &stats.holiday_types {
                    text.push_str(&format!("\n    {k}: {v}"));
                }
            }
            text
        }
    }
}

/// Result of `workdays`.
pub fn workdays(year: u16, month: u8, stats: &WorkdaysStats, format: OutputFormat) -> String {
    workday_report(&format!("{year}-{month:02}"), stats, format)
}

/// Result of `between`.  With `count_only` the simple form is just the
/// number.
pub fn between(
    start: &str,
    end: &str,
    stats: &WorkdaysStats,
    count_only: bool,
    format: OutputFormat,
) -> String {
    match (count_only, format) {
        (true, OutputFormat::Simple) => stats.workdays.to_string(),
        (true, OutputFormat::Json) => pretty(&json!({ "workdays": stats.workdays })),
        _ => workday_report(&format!("{start} to {end}"), stats, format),
    }
}

fn workday_report(period: &str, stats: &WorkdaysStats, format: OutputFormat) -> String {
    let rows = [
        ("Total days", stats.total_days),
        ("Workdays", stats.workdays),
        ("Holidays", stats.holidays),
        ("Makeup workdays", stats.makeup_workdays),
    ];
    match format {
        OutputFormat::Json => {
            let mut v = json!(stats);
            v["period"] = json!(period);
            pretty(&v)
        }
        OutputFormat::Table => table(
            &["Item", "Days"],
            rows.iter().map(|(k, v)| vec![k.to_string(), v.to_string()]),
        ),
        OutputFormat::Simple => {
            let mut text = format!("Workdays in {period}: {}", stats.workdays);
            for (k, v) in &rows[..] {
                if *k != "Workdays" {
                    text.push_str(&format!("\n  {k:<16} {v}"));
                }
            }
            text
        }
    }
}

/// Result of `years`.
pub fn years(years: &[u16], format: OutputFormat) -> String {
    let span = match (years.first(), years.last()) {
        (Some(a), Some(b)) => format!("{a}-{b}"),
        _ => "none".to_string(),
    };
    match format {
        OutputFormat::Json => pretty(&json!({
            "start": years.first(),
            "end": years.last(),
            "years": years,
        })),
        OutputFormat::Table => table(&["Year"], years.iter().map(|y| vec![y.to_string()])),
        OutputFormat::Simple => format!("Supported years: {span}"),
    }
}

// ── Maintenance ───────────────────────────────────────────────────────────────

/// Result of `cache status`.
pub fn cache_status(status: &CacheStatus, format: OutputFormat) -> String {
    let years = if status.cached_years.is_empty() {
        "none".to_string()
    } else {
        status
            .cached_years
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let ttl = format!("{} minutes", status.ttl_ms / 60_000);
    match format {
        OutputFormat::Json => pretty(status),
        OutputFormat::Table => table(
            &["Item", "Value"],
            [
                vec!["Cached years".to_string(), years],
                vec!["Entries".to_string(), status.item_count.to_string()],
                vec!["TTL".to_string(), ttl],
            ],
        ),
        OutputFormat::Simple => format!(
            "Cached years: {years}\nEntries: {}\nTTL: {ttl}",
            status.item_count
        ),
    }
}

/// Result of `config list`.
pub fn settings(values: &BTreeMap<&'static str, String>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => pretty(values),
        OutputFormat::Table => table(
            &["Key", "Value"],
            values.iter().map(|(k, v)| vec![k.to_string(), v.clone()]),
        ),
        OutputFormat::Simple => values
            .iter()
            .map(|(k, v)| format!("{k} = {v}"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Result of `health`.
pub fn health(report: &HealthReport, format: OutputFormat) -> String {
    let api = if report.api.reachable {
        match report.api.latency_ms {
            Some(ms) => format!("reachable ({ms} ms)"),
            None => "reachable".to_string(),
        }
    } else {
        format!(
            "unreachable: {}",
            report.api.error.as_deref().unwrap_or("unknown error")
        )
    };
    let cache = format!("available, {} entries", report.cache.item_count);
    match format {
        OutputFormat::Json => pretty(report),
        OutputFormat::Table => table(
            &["Check", "Result"],
            [
                vec!["Status".to_string(), report.status.to_string()],
                vec!["API".to_string(), api],
                vec!["Cache".to_string(), cache],
                vec!["Version".to_string(), report.version.clone()],
            ],
        ),
        OutputFormat::Simple => format!(
            "Status: {}\n  API:     {api}\n  Cache:   {cache}\n  Version: {}",
            report.status, report.version
        ),
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `YYYYMMDD` as `YYYY-MM-DD`; anything else is returned unchanged.
pub fn iso(compact: &str) -> String {
    match (compact.get(0..4), compact.get(4..6), compact.get(6..8)) {
        (Some(y), Some(m), Some(d)) if compact.len() == 8 => format!("{y}-{m}-{d}"),
        _ => compact.to_string(),
    }
}

/// One record as a line of simple output.
pub fn record_line(r: &HolidayRecord) -> String {
    let head = format!("{} ({})", iso(&r.date), r.week);
    if r.is_holiday {
        format!("{head} {}", r.display_description())
    } else if r.description.is_empty() {
        format!("{head} workday")
    } else {
        format!("{head} {} (workday)", r.description)
    }
}

/// `{date, week, description}` with an ISO date and the display description.
fn day_entry(r: &HolidayRecord) -> Value {
    let description = if r.is_holiday {
        r.display_description()
    } else {
        r.description.as_str()
    };
    json!({ "date": iso(&r.date), "week": r.week, "description": description })
}

fn titled_lines(title: &str, records: &[HolidayRecord], empty: &str) -> String {
    if records.is_empty() {
        return empty.to_string();
    }
    let mut text = format!("{title} ({}):", records.len());
    for r in records {
        text.push_str("\n  ");
        text.push_str(&record_line(r));
    }
    text
}

fn records_table<'a>(records: impl IntoIterator<Item = &'a HolidayRecord>) -> String {
    table(
        &RECORD_HEADER,
        records.into_iter().map(|r| {
            vec![
                iso(&r.date),
                r.week.clone(),
                if r.is_holiday { "yes" } else { "no" }.to_string(),
                if r.is_holiday {
                    r.display_description().to_string()
                } else {
                    r.description.clone()
                },
            ]
        }),
    )
}

fn table(header: &[&str], rows: impl IntoIterator<Item = Vec<String>>) -> String {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL)
        .set_header(header.iter().map(|h| Cell::new(*h)).collect::<Vec<_>>());
    for row in rows {
        t.add_row(row);
    }
    t.to_string()
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_formatting() {
        assert_eq!(iso("20251010"), "2025-10-10");
        assert_eq!(iso("2025"), "2025");
    }

    #[test]
    fn record_lines() {
        let holiday = HolidayRecord::new("20251010", "五", true, "國慶日");
        let weekend = HolidayRecord::new("20251011", "六", true, "");
        let makeup = HolidayRecord::new("20250927", "六", false, "補行上班日");
        let plain = HolidayRecord::new("20251008", "三", false, "");
        assert_eq!(record_line(&holiday), "2025-10-10 (五) 國慶日");
        assert_eq!(record_line(&weekend), "2025-10-11 (六) 週末");
        assert_eq!(record_line(&makeup), "2025-09-27 (六) 補行上班日 (workday)");
        assert_eq!(record_line(&plain), "2025-10-08 (三) workday");
    }
}
