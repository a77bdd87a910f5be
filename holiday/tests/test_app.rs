//! End-to-end command runs against an in-process dataset.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use holiday::core::errors::{Error, Result};
use holiday::core::{Clock, ErrorKind, ManualClock};
use holiday::data::{HolidayRecord, HolidaySource, SourceConfig, YearFetcher};
use holiday::engine::HolidayEngine;
use holiday::time::Date;
use holiday::{preprocess_args, Cli, SettingsStore};

/// 2025 with weekends off and a few October overrides; other years fail.
struct October2025 {
    calls: AtomicUsize,
}

#[async_trait]
impl YearFetcher for October2025 {
    async fn fetch(&self, year: u16, _timeout: Duration) -> Result<Vec<HolidayRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if year != 2025 {
            return Err(Error::Network(format!("no fixture for {year}")));
        }
        let overrides = [
            ("20250927", false, "補行上班日"),
            ("20251006", true, "中秋節"),
            ("20251010", true, "國慶日"),
            ("20251024", true, "臺灣光復暨金門古寧頭大捷紀念日"),
        ];
        let mut d = Date::from_ymd(2025, 1, 1)?;
        let mut out = Vec::new();
        while d.year() == 2025 {
            let compact = d.compact();
            let (is_holiday, desc) = overrides
                .iter()
                .find(|(c, _, _)| *c == compact)
                .map(|(_, h, s)| (*h, s.to_string()))
                .unwrap_or((d.weekday().is_weekend(), String::new()));
            out.push(HolidayRecord::new(compact, d.weekday().label(), is_holiday, desc));
            d = d.add_days(1)?;
        }
        Ok(out)
    }

    fn source_for(&self, year: u16) -> String {
        format!("fixture://{year}")
    }
}

struct Harness {
    engine: HolidayEngine,
    fetcher: Arc<October2025>,
    settings: SettingsStore,
    _dir: tempfile::TempDir,
}

impl Harness {
    fn new() -> Self {
        let fetcher = Arc::new(October2025 {
            calls: AtomicUsize::new(0),
        });
        // 2025-10-01 is a Wednesday.
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::on(2025, 10, 1));
        let source = HolidaySource::new(
            fetcher.clone() as Arc<dyn YearFetcher>,
            SourceConfig::default(),
            clock.clone(),
        );
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsStore::open(dir.path().join("settings.json")).unwrap();
        Self {
            engine: HolidayEngine::new(Arc::new(source), clock),
            fetcher,
            settings,
            _dir: dir,
        }
    }

    async fn run(&mut self, args: &[&str]) -> Result<String> {
        let argv: Vec<String> = std::iter::once("holiday")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        let cli = Cli::try_parse_from(preprocess_args(argv)).unwrap();
        let mut out = Vec::new();
        holiday::run(cli, &self.engine, &mut self.settings, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn calls(&self) -> usize {
        self.fetcher.calls.load(Ordering::SeqCst)
    }
}

#[tokio::test]
async fn check_prints_the_designation() {
    let mut h = Harness::new();
    assert_eq!(
        h.run(&["2025-10-10"]).await.unwrap(),
        "2025-10-10 (五) is a holiday: 國慶日\n"
    );
    assert_eq!(
        h.run(&["check", "20251011"]).await.unwrap(),
        "2025-10-11 (六) is a holiday: 週末\n"
    );
    assert_eq!(
        h.run(&["check", "2025-09-27"]).await.unwrap(),
        "2025-09-27 (六) is a makeup workday: 補行上班日\n"
    );
    assert_eq!(
        h.run(&["today"]).await.unwrap(),
        "2025-10-01 (三) is a workday\n"
    );
}

#[tokio::test]
async fn check_json_shape() {
    let mut h = Harness::new();
    let text = h.run(&["check", "tomorrow", "-f", "json"]).await.unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["date"], "2025-10-02");
    assert_eq!(v["compact"], "20251002");
    assert_eq!(v["isHoliday"], false);
    assert_eq!(v["isMakeupWorkday"], false);
}

#[tokio::test]
async fn workday_counts() {
    let mut h = Harness::new();
    let month = h.run(&["workdays", "2025", "10"]).await.unwrap();
    assert!(month.starts_with("Workdays in 2025-10: 20\n"), "{month}");

    // 10-04, 10-05, 10-06 and 10-10 are off.
    assert_eq!(
        h.run(&["between", "2025-10-01", "2025-10-10", "-w"]).await.unwrap(),
        "6\n"
    );
    let text = h
        .run(&["between", "2025-10-01", "2025-10-10", "-f", "json"])
        .await
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["totalDays"], 10);
    assert_eq!(v["holidays"], 4);
    assert_eq!(v["period"], "2025-10-01 to 2025-10-10");
}

#[tokio::test]
async fn next_skips_plain_weekends() {
    let mut h = Harness::new();
    let text = h.run(&["next", "--skip-weekends", "-n", "2"]).await.unwrap();
    assert_eq!(
        text,
        "Upcoming holidays (2):\n  2025-10-06 (一) 中秋節\n  2025-10-10 (五) 國慶日\n"
    );
    let one = h.run(&["next"]).await.unwrap();
    assert_eq!(one, "Next holiday: 2025-10-04 (六) 週末\n");
    let err = h.run(&["next", "-n", "0"]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn range_with_related_makeup_days() {
    let mut h = Harness::new();
    let text = h
        .run(&["range", "2025-10-01", "2025-10-10", "--include-workdays", "-f", "json"])
        .await
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["count"], 4);
    assert_eq!(v["holidays"].as_array().unwrap().len(), 4);
    assert_eq!(v["holidays"][0]["date"], "2025-10-04");
    assert_eq!(v["holidays"][0]["description"], "週末");
    assert_eq!(v["makeupDays"][0]["date"], "2025-09-27");
    assert_eq!(v["makeupDays"][0]["description"], "補行上班日");
    assert_eq!(v["start"], "2025-10-01");

    let text = h
        .run(&["range", "2025-10-01", "2025-10-10", "-f", "json"])
        .await
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(v.get("makeupDays").is_none());

    let err = h.run(&["range", "2025-10-10", "2025-10-01"]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn stats_and_month_listing() {
    let mut h = Harness::new();
    let text = h.run(&["stats", "2025", "10", "-f", "json"]).await.unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["totalHolidays"], 11);
    assert_eq!(v["month"], 10);
    assert_eq!(v["holidayTypes"]["國慶日"], 1);
    assert_eq!(v["workingDays"], 0);

    let text = h.run(&["stats", "2025", "9", "-f", "json"]).await.unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["workingDays"], 1);

    let month = h.run(&["month", "2025", "10"]).await.unwrap();
    assert!(month.starts_with("Holidays in 2025-10 (11):"), "{month}");
    let table = h.run(&["month", "2025", "10", "-f", "table"]).await.unwrap();
    assert!(table.contains("國慶日"));
    assert!(table.contains("Description"));

    let err = h.run(&["month", "2025", "13"]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn list_grouped_by_month() {
    let mut h = Harness::new();
    let text = h
        .run(&["list", "2025", "--holidays-only", "--group-by", "month", "-f", "json"])
        .await
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    let groups = v.as_object().unwrap();
    assert_eq!(groups.len(), 12);
    assert_eq!(groups["10"].as_array().unwrap().len(), 11);
    assert!(groups["09"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["isHoliday"] == true));
}

#[tokio::test]
async fn unsupported_year_fails_with_data_error() {
    let mut h = Harness::new();
    let err = h.run(&["stats", "2030"]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
    assert_eq!(err.exit_code().code(), 4);
    assert_eq!(h.calls(), 0);
}

#[tokio::test]
async fn network_failure_without_cache() {
    let mut h = Harness::new();
    let err = h.run(&["check", "2024-05-01"]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.exit_code().code(), 3);
}

#[tokio::test]
async fn cache_status_clear_and_bypass() {
    let mut h = Harness::new();
    h.run(&["2025-10-10"]).await.unwrap();
    h.run(&["2025-10-11"]).await.unwrap();
    assert_eq!(h.calls(), 1);

    let status = h.run(&["cache", "status"]).await.unwrap();
    assert_eq!(status, "Cached years: 2025\nEntries: 1\nTTL: 60 minutes\n");

    h.run(&["--no-cache", "2025-10-10"]).await.unwrap();
    assert_eq!(h.calls(), 2);

    assert_eq!(h.run(&["cache", "clear"]).await.unwrap(), "Cache cleared\n");
    let status = h.run(&["cache", "status", "-f", "json"]).await.unwrap();
    let v: serde_json::Value = serde_json::from_str(&status).unwrap();
    assert_eq!(v["itemCount"], 0);
}

#[tokio::test]
async fn stored_format_becomes_the_default() {
    let mut h = Harness::new();
    assert_eq!(h.run(&["config", "get", "format"]).await.unwrap(), "simple\n");
    assert_eq!(
        h.run(&["config", "set", "format", "json"]).await.unwrap(),
        "format = json\n"
    );
    let text = h.run(&["years"]).await.unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["start"], 2017);
    assert_eq!(v["end"], 2026);

    // An explicit flag still wins.
    assert_eq!(
        h.run(&["years", "-f", "simple"]).await.unwrap(),
        "Supported years: 2017-2026\n"
    );

    let err = h.run(&["config", "set", "format", "xml"]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(err.exit_code().code(), 5);
}

#[tokio::test]
async fn invalid_date_exit_code() {
    let mut h = Harness::new();
    let err = h.run(&["check", "2025-02-29"]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.exit_code().code(), 2);
}

#[tokio::test]
async fn completion_script_names_the_binary() {
    let mut h = Harness::new();
    let script = h.run(&["completion", "bash"]).await.unwrap();
    assert!(script.contains("holiday"));
    assert!(script.contains("workdays"));
}

struct ClosedPipe;

impl std::io::Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn unwritable_output_is_a_general_failure() {
    let mut h = Harness::new();
    let cli = Cli::try_parse_from(["holiday", "years"]).unwrap();
    let err = holiday::run(cli, &h.engine, &mut h.settings, &mut ClosedPipe)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
    assert_eq!(err.exit_code().code(), 1);
    assert!(err.message().starts_with("cannot write output"));
}

#[tokio::test]
async fn format_flag_before_a_bare_date() {
    let mut h = Harness::new();
    let text = h.run(&["-f", "json", "2025-10-10"]).await.unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["isHoliday"], true);
    assert_eq!(v["description"], "國慶日");
}
