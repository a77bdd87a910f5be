//! `HolidaySource` caching policy against an in-process transport.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use th_core::clock::{Clock, ManualClock};
use th_core::errors::{Error, ErrorKind, Result};
use th_data::{HolidayRecord, HolidaySource, SourceConfig, YearFetcher};

#[derive(Default)]
struct StubFetcher {
    calls: AtomicUsize,
    failing: AtomicBool,
    last_timeout_ms: AtomicUsize,
}

impl StubFetcher {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl YearFetcher for StubFetcher {
    async fn fetch(&self, year: u16, timeout: Duration) -> Result<Vec<HolidayRecord>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.last_timeout_ms
            .store(timeout.as_millis() as usize, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Network("connection refused".into()));
        }
        // The description records which call produced the list.
        Ok(vec![HolidayRecord::new(
            format!("{year}0101"),
            "三",
            true,
            format!("call {n}"),
        )])
    }

    fn source_for(&self, year: u16) -> String {
        format!("stub://{year}")
    }
}

fn setup() -> (HolidaySource, Arc<StubFetcher>, Arc<ManualClock>) {
    let fetcher = Arc::new(StubFetcher::default());
    let clock = Arc::new(ManualClock::on(2025, 6, 1));
    let source = HolidaySource::new(
        fetcher.clone() as Arc<dyn YearFetcher>,
        SourceConfig::default(),
        clock.clone() as Arc<dyn Clock>,
    );
    (source, fetcher, clock)
}

#[tokio::test]
async fn second_read_is_served_from_cache() {
    let (source, fetcher, _) = setup();
    let first = source.fetch_year(2025).await.unwrap();
    let second = source.fetch_year(2025).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(fetcher.last_timeout_ms.load(Ordering::SeqCst), 10_000);
    assert_eq!(source.cache_status().cached_years, vec![2025]);
}

#[tokio::test]
async fn unsupported_year_fails_before_fetching() {
    let (source, fetcher, _) = setup();
    for year in [2016, 2027] {
        let err = source.fetch_year(year).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
        assert!(err.message().contains("out of supported range"));
    }
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn expired_entry_is_refetched() {
    let (source, fetcher, clock) = setup();
    source.fetch_year(2025).await.unwrap();
    clock.advance(Duration::from_secs(3601));
    let records = source.fetch_year(2025).await.unwrap();
    assert_eq!(records[0].description, "call 2");
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn stale_list_masks_transport_failure() {
    let (source, fetcher, clock) = setup();
    source.fetch_year(2025).await.unwrap();
    clock.advance(Duration::from_secs(48 * 3600));
    fetcher.fail(true);

    let records = source.fetch_year(2025).await.unwrap();
    assert_eq!(records[0].description, "call 1");
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn failure_without_cache_keeps_its_kind() {
    let (source, fetcher, _) = setup();
    fetcher.fail(true);
    let err = source.fetch_year(2024).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(
        err.message(),
        "cannot load holidays for 2024: connection refused"
    );
}

#[tokio::test]
async fn bypass_skips_read_but_writes_back() {
    let (source, fetcher, _) = setup();
    source.fetch_year(2025).await.unwrap();

    source.set_bypass_cache(true);
    assert!(source.bypass_cache());
    let fresh = source.fetch_year(2025).await.unwrap();
    assert_eq!(fresh[0].description, "call 2");

    source.set_bypass_cache(false);
    let cached = source.fetch_year(2025).await.unwrap();
    assert_eq!(cached[0].description, "call 2");
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn bypass_does_not_fall_back_to_stale() {
    let (source, fetcher, _) = setup();
    source.fetch_year(2025).await.unwrap();
    source.set_bypass_cache(true);
    fetcher.fail(true);
    let err = source.fetch_year(2025).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn clear_cache_forces_refetch() {
    let (source, fetcher, _) = setup();
    source.fetch_year(2025).await.unwrap();
    source.clear_cache();
    assert_eq!(source.cache_status().item_count, 0);
    source.fetch_year(2025).await.unwrap();
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn health_check_reports_without_failing() {
    let (source, fetcher, _) = setup();
    let health = source.check_health().await;
    assert!(health.reachable);
    assert!(health.latency_ms.is_some());
    assert_eq!(health.error, None);
    assert_eq!(fetcher.last_timeout_ms.load(Ordering::SeqCst), 5_000);

    fetcher.fail(true);
    let health = source.check_health().await;
    assert!(!health.reachable);
    assert_eq!(health.latency_ms, None);
    assert_eq!(health.error.as_deref(), Some("connection refused"));

    let json = serde_json::to_value(&health).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "reachable": false, "error": "connection refused" })
    );
}

#[test]
fn supported_years_need_no_network() {
    let (source, fetcher, _) = setup();
    assert_eq!(source.supported_years(), (2017..=2026).collect::<Vec<u16>>());
    assert_eq!(fetcher.calls(), 0);
}
