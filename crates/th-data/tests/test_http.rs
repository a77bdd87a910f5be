//! `HttpFetcher` against a local mock server.

use std::sync::Arc;
use std::time::Duration;

use th_core::clock::{Clock, ManualClock};
use th_core::errors::ErrorKind;
use th_data::{HolidaySource, HttpFetcher, SourceConfig, YearFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_year() -> serde_json::Value {
    serde_json::json!([
        {"date": "20251009", "week": "四", "isHoliday": false, "description": ""},
        {"date": "20251010", "week": "五", "isHoliday": true, "description": "國慶日"},
        {"date": "20251011", "week": "六", "isHoliday": true, "description": ""}
    ])
}

#[tokio::test]
async fn fetches_and_decodes_a_year() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2025.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_year()))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(format!("{}/", server.uri())).unwrap();
    assert_eq!(fetcher.source_for(2025), format!("{}/2025.json", server.uri()));

    let records = fetcher.fetch(2025, Duration::from_secs(5)).await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].description, "國慶日");
    assert!(records[1].is_holiday);
    assert_eq!(records[2].week, "六");
}

#[tokio::test]
async fn http_error_status_is_a_data_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2025.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(server.uri()).unwrap();
    let err = fetcher.fetch(2025, Duration::from_secs(5)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
    assert!(err.message().contains("404"), "{err}");
}

#[tokio::test]
async fn malformed_body_is_a_data_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2025.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(server.uri()).unwrap();
    let err = fetcher.fetch(2025, Duration::from_secs(5)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
}

#[tokio::test]
async fn slow_response_times_out_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2025.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_year())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(server.uri()).unwrap();
    let err = fetcher
        .fetch(2025, Duration::from_millis(100))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.message().contains("timed out"), "{err}");
}

#[tokio::test]
async fn health_check_hits_the_current_year() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2024.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_year()))
        .expect(1)
        .mount(&server)
        .await;

    let clock = Arc::new(ManualClock::on(2024, 3, 15));
    let source = HolidaySource::http(
        SourceConfig::default().with_base_url(server.uri()),
        clock as Arc<dyn Clock>,
    )
    .unwrap();
    let health = source.check_health().await;
    assert!(health.reachable, "{health:?}");
    assert!(health.error.is_none());
}

#[tokio::test]
async fn unreachable_host_reports_unhealthy() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let clock = Arc::new(ManualClock::on(2025, 1, 1));
    let source = HolidaySource::http(
        SourceConfig::default()
            .with_base_url(uri)
            .with_timeouts(Duration::from_secs(1), Duration::from_secs(1)),
        clock as Arc<dyn Clock>,
    )
    .unwrap();
    let health = source.check_health().await;
    assert!(!health.reachable);
    assert!(health.error.is_some());

    let err = source.fetch_year(2025).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}
