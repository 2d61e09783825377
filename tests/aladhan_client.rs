use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use ramadan_app::config::PrayerTimesConfig;
use ramadan_app::prayer_times::TimeLocale;
use ramadan_app::{AladhanClient, IftarAggregator, IftarError, Location, MaghribTime, TimingsProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn riyadh() -> Location {
    Location::new("السعودية", 24.7136, 46.6753, "الرياض")
}

fn client_for(server: &MockServer, timeout_seconds: u64) -> AladhanClient {
    let config = PrayerTimesConfig {
        base_url: server.uri(),
        timeout_seconds,
        ..PrayerTimesConfig::default()
    };
    AladhanClient::new(&config).unwrap()
}

fn timings_body(maghrib: &str) -> serde_json::Value {
    serde_json::json!({
        "code": 200,
        "status": "OK",
        "data": {
            "timings": {"Fajr": "04:59", "Maghrib": maghrib, "Isha": "19:18"},
            "date": {"readable": "18 Feb 2026"}
        }
    })
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, day).unwrap()
}

#[tokio::test]
async fn test_sends_coordinates_and_method() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/timings/2026-02-18"))
        .and(query_param("latitude", "24.7136"))
        .and(query_param("longitude", "46.6753"))
        .and(query_param("method", "4"))
        .and(query_param("school", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timings_body("17:48 (+03)")))
        .expect(1)
        .mount(&server)
        .await;

    let time = client_for(&server, 4).maghrib(&riyadh(), date(18)).await.unwrap();
    assert_eq!(time, "17:48 (+03)");
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server, 4).maghrib(&riyadh(), date(18)).await.unwrap_err();
    assert!(matches!(err, IftarError::Api { .. }));
}

#[tokio::test]
async fn test_malformed_or_missing_maghrib_is_error() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/timings/2026-02-18"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;
    Mock::given(path("/v1/timings/2026-02-19"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 200,
            "data": {"timings": {"Fajr": "04:58"}}
        })))
        .mount(&server)
        .await;
    Mock::given(path("/v1/timings/2026-02-20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timings_body("--:--")))
        .mount(&server)
        .await;

    let client = client_for(&server, 4);
    for day in [18, 19, 20] {
        assert!(client.maghrib(&riyadh(), date(day)).await.is_err(), "day {day}");
    }
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(timings_body("17:48"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, 1).maghrib(&riyadh(), date(18)).await.unwrap_err();
    assert!(matches!(err, IftarError::Http { .. }));
}

#[tokio::test]
async fn test_aggregator_over_http_marks_failed_cells() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/timings/2026-02-18"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timings_body("17:48 (+03)")))
        .mount(&server)
        .await;
    Mock::given(path("/v1/timings/2026-02-19"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let aggregator = IftarAggregator::new(
        Arc::new(client_for(&server, 4)),
        25,
        TimeLocale::Arabic,
    );
    let table = aggregator
        .collect(&[riyadh()], &[date(18), date(19)])
        .await
        .unwrap();

    let saudi = &table["السعودية"];
    assert_eq!(saudi.city, "الرياض");
    assert_eq!(saudi.times["2026-02-18"], MaghribTime::Time("5:48 م".to_string()));
    assert_eq!(saudi.times["2026-02-19"], MaghribTime::Unavailable);
}
