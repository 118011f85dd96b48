use crashguard::application::notification_service::NotificationService;
use crashguard::config::{NotificationEnvConfig, PushoverConfig};
use crashguard::domain::market::Indicator;
use crashguard::domain::ports::{IndicatorFetcher, PriceHistoryProvider};
use crashguard::infrastructure::market_data::{
    FredClient, FredIndicatorFetcher, FredSeries, VixFetcher, YahooClient,
};
use crashguard::infrastructure::notifications::channels_from_config;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// FRED returns newest first because the client asks for `sort_order=desc`
fn fred_observations(values_newest_first: &[&str]) -> serde_json::Value {
    let observations: Vec<_> = values_newest_first
        .iter()
        .enumerate()
        .map(|(i, v)| json!({ "date": format!("obs-{}", i), "value": v }))
        .collect();
    json!({ "observations": observations })
}

#[tokio::test]
async fn test_fred_unemployment_yoy_skips_missing_markers() {
    let server = MockServer::start().await;
    // 4.1 now, a "." gap, then eleven 3.9s and 3.6 twelve valid observations back
    let mut values = vec!["4.1", "."];
    values.extend(std::iter::repeat_n("3.9", 11));
    values.push("3.6");
    values.push("3.5");

    Mock::given(method("GET"))
        .and(path("/fred/series/observations"))
        .and(query_param("series_id", "UNRATE"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("file_type", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fred_observations(&values)))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(FredClient::new(server.uri(), "test-key"));
    let fetcher = FredIndicatorFetcher::new(client, FredSeries::Unemployment);

    assert_eq!(fetcher.indicator(), Indicator::UnempYoy);
    let value = fetcher.fetch().await.unwrap();
    assert!((value - 0.5).abs() < 1e-9, "got {}", value);
}

#[tokio::test]
async fn test_fred_curve_in_basis_points() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fred/series/observations"))
        .and(query_param("series_id", "T10Y2Y"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fred_observations(&[".", "-0.25", "-0.20"])),
        )
        .mount(&server)
        .await;

    let client = Arc::new(FredClient::new(server.uri(), "k"));
    let value = FredIndicatorFetcher::new(client, FredSeries::YieldCurve)
        .fetch()
        .await
        .unwrap();
    assert!((value - -25.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_fred_client_error_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fred/series/observations"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad api key"))
        .mount(&server)
        .await;

    let client = Arc::new(FredClient::new(server.uri(), ""));
    let err = FredIndicatorFetcher::new(client, FredSeries::RealGdp)
        .fetch()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("400"));
}

fn chart_body(timestamps: &[i64], closes: &[Option<f64>]) -> serde_json::Value {
    json!({
        "chart": {
            "result": [{
                "meta": { "symbol": "X" },
                "timestamp": timestamps,
                "indicators": { "quote": [{ "close": closes }] }
            }],
            "error": null
        }
    })
}

#[tokio::test]
async fn test_vix_takes_last_non_null_close() {
    let server = MockServer::start().await;
    // 2024-03-01, 03-04, 03-05: the newest session has no close yet
    let body = chart_body(
        &[1709251200, 1709510400, 1709596800],
        &[Some(14.1), Some(15.3), None],
    );
    Mock::given(method("GET"))
        .and(path_regex(r"^/v8/finance/chart/.*VIX$"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let yahoo = Arc::new(YahooClient::new(server.uri()));
    let vix = VixFetcher::new(yahoo).fetch().await.unwrap();
    assert_eq!(vix, 15.3);
}

#[tokio::test]
async fn test_ticker_closes_ascending() {
    let server = MockServer::start().await;
    let body = chart_body(&[1709596800, 1709251200], &[Some(512.0), Some(505.5)]);
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/SPY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let yahoo = YahooClient::new(server.uri());
    let series = yahoo.daily_closes("SPY", 120).await.unwrap();
    assert_eq!(series.len(), 2);
    assert!(series[0].date < series[1].date);
    assert_eq!(series[1].close, 512.0);
}

#[tokio::test]
async fn test_unknown_ticker_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/ZZZZ"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found" } }
        })))
        .mount(&server)
        .await;

    let yahoo = YahooClient::new(server.uri());
    assert!(yahoo.daily_closes("ZZZZ", 120).await.is_err());
}

#[tokio::test]
async fn test_pushover_failure_falls_back_to_webhook() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/messages.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_string_contains("CrashGuard: RED"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = NotificationEnvConfig {
        pushover: Some(PushoverConfig {
            token: "app-token".to_string(),
            user: "user-key".to_string(),
            api_url: format!("{}/1/messages.json", server.uri()),
        }),
        webhook_url: Some(format!("{}/hook", server.uri())),
    };
    let service = NotificationService::new(channels_from_config(&config));

    assert!(service.notify("CrashGuard: RED (CRI 81.5)", "{}").await);
}

#[tokio::test]
async fn test_pushover_sends_form_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/messages.json"))
        .and(body_string_contains("token=app-token"))
        .and(body_string_contains("user=user-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let config = NotificationEnvConfig {
        pushover: Some(PushoverConfig {
            token: "app-token".to_string(),
            user: "user-key".to_string(),
            api_url: format!("{}/1/messages.json", server.uri()),
        }),
        webhook_url: None,
    };
    let service = NotificationService::new(channels_from_config(&config));
    assert!(service.notify("CrashGuard: YELLOW (CRI 42)", "body").await);
}

#[tokio::test]
async fn test_every_channel_down_returns_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = NotificationEnvConfig {
        pushover: None,
        webhook_url: Some(format!("{}/hook", server.uri())),
    };
    let service = NotificationService::new(channels_from_config(&config));
    assert!(!service.notify("t", "b").await);
}
