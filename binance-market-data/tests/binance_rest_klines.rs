use binance_market_data::{
    error::DataError,
    history::{HistoryConfig, fetch_history},
    interval::Interval,
    rest::{KlineFetcher, KlineRequest, client::BinanceRestClient, params::KlinesParams},
};
use chrono::DateTime;
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const HOUR_MS: i64 = 3_600_000;
const START_MS: i64 = 1609459200000;

/// Helper: start a mock server and create a `BinanceRestClient` whose base URL points
/// at the mock server.
async fn setup() -> (MockServer, BinanceRestClient) {
    let mock_server = MockServer::start().await;
    let client = BinanceRestClient::with_base_url(mock_server.uri()).unwrap();
    (mock_server, client)
}

/// Fixture: a single Binance kline array opening at `open_time`.
fn kline_json(open_time: i64, close: &str) -> serde_json::Value {
    json!([
        open_time, "29000.00", "29500.00", "28800.00", close, "1000.00",
        open_time + HOUR_MS - 1, "29000000.00", 5000, "500.00", "14500000.00", "0"
    ])
}

/// Fixture: a realistic Binance kline JSON array with 3 candles.
fn three_klines_json() -> serde_json::Value {
    json!([
        [1609459200000_i64,"29000.00","29500.00","28800.00","29200.00","1000.00",1609545599999_i64,"29000000.00",5000,"500.00","14500000.00","0"],
        [1609545600000_i64,"29200.00","30000.00","29100.00","29800.00","1200.00",1609631999999_i64,"35000000.00",6000,"600.00","17400000.00","0"],
        [1609632000000_i64,"29800.00","30500.00","29600.00","30100.00","800.00",1609718399999_i64,"24000000.00",4000,"400.00","12000000.00","0"]
    ])
}

fn no_delay() -> HistoryConfig {
    HistoryConfig {
        page_delay: Duration::ZERO,
        ..HistoryConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Test 1: klines returns a single page of 3 rows with the expected query
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_klines_single_page() {
    let (mock_server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "1d"))
        .and(query_param("startTime", "1609459200000"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_klines_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let params = KlinesParams {
        limit: Some(3),
        start_time: Some(START_MS),
        end_time: None,
    };

    let rows = client.klines("BTCUSDT", "1d", params).await.unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].open_time, 1609459200000);
    assert_eq!(rows[0].close, "29200.00");
    assert_eq!(rows[0].trade_count, 5000);
    assert_eq!(rows[0].taker_buy_quote_volume, "14500000.00");
    assert_eq!(rows[2].open_time, 1609632000000);
    assert_eq!(rows[2].close_time, 1609718399999);
}

// ---------------------------------------------------------------------------
// Test 2: KlineFetcher propagates a Binance API error (HTTP 400)
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_fetch_klines_api_error() {
    let (mock_server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"code": -1121, "msg": "Invalid symbol."})),
        )
        .mount(&mock_server)
        .await;

    let request = KlineRequest {
        symbol: "INVALID".to_string(),
        interval: Interval::H1,
        start_time: None,
        end_time: None,
        limit: None,
    };

    let result = client.fetch_klines(request).await;

    assert_eq!(
        result,
        Err(DataError::Api {
            status: StatusCode::BAD_REQUEST,
            code: -1121,
            msg: "Invalid symbol.".to_string(),
        })
    );
}

// ---------------------------------------------------------------------------
// Test 3: malformed kline rows surface as transport errors
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_fetch_klines_malformed_row() {
    let (mock_server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [1609459200000_i64, "29000.00", "29500.00"]
        ])))
        .mount(&mock_server)
        .await;

    let request = KlineRequest {
        symbol: "BTCUSDT".to_string(),
        interval: Interval::H1,
        start_time: None,
        end_time: None,
        limit: None,
    };

    let result = client.fetch_klines(request).await;
    assert!(matches!(result, Err(DataError::Transport(_))), "got: {result:?}");
}

// ---------------------------------------------------------------------------
// Test 4: fetch_history paginates backwards and drops the shared boundary row
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_fetch_history_paginates_backwards() {
    let (mock_server, client) = setup().await;

    // Page 1 covers [start + 1h, start + 3h]
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "1h"))
        .and(query_param("startTime", (START_MS + HOUR_MS).to_string()))
        .and(query_param("endTime", (START_MS + 3 * HOUR_MS).to_string()))
        .and(query_param("limit", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            kline_json(START_MS + HOUR_MS, "29100.00"),
            kline_json(START_MS + 2 * HOUR_MS, "29200.00"),
            kline_json(START_MS + 3 * HOUR_MS, "29300.00"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Page 2 covers [start, start + 1h], overlapping page 1 on its boundary row
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("startTime", START_MS.to_string()))
        .and(query_param("endTime", (START_MS + HOUR_MS).to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            kline_json(START_MS, "29000.00"),
            kline_json(START_MS + HOUR_MS, "29100.00"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HistoryConfig {
        max_page_size: 2,
        ..no_delay()
    };

    let series = fetch_history(
        &client,
        "BTCUSDT",
        "1h",
        DateTime::from_timestamp_millis(START_MS).unwrap(),
        DateTime::from_timestamp_millis(START_MS + 3 * HOUR_MS).unwrap(),
        &config,
    )
    .await
    .unwrap();

    let closes = series.klines().map(|kline| kline.close).collect::<Vec<_>>();
    assert_eq!(closes, vec![29000.0, 29100.0, 29200.0, 29300.0]);

    let open_times = series.klines().map(|kline| kline.open_time).collect::<Vec<_>>();
    assert_eq!(
        open_times,
        vec![
            START_MS,
            START_MS + HOUR_MS,
            START_MS + 2 * HOUR_MS,
            START_MS + 3 * HOUR_MS
        ]
    );
    assert_eq!(
        series.first().unwrap().time,
        DateTime::from_timestamp_millis(START_MS).unwrap().naive_utc()
    );
}

// ---------------------------------------------------------------------------
// Test 5: fetch_history aborts on an error from the second page
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_fetch_history_error_on_second_page() {
    let (mock_server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("startTime", (START_MS + HOUR_MS).to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            kline_json(START_MS + HOUR_MS, "29100.00"),
            kline_json(START_MS + 2 * HOUR_MS, "29200.00"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("startTime", START_MS.to_string()))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(json!({"code": -1001, "msg": "Internal error; unable to process your request."})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HistoryConfig {
        max_page_size: 2,
        ..no_delay()
    };

    let result = fetch_history(
        &client,
        "BTCUSDT",
        "1h",
        DateTime::from_timestamp_millis(START_MS).unwrap(),
        DateTime::from_timestamp_millis(START_MS + 3 * HOUR_MS).unwrap(),
        &config,
    )
    .await;

    match result {
        Err(DataError::Api { status, code, .. }) => {
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(code, -1001);
        }
        other => panic!("expected API error, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test 6: fetch_history with an unknown interval never reaches the server
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_fetch_history_invalid_interval() {
    let (mock_server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_klines_json()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = fetch_history(
        &client,
        "BTCUSDT",
        "bogus",
        DateTime::from_timestamp_millis(START_MS).unwrap(),
        DateTime::from_timestamp_millis(START_MS + 3 * HOUR_MS).unwrap(),
        &no_delay(),
    )
    .await;

    assert_eq!(result, Err(DataError::InvalidInterval("bogus".to_string())));
}

// ---------------------------------------------------------------------------
// Test 7: fetch_history raises EmptyResult when every page is empty
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_fetch_history_empty_result() {
    let (mock_server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = fetch_history(
        &client,
        "BTCUSDT",
        "1h",
        DateTime::from_timestamp_millis(START_MS).unwrap(),
        DateTime::from_timestamp_millis(START_MS + 3 * HOUR_MS).unwrap(),
        &no_delay(),
    )
    .await;

    assert!(matches!(result, Err(DataError::EmptyResult { .. })), "got: {result:?}");
}
