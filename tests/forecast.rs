use weather_backdrop::{
    data::forecast::{ForecastClient, ForecastError},
    domain::location::Location,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const CURRENT_BODY: &str = r#"{
    "latitude": 51.5,
    "longitude": -0.12,
    "timezone": "Europe/London",
    "current": {
        "time": "2026-02-12T10:00",
        "interval": 900,
        "temperature_2m": 6.1,
        "is_day": 1,
        "weather_code": 63,
        "wind_speed_10m": 24.5,
        "wind_direction_10m": 250
    }
}"#;

fn london() -> Location {
    Location::new("LONDON", 51.5085, -0.1257, "london", "world")
}

#[tokio::test]
async fn fetches_current_conditions_for_the_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "51.5085"))
        .and(query_param("longitude", "-0.1257"))
        .and(query_param(
            "current",
            "temperature_2m,is_day,weather_code,wind_speed_10m,wind_direction_10m",
        ))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CURRENT_BODY, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = ForecastClient::with_base_url(server.uri());
    let snapshot = client.fetch_current(&london()).await.expect("snapshot");

    assert_eq!(snapshot.weather_code, 63);
    assert!(snapshot.is_day);
    assert!((snapshot.temperature_c - 6.1).abs() < 1e-4);
    assert!((snapshot.wind_speed_kmh - 24.5).abs() < 1e-4);
    assert!((snapshot.wind_direction_deg - 250.0).abs() < f32::EPSILON);
}

#[test]
fn trailing_slash_in_base_url_is_ignored() {
    let client = ForecastClient::with_base_url("http://localhost:8080/");
    assert_eq!(client.endpoint(), "http://localhost:8080/v1/forecast");
}

#[tokio::test]
async fn server_errors_surface_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ForecastClient::with_base_url(server.uri());
    let err = client.fetch_current(&london()).await.expect_err("503");

    match err {
        ForecastError::Status(status) => assert_eq!(status.as_u16(), 503),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"current":{"weather_code":"rain"}}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let client = ForecastClient::with_base_url(server.uri());
    let err = client.fetch_current(&london()).await.expect_err("bad body");
    assert!(matches!(err, ForecastError::Decode(_)));
}

#[tokio::test]
async fn unreachable_service_is_a_request_error() {
    let client = ForecastClient::with_base_url("http://127.0.0.1:9");
    let err = client.fetch_current(&london()).await.expect_err("refused");
    assert!(matches!(err, ForecastError::Request(_)));
}
