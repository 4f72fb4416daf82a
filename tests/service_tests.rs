//! End-to-end tests for both services, with the external providers
//! played by wiremock servers.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ceptemp::service::{forwarder, orchestrator};
use ceptemp::{providers, ForwarderState, OrchestratorState, ViaCepClient, WttrClient};

fn http_client() -> reqwest::Client {
    providers::build_client(std::time::Duration::from_secs(5), false).unwrap()
}

fn resolver_router(address_server: &MockServer, weather_server: &MockServer) -> Router {
    let addresses = Arc::new(ViaCepClient::new(http_client(), address_server.uri()));
    let temperatures = Arc::new(WttrClient::new(http_client(), weather_server.uri()));
    orchestrator::router(OrchestratorState::new(addresses, temperatures, true))
}

fn post_temperature(cep: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/temperature")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "cep": cep }).to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn mount_address_success(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/01001000/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP",
        })))
        .mount(server)
        .await;
}

async fn mount_weather_success(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current_condition": [{
                "temp_C": "25.0",
                "temp_F": "77",
                "humidity": "53",
                "weatherDesc": [{"value": "Sunny"}],
            }],
            "nearest_area": [],
            "request": [{"query": "São Paulo", "type": "City"}],
            "weather": [],
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_lookup_succeeds_end_to_end() {
    let address_server = MockServer::start().await;
    let weather_server = MockServer::start().await;
    mount_address_success(&address_server).await;
    mount_weather_success(&weather_server).await;

    let app = resolver_router(&address_server, &weather_server);
    let response = app.oneshot(post_temperature("01001000")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({
            "city": "São Paulo",
            "temp_C": 25.0,
            "temp_F": 77.0,
            "temp_K": 298.0,
        })
    );
}

#[tokio::test]
async fn test_path_variant_shares_the_pipeline() {
    let address_server = MockServer::start().await;
    let weather_server = MockServer::start().await;
    mount_address_success(&address_server).await;
    mount_weather_success(&weather_server).await;

    let app = resolver_router(&address_server, &weather_server);
    let request = Request::builder()
        .method("GET")
        .uri("/temperature/01001000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["city"], "São Paulo");
    assert_eq!(body["temp_K"], 298.0);
}

#[tokio::test]
async fn test_city_omitted_in_single_service_variant() {
    let address_server = MockServer::start().await;
    let weather_server = MockServer::start().await;
    mount_address_success(&address_server).await;
    mount_weather_success(&weather_server).await;

    let addresses = Arc::new(ViaCepClient::new(http_client(), address_server.uri()));
    let temperatures = Arc::new(WttrClient::new(http_client(), weather_server.uri()));
    let app = orchestrator::router(OrchestratorState::new(addresses, temperatures, false));

    let response = app.oneshot(post_temperature("01001000")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body.get("city").is_none());
    assert_eq!(body["temp_C"], 25.0);
}

#[tokio::test]
async fn test_malformed_postal_code_rejected_before_any_lookup() {
    let address_server = MockServer::start().await;
    let weather_server = MockServer::start().await;
    // expect(0) on both providers proves neither was consulted.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&address_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&weather_server)
        .await;

    let app = resolver_router(&address_server, &weather_server);
    let response = app.oneshot(post_temperature("123")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid zipcode");
}

#[tokio::test]
async fn test_unknown_postal_code_is_404_without_weather_call() {
    let address_server = MockServer::start().await;
    let weather_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/99999999/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"erro": "true"})))
        .mount(&address_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&weather_server)
        .await;

    let app = resolver_router(&address_server, &weather_server);
    let response = app.oneshot(post_temperature("99999999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "can not find zipcode");
}

#[tokio::test]
async fn test_address_provider_failure_short_circuits() {
    let address_server = MockServer::start().await;
    let weather_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&address_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&weather_server)
        .await;

    let app = resolver_router(&address_server, &weather_server);
    let response = app.oneshot(post_temperature("01001000")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_missing_condition_data_is_500() {
    let address_server = MockServer::start().await;
    let weather_server = MockServer::start().await;
    mount_address_success(&address_server).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"current_condition": []})))
        .mount(&weather_server)
        .await;

    let app = resolver_router(&address_server, &weather_server);
    let response = app.oneshot(post_temperature("01001000")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "no condition found");
}

#[tokio::test]
async fn test_forwarder_relays_downstream_response_verbatim() {
    let downstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/temperature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "city": "São Paulo",
            "temp_C": 25.0,
            "temp_F": 77.0,
            "temp_K": 298.0,
        })))
        .expect(1)
        .mount(&downstream)
        .await;

    let app = forwarder::router(ForwarderState::new(
        http_client(),
        format!("{}/temperature", downstream.uri()),
    ));
    let response = app.oneshot(post_temperature("01001000")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["city"], "São Paulo");
    assert_eq!(body["temp_K"], 298.0);
}

#[tokio::test]
async fn test_forwarder_passes_through_downstream_errors() {
    let downstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "can not find zipcode"})),
        )
        .mount(&downstream)
        .await;

    let app = forwarder::router(ForwarderState::new(
        http_client(),
        format!("{}/temperature", downstream.uri()),
    ));
    let response = app.oneshot(post_temperature("99999999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "can not find zipcode");
}

#[tokio::test]
async fn test_forwarder_validates_before_relaying() {
    let downstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&downstream)
        .await;

    let app = forwarder::router(ForwarderState::new(
        http_client(),
        format!("{}/temperature", downstream.uri()),
    ));
    let response = app.oneshot(post_temperature("123")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid zipcode");
}

#[tokio::test]
async fn test_forwarder_reports_relay_failure_as_500() {
    let downstream = MockServer::start().await;
    // A downstream body the relay cannot decode as JSON.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&downstream)
        .await;

    let app = forwarder::router(ForwarderState::new(
        http_client(),
        format!("{}/temperature", downstream.uri()),
    ));
    let response = app.oneshot(post_temperature("01001000")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("relaying request downstream"));
}

#[tokio::test]
async fn test_invalid_json_body_is_unprocessable() {
    let address_server = MockServer::start().await;
    let weather_server = MockServer::start().await;
    let app = resolver_router(&address_server, &weather_server);

    let request = Request::builder()
        .method("POST")
        .uri("/temperature")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{broken"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid zipcode");
}
