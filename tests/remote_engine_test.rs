//! Wiremock integration tests for [`RemoteEngine`].
//!
//! Covers request routing to the inference worker, error mapping, and the
//! full endpoint flow with caching on top of a real HTTP engine.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use exhibit::engine::{EngineError, Predictor, RemoteEngine};
use exhibit::types::{AttackRequest, Attacker, Interpreter};
use exhibit::{ModelConfig, ModelEndpoint};

#[tokio::test]
async fn predict_posts_inputs_to_model_route() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sst/predict"))
        .and(body_json(json!({ "sentence": "a fine film" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "label": "pos" })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = RemoteEngine::new(server.uri(), "sst").unwrap();
    let result = engine
        .predict(&json!({ "sentence": "a fine film" }))
        .await
        .unwrap();

    assert_eq!(result, json!({ "label": "pos" }));
}

#[tokio::test]
async fn interpret_and_attack_use_capability_routes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sst/interpret/integrated_gradient"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "instance_1": {} })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/sst/attack/input_reduction"))
        .and(body_partial_json(json!({
            "inputs": { "sentence": "x" },
            "input_field_to_attack": "tokens",
            "grad_input_field": "grad_input_1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "final": [["x"]] })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = RemoteEngine::new(server.uri(), "sst").unwrap();

    let saliency = engine
        .interpret(Interpreter::IntegratedGradient, &json!({ "sentence": "x" }))
        .await
        .unwrap();
    assert_eq!(saliency, json!({ "instance_1": {} }));

    let attack = engine
        .attack(
            Attacker::InputReduction,
            &AttackRequest::new(json!({ "sentence": "x" })),
        )
        .await
        .unwrap();
    assert_eq!(attack, json!({ "final": [["x"]] }));
}

#[tokio::test]
async fn worker_error_status_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sst/predict"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "error": "model still loading" })),
        )
        .mount(&server)
        .await;

    let engine = RemoteEngine::new(server.uri(), "sst").unwrap();
    let err = engine.predict(&json!({})).await.unwrap_err();

    assert_eq!(
        err,
        EngineError::Api {
            status: 503,
            message: "model still loading".into(),
        }
    );
}

#[tokio::test]
async fn non_json_success_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sst/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let engine = RemoteEngine::new(server.uri(), "sst").unwrap();
    let err = engine.predict(&json!({})).await.unwrap_err();

    assert!(matches!(err, EngineError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn unreachable_worker_is_http_error() {
    // Nothing listens on port 9 on a test machine.
    let engine = RemoteEngine::new("http://127.0.0.1:9", "sst").unwrap();
    let err = engine.predict(&json!({})).await.unwrap_err();

    assert!(matches!(err, EngineError::Http(_)), "{err:?}");
}

#[tokio::test]
async fn endpoint_caches_remote_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sst/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "label": "pos" })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = RemoteEngine::new(server.uri(), "sst").unwrap();
    let endpoint =
        ModelEndpoint::new(ModelConfig::pretrained("sst", "roberta-sst"), Arc::new(engine))
            .unwrap();

    let body = br#"{"sentence": "a fine film"}"#;
    assert!(!endpoint.predict(body, false).await.unwrap().hit);
    assert!(endpoint.predict(body, false).await.unwrap().hit);
    // `expect(1)` is verified when the server drops.
}
