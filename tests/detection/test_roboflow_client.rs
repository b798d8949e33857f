// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Roboflow client tests against a mock hosted API

use base64::{engine::general_purpose::STANDARD, Engine as _};
use seed_gateway::{
    config::RoboflowConfig,
    detection::{
        DetectionBackend, DetectionError, DetectionOptions, RoboflowClient,
        SeedDetectionService,
    },
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::png_bytes;

const MODEL_PATH: &str = "/seed-classification-89b7c/9";

fn config_for(server: &MockServer) -> RoboflowConfig {
    RoboflowConfig {
        api_key: Some("test-key".to_string()),
        base_url: server.uri(),
        ..Default::default()
    }
}

fn sample_response() -> serde_json::Value {
    json!({
        "inference_id": "abc-123",
        "time": 0.05,
        "image": {"width": 640, "height": 320},
        "predictions": [
            {
                "x": 100.0, "y": 80.0, "width": 30.0, "height": 24.0,
                "confidence": 0.91, "class": "Good_Maize", "class_id": 3,
                "detection_id": "d1"
            },
            {
                "x": 300.0, "y": 200.0, "width": 28.0, "height": 20.0,
                "confidence": 0.44, "class": "Impurity", "class_id": 10,
                "detection_id": "d2"
            }
        ]
    })
}

#[tokio::test]
async fn test_infer_sends_expected_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(query_param("api_key", "test-key"))
        .and(query_param("confidence", "0.3"))
        .and(query_param("overlap", "0.3"))
        .and(query_param("format", "json"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("aGVsbG8="))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = RoboflowClient::new(&config_for(&server)).unwrap();
    let response = client.infer("aGVsbG8=".to_string()).await.unwrap();

    assert_eq!(response.predictions.len(), 2);
    assert_eq!(response.predictions[0].class_name, "Good_Maize");
    assert_eq!(response.predictions[1].class_id, Some(10));
    assert_eq!(response.image["width"], 640);
    assert_eq!(response.inference_id.as_deref(), Some("abc-123"));
}

#[tokio::test]
async fn test_infer_tolerates_missing_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = RoboflowClient::new(&config_for(&server)).unwrap();
    let response = client.infer("aGVsbG8=".to_string()).await.unwrap();

    assert!(response.predictions.is_empty());
    assert_eq!(response.time, 0.0);
}

#[tokio::test]
async fn test_infer_non_success_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(403).set_body_string(r#"{"message":"Forbidden"}"#),
        )
        .mount(&server)
        .await;

    let client = RoboflowClient::new(&config_for(&server)).unwrap();
    let err = client.infer("aGVsbG8=".to_string()).await.unwrap_err();

    match err {
        DetectionError::Upstream { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("Forbidden"));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_infer_malformed_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = RoboflowClient::new(&config_for(&server)).unwrap();
    let err = client.infer("aGVsbG8=".to_string()).await.unwrap_err();

    assert!(matches!(err, DetectionError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_infer_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_response())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = RoboflowConfig {
        timeout: Duration::from_millis(200),
        ..config_for(&server)
    };
    let client = RoboflowClient::new(&config).unwrap();
    let err = client.infer("aGVsbG8=".to_string()).await.unwrap_err();

    assert!(matches!(err, DetectionError::Timeout));
    assert!(!err.to_string().contains("test-key"));
}

#[tokio::test]
async fn test_service_downscales_before_upload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = RoboflowClient::new(&config).unwrap();
    let service = SeedDetectionService::new(
        Arc::new(client),
        DetectionOptions::from_config(&config, 10 * 1024 * 1024),
    );

    let report = service.detect(png_bytes(1000, 500).into()).await.unwrap();
    assert_eq!(report.detection_count, 2);
    assert_eq!(report.predictions[0].class_name, "Good_Maize");
    assert_eq!(report.summary.good, 1);
    assert_eq!(report.summary.impurity, 1);
    assert!(report.annotated_image.is_some());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let jpeg = STANDARD.decode(&requests[0].body).unwrap();
    let uploaded = image::load_from_memory(&jpeg).unwrap();
    assert_eq!((uploaded.width(), uploaded.height()), (640, 320));
}
