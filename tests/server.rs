mod common;

use std::sync::Arc;

use burn_fact_check::pipelines::sequence_classification::{Classify, Label};
use common::{
    is_rounded_to_4dp, load_classifier, spawn_server, CountingClassifier, FailingClassifier,
};
use futures::future::join_all;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const LABELS: [&str; 3] = ["Contradiction", "Neutral", "Entailment"];

fn predict_url(addr: std::net::SocketAddr) -> String {
    format!("http://{}/predict", addr)
}

#[tokio::test]
async fn test_predict_returns_label_and_confidence() {
    let classifier = Arc::new(load_classifier("server-predict").await);
    let addr = spawn_server(classifier).await;

    let response = reqwest::Client::new()
        .post(predict_url(addr))
        .json(&json!({ "text": "The sky is blue." }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let prediction = body["prediction"].as_str().unwrap();
    let confidence = body["confidence"].as_f64().unwrap();

    assert!(LABELS.contains(&prediction));
    assert!((0.0..=1.0).contains(&confidence));
    assert!(is_rounded_to_4dp(confidence));
    assert_eq!(body.as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_text_is_a_client_error_without_inference() {
    let classifier = Arc::new(CountingClassifier::default());
    let addr = spawn_server(classifier.clone()).await;
    let client = reqwest::Client::new();

    for body in [json!({ "text": "" }), json!({}), json!({ "text": null })] {
        let response = client
            .post(predict_url(addr))
            .json(&body)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
        assert_eq!(
            response.json::<Value>().await.unwrap(),
            json!({ "error": "No text provided" })
        );
    }

    assert_eq!(classifier.calls(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_a_client_error() {
    let classifier = Arc::new(CountingClassifier::default());
    let addr = spawn_server(classifier.clone()).await;

    let response = reqwest::Client::new()
        .post(predict_url(addr))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
    assert_eq!(classifier.calls(), 0);
}

#[tokio::test]
async fn test_mocked_prediction_is_passed_through() {
    let classifier = Arc::new(CountingClassifier::default());
    let addr = spawn_server(classifier.clone()).await;

    let response = reqwest::Client::new()
        .post(predict_url(addr))
        .json(&json!({ "text": "Grass is green." }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "prediction": "Neutral", "confidence": 0.8732 })
    );
    assert_eq!(classifier.calls(), 1);
}

#[tokio::test]
async fn test_inference_failure_is_a_server_error() {
    let addr = spawn_server(Arc::new(FailingClassifier)).await;

    let response = reqwest::Client::new()
        .post(predict_url(addr))
        .json(&json!({ "text": "The earth is flat." }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "error": "Inference failed" })
    );
}

#[tokio::test]
async fn test_concurrent_requests_match_their_inputs() {
    let classifier = Arc::new(load_classifier("server-concurrent").await);
    let addr = spawn_server(classifier.clone()).await;
    let client = reqwest::Client::new();

    let texts: Vec<String> = [
        "The sky is blue.",
        "The sun rises in the west.",
        "Water is not wet.",
        "A cat is not a dog.",
        "The moon is made of cheese.",
        "The earth is round.",
        "Fire is hot.",
        "Grass is green.",
    ]
    .iter()
    .map(|text| text.to_string())
    .collect();

    let expected: Vec<Value> = texts
        .iter()
        .map(|text| {
            let prediction = classifier.classify(text).unwrap();
            json!({ "prediction": prediction.label, "confidence": prediction.confidence })
        })
        .collect();

    let responses = join_all(texts.iter().map(|text| {
        let client = client.clone();
        let url = predict_url(addr);

        async move {
            client
                .post(url)
                .json(&json!({ "text": text }))
                .send()
                .await
                .unwrap()
                .json::<Value>()
                .await
                .unwrap()
        }
    }))
    .await;

    assert_eq!(responses, expected);
}

#[tokio::test]
async fn test_cross_origin_requests_are_allowed() {
    let addr = spawn_server(Arc::new(CountingClassifier::default())).await;
    let client = reqwest::Client::new();

    let preflight = client
        .request(reqwest::Method::OPTIONS, predict_url(addr))
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(preflight.status().is_success());
    assert_eq!(
        preflight.headers()["access-control-allow-origin"],
        "*"
    );

    let response = client
        .post(predict_url(addr))
        .header("origin", "http://localhost:5173")
        .json(&json!({ "text": "The sky is blue." }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_health_reports_label_order() {
    let addr = spawn_server(Arc::new(CountingClassifier::default())).await;

    let body: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        json!({ "status": "ok", "labels": Label::ALL })
    );
}
