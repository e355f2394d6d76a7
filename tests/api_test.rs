use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use text_classifier::corpus::{self, CLASSES};
use text_classifier::server::{self, ErrorResponse, HealthResponse, InfoResponse, MAX_PAYLOAD_BYTES};
use text_classifier::{Classifier, TfIdfVectorizer};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn classifier() -> Classifier {
    corpus::train().expect("the built-in corpus always trains")
}

macro_rules! app {
    ($classifier:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($classifier))
                .configure(server::configure),
        )
        .await
    };
}

async fn post_predict(classifier: Classifier, body: Value) -> (StatusCode, Value) {
    let app = app!(classifier);
    let req = test::TestRequest::post().uri("/predict").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_web::test]
async fn test_health_check() {
    init();
    let app = app!(classifier());
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: HealthResponse = test::read_body_json(resp).await;
    assert_eq!(body, HealthResponse { status: "healthy".to_string() });
}

#[actix_web::test]
async fn test_health_check_exact_body() {
    init();
    let app = app!(classifier());
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"status": "healthy"}));
}

#[actix_web::test]
async fn test_predict_known_sentences() {
    init();
    let cases = [
        ("saya sangat senang hari ini", "positif"),
        ("pelayanan yang buruk", "negatif"),
        ("standar saja", "netral"),
    ];
    for (text, expected) in cases {
        let (status, body) = post_predict(classifier(), json!({ "text": text })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], text);
        assert_eq!(body["predicted_class"], expected);
        let confidence = body["confidence"].as_f64().expect("confidence is a float");
        assert!((0.0..=1.0).contains(&confidence));
    }
}

#[actix_web::test]
async fn test_predict_positive() {
    init();
    let (status, body) =
        post_predict(classifier(), json!({"text": "saya sangat senang dengan produk ini"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_class"], "positif");
    assert!(body["confidence"].is_f64());
}

#[actix_web::test]
async fn test_predict_negative() {
    init();
    let text = "saya kecewa dengan pelayanan yang buruk";
    let (status, body) = post_predict(classifier(), json!({ "text": text })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_class"], "negatif");
}

#[actix_web::test]
async fn test_predict_unseen_text_is_still_classified() {
    init();
    for text in ["", "kata yang tidak dikenal sama sekali", "12345 !!!"] {
        let (status, body) = post_predict(classifier(), json!({ "text": text })).await;
        assert_eq!(status, StatusCode::OK, "text: {:?}", text);
        let class = body["predicted_class"].as_str().unwrap_or_default();
        assert!(CLASSES.contains(&class));
    }
}

#[actix_web::test]
async fn test_predict_invalid_input() {
    init();
    let (status, body) = post_predict(classifier(), json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, _) = post_predict(classifier(), json!({"text": 42})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = post_predict(classifier(), json!({"text": null})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_predict_malformed_body() {
    init();
    let app = app!(classifier());
    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"text\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_predict_long_text_above_default_json_limit() {
    init();
    // ~2.6 MB, above actix-web's 2 MiB default but well inside our limit
    let text = "standar saja ".repeat(200_000);
    assert!(text.len() > 2 * 1024 * 1024);
    assert!(text.len() < MAX_PAYLOAD_BYTES);

    let (status, body) = post_predict(classifier(), json!({ "text": text })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_class"], "netral");
}

#[actix_web::test]
async fn test_predict_oversized_body() {
    init();
    let text = "a".repeat(MAX_PAYLOAD_BYTES + 1);
    let (status, body) = post_predict(classifier(), json!({ "text": text })).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["detail"].is_string());
}

#[actix_web::test]
async fn test_predict_is_idempotent() {
    init();
    let app = app!(classifier());
    let mut responses = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(json!({"text": "produk ini biasa saja"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        responses.push(body);
    }
    assert_eq!(responses[0]["predicted_class"], responses[1]["predicted_class"]);
    assert_eq!(responses[0]["confidence"], responses[1]["confidence"]);
}

#[actix_web::test]
async fn test_predict_internal_error() {
    init();
    let trained = classifier();
    let other = TfIdfVectorizer::fit(&["kosakata yang sama sekali berbeda"]).expect("fits");
    let mismatched = Classifier::from_parts(
        trained.labels().to_vec(),
        trained.class_descriptions().clone(),
        Arc::new(other),
        Arc::clone(trained.model()),
    )
    .expect("label count matches");

    let app = app!(mismatched);
    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(json!({"text": "standar saja"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.detail.starts_with("Prediction error:"), "detail: {}", body.detail);
}

#[actix_web::test]
async fn test_info() {
    init();
    let trained = classifier();
    let fingerprint = trained.vectorizer().fingerprint();
    let app = app!(trained);
    let req = test::TestRequest::get().uri("/info").to_request();
    let info: InfoResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(info.title, server::TITLE);
    assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(info.fingerprint, fingerprint);
    let labels: Vec<&str> = info.classes.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, CLASSES);
    assert_eq!(info.classes[2].index, 2);
}

#[actix_web::test]
async fn test_unknown_route() {
    init();
    let app = app!(classifier());
    let req = test::TestRequest::get().uri("/predict").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}
