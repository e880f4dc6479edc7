//! Router-level tests for the health and transcription endpoints.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lorikeet_asr::{Hypothesis, ModelOutput, Recognizer, TdtRecognizer, TokenSpan, audio};
use lorikeet_server::lifecycle::{self, Lifecycle, ModelState};
use lorikeet_server::routes::router;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

/// Test stand-in for the ONNX recognizer.
enum FakeRecognizer {
    /// Reports the sample count of each input file
    Echo,
    /// Returns the same output for every call
    Fixed(ModelOutput),
    /// Fails every call
    Broken,
}

impl Recognizer for FakeRecognizer {
    fn transcribe_files(&mut self, paths: &[&Path]) -> lorikeet_asr::Result<ModelOutput> {
        match self {
            FakeRecognizer::Echo => {
                let mut hypotheses = Vec::new();
                for path in paths {
                    let samples = audio::read_mono(path)?;
                    hypotheses.push(Hypothesis::Bare(format!("samples:{}", samples.len())));
                }
                Ok(ModelOutput::Hypotheses(hypotheses))
            }
            FakeRecognizer::Fixed(output) => Ok(output.clone()),
            FakeRecognizer::Broken => {
                Err(lorikeet_asr::error::AudioError::InvalidChannels(6).into())
            }
        }
    }
}

fn ready_app(fake: FakeRecognizer) -> Router {
    let lifecycle = Arc::new(Lifecycle::new());
    lifecycle.ready(fake);
    router(lifecycle)
}

fn encode_samples(samples: &[f32]) -> String {
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    STANDARD.encode(bytes)
}

async fn get_health(app: Router) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_transcribe(app: Router, audio_b64: &str) -> (StatusCode, serde_json::Value) {
    let body = serde_json::json!({ "audio": audio_b64 }).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/transcribe")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_loading_before_the_model_arrives() {
    let lifecycle: Arc<Lifecycle<FakeRecognizer>> = Arc::new(Lifecycle::new());

    let (status, body) = get_health(router(lifecycle)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "loading");
}

#[tokio::test]
async fn health_reports_ready_after_load() {
    let app = ready_app(FakeRecognizer::Echo);

    let (status, body) = get_health(app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn transcribe_while_loading_is_service_unavailable() {
    let lifecycle: Arc<Lifecycle<FakeRecognizer>> = Arc::new(Lifecycle::new());

    let (status, body) = post_transcribe(router(lifecycle), &encode_samples(&[0.0])).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "model not ready: loading");
}

#[tokio::test]
async fn missing_model_dir_reports_error_and_rejects_requests() {
    let lifecycle: Arc<Lifecycle<TdtRecognizer>> = Arc::new(Lifecycle::new());
    let dir = std::env::temp_dir().join("lorikeet-http-missing-model");

    lifecycle::load_from_dir(&lifecycle, &dir);
    assert!(matches!(lifecycle.state(), ModelState::Error(_)));

    let app = router(Arc::clone(&lifecycle));
    let (status, body) = get_health(app.clone()).await;

    assert_eq!(status, StatusCode::OK);
    let health = body["status"].as_str().unwrap();
    assert!(health.starts_with("error: model not found at "), "got {health}");

    let (status, body) = post_transcribe(app, &encode_samples(&[0.0])).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("model not ready: error:")
    );
}

#[tokio::test]
async fn transcribe_returns_text_for_a_valid_payload() {
    let app = ready_app(FakeRecognizer::Echo);
    let silence = vec![0.0f32; 160];

    let (status, body) = post_transcribe(app, &encode_samples(&silence)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "samples:160");
}

#[tokio::test]
async fn response_text_is_trimmed() {
    let app = ready_app(FakeRecognizer::Fixed(ModelOutput::Hypotheses(vec![
        Hypothesis::Bare("  hello world \n".into()),
    ])));

    let (status, body) = post_transcribe(app, &encode_samples(&[0.0])).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "hello world");
}

#[tokio::test]
async fn timed_pair_output_is_normalized_to_first_hypothesis() {
    let output = ModelOutput::WithTimings {
        hypotheses: vec![
            Hypothesis::Scored {
                text: "first".into(),
                score: 1.5,
            },
            Hypothesis::Bare("second".into()),
        ],
        timings: vec![vec![TokenSpan {
            text: "first".into(),
            start: 0.0,
            end: 0.2,
        }]],
    };
    let app = ready_app(FakeRecognizer::Fixed(output));

    let (status, body) = post_transcribe(app, &encode_samples(&[0.0])).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "first");
}

#[tokio::test]
async fn empty_hypothesis_list_yields_empty_text() {
    let app = ready_app(FakeRecognizer::Fixed(ModelOutput::Hypotheses(vec![])));

    let (status, body) = post_transcribe(app, &encode_samples(&[0.0])).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "");
}

#[tokio::test]
async fn invalid_base64_is_an_internal_error() {
    let app = ready_app(FakeRecognizer::Echo);

    let (status, body) = post_transcribe(app, "!!!not-base64!!!").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("base64"));
}

#[tokio::test]
async fn partial_trailing_sample_is_dropped_not_fatal() {
    let app = ready_app(FakeRecognizer::Echo);

    // two full samples plus a two-byte remainder
    let mut bytes: Vec<u8> = [0.5f32, -0.5].iter().flat_map(|s| s.to_le_bytes()).collect();
    bytes.extend([0x01, 0x02]);

    let (status, body) = post_transcribe(app, &STANDARD.encode(bytes)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "samples:2");
}

#[tokio::test]
async fn recognizer_failure_is_an_internal_error() {
    let app = ready_app(FakeRecognizer::Broken);

    let (status, body) = post_transcribe(app, &encode_samples(&[0.0])).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("channel count"));
}

#[tokio::test]
async fn concurrent_requests_keep_their_own_audio() {
    let app = ready_app(FakeRecognizer::Echo);

    let short = encode_samples(&vec![0.1f32; 100]);
    let long = encode_samples(&vec![0.2f32; 500]);

    let (a, b) = tokio::join!(
        post_transcribe(app.clone(), &short),
        post_transcribe(app.clone(), &long),
    );

    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);
    assert_eq!(a.1["text"], "samples:100");
    assert_eq!(b.1["text"], "samples:500");
}

#[tokio::test]
async fn health_stays_ready_across_requests() {
    let app = ready_app(FakeRecognizer::Echo);

    for _ in 0..3 {
        let (_, body) = get_health(app.clone()).await;
        assert_eq!(body["status"], "ready");

        let (status, _) = post_transcribe(app.clone(), &encode_samples(&[0.0])).await;
        assert_eq!(status, StatusCode::OK);
    }
}
