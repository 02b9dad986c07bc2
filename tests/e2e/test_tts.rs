use crate::e2e::helpers;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use helpers::{wait_until, FailingHistoryRepository, TestContext, FAKE_MP3};
use hebvoice_backend::client::TtsClient;
use hebvoice_backend::domain::history::HistoryListResponse;
use hebvoice_backend::infrastructure::repositories::{HistoryRepository, MemoryHistoryRepository};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use test_context::test_context;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_hebrew_text(ctx: &TestContext) {
    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .and(query_param("key", "test-api-key"))
        .and(body_partial_json(json!({
            "input": { "text": "שלום עולם" },
            "voice": { "languageCode": "he-IL", "name": "he-IL-Chirp3-HD-Puck" },
            "audioConfig": { "audioEncoding": "MP3", "speakingRate": 1.0 }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "audioContent": BASE64.encode(FAKE_MP3) })),
        )
        .expect(1)
        .mount(&ctx.provider)
        .await;

    let response = ctx
        .client
        .post(
            "/tts",
            &json!({ "text": "שלום עולם", "voice": "he-IL-Chirp3-HD-Puck", "speed": 1.0 }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["characterCount"], 9);

    let audio = BASE64.decode(body["audioBase64"].as_str().unwrap()).unwrap();
    assert_eq!(audio, FAKE_MP3);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_fields_without_calling_provider(ctx: &TestContext) {
    ctx.mock_provider_success().await;

    for body in [
        json!({ "text": "", "voice": "he-IL-Wavenet-A", "speed": 1.0 }),
        json!({ "text": "שלום", "speed": 1.0 }),
        json!({ "text": "שלום", "voice": "he-IL-Wavenet-A" }),
    ] {
        let response = ctx.client.post("/tts", &body).await.unwrap();
        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("Missing required fields: text, voice, speed");
    }

    assert_eq!(ctx.provider_calls().await, 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_text_over_limit(ctx: &TestContext) {
    ctx.mock_provider_success().await;

    let response = ctx
        .client
        .post(
            "/tts",
            &json!({ "text": "A".repeat(5001), "voice": "he-IL-Wavenet-A", "speed": 1.0 }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text too long. Maximum 5000 characters.");
    assert_eq!(ctx.provider_calls().await, 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_text_at_limit(ctx: &TestContext) {
    ctx.mock_provider_success().await;

    // 5000 Hebrew letters are 10000 bytes but still 5000 characters
    let response = ctx
        .client
        .post(
            "/tts",
            &json!({ "text": "א".repeat(5000), "voice": "he-IL-Wavenet-A", "speed": 1.0 }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["characterCount"], 5000);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_count_emoji_as_two_characters(ctx: &TestContext) {
    ctx.mock_provider_success().await;

    let response = ctx
        .client
        .post("/tts", &json!({ "text": "😀", "voice": "he-IL-Wavenet-A", "speed": 1.0 }))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["characterCount"], 2);

    // 2501 emoji are 5002 UTF-16 units
    let response = ctx
        .client
        .post(
            "/tts",
            &json!({ "text": "😀".repeat(2501), "voice": "he-IL-Wavenet-A", "speed": 1.0 }),
        )
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text too long. Maximum 5000 characters.");
    assert_eq!(ctx.provider_calls().await, 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_voices_and_speeds_outside_catalog(ctx: &TestContext) {
    ctx.mock_provider_success().await;

    let response = ctx
        .client
        .post("/tts", &json!({ "text": "שלום", "voice": "en-US-Wavenet-A", "speed": 1.0 }))
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = ctx
        .client
        .post("/tts", &json!({ "text": "שלום", "voice": "he-IL-Wavenet-A", "speed": 3.0 }))
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(ctx.provider_calls().await, 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json(ctx: &TestContext) {
    let response = ctx.client.post_raw("/tts", "{ not json").await.unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.body.as_ref().unwrap()["error"].is_string());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_provider_error_message(ctx: &TestContext) {
    ctx.mock_provider_error(403, "API key not valid").await;

    let response = ctx
        .client
        .post(
            "/tts",
            &json!({ "text": "שלום", "voice": "he-IL-Wavenet-A", "speed": 1.0, "userId": "u1" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("API key not valid");

    // Failed syntheses are never recorded
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(ctx.history.as_ref().unwrap().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_fallback_message_for_opaque_provider_errors(ctx: &TestContext) {
    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&ctx.provider)
        .await;

    let response = ctx
        .client
        .post("/tts", &json!({ "text": "שלום", "voice": "he-IL-Wavenet-A", "speed": 1.0 }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("TTS generation failed");
}

#[tokio::test]
async fn it_should_fail_synthesis_when_api_key_missing() {
    let history = Arc::new(MemoryHistoryRepository::new());
    let repo: Arc<dyn HistoryRepository> = history.clone();
    let ctx = TestContext::start(Some(repo), None).await;
    ctx.mock_provider_success().await;

    let response = ctx
        .client
        .post("/tts", &json!({ "text": "שלום", "voice": "he-IL-Wavenet-A", "speed": 1.0 }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Google Cloud API key not configured");
    assert_eq!(ctx.provider_calls().await, 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_record_history_for_identified_users(ctx: &TestContext) {
    ctx.mock_provider_success().await;

    let response = ctx
        .client
        .post(
            "/tts",
            &json!({
                "text": "שלום   עולם",
                "voice": "he-IL-Wavenet-B",
                "speed": 1.25,
                "userId": "u1"
            }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    let history = ctx.history.as_ref().unwrap().clone();
    assert!(wait_until(Duration::from_secs(2), || history.len() == 1).await);

    let response = ctx.client.get("/tts/history?userId=u1").await.unwrap();
    response.assert_status(StatusCode::OK);

    let listing: HistoryListResponse = response.json().unwrap();
    assert_eq!(listing.entries.len(), 1);
    assert_eq!(listing.entries[0].text, "שלום עולם");
    assert_eq!(listing.entries[0].voice_id, "he-IL-Wavenet-B");
    assert_eq!(listing.entries[0].speed, 1.25);
    assert_eq!(listing.entries[0].character_count, 11);
    assert_eq!(listing.total_characters, 11);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_record_history_for_anonymous_requests(ctx: &TestContext) {
    ctx.mock_provider_success().await;

    let response = ctx
        .client
        .post("/tts", &json!({ "text": "שלום", "voice": "he-IL-Wavenet-A", "speed": 1.0 }))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(ctx.history.as_ref().unwrap().is_empty());
}

#[tokio::test]
async fn it_should_return_audio_when_history_store_fails() {
    let repo: Arc<dyn HistoryRepository> = Arc::new(FailingHistoryRepository);
    let ctx = TestContext::start(Some(repo), Some("test-api-key")).await;
    ctx.mock_provider_success().await;

    let response = ctx
        .client
        .post(
            "/tts",
            &json!({ "text": "שלום", "voice": "he-IL-Wavenet-A", "speed": 1.0, "userId": "u1" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(
        BASE64.decode(body["audioBase64"].as_str().unwrap()).unwrap(),
        FAKE_MP3
    );

    // Nothing was stored, so the list call surfaces the store failure
    let response = ctx.client.get("/tts/history?userId=u1").await.unwrap();
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_status(ctx: &TestContext) {
    let response = ctx.client.get("/tts").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["apiConfigured"], true);

    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn it_should_report_unconfigured_status_without_api_key() {
    let ctx = TestContext::start(None, None).await;

    let response = ctx.client.get("/tts").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["apiConfigured"], false);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_voice_catalog(ctx: &TestContext) {
    let response = ctx.client.get("/tts/voices").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();

    let voices = body["voices"].as_array().unwrap();
    assert_eq!(voices.len(), 16);
    assert_eq!(voices[0]["id"], "he-IL-Chirp3-HD-Puck");
    assert!(voices.iter().all(|v| v["displayName"].is_string()));

    let speeds: Vec<f64> = body["speeds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_f64().unwrap())
        .collect();
    assert_eq!(speeds, vec![0.75, 1.0, 1.25, 1.5]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_read_status_and_catalog_through_typed_client(ctx: &TestContext) {
    let client = TtsClient::new(&ctx.base_url);

    let status = client.status().await.unwrap();
    assert_eq!(status.status, "ok");
    assert!(status.api_configured);

    let catalog = client.voices().await.unwrap();
    assert_eq!(catalog.voices.len(), 16);
    assert_eq!(catalog.voices[0].id, "he-IL-Chirp3-HD-Puck");
    assert_eq!(catalog.voices[0].display_name, "פאק - גבר (Chirp3 HD)");
    let speeds: Vec<f64> = catalog.speeds.iter().map(|s| s.id).collect();
    assert_eq!(speeds, vec![0.75, 1.0, 1.25, 1.5]);
}

#[tokio::test]
async fn it_should_report_unconfigured_status_through_typed_client() {
    let ctx = TestContext::start(None, None).await;

    let status = TtsClient::new(&ctx.base_url).status().await.unwrap();

    assert!(!status.api_configured);
}
