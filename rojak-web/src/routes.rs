use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rojak::CoachReport;
use rojak_mt::{AUDIO_MIME, Pipeline};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CoachRequest {
    pub target: String,
    pub user_input: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub input: String,
    pub translated: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyResponse {
    pub input: String,
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/translate", post(translate))
        .route("/api/reply", post(reply))
        .route("/api/tts", post(tts))
        .route("/api/coach", post(coach))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn serve_index() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        include_str!("static/index.html"),
    )
}

/// Malay → annotated Malay + English meaning. Blank text is not an error.
async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Json<TranslateResponse> {
    info!("Translating '{}'", &request.text);

    let translated = state.pipeline.translate(&request.text).await;

    Json(TranslateResponse {
        input: request.text,
        translated,
    })
}

async fn reply(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<ReplyResponse>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "No text provided"));
    }

    info!("Replying to '{}'", &request.text);
    let reply = state.pipeline.reply(&request.text).await;

    Ok(Json(ReplyResponse {
        input: request.text,
        reply,
    }))
}

async fn tts(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Response, ApiError> {
    if request.text.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "No text provided"));
    }

    let audio = state.pipeline.speak(&request.text).await.map_err(|e| {
        warn!(error = %e, "Speech synthesis failed");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Speech synthesis failed: {}", e),
        )
    })?;

    info!(bytes = audio.len(), "Synthesized '{}'", &request.text);

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, AUDIO_MIME)], audio).into_response())
}

async fn coach(Json(request): Json<CoachRequest>) -> Result<Json<CoachReport>, ApiError> {
    if request.target.trim().is_empty() || request.user_input.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Both target and user_input are required",
        ));
    }

    let report = rojak::score_pronunciation(&request.target, &request.user_input);
    info!(
        score = report.overall_score,
        success = report.success,
        "Scored attempt at '{}'",
        &report.target
    );

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use rojak::{ReverseLexicon, SlangLexicon};
    use rojak_mt::{MockMode, MockSpeech, MockTranslator, SpeechSynthesizer};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app_with_speech(speech: Arc<dyn SpeechSynthesizer>) -> Router {
        let slang = SlangLexicon::from_entries([
            ("jom", "let's"),
            ("lepak", "hang out"),
            ("kedai mamak", "Indian-Muslim eatery"),
            ("ni", "this"),
        ]);
        let reverse = ReverseLexicon::from_entries([("i", "aku"), ("want", "nak"), ("eat", "makan")]);
        let pipeline = Pipeline::new(slang, reverse, speech)
            .with_translator(Arc::new(MockTranslator::new(MockMode::NoOp)));

        router(AppState::new(pipeline), Path::new("/nonexistent"))
    }

    fn app() -> Router {
        app_with_speech(Arc::new(MockSpeech::with_bytes(vec![0xFF, 0xFB, 0x90])))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>, Option<String>) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, bytes.to_vec(), content_type)
    }

    fn as_json(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    // ========== Translate Tests ==========

    #[tokio::test]
    async fn test_translate_idiom() {
        let (status, body, _) =
            post_json(app(), "/api/translate", json!({"text": "Jom lepak kedai mamak ni!"})).await;

        assert_eq!(status, StatusCode::OK);
        let body = as_json(&body);
        assert_eq!(body["input"], "Jom lepak kedai mamak ni!");
        let translated = body["translated"].as_str().unwrap();
        assert!(translated.starts_with("Jom(let's) lepak(hang out)"));
        assert!(translated.ends_with("\n\nLet's hang out at a Mamak shop!"));
    }

    #[tokio::test]
    async fn test_translate_blank_is_empty() {
        for body in [json!({"text": "   "}), json!({})] {
            let (status, body, _) = post_json(app(), "/api/translate", body).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(as_json(&body)["translated"], "");
        }
    }

    #[tokio::test]
    async fn test_translate_malformed_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/translate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }

    // ========== Reply Tests ==========

    #[tokio::test]
    async fn test_reply_substitutes_known_words() {
        let (status, body, _) = post_json(app(), "/api/reply", json!({"text": "I want eat pizza"})).await;

        assert_eq!(status, StatusCode::OK);
        let body = as_json(&body);
        assert_eq!(body["input"], "I want eat pizza");
        assert_eq!(body["reply"], "aku nak makan pizza");
    }

    #[tokio::test]
    async fn test_reply_blank_rejected() {
        let (status, body, _) = post_json(app(), "/api/reply", json!({"text": ""})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(as_json(&body)["error"].is_string());
    }

    // ========== TTS Tests ==========

    #[tokio::test]
    async fn test_tts_returns_audio() {
        let (status, body, content_type) =
            post_json(app(), "/api/tts", json!({"text": "Selamat pagi"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("audio/mpeg"));
        assert_eq!(body, vec![0xFF, 0xFB, 0x90]);
    }

    #[tokio::test]
    async fn test_tts_blank_rejected() {
        let (status, _, _) = post_json(app(), "/api/tts", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_tts_failure_is_server_error() {
        let app = app_with_speech(Arc::new(MockSpeech::failing("engine offline")));
        let (status, body, _) = post_json(app, "/api/tts", json!({"text": "hai"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let error = as_json(&body)["error"].as_str().unwrap().to_string();
        assert!(error.contains("engine offline"));
    }

    // ========== Coach Tests ==========

    #[tokio::test]
    async fn test_coach_exact_match() {
        let (status, body, _) = post_json(
            app(),
            "/api/coach",
            json!({"target": "Selamat pagi", "user_input": "selamat  pagi."}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body = as_json(&body);
        assert_eq!(body["overall_score"], 100);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "✅ Good pronunciation!");
    }

    #[tokio::test]
    async fn test_coach_miss() {
        let (_, body, _) = post_json(
            app(),
            "/api/coach",
            json!({"target": "Selamat pagi", "user_input": "terima kasih"}),
        )
        .await;

        let body = as_json(&body);
        assert_eq!(body["success"], false);
        assert!(body["overall_score"].as_u64().unwrap() < 85);
    }

    #[tokio::test]
    async fn test_coach_echoes_trimmed_inputs() {
        let (_, body, _) = post_json(
            app(),
            "/api/coach",
            json!({"target": "  Selamat pagi ", "user_input": "slamat pag\n"}),
        )
        .await;

        let body = as_json(&body);
        assert_eq!(body["target"], "Selamat pagi");
        assert_eq!(body["user_input"], "slamat pag");
        assert_eq!(body["overall_score"], 90);
    }

    #[tokio::test]
    async fn test_coach_missing_field() {
        let (status, _, _) =
            post_json(app(), "/api/coach", json!({"target": "Selamat pagi"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // ========== Page Tests ==========

    #[tokio::test]
    async fn test_index_page() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("<html"));
    }
}
