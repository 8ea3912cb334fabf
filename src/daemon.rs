use std::future::Future;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::config::ConfigSource;
use crate::error::TutorError;
use crate::interfaces::providers::ChatMessage;
use crate::providers::GroqClient;
use crate::services::TutorService;
use crate::Result;

#[derive(Clone)]
pub struct AppState {
    pub token: String,
    pub config: ConfigSource,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Deserialize)]
struct TutorRequest {
    message: Option<String>,
    #[serde(default)]
    history: Option<Value>,
}

#[derive(Serialize)]
struct TutorResponse {
    success: bool,
    reply: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tutor", post(tutor_chat))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("LEARNSPHERE_GIT_SHA").to_string(),
    })
}

async fn tutor_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<TutorRequest>,
) -> impl IntoResponse {
    if let Err(err) = authorize(&headers, &state.token) {
        return err.into_response();
    }

    let message = match payload.message.as_deref().map(str::trim) {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => {
            return error_response(TutorError::InvalidInput(
                "Message is required".to_string(),
            ))
            .into_response();
        }
    };

    let history = match parse_history(payload.history) {
        Ok(history) => history,
        Err(err) => return error_response(err).into_response(),
    };

    debug!(
        message_len = message.len(),
        history_len = history.len(),
        "tutor request accepted"
    );

    let config = match state.config.resolve() {
        Ok(config) => config,
        Err(err) => return error_response(err).into_response(),
    };

    let service = TutorService::new(GroqClient::new(config));
    match service.chat(&message, &history, None).await {
        Ok(reply) => (
            StatusCode::OK,
            Json(TutorResponse {
                success: true,
                reply,
            }),
        )
            .into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// The caller's history must be an ordered sequence of `{role, content}`
/// turns. Anything else (scalar, object, malformed entries) is a 400.
fn parse_history(history: Option<Value>) -> Result<Vec<ChatMessage>> {
    let Some(history) = history else {
        return Ok(Vec::new());
    };
    if !history.is_array() {
        return Err(TutorError::InvalidInput(
            "History must be an array".to_string(),
        ));
    }
    serde_json::from_value(history)
        .map_err(|_| TutorError::InvalidInput("History must be an array".to_string()))
}

fn error_response(err: TutorError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = match &err {
        TutorError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message.clone()),
        TutorError::EmptyMessage => (StatusCode::BAD_REQUEST, "Message is required".to_string()),
        TutorError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, err.to_string()),
        TutorError::Network(_) | TutorError::Provider { .. } => {
            error!(error = %err, "upstream provider failure");
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
        TutorError::Unauthorized | TutorError::Config(_) => {
            // Operator-fixable, not caller-fixable; keep details out of the body.
            error!(error = %err, "tutor misconfiguration");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The tutor is not available right now".to_string(),
            )
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };
    (status, Json(ErrorResponse { message }))
}

fn authorize(
    headers: &HeaderMap,
    token: &str,
) -> std::result::Result<(), (StatusCode, Json<ErrorResponse>)> {
    let expected_token = token.trim();
    if expected_token.is_empty() {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                message: "Unauthorized".to_string(),
            }),
        ));
    }

    let header = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let api_key = headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let bearer = header.strip_prefix("Bearer ").unwrap_or("").trim();
    let api_key = api_key.trim();

    if bearer == expected_token || api_key == expected_token {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                message: "Unauthorized".to_string(),
            }),
        ))
    }
}

pub async fn run(host: &str, port: u16, token: &str) -> Result<()> {
    run_with_shutdown(host, port, token, futures::future::pending::<()>()).await
}

pub async fn run_with_shutdown<F>(host: &str, port: u16, token: &str, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState {
        token: token.to_string(),
        config: ConfigSource::Env,
    };
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TutorError::Service(e.to_string()))?;
    tracing::info!(%addr, "tutor daemon listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| TutorError::Service(e.to_string()))?;

    Ok(())
}
