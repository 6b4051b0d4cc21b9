//! Axum Handlers for the REST API
//!
//! Each chat surface is a thin adapter over `advisor-core`. The handlers use
//! `utoipa` doc comments to generate the OpenAPI documentation.

use advisor_core::{
    llm_client::ChatRole,
    matcher::match_courses,
    pipelines::{run_advisor, run_research},
};
use axum::{
    extract::{ConnectInfo, Path, State},
    http::{Extensions, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    models::{
        AdvisorResponse, ChatPayload, ChatResponse, ConversationPayload, ConversationResponse,
        ErrorResponse, InitializePayload, InitializeResponse, PingResponse, ResearchResponse,
        RootResponse,
    },
    state::AppState,
};

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const SLOW_DOWN: &str = "Please wait a few seconds.";
pub const CONVERSATION_FAILED: &str = "Something went wrong while fetching response.";
pub const INTERNAL_ERROR: &str =
    "Sorry, something went wrong. Please visit https://www.skillcapital.ai for course information.";

pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    TooManyRequests(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
            ApiError::TooManyRequests(message) => {
                (StatusCode::TOO_MANY_REQUESTS, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = INTERNAL_ERROR.to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

/// Rejects blank messages before anything downstream runs.
fn require_message(message: &str) -> Result<&str, ApiError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest(MESSAGE_REQUIRED.to_string()));
    }
    Ok(message)
}

/// Rate-limiter key for the peer, when the server was started with connect info.
fn client_key(extensions: &Extensions) -> String {
    match extensions.get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => format!("client:{}", addr.ip()),
        None => "client:unknown".to_string(),
    }
}

/// Describe the service.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service description", body = RootResponse))
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "SkillCapital course advisor is running.".to_string(),
        usage: "POST /api/chat with {\"message\": \"...\"}".to_string(),
        docs: "/apidocs".to_string(),
    })
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/ping",
    responses((status = 200, description = "Service is alive", body = PingResponse))
)]
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
    })
}

/// Answer a question with the deterministic keyword pipeline.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatPayload,
    responses(
        (status = 200, description = "Canned or curriculum answer", body = ChatResponse),
        (status = 400, description = "Empty message", body = ErrorResponse)
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = require_message(&payload.message)?;

    let profile = match payload.session_id {
        Some(id) => state.sessions.get(id).await.map(|ctx| ctx.profile),
        None => None,
    };
    let user_name = profile.as_ref().and_then(|p| p.display_name());

    let reply = state.assistant.reply(message, user_name).await;
    Ok(Json(ChatResponse {
        response: reply.response,
        intent: reply.intent.label().to_string(),
    }))
}

/// Answer any question with the research crew.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatPayload,
    responses(
        (status = 200, description = "Formatted research answer", body = ResearchResponse),
        (status = 400, description = "Empty message", body = ErrorResponse),
        (status = 500, description = "The LLM call failed", body = ErrorResponse)
    )
)]
pub async fn research_chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<ResearchResponse>, ApiError> {
    let message = require_message(&payload.message)?;
    let response = run_research(state.llm_client.as_ref(), message).await?;
    Ok(Json(ResearchResponse { response }))
}

/// Answer a course question with the advisor crew, grounded in the website and curriculum.
#[utoipa::path(
    post,
    path = "/smart-chatbot",
    request_body = ChatPayload,
    responses(
        (status = 200, description = "Structured advisor report", body = AdvisorResponse),
        (status = 400, description = "Empty message", body = ErrorResponse),
        (status = 500, description = "The LLM call failed", body = ErrorResponse)
    )
)]
pub async fn smart_chatbot(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<AdvisorResponse>, ApiError> {
    let question = require_message(&payload.message)?;

    let (site_context, curriculum) =
        tokio::join!(state.website.site_context(), state.assistant.store().load());
    let matched = match_courses(
        &question.to_lowercase(),
        &curriculum,
        state.assistant.config().lexicon.match_mode,
    );
    info!(
        courses = matched.courses.len(),
        filtered = matched.filtered,
        "Running advisor crew"
    );

    let report = run_advisor(
        state.llm_client.as_ref(),
        question,
        &site_context,
        &matched.courses,
    )
    .await?;
    Ok(Json(report.into()))
}

/// Start or continue collecting the user's name, email and phone.
#[utoipa::path(
    post,
    path = "/api/initialize",
    request_body = InitializePayload,
    responses(
        (status = 200, description = "Next prompt, validation error or welcome", body = InitializeResponse)
    )
)]
pub async fn initialize(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InitializePayload>,
) -> Result<Json<InitializeResponse>, ApiError> {
    let session_id = state.sessions.ensure(payload.session_id).await;
    let answer = payload.answer.as_deref();

    let step = state
        .sessions
        .update(session_id, |ctx| ctx.profile.advance(answer))
        .await
        .ok_or_else(|| anyhow::anyhow!("Session {} vanished during initialization", session_id))?;

    Ok(Json(InitializeResponse::from_step(session_id, step)))
}

/// Continue a free-form LLM conversation, throttled per session.
#[utoipa::path(
    post,
    path = "/api/conversation",
    request_body = ConversationPayload,
    responses(
        (status = 200, description = "Assistant reply", body = ConversationResponse),
        (status = 400, description = "Empty message", body = ErrorResponse),
        (status = 429, description = "Messages sent too quickly", body = ErrorResponse)
    )
)]
pub async fn conversation(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
    Json(payload): Json<ConversationPayload>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let message = require_message(&payload.message)?.to_string();

    // Requests without a known session are limited per client address.
    let known = match payload.session_id {
        Some(id) => state.sessions.get(id).await.is_some(),
        None => false,
    };
    if !known {
        let client = client_key(&extensions);
        if !state.rate_limiter.lock().await.check(&client) {
            warn!(%client, "Conversation rate limit hit for new session");
            return Err(ApiError::TooManyRequests(SLOW_DOWN.to_string()));
        }
    }

    let session_id = state.sessions.ensure(payload.session_id).await;
    if !state
        .rate_limiter
        .lock()
        .await
        .check(&session_id.to_string())
    {
        warn!(%session_id, "Conversation rate limit hit");
        return Err(ApiError::TooManyRequests(SLOW_DOWN.to_string()));
    }

    let messages = state
        .sessions
        .update(session_id, |ctx| {
            ctx.push(ChatRole::User, message);
            ctx.messages()
        })
        .await
        .unwrap_or_default();

    let response = match state
        .llm_client
        .complete(messages, state.chat_temperature)
        .await
    {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            error!(%session_id, error = ?e, "Conversation completion failed");
            CONVERSATION_FAILED.to_string()
        }
    };

    state
        .sessions
        .update(session_id, |ctx| ctx.push(ChatRole::Assistant, response.clone()))
        .await;

    Ok(Json(ConversationResponse {
        session_id,
        response,
    }))
}

/// Clear a session's conversation history ("New Chat"). The profile is kept.
#[utoipa::path(
    delete,
    path = "/api/conversation/{id}",
    responses(
        (status = 204, description = "History cleared"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Session ID"))
)]
pub async fn clear_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .sessions
        .update(id, |ctx| ctx.history.clear())
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session with id '{}' not found", id)))?;

    Ok(StatusCode::NO_CONTENT)
}
