//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the chat endpoints and the OpenAPI documentation.

use crate::{
    handlers,
    models::{
        AdvisorResponse, AgentResponseDto, ChatPayload, ChatResponse, ConversationPayload,
        ConversationResponse, CourseSummaryDto, ErrorResponse, InitializePayload,
        InitializeResponse, PingResponse, ResearchResponse, RootResponse,
    },
    state::AppState,
};

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root,
        handlers::ping,
        handlers::chat,
        handlers::research_chat,
        handlers::smart_chatbot,
        handlers::initialize,
        handlers::conversation,
        handlers::clear_conversation,
    ),
    components(
        schemas(
            RootResponse, PingResponse, ChatPayload, ChatResponse, ResearchResponse,
            AdvisorResponse, CourseSummaryDto, AgentResponseDto, InitializePayload,
            InitializeResponse, ConversationPayload, ConversationResponse, ErrorResponse
        )
    ),
    tags(
        (name = "Course Advisor API", description = "Course, pricing and enrollment assistant for SkillCapital")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/", get(handlers::root))
        .route("/ping", get(handlers::ping))
        .route("/api/chat", post(handlers::chat))
        .route("/chat", post(handlers::research_chat))
        .route("/smart-chatbot", post(handlers::smart_chatbot))
        .route("/api/initialize", post(handlers::initialize))
        .route("/api/conversation", post(handlers::conversation))
        .route("/api/conversation/{id}", delete(handlers::clear_conversation))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/apidocs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
