//! API Models
//!
//! Request and response bodies of the HTTP surface. Every type derives
//! `ToSchema` so the OpenAPI document is generated from the same definitions.

use advisor_core::{
    pipelines::{AdvisorReport, AgentResponse, CourseSummary},
    profile::ProfileStep,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, ToSchema, Debug)]
pub struct RootResponse {
    pub message: String,
    pub usage: String,
    pub docs: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct PingResponse {
    #[schema(example = "ok")]
    pub status: String,
}

/// A chat message. A missing `message` is treated like an empty one.
#[derive(Deserialize, ToSchema, Debug)]
pub struct ChatPayload {
    #[serde(default)]
    #[schema(example = "What modules does the python course have?")]
    pub message: String,
    /// Personalises greetings with the session's profile name.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub session_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct ChatResponse {
    pub response: String,
    #[schema(example = "curriculum_detail")]
    pub intent: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct ResearchResponse {
    pub response: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct CourseSummaryDto {
    pub name: String,
    pub duration: String,
    pub modules: Vec<String>,
    pub outcome: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct AgentResponseDto {
    #[schema(example = "Course Expert")]
    pub agent: String,
    pub response: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct AdvisorResponse {
    pub title: String,
    pub question: String,
    pub matched_courses: Vec<CourseSummaryDto>,
    pub agents: Vec<AgentResponseDto>,
    pub final_summary: String,
}

impl From<CourseSummary> for CourseSummaryDto {
    fn from(c: CourseSummary) -> Self {
        Self {
            name: c.name,
            duration: c.duration,
            modules: c.modules,
            outcome: c.outcome,
        }
    }
}

impl From<AgentResponse> for AgentResponseDto {
    fn from(a: AgentResponse) -> Self {
        Self {
            agent: a.agent,
            response: a.response,
        }
    }
}

impl From<AdvisorReport> for AdvisorResponse {
    fn from(report: AdvisorReport) -> Self {
        Self {
            title: report.title,
            question: report.question,
            matched_courses: report.matched_courses.into_iter().map(Into::into).collect(),
            agents: report.agents.into_iter().map(Into::into).collect(),
            final_summary: report.final_summary,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug, Default)]
pub struct InitializePayload {
    /// Omit to start a new session.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub session_id: Option<Uuid>,
    /// The answer to the previously returned prompt.
    pub answer: Option<String>,
}

/// One step of the profile-collection flow.
#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct InitializeResponse {
    #[schema(value_type = String, format = Uuid)]
    pub session_id: Uuid,
    pub complete: bool,
    /// The question to ask next, while the profile is incomplete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Why the last answer was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome: Option<String>,
}

impl InitializeResponse {
    pub fn from_step(session_id: Uuid, step: ProfileStep) -> Self {
        let mut response = Self {
            session_id,
            complete: false,
            prompt: None,
            error: None,
            welcome: None,
        };
        match step {
            ProfileStep::Ask(field) => response.prompt = Some(field.prompt().to_string()),
            ProfileStep::Retry { field, error } => {
                response.prompt = Some(field.prompt().to_string());
                response.error = Some(error.to_string());
            }
            ProfileStep::Complete { welcome } => {
                response.complete = true;
                response.welcome = Some(welcome);
            }
        }
        response
    }
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct ConversationPayload {
    #[schema(value_type = Option<String>, format = Uuid)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct ConversationResponse {
    #[schema(value_type = String, format = Uuid)]
    pub session_id: Uuid,
    pub response: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub message: String,
}
