//! The two crews behind the LLM-backed chat endpoints.
//!
//! - The research crew turns an arbitrary question into a formatted answer
//!   (researcher, then formatter).
//! - The advisor crew answers course questions from website context and the
//!   matched curriculum entries (course expert, pricing assistant, summary).

use crate::{
    crew::{Agent, Crew, Task, TaskOutput},
    curriculum::Course,
    llm_client::LLMClient,
};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::instrument;

pub const RESEARCH_TEMPERATURE: f32 = 0.6;
pub const ADVISOR_TEMPERATURE: f32 = 0.4;
pub const ADVISOR_TITLE: &str = "🎓 SkillCapital Smart Assistant";

const NOT_AVAILABLE: &str = "N/A";

pub fn research_crew(query: &str) -> Result<Crew> {
    let researcher = Agent::new(
        "AI Researcher",
        "Collect accurate and concise research data",
        "Expert in fact-checking and deep research.",
    );
    let explainer = Agent::new(
        "Insight Generator",
        "Summarize and format data into bullet points with markdown and emojis",
        "Specialist in transforming technical info into engaging summaries.",
    );

    Crew::new(
        vec![
            Task::new(
                format!("Research this question thoroughly: '{}'", query),
                "Bullet points with facts, examples, and clarity",
                researcher,
            ),
            Task::new(
                format!(
                    "Use the above research to create a concise, markdown-formatted response with bullet points and emojis for: '{}'",
                    query
                ),
                "• Use bullet points\n• Make it markdown formatted\n• Include emojis to highlight key facts\n• Focus on clarity and engagement",
                explainer,
            )
            .with_context(vec![0]),
        ],
        RESEARCH_TEMPERATURE,
    )
}

/// Runs the research crew and returns the formatter's answer.
#[instrument(skip(llm))]
pub async fn run_research(llm: &dyn LLMClient, query: &str) -> Result<String> {
    let outputs = research_crew(query)?.kickoff(llm).await?;
    let last = outputs.last().context("Research crew produced no output")?;
    Ok(last.output.clone())
}

pub fn advisor_crew(question: &str, context: &str, courses_json: &str) -> Result<Crew> {
    let course_expert = Agent::new(
        "Course Expert",
        "Provide clear and structured answers about SkillCapital's course content and structure",
        "Expert in educational program design and technical upskilling paths",
    );
    let pricing_assistant = Agent::new(
        "Pricing Assistant",
        "Help users understand SkillCapital's pricing, value, and affordability",
        "Specialist in explaining course pricing models and offers in detail",
    );
    let summary_generator = Agent::new(
        "Summary Generator",
        "Generate a final natural-language response combining course and pricing responses",
        "Expert in user communication and formatting answers for conversational delivery",
    );

    Crew::new(
        vec![
            Task::new(
                format!(
                    "You are the Course Expert. A user asked: '{}'.\nUse this context to answer with course insights:\n{}",
                    question, context
                ),
                "Explain course content, modules, duration, and outcomes.",
                course_expert,
            ),
            Task::new(
                format!(
                    "You are the Pricing Assistant. A user asked: '{}'.\nUse this context to explain pricing, payment plans, or say 'No pricing info needed.' if irrelevant:\n{}",
                    question, context
                ),
                "Give clear pricing, offers, or respond 'not requested'.",
                pricing_assistant,
            ),
            Task::new(
                format!(
                    "You are the Summary Generator. Combine the answers from Course Expert and Pricing Assistant to create a final response.\n\nUse this course data:\n{}\n\nEnsure the response is warm, friendly, and includes both course and pricing insights for: \"{}\".",
                    courses_json, question
                ),
                "Single final summary combining course + pricing info.",
                summary_generator,
            )
            .with_context(vec![0, 1]),
        ],
        ADVISOR_TEMPERATURE,
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseSummary {
    pub name: String,
    pub duration: String,
    pub modules: Vec<String>,
    pub outcome: String,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            name: course.name.clone(),
            duration: course
                .duration
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            modules: course.module_names().into_iter().map(String::from).collect(),
            outcome: course
                .outcome
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentResponse {
    pub agent: String,
    pub response: String,
}

/// The structured answer of the advisor crew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisorReport {
    pub title: String,
    pub question: String,
    pub matched_courses: Vec<CourseSummary>,
    pub agents: Vec<AgentResponse>,
    pub final_summary: String,
}

fn output_or(outputs: &[TaskOutput], index: usize, fallback: &str) -> String {
    outputs
        .get(index)
        .map(|o| o.output.as_str())
        .filter(|o| !o.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

impl AdvisorReport {
    fn from_outputs(question: &str, matched: &[Course], outputs: &[TaskOutput]) -> Self {
        let agents = [
            ("Course Expert", "No course expert output."),
            ("Pricing Assistant", "No pricing output."),
            ("Summary Generator", "No summary output."),
        ]
        .iter()
        .enumerate()
        .map(|(i, (agent, fallback))| AgentResponse {
            agent: agent.to_string(),
            response: output_or(outputs, i, fallback),
        })
        .collect();

        Self {
            title: ADVISOR_TITLE.to_string(),
            question: question.to_string(),
            matched_courses: matched.iter().map(CourseSummary::from).collect(),
            agents,
            final_summary: output_or(outputs, 2, "Summary not available."),
        }
    }
}

/// Runs the advisor crew over the website context and the matched courses.
#[instrument(skip(llm, site_context, matched), fields(courses = matched.len()))]
pub async fn run_advisor(
    llm: &dyn LLMClient,
    question: &str,
    site_context: &str,
    matched: &[Course],
) -> Result<AdvisorReport> {
    let courses_json = serde_json::to_string_pretty(matched)?;
    let context = format!("{}\n\nRelevant Courses:\n{}", site_context, courses_json);

    let outputs = advisor_crew(question, &context, &courses_json)?
        .kickoff(llm)
        .await?;

    Ok(AdvisorReport::from_outputs(question, matched, &outputs))
}
