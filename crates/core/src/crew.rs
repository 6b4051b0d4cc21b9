//! Sequential Agent Crews
//!
//! A crew is a fixed list of tasks, each owned by an agent persona, executed
//! strictly in order against a single LLM. A task may name earlier tasks as
//! context, in which case their outputs are appended to its prompt. There is no
//! delegation, no branching and no retry: the first failing task aborts the run.

use crate::llm_client::{ChatMessage, LLMClient};
use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// A persona that performs tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
        }
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    pub expected_output: String,
    pub agent: Agent,
    /// Indices of earlier tasks whose outputs feed this one.
    pub context: Vec<usize>,
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: Agent,
    ) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: Vec<usize>) -> Self {
        self.context = context;
        self
    }

    fn user_prompt(&self, context: &[&TaskOutput]) -> String {
        let mut prompt = format!(
            "{}\n\nThis is the expected criteria for your final answer: {}",
            self.description, self.expected_output
        );
        if !context.is_empty() {
            let joined = context
                .iter()
                .map(|out| format!("{}:\n{}", out.role, out.output))
                .collect::<Vec<_>>()
                .join("\n\n");
            prompt.push_str("\n\nThis is the context you're working with:\n");
            prompt.push_str(&joined);
        }
        prompt
    }
}

/// What one agent produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutput {
    pub role: String,
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct Crew {
    tasks: Vec<Task>,
    temperature: f32,
}

impl Crew {
    /// Creates a crew, rejecting context references that do not point backwards.
    pub fn new(tasks: Vec<Task>, temperature: f32) -> Result<Self> {
        for (i, task) in tasks.iter().enumerate() {
            if let Some(bad) = task.context.iter().find(|&&c| c >= i) {
                bail!("Task {} cannot use task {} as context", i, bad);
            }
        }
        Ok(Self { tasks, temperature })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Runs every task in order and returns their outputs in the same order.
    #[instrument(name = "crew", skip_all, fields(tasks = self.tasks.len()))]
    pub async fn kickoff(&self, llm: &dyn LLMClient) -> Result<Vec<TaskOutput>> {
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());

        for task in &self.tasks {
            let context: Vec<&TaskOutput> = task.context.iter().map(|&i| &outputs[i]).collect();
            let messages = vec![
                ChatMessage::system(task.agent.system_prompt()),
                ChatMessage::user(task.user_prompt(&context)),
            ];

            info!(agent = %task.agent.role, "Running crew task");
            let output = llm
                .complete(messages, self.temperature)
                .await
                .with_context(|| format!("Agent '{}' failed", task.agent.role))?;
            debug!(agent = %task.agent.role, %output, "Crew task finished");

            outputs.push(TaskOutput {
                role: task.agent.role.clone(),
                output: output.trim().to_string(),
            });
        }

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{ChatRole, MockLLMClient};
    use anyhow::anyhow;
    use mockall::Sequence;

    fn agent(role: &str) -> Agent {
        Agent::new(role, format!("{} goal", role), format!("{} backstory", role))
    }

    #[test]
    fn test_forward_context_is_rejected() {
        let tasks = vec![Task::new("a", "x", agent("A")).with_context(vec![0])];
        assert!(Crew::new(tasks, 0.5).is_err());
    }

    #[tokio::test]
    async fn test_tasks_run_in_order_with_context() {
        let mut llm = MockLLMClient::new();
        let mut seq = Sequence::new();

        llm.expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|messages, temperature| {
                messages.len() == 2
                    && messages[0].role == ChatRole::System
                    && messages[0].content.contains("You are Researcher.")
                    && !messages[1].content.contains("context you're working with")
                    && (*temperature - 0.6).abs() < f32::EPSILON
            })
            .returning(|_, _| Ok("  facts  ".to_string()));

        llm.expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|messages, _| {
                messages[1].content.contains("Format it")
                    && messages[1].content.contains("Researcher:\nfacts")
            })
            .returning(|_, _| Ok("• facts".to_string()));

        let crew = Crew::new(
            vec![
                Task::new("Research it", "facts", agent("Researcher")),
                Task::new("Format it", "bullets", agent("Formatter")).with_context(vec![0]),
            ],
            0.6,
        )
        .unwrap();

        let outputs = crew.kickoff(&llm).await.unwrap();
        assert_eq!(
            outputs,
            vec![
                TaskOutput {
                    role: "Researcher".to_string(),
                    output: "facts".to_string()
                },
                TaskOutput {
                    role: "Formatter".to_string(),
                    output: "• facts".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_stops_the_crew() {
        let mut llm = MockLLMClient::new();
        llm.expect_complete()
            .times(1)
            .returning(|_, _| Err(anyhow!("connection refused")));

        let crew = Crew::new(
            vec![
                Task::new("one", "x", agent("First")),
                Task::new("two", "y", agent("Second")),
            ],
            0.4,
        )
        .unwrap();

        let err = crew.kickoff(&llm).await.unwrap_err();
        assert!(err.to_string().contains("Agent 'First' failed"));
    }
}
