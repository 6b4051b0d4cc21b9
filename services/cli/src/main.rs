//! Terminal chatbot.
//!
//! Collects the user's profile with blocking prompts, then answers questions
//! with the same routing pipeline the HTTP service uses until the user says
//! goodbye or closes stdin.

use advisor_core::{
    assistant::{Assistant, AssistantConfig},
    curriculum::FileCurriculumStore,
    intent::Intent,
    profile::{ProfileStep, UserProfile},
};
use anyhow::Result;
use clap::Parser;
use std::{path::PathBuf, sync::Arc};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{Level, info};

const BANNER: &str = "Welcome to the SkillCapital AI Assistant!\n\
Ask me about our courses, curriculum, pricing, duration or enrollment.\n\
Type 'exit' or 'bye' to quit.";

#[derive(Parser, Debug)]
#[command(version, about = "SkillCapital course advisor chatbot")]
struct Args {
    /// Course curriculum JSON file
    #[arg(long, env = "CURRICULUM_PATH", default_value = "./data/course_curriculum.json")]
    curriculum: PathBuf,

    /// JSON file overriding keyword tables and canned responses
    #[arg(long, env = "ASSISTANT_PROFILE_PATH")]
    profile: Option<PathBuf>,

    /// Diagnostics are written to stderr at this level
    #[arg(long, default_value = "warn")]
    log_level: Level,
}

/// Reads one trimmed line, or `None` once input is closed.
async fn read_line<R: AsyncBufRead + Unpin>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

async fn prompt<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(format!("{} ", text).as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

async fn say<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(format!("{}\n", text).as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

/// Asks for each missing field until the answer validates.
async fn collect_profile<R, W>(input: &mut R, out: &mut W) -> Result<Option<UserProfile>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut profile = UserProfile::default();
    let mut step = profile.advance(None);
    loop {
        match step {
            ProfileStep::Ask(field) => prompt(out, field.prompt()).await?,
            ProfileStep::Retry { field, error } => {
                say(out, &error.to_string()).await?;
                prompt(out, field.prompt()).await?;
            }
            ProfileStep::Complete { welcome } => {
                say(out, &welcome).await?;
                return Ok(Some(profile));
            }
        }
        let Some(answer) = read_line(input).await? else {
            return Ok(None);
        };
        step = profile.advance(Some(&answer));
    }
}

/// Runs the whole terminal session against `input` and `out`.
async fn run<R, W>(assistant: &Assistant, input: &mut R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    say(out, BANNER).await?;
    let Some(profile) = collect_profile(input, out).await? else {
        return Ok(());
    };
    info!(name = %profile.name, "Profile collected");

    loop {
        prompt(out, "You:").await?;
        let Some(message) = read_line(input).await? else {
            return Ok(());
        };
        if message.is_empty() {
            continue;
        }

        let reply = assistant.reply(&message, profile.display_name()).await;
        say(out, &format!("Assistant: {}", reply.response)).await?;
        if reply.intent == Intent::Exit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.profile {
        Some(path) => AssistantConfig::from_file(path)?,
        None => AssistantConfig::default(),
    };
    let store = Arc::new(FileCurriculumStore::new(args.curriculum.clone()));
    let assistant = Assistant::new(config, store);
    info!(curriculum = %args.curriculum.display(), "Assistant ready");

    let mut input = BufReader::new(tokio::io::stdin());
    let mut out = tokio::io::stdout();
    run(&assistant, &mut input, &mut out).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::curriculum::{Curriculum, StaticCurriculumStore};

    fn assistant() -> Assistant {
        let curriculum = Curriculum::from_json(
            r#"{"courses": {"python": {"name": "Python", "curriculum": [
                {"module": "Python Fundamentals", "duration": "5 hours", "topics": ["Variables"]}
            ]}}}"#,
        )
        .unwrap();
        Assistant::new(
            AssistantConfig::default(),
            Arc::new(StaticCurriculumStore::new(curriculum)),
        )
    }

    async fn transcript(input: &str) -> String {
        let mut reader = input.as_bytes();
        let mut out = Vec::new();
        run(&assistant(), &mut reader, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_profile_prompts_repeat_until_valid() {
        let out = transcript("\nada\nada-at-example\nada@example.com\n123\n5550100200\n").await;
        assert_eq!(out.matches("What's your name?").count(), 2);
        assert!(out.contains("Please enter your name."));
        assert!(out.contains("Please enter a valid email address."));
        assert!(out.contains("Please enter a valid phone number."));
        assert!(out.contains("Thank you, Ada! How can I assist you today?"));
    }

    #[tokio::test]
    async fn test_chat_loop_answers_and_exits() {
        let out = transcript(
            "grace\ng@example.com\n5550100200\n\nhow much is it\nshow python modules\nbye\nhello\n",
        )
        .await;
        assert!(out.contains("Assistant: 999/-"));
        assert!(out.contains("Python Fundamentals (5 hours)"));
        assert!(out.contains("Assistant: Thank you Grace! 'Happy Learning'!"));
        assert!(!out.contains("Hello Grace"));
    }

    #[tokio::test]
    async fn test_closed_input_ends_quietly() {
        let out = transcript("ada\n").await;
        assert!(out.contains("What's your email address?"));
    }
}
