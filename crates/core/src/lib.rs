//! Course Advisor Core
//!
//! Domain logic shared by the HTTP service and the terminal chatbot: the
//! deterministic routing pipeline (normalizer, classifier, course matcher,
//! response assembler), the curriculum store, per-session user context, and the
//! LLM-backed agent crews.

pub mod assistant;
pub mod crew;
pub mod curriculum;
pub mod intent;
pub mod lexicon;
pub mod llm_client;
pub mod matcher;
pub mod normalizer;
pub mod pipelines;
pub mod profile;
pub mod rate_limiter;
pub mod responses;
pub mod session;
pub mod website;
