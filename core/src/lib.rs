// Core of MindMirror: everything between a user intent and the model.
// - Big Five scores and the scoring collaborator
// - Prompt construction for reports and the coaching chat
// - Gemini client behind a TextGenerator trait
// - Retry with exponential backoff
// - Session state and the intent handlers that drive it
// - Configuration loading

// Export backoff module - Retry with exponential backoff
pub mod backoff;
pub use backoff::{execute, RetryPolicy};

// Export client module - API client for Gemini
pub mod client;
pub use client::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export coordinator module - Intent handlers
pub mod coordinator;
pub use coordinator::{ChatOutcome, Coordinator, CHAT_FALLBACK_MESSAGE};

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

pub mod prompt;
pub use prompt::{build_chat_prompt, build_report_prompt, Prompt};

pub mod scores;
pub use scores::{BigFiveTrait, RandomScorer, ScoreVector, Scorer};

pub mod session;
pub use session::{SessionState, Status, Transcript, View};

// Export types module - Request/response data structures
pub mod types;
pub use types::*;
