//! Intent handlers.
//!
//! A [`Coordinator`] owns one [`SessionState`] and is the only thing allowed to
//! change it. Both handlers take `&mut self`, so a second `analyze` or `chat`
//! cannot start on the same session while one is still in flight.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::backoff::{self, RetryPolicy};
use crate::client::TextGenerator;
use crate::config::MindMirrorConfig;
use crate::errors::{GenerationResult, SessionError, SessionResult};
use crate::prompt::{build_chat_prompt, build_report_prompt, Prompt};
use crate::scores::{RandomScorer, Scorer};
use crate::session::{SessionState, View};
use crate::types::{ConversationTurn, GenerationConfig};

/// Model turn appended when a chat reply could not be produced
pub const CHAT_FALLBACK_MESSAGE: &str = "Arjus encountered an error. Please try again in a moment.";

/// How a chat message was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOutcome {
    /// The model replied
    Replied,
    /// Every attempt failed and the fallback turn was appended instead
    Fallback,
}

pub struct Coordinator {
    state: SessionState,
    generator: Arc<dyn TextGenerator>,
    scorer: Box<dyn Scorer>,
    report_policy: RetryPolicy,
    chat_policy: RetryPolicy,
    report_generation: GenerationConfig,
    chat_generation: GenerationConfig,
}

impl Coordinator {
    /// Fresh session with default retry and sampling settings
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            state: SessionState::new(),
            generator,
            scorer: Box::new(RandomScorer),
            report_policy: RetryPolicy::default(),
            chat_policy: RetryPolicy::default(),
            report_generation: GenerationConfig::report(),
            chat_generation: GenerationConfig::chat(),
        }
    }

    pub fn from_config(
        config: &MindMirrorConfig,
        generator: Arc<dyn TextGenerator>,
    ) -> GenerationResult<Self> {
        let policy = config.retry_policy()?;
        let mut coordinator = Self::new(generator).with_retry_policy(policy);
        coordinator.report_generation = config.report_generation();
        coordinator.chat_generation = config.chat_generation();
        Ok(coordinator)
    }

    pub fn with_scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    /// Applies the same policy to report generation and chat
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.report_policy = policy;
        self.chat_policy = policy;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Scores `text`, then asks the model for a report on those scores.
    ///
    /// On failure the previous report and scores stay in place and the error
    /// is recorded for the surface to show until [`Coordinator::clear_error`].
    pub async fn analyze(&mut self, text: &str) -> SessionResult<()> {
        info!(
            session = %self.state.session_id(),
            chars = text.chars().count(),
            "Analyzing text"
        );
        self.state.clear_error();
        self.state.start_loading();

        let scores = match self.scorer.score(text) {
            Ok(scores) => scores,
            Err(e) => {
                error!(error = %e, "Scoring failed");
                self.state.fail(e.to_string());
                return Err(e);
            }
        };
        let previous_scores = *self.state.scores();
        self.state.set_scores(scores);

        let prompt = build_report_prompt(&scores);
        let result = run_prompt(
            self.generator.as_ref(),
            &prompt,
            &self.report_generation,
            &self.report_policy,
        )
        .await;

        match result {
            Ok(report) => {
                info!(chars = report.len(), "Report generated");
                self.state.install_report(report);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Report generation failed");
                self.state.set_scores(previous_scores);
                let err = SessionError::RetriesExhausted {
                    attempts: self.report_policy.retries(),
                    source: e,
                };
                self.state.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Sends `message` to the coach, grounded in the current report.
    ///
    /// A failed reply is not an error: the fallback turn is appended so the
    /// conversation stays usable.
    pub async fn chat(&mut self, message: &str) -> SessionResult<ChatOutcome> {
        if !self.state.has_report() {
            warn!("Chat requested before a report exists");
            return Err(SessionError::NoReport);
        }
        let message = message.trim();
        if message.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        self.state.push_turn(ConversationTurn::user(message));
        self.state.start_loading();
        debug!(
            session = %self.state.session_id(),
            turns = self.state.transcript().len(),
            "Sending chat message"
        );

        let prompt = build_chat_prompt(self.state.report(), self.state.transcript());
        let result = run_prompt(
            self.generator.as_ref(),
            &prompt,
            &self.chat_generation,
            &self.chat_policy,
        )
        .await;

        let outcome = match result {
            Ok(reply) => {
                self.state.push_turn(ConversationTurn::model(reply));
                ChatOutcome::Replied
            }
            Err(e) => {
                error!(error = %e, "Chat reply failed, appending fallback turn");
                self.state
                    .push_turn(ConversationTurn::model(CHAT_FALLBACK_MESSAGE));
                ChatOutcome::Fallback
            }
        };
        self.state.finish_ready();
        Ok(outcome)
    }

    /// Acknowledges the blocking error left by a failed analysis
    pub fn clear_error(&mut self) {
        self.state.clear_error();
    }

    pub fn navigate(&mut self, view: View) {
        self.state.set_view(view);
    }
}

async fn run_prompt(
    generator: &dyn TextGenerator,
    prompt: &Prompt,
    generation_config: &GenerationConfig,
    policy: &RetryPolicy,
) -> GenerationResult<String> {
    backoff::execute(policy, || {
        generator.generate(
            &prompt.system_instruction,
            &prompt.contents,
            generation_config,
        )
    })
    .await
}
