//! Session state shared by every presentation surface.
//!
//! Surfaces only ever read through the accessors below. Changes go through the
//! intent handlers on [`crate::coordinator::Coordinator`].

use uuid::Uuid;

use crate::scores::ScoreVector;
use crate::types::{ConversationTurn, Role};

/// Where the session is in its request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Which page the surface should be showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Analyze,
    Report,
    Chat,
}

/// Append-only log of the conversation about the current report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Role expected next if the log keeps alternating
    pub fn next_role(&self) -> Role {
        match self.turns.last().map(|t| t.role) {
            Some(Role::User) => Role::Model,
            _ => Role::User,
        }
    }

    pub(crate) fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub(crate) fn clear(&mut self) {
        self.turns.clear();
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    session_id: Uuid,
    scores: ScoreVector,
    report: String,
    transcript: Transcript,
    status: Status,
    last_error: Option<String>,
    view: View,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            scores: ScoreVector::zeroed(),
            report: String::new(),
            transcript: Transcript::default(),
            status: Status::Idle,
            last_error: None,
            view: View::default(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn scores(&self) -> &ScoreVector {
        &self.scores
    }

    /// Current report; empty until the first successful analysis
    pub fn report(&self) -> &str {
        &self.report
    }

    pub fn has_report(&self) -> bool {
        !self.report.is_empty()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub(crate) fn start_loading(&mut self) {
        self.status = Status::Loading;
    }

    pub(crate) fn set_scores(&mut self, scores: ScoreVector) {
        self.scores = scores;
    }

    /// Installs a fresh report; the old conversation no longer applies to it
    pub(crate) fn install_report(&mut self, report: String) {
        self.report = report;
        self.transcript.clear();
        self.status = Status::Ready;
        self.view = View::Report;
    }

    pub(crate) fn push_turn(&mut self, turn: ConversationTurn) {
        self.transcript.push(turn);
    }

    pub(crate) fn finish_ready(&mut self) {
        self.status = Status::Ready;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.last_error = Some(message);
        self.status = Status::Error;
    }

    pub(crate) fn clear_error(&mut self) {
        self.last_error = None;
        if self.status == Status::Error {
            self.status = if self.has_report() {
                Status::Ready
            } else {
                Status::Idle
            };
        }
    }

    pub(crate) fn set_view(&mut self, view: View) {
        self.view = view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = SessionState::new();
        assert_eq!(state.scores(), &ScoreVector::zeroed());
        assert_eq!(state.report(), "");
        assert!(!state.has_report());
        assert!(state.transcript().is_empty());
        assert_eq!(state.status(), Status::Idle);
        assert!(!state.is_loading());
        assert_eq!(state.error(), None);
        assert_eq!(state.view(), View::Analyze);
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        assert_ne!(SessionState::new().session_id(), SessionState::new().session_id());
    }

    #[test]
    fn test_install_report_resets_transcript() {
        let mut state = SessionState::new();
        state.install_report("first".to_string());
        state.push_turn(ConversationTurn::user("hi"));
        state.push_turn(ConversationTurn::model("hello"));
        assert_eq!(state.transcript().len(), 2);

        state.install_report("second".to_string());
        assert_eq!(state.report(), "second");
        assert!(state.transcript().is_empty());
        assert_eq!(state.status(), Status::Ready);
        assert_eq!(state.view(), View::Report);
    }

    #[test]
    fn test_clear_error_returns_to_previous_phase() {
        let mut state = SessionState::new();
        state.fail("boom".to_string());
        assert_eq!(state.status(), Status::Error);
        state.clear_error();
        assert_eq!(state.status(), Status::Idle);
        assert_eq!(state.error(), None);

        state.install_report("report".to_string());
        state.fail("boom again".to_string());
        state.clear_error();
        assert_eq!(state.status(), Status::Ready);
    }

    #[test]
    fn test_next_role_alternates() {
        let mut transcript = Transcript::default();
        assert_eq!(transcript.next_role(), Role::User);
        transcript.push(ConversationTurn::user("q"));
        assert_eq!(transcript.next_role(), Role::Model);
        transcript.push(ConversationTurn::model("a"));
        assert_eq!(transcript.next_role(), Role::User);
    }
}
