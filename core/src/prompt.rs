//! Prompt construction for report generation and the coaching chat.

use crate::scores::ScoreVector;
use crate::session::Transcript;
use crate::types::ConversationTurn;

/// Name the chat assistant goes by
pub const ASSISTANT_NAME: &str = "Arjus";

const REPORT_SYSTEM_PROMPT: &str = "You are an expert psychologist and insightful analyst. \
Your task is to write a detailed, supportive, and actionable personality report based on a user's \
Big Five (OCEAN) scores. The scores are from 0 (low) to 1 (high). Address the user directly \
(using 'you'). Be encouraging and focus on potential strengths and growth areas. Format the report \
with Markdown (headings, lists). Do not sound like a robot. Be insightful and comprehensive.";

/// A system instruction plus the turns to send with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_instruction: String,
    pub contents: Vec<ConversationTurn>,
}

pub fn build_report_prompt(scores: &ScoreVector) -> Prompt {
    let listed = scores
        .iter()
        .map(|(name, value)| format!("{}: {:.2}", name, value))
        .collect::<Vec<_>>()
        .join(", ");

    Prompt {
        system_instruction: REPORT_SYSTEM_PROMPT.to_string(),
        contents: vec![ConversationTurn::user(format!(
            "Generate a full personality report for the following scores: {}.",
            listed
        ))],
    }
}

/// The whole transcript is sent every time so the model sees every earlier turn
pub fn build_chat_prompt(report: &str, transcript: &Transcript) -> Prompt {
    let system_instruction = format!(
        "You are {name}, a friendly, supportive, and wise AI coach. Your purpose is to help a user \
understand their personality report. You must be conversational, patient, and insightful. \
The user's complete personality report is as follows: [{report}]. Base all your answers *only* \
on this report and your general knowledge of the Big Five model. Never reveal you are an AI \
model. Keep your answers concise and helpful.",
        name = ASSISTANT_NAME,
        report = report,
    );

    Prompt {
        system_instruction,
        contents: transcript.turns().to_vec(),
    }
}
