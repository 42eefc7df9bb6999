use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Part structure for a piece of content
#[derive(Serialize, Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Part {
    pub text: String,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One entry of a conversation, serialized exactly as the endpoint expects it
#[derive(Serialize, Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(text)],
        }
    }

    /// All parts of the turn, joined by newlines
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// System instruction block; the endpoint wants it tagged with the `system` role
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SystemInstruction {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

impl SystemInstruction {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            role: "system",
            parts: vec![Part::text(text)],
        }
    }
}

/// Request to the generateContent endpoint
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub system_instruction: SystemInstruction,
    pub contents: &'a [ConversationTurn],
    pub generation_config: &'a GenerationConfig,
}

/// Sampling knobs, passed per call.
///
/// Serialized in camelCase for the endpoint; config files may also spell the
/// keys in snake_case.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(alias = "top_p")]
    pub top_p: f32,
    #[serde(default, alias = "top_k", skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(alias = "max_output_tokens")]
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// Settings used for the long-form personality report
    pub fn report() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: Some(40),
            max_output_tokens: 1024,
        }
    }

    /// Narrower settings for short, grounded chat answers
    pub fn chat() -> Self {
        Self {
            temperature: 0.6,
            top_p: 0.9,
            top_k: None,
            max_output_tokens: 512,
        }
    }
}

/// Response from the generateContent endpoint
#[derive(Deserialize, Debug, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Candidate in the response
#[derive(Deserialize, Debug)]
pub struct Candidate {
    pub content: Option<ContentResponsePart>,
}

/// Content part in the response
#[derive(Deserialize, Debug)]
pub struct ContentResponsePart {
    #[serde(default)]
    pub parts: Vec<PartResponse>,
    pub role: Option<String>,
}

/// Part response from the API
#[derive(Deserialize, Debug)]
pub struct PartResponse {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate joined by newlines; empty when there is nothing usable
    pub fn first_candidate_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }
}
