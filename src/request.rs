//! Wire payloads for the `generateContent` endpoint and the history → payload mapping.

use crate::types::{Message, Origin};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

impl From<Origin> for TurnRole {
    fn from(origin: Origin) -> Self {
        match origin {
            Origin::User => TurnRole::User,
            Origin::Assistant => TurnRole::Model,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
    pub role: TurnRole,
}

impl Content {
    pub fn text(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
            role,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub max_output_tokens: u32,
    pub candidate_count: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_p: 0.95,
            max_output_tokens: 512,
            candidate_count: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

/// Builds the outbound payload. The API keeps no state, so every turn of the history goes out
/// in order; a pending document becomes its own trailing user turn.
pub fn build_request(
    history: &[Message],
    attachment: Option<&str>,
    generation_config: GenerationConfig,
) -> GenerateRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|msg| Content::text(msg.origin().into(), msg.content()))
        .collect();

    if let Some(text) = attachment {
        contents.push(Content::text(TurnRole::User, text));
    }

    GenerateRequest {
        contents,
        generation_config,
    }
}

// Response side. Everything is optional: a structurally incomplete reply is not an error.

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

impl GenerateResponse {
    /// Interprets any decoded JSON body. Shapes that do not match read as an empty response
    /// rather than an error.
    pub fn from_json(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Text of the first part of the first candidate, if there is any.
    pub fn best_candidate_text(&self) -> Option<&str> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .first()?
            .text
            .as_deref()
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_roles_and_keeps_text() {
        let history = vec![
            Message::user("What is Rust?"),
            Message::assistant("A systems language."),
            Message::user("  Why?  "),
        ];
        let request = build_request(&history, None, GenerationConfig::default());

        let roles: Vec<_> = request.contents.iter().map(|c| c.role).collect();
        assert_eq!(roles, [TurnRole::User, TurnRole::Model, TurnRole::User]);
        let texts: Vec<_> = request
            .contents
            .iter()
            .map(|c| c.parts[0].text.as_str())
            .collect();
        assert_eq!(texts, ["What is Rust?", "A systems language.", "  Why?  "]);
    }

    #[test]
    fn attachment_is_a_separate_trailing_turn() {
        let history = vec![Message::user("summarize this")];
        let request = build_request(&history, Some("page one\npage two"), GenerationConfig::default());

        assert_eq!(request.contents.len(), 2);
        assert_eq!(request.contents[0].parts[0].text, "summarize this");
        let last = &request.contents[1];
        assert_eq!(last.role, TurnRole::User);
        assert_eq!(last.parts[0].text, "page one\npage two");
    }

    #[test]
    fn serializes_to_wire_shape() {
        let history = vec![Message::user("hi")];
        let value = serde_json::to_value(build_request(&history, None, GenerationConfig::default()))
            .expect("serialize");

        assert_eq!(
            value,
            json!({
                "contents": [{ "parts": [{ "text": "hi" }], "role": "user" }],
                "generationConfig": {
                    "temperature": 0.8,
                    "topP": 0.95,
                    "maxOutputTokens": 512,
                    "candidateCount": 1
                }
            })
        );
    }

    #[test]
    fn reads_first_candidate_text() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "Hello!" }, { "text": "ignored" }], "role": "model" } },
                { "content": { "parts": [{ "text": "second" }] } }
            ]
        }))
        .expect("decode");
        assert_eq!(response.best_candidate_text(), Some("Hello!"));
    }

    #[test]
    fn missing_shapes_yield_none() {
        for body in [
            json!({}),
            json!({ "candidates": [] }),
            json!({ "candidates": null }),
            json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
            json!({ "candidates": [{ "content": { "parts": [] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] }),
        ] {
            let response: GenerateResponse = serde_json::from_value(body).expect("decode");
            assert_eq!(response.best_candidate_text(), None);
        }
    }

    #[test]
    fn foreign_json_reads_as_empty() {
        for body in [json!("plain string"), json!([1, 2]), json!({ "candidates": "nope" })] {
            assert_eq!(GenerateResponse::from_json(body).best_candidate_text(), None);
        }
    }
}
