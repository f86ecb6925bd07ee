use serde::Deserialize;
use serde_json::Value;

/// Current Gemini CLI checkpoint: one JSON document per session.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiSession {
    pub session_id: String,
    #[serde(default)]
    pub messages: Vec<GeminiMessage>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub(crate) enum GeminiMessage {
    User(GeminiUserMessage),
    Gemini(GeminiAssistantMessage),
    /// CLI status banners, not part of the conversation.
    Info,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiUserMessage {
    pub timestamp: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiAssistantMessage {
    pub timestamp: Option<String>,
    pub model: Option<String>,
    /// Reasoning blocks. Only the count survives normalization.
    #[serde(default)]
    pub thoughts: Vec<GeminiThought>,
    #[serde(default)]
    pub tool_calls: Vec<GeminiToolCall>,
    pub tokens: Option<GeminiTokens>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct GeminiThought {}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: Value,
    /// Raw result blocks; present once the call has finished.
    #[serde(default)]
    pub result: Vec<Value>,
    pub status: Option<String>,
    pub timestamp: Option<String>,
    pub result_display: Option<Value>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub(crate) struct GeminiTokens {
    #[serde(default)]
    pub input: u64,
    #[serde(default)]
    pub output: u64,
    #[serde(default)]
    pub cached: u64,
    #[serde(default)]
    pub thoughts: u64,
}

/// Early Gemini CLI wrote a flat array of messages instead of a session
/// document.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LegacyGeminiMessage {
    pub session_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    pub timestamp: Option<String>,
}
