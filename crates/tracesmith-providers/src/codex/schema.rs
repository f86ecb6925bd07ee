use serde::Deserialize;

/// One line of a Codex CLI rollout log: a timestamped envelope around a
/// typed payload.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum CodexRecord {
    SessionMeta(SessionMetaRecord),
    TurnContext(TurnContextRecord),
    ResponseItem(ResponseItemRecord),
    EventMsg(EventMsgRecord),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct SessionMetaRecord {
    pub payload: SessionMetaPayload,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct SessionMetaPayload {
    pub id: String,
    pub git: Option<GitInfo>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct GitInfo {
    pub branch: Option<String>,
    pub repository_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct TurnContextRecord {
    pub payload: TurnContextPayload,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct TurnContextPayload {
    pub model: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct ResponseItemRecord {
    pub timestamp: Option<String>,
    pub payload: ResponseItemPayload,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum ResponseItemPayload {
    Message {
        role: String,
        #[serde(default)]
        content: Vec<MessageContent>,
    },
    /// Model reasoning item. Only its presence matters downstream.
    Reasoning,
    FunctionCall {
        name: String,
        /// JSON-encoded argument object, passed through as written.
        arguments: String,
        call_id: String,
    },
    FunctionCallOutput {
        call_id: String,
        output: String,
    },
    CustomToolCall {
        call_id: String,
        name: String,
        input: String,
    },
    CustomToolCallOutput {
        call_id: String,
        output: String,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum MessageContent {
    InputText { text: String },
    OutputText { text: String },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct EventMsgRecord {
    pub timestamp: Option<String>,
    pub payload: EventMsgPayload,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum EventMsgPayload {
    /// UI echoes of response items already in the stream.
    UserMessage,
    AgentMessage,
    AgentReasoning,
    TokenCount {
        info: Option<TokenCountInfo>,
    },
    TurnAborted,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct TokenCountInfo {
    pub total_token_usage: Option<CodexTokenUsage>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub(crate) struct CodexTokenUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub cached_input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub reasoning_output_tokens: u64,
}
