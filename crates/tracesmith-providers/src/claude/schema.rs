use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One line of a Claude Code session log.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ClaudeRecord {
    User(UserRecord),
    Assistant(AssistantRecord),
    System(SystemRecord),
    Progress(ProgressRecord),
    /// Workspace file snapshots. Large and never span-relevant.
    FileHistorySnapshot,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserRecord {
    pub session_id: String,
    pub timestamp: Option<String>,
    pub message: UserMessage,
    #[serde(default)]
    pub is_meta: bool,
    #[serde(default)]
    pub is_sidechain: bool,
    pub git_branch: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct UserMessage {
    #[serde(deserialize_with = "string_or_content_blocks")]
    pub content: Vec<UserContent>,
}

/// User message content is either a bare string or an array of typed blocks.
fn string_or_content_blocks<'de, D>(deserializer: D) -> Result<Vec<UserContent>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(text) => Ok(vec![UserContent::Text { text }]),
        Value::Array(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Err(serde::de::Error::custom(
            "expected string or array of content blocks",
        )),
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum UserContent {
    Text {
        text: String,
    },
    ToolResult {
        tool_use_id: String,
        content: Option<Value>,
        #[serde(default)]
        is_error: bool,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssistantRecord {
    pub session_id: String,
    pub timestamp: Option<String>,
    pub message: AssistantMessage,
    #[serde(default)]
    pub is_sidechain: bool,
    pub git_branch: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct AssistantMessage {
    /// API message id. Streaming rewrites share it across partial records.
    pub id: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub content: Vec<AssistantContent>,
    pub stop_reason: Option<String>,
    pub usage: Option<ClaudeTokenUsage>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum AssistantContent {
    Text,
    Thinking,
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: Option<Value>,
        #[serde(default)]
        is_error: bool,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub(crate) struct ClaudeTokenUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    pub cache_creation_input_tokens: Option<u64>,
    pub cache_read_input_tokens: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SystemRecord {
    pub session_id: String,
    pub timestamp: Option<String>,
    pub subtype: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProgressRecord {
    pub session_id: String,
    pub timestamp: Option<String>,
    pub data: ProgressData,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
#[serde(rename_all_fields = "camelCase")]
pub(crate) enum ProgressData {
    AgentProgress {
        agent_id: Option<String>,
    },
    McpProgress {
        server_name: Option<String>,
        tool_name: Option<String>,
        status: Option<String>,
        elapsed_time_ms: Option<u64>,
    },
    #[serde(other)]
    Unknown,
}
