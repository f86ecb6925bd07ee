use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::session::TokenTotals;
use crate::time::TimestampNs;
use crate::util::truncate;

/// Longest argument value kept as a span attribute.
pub const MAX_ARG_LEN: usize = 200;

/// One normalized log event.
///
/// Every provider's raw records are folded into this closed set so the
/// pairing and assembly stages never see provider-specific shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEntry {
    /// A genuinely human-authored prompt. Machine-relayed payloads that
    /// reuse the same raw record type (tool results, injected environment
    /// context) are never mapped here.
    HumanInput { ts: TimestampNs, text: String },

    /// One assistant response, after streaming-duplicate collapse.
    AssistantOutput {
        ts: TimestampNs,
        thinking_blocks: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        usage: Option<TokenTotals>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stop_reason: Option<String>,
    },

    /// A tool or function invocation request.
    ToolCallBegin {
        ts: TimestampNs,
        call_id: String,
        name: String,
        args: CallArgs,
    },

    /// A tool or function result. `failed` is `Some` only when the
    /// provider carries an explicit error flag; `None` defers
    /// classification to the output-text heuristics.
    ToolCallEnd {
        ts: TimestampNs,
        call_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        failed: Option<bool>,
        output: String,
    },

    /// An asynchronous progress notification.
    Progress { ts: TimestampNs, event: ProgressEvent },

    /// Provider housekeeping.
    System { ts: TimestampNs, event: SystemEvent },
}

impl LogEntry {
    pub fn ts(&self) -> TimestampNs {
        match self {
            LogEntry::HumanInput { ts, .. }
            | LogEntry::AssistantOutput { ts, .. }
            | LogEntry::ToolCallBegin { ts, .. }
            | LogEntry::ToolCallEnd { ts, .. }
            | LogEntry::Progress { ts, .. }
            | LogEntry::System { ts, .. } => *ts,
        }
    }
}

/// The argument fields worth keeping as span attributes, already truncated
/// to [`MAX_ARG_LEN`] so attribute payloads stay bounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl CallArgs {
    /// Pull the known argument fields out of a raw argument object.
    /// Anything else in the payload is dropped.
    pub fn from_json(args: &Value) -> CallArgs {
        let field = |key: &str| {
            args.get(key)
                .and_then(|v| v.as_str())
                .map(|s| truncate(s, MAX_ARG_LEN))
        };
        CallArgs {
            command: field("command"),
            file_path: field("file_path"),
            pattern: field("pattern"),
        }
    }
}

/// Progress notification variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A sub-agent run heartbeat. Same-agent events are grouped into one
    /// span spanning their min/max timestamps.
    AgentRun { agent_id: String },

    /// A sub-tool (MCP or hook) call that reports only its completion time
    /// plus how long it ran.
    SubToolCompleted { name: String, elapsed_ms: u64 },
}

/// Provider housekeeping events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemEvent {
    /// Context-window compaction/summarization boundary.
    Compaction,
    /// The user cancelled an in-flight response.
    Interruption,
}
