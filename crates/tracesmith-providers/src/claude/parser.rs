use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracesmith_types::{
    CallArgs, LogEntry, NormalizedSession, Provider, ProgressEvent, SessionMeta, SystemEvent,
    TokenTotals, parse_opt_timestamp_ns,
};

use super::io::read_claude_records;
use super::schema::{
    AssistantContent, AssistantRecord, ClaudeRecord, ClaudeTokenUsage, ProgressData, UserContent,
    UserRecord,
};
use crate::error::{Error, Result};
use crate::traits::SessionExtractor;

/// Placeholder model name written on synthetic assistant records.
const MODEL_SENTINEL: &str = "<synthetic>";

/// Prefix of the marker injected when the user interrupts a turn.
const INTERRUPT_MARKER: &str = "[Request interrupted by user";

/// Local command output echoed back through a user-tagged record.
const LOCAL_STDOUT_MARKER: &str = "<local-command-stdout>";

pub struct ClaudeExtractor;

impl SessionExtractor for ClaudeExtractor {
    fn provider(&self) -> Provider {
        Provider::ClaudeCode
    }

    fn extract(&self, path: &Path) -> Result<NormalizedSession> {
        let records = read_claude_records(path)?;
        normalize_claude_session(records)
    }
}

pub(crate) fn normalize_claude_session(records: Vec<ClaudeRecord>) -> Result<NormalizedSession> {
    let session_id = records
        .iter()
        .find_map(record_session_id)
        .ok_or_else(|| Error::Parse("no session id found in log".to_string()))?;

    // Streaming writes the same assistant message several times, each record
    // more complete than the last. Keep only the final one per message id.
    let keep = streaming_survivors(&records);

    let mut meta = SessionMeta {
        session_id,
        provider: Provider::ClaudeCode,
        model: None,
        git_branch: None,
        git_repo: None,
    };
    let mut entries = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        match record {
            ClaudeRecord::User(user) => {
                if user.is_sidechain {
                    continue;
                }
                if meta.git_branch.is_none() {
                    meta.git_branch = user.git_branch.clone();
                }
                push_user_entries(user, &mut entries);
            }
            ClaudeRecord::Assistant(assistant) => {
                if assistant.is_sidechain || !keep[idx] {
                    continue;
                }
                if meta.git_branch.is_none() {
                    meta.git_branch = assistant.git_branch.clone();
                }
                if meta.model.is_none() {
                    if let Some(model) = assistant.message.model.as_deref() {
                        if model != MODEL_SENTINEL {
                            meta.model = Some(model.to_string());
                        }
                    }
                }
                push_assistant_entries(assistant, &mut entries);
            }
            ClaudeRecord::System(sys) => {
                if sys.subtype.as_deref() == Some("compact_boundary") {
                    entries.push(LogEntry::System {
                        ts: parse_opt_timestamp_ns(sys.timestamp.as_deref()),
                        event: SystemEvent::Compaction,
                    });
                }
            }
            ClaudeRecord::Progress(progress) => {
                push_progress_entry(progress, &mut entries);
            }
            ClaudeRecord::FileHistorySnapshot | ClaudeRecord::Unknown => {}
        }
    }

    Ok(NormalizedSession { meta, entries })
}

fn record_session_id(record: &ClaudeRecord) -> Option<String> {
    match record {
        ClaudeRecord::User(u) => Some(u.session_id.clone()),
        ClaudeRecord::Assistant(a) => Some(a.session_id.clone()),
        ClaudeRecord::System(s) => Some(s.session_id.clone()),
        ClaudeRecord::Progress(p) => Some(p.session_id.clone()),
        ClaudeRecord::FileHistorySnapshot | ClaudeRecord::Unknown => None,
    }
}

/// For each record index, whether it survives streaming dedup. The last
/// record per assistant message id wins; everything else survives untouched.
fn streaming_survivors(records: &[ClaudeRecord]) -> Vec<bool> {
    let mut last_for_id: HashMap<&str, usize> = HashMap::new();
    for (idx, record) in records.iter().enumerate() {
        if let ClaudeRecord::Assistant(assistant) = record {
            if let Some(id) = assistant.message.id.as_deref() {
                last_for_id.insert(id, idx);
            }
        }
    }
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| match record {
            ClaudeRecord::Assistant(assistant) => match assistant.message.id.as_deref() {
                Some(id) => last_for_id.get(id) == Some(&idx),
                None => true,
            },
            _ => true,
        })
        .collect()
}

fn push_user_entries(user: &UserRecord, entries: &mut Vec<LogEntry>) {
    let ts = parse_opt_timestamp_ns(user.timestamp.as_deref());
    for block in &user.message.content {
        match block {
            UserContent::Text { text } => {
                let trimmed = text.trim();
                if trimmed.starts_with(INTERRUPT_MARKER) {
                    entries.push(LogEntry::System {
                        ts,
                        event: SystemEvent::Interruption,
                    });
                } else if !user.is_meta
                    && !trimmed.is_empty()
                    && !trimmed.starts_with(LOCAL_STDOUT_MARKER)
                {
                    entries.push(LogEntry::HumanInput {
                        ts,
                        text: text.clone(),
                    });
                }
            }
            UserContent::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => {
                entries.push(LogEntry::ToolCallEnd {
                    ts,
                    call_id: tool_use_id.clone(),
                    failed: Some(*is_error),
                    output: tool_result_text(content.as_ref()),
                });
            }
            UserContent::Unknown => {}
        }
    }
}

fn push_assistant_entries(assistant: &AssistantRecord, entries: &mut Vec<LogEntry>) {
    let ts = parse_opt_timestamp_ns(assistant.timestamp.as_deref());
    let mut thinking_blocks = 0u32;
    for block in &assistant.message.content {
        match block {
            AssistantContent::Thinking => thinking_blocks += 1,
            AssistantContent::ToolUse { id, name, input } => {
                entries.push(LogEntry::ToolCallBegin {
                    ts,
                    call_id: id.clone(),
                    name: name.clone(),
                    args: CallArgs::from_json(input),
                });
            }
            AssistantContent::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => {
                entries.push(LogEntry::ToolCallEnd {
                    ts,
                    call_id: tool_use_id.clone(),
                    failed: Some(*is_error),
                    output: tool_result_text(content.as_ref()),
                });
            }
            AssistantContent::Text | AssistantContent::Unknown => {}
        }
    }
    entries.push(LogEntry::AssistantOutput {
        ts,
        thinking_blocks,
        usage: assistant.message.usage.as_ref().map(token_totals),
        stop_reason: assistant.message.stop_reason.clone(),
    });
}

fn push_progress_entry(progress: &super::schema::ProgressRecord, entries: &mut Vec<LogEntry>) {
    let ts = parse_opt_timestamp_ns(progress.timestamp.as_deref());
    match &progress.data {
        ProgressData::AgentProgress {
            agent_id: Some(agent_id),
        } => {
            entries.push(LogEntry::Progress {
                ts,
                event: ProgressEvent::AgentRun {
                    agent_id: agent_id.clone(),
                },
            });
        }
        ProgressData::McpProgress {
            server_name,
            tool_name,
            status,
            elapsed_time_ms: Some(elapsed_ms),
        } if status.as_deref() == Some("completed") => {
            entries.push(LogEntry::Progress {
                ts,
                event: ProgressEvent::SubToolCompleted {
                    name: mcp_call_name(server_name.as_deref(), tool_name.as_deref()),
                    elapsed_ms: *elapsed_ms,
                },
            });
        }
        _ => {}
    }
}

fn mcp_call_name(server: Option<&str>, tool: Option<&str>) -> String {
    match (server, tool) {
        (Some(server), Some(tool)) => format!("{server}.{tool}"),
        (Some(server), None) => server.to_string(),
        (None, Some(tool)) => tool.to_string(),
        (None, None) => "mcp".to_string(),
    }
}

/// Tool results carry either a bare string or an array of typed blocks.
fn tool_result_text(content: Option<&Value>) -> String {
    match content {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(blocks)) => blocks
            .iter()
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

fn token_totals(usage: &ClaudeTokenUsage) -> TokenTotals {
    TokenTotals {
        input: Some(usage.input_tokens),
        output: Some(usage.output_tokens),
        cache_read: usage.cache_read_input_tokens,
        cache_write: usage.cache_creation_input_tokens,
        reasoning: None,
    }
}
