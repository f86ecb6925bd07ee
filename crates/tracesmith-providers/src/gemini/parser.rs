use std::path::Path;

use serde_json::Value;
use tracesmith_types::{
    CallArgs, LogEntry, NormalizedSession, Provider, SessionMeta, TokenTotals, parse_timestamp_ns,
    parse_opt_timestamp_ns,
};

use super::io::{GeminiLog, read_gemini_log};
use super::schema::{GeminiAssistantMessage, GeminiMessage, GeminiSession, GeminiTokens,
    GeminiToolCall, LegacyGeminiMessage};
use crate::error::{Error, Result};
use crate::traits::SessionExtractor;

pub struct GeminiExtractor;

impl SessionExtractor for GeminiExtractor {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn extract(&self, path: &Path) -> Result<NormalizedSession> {
        match read_gemini_log(path)? {
            GeminiLog::Session(doc) => normalize_gemini_session(doc),
            GeminiLog::Legacy(messages) => normalize_legacy_session(messages),
        }
    }
}

pub(crate) fn normalize_gemini_session(doc: GeminiSession) -> Result<NormalizedSession> {
    if doc.session_id.trim().is_empty() {
        return Err(Error::Parse("empty session id in checkpoint".to_string()));
    }

    let mut meta = SessionMeta {
        session_id: doc.session_id,
        provider: Provider::Gemini,
        model: None,
        git_branch: None,
        git_repo: None,
    };
    let mut entries = Vec::new();

    for message in &doc.messages {
        match message {
            GeminiMessage::User(user) => {
                if !user.content.trim().is_empty() {
                    entries.push(LogEntry::HumanInput {
                        ts: parse_opt_timestamp_ns(user.timestamp.as_deref()),
                        text: user.content.clone(),
                    });
                }
            }
            GeminiMessage::Gemini(assistant) => {
                if meta.model.is_none() {
                    meta.model = assistant.model.clone();
                }
                push_assistant_entries(assistant, &mut entries);
            }
            GeminiMessage::Info | GeminiMessage::Unknown => {}
        }
    }

    Ok(NormalizedSession { meta, entries })
}

fn push_assistant_entries(assistant: &GeminiAssistantMessage, entries: &mut Vec<LogEntry>) {
    let msg_ts = parse_opt_timestamp_ns(assistant.timestamp.as_deref());
    for call in &assistant.tool_calls {
        // Checkpoints record the call and its result in one place, so both
        // edges share the call's own timestamp.
        let call_ts = match call.timestamp.as_deref() {
            Some(raw) => parse_timestamp_ns(raw),
            None => msg_ts,
        };
        entries.push(LogEntry::ToolCallBegin {
            ts: call_ts,
            call_id: call.id.clone(),
            name: call.name.clone(),
            args: CallArgs::from_json(&call.args),
        });
        if has_finished(call) {
            entries.push(LogEntry::ToolCallEnd {
                ts: call_ts,
                call_id: call.id.clone(),
                failed: Some(call.status.as_deref() == Some("error")),
                output: call_output_text(call),
            });
        }
    }
    entries.push(LogEntry::AssistantOutput {
        ts: msg_ts,
        thinking_blocks: assistant.thoughts.len() as u32,
        usage: assistant.tokens.as_ref().map(token_totals),
        stop_reason: None,
    });
}

fn has_finished(call: &GeminiToolCall) -> bool {
    match call.status.as_deref() {
        Some(status) => matches!(status, "success" | "error" | "canceled" | "cancelled"),
        None => !call.result.is_empty(),
    }
}

fn call_output_text(call: &GeminiToolCall) -> String {
    match &call.result_display {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None if call.result.is_empty() => String::new(),
        None => serde_json::to_string(&call.result).unwrap_or_default(),
    }
}

fn token_totals(tokens: &GeminiTokens) -> TokenTotals {
    TokenTotals {
        input: Some(tokens.input),
        output: Some(tokens.output),
        cache_read: Some(tokens.cached),
        cache_write: None,
        reasoning: Some(tokens.thoughts),
    }
}

pub(crate) fn normalize_legacy_session(
    messages: Vec<LegacyGeminiMessage>,
) -> Result<NormalizedSession> {
    let session_id = messages
        .iter()
        .find_map(|m| m.session_id.clone())
        .ok_or_else(|| Error::Parse("no session id in legacy checkpoint".to_string()))?;

    let meta = SessionMeta {
        session_id,
        provider: Provider::Gemini,
        model: None,
        git_branch: None,
        git_repo: None,
    };
    // The legacy array carries no tool or token detail, only the dialogue.
    let entries = messages
        .iter()
        .filter(|m| m.kind == "user" && !m.message.trim().is_empty())
        .map(|m| LogEntry::HumanInput {
            ts: parse_opt_timestamp_ns(m.timestamp.as_deref()),
            text: m.message.clone(),
        })
        .collect();

    Ok(NormalizedSession { meta, entries })
}
