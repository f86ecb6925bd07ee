use std::path::Path;

use serde_json::Value;
use tracesmith_types::{
    CallArgs, LogEntry, MAX_ARG_LEN, NormalizedSession, Provider, SessionMeta, SystemEvent,
    TimestampNs, TokenTotals, parse_opt_timestamp_ns, truncate,
};

use super::io::read_codex_records;
use super::schema::{
    CodexRecord, CodexTokenUsage, EventMsgPayload, MessageContent, ResponseItemPayload,
    ResponseItemRecord,
};
use crate::error::{Error, Result};
use crate::traits::SessionExtractor;

pub struct CodexExtractor;

impl SessionExtractor for CodexExtractor {
    fn provider(&self) -> Provider {
        Provider::Codex
    }

    fn extract(&self, path: &Path) -> Result<NormalizedSession> {
        let records = read_codex_records(path)?;
        normalize_codex_session(records)
    }
}

pub(crate) fn normalize_codex_session(records: Vec<CodexRecord>) -> Result<NormalizedSession> {
    let meta_payload = records
        .iter()
        .find_map(|record| match record {
            CodexRecord::SessionMeta(rec) => Some(&rec.payload),
            _ => None,
        })
        .ok_or_else(|| Error::Parse("no session_meta record in rollout".to_string()))?;

    let model = records.iter().find_map(|record| match record {
        CodexRecord::TurnContext(rec) => rec.payload.model.clone(),
        _ => None,
    });

    let meta = SessionMeta {
        session_id: meta_payload.id.clone(),
        provider: Provider::Codex,
        model,
        git_branch: meta_payload.git.as_ref().and_then(|g| g.branch.clone()),
        git_repo: meta_payload
            .git
            .as_ref()
            .and_then(|g| g.repository_url.clone()),
    };

    let mut entries = Vec::new();
    let mut latest_totals: Option<TokenTotals> = None;
    let mut latest_totals_ts = TimestampNs::UNKNOWN;

    for record in &records {
        match record {
            CodexRecord::SessionMeta(_) | CodexRecord::TurnContext(_) => {}
            CodexRecord::ResponseItem(rec) => push_response_item(rec, &mut entries),
            CodexRecord::EventMsg(rec) => match &rec.payload {
                EventMsgPayload::TokenCount { info } => {
                    if let Some(usage) = info.as_ref().and_then(|i| i.total_token_usage.as_ref()) {
                        latest_totals = Some(token_totals(usage));
                        latest_totals_ts = parse_opt_timestamp_ns(rec.timestamp.as_deref());
                    }
                }
                EventMsgPayload::TurnAborted => {
                    entries.push(LogEntry::System {
                        ts: parse_opt_timestamp_ns(rec.timestamp.as_deref()),
                        event: SystemEvent::Interruption,
                    });
                }
                // Echoes of response items already in the stream.
                EventMsgPayload::UserMessage
                | EventMsgPayload::AgentMessage
                | EventMsgPayload::AgentReasoning
                | EventMsgPayload::Unknown => {}
            },
            CodexRecord::Unknown => {}
        }
    }

    // Token counts are cumulative over the session. Attach the final figure
    // to the last assistant output so downstream sums see it exactly once.
    if let Some(totals) = latest_totals {
        let last_assistant = entries.iter_mut().rev().find_map(|entry| match entry {
            LogEntry::AssistantOutput { usage, .. } => Some(usage),
            _ => None,
        });
        match last_assistant {
            Some(usage) => *usage = Some(totals),
            None => entries.push(LogEntry::AssistantOutput {
                ts: latest_totals_ts,
                thinking_blocks: 0,
                usage: Some(totals),
                stop_reason: None,
            }),
        }
    }

    Ok(NormalizedSession { meta, entries })
}

fn push_response_item(rec: &ResponseItemRecord, entries: &mut Vec<LogEntry>) {
    let ts = parse_opt_timestamp_ns(rec.timestamp.as_deref());
    match &rec.payload {
        ResponseItemPayload::Message { role, content } => match role.as_str() {
            "user" => {
                let text = joined_text(content);
                let trimmed = text.trim();
                if !trimmed.is_empty() && !is_relayed_context(trimmed) {
                    entries.push(LogEntry::HumanInput { ts, text });
                }
            }
            "assistant" => {
                entries.push(LogEntry::AssistantOutput {
                    ts,
                    thinking_blocks: 0,
                    usage: None,
                    stop_reason: None,
                });
            }
            _ => {}
        },
        ResponseItemPayload::Reasoning => {
            entries.push(LogEntry::AssistantOutput {
                ts,
                thinking_blocks: 1,
                usage: None,
                stop_reason: None,
            });
        }
        ResponseItemPayload::FunctionCall {
            name,
            arguments,
            call_id,
        } => {
            entries.push(LogEntry::ToolCallBegin {
                ts,
                call_id: call_id.clone(),
                name: name.clone(),
                args: codex_call_args(arguments),
            });
        }
        ResponseItemPayload::FunctionCallOutput { call_id, output } => {
            entries.push(LogEntry::ToolCallEnd {
                ts,
                call_id: call_id.clone(),
                failed: None,
                output: output.clone(),
            });
        }
        ResponseItemPayload::CustomToolCall {
            call_id,
            name,
            input,
        } => {
            entries.push(LogEntry::ToolCallBegin {
                ts,
                call_id: call_id.clone(),
                name: name.clone(),
                args: codex_call_args(input),
            });
        }
        ResponseItemPayload::CustomToolCallOutput { call_id, output } => {
            entries.push(LogEntry::ToolCallEnd {
                ts,
                call_id: call_id.clone(),
                failed: None,
                output: output.clone(),
            });
        }
        ResponseItemPayload::Unknown => {}
    }
}

fn joined_text(content: &[MessageContent]) -> String {
    content
        .iter()
        .filter_map(|block| match block {
            MessageContent::InputText { text } | MessageContent::OutputText { text } => {
                Some(text.as_str())
            }
            MessageContent::Unknown => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Context the CLI injects into the transcript wrapped in sentinel tags.
fn is_relayed_context(text: &str) -> bool {
    text.starts_with("<environment_context>") || text.starts_with("<user_instructions>")
}

/// Tool arguments arrive as a JSON-encoded string. Invalid JSON is kept raw
/// rather than dropped.
fn parse_json_arguments(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::json!({ "raw": raw }))
}

fn codex_call_args(raw: &str) -> CallArgs {
    let value = parse_json_arguments(raw);
    let mut args = CallArgs::from_json(&value);
    // The shell tool passes its command as an argv array.
    if args.command.is_none() {
        if let Some(argv) = value.get("command").and_then(Value::as_array) {
            let joined = argv
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            if !joined.is_empty() {
                args.command = Some(truncate(&joined, MAX_ARG_LEN));
            }
        }
    }
    args
}

fn token_totals(usage: &CodexTokenUsage) -> TokenTotals {
    TokenTotals {
        input: Some(usage.input_tokens),
        output: Some(usage.output_tokens),
        cache_read: Some(usage.cached_input_tokens),
        cache_write: None,
        reasoning: Some(usage.reasoning_output_tokens),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(lines: &[&str]) -> Vec<CodexRecord> {
        lines
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn full_rollout_normalizes_in_log_order() {
        let session = normalize_codex_session(records(&[
            r#"{"timestamp":"2024-03-01T08:00:00Z","type":"session_meta","payload":{"id":"0195b2c3-aa11","git":{"branch":"main","repository_url":"https://github.com/u/proj.git"}}}"#,
            r#"{"timestamp":"2024-03-01T08:00:01Z","type":"turn_context","payload":{"model":"gpt-5.1-codex"}}"#,
            r#"{"timestamp":"2024-03-01T08:00:02Z","type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"run the tests"}]}}"#,
            r#"{"timestamp":"2024-03-01T08:00:03Z","type":"response_item","payload":{"type":"reasoning","summary":[{"type":"summary_text","text":"plan"}]}}"#,
            r#"{"timestamp":"2024-03-01T08:00:04Z","type":"response_item","payload":{"type":"function_call","name":"shell","arguments":"{\"command\":[\"cargo\",\"test\"]}","call_id":"call_1"}}"#,
            r#"{"timestamp":"2024-03-01T08:00:09Z","type":"response_item","payload":{"type":"function_call_output","call_id":"call_1","output":"test result: ok. 12 passed"}}"#,
            r#"{"timestamp":"2024-03-01T08:00:10Z","type":"response_item","payload":{"type":"message","role":"assistant","content":[{"type":"output_text","text":"all green"}]}}"#,
            r#"{"timestamp":"2024-03-01T08:00:11Z","type":"event_msg","payload":{"type":"token_count","info":{"total_token_usage":{"input_tokens":5000,"cached_input_tokens":1200,"output_tokens":900,"reasoning_output_tokens":300,"total_tokens":5900}}}}"#,
        ]))
        .unwrap();

        assert_eq!(session.meta.session_id, "0195b2c3-aa11");
        assert_eq!(session.meta.provider, Provider::Codex);
        assert_eq!(session.meta.model.as_deref(), Some("gpt-5.1-codex"));
        assert_eq!(session.meta.git_branch.as_deref(), Some("main"));
        assert_eq!(
            session.meta.git_repo.as_deref(),
            Some("https://github.com/u/proj.git")
        );

        assert_eq!(session.entries.len(), 5);
        assert!(matches!(
            &session.entries[0],
            LogEntry::HumanInput { text, .. } if text == "run the tests"
        ));
        assert!(matches!(
            session.entries[1],
            LogEntry::AssistantOutput {
                thinking_blocks: 1,
                usage: None,
                ..
            }
        ));
        assert!(matches!(
            &session.entries[2],
            LogEntry::ToolCallBegin { call_id, name, args, .. }
                if call_id == "call_1"
                    && name == "shell"
                    && args.command.as_deref() == Some("cargo test")
        ));
        assert!(matches!(
            &session.entries[3],
            LogEntry::ToolCallEnd { call_id, failed: None, .. } if call_id == "call_1"
        ));
        // Cumulative totals land on the final assistant output.
        assert!(matches!(
            &session.entries[4],
            LogEntry::AssistantOutput { usage: Some(usage), .. }
                if usage.input == Some(5000)
                    && usage.cache_read == Some(1200)
                    && usage.reasoning == Some(300)
        ));
    }

    #[test]
    fn injected_context_wrappers_are_not_turns() {
        let session = normalize_codex_session(records(&[
            r#"{"timestamp":"2024-03-01T08:00:00Z","type":"session_meta","payload":{"id":"sess-ctx"}}"#,
            r#"{"timestamp":"2024-03-01T08:00:01Z","type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"<environment_context>cwd: /proj</environment_context>"}]}}"#,
            r#"{"timestamp":"2024-03-01T08:00:02Z","type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"<user_instructions>be brief</user_instructions>"}]}}"#,
            r#"{"timestamp":"2024-03-01T08:00:03Z","type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"fix the parser"}]}}"#,
        ]))
        .unwrap();

        assert_eq!(session.entries.len(), 1);
        assert!(matches!(
            &session.entries[0],
            LogEntry::HumanInput { text, .. } if text == "fix the parser"
        ));
    }

    #[test]
    fn event_msg_echoes_are_skipped() {
        let session = normalize_codex_session(records(&[
            r#"{"timestamp":"2024-03-01T08:00:00Z","type":"session_meta","payload":{"id":"sess-echo"}}"#,
            r#"{"timestamp":"2024-03-01T08:00:01Z","type":"event_msg","payload":{"type":"user_message","message":"hello"}}"#,
            r#"{"timestamp":"2024-03-01T08:00:02Z","type":"event_msg","payload":{"type":"agent_message","message":"hi"}}"#,
            r#"{"timestamp":"2024-03-01T08:00:03Z","type":"event_msg","payload":{"type":"agent_reasoning","text":"because"}}"#,
        ]))
        .unwrap();
        assert!(session.entries.is_empty());
    }

    #[test]
    fn missing_session_meta_fails_the_parse() {
        let err = normalize_codex_session(records(&[
            r#"{"timestamp":"2024-03-01T08:00:02Z","type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"hi"}]}}"#,
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn totals_without_assistant_output_append_a_synthetic_entry() {
        let session = normalize_codex_session(records(&[
            r#"{"timestamp":"2024-03-01T08:00:00Z","type":"session_meta","payload":{"id":"sess-tok"}}"#,
            r#"{"timestamp":"2024-03-01T08:05:00Z","type":"event_msg","payload":{"type":"token_count","info":{"total_token_usage":{"input_tokens":100,"cached_input_tokens":0,"output_tokens":20,"reasoning_output_tokens":0,"total_tokens":120}}}}"#,
        ]))
        .unwrap();

        assert_eq!(session.entries.len(), 1);
        assert!(matches!(
            &session.entries[0],
            LogEntry::AssistantOutput { usage: Some(usage), .. } if usage.input == Some(100)
        ));
    }

    #[test]
    fn later_token_counts_replace_earlier_ones() {
        let session = normalize_codex_session(records(&[
            r#"{"timestamp":"2024-03-01T08:00:00Z","type":"session_meta","payload":{"id":"sess-two"}}"#,
            r#"{"timestamp":"2024-03-01T08:00:05Z","type":"response_item","payload":{"type":"message","role":"assistant","content":[{"type":"output_text","text":"first"}]}}"#,
            r#"{"timestamp":"2024-03-01T08:00:06Z","type":"event_msg","payload":{"type":"token_count","info":{"total_token_usage":{"input_tokens":100,"cached_input_tokens":0,"output_tokens":10,"reasoning_output_tokens":0,"total_tokens":110}}}}"#,
            r#"{"timestamp":"2024-03-01T08:00:10Z","type":"event_msg","payload":{"type":"token_count","info":{"total_token_usage":{"input_tokens":400,"cached_input_tokens":50,"output_tokens":90,"reasoning_output_tokens":5,"total_tokens":490}}}}"#,
        ]))
        .unwrap();

        assert!(matches!(
            &session.entries[0],
            LogEntry::AssistantOutput { usage: Some(usage), .. } if usage.input == Some(400)
        ));
    }

    #[test]
    fn turn_aborted_maps_to_interruption() {
        let session = normalize_codex_session(records(&[
            r#"{"timestamp":"2024-03-01T08:00:00Z","type":"session_meta","payload":{"id":"sess-abort"}}"#,
            r#"{"timestamp":"2024-03-01T08:00:30Z","type":"event_msg","payload":{"type":"turn_aborted","reason":"interrupted"}}"#,
        ]))
        .unwrap();

        assert!(matches!(
            session.entries[0],
            LogEntry::System {
                event: SystemEvent::Interruption,
                ..
            }
        ));
    }

    #[test]
    fn invalid_argument_json_degrades_to_empty_args() {
        let args = codex_call_args("{not json");
        assert_eq!(args.command, None);
        assert_eq!(args.file_path, None);
        assert_eq!(args.pattern, None);
    }
}
