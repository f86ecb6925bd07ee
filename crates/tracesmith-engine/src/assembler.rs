//! Builds the span tree for a session.
//!
//! The tree is always single-level: one root session span, and one child
//! per metadata block, resolved tool call, sub-tool completion, agent run
//! group, and compaction event. Output order and ids are fixed so the same
//! session always serializes to the same bytes.

use tracesmith_types::{
    LogEntry, MAX_ARG_LEN, ProgressEvent, SessionMeta, Span, SpanStatus, SystemEvent, TimestampNs,
    TokenTotals, truncate,
};

use crate::ids;
use crate::pairing::{ResolvedCall, resolve_calls};

const UNKNOWN: &str = "unknown";

pub fn assemble(meta: &SessionMeta, entries: &[LogEntry]) -> Vec<Span> {
    let trace_id = ids::trace_id(&meta.session_id);
    let provider = meta.provider.slug();

    let (root_start, root_end) = session_window(entries);
    let calls = resolve_calls(entries);

    let mut tokens = TokenTotals::default();
    let mut human_turns = 0u64;
    let mut thinking_blocks = 0u64;
    let mut compactions = 0u64;
    let mut interruptions = 0u64;
    let mut termination_reason: Option<&str> = None;
    for entry in entries {
        match entry {
            LogEntry::HumanInput { .. } => human_turns += 1,
            LogEntry::AssistantOutput {
                thinking_blocks: blocks,
                usage,
                stop_reason,
                ..
            } => {
                thinking_blocks += u64::from(*blocks);
                if let Some(usage) = usage {
                    tokens.accumulate(usage);
                }
                if let Some(reason) = stop_reason.as_deref() {
                    termination_reason = Some(reason);
                }
            }
            LogEntry::System {
                event: SystemEvent::Compaction,
                ..
            } => compactions += 1,
            LogEntry::System {
                event: SystemEvent::Interruption,
                ..
            } => interruptions += 1,
            _ => {}
        }
    }
    let tool_errors = calls.iter().filter(|c| c.failed).count() as u64;

    let mut spans = Vec::new();

    let mut root_attrs: Vec<(String, String)> = Vec::new();
    push_attr(&mut root_attrs, "session.id", meta.session_id.clone());
    push_attr(&mut root_attrs, "provider", provider);
    if let Some(model) = meta.model.as_deref() {
        push_attr(&mut root_attrs, "model", model);
    }
    push_attr(
        &mut root_attrs,
        "git.branch",
        meta.git_branch.as_deref().unwrap_or(UNKNOWN),
    );
    push_attr(
        &mut root_attrs,
        "git.repository",
        meta.git_repo.as_deref().unwrap_or(UNKNOWN),
    );
    for (key, value) in [
        ("tokens.input", tokens.input),
        ("tokens.output", tokens.output),
        ("tokens.cache_read", tokens.cache_read),
        ("tokens.cache_write", tokens.cache_write),
        ("tokens.reasoning", tokens.reasoning),
    ] {
        if let Some(value) = value {
            push_attr(&mut root_attrs, key, value.to_string());
        }
    }
    push_attr(&mut root_attrs, "tool.calls", calls.len().to_string());
    push_attr(&mut root_attrs, "tool.errors", tool_errors.to_string());
    push_attr(&mut root_attrs, "turns.human", human_turns.to_string());
    push_attr(
        &mut root_attrs,
        "thinking.blocks",
        thinking_blocks.to_string(),
    );
    push_attr(&mut root_attrs, "compactions", compactions.to_string());
    if let Some(reason) = termination_reason {
        push_attr(&mut root_attrs, "termination.reason", reason);
    }
    if interruptions >= 1 {
        push_attr(&mut root_attrs, "interrupted", "true");
        push_attr(&mut root_attrs, "interruptions", interruptions.to_string());
    }

    spans.push(Span {
        trace_id: trace_id.clone(),
        span_id: ids::ROOT_SPAN_ID.to_string(),
        parent_span_id: None,
        name: format!("{provider}.session"),
        start_ns: root_start,
        end_ns: root_end,
        status: SpanStatus::Ok,
        attributes: root_attrs,
    });

    let mut meta_attrs: Vec<(String, String)> = Vec::new();
    push_attr(&mut meta_attrs, "session.id", meta.session_id.clone());
    push_attr(&mut meta_attrs, "provider", provider);
    push_attr(
        &mut meta_attrs,
        "model",
        meta.model.as_deref().unwrap_or(UNKNOWN),
    );
    push_attr(
        &mut meta_attrs,
        "git.branch",
        meta.git_branch.as_deref().unwrap_or(UNKNOWN),
    );
    push_attr(
        &mut meta_attrs,
        "git.repository",
        meta.git_repo.as_deref().unwrap_or(UNKNOWN),
    );
    spans.push(Span {
        trace_id: trace_id.clone(),
        span_id: ids::META_SPAN_ID.to_string(),
        parent_span_id: Some(ids::ROOT_SPAN_ID.to_string()),
        name: format!("{provider}.session.meta"),
        start_ns: root_start,
        end_ns: root_start,
        status: SpanStatus::Ok,
        attributes: meta_attrs,
    });

    for (ordinal, call) in calls.iter().enumerate() {
        spans.push(tool_span(&trace_id, provider, ordinal, call));
    }

    let mut sub_tools = 0usize;
    for entry in entries {
        if let LogEntry::Progress {
            ts,
            event: ProgressEvent::SubToolCompleted { name, elapsed_ms },
        } = entry
        {
            // Completion reports the elapsed time, so the start is derived
            // backwards from it.
            let start = ts.minus_millis(*elapsed_ms);
            spans.push(Span {
                trace_id: trace_id.clone(),
                span_id: ids::sub_tool_span_id(sub_tools),
                parent_span_id: Some(ids::ROOT_SPAN_ID.to_string()),
                name: format!("{provider}.mcp.{name}"),
                start_ns: start,
                end_ns: *ts,
                status: SpanStatus::Ok,
                attributes: vec![("call.elapsed_ms".to_string(), elapsed_ms.to_string())],
            });
            sub_tools += 1;
        }
    }

    let mut agent_groups: Vec<(String, Option<(TimestampNs, TimestampNs)>)> = Vec::new();
    for entry in entries {
        if let LogEntry::Progress {
            ts,
            event: ProgressEvent::AgentRun { agent_id },
        } = entry
        {
            let idx = match agent_groups.iter().position(|(id, _)| id == agent_id) {
                Some(idx) => idx,
                None => {
                    agent_groups.push((agent_id.clone(), None));
                    agent_groups.len() - 1
                }
            };
            if ts.is_known() {
                let window = &mut agent_groups[idx].1;
                *window = Some(match *window {
                    None => (*ts, *ts),
                    Some((lo, hi)) => (lo.min(*ts), hi.max(*ts)),
                });
            }
        }
    }
    for (ordinal, (agent_id, window)) in agent_groups.iter().enumerate() {
        let (start, end) = window.unwrap_or((TimestampNs::UNKNOWN, TimestampNs::UNKNOWN));
        spans.push(Span {
            trace_id: trace_id.clone(),
            span_id: ids::agent_span_id(ordinal),
            parent_span_id: Some(ids::ROOT_SPAN_ID.to_string()),
            name: format!("{provider}.agent.{agent_id}"),
            start_ns: start,
            end_ns: end,
            status: SpanStatus::Ok,
            attributes: vec![("agent.id".to_string(), agent_id.clone())],
        });
    }

    let mut compaction_ordinal = 0usize;
    for entry in entries {
        if let LogEntry::System {
            ts,
            event: SystemEvent::Compaction,
        } = entry
        {
            spans.push(Span {
                trace_id: trace_id.clone(),
                span_id: ids::compaction_span_id(compaction_ordinal),
                parent_span_id: Some(ids::ROOT_SPAN_ID.to_string()),
                name: format!("{provider}.compaction"),
                start_ns: *ts,
                end_ns: *ts,
                status: SpanStatus::Ok,
                attributes: Vec::new(),
            });
            compaction_ordinal += 1;
        }
    }

    spans
}

fn tool_span(trace_id: &str, provider: &str, ordinal: usize, call: &ResolvedCall) -> Span {
    let (start, end) = clamp_window(call.start, call.end);
    let mut attrs: Vec<(String, String)> = Vec::new();
    push_attr(&mut attrs, "call.id", call.call_id.clone());
    if let Some(command) = call.args.command.as_deref() {
        push_attr(&mut attrs, "tool.command", command);
    }
    if let Some(file_path) = call.args.file_path.as_deref() {
        push_attr(&mut attrs, "tool.file_path", file_path);
    }
    if let Some(pattern) = call.args.pattern.as_deref() {
        push_attr(&mut attrs, "tool.pattern", pattern);
    }
    if call.failed && !call.output.is_empty() {
        push_attr(&mut attrs, "error.snippet", truncate(&call.output, MAX_ARG_LEN));
    }
    Span {
        trace_id: trace_id.to_string(),
        span_id: ids::tool_span_id(ordinal),
        parent_span_id: Some(ids::ROOT_SPAN_ID.to_string()),
        name: format!("{provider}.tool.{}", call.name),
        start_ns: start,
        end_ns: end,
        status: if call.failed {
            SpanStatus::Error
        } else {
            SpanStatus::Ok
        },
        attributes: attrs,
    }
}

/// Root window over the known entry timestamps. A session with no usable
/// timestamps collapses to a zero-duration trace at the epoch rather than
/// failing.
fn session_window(entries: &[LogEntry]) -> (TimestampNs, TimestampNs) {
    let mut window: Option<(TimestampNs, TimestampNs)> = None;
    for entry in entries {
        let ts = entry.ts();
        if !ts.is_known() {
            continue;
        }
        window = Some(match window {
            None => (ts, ts),
            Some((lo, hi)) => (lo.min(ts), hi.max(ts)),
        });
    }
    window.unwrap_or((TimestampNs::UNKNOWN, TimestampNs::UNKNOWN))
}

/// Spans never end before they start; degenerate inputs collapse to zero
/// duration at whichever edge is usable.
fn clamp_window(start: TimestampNs, end: TimestampNs) -> (TimestampNs, TimestampNs) {
    if !start.is_known() {
        return (end, end);
    }
    if !end.is_known() || end < start {
        return (start, start);
    }
    (start, end)
}

fn push_attr(attrs: &mut Vec<(String, String)>, key: &str, value: impl Into<String>) {
    attrs.push((key.to_string(), value.into()));
}
