//! Pairs tool call begin/end entries into resolved calls.

use std::collections::HashMap;

use tracesmith_types::{CallArgs, LogEntry, TimestampNs};

use crate::heuristics::looks_like_failure;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCall {
    pub call_id: String,
    pub name: String,
    pub args: CallArgs,
    pub start: TimestampNs,
    pub end: TimestampNs,
    pub failed: bool,
    pub output: String,
}

/// Resolve calls in begin order. A begin without a matching end becomes a
/// zero-duration call; an end without a begin is dropped. Classification
/// uses the provider's explicit flag when present, the output heuristics
/// otherwise.
pub fn resolve_calls(entries: &[LogEntry]) -> Vec<ResolvedCall> {
    let mut ends: HashMap<&str, (TimestampNs, Option<bool>, &str)> = HashMap::new();
    for entry in entries {
        if let LogEntry::ToolCallEnd {
            ts,
            call_id,
            failed,
            output,
        } = entry
        {
            ends.entry(call_id.as_str())
                .or_insert((*ts, *failed, output.as_str()));
        }
    }

    let mut calls = Vec::new();
    for entry in entries {
        let LogEntry::ToolCallBegin {
            ts,
            call_id,
            name,
            args,
        } = entry
        else {
            continue;
        };
        let call = match ends.get(call_id.as_str()) {
            Some((end_ts, failed, output)) => ResolvedCall {
                call_id: call_id.clone(),
                name: name.clone(),
                args: args.clone(),
                start: *ts,
                end: *end_ts,
                failed: failed.unwrap_or_else(|| looks_like_failure(output)),
                output: (*output).to_string(),
            },
            None => ResolvedCall {
                call_id: call_id.clone(),
                name: name.clone(),
                args: args.clone(),
                start: *ts,
                end: *ts,
                failed: false,
                output: String::new(),
            },
        };
        calls.push(call);
    }
    calls
}
