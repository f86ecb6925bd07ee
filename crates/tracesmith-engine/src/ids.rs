//! Span and trace identity derivation.
//!
//! Identifiers are synthesized from session content, never random, so the
//! same log always yields the same trace. Per-category span ids are spaced
//! 0x1000 apart, which is unambiguous up to 4096 spans per category;
//! ordinals beyond that would run into the next range. Real sessions stay
//! orders of magnitude below the limit.

pub const ROOT_SPAN_ID: &str = "0000000000000001";
pub const META_SPAN_ID: &str = "0000000000000002";

const TOOL_SPAN_BASE: u64 = 0x1000;
const SUB_TOOL_SPAN_BASE: u64 = 0x2000;
const AGENT_SPAN_BASE: u64 = 0x3000;
const COMPACTION_SPAN_BASE: u64 = 0x4000;

/// Derive the trace id from the session id: lowercase, separators stripped.
pub fn trace_id(session_id: &str) -> String {
    session_id
        .to_lowercase()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect()
}

pub fn tool_span_id(ordinal: usize) -> String {
    span_id(TOOL_SPAN_BASE, ordinal)
}

pub fn sub_tool_span_id(ordinal: usize) -> String {
    span_id(SUB_TOOL_SPAN_BASE, ordinal)
}

pub fn agent_span_id(ordinal: usize) -> String {
    span_id(AGENT_SPAN_BASE, ordinal)
}

pub fn compaction_span_id(ordinal: usize) -> String {
    span_id(COMPACTION_SPAN_BASE, ordinal)
}

fn span_id(base: u64, ordinal: usize) -> String {
    format!("{:016x}", base + ordinal as u64)
}
