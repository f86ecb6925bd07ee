//! Turns a normalized session into a synthetic trace.
//!
//! The engine is pure: no IO, no clocks, no randomness. Feeding it the same
//! session twice produces byte-identical spans, which is what makes
//! re-export safe to retry.

pub mod assembler;
pub mod heuristics;
pub mod ids;
pub mod pairing;

pub use assembler::assemble;
pub use heuristics::looks_like_failure;
pub use pairing::{ResolvedCall, resolve_calls};
