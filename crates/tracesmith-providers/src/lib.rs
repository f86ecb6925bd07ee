//! Provider-specific session log extractors.
//!
//! Each provider module knows how to locate, decode, and normalize one CLI
//! agent's session logs into the shared [`tracesmith_types::NormalizedSession`]
//! model. Everything downstream (pairing, span assembly, export) is provider
//! agnostic.

pub mod claude;
pub mod codex;
pub mod gemini;

mod error;
mod registry;
mod traits;

pub use error::{Error, Result};
pub use registry::{
    PROVIDERS, ProviderMetadata, default_log_root, detect_provider, expand_home_path,
    provider_metadata,
};
pub use traits::{LogDiscovery, ProbeResult, ProviderAdapter, SessionExtractor};
