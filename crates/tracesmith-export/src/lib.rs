//! OTLP/JSON export over a detached transmitter.
//!
//! `otlp` maps assembled spans onto the OTLP JSON wire shape, `sender`
//! ships a batch without making the caller wait, `transmit` is the body
//! of the hidden subcommand doing the actual POST, and `metrics` carries
//! one-shot operational counters over the same path.

pub mod config;
pub mod metrics;
pub mod otlp;
pub mod sender;
pub mod transmit;

pub use config::{DEFAULT_ENDPOINT, ExportConfig, resolve_endpoint};
pub use metrics::emit_counter;
pub use otlp::{TraceBatch, build_batch};
pub use sender::{export_spans, send_spans};
pub use transmit::transmit_from_stdin;
