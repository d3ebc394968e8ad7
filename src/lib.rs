//! script-scan library
//!
//! Two independent, stateless utilities distilled from an AI-assisted script
//! editor embedded in a 3D animation host:
//!
//! - [`Extractor`] scans free-form text (chat responses, documents) for
//!   triple-backtick fenced code blocks and classifies each block's target
//!   execution context: the host's scripting API or a generic interpreter.
//! - [`Scanner`] scans script source line-by-line and reports multiple
//!   candidate syntax problems in one pass, as a complement to a
//!   compiler-style check that stops at the first error.
//!
//! Both are pure functions over immutable input text: no I/O, no shared
//! state, deterministic output, safe to call from any thread. Malformed
//! input never raises — it degrades to fewer results. The only error in the
//! library is [`ScanError::InvalidConfiguration`], raised before any
//! scanning begins.
//!
//! All host vocabulary (API marker substrings, language tags) is supplied
//! through [`ScanConfig`] rather than hardcoded, so the crate is not coupled
//! to any particular embedding host.

mod config;
mod extractor;
mod reporting;
mod scanner;

pub use config::{ScanConfig, ScanError};
pub use extractor::{Blocks, CodeBlock, Extractor, TargetContext};
pub use reporting::{
    block_stats, diagnostic_stats, format_block, format_diagnostic, log_extraction_summary,
    log_scan_summary,
};
pub use scanner::{DiagnosticKind, LineDiagnostic, Scanner};
