use crate::extractor::CodeBlock;
use crate::scanner::LineDiagnostic;
use std::collections::BTreeMap;

/// Formats one extracted block as a single summary line.
pub fn format_block(index: usize, block: &CodeBlock) -> String {
    format!(
        "block #{}: language={} context={} span={}..{}",
        index,
        block.language.as_deref().unwrap_or("-"),
        block.context,
        block.span.start,
        block.span.end
    )
}

/// Formats one diagnostic compiler-style: `path:line: kind: message`.
pub fn format_diagnostic(path: &str, diagnostic: &LineDiagnostic) -> String {
    format!(
        "{}:{}: {}: {}",
        path, diagnostic.line, diagnostic.kind, diagnostic.message
    )
}

/// Builds a sorted `name: count` fragment like `generic: 1, host-api: 2`.
fn count_summary<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
        .iter()
        .map(|(name, count)| format!("{}: {}", name, count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Per-context statistics fragment for a batch of blocks.
pub fn block_stats(blocks: &[CodeBlock]) -> String {
    count_summary(blocks.iter().map(|b| b.context.as_str()))
}

/// Per-kind statistics fragment for a batch of diagnostics.
pub fn diagnostic_stats(diagnostics: &[LineDiagnostic]) -> String {
    count_summary(diagnostics.iter().map(|d| d.kind.as_str()))
}

/// Logs a one-line extraction summary.
pub fn log_extraction_summary(blocks: &[CodeBlock]) {
    if blocks.is_empty() {
        log::info!("no code blocks found");
    } else {
        log::info!(
            "extracted {} code block(s) ({})",
            blocks.len(),
            block_stats(blocks)
        );
    }
}

/// Logs a one-line scan summary.
pub fn log_scan_summary(diagnostics: &[LineDiagnostic]) {
    if diagnostics.is_empty() {
        log::info!("no problems found");
    } else {
        log::info!(
            "found {} problem(s) ({})",
            diagnostics.len(),
            diagnostic_stats(diagnostics)
        );
    }
}
