use crate::config::{ScanConfig, ScanError};
use once_cell::sync::Lazy;
use regex::{CaptureMatches, Regex};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Pairs triple-backtick fences: an optional bare identifier after the
/// opening fence, a newline, then a non-greedy body up to the next fence.
/// An unclosed opening fence never matches, so it yields no block.
static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(\w+)?\r?\n(.*?)```").expect("fence pattern should be valid"));

/// Target execution context derived for an extracted block.
///
/// `HostApi` means the block is meant for the embedding application's
/// command namespace (its interpreter, not a plain one). Which vocabulary
/// triggers that is entirely [`ScanConfig`]-supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetContext {
    /// References the host's scripting API, or carries a host language tag.
    HostApi,
    /// No host vocabulary detected.
    Generic,
}

impl TargetContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetContext::HostApi => "host-api",
            TargetContext::Generic => "generic",
        }
    }
}

impl fmt::Display for TargetContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A code block extracted from free-form text with its metadata.
///
/// Blocks are identified by fenced code syntax, the way chat responses and
/// markdown carry them:
///
/// ````markdown
/// ```python
/// print("hi")
/// ```
/// ````
///
/// The tag after the opening fence is optional; `language` is `None` when it
/// is missing, never `Some("")`. `body` is the raw text between the fences,
/// unmodified. `span` is the byte range of the whole block (fences included)
/// in the scanned text, so `"```" + tag + "\n" + body + "```"` reproduces
/// `&text[span]` exactly for `\n` line endings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// The language tag from the opening fence, if one was present.
    pub language: Option<String>,
    /// The raw block content between the fences.
    pub body: String,
    /// Where this block should execute.
    pub context: TargetContext,
    /// Byte range of the whole fenced block in the scanned text.
    pub span: Range<usize>,
}

/// Extracts fenced code blocks from free-form text and classifies them.
///
/// The extractor is a pure function over its input: no I/O, no shared
/// state, deterministic output. It is cheap to construct and may be shared
/// across threads.
///
/// # Example
///
/// ```
/// use script_scan::{Extractor, ScanConfig, TargetContext};
///
/// let extractor = Extractor::new(ScanConfig::default()).unwrap();
/// let blocks = extractor.extract("```python\nprint(\"hi\")\n```");
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].language.as_deref(), Some("python"));
/// assert_eq!(blocks[0].body, "print(\"hi\")\n");
/// assert_eq!(blocks[0].context, TargetContext::Generic);
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ScanConfig,
}

impl Extractor {
    /// Creates an extractor, validating the configuration first.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidConfiguration`] for a config that fails
    /// [`ScanConfig::validate`].
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns a lazy iterator over the blocks in `text`, in source order.
    ///
    /// The sequence is finite and restartable: calling `blocks` again on the
    /// same text yields the same sequence. Unclosed fences contribute no
    /// block and are never an error.
    pub fn blocks<'e, 't>(&'e self, text: &'t str) -> Blocks<'e, 't> {
        Blocks {
            captures: FENCE_RE.captures_iter(text),
            extractor: self,
        }
    }

    /// Extracts all blocks from `text` into a `Vec`, in source order.
    pub fn extract(&self, text: &str) -> Vec<CodeBlock> {
        self.blocks(text).collect()
    }

    /// Classifies a block by its language tag and body.
    ///
    /// `HostApi` if the body contains any configured host-API marker
    /// substring, or the tag matches a configured language tag
    /// ASCII-case-insensitively; `Generic` otherwise.
    pub fn classify(&self, language: Option<&str>, body: &str) -> TargetContext {
        if self
            .config
            .host_api_markers
            .iter()
            .any(|marker| body.contains(marker.as_str()))
        {
            return TargetContext::HostApi;
        }
        if let Some(tag) = language {
            if self
                .config
                .language_tags
                .iter()
                .any(|known| known.eq_ignore_ascii_case(tag))
            {
                return TargetContext::HostApi;
            }
        }
        TargetContext::Generic
    }
}

/// Lazy iterator over the fenced code blocks of one text.
///
/// Produced by [`Extractor::blocks`].
pub struct Blocks<'e, 't> {
    captures: CaptureMatches<'static, 't>,
    extractor: &'e Extractor,
}

impl Iterator for Blocks<'_, '_> {
    type Item = CodeBlock;

    fn next(&mut self) -> Option<CodeBlock> {
        let caps = self.captures.next()?;
        let whole = caps.get(0)?;
        let language = caps.get(1).map(|m| m.as_str().to_string());
        let body = caps.get(2).map(|m| m.as_str()).unwrap_or_default().to_string();
        let context = self.extractor.classify(language.as_deref(), &body);
        Some(CodeBlock {
            language,
            body,
            context,
            span: whole.range(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(config: ScanConfig) -> Extractor {
        Extractor::new(config).unwrap()
    }

    fn with_markers(markers: &[&str]) -> Extractor {
        let mut config = ScanConfig::default();
        for m in markers {
            config.host_api_markers.insert(m.to_string());
        }
        extractor(config)
    }

    fn with_tags(tags: &[&str]) -> Extractor {
        let mut config = ScanConfig::default();
        for t in tags {
            config.language_tags.insert(t.to_string());
        }
        extractor(config)
    }

    #[test]
    fn test_extract_simple_block() {
        let blocks = extractor(ScanConfig::default()).extract("```python\nprint(\"hi\")\n```");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language.as_deref(), Some("python"));
        assert_eq!(blocks[0].body, "print(\"hi\")\n");
        assert_eq!(blocks[0].context, TargetContext::Generic);
    }

    #[test]
    fn test_untagged_block_classified_by_marker() {
        let blocks = with_markers(&["cmds."]).extract("```\ncmds.polyCube()\n```");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, None);
        assert_eq!(blocks[0].body, "cmds.polyCube()\n");
        assert_eq!(blocks[0].context, TargetContext::HostApi);
    }

    #[test]
    fn test_language_tag_match_is_case_insensitive() {
        let blocks = with_tags(&["mel"]).extract("```MEL\npolyCube;\n```");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language.as_deref(), Some("MEL"));
        assert_eq!(blocks[0].context, TargetContext::HostApi);
    }

    #[test]
    fn test_marker_match_is_case_sensitive() {
        let blocks = with_markers(&["cmds."]).extract("```\nCMDS.polyCube()\n```");
        assert_eq!(blocks[0].context, TargetContext::Generic);
    }

    #[test]
    fn test_multiple_blocks_in_source_order() {
        let text = "intro\n```python\na = 1\n```\nmiddle\n```mel\npolyCube;\n```\noutro\n";
        let blocks = with_tags(&["mel"]).extract(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].language.as_deref(), Some("python"));
        assert_eq!(blocks[0].context, TargetContext::Generic);
        assert_eq!(blocks[1].language.as_deref(), Some("mel"));
        assert_eq!(blocks[1].context, TargetContext::HostApi);
    }

    #[test]
    fn test_unclosed_fence_yields_no_block() {
        let blocks = extractor(ScanConfig::default()).extract("```python\nx = 1\n");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_unclosed_trailing_fence_after_closed_block() {
        let text = "```python\na = 1\n```\n\n```python\ndangling";
        let blocks = extractor(ScanConfig::default()).extract(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body, "a = 1\n");
    }

    #[test]
    fn test_no_fences_yields_empty_sequence() {
        let blocks = extractor(ScanConfig::default()).extract("just prose, no code here");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_empty_body_still_emitted() {
        let blocks = extractor(ScanConfig::default()).extract("```\n```");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, None);
        assert_eq!(blocks[0].body, "");
    }

    #[test]
    fn test_non_identifier_info_line_is_not_a_block() {
        let blocks = extractor(ScanConfig::default()).extract("```c++ junk\nint x;\n```");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_crlf_after_tag_accepted() {
        let blocks = extractor(ScanConfig::default()).extract("```python\r\nx = 1\r\n```");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language.as_deref(), Some("python"));
        assert_eq!(blocks[0].body, "x = 1\r\n");
    }

    #[test]
    fn test_span_round_trips_exactly() {
        let text = "before\n```mel\npolyCube;\n```\nafter\n```\nplain\n```\n";
        let blocks = extractor(ScanConfig::default()).extract(text);
        assert_eq!(blocks.len(), 2);
        for block in &blocks {
            let rebuilt = format!(
                "```{}\n{}```",
                block.language.as_deref().unwrap_or(""),
                block.body
            );
            assert_eq!(&text[block.span.clone()], rebuilt);
        }
    }

    #[test]
    fn test_blocks_iterator_is_restartable() {
        let text = "```a\nx\n``` and ```b\ny\n```";
        let ex = extractor(ScanConfig::default());
        let first: Vec<_> = ex.blocks(text).collect();
        let second: Vec<_> = ex.blocks(text).collect();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_fences_pair_mid_line() {
        let blocks = extractor(ScanConfig::default()).extract("see ```py\nx = 1\n``` for details");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language.as_deref(), Some("py"));
    }

    #[test]
    fn test_invalid_config_rejected_before_scanning() {
        let config = ScanConfig {
            indent_unit: 0,
            ..ScanConfig::default()
        };
        assert!(matches!(
            Extractor::new(config),
            Err(ScanError::InvalidConfiguration(_))
        ));
    }
}
