//! Mermaid block scanning and classification.
//!
//! A block is a ```` ```mermaid ```` fence opened by a marker line and closed by
//! the next ```` ``` ````. Content between the markers is opaque.

use std::sync::LazyLock;

use regex::Regex;

use crate::consts::SOURCE_SUMMARY;

static MERMAID_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```mermaid\n(.*?)```").unwrap());

/// A mermaid block found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    /// Raw text between the opening marker line and the closing fence.
    pub source: String,
    /// Byte offset of the opening marker.
    pub start: usize,
    /// Byte offset just past the closing fence.
    pub end: usize,
    /// 1-based order of appearance in the document.
    pub ordinal: usize,
}

impl DiagramBlock {
    /// Whether this block is the retained source of an already rewritten diagram.
    ///
    /// Rewritten blocks sit directly below the `<details>` and source summary
    /// lines written by the rewriter. A `<details>` section with any other
    /// summary belongs to the author and its blocks are not folded.
    #[must_use]
    pub fn is_folded(&self, content: &str) -> bool {
        let marker = format!("<details>\n<summary>{SOURCE_SUMMARY}</summary>");
        content
            .get(..self.start)
            .is_some_and(|before| before.trim_end().ends_with(&marker))
    }
}

/// Find all mermaid blocks in a single linear scan.
#[must_use]
pub fn extract_blocks(content: &str) -> Vec<DiagramBlock> {
    MERMAID_BLOCK_RE
        .captures_iter(content)
        .enumerate()
        .filter_map(|(i, caps)| {
            let whole = caps.get(0)?;
            let source = caps.get(1)?;
            Some(DiagramBlock {
                source: source.as_str().to_owned(),
                start: whole.start(),
                end: whole.end(),
                ordinal: i + 1,
            })
        })
        .collect()
}

/// Diagram kind used in artifact file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramKind {
    /// Sequence diagrams (`sequenceDiagram`).
    Flow,
    /// Class diagrams (`classDiagram`).
    Class,
    /// Anything else.
    Diagram,
}

impl DiagramKind {
    /// Classify by keyword; the first matching keyword wins.
    #[must_use]
    pub fn classify(source: &str) -> Self {
        if source.contains("sequenceDiagram") {
            Self::Flow
        } else if source.contains("classDiagram") {
            Self::Class
        } else {
            Self::Diagram
        }
    }

    /// Name used in file names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flow => "flow",
            Self::Class => "class",
            Self::Diagram => "diagram",
        }
    }
}

/// Caption category used for image alt text.
///
/// Independent of [`DiagramKind`]: graphs and flowcharts get their own caption
/// even though they share the generic file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramCaption {
    Sequence,
    Class,
    Structure,
    Generic,
}

impl DiagramCaption {
    /// Classify by keyword; the first matching keyword wins.
    #[must_use]
    pub fn classify(source: &str) -> Self {
        if source.contains("sequenceDiagram") {
            Self::Sequence
        } else if source.contains("classDiagram") {
            Self::Class
        } else if source.contains("graph") || source.contains("flowchart") {
            Self::Structure
        } else {
            Self::Generic
        }
    }

    /// Alt text for the image reference.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Sequence => "시퀀스 다이어그램",
            Self::Class => "클래스 다이어그램",
            Self::Structure => "시스템 구조도",
            Self::Generic => "다이어그램",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_extract_single_block() {
        let content = "# Title\n\n```mermaid\nsequenceDiagram\n  A->>B: hi\n```\n\nAfter\n";
        let blocks = extract_blocks(content);

        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.source, "sequenceDiagram\n  A->>B: hi\n");
        assert_eq!(block.ordinal, 1);
        assert_eq!(&content[block.start..block.end], "```mermaid\nsequenceDiagram\n  A->>B: hi\n```");
    }

    #[test]
    fn test_extract_multiple_blocks_in_order() {
        let content = "```mermaid\nclassDiagram\n```\ntext\n```mermaid\ngraph TD\n```\n";
        let blocks = extract_blocks(content);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].source, "classDiagram\n");
        assert_eq!(blocks[0].ordinal, 1);
        assert_eq!(blocks[1].source, "graph TD\n");
        assert_eq!(blocks[1].ordinal, 2);
        assert!(blocks[0].end <= blocks[1].start);
    }

    #[test]
    fn test_extract_ignores_other_fences() {
        let content = "```rust\nfn main() {}\n```\n\n```plantuml\n@startuml\n@enduml\n```\n";
        assert!(extract_blocks(content).is_empty());
    }

    #[test]
    fn test_extract_requires_newline_after_marker() {
        assert!(extract_blocks("```mermaid graph TD```").is_empty());
    }

    #[test]
    fn test_extract_unclosed_block() {
        assert!(extract_blocks("```mermaid\ngraph TD\n  A-->B\n").is_empty());
    }

    #[test]
    fn test_extract_multibyte_offsets() {
        let content = "설명\n```mermaid\ngraph LR\n  가-->나\n```\n";
        let blocks = extract_blocks(content);

        assert_eq!(blocks.len(), 1);
        assert!(content[blocks[0].start..].starts_with("```mermaid"));
        assert!(content[..blocks[0].end].ends_with("```"));
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(DiagramKind::classify("sequenceDiagram\nA->>B: x"), DiagramKind::Flow);
        assert_eq!(DiagramKind::classify("classDiagram\nclass A"), DiagramKind::Class);
        assert_eq!(DiagramKind::classify("graph TD\nA-->B"), DiagramKind::Diagram);
        assert_eq!(DiagramKind::classify("flowchart LR"), DiagramKind::Diagram);
    }

    #[test]
    fn test_kind_first_keyword_wins() {
        let source = "classDiagram\n%% see sequenceDiagram for flow";
        assert_eq!(DiagramKind::classify(source), DiagramKind::Flow);
    }

    #[test]
    fn test_kind_as_str() {
        assert_eq!(DiagramKind::Flow.as_str(), "flow");
        assert_eq!(DiagramKind::Class.as_str(), "class");
        assert_eq!(DiagramKind::Diagram.as_str(), "diagram");
    }

    #[test]
    fn test_caption_classification() {
        let cases = [
            ("sequenceDiagram", DiagramCaption::Sequence, "시퀀스 다이어그램"),
            ("classDiagram", DiagramCaption::Class, "클래스 다이어그램"),
            ("graph TD", DiagramCaption::Structure, "시스템 구조도"),
            ("flowchart LR", DiagramCaption::Structure, "시스템 구조도"),
            ("erDiagram", DiagramCaption::Generic, "다이어그램"),
        ];

        for (source, expected, description) in cases {
            let caption = DiagramCaption::classify(source);
            assert_eq!(caption, expected, "Wrong caption for {source}");
            assert_eq!(caption.description(), description);
        }
    }

    #[test]
    fn test_folded_detection() {
        let content = format!(
            "<details>\n<summary>{SOURCE_SUMMARY}</summary>\n\n```mermaid\ngraph TD\n```\n</details>\n\n```mermaid\ngraph LR\n```\n"
        );
        let blocks = extract_blocks(&content);

        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].is_folded(&content));
        assert!(!blocks[1].is_folded(&content));
    }

    #[test]
    fn test_author_details_is_not_folded() {
        let content = "<details>\n<summary>src</summary>\n\n```mermaid\ngraph TD\n```\n</details>\n";
        let blocks = extract_blocks(content);

        assert_eq!(blocks.len(), 1);
        assert!(!blocks[0].is_folded(content));
    }
}
