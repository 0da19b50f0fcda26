//! Runs the extractor and then the rewriter over the same documents.

use std::fs;
use std::path::Path;

use mmdoc_diagrams::{
    DiagramRenderer, ExtractOutcome, Extractor, RenderError, RewriteOutcome, Rewriter, Target,
};
use pretty_assertions::assert_eq;

struct TouchRenderer;

impl DiagramRenderer for TouchRenderer {
    fn render(&self, _input: &Path, output: &Path) -> Result<(), RenderError> {
        fs::write(output, b"\x89PNG").map_err(RenderError::Wait)
    }
}

#[test]
fn test_extract_then_rewrite() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    let out = root.join("docs/images/diagrams");

    fs::create_dir_all(root.join("guide")).unwrap();
    fs::write(
        root.join("guide/README.md"),
        "# Shop\n\n```mermaid\nclassDiagram\n  class Shop\n```\n\nBetween\n\n```mermaid\nflowchart LR\n  A-->B\n```\n",
    )
    .unwrap();

    let targets = vec![
        Target::new(root.join("guide/README.md"), "shop", "../docs/images/diagrams"),
        Target::new(root.join("MISSING.md"), "missing", "docs/images/diagrams"),
    ];

    let extractor = Extractor::new(&out, TouchRenderer);
    let converted: usize = targets
        .iter()
        .map(|t| extractor.extract_document(t).unwrap().converted())
        .sum();
    assert_eq!(converted, 2);
    assert!(out.join("shop-class-1.png").exists());
    assert!(out.join("shop-diagram-2.png").exists());
    assert!(!out.join("missing-diagram.png").exists());

    let rewriter = Rewriter::new(&out);
    let outcomes: Vec<_> = targets
        .iter()
        .map(|t| rewriter.rewrite_document(t).unwrap())
        .collect();
    assert!(matches!(outcomes[0], RewriteOutcome::Updated(_)));
    assert!(matches!(outcomes[1], RewriteOutcome::Missing));

    let rewritten = fs::read_to_string(root.join("guide/README.md")).unwrap();
    let class_pos = rewritten
        .find("![클래스 다이어그램](../docs/images/diagrams/shop-class-1.png)")
        .unwrap();
    let graph_pos = rewritten
        .find("![시스템 구조도](../docs/images/diagrams/shop-diagram-2.png)")
        .unwrap();
    assert!(class_pos < graph_pos);

    // Second runs: extraction re-renders the folded sources under the same
    // names, rewriting changes nothing.
    let again = extractor.extract_document(&targets[0]).unwrap();
    let ExtractOutcome::Processed(reports) = again else {
        panic!("Expected Processed outcome");
    };
    let stems: Vec<_> = reports.iter().map(|r| r.name.stem().to_owned()).collect();
    assert_eq!(stems, vec!["shop-class-1", "shop-diagram-2"]);

    let outcome = rewriter.rewrite_document(&targets[0]).unwrap();
    assert!(matches!(outcome, RewriteOutcome::Unchanged(_)));
    assert_eq!(
        fs::read_to_string(root.join("guide/README.md")).unwrap(),
        rewritten
    );
}
