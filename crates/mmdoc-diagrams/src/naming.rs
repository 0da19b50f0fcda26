//! File naming contract shared by the extractor and the rewriter.
//!
//! The two jobs never talk to each other. The extractor writes
//! `{prefix}-{kind}[-{ordinal}].png`, and the rewriter lists `{prefix}-*.png`
//! sorted lexically and maps the k-th listed image to the k-th block. The
//! ordinal is only present when a document has more than one block.
//!
//! The mapping assumes lexical order equals block order. That breaks when
//! another prefix starts with `{prefix}-`, or when a document has ten or more
//! blocks (`-10` sorts before `-2`).

use std::path::Path;

use crate::block::DiagramKind;
use crate::consts::{IMAGE_EXTENSION, SOURCE_EXTENSION};
use crate::error::DiagramError;

/// Ordinal to put in a file name, present only for multi-block documents.
#[must_use]
pub fn ordinal_suffix(ordinal: usize, block_count: usize) -> Option<usize> {
    (block_count > 1).then_some(ordinal)
}

/// Name of the artifacts produced for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    stem: String,
}

impl ArtifactName {
    /// Build the name from its parts.
    #[must_use]
    pub fn new(prefix: &str, kind: DiagramKind, ordinal: Option<usize>) -> Self {
        let stem = match ordinal {
            Some(n) => format!("{prefix}-{}-{n}", kind.as_str()),
            None => format!("{prefix}-{}", kind.as_str()),
        };
        Self { stem }
    }

    /// `{prefix}-{kind}[-{ordinal}]`
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Rendered image file name.
    #[must_use]
    pub fn image_file(&self) -> String {
        format!("{}.{IMAGE_EXTENSION}", self.stem)
    }

    /// Diagram-source file name.
    #[must_use]
    pub fn source_file(&self) -> String {
        format!("{}.{SOURCE_EXTENSION}", self.stem)
    }
}

/// List rendered images for `prefix`, sorted lexically by file name.
///
/// Returns an empty list when the output directory does not exist.
pub fn available_images(output_dir: &Path, prefix: &str) -> Result<Vec<String>, DiagramError> {
    let pattern = format!(
        "{}/{}-*.{IMAGE_EXTENSION}",
        glob::Pattern::escape(&output_dir.to_string_lossy()),
        glob::Pattern::escape(prefix)
    );

    let mut names: Vec<String> = glob::glob(&pattern)?
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .filter_map(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .collect();
    names.sort();

    Ok(names)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_ordinal_suffix() {
        assert_eq!(ordinal_suffix(1, 1), None);
        assert_eq!(ordinal_suffix(1, 2), Some(1));
        assert_eq!(ordinal_suffix(2, 2), Some(2));
    }

    #[test]
    fn test_single_block_name() {
        let name = ArtifactName::new("npc", DiagramKind::Flow, ordinal_suffix(1, 1));
        assert_eq!(name.stem(), "npc-flow");
        assert_eq!(name.image_file(), "npc-flow.png");
        assert_eq!(name.source_file(), "npc-flow.mmd");
    }

    #[test]
    fn test_multi_block_names() {
        let first = ArtifactName::new("economy", DiagramKind::Class, ordinal_suffix(1, 2));
        let second = ArtifactName::new("economy", DiagramKind::Diagram, ordinal_suffix(2, 2));
        assert_eq!(first.image_file(), "economy-class-1.png");
        assert_eq!(second.image_file(), "economy-diagram-2.png");
    }

    #[test]
    fn test_available_images_sorted_and_filtered() {
        let temp_dir = tempfile::tempdir().unwrap();
        for name in [
            "shop-diagram-2.png",
            "shop-class-1.png",
            "shop-class-1.mmd",
            "other-flow.png",
            "shopping-flow.png",
        ] {
            std::fs::write(temp_dir.path().join(name), b"x").unwrap();
        }

        let images = available_images(temp_dir.path(), "shop").unwrap();
        assert_eq!(images, vec!["shop-class-1.png", "shop-diagram-2.png"]);
    }

    #[test]
    fn test_available_images_missing_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let images = available_images(&temp_dir.path().join("missing"), "shop").unwrap();
        assert!(images.is_empty());
    }

    #[test]
    fn test_available_images_escapes_prefix() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("a[1]-flow.png"), b"x").unwrap();
        std::fs::write(temp_dir.path().join("a1-flow.png"), b"x").unwrap();

        let images = available_images(temp_dir.path(), "a[1]").unwrap();
        assert_eq!(images, vec!["a[1]-flow.png"]);
    }

    #[test]
    fn test_available_images_prefix_overlap() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("npc-flow.png"), b"x").unwrap();
        std::fs::write(temp_dir.path().join("npc-shop-flow.png"), b"x").unwrap();

        // Known limitation of the naming contract.
        let images = available_images(temp_dir.path(), "npc").unwrap();
        assert_eq!(images, vec!["npc-flow.png", "npc-shop-flow.png"]);
    }
}
