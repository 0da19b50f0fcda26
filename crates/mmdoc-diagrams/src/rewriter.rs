//! Rewriting of mermaid blocks into image references.
//!
//! Each block becomes an image link followed by a `<details>` section that
//! keeps the original source:
//!
//! ````text
//! ![시퀀스 다이어그램](images/npc-flow.png)
//!
//! <details>
//! <summary>📊 다이어그램 소스 코드 (AI 참조용)</summary>
//!
//! ```mermaid
//! sequenceDiagram
//! ```
//!
//! </details>
//! ````

use std::fs;
use std::path::PathBuf;

use crate::block::{DiagramBlock, DiagramCaption, extract_blocks};
use crate::consts::SOURCE_SUMMARY;
use crate::error::DiagramError;
use crate::naming::available_images;
use crate::target::Target;

/// Result of rewriting document content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    /// Rewritten document content.
    pub content: String,
    /// Number of mermaid blocks in the document.
    pub blocks: usize,
    /// Number of images available for the prefix.
    pub images: usize,
    /// Ordinals of blocks replaced, ascending.
    pub replaced: Vec<usize>,
    /// Ordinals of blocks left alone because a previous run already folded them.
    pub folded: Vec<usize>,
    /// Ordinals of blocks left alone because no image was available.
    pub unmatched: Vec<usize>,
}

impl RewriteResult {
    /// Whether any block was replaced.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.replaced.is_empty()
    }
}

/// Result of processing one document.
#[derive(Debug)]
pub enum RewriteOutcome {
    /// Document does not exist.
    Missing,
    /// Document has no mermaid blocks.
    NoDiagrams,
    /// No rendered images exist for the prefix; document untouched.
    NoImages,
    /// Nothing to replace (all blocks already folded or unmatched).
    Unchanged(RewriteResult),
    /// Document was rewritten.
    Updated(RewriteResult),
    /// Document would be rewritten (dry run).
    WouldUpdate(RewriteResult),
}

impl RewriteOutcome {
    /// Whether the document content changed (or would change in a dry run).
    #[must_use]
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Updated(_) | Self::WouldUpdate(_))
    }
}

/// Build the replacement text for one block.
#[must_use]
pub fn fold_block(block: &DiagramBlock, image_path: &str) -> String {
    let caption = DiagramCaption::classify(&block.source).description();
    format!(
        "![{caption}]({image_path})\n\n<details>\n<summary>{SOURCE_SUMMARY}</summary>\n\n```mermaid\n{}\n```\n\n</details>",
        block.source.trim()
    )
}

/// Join the image base and an image file name into a link target.
fn image_link(image_base: &str, file_name: &str) -> String {
    let base = image_base.trim_end_matches('/');
    if base.is_empty() {
        file_name.to_owned()
    } else {
        format!("{base}/{file_name}")
    }
}

/// Replace every block with its image reference and folded source.
///
/// The k-th block maps to `images[k - 1]`. Blocks without an image, and blocks
/// already folded by a previous run, are left as they are but still count
/// toward ordinals. Replacement runs from the last block to the first so
/// earlier offsets stay valid.
#[must_use]
pub fn rewrite_content(content: &str, images: &[String], image_base: &str) -> RewriteResult {
    let blocks = extract_blocks(content);
    let mut new_content = content.to_owned();
    let mut replaced = Vec::new();
    let mut folded = Vec::new();
    let mut unmatched = Vec::new();

    for block in blocks.iter().rev() {
        if block.is_folded(content) {
            folded.push(block.ordinal);
            continue;
        }
        let Some(file_name) = images.get(block.ordinal - 1) else {
            tracing::warn!(diagram = block.ordinal, "No image for diagram");
            unmatched.push(block.ordinal);
            continue;
        };

        let replacement = fold_block(block, &image_link(image_base, file_name));
        new_content.replace_range(block.start..block.end, &replacement);
        replaced.push(block.ordinal);
    }

    replaced.reverse();
    folded.reverse();
    unmatched.reverse();

    RewriteResult {
        content: new_content,
        blocks: blocks.len(),
        images: images.len(),
        replaced,
        folded,
        unmatched,
    }
}

/// Rewrites documents using images previously rendered into `output_dir`.
pub struct Rewriter {
    output_dir: PathBuf,
    dry_run: bool,
}

impl Rewriter {
    /// Create a rewriter reading images from `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            dry_run: false,
        }
    }

    /// Compute outcomes without writing documents.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Rewrite one document in place.
    ///
    /// The document is written only when at least one block was replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or written, or the
    /// image listing fails.
    pub fn rewrite_document(&self, target: &Target) -> Result<RewriteOutcome, DiagramError> {
        if !target.document.is_file() {
            tracing::warn!(path = %target.document.display(), "Document not found");
            return Ok(RewriteOutcome::Missing);
        }

        let content = fs::read_to_string(&target.document)
            .map_err(|e| DiagramError::io(&target.document, e))?;
        if extract_blocks(&content).is_empty() {
            tracing::info!(path = %target.document.display(), "No diagrams found");
            return Ok(RewriteOutcome::NoDiagrams);
        }

        let images = available_images(&self.output_dir, &target.prefix)?;
        if images.is_empty() {
            tracing::warn!(prefix = %target.prefix, "No images found");
            return Ok(RewriteOutcome::NoImages);
        }

        let result = rewrite_content(&content, &images, &target.image_base);
        if !result.changed() {
            return Ok(RewriteOutcome::Unchanged(result));
        }
        if self.dry_run {
            return Ok(RewriteOutcome::WouldUpdate(result));
        }

        fs::write(&target.document, &result.content)
            .map_err(|e| DiagramError::io(&target.document, e))?;
        tracing::debug!(path = %target.document.display(), replaced = result.replaced.len(), "Document rewritten");

        Ok(RewriteOutcome::Updated(result))
    }
}
