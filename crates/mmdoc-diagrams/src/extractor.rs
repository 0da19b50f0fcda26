//! Extraction of mermaid blocks into `.mmd` sources and rendered images.

use std::fs;
use std::path::{Path, PathBuf};

use crate::block::{DiagramKind, extract_blocks};
use crate::error::DiagramError;
use crate::naming::{ArtifactName, ordinal_suffix};
use crate::renderer::{DiagramRenderer, RenderError};
use crate::target::Target;

/// Failure of one block; the remaining blocks of the document still run.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// The `.mmd` source could not be written, so the renderer was not run.
    #[error(transparent)]
    Source(#[from] DiagramError),
    /// The renderer failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result of processing one block.
#[derive(Debug)]
pub struct BlockReport {
    /// 1-based position of the block in its document.
    pub ordinal: usize,
    /// Kind used in the artifact name.
    pub kind: DiagramKind,
    /// Artifact name shared by the `.mmd` source and the image.
    pub name: ArtifactName,
    /// Path of the image the renderer was asked to produce.
    pub image: PathBuf,
    /// Block result; failures are per block and do not stop the document.
    pub result: Result<(), BlockError>,
}

/// Result of processing one document.
#[derive(Debug)]
pub enum ExtractOutcome {
    /// Document does not exist.
    Missing,
    /// Document has no mermaid blocks.
    NoDiagrams,
    /// Blocks were written and rendered.
    Processed(Vec<BlockReport>),
}

impl ExtractOutcome {
    /// Number of blocks rendered successfully.
    #[must_use]
    pub fn converted(&self) -> usize {
        match self {
            Self::Processed(reports) => reports.iter().filter(|r| r.result.is_ok()).count(),
            Self::Missing | Self::NoDiagrams => 0,
        }
    }
}

/// Writes each block of a document to `{stem}.mmd` and renders `{stem}.png`.
pub struct Extractor<R> {
    output_dir: PathBuf,
    renderer: R,
}

impl<R: DiagramRenderer> Extractor<R> {
    /// Create an extractor writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, renderer: R) -> Self {
        Self {
            output_dir: output_dir.into(),
            renderer,
        }
    }

    /// Directory receiving sources and images.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Extract and render every block of `target`.
    ///
    /// Source-write and render failures are recorded per block in the
    /// returned reports.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or the output
    /// directory cannot be created.
    pub fn extract_document(&self, target: &Target) -> Result<ExtractOutcome, DiagramError> {
        if !target.document.is_file() {
            tracing::warn!(path = %target.document.display(), "Document not found");
            return Ok(ExtractOutcome::Missing);
        }

        let content = fs::read_to_string(&target.document)
            .map_err(|e| DiagramError::io(&target.document, e))?;
        let blocks = extract_blocks(&content);
        if blocks.is_empty() {
            tracing::info!(path = %target.document.display(), "No diagrams found");
            return Ok(ExtractOutcome::NoDiagrams);
        }

        fs::create_dir_all(&self.output_dir).map_err(|e| DiagramError::io(&self.output_dir, e))?;

        let count = blocks.len();
        let mut reports = Vec::with_capacity(count);
        for block in &blocks {
            let kind = DiagramKind::classify(&block.source);
            let name = ArtifactName::new(&target.prefix, kind, ordinal_suffix(block.ordinal, count));

            let source_path = self.output_dir.join(name.source_file());
            let image = self.output_dir.join(name.image_file());
            let result = self.process_block(&block.source, &source_path, &image);
            if let Err(err) = &result {
                tracing::warn!(diagram = %name.stem(), error = %err, "Diagram failed");
            }

            reports.push(BlockReport {
                ordinal: block.ordinal,
                kind,
                name,
                image,
                result,
            });
        }

        Ok(ExtractOutcome::Processed(reports))
    }

    fn process_block(
        &self,
        source: &str,
        source_path: &Path,
        image: &Path,
    ) -> Result<(), BlockError> {
        fs::write(source_path, source.trim()).map_err(|e| DiagramError::io(source_path, e))?;
        self.renderer.render(source_path, image)?;
        Ok(())
    }
}
