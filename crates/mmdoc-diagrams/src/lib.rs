//! Mermaid diagram extraction and doc rewriting for mmdoc.
//!
//! This crate provides two independent batch jobs over markdown documents:
//! - [`Extractor`] writes every ```` ```mermaid ```` block to a `.mmd` file and
//!   renders it to PNG through an external [`DiagramRenderer`]
//! - [`Rewriter`] replaces each block with an image reference plus a
//!   collapsible section that keeps the source
//!
//! The jobs only share the file naming contract in [`naming`].
//!
//! # Architecture
//!
//! - [`block`]: block scanning and keyword classification
//! - [`naming`]: `{prefix}-{kind}[-{ordinal}]` artifact names and image listing
//! - [`renderer`]: `DiagramRenderer` trait and the `mmdc` implementation
//! - [`extractor`]: extraction job
//! - [`rewriter`]: rewriting job
//!
//! # Example
//!
//! ```ignore
//! use mmdoc_diagrams::{Extractor, MermaidCli, Rewriter, Target};
//!
//! let target = Target::new("ARCHITECTURE.md", "architecture", "docs/images/diagrams");
//! let extractor = Extractor::new("docs/images/diagrams", MermaidCli::default());
//! extractor.extract_document(&target)?;
//!
//! Rewriter::new("docs/images/diagrams").rewrite_document(&target)?;
//! ```

pub mod block;
mod consts;
mod error;
pub mod extractor;
pub mod naming;
pub mod renderer;
pub mod rewriter;
mod target;

pub use block::{DiagramBlock, DiagramCaption, DiagramKind, extract_blocks};
pub use error::DiagramError;
pub use extractor::{BlockError, BlockReport, ExtractOutcome, Extractor};
pub use naming::{ArtifactName, available_images, ordinal_suffix};
pub use renderer::{DiagramRenderer, MermaidCli, RenderError};
pub use rewriter::{RewriteOutcome, RewriteResult, Rewriter, rewrite_content};
pub use target::Target;
