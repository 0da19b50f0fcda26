//! Document targets processed by both jobs.

use std::path::PathBuf;

/// A markdown document and the prefix of its rendered images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Path of the markdown document.
    pub document: PathBuf,
    /// Identifying prefix used in artifact names.
    pub prefix: String,
    /// Path prefix written into image links, relative to the document.
    pub image_base: String,
}

impl Target {
    pub fn new(
        document: impl Into<PathBuf>,
        prefix: impl Into<String>,
        image_base: impl Into<String>,
    ) -> Self {
        Self {
            document: document.into(),
            prefix: prefix.into(),
            image_base: image_base.into(),
        }
    }
}
