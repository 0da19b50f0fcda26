//! Colored progress output for batch runs.

use std::path::{Path, PathBuf};

use console::{Style, Term};

/// Terminal output formatter.
///
/// Paths are shown relative to the project root when possible.
pub(crate) struct Output {
    term: Term,
    project_dir: PathBuf,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    /// Create a new output formatter for paths under `project_dir`.
    #[must_use]
    pub(crate) fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            term: Term::stderr(),
            project_dir: project_dir.into(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Format a path for display.
    pub(crate) fn path(&self, path: &Path) -> String {
        path.strip_prefix(&self.project_dir)
            .unwrap_or(path)
            .display()
            .to_string()
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a document header (cyan bold).
    pub(crate) fn document(&self, path: &Path, detail: &str) {
        let line = format!("Processing {} ({detail})", self.path(path));
        let _ = self.term.write_line(&self.cyan_bold.apply_to(line).to_string());
    }

    /// Print the final count after a blank line.
    pub(crate) fn total(&self, msg: &str) {
        let _ = self.term.write_line("");
        self.success(msg);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_path_relative_to_project() {
        let output = Output::new("/project");
        assert_eq!(output.path(Path::new("/project/docs/README.md")), "docs/README.md");
    }

    #[test]
    fn test_path_outside_project() {
        let output = Output::new("/project");
        assert_eq!(output.path(Path::new("/elsewhere/a.md")), "/elsewhere/a.md");
    }
}
