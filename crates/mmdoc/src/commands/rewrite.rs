//! `mmdoc rewrite` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mmdoc_config::{CliSettings, Config};
use mmdoc_diagrams::{RewriteOutcome, RewriteResult, Rewriter, Target};

use super::targets;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the rewrite command.
#[derive(Args)]
pub(crate) struct RewriteArgs {
    /// Directory holding rendered images (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Show what would change without writing documents.
    #[arg(long)]
    dry_run: bool,
}

impl RewriteArgs {
    /// Execute the rewrite command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            output_dir: self.output_dir,
            ..CliSettings::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;
        let output = Output::new(&config.project_dir);

        let rewriter = Rewriter::new(config.output_resolved.dir.clone()).dry_run(self.dry_run);

        let mut updated = 0;
        for target in targets(&config) {
            match rewriter.rewrite_document(&target) {
                Ok(RewriteOutcome::Missing) => {
                    output.warning(&format!("File not found: {}", output.path(&target.document)));
                }
                Ok(RewriteOutcome::NoDiagrams) => {
                    output.info(&format!("No diagrams: {}", output.path(&target.document)));
                }
                Ok(RewriteOutcome::NoImages) => {
                    output.warning(&format!("No images: {}", target.prefix));
                }
                Ok(RewriteOutcome::Unchanged(result)) => {
                    print_unmatched(&output, &result);
                    output.info(&format!("Up to date: {}", output.path(&target.document)));
                }
                Ok(RewriteOutcome::Updated(result)) => {
                    print_result(&output, &target, &result);
                    output.success(&format!("  Updated: {}", output.path(&target.document)));
                    updated += 1;
                }
                Ok(RewriteOutcome::WouldUpdate(result)) => {
                    print_result(&output, &target, &result);
                    output.info(&format!(
                        "  Would replace diagram(s) {}",
                        join_ordinals(&result.replaced)
                    ));
                    updated += 1;
                }
                Err(err) => output.error(&format!("Error: {err}")),
            }
        }

        if self.dry_run {
            output.total(&format!("Would update {updated} file(s)"));
        } else {
            output.total(&format!("Updated {updated} file(s)"));
        }
        Ok(())
    }
}

fn print_result(output: &Output, target: &Target, result: &RewriteResult) {
    output.document(
        &target.document,
        &format!("{} diagram(s), {} image(s)", result.blocks, result.images),
    );
    print_unmatched(output, result);
}

fn print_unmatched(output: &Output, result: &RewriteResult) {
    for ordinal in &result.unmatched {
        output.warning(&format!("  Warning: no image for diagram {ordinal}"));
    }
}

fn join_ordinals(ordinals: &[usize]) -> String {
    ordinals
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_ordinals() {
        assert_eq!(join_ordinals(&[1, 2, 5]), "1, 2, 5");
        assert_eq!(join_ordinals(&[]), "");
    }
}
