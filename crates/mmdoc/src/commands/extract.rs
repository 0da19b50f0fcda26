//! `mmdoc extract` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mmdoc_config::{CliSettings, Config};
use mmdoc_diagrams::{BlockError, ExtractOutcome, Extractor, MermaidCli, RenderError};

use super::targets;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the extract command.
#[derive(Args)]
pub(crate) struct ExtractArgs {
    /// Output directory for `.mmd` and `.png` files (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Renderer command (overrides config).
    #[arg(long, env = "MMDOC_RENDERER")]
    renderer: Option<String>,

    /// Renderer timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,
}

impl ExtractArgs {
    /// Execute the extract command.
    ///
    /// Per-document and per-diagram failures are reported and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            output_dir: self.output_dir,
            renderer_command: self.renderer,
            timeout_secs: self.timeout,
        };
        let config = Config::load(config_path, Some(&cli_settings))?;
        let output = Output::new(&config.project_dir);

        let renderer = MermaidCli::new(config.renderer.command.clone())
            .args(&config.renderer.args)
            .background(config.renderer.background.clone())
            .scale(config.renderer.scale)
            .timeout(config.renderer.timeout());
        let extractor = Extractor::new(config.output_resolved.dir.clone(), renderer);

        output.info(&format!("Output: {}", output.path(extractor.output_dir())));

        let mut converted = 0;
        for target in targets(&config) {
            let outcome = match extractor.extract_document(&target) {
                Ok(outcome) => outcome,
                Err(err) => {
                    output.error(&format!("Error: {err}"));
                    continue;
                }
            };

            match &outcome {
                ExtractOutcome::Missing => {
                    output.warning(&format!("File not found: {}", output.path(&target.document)));
                }
                ExtractOutcome::NoDiagrams => {
                    output.info(&format!("No diagrams: {}", output.path(&target.document)));
                }
                ExtractOutcome::Processed(reports) => {
                    output.document(&target.document, &format!("{} diagram(s)", reports.len()));
                    for report in reports {
                        let name = report.name.stem();
                        match &report.result {
                            Ok(()) => output.success(&format!("  Converted: {}", report.name.image_file())),
                            Err(BlockError::Render(RenderError::Timeout(_))) => {
                                output.warning(&format!("  Timed out: {name}"));
                            }
                            Err(err) => output.error(&format!("  Failed: {name} - {err}")),
                        }
                    }
                }
            }
            converted += outcome.converted();
        }

        output.total(&format!("Converted {converted} diagram(s)"));
        Ok(())
    }
}
