//! CLI command implementations.

pub(crate) mod extract;
pub(crate) mod rewrite;

pub(crate) use extract::ExtractArgs;
pub(crate) use rewrite::RewriteArgs;

use mmdoc_config::Config;
use mmdoc_diagrams::Target;

/// Configured documents in table order.
fn targets(config: &Config) -> Vec<Target> {
    config
        .targets_resolved
        .iter()
        .map(|t| Target::new(t.path.clone(), t.prefix.clone(), t.image_base.clone()))
        .collect()
}
