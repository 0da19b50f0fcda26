//! Internal constants for diagram extraction and rewriting.

use std::time::Duration;

/// Default renderer program (mermaid-cli).
pub const DEFAULT_COMMAND: &str = "mmdc";

/// Default background passed to the renderer.
pub const DEFAULT_BACKGROUND: &str = "transparent";

/// Default scale factor (2x for retina displays).
pub const DEFAULT_SCALE: u32 = 2;

/// Default ceiling for a single renderer invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Interval between child process status polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Extension of rendered images.
pub const IMAGE_EXTENSION: &str = "png";

/// Extension of standalone diagram-source files.
pub const SOURCE_EXTENSION: &str = "mmd";

/// Summary label of the collapsible section holding the diagram source.
pub const SOURCE_SUMMARY: &str = "📊 다이어그램 소스 코드 (AI 참조용)";
