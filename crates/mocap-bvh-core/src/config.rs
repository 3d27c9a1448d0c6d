//! Writer configuration.

use serde::{Deserialize, Serialize};

/// Output layout knobs for the writer. Passed explicitly where needed; the
/// core carries no ambient global settings object.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct WriteConfig {
    /// Fractional digits for every float the writer emits.
    pub precision: usize,
    /// Spaces per nesting level in the hierarchy section.
    pub indent: usize,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            precision: 6,
            indent: 4,
        }
    }
}
