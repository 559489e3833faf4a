use serde::{Deserialize, Serialize};

use crate::core::constants::{DEFAULT_CELL_SIZE, MIN_CELL_SIZE};
use crate::error::{ChartError, ChartResult};

/// Public engine configuration.
///
/// Serializable so hosts can persist render settings next to their charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollageEngineConfig {
    /// Edge of a grid cell in pixels. Export renders typically raise this.
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
    /// Truncate right-column captions before measuring and drawing them.
    #[serde(default = "default_truncate_right_captions")]
    pub truncate_right_captions: bool,
}

impl Default for CollageEngineConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            truncate_right_captions: default_truncate_right_captions(),
        }
    }
}

impl CollageEngineConfig {
    #[must_use]
    pub fn new(cell_size: u32) -> Self {
        Self {
            cell_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size;
        self
    }

    #[must_use]
    pub fn with_right_caption_truncation(mut self, enabled: bool) -> Self {
        self.truncate_right_captions = enabled;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.cell_size < MIN_CELL_SIZE {
            return Err(ChartError::InvalidData(format!(
                "cell size must be >= {MIN_CELL_SIZE}, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|err| ChartError::InvalidData(format!("failed to parse engine config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| ChartError::InvalidData(format!("failed to serialize engine config: {err}")))
    }
}

fn default_cell_size() -> u32 {
    DEFAULT_CELL_SIZE
}

fn default_truncate_right_captions() -> bool {
    true
}
