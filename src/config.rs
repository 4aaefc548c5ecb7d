/// Generation settings: chain order and output length, loadable from RON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_ORDER: usize = 2;
pub const DEFAULT_TARGET_WORDS: usize = 70;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("chain order must be at least 1, got {0}")]
    InvalidOrder(usize),
    #[error("target word count must be at least 1, got {0}")]
    InvalidTargetWords(usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Parameters shared by model construction and generation.
///
/// `order` is fixed when the table is built; generating with a different
/// order makes every state lookup miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of preceding tokens used as context.
    #[serde(default = "default_order")]
    pub order: usize,
    /// Approximate number of tokens to generate.
    #[serde(default = "default_target_words")]
    pub target_words: usize,
}

fn default_order() -> usize {
    DEFAULT_ORDER
}

fn default_target_words() -> usize {
    DEFAULT_TARGET_WORDS
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            target_words: DEFAULT_TARGET_WORDS,
        }
    }
}

impl GeneratorConfig {
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn with_target_words(mut self, target_words: usize) -> Self {
        self.target_words = target_words;
        self
    }

    /// Reject zero order or zero target length.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.order == 0 {
            return Err(ConfigError::InvalidOrder(self.order));
        }
        if self.target_words == 0 {
            return Err(ConfigError::InvalidTargetWords(self.target_words));
        }
        Ok(())
    }

    /// Parse and validate a config from RON text.
    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = ron::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }
}
