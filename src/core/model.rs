/// A transition table bundled with the settings it was built with.

use crate::config::{ConfigError, GeneratorConfig};
use crate::core::chain::{build, TransitionTable};
use crate::core::generator::{generate_detailed, Generation};
use crate::core::sampler::IndexSampler;

/// A built model ready to serve generation requests.
///
/// Holding the config next to the table keeps the generation order equal to
/// the build order. Immutable once built; share it freely across threads.
#[derive(Debug, Clone)]
pub struct TextModel {
    table: TransitionTable,
    config: GeneratorConfig,
}

impl TextModel {
    /// Validate `config` and build a table from `corpus`.
    ///
    /// A corpus too short for the order still produces a model; check
    /// [`TextModel::is_ready`] before serving requests.
    pub fn build(corpus: &str, config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            table: build(corpus, config.order),
            config,
        })
    }

    /// Wrap an existing table. The config's order is taken from the table
    /// and validated along with `target_words`, as in [`TextModel::build`].
    pub fn from_table(
        table: TransitionTable,
        target_words: usize,
    ) -> Result<Self, ConfigError> {
        let config = GeneratorConfig::default()
            .with_order(table.order())
            .with_target_words(target_words);
        config.validate()?;
        Ok(Self { table, config })
    }

    /// False when the corpus was too short to yield any transition.
    pub fn is_ready(&self) -> bool {
        !self.table.is_empty()
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate text with the configured target length.
    pub fn generate<S: IndexSampler + ?Sized>(&self, prompt: &str, sampler: &mut S) -> String {
        self.generate_detailed(prompt, sampler).text
    }

    pub fn generate_detailed<S: IndexSampler + ?Sized>(
        &self,
        prompt: &str,
        sampler: &mut S,
    ) -> Generation {
        generate_detailed(
            prompt,
            &self.table,
            self.config.target_words,
            self.config.order,
            sampler,
        )
    }
}
