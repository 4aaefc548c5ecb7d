//! Word-level Markov chain text generation.
//!
//! Learns a fixed-order transition table from a training corpus and walks it
//! stochastically, optionally anchored on a user prompt, to produce new text
//! of roughly a target length. The core is two operations, [`build`] and
//! [`generate`]; the rest of the crate is inspection, configuration and
//! sampling support around them.

pub mod config;
pub mod core;
pub mod corpus;

pub use crate::config::{ConfigError, GeneratorConfig};
pub use crate::core::chain::{build, ChainBuilder, State, TransitionTable};
pub use crate::core::generator::{
    generate, generate_detailed, Generation, SeedSource, StopReason, MODEL_NOT_READY,
};
pub use crate::core::model::TextModel;
pub use crate::core::sampler::{IndexSampler, RandomSampler, ScriptedSampler};
pub use crate::core::tokenizer::{tokenize, Token};
