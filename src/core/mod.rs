pub mod chain;
pub mod generator;
pub mod model;
pub mod sampler;
pub mod tokenizer;
