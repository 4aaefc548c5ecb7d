/// Bundled training text.

/// A short mixed-register corpus (a storytelling algorithm, a village
/// morning, a handful of aphorisms). Large enough for an order-2 chain with
/// some branching, small enough to embed.
pub const SAMPLE_CORPUS: &str = include_str!("../data/sample_corpus.txt");
