/// markov_text: build a model from a corpus, then generate from it or inspect it.
///
/// Usage:
///   markov_text generate [--corpus <file.txt>] [--config <file.ron>] [--order N] [--words N] [--seed N] [--count N] [PROMPT...]
///   markov_text inspect [--corpus <file.txt>] [--order N] [--top N]
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use markov_text::core::tokenizer::tokenize;
use markov_text::corpus::SAMPLE_CORPUS;
use markov_text::{
    ChainBuilder, ConfigError, GeneratorConfig, IndexSampler, RandomSampler, TextModel,
    TransitionTable,
};

#[derive(Parser)]
#[command(name = "markov_text")]
#[command(about = "Word-level Markov chain text generator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate text, optionally continuing from a prompt
    Generate {
        #[command(flatten)]
        source: CorpusArgs,

        /// RON file with `order` and `target_words`
        #[arg(long)]
        config: Option<PathBuf>,

        /// Approximate number of words to generate (default: 70)
        #[arg(short, long)]
        words: Option<usize>,

        /// RNG seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of passages to generate
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Prompt text; its last words steer generation when the corpus contains them
        prompt: Vec<String>,
    },

    /// Print statistics about the transition table
    Inspect {
        #[command(flatten)]
        source: CorpusArgs,

        /// Number of most-branching states to list
        #[arg(long, default_value = "10")]
        top: usize,
    },
}

#[derive(Args)]
struct CorpusArgs {
    /// Training text file (default: the bundled sample corpus)
    #[arg(short, long)]
    corpus: Option<PathBuf>,

    /// Chain order (default: 2)
    #[arg(short, long)]
    order: Option<usize>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("error reading corpus '{path}': {source}")]
    Corpus {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("model unavailable: the corpus is too short for a chain of order {0}")]
    ModelUnavailable(usize),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "markov_text=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            source,
            config,
            words,
            seed,
            count,
            prompt,
        } => run_generate(source, config, words, seed, count, &prompt.join(" ")),
        Commands::Inspect { source, top } => run_inspect(source, top),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn read_corpus(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Corpus {
            path: path.to_path_buf(),
            source,
        }),
        None => Ok(SAMPLE_CORPUS.to_string()),
    }
}

fn run_generate(
    source: CorpusArgs,
    config_path: Option<PathBuf>,
    words: Option<usize>,
    seed: Option<u64>,
    count: usize,
    prompt: &str,
) -> Result<(), CliError> {
    let mut config = match config_path {
        Some(path) => GeneratorConfig::load_from_ron(&path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(order) = source.order {
        config = config.with_order(order);
    }
    if let Some(words) = words {
        config = config.with_target_words(words);
    }

    let corpus = read_corpus(source.corpus.as_deref())?;
    let model = TextModel::build(&corpus, config)?;
    if !model.is_ready() {
        return Err(CliError::ModelUnavailable(config.order));
    }
    tracing::info!(
        states = model.table().len(),
        transitions = model.table().transition_count(),
        order = config.order,
        "model ready"
    );

    let mut sampler: Box<dyn IndexSampler> = match seed {
        Some(seed) => Box::new(RandomSampler::seeded(seed)),
        None => Box::new(RandomSampler::from_entropy()),
    };

    for i in 0..count {
        if i > 0 {
            println!();
        }
        println!("{}", model.generate(prompt, sampler.as_mut()));
    }
    Ok(())
}

fn run_inspect(source: CorpusArgs, top: usize) -> Result<(), CliError> {
    let order = source.order.unwrap_or(GeneratorConfig::default().order);
    GeneratorConfig::default().with_order(order).validate()?;

    let corpus = read_corpus(source.corpus.as_deref())?;
    let tokens = tokenize(&corpus);
    let table = ChainBuilder::build(&tokens, order);

    println!("Tokens: {}", tokens.len());
    println!(
        "Model: order {}, {} unique states, {} transitions",
        table.order(),
        table.len(),
        table.transition_count()
    );
    if table.is_empty() {
        return Err(CliError::ModelUnavailable(order));
    }

    println!("Most branching states:");
    for (state, successors) in most_branching(&table, top) {
        println!("  {:>4}  {}", successors, state);
    }
    Ok(())
}

/// States ordered by successor count, ties broken by first appearance.
fn most_branching(table: &TransitionTable, top: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = table
        .iter()
        .map(|(state, next)| (state.to_string(), next.len()))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top);
    ranked
}
