/// Text generation from a transition table.

use tracing::debug;

use crate::core::chain::TransitionTable;
use crate::core::sampler::IndexSampler;
use crate::core::tokenizer::{tokenize, Token};

/// Returned in place of generated text when the table has no states.
pub const MODEL_NOT_READY: &str =
    "The text model is not ready. The corpus might be too small or not processed.";

/// Characters accepted as the end of a finished passage.
pub const TERMINAL_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';'];

/// Where the walk started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    /// The last `order` prompt tokens matched a known state.
    Prompt,
    /// A state drawn uniformly from the table.
    Random,
}

/// Why the walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Output reached the requested word count.
    TargetReached,
    /// The current state has no recorded successors.
    DeadEnd,
    /// Output hit `target_words + 2 * order` tokens. The target check runs
    /// first and the bound is never below the target, so the walk does not
    /// stop here in practice; the guard only caps the loop.
    SafetyBound,
    /// The table was empty; nothing was generated.
    ModelNotReady,
}

/// The full result of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Raw tokens, seed included, before cleanup.
    pub tokens: Vec<Token>,
    /// Final text after capitalization and terminal punctuation.
    pub text: String,
    /// `None` only when the model was not ready.
    pub seed: Option<SeedSource>,
    pub stop: StopReason,
}

impl Generation {
    fn not_ready() -> Self {
        Self {
            tokens: Vec::new(),
            text: MODEL_NOT_READY.to_string(),
            seed: None,
            stop: StopReason::ModelNotReady,
        }
    }
}

/// Generate roughly `target_words` tokens of text from `table`.
///
/// See [`generate_detailed`]; this returns only the finished text.
pub fn generate<S: IndexSampler + ?Sized>(
    prompt: &str,
    table: &TransitionTable,
    target_words: usize,
    order: usize,
    sampler: &mut S,
) -> String {
    generate_detailed(prompt, table, target_words, order, sampler).text
}

/// Generate text and report how the walk started and stopped.
///
/// The walk is anchored on the prompt when its last `order` tokens form a
/// known state, and starts from a random state otherwise. It then samples a
/// successor of the trailing `order` tokens until `target_words` tokens
/// exist or the current state has no successors. A short result is a valid
/// result. Never fails: an empty table yields [`MODEL_NOT_READY`].
///
/// `order` must match the order the table was built with, or every lookup
/// past the seed misses and the output stops at the seed.
pub fn generate_detailed<S: IndexSampler + ?Sized>(
    prompt: &str,
    table: &TransitionTable,
    target_words: usize,
    order: usize,
    sampler: &mut S,
) -> Generation {
    if table.is_empty() {
        debug!("generation requested on an empty model");
        return Generation::not_ready();
    }

    let Some((mut output, seed)) = select_seed(prompt, table, order, sampler) else {
        return Generation::not_ready();
    };

    let limit = target_words.saturating_add(order.saturating_mul(2));
    output.reserve(target_words.saturating_sub(output.len()).min(4096));

    let stop = loop {
        if output.len() >= target_words {
            break StopReason::TargetReached;
        }
        // Unreachable while `limit >= target_words`; kept as a hard cap.
        if output.len() >= limit {
            break StopReason::SafetyBound;
        }

        // The state is always the trailing `order` tokens of the output.
        let Some(start) = output.len().checked_sub(order) else {
            break StopReason::DeadEnd;
        };
        let next = match table.successors(&output[start..]) {
            Some(next) if !next.is_empty() => next,
            _ => break StopReason::DeadEnd,
        };
        let token = next[sampler.sample_index(next.len())].clone();
        output.push(token);
    };

    debug!(
        seed = ?seed,
        stop = ?stop,
        tokens = output.len(),
        target_words,
        "generated text"
    );

    Generation {
        text: finish_text(&output),
        tokens: output,
        seed: Some(seed),
        stop,
    }
}

/// Pick the starting window: the prompt's tail if the table knows it,
/// otherwise a uniformly random state. `None` only for an empty table.
fn select_seed<S: IndexSampler + ?Sized>(
    prompt: &str,
    table: &TransitionTable,
    order: usize,
    sampler: &mut S,
) -> Option<(Vec<Token>, SeedSource)> {
    let prompt_tokens = tokenize(prompt);
    if prompt_tokens.len() >= order {
        let tail = &prompt_tokens[prompt_tokens.len() - order..];
        if table.contains_state(tail) {
            return Some((tail.to_vec(), SeedSource::Prompt));
        }
    }

    if table.is_empty() {
        return None;
    }
    let state = table.state_at(sampler.sample_index(table.len()))?;
    Some((state.tokens().to_vec(), SeedSource::Random))
}

/// Join tokens with single spaces, capitalize the first character, and make
/// sure the text ends in terminal punctuation.
///
/// A trailing period is added only when neither the last character of the
/// joined text nor the last token is terminal punctuation, so a
/// space-separated `"text ."` never becomes `"text .."`.
pub fn finish_text(tokens: &[Token]) -> String {
    let joined = tokens.join(" ");
    if joined.is_empty() {
        return joined;
    }

    let mut text = capitalize_first(&joined);
    if !text.ends_with(TERMINAL_PUNCTUATION) {
        let last_is_terminal = tokens.last().is_some_and(|t| is_terminal_token(t));
        if !last_is_terminal {
            text.push('.');
        }
    }
    text
}

fn is_terminal_token(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if TERMINAL_PUNCTUATION.contains(&c))
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chain::ChainBuilder;
    use crate::core::sampler::{RandomSampler, ScriptedSampler};

    fn toks(words: &[&str]) -> Vec<Token> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn cat_table() -> TransitionTable {
        ChainBuilder::build(&toks(&["a", "cat", "sat", "on", "a", "mat"]), 2)
    }

    #[test]
    fn single_branch_walk_is_deterministic() {
        let table = cat_table();
        let mut sampler = RandomSampler::seeded(1);

        let generation = generate_detailed("a cat", &table, 4, 2, &mut sampler);
        assert_eq!(generation.tokens, toks(&["a", "cat", "sat", "on"]));
        assert_eq!(generation.text, "A cat sat on.");
        assert_eq!(generation.seed, Some(SeedSource::Prompt));
        assert_eq!(generation.stop, StopReason::TargetReached);
    }

    #[test]
    fn empty_table_returns_sentinel() {
        let table = TransitionTable::empty(2);
        let mut sampler = ScriptedSampler::first();

        let generation = generate_detailed("anything", &table, 70, 2, &mut sampler);
        assert_eq!(generation.text, MODEL_NOT_READY);
        assert_eq!(generation.stop, StopReason::ModelNotReady);
        assert!(generation.seed.is_none());
        assert_eq!(sampler.calls(), 0);
    }

    #[test]
    fn prompt_tail_anchors_the_seed() {
        let table = cat_table();
        let mut sampler = ScriptedSampler::first();

        let generation = generate_detailed("Once upon a time, SAT ON", &table, 3, 2, &mut sampler);
        assert_eq!(generation.seed, Some(SeedSource::Prompt));
        assert_eq!(&generation.tokens[..2], &toks(&["sat", "on"])[..]);
        assert_eq!(generation.text, "Sat on a.");
    }

    #[test]
    fn unknown_prompt_tail_falls_back_to_random_state() {
        let table = cat_table();
        let mut sampler = ScriptedSampler::new(vec![3]);

        let generation = generate_detailed("the dog barked", &table, 10, 2, &mut sampler);
        assert_eq!(generation.seed, Some(SeedSource::Random));
        assert_eq!(generation.tokens, toks(&["on", "a", "mat"]));
        assert_eq!(generation.text, "On a mat.");
    }

    #[test]
    fn short_prompt_falls_back_to_random_state() {
        let table = cat_table();
        let mut sampler = ScriptedSampler::new(vec![1]);

        let generation = generate_detailed("cat", &table, 3, 2, &mut sampler);
        assert_eq!(generation.seed, Some(SeedSource::Random));
        assert_eq!(generation.tokens, toks(&["cat", "sat", "on"]));
    }

    #[test]
    fn dead_end_truncates_output() {
        let table = cat_table();
        let mut sampler = ScriptedSampler::first();

        let generation = generate_detailed("sat on", &table, 70, 2, &mut sampler);
        assert_eq!(generation.stop, StopReason::DeadEnd);
        assert_eq!(generation.tokens, toks(&["sat", "on", "a", "mat"]));
        assert_eq!(generation.text, "Sat on a mat.");
    }

    #[test]
    fn target_below_order_keeps_the_whole_seed() {
        let table = cat_table();
        let mut sampler = ScriptedSampler::first();

        let generation = generate_detailed("a cat", &table, 1, 2, &mut sampler);
        assert_eq!(generation.tokens, toks(&["a", "cat"]));
        assert_eq!(generation.stop, StopReason::TargetReached);
    }

    #[test]
    fn scripted_choices_select_successors() {
        let table = ChainBuilder::build(
            &toks(&["the", "cat", "ran", ".", "the", "dog", "sat", ".", "the", "owl", "flew"]),
            1,
        );
        // Seed from the prompt, then pick "owl" (index 2 of cat/dog/owl).
        let mut sampler = ScriptedSampler::new(vec![2]);
        let text = generate("the", &table, 3, 1, &mut sampler);
        assert_eq!(text, "The owl flew.");
    }

    #[test]
    fn mismatched_order_stops_at_the_seed() {
        let table = cat_table();
        let mut sampler = ScriptedSampler::first();

        let generation = generate_detailed("", &table, 10, 3, &mut sampler);
        assert_eq!(generation.seed, Some(SeedSource::Random));
        assert_eq!(generation.tokens, toks(&["a", "cat"]));
        assert_eq!(generation.stop, StopReason::DeadEnd);
    }

    #[test]
    fn zero_order_seeds_randomly_and_stops_at_once() {
        let table = cat_table();
        let mut sampler = ScriptedSampler::new(vec![1]);

        let generation = generate_detailed("a cat", &table, 5, 0, &mut sampler);
        assert_eq!(generation.seed, Some(SeedSource::Random));
        assert_eq!(generation.stop, StopReason::DeadEnd);
        assert_eq!(generation.tokens, toks(&["cat", "sat"]));
        assert_eq!(generation.text, "Cat sat.");
        assert_eq!(sampler.calls(), 1);
    }

    #[test]
    fn finish_text_does_not_double_terminal_punctuation() {
        assert_eq!(finish_text(&toks(&["text", "."])), "Text .");
        assert_eq!(finish_text(&toks(&["so", "then", ","])), "So then ,");
        assert_eq!(finish_text(&toks(&["really", "?"])), "Really ?");
    }

    #[test]
    fn finish_text_appends_period_after_words_and_other_marks() {
        assert_eq!(finish_text(&toks(&["a", "bird", "flew"])), "A bird flew.");
        assert_eq!(finish_text(&toks(&["he", "said", ":"])), "He said :.");
        assert_eq!(finish_text(&toks(&["she", "said", "\""])), "She said \".");
    }

    #[test]
    fn finish_text_empty() {
        assert_eq!(finish_text(&[]), "");
    }

    #[test]
    fn finish_text_only_touches_first_character() {
        assert_eq!(finish_text(&toks(&["9", "lives", "!"])), "9 lives !");
        assert_eq!(finish_text(&toks(&["it's", "fine"])), "It's fine.");
    }
}
