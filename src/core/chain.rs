/// Markov chain construction over token windows.

use rustc_hash::FxHashMap;
use std::borrow::Borrow;
use std::fmt;
use tracing::{debug, warn};

use crate::core::tokenizer::{tokenize, Token};

/// An order-length window of consecutive tokens, used as a table key.
///
/// Compares and hashes element-wise, exactly like the `[Token]` slice it
/// wraps, so lookups can borrow a window straight out of a token buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State(Box<[Token]>);

impl State {
    pub fn new(tokens: impl Into<Vec<Token>>) -> Self {
        Self(tokens.into().into_boxed_slice())
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<[Token]> for State {
    fn borrow(&self) -> &[Token] {
        &self.0
    }
}

impl From<&[Token]> for State {
    fn from(tokens: &[Token]) -> Self {
        Self(tokens.into())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(" "))
    }
}

/// Immutable mapping from each observed [`State`] to the tokens seen right
/// after it, duplicates included.
///
/// Successor lists are samples, not sets: drawing uniformly from one
/// reproduces the corpus's next-token frequencies. Every stored state has at
/// least one successor. States are kept in first-observed order so that a
/// deterministic sampler picks the same random seed on every run.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    order: usize,
    index: FxHashMap<State, usize>,
    entries: Vec<(State, Vec<Token>)>,
}

impl TransitionTable {
    /// An empty table for the given order. Generation treats it as
    /// "model not ready".
    pub fn empty(order: usize) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    /// The chain order the table was built with.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of distinct states.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of (state, successor) pairs across all states.
    pub fn transition_count(&self) -> usize {
        self.entries.iter().map(|(_, next)| next.len()).sum()
    }

    /// Successors observed after `state`, or `None` if it never occurred.
    pub fn successors(&self, state: &[Token]) -> Option<&[Token]> {
        self.index
            .get(state)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn contains_state(&self, state: &[Token]) -> bool {
        self.index.contains_key(state)
    }

    /// The `index`-th state in first-observed order.
    pub fn state_at(&self, index: usize) -> Option<&State> {
        self.entries.get(index).map(|(state, _)| state)
    }

    /// All states in first-observed order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.entries.iter().map(|(state, _)| state)
    }

    /// All (state, successors) entries in first-observed order.
    pub fn iter(&self) -> impl Iterator<Item = (&State, &[Token])> {
        self.entries
            .iter()
            .map(|(state, next)| (state, next.as_slice()))
    }

    fn record(&mut self, state: &[Token], next: &Token) {
        match self.index.get(state) {
            Some(&i) => self.entries[i].1.push(next.clone()),
            None => {
                let key = State::from(state);
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, vec![next.clone()]));
            }
        }
    }
}

/// Builds a [`TransitionTable`] from a token sequence in a single pass.
pub struct ChainBuilder;

impl ChainBuilder {
    /// Slide an `order`-wide window over `tokens`, recording the token that
    /// follows each window.
    ///
    /// Returns an empty table when there are fewer than `order + 1` tokens
    /// (or `order` is zero). That is not an error: callers check
    /// [`TransitionTable::is_empty`] and treat the model as unavailable.
    pub fn build(tokens: &[Token], order: usize) -> TransitionTable {
        if order == 0 || tokens.len() < order + 1 {
            warn!(
                tokens = tokens.len(),
                order, "corpus is too short to build a chain of this order"
            );
            return TransitionTable::empty(order);
        }

        let mut table = TransitionTable::empty(order);
        for window in tokens.windows(order + 1) {
            let (state, next) = window.split_at(order);
            table.record(state, &next[0]);
        }

        debug!(
            tokens = tokens.len(),
            states = table.len(),
            transitions = table.transition_count(),
            order,
            "built transition table"
        );
        table
    }
}

/// Tokenize `corpus` and build its transition table.
///
/// The token stream is dropped once the table is built.
pub fn build(corpus: &str, order: usize) -> TransitionTable {
    let tokens = tokenize(corpus);
    ChainBuilder::build(&tokens, order)
}
