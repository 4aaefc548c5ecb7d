/// Tokenizer: normalizes raw text into a word and punctuation stream.

/// A single normalized unit of text: a lowercase word or one punctuation mark.
pub type Token = String;

/// Punctuation split out into standalone tokens.
///
/// `'` and `-` are absent on purpose: they stay attached inside words
/// ("it's", "well-told").
pub const ISOLATED_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '"'];

/// Every non-alphanumeric character that survives normalization.
pub const ALLOWED_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '\'', '"', '-'];

/// Tokenize text into lowercase words and punctuation marks.
///
/// Lowercases everything, pads isolated punctuation with spaces, drops any
/// character outside `[a-z0-9]`, whitespace and [`ALLOWED_PUNCTUATION`], then
/// splits on whitespace. Never fails; empty or whitespace-only input yields an
/// empty vector.
///
/// Whitespace is the Unicode set plus U+FEFF (byte order mark) and minus
/// U+0085 (next line), which is dropped like any other control character.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut normalized = String::with_capacity(text.len() + text.len() / 4);

    for c in text.chars().flat_map(char::to_lowercase) {
        if ISOLATED_PUNCTUATION.contains(&c) {
            normalized.push(' ');
            normalized.push(c);
            normalized.push(' ');
        } else if is_separator(c) {
            normalized.push(' ');
        } else if is_retained(c) {
            normalized.push(c);
        }
    }

    normalized.split_whitespace().map(str::to_owned).collect()
}

fn is_separator(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

fn is_retained(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || ALLOWED_PUNCTUATION.contains(&c)
}
