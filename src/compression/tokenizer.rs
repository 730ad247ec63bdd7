//! Splitting raw text into symbols.

use log::debug;

use super::symbol::{Symbol, SymbolModel};

/// Tokenize `input` under `model` and append the end-of-stream sentinel.
///
/// The concatenated text of the returned symbols is exactly `input`.
///
/// # Example
///
/// ```
/// use huffcode::compression::{tokenize, Symbol, SymbolModel};
///
/// let tokens = tokenize("go go!", SymbolModel::Word);
/// assert_eq!(tokens.len(), 5);
/// assert_eq!(tokens[0], Symbol::from("go"));
/// assert_eq!(tokens[4], Symbol::EndOfStream);
/// ```
pub fn tokenize(input: &str, model: SymbolModel) -> Vec<Symbol> {
    let mut tokens = match model {
        SymbolModel::Char => char_tokens(input),
        SymbolModel::Word => word_tokens(input),
    };
    tokens.push(Symbol::EndOfStream);
    debug!(
        "tokenized {} bytes into {} symbols ({} model)",
        input.len(),
        tokens.len(),
        model
    );
    tokens
}

fn char_tokens(input: &str) -> Vec<Symbol> {
    input.chars().map(Symbol::from).collect()
}

/// Maximal `[a-zA-Z]+` runs become one symbol; every other character stands alone.
fn word_tokens(input: &str) -> Vec<Symbol> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (i, ch) in input.char_indices() {
        if ch.is_ascii_alphabetic() {
            word_start.get_or_insert(i);
            continue;
        }
        if let Some(start) = word_start.take() {
            tokens.push(Symbol::text(&input[start..i]));
        }
        tokens.push(Symbol::from(ch));
    }
    if let Some(start) = word_start {
        tokens.push(Symbol::text(&input[start..]));
    }
    tokens
}

/// Concatenate the text of `symbols`, stopping at the first sentinel.
pub fn detokenize<'a, I>(symbols: I) -> String
where
    I: IntoIterator<Item = &'a Symbol>,
{
    symbols
        .into_iter()
        .map_while(Symbol::as_text)
        .collect()
}
