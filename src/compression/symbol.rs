//! Symbols and symbol models.
//!
//! A [`Symbol`] is the unit the prefix tree encodes. Real symbols always carry
//! text taken from the input; the end-of-stream sentinel is a separate variant,
//! so it can never be confused with anything the tokenizer produces.

use std::fmt;
use std::str::FromStr;

/// One encodable unit: a piece of input text, or the end-of-stream sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// A single character, or a whole word in word mode.
    Text(String),
    /// Marks the logical end of the real content.
    EndOfStream,
}

impl Symbol {
    /// Build a text symbol.
    pub fn text(s: impl Into<String>) -> Self {
        Symbol::Text(s.into())
    }

    /// Returns true for the end-of-stream sentinel.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Symbol::EndOfStream)
    }

    /// The text carried by this symbol, or `None` for the sentinel.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Symbol::Text(s) => Some(s),
            Symbol::EndOfStream => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Text(s) => write!(f, "{:?}", s),
            Symbol::EndOfStream => write!(f, "<EOS>"),
        }
    }
}

impl From<char> for Symbol {
    fn from(ch: char) -> Self {
        Symbol::Text(ch.to_string())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::Text(s.to_string())
    }
}

/// How raw text is split into symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SymbolModel {
    /// Every character is its own symbol.
    #[default]
    Char,
    /// Runs of ASCII letters form one symbol; everything else is one symbol per character.
    Word,
}

impl SymbolModel {
    /// The name accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolModel::Char => "char",
            SymbolModel::Word => "word",
        }
    }
}

impl fmt::Display for SymbolModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymbolModel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "char" => Ok(SymbolModel::Char),
            "word" => Ok(SymbolModel::Word),
            other => Err(format!(
                "unknown symbol model '{}': expected 'char' or 'word'",
                other
            )),
        }
    }
}
