//! Error types for huffcode.

use thiserror::Error;

use crate::compression::symbol::Symbol;

/// Result type alias using the crate-wide [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, encoding, decoding or persisting a prefix code.
///
/// None of these are retryable: each one reflects a structural fault in the
/// input data or the persisted artifacts, so running again with the same input
/// reproduces it.
#[derive(Error, Debug)]
pub enum Error {
    /// A token has no entry in the code table.
    #[error("unknown symbol {symbol} at token {position}: no code in the table")]
    UnknownSymbol { symbol: Symbol, position: usize },

    /// The bit source ran dry before a requested bit could be produced.
    #[error("end of input: bit source exhausted")]
    EndOfInput,

    /// The bit source ran dry in the middle of a code.
    #[error("truncated stream: input ended mid-symbol after {decoded} decoded symbols")]
    TruncatedStream { decoded: usize },

    /// The token sequence handed to the encoder has no end-of-stream marker.
    #[error("token sequence has no end-of-stream sentinel")]
    MissingSentinel,

    /// A tree was requested from a model with no symbols.
    #[error("cannot build a prefix tree from an empty alphabet")]
    EmptyAlphabet,

    /// A persisted or supplied tree cannot be used for decoding.
    #[error("invalid tree: {0}")]
    InvalidTree(String),

    /// The input file is not valid UTF-8 text.
    #[error("input is not valid UTF-8 text: {0}")]
    InvalidText(#[from] std::string::FromUtf8Error),

    /// Underlying sink or source failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid tree error
    pub fn invalid_tree(msg: impl Into<String>) -> Self {
        Error::InvalidTree(msg.into())
    }

    /// True for the errors that signal a corrupt or mismatched bitstream.
    pub fn is_stream_corruption(&self) -> bool {
        matches!(self, Error::EndOfInput | Error::TruncatedStream { .. })
    }
}
