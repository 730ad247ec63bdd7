//! # huffcode
//!
//! Static Huffman compression of text over character or word symbol models.
//!
//! The [`compression`] module holds the codec core (bit I/O, tokenizer,
//! frequency model, tree construction, code table, encoder and decoder). The
//! [`pipeline`] module wires it to files the way the `huff-compress` and
//! `huff-decompress` binaries use it.

pub mod compression;
pub mod error;
pub mod pipeline;

pub use compression::{compress, decompress, Compression, HuffmanCodec, PrefixTree, SymbolModel};
pub use error::{Error, Result};
