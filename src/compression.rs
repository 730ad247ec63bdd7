//! Static Huffman compression of text.
//!
//! Compression runs in two phases over a fully tokenized input:
//! - tokenize the text under a [`SymbolModel`] and append the end-of-stream sentinel
//! - count symbols ([`FrequencyModel`]) and build the [`PrefixTree`]
//! - derive a [`CodeTable`] and stream every token's code through a [`BitWriter`]
//!
//! Decompression walks the same tree bit by bit from a [`BitReader`] until it
//! reaches the sentinel leaf, so the zero padding in the last byte is never
//! mistaken for data.
//!
//! # Examples
//!
//! ```rust
//! use huffcode::compression::{compress, decompress, SymbolModel};
//!
//! let packed = compress("go go!", SymbolModel::Word).unwrap();
//! assert_eq!(decompress(&packed.tree, &packed.bits).unwrap(), "go go!");
//! ```

pub use crate::error::{Error, Result};

/// Trait for compression algorithms
pub trait Compression {
    /// Compress the input data
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress the compressed data
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

pub mod bit_io;
pub mod code_table;
pub mod codec;
pub mod frequency;
pub mod persist;
pub mod symbol;
pub mod tokenizer;
pub mod tree;

pub use bit_io::{BitReader, BitWriter};
pub use code_table::{Code, CodeTable};
pub use codec::{decode, decode_into, encode, EncodeStats};
pub use frequency::FrequencyModel;
pub use persist::{read_tree, tree_from_bytes, tree_to_bytes, write_tree};
pub use symbol::{Symbol, SymbolModel};
pub use tokenizer::{detokenize, tokenize};
pub use tree::{HuffmanNode, PrefixTree};

use log::debug;

/// Output of an in-memory compression run.
#[derive(Debug, Clone)]
pub struct Compressed {
    /// The tree needed to decode `bits`.
    pub tree: PrefixTree,
    /// Packed bitstream, zero-padded to a whole byte.
    pub bits: Vec<u8>,
    pub stats: EncodeStats,
}

/// Tokenize, model, build the tree and encode `text`.
pub fn compress(text: &str, model: SymbolModel) -> Result<Compressed> {
    let tokens = tokenize(text, model);
    let frequencies = FrequencyModel::from_tokens(&tokens);
    let tree = PrefixTree::build(&frequencies)?;
    let table = CodeTable::from_tree(&tree);

    let mut writer = BitWriter::new(Vec::new());
    let stats = encode(&tokens, &table, &mut writer)?;
    Ok(Compressed {
        tree,
        bits: writer.into_inner(),
        stats,
    })
}

/// Reconstruct the text encoded in `bits` with `tree`.
pub fn decompress(tree: &PrefixTree, bits: &[u8]) -> Result<String> {
    let mut reader = BitReader::new(bits);
    decode(tree, &mut reader)
}

/// Self-contained Huffman codec: the output carries its own tree.
///
/// Layout: tree length as `u64` little-endian, the persisted tree, then the
/// bitstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCodec {
    pub model: SymbolModel,
}

impl HuffmanCodec {
    pub fn new(model: SymbolModel) -> Self {
        Self { model }
    }
}

impl Compression for HuffmanCodec {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let text = String::from_utf8(data.to_vec())?;
        let packed = compress(&text, self.model)?;
        let tree = tree_to_bytes(&packed.tree)?;

        let mut out = Vec::with_capacity(8 + tree.len() + packed.bits.len());
        out.extend_from_slice(&(tree.len() as u64).to_le_bytes());
        out.extend_from_slice(&tree);
        out.extend_from_slice(&packed.bits);
        debug!(
            "codec packed {} bytes into {} (tree {}, bits {})",
            data.len(),
            out.len(),
            tree.len(),
            packed.bits.len()
        );
        Ok(out)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let (len, rest) = data
            .split_first_chunk::<8>()
            .ok_or_else(|| Error::invalid_tree("missing tree length"))?;
        let len = usize::try_from(u64::from_le_bytes(*len))
            .ok()
            .filter(|&len| len <= rest.len())
            .ok_or_else(|| Error::invalid_tree("tree length exceeds input"))?;
        let (tree, bits) = rest.split_at(len);
        let tree = tree_from_bytes(tree)?;
        Ok(decompress(&tree, bits)?.into_bytes())
    }
}
