//! Encoding tokens to a bitstream and decoding them back.

use std::io::{Read, Write};

use log::{debug, trace, warn};

use super::bit_io::{BitReader, BitWriter};
use super::code_table::CodeTable;
use super::symbol::Symbol;
use super::tree::{HuffmanNode, PrefixTree};
use crate::error::{Error, Result};

/// Counters from one encode run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeStats {
    /// Tokens encoded, sentinel included.
    pub tokens: usize,
    /// Meaningful bits, padding excluded.
    pub bits: u64,
    /// Bytes handed to the sink.
    pub bytes: u64,
}

/// Write the code of every token through `writer`.
///
/// Real symbols are streamed; the sentinel's code goes through the
/// pad-and-flush path and ends the stream. Tokens after the sentinel are
/// ignored.
pub fn encode<W: Write>(
    tokens: &[Symbol],
    table: &CodeTable,
    writer: &mut BitWriter<W>,
) -> Result<EncodeStats> {
    for (position, token) in tokens.iter().enumerate() {
        let code = table.get(token).ok_or_else(|| Error::UnknownSymbol {
            symbol: token.clone(),
            position,
        })?;
        if !token.is_sentinel() {
            writer.write(code)?;
            continue;
        }

        writer.finish(code)?;
        if position + 1 < tokens.len() {
            warn!(
                "ignoring {} tokens after the end-of-stream sentinel",
                tokens.len() - position - 1
            );
        }
        let stats = EncodeStats {
            tokens: position + 1,
            bits: writer.bits_written(),
            bytes: writer.bytes_written(),
        };
        debug!(
            "encoded {} tokens into {} bits ({} bytes)",
            stats.tokens, stats.bits, stats.bytes
        );
        return Ok(stats);
    }
    Err(Error::MissingSentinel)
}

/// Decode symbols from `reader` by walking `tree`, writing their text to `out`.
///
/// Bit 0 descends left, bit 1 right. Each leaf reached emits its text and
/// restarts at the root; the sentinel leaf ends decoding, so padding after it
/// is never read as data. Returns the number of symbols emitted.
pub fn decode_into<R: Read, W: Write>(
    tree: &PrefixTree,
    reader: &mut BitReader<R>,
    out: &mut W,
) -> Result<usize> {
    tree.validate()?;

    let root = tree.root();
    let mut node = root;
    let mut decoded = 0usize;
    loop {
        match node {
            HuffmanNode::Leaf(Symbol::EndOfStream) => break,
            HuffmanNode::Leaf(Symbol::Text(text)) => {
                trace!("decoded {:?} after {} bits", text, reader.bits_read());
                out.write_all(text.as_bytes())?;
                decoded += 1;
                node = root;
            }
            HuffmanNode::Internal { left, right } => {
                let bit = match reader.next_bit() {
                    Ok(bit) => bit,
                    Err(Error::EndOfInput) => return Err(Error::TruncatedStream { decoded }),
                    Err(e) => return Err(e),
                };
                node = if bit { right } else { left };
            }
        }
    }

    if !reader.only_padding_remains()? {
        warn!(
            "bitstream continues past the end-of-stream code at bit {}",
            reader.bits_read()
        );
    }
    debug!(
        "decoded {} symbols from {} bits",
        decoded,
        reader.bits_read()
    );
    Ok(decoded)
}

/// Decode a whole bitstream into a string.
pub fn decode<R: Read>(tree: &PrefixTree, reader: &mut BitReader<R>) -> Result<String> {
    let mut out = Vec::new();
    decode_into(tree, reader, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::frequency::FrequencyModel;
    use crate::compression::tokenizer::tokenize;
    use crate::compression::SymbolModel;

    fn setup(text: &str, model: SymbolModel) -> (Vec<Symbol>, PrefixTree, CodeTable) {
        let tokens = tokenize(text, model);
        let tree = PrefixTree::build(&FrequencyModel::from_tokens(&tokens)).unwrap();
        let table = CodeTable::from_tree(&tree);
        (tokens, tree, table)
    }

    fn encode_to_vec(tokens: &[Symbol], table: &CodeTable) -> Vec<u8> {
        let mut writer = BitWriter::new(Vec::new());
        encode(tokens, table, &mut writer).unwrap();
        writer.into_inner()
    }

    #[test]
    fn test_encode_ab() {
        // a=10, b=11, EOS=0 -> 1011 0 + padding
        let (tokens, _, table) = setup("ab", SymbolModel::Char);
        let mut writer = BitWriter::new(Vec::new());
        let stats = encode(&tokens, &table, &mut writer).unwrap();
        assert_eq!(stats.tokens, 3);
        assert_eq!(stats.bits, 5);
        assert_eq!(stats.bytes, 1);
        assert_eq!(writer.into_inner(), vec![0b1011_0000]);
    }

    #[test]
    fn test_roundtrip_ab() {
        let (tokens, tree, table) = setup("ab", SymbolModel::Char);
        let bytes = encode_to_vec(&tokens, &table);
        let mut reader = BitReader::new(&bytes[..]);
        assert_eq!(decode(&tree, &mut reader).unwrap(), "ab");
    }

    #[test]
    fn test_roundtrip_word_mode() {
        let (tokens, tree, table) = setup("go go!", SymbolModel::Word);
        let bytes = encode_to_vec(&tokens, &table);
        let mut reader = BitReader::new(&bytes[..]);
        assert_eq!(decode(&tree, &mut reader).unwrap(), "go go!");
    }

    #[test]
    fn test_roundtrip_repeated_character() {
        let (tokens, tree, table) = setup("aaaa", SymbolModel::Char);
        let bytes = encode_to_vec(&tokens, &table);
        assert_eq!(bytes.len(), 1);
        let mut reader = BitReader::new(&bytes[..]);
        assert_eq!(decode(&tree, &mut reader).unwrap(), "aaaa");
    }

    #[test]
    fn test_empty_input_encodes_to_nothing() {
        let (tokens, tree, table) = setup("", SymbolModel::Char);
        let bytes = encode_to_vec(&tokens, &table);
        assert!(bytes.is_empty());
        let mut reader = BitReader::new(&bytes[..]);
        assert_eq!(decode(&tree, &mut reader).unwrap(), "");
    }

    #[test]
    fn test_unknown_symbol() {
        let (_, _, table) = setup("ab", SymbolModel::Char);
        let tokens = vec![Symbol::from('a'), Symbol::from('z'), Symbol::EndOfStream];
        let mut writer = BitWriter::new(Vec::new());
        match encode(&tokens, &table, &mut writer) {
            Err(Error::UnknownSymbol { symbol, position }) => {
                assert_eq!(symbol, Symbol::from('z'));
                assert_eq!(position, 1);
            }
            other => panic!("expected UnknownSymbol, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_sentinel() {
        let (_, _, table) = setup("ab", SymbolModel::Char);
        let tokens = vec![Symbol::from('a'), Symbol::from('b')];
        let mut writer = BitWriter::new(Vec::new());
        assert!(matches!(
            encode(&tokens, &table, &mut writer),
            Err(Error::MissingSentinel)
        ));
    }

    #[test]
    fn test_tokens_after_sentinel_are_ignored() {
        let (_, tree, table) = setup("ab", SymbolModel::Char);
        let tokens = vec![Symbol::from('a'), Symbol::EndOfStream, Symbol::from('b')];
        let bytes = encode_to_vec(&tokens, &table);
        let mut reader = BitReader::new(&bytes[..]);
        assert_eq!(decode(&tree, &mut reader).unwrap(), "a");
    }

    #[test]
    fn test_truncated_stream() {
        let text = "the quick brown fox jumps over the lazy dog";
        let (tokens, tree, table) = setup(text, SymbolModel::Char);
        let bytes = encode_to_vec(&tokens, &table);
        let cut = &bytes[..bytes.len() / 2];
        let mut reader = BitReader::new(cut);
        let err = decode(&tree, &mut reader).unwrap_err();
        assert!(matches!(err, Error::TruncatedStream { decoded } if decoded > 0));
        assert!(err.is_stream_corruption());
    }

    #[test]
    fn test_decode_rejects_tree_without_sentinel() {
        let tree = PrefixTree::from_root(HuffmanNode::Leaf(Symbol::from('a')));
        let mut reader = BitReader::new(&[0u8][..]);
        assert!(matches!(
            decode(&tree, &mut reader),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn test_padding_is_never_decoded() {
        // "ab" = 1011 0 then three padding zeros, which would decode as EOS again.
        let (_, tree, _) = setup("ab", SymbolModel::Char);
        let bytes = [0b1011_0000u8];
        let mut reader = BitReader::new(&bytes[..]);
        assert_eq!(decode(&tree, &mut reader).unwrap(), "ab");
        assert_eq!(reader.bits_read(), 5);
    }
}
