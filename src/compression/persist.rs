//! Binary persistence of prefix trees.
//!
//! The tree is written pre-order after a short header:
//!
//! ```text
//! magic   b"HUFT"
//! version u8
//! node    := 0x00 node node          internal: left subtree, then right
//!          | 0x01 len:u32le utf8     text leaf
//!          | 0x02                    end-of-stream leaf
//! ```
//!
//! Only the shape and the leaf symbols are stored; probabilities are not
//! needed to decode.

use std::collections::HashSet;
use std::io::{self, Read, Write};

use log::debug;

use super::symbol::Symbol;
use super::tree::{HuffmanNode, PrefixTree};
use crate::error::{Error, Result};

pub const TREE_MAGIC: &[u8; 4] = b"HUFT";
pub const TREE_VERSION: u8 = 1;

const TAG_INTERNAL: u8 = 0x00;
const TAG_TEXT: u8 = 0x01;
const TAG_SENTINEL: u8 = 0x02;

/// Deepest tree accepted when reading. A Huffman tree over counts that fit
/// in 64 bits is far shallower than this.
pub const MAX_TREE_DEPTH: usize = 256;

/// Serialize `tree` to `writer`. Returns the number of bytes written.
pub fn write_tree<W: Write>(tree: &PrefixTree, writer: &mut W) -> Result<u64> {
    let mut counter = CountingWriter {
        inner: writer,
        count: 0,
    };
    counter.write_all(TREE_MAGIC)?;
    counter.write_all(&[TREE_VERSION])?;
    write_node(tree.root(), &mut counter)?;
    counter.flush()?;
    debug!(
        "wrote tree with {} leaves in {} bytes",
        tree.leaf_count(),
        counter.count
    );
    Ok(counter.count)
}

/// Serialize `tree` into a fresh buffer.
pub fn tree_to_bytes(tree: &PrefixTree) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_tree(tree, &mut bytes)?;
    Ok(bytes)
}

fn write_node<W: Write>(node: &HuffmanNode, writer: &mut W) -> Result<()> {
    match node {
        HuffmanNode::Internal { left, right } => {
            writer.write_all(&[TAG_INTERNAL])?;
            write_node(left, writer)?;
            write_node(right, writer)
        }
        HuffmanNode::Leaf(Symbol::Text(text)) => {
            let len = u32::try_from(text.len())
                .map_err(|_| Error::invalid_tree("leaf text longer than u32::MAX bytes"))?;
            writer.write_all(&[TAG_TEXT])?;
            writer.write_all(&len.to_le_bytes())?;
            writer.write_all(text.as_bytes())?;
            Ok(())
        }
        HuffmanNode::Leaf(Symbol::EndOfStream) => {
            writer.write_all(&[TAG_SENTINEL])?;
            Ok(())
        }
    }
}

/// Read a tree written by [`write_tree`], consuming `reader` to its end.
///
/// Anything malformed is reported as [`Error::InvalidTree`]; genuine I/O
/// failures keep their [`Error::Io`] form.
pub fn read_tree<R: Read>(reader: &mut R) -> Result<PrefixTree> {
    let mut magic = [0u8; 4];
    read_exact(reader, &mut magic, "header")?;
    if &magic != TREE_MAGIC {
        return Err(Error::invalid_tree(format!("bad magic {:02x?}", magic)));
    }
    let mut version = [0u8; 1];
    read_exact(reader, &mut version, "header")?;
    if version[0] != TREE_VERSION {
        return Err(Error::invalid_tree(format!(
            "unsupported version {}",
            version[0]
        )));
    }

    let mut seen = HashSet::new();
    let root = read_node(reader, 0, &mut seen)?;

    let mut trailing = [0u8; 1];
    if reader.read(&mut trailing)? != 0 {
        return Err(Error::invalid_tree("trailing bytes after tree"));
    }

    let tree = PrefixTree::from_root(root);
    tree.validate()?;
    debug!("read tree with {} leaves", tree.leaf_count());
    Ok(tree)
}

/// Parse a tree from a byte slice.
pub fn tree_from_bytes(mut bytes: &[u8]) -> Result<PrefixTree> {
    read_tree(&mut bytes)
}

fn read_node<R: Read>(
    reader: &mut R,
    depth: usize,
    seen: &mut HashSet<Symbol>,
) -> Result<HuffmanNode> {
    if depth > MAX_TREE_DEPTH {
        return Err(Error::invalid_tree(format!(
            "tree deeper than {} levels",
            MAX_TREE_DEPTH
        )));
    }
    let mut tag = [0u8; 1];
    read_exact(reader, &mut tag, "node tag")?;
    match tag[0] {
        TAG_INTERNAL => {
            let left = read_node(reader, depth + 1, seen)?;
            let right = read_node(reader, depth + 1, seen)?;
            Ok(HuffmanNode::internal(left, right))
        }
        TAG_TEXT => {
            let mut len = [0u8; 4];
            read_exact(reader, &mut len, "leaf length")?;
            let len = u32::from_le_bytes(len) as usize;
            let mut buf = Vec::new();
            reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
            if buf.len() != len {
                return Err(Error::invalid_tree("truncated leaf text"));
            }
            let text = String::from_utf8(buf)
                .map_err(|e| Error::invalid_tree(format!("leaf text is not UTF-8: {}", e)))?;
            leaf(Symbol::Text(text), seen)
        }
        TAG_SENTINEL => leaf(Symbol::EndOfStream, seen),
        other => Err(Error::invalid_tree(format!("unknown node tag {:#04x}", other))),
    }
}

fn leaf(symbol: Symbol, seen: &mut HashSet<Symbol>) -> Result<HuffmanNode> {
    if !seen.insert(symbol.clone()) {
        return Err(Error::invalid_tree(format!("duplicate leaf {}", symbol)));
    }
    Ok(HuffmanNode::Leaf(symbol))
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::invalid_tree(format!("truncated {}", what)),
        _ => Error::Io(e),
    })
}

struct CountingWriter<'a, W: Write> {
    inner: &'a mut W,
    count: u64,
}

impl<W: Write> Write for CountingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
