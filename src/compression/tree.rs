//! Huffman prefix tree and its greedy construction.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace};

use super::frequency::FrequencyModel;
use super::symbol::Symbol;
use crate::error::{Error, Result};

/// Represents a node in the Huffman tree.
///
/// Probabilities live only in the construction heap, not in the nodes, so a
/// built tree is exactly its shape plus its leaf symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    /// A leaf holds exactly one symbol.
    Leaf(Symbol),
    /// An internal node always has two children; bit 0 selects `left`, bit 1 `right`.
    Internal {
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn internal(left: HuffmanNode, right: HuffmanNode) -> Self {
        HuffmanNode::Internal {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf(_))
    }

    /// Follow one bit from an internal node. Leaves have no children.
    pub fn child(&self, bit: bool) -> Option<&HuffmanNode> {
        match self {
            HuffmanNode::Leaf(_) => None,
            HuffmanNode::Internal { left, right } => Some(if bit { right } else { left }),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffmanNode::Leaf(_) => 1,
            HuffmanNode::Internal { left, right } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffmanNode::Leaf(_) => 0,
            HuffmanNode::Internal { left, right } => 1 + left.depth().max(right.depth()),
        }
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Symbol>) {
        match self {
            HuffmanNode::Leaf(symbol) => out.push(symbol),
            HuffmanNode::Internal { left, right } => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
        }
    }
}

/// Heap entry for tree construction.
///
/// `BinaryHeap` is a max-heap, so the ordering is reversed: the entry with the
/// smallest probability, then the smallest sequence number, pops first.
#[derive(Debug)]
struct HeapEntry {
    probability: f64,
    seq: usize,
    node: HuffmanNode,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .probability
            .total_cmp(&self.probability)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

/// A built prefix tree. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTree {
    root: HuffmanNode,
}

impl PrefixTree {
    /// Build the Huffman tree for `model`.
    ///
    /// The two lowest-probability entries are combined each round, the first
    /// removed becoming the left child. Equal probabilities pop in insertion
    /// order: leaves in first-appearance order, then combined nodes in the
    /// order they were created. A single-symbol model yields a lone leaf root.
    pub fn build(model: &FrequencyModel) -> Result<Self> {
        if model.is_empty() {
            return Err(Error::EmptyAlphabet);
        }

        let mut heap: BinaryHeap<HeapEntry> = model
            .probabilities()
            .enumerate()
            .map(|(seq, (symbol, probability))| HeapEntry {
                probability,
                seq,
                node: HuffmanNode::Leaf(symbol.clone()),
            })
            .collect();
        let mut next_seq = heap.len();

        while heap.len() > 1 {
            let (first, second) = match (heap.pop(), heap.pop()) {
                (Some(first), Some(second)) => (first, second),
                _ => unreachable!("heap holds at least two entries"),
            };
            trace!(
                "merging p={:.6} (seq {}) with p={:.6} (seq {})",
                first.probability,
                first.seq,
                second.probability,
                second.seq
            );
            heap.push(HeapEntry {
                probability: first.probability + second.probability,
                seq: next_seq,
                node: HuffmanNode::internal(first.node, second.node),
            });
            next_seq += 1;
        }

        let root = heap.pop().ok_or(Error::EmptyAlphabet)?.node;
        let tree = PrefixTree { root };
        debug!(
            "built prefix tree: {} leaves, depth {}",
            tree.leaf_count(),
            tree.depth()
        );
        Ok(tree)
    }

    /// Wrap an existing root, e.g. one read back from storage.
    pub fn from_root(root: HuffmanNode) -> Self {
        PrefixTree { root }
    }

    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest code.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Leaf symbols, left to right.
    pub fn symbols(&self) -> Vec<&Symbol> {
        let mut out = Vec::new();
        self.root.collect_leaves(&mut out);
        out
    }

    /// Ensure decoding with this tree can terminate: exactly one sentinel
    /// leaf, and a lone leaf root only if it is that sentinel.
    pub fn validate(&self) -> Result<()> {
        let sentinels = self.symbols().into_iter().filter(|s| s.is_sentinel()).count();
        match sentinels {
            1 => Ok(()),
            0 => Err(Error::invalid_tree("no end-of-stream leaf")),
            n => Err(Error::invalid_tree(format!("{} end-of-stream leaves", n))),
        }
    }
}
