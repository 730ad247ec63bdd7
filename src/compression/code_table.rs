//! Symbol to code lookup derived from a prefix tree.

use std::collections::HashMap;

use bitvec::prelude::*;

use super::frequency::FrequencyModel;
use super::symbol::Symbol;
use super::tree::{HuffmanNode, PrefixTree};

/// A Huffman code: the root-to-leaf path, 0 for left and 1 for right.
pub type Code = BitVec<u8, Msb0>;

/// Maps every leaf symbol of a tree to its code.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    codes: HashMap<Symbol, Code>,
}

impl CodeTable {
    /// Walk `tree` depth-first and record the path to every leaf.
    ///
    /// A tree that is a single leaf gives that symbol the empty code.
    pub fn from_tree(tree: &PrefixTree) -> Self {
        let mut codes = HashMap::new();
        let mut path = Code::new();
        collect_codes(tree.root(), &mut path, &mut codes);
        CodeTable { codes }
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(symbol).map(|code| code.as_bitslice())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &BitSlice<u8, Msb0>)> + '_ {
        self.codes.iter().map(|(s, c)| (s, c.as_bitslice()))
    }

    /// Average code length in bits per token under `model`.
    pub fn expected_length(&self, model: &FrequencyModel) -> f64 {
        model
            .probabilities()
            .map(|(symbol, p)| p * self.codes.get(symbol).map_or(0, |c| c.len()) as f64)
            .sum()
    }

    /// True when no code is a prefix of another code.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.codes.values().collect();
        // After sorting, a prefix always sorts directly before some code it prefixes.
        codes.sort();
        codes
            .windows(2)
            .all(|pair| !pair[1].starts_with(pair[0].as_bitslice()))
    }
}

fn collect_codes(node: &HuffmanNode, path: &mut Code, codes: &mut HashMap<Symbol, Code>) {
    match node {
        HuffmanNode::Leaf(symbol) => {
            codes.insert(symbol.clone(), path.clone());
        }
        HuffmanNode::Internal { left, right } => {
            path.push(false);
            collect_codes(left, path, codes);
            path.pop();
            path.push(true);
            collect_codes(right, path, codes);
            path.pop();
        }
    }
}
