//! Symbol occurrence statistics.

use std::collections::HashMap;

use log::debug;

use super::symbol::Symbol;

/// Occurrence counts for every distinct symbol of a token sequence.
///
/// Entries are kept in order of first appearance, which makes tree
/// construction a pure function of the token sequence.
#[derive(Debug, Clone, Default)]
pub struct FrequencyModel {
    entries: Vec<(Symbol, usize)>,
    index: HashMap<Symbol, usize>,
    total: usize,
}

impl FrequencyModel {
    /// Count every symbol in `tokens`.
    pub fn from_tokens(tokens: &[Symbol]) -> Self {
        let mut model = FrequencyModel::default();
        for token in tokens {
            match model.index.get(token) {
                Some(&slot) => model.entries[slot].1 += 1,
                None => {
                    model.index.insert(token.clone(), model.entries.len());
                    model.entries.push((token.clone(), 1));
                }
            }
        }
        model.total = tokens.len();
        debug!(
            "frequency model: {} distinct symbols over {} tokens",
            model.entries.len(),
            model.total
        );
        model
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the token sequence the model was built from.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Occurrence count of `symbol`, zero when absent.
    pub fn count(&self, symbol: &Symbol) -> usize {
        self.index
            .get(symbol)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// `count(symbol) / total`, or `None` when the symbol never occurs.
    pub fn probability(&self, symbol: &Symbol) -> Option<f64> {
        self.index
            .get(symbol)
            .map(|&slot| self.entries[slot].1 as f64 / self.total as f64)
    }

    /// `(symbol, probability)` pairs in first-appearance order.
    pub fn probabilities(&self) -> impl Iterator<Item = (&Symbol, f64)> + '_ {
        let total = self.total as f64;
        self.entries
            .iter()
            .map(move |(symbol, count)| (symbol, *count as f64 / total))
    }

    /// `(symbol, count)` pairs in first-appearance order.
    pub fn counts(&self) -> impl Iterator<Item = (&Symbol, usize)> + '_ {
        self.entries.iter().map(|(symbol, count)| (symbol, *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::tokenizer::tokenize;
    use crate::compression::SymbolModel;

    #[test]
    fn test_counts() {
        let tokens = tokenize("aabccc", SymbolModel::Char);
        let model = FrequencyModel::from_tokens(&tokens);
        assert_eq!(model.len(), 4);
        assert_eq!(model.total(), 7);
        assert_eq!(model.count(&Symbol::from('a')), 2);
        assert_eq!(model.count(&Symbol::from('b')), 1);
        assert_eq!(model.count(&Symbol::from('c')), 3);
        assert_eq!(model.count(&Symbol::EndOfStream), 1);
        assert_eq!(model.count(&Symbol::from('z')), 0);
    }

    #[test]
    fn test_first_appearance_order() {
        let tokens = tokenize("cab", SymbolModel::Char);
        let model = FrequencyModel::from_tokens(&tokens);
        let order: Vec<_> = model.counts().map(|(s, _)| s.clone()).collect();
        assert_eq!(
            order,
            vec![
                Symbol::from('c'),
                Symbol::from('a'),
                Symbol::from('b'),
                Symbol::EndOfStream
            ]
        );
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let tokens = tokenize("the quick brown fox jumps over the lazy dog", SymbolModel::Word);
        let model = FrequencyModel::from_tokens(&tokens);
        let sum: f64 = model.probabilities().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_thirds() {
        let tokens = tokenize("ab", SymbolModel::Char);
        let model = FrequencyModel::from_tokens(&tokens);
        for (_, p) in model.probabilities() {
            assert!((p - 1.0 / 3.0).abs() < 1e-12);
        }
        assert_eq!(model.probability(&Symbol::from('q')), None);
    }

    #[test]
    fn test_empty_model() {
        let model = FrequencyModel::from_tokens(&[]);
        assert!(model.is_empty());
        assert_eq!(model.probabilities().count(), 0);
    }
}
