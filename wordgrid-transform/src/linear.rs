// Copyright 2025 Wordgrid Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Linear alignment: symbol `i` goes to slot `i`.

use crate::grid::{Grid, PadSide};
use crate::transformer::{fit_sequences, FeatureSource, FeatureSpace, SlotRole, Transformer};
use wordgrid_core::{FeatureError, FeatureResult, FeatureSet, Item, Sequence};

#[derive(Debug, Clone)]
struct LinearState {
    features: FeatureSet,
    grid: Grid,
}

/// Position-wise encoding over a grid as long as the longest fitted word.
#[derive(Debug, Clone)]
pub struct LinearTransformer {
    source: FeatureSource,
    field: Option<String>,
    pad: PadSide,
    state: Option<LinearState>,
}

impl LinearTransformer {
    pub fn new(source: impl Into<FeatureSource>) -> Self {
        Self {
            source: source.into(),
            field: None,
            pad: PadSide::default(),
            state: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_pad(mut self, pad: PadSide) -> Self {
        self.pad = pad;
        self
    }

    /// Feature maps resolved at fit.
    pub fn feature_set(&self) -> Option<&FeatureSet> {
        self.state.as_ref().map(|s| &s.features)
    }

    /// Number of symbol positions.
    pub fn max_len(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.grid.len())
    }
}

impl Transformer for LinearTransformer {
    fn fit(&mut self, items: &[Item]) -> FeatureResult<()> {
        let words = fit_sequences(items, self.field.as_deref())?;
        let refs: Vec<&Sequence> = words.iter().map(|w| w.as_ref()).collect();
        let features = self.source.resolve(&refs)?;

        let mut max_len = 0;
        for word in &refs {
            for symbol in word.symbols() {
                features.vector(symbol)?;
            }
            max_len = max_len.max(word.len());
        }

        let grid = Grid::build((0..max_len).map(|_| (SlotRole::Position, None)), &features);
        tracing::info!(
            words = refs.len(),
            positions = max_len,
            width = grid.width(),
            "Linear grid fitted"
        );
        self.state = Some(LinearState { features, grid });
        Ok(())
    }

    fn vectorize(&self, word: &Sequence) -> FeatureResult<Vec<f32>> {
        let state = self.state.as_ref().ok_or(FeatureError::NotFitted)?;
        let symbols = word.symbols();
        let capacity = state.grid.len();
        if symbols.len() > capacity {
            return Err(FeatureError::GridOverflow(format!(
                "word '{}' has {} symbols, grid holds {}",
                word.display(),
                symbols.len(),
                capacity
            )));
        }

        let start = self.pad.start(capacity, symbols.len());
        let mut row = vec![0.0; state.grid.width()];
        for (i, symbol) in symbols.iter().enumerate() {
            state.grid.fill(start + i, symbol, &state.features, &mut row)?;
        }
        Ok(row)
    }

    fn vec_len(&self) -> FeatureResult<usize> {
        self.state
            .as_ref()
            .map(|s| s.grid.width())
            .ok_or(FeatureError::NotFitted)
    }

    fn features(&self) -> FeatureResult<FeatureSpace> {
        let state = self.state.as_ref().ok_or(FeatureError::NotFitted)?;
        Ok(FeatureSpace::Grid(state.grid.slots().to_vec()))
    }

    fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordgrid_core::{items_from_words, ErrorKind, OneHotExtractor};

    #[test]
    fn test_right_padding() {
        let items = items_from_words(["ab", "b"]);
        let mut t = LinearTransformer::new(OneHotExtractor::characters());
        let x = t.fit_transform(&items).unwrap();

        assert_eq!(x.shape(), &[2, 4]);
        assert_eq!(x.row(0).to_vec(), vec![1.0, 0.0, 0.0, 1.0]);
        assert_eq!(x.row(1).to_vec(), vec![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_left_padding() {
        let items = items_from_words(["ab", "b"]);
        let mut t = LinearTransformer::new(OneHotExtractor::characters()).with_pad(PadSide::Left);
        let x = t.fit_transform(&items).unwrap();
        assert_eq!(x.row(1).to_vec(), vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_longer_word_overflows() {
        let mut t = LinearTransformer::new(OneHotExtractor::characters());
        t.fit(&items_from_words(["ab"])).unwrap();
        let err = t.transform(&items_from_words(["aba"])).unwrap_err();
        assert!(matches!(err, FeatureError::GridOverflow(_)));
        assert_eq!(err.kind(), ErrorKind::Vocabulary);
    }

    #[test]
    fn test_unseen_symbol_fails() {
        let mut t = LinearTransformer::new(OneHotExtractor::characters());
        t.fit(&items_from_words(["ab"])).unwrap();
        let err = t.transform(&items_from_words(["ac"])).unwrap_err();
        assert_eq!(err, FeatureError::UnknownSymbol("c".into()));
    }

    #[test]
    fn test_mixed_class_widths_are_reconciled() {
        let items = items_from_words([Sequence::flat(["p", "a", "t"])]);
        let mut t = LinearTransformer::new(OneHotExtractor::phonemes());
        let x = t.fit_transform(&items).unwrap();
        // consonants {p, t} are 2 wide, vowels {a} 1 wide: every position takes 2
        assert_eq!(x.shape(), &[1, 6]);
        assert_eq!(x.row(0).to_vec(), vec![1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_not_fitted() {
        let t = LinearTransformer::new(OneHotExtractor::characters());
        assert_eq!(t.vec_len().unwrap_err(), FeatureError::NotFitted);
        assert!(!t.is_fitted());
    }
}
