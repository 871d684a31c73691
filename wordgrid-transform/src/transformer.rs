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

//! The transformer contract shared by every encoding strategy.

use ndarray::{aview1, Array2};
use serde::Serialize;
use std::borrow::Cow;
use wordgrid_core::{
    collect_sequences, DistinctiveFeatureExtractor, Extractor, FeatureError, FeatureExtractor,
    FeatureResult, FeatureSet, Item, OneHotExtractor, PredefinedFeatureExtractor, SegmentClass,
    Sequence,
};

/// Fit-once, transform-many word encoder.
///
/// `fit` freezes the output width; `transform` only reads state, so a fitted
/// transformer can be shared across threads.
pub trait Transformer: Send + Sync {
    /// Establish vocabulary, grid shape or unit assignment from `items`.
    fn fit(&mut self, items: &[Item]) -> FeatureResult<()>;

    /// Encode one word into a row of exactly `vec_len()` values.
    fn vectorize(&self, word: &Sequence) -> FeatureResult<Vec<f32>>;

    /// Row width, or `NotFitted`.
    fn vec_len(&self) -> FeatureResult<usize>;

    /// Description of the fitted feature space.
    fn features(&self) -> FeatureResult<FeatureSpace>;

    /// Field read from record items.
    fn field(&self) -> Option<&str>;

    fn is_fitted(&self) -> bool {
        self.vec_len().is_ok()
    }

    /// Encode every item; rows follow input order.
    ///
    /// Fails as a whole on the first word that cannot be encoded.
    fn transform(&self, items: &[Item]) -> FeatureResult<Array2<f32>> {
        let width = self.vec_len()?;
        let mut out = Array2::zeros((items.len(), width));
        for (i, item) in items.iter().enumerate() {
            let word = item.sequence(self.field())?;
            let row = self.vectorize(&word)?;
            debug_assert_eq!(row.len(), width);
            out.row_mut(i).assign(&aview1(&row));
        }
        Ok(out)
    }

    fn fit_transform(&mut self, items: &[Item]) -> FeatureResult<Array2<f32>> {
        self.fit(items)?;
        self.transform(items)
    }
}

/// Resolve the words to fit on; an empty collection cannot define a feature space.
pub(crate) fn fit_sequences<'a>(
    items: &'a [Item],
    field: Option<&str>,
) -> FeatureResult<Vec<Cow<'a, Sequence>>> {
    if items.is_empty() {
        return Err(FeatureError::Config("cannot fit on an empty collection".into()));
    }
    collect_sequences(items, field)
}

/// Where a grid transformer gets its feature maps.
///
/// Either maps extracted up front, or an extractor the transformer runs over its
/// own fitting data.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureSource {
    Fitted(FeatureSet),
    Extractor(Extractor),
}

impl FeatureSource {
    pub fn resolve(&self, words: &[&Sequence]) -> FeatureResult<FeatureSet> {
        match self {
            FeatureSource::Fitted(set) => Ok(set.clone()),
            FeatureSource::Extractor(extractor) => extractor.extract(words),
        }
    }
}

impl From<FeatureSet> for FeatureSource {
    fn from(set: FeatureSet) -> Self {
        FeatureSource::Fitted(set)
    }
}

impl From<Extractor> for FeatureSource {
    fn from(extractor: Extractor) -> Self {
        FeatureSource::Extractor(extractor)
    }
}

impl From<OneHotExtractor> for FeatureSource {
    fn from(extractor: OneHotExtractor) -> Self {
        FeatureSource::Extractor(extractor.into())
    }
}

impl From<DistinctiveFeatureExtractor> for FeatureSource {
    fn from(extractor: DistinctiveFeatureExtractor) -> Self {
        FeatureSource::Extractor(extractor.into())
    }
}

impl From<PredefinedFeatureExtractor> for FeatureSource {
    fn from(extractor: PredefinedFeatureExtractor) -> Self {
        FeatureSource::Extractor(extractor.into())
    }
}

/// What a slot may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRole {
    /// Any symbol, padded to the reconciled width
    Position,
    Consonant,
    Vowel,
    Onset,
    Nucleus,
    Coda,
}

impl SlotRole {
    /// Class a slot is restricted to; `None` for untyped positions.
    pub fn class(&self) -> Option<SegmentClass> {
        match self {
            SlotRole::Position => None,
            SlotRole::Vowel | SlotRole::Nucleus => Some(SegmentClass::Vowel),
            SlotRole::Consonant | SlotRole::Onset | SlotRole::Coda => Some(SegmentClass::Consonant),
        }
    }
}

/// One grid slot and the columns it occupies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    pub role: SlotRole,
    /// Syllable position for ONC grids.
    pub syllable: Option<usize>,
    pub offset: usize,
    pub width: usize,
}

/// Introspection view of a fitted transformer's columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSpace {
    /// Slot layout of grid transformers.
    Grid(Vec<Slot>),
    /// Column-ordered n-gram vocabulary.
    Ngrams(Vec<String>),
    /// Randomized Wickelfeature units.
    Units {
        num_units: usize,
        n: usize,
        alphabet: Vec<String>,
        seed: u64,
    },
}

impl FeatureSpace {
    /// Number of columns described.
    pub fn len(&self) -> usize {
        match self {
            FeatureSpace::Grid(slots) => slots.iter().map(|s| s.width).sum(),
            FeatureSpace::Ngrams(grams) => grams.len(),
            FeatureSpace::Units { num_units, .. } => *num_units,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
