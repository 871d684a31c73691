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

//! Feature maps: the fitted symbol -> vector resolution.
//!
//! A [`FeatureSet`] holds two disjoint maps, one per [`SegmentClass`]. The maps
//! may have different widths; [`FeatureSet::width`] is the reconciled width
//! used where every symbol has to occupy the same number of columns.

use crate::error::{FeatureError, FeatureResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Vowel/consonant partition of symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentClass {
    Vowel,
    Consonant,
}

impl fmt::Display for SegmentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentClass::Vowel => write!(f, "vowel"),
            SegmentClass::Consonant => write!(f, "consonant"),
        }
    }
}

/// Immutable symbol -> vector mapping with one shared dimensionality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureMap {
    dim: usize,
    vectors: BTreeMap<String, Vec<f32>>,
}

impl FeatureMap {
    /// Build a map, checking that every vector has the same length.
    pub fn new(vectors: BTreeMap<String, Vec<f32>>) -> FeatureResult<Self> {
        let dim = vectors.values().next().map_or(0, Vec::len);
        if let Some((symbol, v)) = vectors.iter().find(|(_, v)| v.len() != dim) {
            return Err(FeatureError::config(format!(
                "feature vector for '{}' has length {}, expected {}",
                symbol,
                v.len(),
                dim
            )));
        }
        Ok(Self { dim, vectors })
    }

    /// Vector width shared by all symbols (0 when empty).
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, symbol: &str) -> Option<&[f32]> {
        self.vectors.get(symbol).map(Vec::as_slice)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.vectors.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Symbols in sorted order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.vectors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.vectors.iter().map(|(s, v)| (s.as_str(), v.as_slice()))
    }
}

/// The pair of fitted feature maps produced by an extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    vowels: FeatureMap,
    consonants: FeatureMap,
}

impl FeatureSet {
    /// Combine two maps; a symbol may not appear in both.
    pub fn new(vowels: FeatureMap, consonants: FeatureMap) -> FeatureResult<Self> {
        if let Some(shared) = vowels.symbols().find(|s| consonants.contains(s)) {
            return Err(FeatureError::config(format!(
                "symbol '{}' is classified as both vowel and consonant",
                shared
            )));
        }
        Ok(Self { vowels, consonants })
    }

    /// A set without classification: every symbol is a consonant.
    pub fn unclassified(map: FeatureMap) -> Self {
        Self {
            vowels: FeatureMap::default(),
            consonants: map,
        }
    }

    pub fn vowels(&self) -> &FeatureMap {
        &self.vowels
    }

    pub fn consonants(&self) -> &FeatureMap {
        &self.consonants
    }

    pub fn map(&self, class: SegmentClass) -> &FeatureMap {
        match class {
            SegmentClass::Vowel => &self.vowels,
            SegmentClass::Consonant => &self.consonants,
        }
    }

    /// Width of one class's vectors.
    pub fn class_dim(&self, class: SegmentClass) -> usize {
        self.map(class).dim()
    }

    /// Reconciled width: the wider of the two classes.
    pub fn width(&self) -> usize {
        self.vowels.dim().max(self.consonants.dim())
    }

    /// Number of distinct symbols across both classes.
    pub fn symbol_count(&self) -> usize {
        self.vowels.len() + self.consonants.len()
    }

    pub fn classify(&self, symbol: &str) -> Option<SegmentClass> {
        if self.vowels.contains(symbol) {
            Some(SegmentClass::Vowel)
        } else if self.consonants.contains(symbol) {
            Some(SegmentClass::Consonant)
        } else {
            None
        }
    }

    /// Classify or fail with an unknown-symbol error.
    pub fn require_class(&self, symbol: &str) -> FeatureResult<SegmentClass> {
        self.classify(symbol)
            .ok_or_else(|| FeatureError::UnknownSymbol(symbol.to_string()))
    }

    /// Vector for a symbol of either class.
    pub fn vector(&self, symbol: &str) -> FeatureResult<&[f32]> {
        self.vowels
            .get(symbol)
            .or_else(|| self.consonants.get(symbol))
            .ok_or_else(|| FeatureError::UnknownSymbol(symbol.to_string()))
    }

    /// Vector for a symbol that must belong to `class`.
    pub fn vector_in(&self, symbol: &str, class: SegmentClass) -> FeatureResult<&[f32]> {
        match self.map(class).get(symbol) {
            Some(v) => Ok(v),
            None if self.classify(symbol).is_some() => Err(FeatureError::WrongClass {
                symbol: symbol.to_string(),
                expected: class,
            }),
            None => Err(FeatureError::UnknownSymbol(symbol.to_string())),
        }
    }

    /// Copy a symbol's vector into `out`, zero-filling the tail.
    ///
    /// An `out` narrower than the symbol's vector is a `Config` error.
    pub fn write_padded(&self, symbol: &str, out: &mut [f32]) -> FeatureResult<()> {
        let v = self.vector(symbol)?;
        if out.len() < v.len() {
            return Err(FeatureError::Config(format!(
                "slot of width {} cannot hold the {}-wide vector of '{}'",
                out.len(),
                v.len(),
                symbol
            )));
        }
        out[..v.len()].copy_from_slice(v);
        out[v.len()..].iter_mut().for_each(|x| *x = 0.0);
        Ok(())
    }
}
