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

//! One-hot symbol encoding.

use super::FeatureExtractor;
use crate::error::FeatureResult;
use crate::feature_sets::IPA_VOWELS;
use crate::features::{FeatureMap, FeatureSet};
use std::collections::{BTreeMap, BTreeSet};

/// Kronecker-delta vectors, sized per class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OneHotExtractor {
    /// Vowel inventory; `None` leaves every symbol in the consonant class.
    vowels: Option<BTreeSet<String>>,
}

impl OneHotExtractor {
    /// Orthographic extractor without classification.
    pub fn characters() -> Self {
        Self { vowels: None }
    }

    /// Phonological extractor using the IPA vowel inventory.
    pub fn phonemes() -> Self {
        Self::with_vowels(IPA_VOWELS.iter().copied())
    }

    /// Phonological extractor with a custom vowel inventory.
    pub fn with_vowels<I, S>(vowels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vowels: Some(vowels.into_iter().map(Into::into).collect()),
        }
    }

    /// A segment is a vowel when it, or its first character, is in the inventory.
    pub fn is_vowel(&self, symbol: &str) -> bool {
        let Some(vowels) = &self.vowels else {
            return false;
        };
        if vowels.contains(symbol) {
            return true;
        }
        symbol
            .chars()
            .next()
            .map_or(false, |c| vowels.contains(c.to_string().as_str()))
    }
}

fn one_hot(symbols: &[&str]) -> FeatureResult<FeatureMap> {
    let dim = symbols.len();
    let vectors: BTreeMap<String, Vec<f32>> = symbols
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let mut v = vec![0.0; dim];
            v[i] = 1.0;
            (s.to_string(), v)
        })
        .collect();
    FeatureMap::new(vectors)
}

impl FeatureExtractor for OneHotExtractor {
    fn extract_symbols(&self, symbols: &BTreeSet<&str>) -> FeatureResult<FeatureSet> {
        let (vowels, consonants): (Vec<&str>, Vec<&str>) =
            symbols.iter().copied().partition(|s| self.is_vowel(s));
        tracing::debug!(
            vowels = vowels.len(),
            consonants = consonants.len(),
            "one-hot feature extraction"
        );
        FeatureSet::new(one_hot(&vowels)?, one_hot(&consonants)?)
    }
}
