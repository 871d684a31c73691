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

//! Distinctive-feature encoding.
//!
//! Each feature group is one-hot encoded over the values that actually occur
//! in the vocabulary for that class, so a group with three attested values
//! contributes three columns regardless of how many the table defines.

use super::FeatureExtractor;
use crate::error::{FeatureError, FeatureResult};
use crate::feature_sets;
use crate::features::{FeatureMap, FeatureSet, SegmentClass};
use crate::tables::{FeatureTable, PhonemeTable};
use std::collections::{BTreeMap, BTreeSet};

/// Per-group one-hot encoding driven by a [`PhonemeTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct DistinctiveFeatureExtractor {
    table: PhonemeTable,
}

impl DistinctiveFeatureExtractor {
    pub fn new(table: PhonemeTable) -> FeatureResult<Self> {
        table.validate()?;
        Ok(Self { table })
    }

    /// Extractor over the built-in IPA table.
    pub fn ipa() -> FeatureResult<Self> {
        Self::new(feature_sets::ipa_features())
    }

    pub fn table(&self) -> &PhonemeTable {
        &self.table
    }
}

fn encode_class(table: &FeatureTable, symbols: &[&str]) -> FeatureResult<FeatureMap> {
    // Attested values per group, each group an independent one-hot block.
    let mut seen: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); table.groups.len()];
    for symbol in symbols {
        let values = table
            .values(symbol)
            .ok_or_else(|| FeatureError::UnknownSymbol(symbol.to_string()))?;
        for (group, value) in seen.iter_mut().zip(values) {
            group.insert(value.as_str());
        }
    }

    let blocks: Vec<Vec<&str>> = seen.into_iter().map(|g| g.into_iter().collect()).collect();
    let dim: usize = blocks.iter().map(Vec::len).sum();

    let mut vectors = BTreeMap::new();
    for symbol in symbols {
        let values = table
            .values(symbol)
            .ok_or_else(|| FeatureError::UnknownSymbol(symbol.to_string()))?;
        let mut v = vec![0.0; dim];
        let mut offset = 0;
        for (block, value) in blocks.iter().zip(values) {
            if let Some(pos) = block.iter().position(|b| *b == value.as_str()) {
                v[offset + pos] = 1.0;
            }
            offset += block.len();
        }
        vectors.insert(symbol.to_string(), v);
    }
    FeatureMap::new(vectors)
}

impl FeatureExtractor for DistinctiveFeatureExtractor {
    fn extract_symbols(&self, symbols: &BTreeSet<&str>) -> FeatureResult<FeatureSet> {
        let mut vowels = Vec::new();
        let mut consonants = Vec::new();
        for symbol in symbols {
            match self.table.classify(symbol) {
                Some(SegmentClass::Vowel) => vowels.push(*symbol),
                Some(SegmentClass::Consonant) => consonants.push(*symbol),
                None => return Err(FeatureError::UnknownSymbol(symbol.to_string())),
            }
        }

        let vowel_map = encode_class(&self.table.vowels, &vowels)?;
        let consonant_map = encode_class(&self.table.consonants, &consonants)?;
        tracing::debug!(
            vowel_dim = vowel_map.dim(),
            consonant_dim = consonant_map.dim(),
            "distinctive feature extraction"
        );
        FeatureSet::new(vowel_map, consonant_map)
    }
}
