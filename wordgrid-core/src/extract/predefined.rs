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

//! Caller-provided feature vectors.

use super::FeatureExtractor;
use crate::error::{FeatureError, FeatureResult};
use crate::features::{FeatureMap, FeatureSet, SegmentClass};
use crate::tables::PredefinedTable;
use std::collections::{BTreeMap, BTreeSet};

/// Looks symbols up in a validated [`PredefinedTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct PredefinedFeatureExtractor {
    table: PredefinedTable,
}

impl PredefinedFeatureExtractor {
    /// Validate the table; mismatched vector lengths within a group are rejected here.
    pub fn new(table: PredefinedTable) -> FeatureResult<Self> {
        table.validate()?;
        Ok(Self { table })
    }

    pub fn table(&self) -> &PredefinedTable {
        &self.table
    }
}

impl FeatureExtractor for PredefinedFeatureExtractor {
    fn extract_symbols(&self, symbols: &BTreeSet<&str>) -> FeatureResult<FeatureSet> {
        let mut vowels = BTreeMap::new();
        let mut consonants = BTreeMap::new();

        for symbol in symbols {
            let class = self
                .table
                .classify(symbol)
                .ok_or_else(|| FeatureError::UnknownSymbol(symbol.to_string()))?;
            let vector = self.table.table(class).encode(symbol).ok_or_else(|| {
                FeatureError::config(format!("symbol '{}' has an incomplete encoding", symbol))
            })?;
            match class {
                SegmentClass::Vowel => vowels.insert(symbol.to_string(), vector),
                SegmentClass::Consonant => consonants.insert(symbol.to_string(), vector),
            };
        }

        FeatureSet::new(FeatureMap::new(vowels)?, FeatureMap::new(consonants)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Sequence;
    use crate::tables::{EncodedTable, FeatureTable};

    fn table() -> PredefinedTable {
        PredefinedTable {
            vowels: EncodedTable::new(FeatureTable::new(["height"]).with_symbol("a", &["open"]))
                .with_encoding("height", "open", vec![0.25, 0.75]),
            consonants: EncodedTable::new(
                FeatureTable::new(["voicing", "place"])
                    .with_symbol("p", &["voiceless", "lab"])
                    .with_symbol("d", &["voiced", "cor"]),
            )
            .with_encoding("voicing", "voiceless", vec![-1.0])
            .with_encoding("voicing", "voiced", vec![1.0])
            .with_encoding("place", "lab", vec![0.5, 0.0, 0.0])
            .with_encoding("place", "cor", vec![0.0, 0.5, 0.0]),
        }
    }

    #[test]
    fn test_vectors_concatenate_groups() {
        let word = Sequence::flat(["p", "a", "d"]);
        let set = PredefinedFeatureExtractor::new(table())
            .unwrap()
            .extract(&[&word])
            .unwrap();
        assert_eq!(set.vector("p").unwrap(), &[-1.0, 0.5, 0.0, 0.0]);
        assert_eq!(set.vector("d").unwrap(), &[1.0, 0.0, 0.5, 0.0]);
        assert_eq!(set.vector("a").unwrap(), &[0.25, 0.75]);
        assert_eq!(set.consonants().dim(), 4);
        assert_eq!(set.vowels().dim(), 2);
    }

    #[test]
    fn test_group_width_mismatch_is_config_error() {
        let mut bad = table();
        bad.consonants = bad.consonants.with_encoding("place", "dor", vec![1.0]);
        let err = PredefinedFeatureExtractor::new(bad).unwrap_err();
        assert!(matches!(err, FeatureError::Config(_)));
    }

    #[test]
    fn test_unknown_symbol() {
        let word = Sequence::flat(["q"]);
        let err = PredefinedFeatureExtractor::new(table())
            .unwrap()
            .extract(&[&word])
            .unwrap_err();
        assert_eq!(err, FeatureError::UnknownSymbol("q".into()));
    }
}
