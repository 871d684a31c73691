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

//! Feature tables
//!
//! Tables describe symbols by feature group (place, manner, voicing, ...). A
//! [`FeatureTable`] lists one value per group for each symbol; an
//! [`EncodedTable`] adds a caller-provided vector for every group value.
//!
//! # JSON layout
//!
//! ```text
//! {
//!   "vowels":     { "groups": ["height", "backness"], "symbols": { "i": ["close", "front"] } },
//!   "consonants": { "groups": ["voicing"],            "symbols": { "p": ["voiceless"] } }
//! }
//! ```

use crate::error::{FeatureError, FeatureResult};
use crate::features::SegmentClass;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered feature groups and each symbol's value per group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    /// Feature group names, in encoding order.
    pub groups: Vec<String>,
    /// Symbol -> one value per group.
    pub symbols: BTreeMap<String, Vec<String>>,
}

impl FeatureTable {
    /// Create an empty table over the given groups.
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
            symbols: BTreeMap::new(),
        }
    }

    /// Add a symbol row.
    pub fn with_symbol(mut self, symbol: &str, values: &[&str]) -> Self {
        self.symbols.insert(
            symbol.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn values(&self, symbol: &str) -> Option<&[String]> {
        self.symbols.get(symbol).map(Vec::as_slice)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains_key(symbol)
    }

    /// Every row must carry exactly one value per group.
    pub fn validate(&self) -> FeatureResult<()> {
        for (symbol, values) in &self.symbols {
            if values.len() != self.groups.len() {
                return Err(FeatureError::config(format!(
                    "symbol '{}' has {} feature values but the table has {} groups",
                    symbol,
                    values.len(),
                    self.groups.len()
                )));
            }
        }
        Ok(())
    }
}

/// Vowel and consonant tables for phonological input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhonemeTable {
    pub vowels: FeatureTable,
    pub consonants: FeatureTable,
}

impl PhonemeTable {
    /// Parse and validate a table from JSON.
    pub fn from_json(json: &str) -> FeatureResult<Self> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> FeatureResult<()> {
        self.vowels.validate()?;
        self.consonants.validate()?;
        if let Some(shared) = self
            .vowels
            .symbols
            .keys()
            .find(|s| self.consonants.contains(s))
        {
            return Err(FeatureError::config(format!(
                "symbol '{}' appears in both the vowel and consonant table",
                shared
            )));
        }
        Ok(())
    }

    pub fn table(&self, class: SegmentClass) -> &FeatureTable {
        match class {
            SegmentClass::Vowel => &self.vowels,
            SegmentClass::Consonant => &self.consonants,
        }
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
}

/// A feature table with caller-provided vectors per group value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodedTable {
    pub table: FeatureTable,
    /// Group -> value -> vector.
    pub encodings: BTreeMap<String, BTreeMap<String, Vec<f32>>>,
}

impl EncodedTable {
    pub fn new(table: FeatureTable) -> Self {
        Self {
            table,
            encodings: BTreeMap::new(),
        }
    }

    /// Register the vector used for `value` within `group`.
    pub fn with_encoding(mut self, group: &str, value: &str, vector: Vec<f32>) -> Self {
        self.encodings
            .entry(group.to_string())
            .or_default()
            .insert(value.to_string(), vector);
        self
    }

    /// Width of each group's vectors, in group order.
    pub fn group_widths(&self) -> FeatureResult<Vec<usize>> {
        self.table
            .groups
            .iter()
            .map(|group| {
                let values = self.encodings.get(group).ok_or_else(|| {
                    FeatureError::config(format!("group '{}' has no encodings", group))
                })?;
                let width = values.values().next().map_or(0, Vec::len);
                if let Some((value, v)) = values.iter().find(|(_, v)| v.len() != width) {
                    return Err(FeatureError::config(format!(
                        "value '{}' in group '{}' has length {}, expected {}",
                        value,
                        group,
                        v.len(),
                        width
                    )));
                }
                Ok(width)
            })
            .collect()
    }

    /// Check row shape, per-group widths, and that every used value is encoded.
    pub fn validate(&self) -> FeatureResult<()> {
        self.table.validate()?;
        self.group_widths()?;
        for (symbol, values) in &self.table.symbols {
            for (group, value) in self.table.groups.iter().zip(values) {
                let encoded = self
                    .encodings
                    .get(group)
                    .map_or(false, |enc| enc.contains_key(value));
                if !encoded {
                    return Err(FeatureError::config(format!(
                        "symbol '{}' uses value '{}' of group '{}' which has no vector",
                        symbol, value, group
                    )));
                }
            }
        }
        Ok(())
    }

    /// Concatenate the group vectors for `symbol`.
    pub fn encode(&self, symbol: &str) -> Option<Vec<f32>> {
        let values = self.table.values(symbol)?;
        let mut out = Vec::new();
        for (group, value) in self.table.groups.iter().zip(values) {
            out.extend_from_slice(self.encodings.get(group)?.get(value)?);
        }
        Some(out)
    }
}

/// Encoded tables for both classes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredefinedTable {
    #[serde(default)]
    pub vowels: EncodedTable,
    pub consonants: EncodedTable,
}

impl PredefinedTable {
    /// Parse and validate a predefined table from JSON.
    pub fn from_json(json: &str) -> FeatureResult<Self> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> FeatureResult<()> {
        self.vowels.validate()?;
        self.consonants.validate()?;
        if let Some(shared) = self
            .vowels
            .table
            .symbols
            .keys()
            .find(|s| self.consonants.table.contains(s))
        {
            return Err(FeatureError::config(format!(
                "symbol '{}' appears in both the vowel and consonant table",
                shared
            )));
        }
        Ok(())
    }

    pub fn table(&self, class: SegmentClass) -> &EncodedTable {
        match class {
            SegmentClass::Vowel => &self.vowels,
            SegmentClass::Consonant => &self.consonants,
        }
    }

    pub fn classify(&self, symbol: &str) -> Option<SegmentClass> {
        if self.vowels.table.contains(symbol) {
            Some(SegmentClass::Vowel)
        } else if self.consonants.table.contains(symbol) {
            Some(SegmentClass::Consonant)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voicing() -> EncodedTable {
        EncodedTable::new(
            FeatureTable::new(["voicing"])
                .with_symbol("p", &["voiceless"])
                .with_symbol("b", &["voiced"]),
        )
        .with_encoding("voicing", "voiceless", vec![0.0])
        .with_encoding("voicing", "voiced", vec![1.0])
    }

    #[test]
    fn test_row_length_mismatch() {
        let table = FeatureTable::new(["place", "manner"]).with_symbol("p", &["bilabial"]);
        assert!(matches!(table.validate(), Err(FeatureError::Config(_))));
    }

    #[test]
    fn test_encoded_table_widths() {
        let table = voicing();
        assert!(table.validate().is_ok());
        assert_eq!(table.group_widths().unwrap(), vec![1]);
        assert_eq!(table.encode("b"), Some(vec![1.0]));
        assert_eq!(table.encode("z"), None);
    }

    #[test]
    fn test_mismatched_group_vector_lengths() {
        let table = voicing().with_encoding("voicing", "murmured", vec![0.5, 0.5]);
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("group 'voicing'"));
    }

    #[test]
    fn test_missing_value_vector() {
        let table = EncodedTable::new(FeatureTable::new(["voicing"]).with_symbol("p", &["voiceless"]))
            .with_encoding("voicing", "voiced", vec![1.0]);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_phoneme_table_from_json() {
        let json = r#"{
            "vowels": {"groups": ["height"], "symbols": {"i": ["close"], "a": ["open"]}},
            "consonants": {"groups": ["voicing"], "symbols": {"p": ["voiceless"]}}
        }"#;
        let table = PhonemeTable::from_json(json).unwrap();
        assert_eq!(table.classify("a"), Some(SegmentClass::Vowel));
        assert_eq!(table.classify("p"), Some(SegmentClass::Consonant));
        assert_eq!(table.classify("q"), None);
    }

    #[test]
    fn test_phoneme_table_overlap_rejected() {
        let json = r#"{
            "vowels": {"groups": ["height"], "symbols": {"j": ["close"]}},
            "consonants": {"groups": ["voicing"], "symbols": {"j": ["voiced"]}}
        }"#;
        assert!(PhonemeTable::from_json(json).is_err());
    }
}
