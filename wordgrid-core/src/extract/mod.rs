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

//! Feature Extraction
//!
//! Extractors turn the closed vocabulary of a word collection into a
//! [`FeatureSet`]: one vowel map and one consonant map.
//!
//! - [`OneHotExtractor`]: one unit vector per symbol, per class
//! - [`DistinctiveFeatureExtractor`]: per-group one-hot blocks from a [`PhonemeTable`]
//! - [`PredefinedFeatureExtractor`]: caller vectors from a [`PredefinedTable`]
//!
//! [`Extractor`] is the tagged union of the three, and [`ExtractorConfig`] the
//! serde surface that builds one.

mod distinctive;
mod onehot;
mod predefined;

pub use distinctive::DistinctiveFeatureExtractor;
pub use onehot::OneHotExtractor;
pub use predefined::PredefinedFeatureExtractor;

use crate::error::FeatureResult;
use crate::feature_sets;
use crate::features::FeatureSet;
use crate::sequence::Sequence;
use crate::tables::{PhonemeTable, PredefinedTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Resolve a vocabulary into feature maps.
pub trait FeatureExtractor {
    /// Build feature maps covering exactly `symbols`.
    fn extract_symbols(&self, symbols: &BTreeSet<&str>) -> FeatureResult<FeatureSet>;

    /// Flatten `words`, collect their distinct symbols and extract.
    fn extract(&self, words: &[&Sequence]) -> FeatureResult<FeatureSet> {
        self.extract_symbols(&vocabulary(words))
    }
}

/// Distinct symbols across all words, sorted.
pub fn vocabulary<'a>(words: &[&'a Sequence]) -> BTreeSet<&'a str> {
    words.iter().flat_map(|w| w.symbols()).collect()
}

/// The extractor variants behind one type.
#[derive(Debug, Clone, PartialEq)]
pub enum Extractor {
    OneHot(OneHotExtractor),
    Distinctive(DistinctiveFeatureExtractor),
    Predefined(PredefinedFeatureExtractor),
}

impl FeatureExtractor for Extractor {
    fn extract_symbols(&self, symbols: &BTreeSet<&str>) -> FeatureResult<FeatureSet> {
        match self {
            Extractor::OneHot(e) => e.extract_symbols(symbols),
            Extractor::Distinctive(e) => e.extract_symbols(symbols),
            Extractor::Predefined(e) => e.extract_symbols(symbols),
        }
    }
}

impl From<OneHotExtractor> for Extractor {
    fn from(e: OneHotExtractor) -> Self {
        Extractor::OneHot(e)
    }
}

impl From<DistinctiveFeatureExtractor> for Extractor {
    fn from(e: DistinctiveFeatureExtractor) -> Self {
        Extractor::Distinctive(e)
    }
}

impl From<PredefinedFeatureExtractor> for Extractor {
    fn from(e: PredefinedFeatureExtractor) -> Self {
        Extractor::Predefined(e)
    }
}

/// Serializable extractor choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractorConfig {
    /// One-hot, no vowel/consonant split
    OneHotCharacters,
    /// One-hot with a vowel inventory (IPA vowels when omitted)
    OneHotPhonemes {
        #[serde(default)]
        vowels: Option<Vec<String>>,
    },
    /// Distinctive features from the built-in IPA table
    IpaFeatures,
    /// Built-in 14-segment letter encoding
    FourteenSegment,
    /// Distinctive features from a caller table
    Distinctive { table: PhonemeTable },
    /// Caller vectors per feature value
    Predefined { table: PredefinedTable },
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig::OneHotCharacters
    }
}

impl ExtractorConfig {
    /// Instantiate the configured extractor, validating its tables.
    pub fn build(&self) -> FeatureResult<Extractor> {
        let extractor = match self {
            ExtractorConfig::OneHotCharacters => OneHotExtractor::characters().into(),
            ExtractorConfig::OneHotPhonemes { vowels: None } => OneHotExtractor::phonemes().into(),
            ExtractorConfig::OneHotPhonemes {
                vowels: Some(vowels),
            } => OneHotExtractor::with_vowels(vowels.iter().cloned()).into(),
            ExtractorConfig::IpaFeatures => {
                DistinctiveFeatureExtractor::new(feature_sets::ipa_features())?.into()
            }
            ExtractorConfig::FourteenSegment => {
                PredefinedFeatureExtractor::new(feature_sets::fourteen_segment())?.into()
            }
            ExtractorConfig::Distinctive { table } => {
                DistinctiveFeatureExtractor::new(table.clone())?.into()
            }
            ExtractorConfig::Predefined { table } => {
                PredefinedFeatureExtractor::new(table.clone())?.into()
            }
        };
        Ok(extractor)
    }
}
