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

//! Wordgrid Core
//!
//! Word model and per-symbol feature resolution for the wordgrid transformers.
//!
//! - **Sequences**: flat or syllabified words of string symbols
//! - **Items**: raw sequences or corpus records with named fields
//! - **Feature maps**: fitted symbol -> vector maps, split into vowels and consonants
//! - **Extractors**: one-hot, distinctive-feature and predefined encodings
//!
//! ```text
//! items ──► field lookup ──► Sequence ──► vocabulary ──► Extractor ──► FeatureSet
//! ```

pub mod error;
pub mod extract;
pub mod feature_sets;
pub mod features;
pub mod item;
pub mod sequence;
pub mod tables;

pub use error::{ErrorKind, FeatureError, FeatureResult};
pub use extract::{
    vocabulary, DistinctiveFeatureExtractor, Extractor, ExtractorConfig, FeatureExtractor,
    OneHotExtractor, PredefinedFeatureExtractor,
};
pub use features::{FeatureMap, FeatureSet, SegmentClass};
pub use item::{collect_sequences, items_from_words, FieldValue, Item, Record};
pub use sequence::Sequence;
pub use tables::{EncodedTable, FeatureTable, PhonemeTable, PredefinedTable};
