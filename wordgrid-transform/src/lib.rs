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

//! Wordgrid Transformers
//!
//! Fixed-width numeric encodings of words for psycholinguistic models.
//!
//! ## Grid Alignment
//!
//! - **Linear**: symbol `i` in slot `i`
//! - **CV**: consonant and vowel runs on a shared grid, vowels aligned
//! - **ONC**: onset, nucleus and coda per syllable
//!
//! Grid transformers take a [`FeatureSource`]: an extracted
//! [`FeatureSet`](wordgrid_core::FeatureSet) or an
//! [`Extractor`](wordgrid_core::Extractor) run during `fit`.
//!
//! ## Sequence Encodings
//!
//! - **Open n-grams**: ordered, non-contiguous subsequences, optionally windowed
//!   or weighted by skip distance
//! - **Wickelphones**: boundary-padded contiguous n-grams
//! - **Wickelfeatures**: wickelphones compressed into random conjunctive units
//!
//! Every transformer follows the same lifecycle:
//!
//! ```text
//! new/config ──► fit(&mut, items) ──► transform(&, items) ──► Array2<f32>
//! ```
//!
//! Fitted transformers are `Send + Sync`; `transform` never mutates.

pub mod config;
pub mod cv;
pub mod grid;
pub mod linear;
pub mod ngram;
pub mod onc;
pub mod transformer;
pub mod wickel;

pub use config::TransformerConfig;
pub use cv::{CvLayout, CvTemplate, CvTransformer};
pub use grid::{Grid, PadSide};
pub use linear::LinearTransformer;
pub use ngram::{ConstrainedOpenNgramTransformer, OpenNgramTransformer, WeightedOpenBigramTransformer};
pub use onc::OncTransformer;
pub use transformer::{FeatureSource, FeatureSpace, Slot, SlotRole, Transformer};
pub use wickel::{wickelphones, WickelFeatureTransformer, WickelTransformer, BOUNDARY};
