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

//! Declarative transformer configuration
//!
//! A [`TransformerConfig`] names a transformer and its options and can be read
//! from TOML or JSON:
//!
//! ```toml
//! transformer = "cv"
//! field = "phonology"
//! layout = "CCCVV"
//!
//! [extractor]
//! kind = "one_hot_phonemes"
//! ```

use crate::cv::{CvLayout, CvTransformer};
use crate::grid::PadSide;
use crate::linear::LinearTransformer;
use crate::ngram::{
    ConstrainedOpenNgramTransformer, OpenNgramTransformer, WeightedOpenBigramTransformer,
};
use crate::onc::OncTransformer;
use crate::transformer::Transformer;
use crate::wickel::{WickelFeatureTransformer, WickelTransformer};
use serde::{Deserialize, Serialize};
use wordgrid_core::{ExtractorConfig, FeatureResult};

fn default_true() -> bool {
    true
}

/// Transformer choice and options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "transformer", rename_all = "snake_case")]
pub enum TransformerConfig {
    Linear {
        #[serde(default)]
        extractor: ExtractorConfig,
        #[serde(default)]
        field: Option<String>,
        #[serde(default)]
        pad: PadSide,
    },
    Cv {
        #[serde(default)]
        extractor: ExtractorConfig,
        #[serde(default)]
        field: Option<String>,
        #[serde(default)]
        pad: PadSide,
        /// Template such as `"CCCVV"`; run layout when absent
        #[serde(default)]
        layout: Option<String>,
    },
    Onc {
        #[serde(default)]
        extractor: ExtractorConfig,
        #[serde(default)]
        field: Option<String>,
    },
    OpenNgram {
        n: usize,
        #[serde(default)]
        counts: bool,
        #[serde(default)]
        field: Option<String>,
    },
    ConstrainedOpenNgram {
        n: usize,
        window: usize,
        #[serde(default)]
        field: Option<String>,
    },
    WeightedOpenBigram {
        weights: Vec<f32>,
        #[serde(default)]
        field: Option<String>,
    },
    Wickel {
        n: usize,
        #[serde(default = "default_true")]
        use_padding: bool,
        #[serde(default)]
        field: Option<String>,
    },
    WickelFeature {
        n: usize,
        num_units: usize,
        proportion: f64,
        #[serde(default)]
        seed: Option<u64>,
        #[serde(default = "default_true")]
        use_padding: bool,
        #[serde(default)]
        field: Option<String>,
    },
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self::open_bigrams()
    }
}

impl TransformerConfig {
    /// Open bigrams over raw sequences.
    pub fn open_bigrams() -> Self {
        TransformerConfig::OpenNgram {
            n: 2,
            counts: false,
            field: None,
        }
    }

    /// Padded trigram wickelphones.
    pub fn wickelphones() -> Self {
        TransformerConfig::Wickel {
            n: 3,
            use_padding: true,
            field: None,
        }
    }

    /// CV grid over IPA phonemes with distinctive features.
    pub fn phonological_cv() -> Self {
        TransformerConfig::Cv {
            extractor: ExtractorConfig::IpaFeatures,
            field: None,
            pad: PadSide::Right,
            layout: None,
        }
    }

    pub fn from_toml_str(s: &str) -> FeatureResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> FeatureResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Validate options and construct an unfitted transformer.
    pub fn build(&self) -> FeatureResult<Box<dyn Transformer>> {
        let transformer: Box<dyn Transformer> = match self {
            TransformerConfig::Linear {
                extractor,
                field,
                pad,
            } => {
                let mut t = LinearTransformer::new(extractor.build()?).with_pad(*pad);
                if let Some(field) = field {
                    t = t.with_field(field.as_str());
                }
                Box::new(t)
            }
            TransformerConfig::Cv {
                extractor,
                field,
                pad,
                layout,
            } => {
                let layout = match layout {
                    Some(pattern) => CvLayout::template(pattern)?,
                    None => CvLayout::Runs,
                };
                let mut t = CvTransformer::new(extractor.build()?)
                    .with_pad(*pad)
                    .with_layout(layout);
                if let Some(field) = field {
                    t = t.with_field(field.as_str());
                }
                Box::new(t)
            }
            TransformerConfig::Onc { extractor, field } => {
                let mut t = OncTransformer::new(extractor.build()?);
                if let Some(field) = field {
                    t = t.with_field(field.as_str());
                }
                Box::new(t)
            }
            TransformerConfig::OpenNgram { n, counts, field } => {
                let mut t = OpenNgramTransformer::new(*n)?;
                if *counts {
                    t = t.with_counts();
                }
                if let Some(field) = field {
                    t = t.with_field(field.as_str());
                }
                Box::new(t)
            }
            TransformerConfig::ConstrainedOpenNgram { n, window, field } => {
                let mut t = ConstrainedOpenNgramTransformer::new(*n, *window)?;
                if let Some(field) = field {
                    t = t.with_field(field.as_str());
                }
                Box::new(t)
            }
            TransformerConfig::WeightedOpenBigram { weights, field } => {
                let mut t = WeightedOpenBigramTransformer::new(weights.clone())?;
                if let Some(field) = field {
                    t = t.with_field(field.as_str());
                }
                Box::new(t)
            }
            TransformerConfig::Wickel {
                n,
                use_padding,
                field,
            } => {
                let mut t = WickelTransformer::new(*n)?.with_padding(*use_padding);
                if let Some(field) = field {
                    t = t.with_field(field.as_str());
                }
                Box::new(t)
            }
            TransformerConfig::WickelFeature {
                n,
                num_units,
                proportion,
                seed,
                use_padding,
                field,
            } => {
                let mut t = WickelFeatureTransformer::new(*n, *num_units, *proportion)?
                    .with_padding(*use_padding);
                if let Some(seed) = seed {
                    t = t.with_seed(*seed);
                }
                if let Some(field) = field {
                    t = t.with_field(field.as_str());
                }
                Box::new(t)
            }
        };
        tracing::debug!(config = ?self, "Transformer built");
        Ok(transformer)
    }
}
