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

//! Open N-gram Encoders
//!
//! An open n-gram is an ordered, not necessarily contiguous, subsequence of
//! `n` symbols. For `salt` and `n = 2`:
//!
//! ```text
//! s a l t  ->  sa sl st al at lt
//! ```
//!
//! Three encoders share one implementation:
//!
//! | Encoder                            | Selection                        | Value            |
//! |------------------------------------|----------------------------------|------------------|
//! | [`OpenNgramTransformer`]           | every subsequence                | 1, or count      |
//! | [`ConstrainedOpenNgramTransformer`]| last - first position <= window  | 1                |
//! | [`WeightedOpenBigramTransformer`]  | bigrams skipping < weights.len() | summed weights   |
//!
//! Columns are the distinct n-grams seen at fit, sorted by symbol sequence.
//! N-grams never seen at fit are dropped at transform time.

use crate::transformer::{fit_sequences, FeatureSpace, Transformer};
use std::collections::BTreeMap;
use wordgrid_core::{FeatureError, FeatureResult, Item, Sequence};

/// How an occurrence adds to its column.
#[derive(Debug, Clone, PartialEq)]
enum Scoring {
    Indicator,
    Count,
    /// Indexed by the number of skipped symbols.
    SkipWeights(Vec<f32>),
}

/// Visit every increasing index tuple of length `n` over `0..len`, keeping
/// `last - first <= window` when a window is set.
fn walk<F>(len: usize, n: usize, window: Option<usize>, chosen: &mut Vec<usize>, visit: &mut F)
where
    F: FnMut(&[usize]),
{
    if chosen.len() == n {
        visit(chosen);
        return;
    }
    let next = chosen.last().map_or(0, |&i| i + 1);
    let limit = match (window, chosen.first()) {
        (Some(w), Some(&first)) => (first + w + 1).min(len),
        _ => len,
    };
    let remaining = n - chosen.len();
    for i in next..limit {
        if len - i < remaining {
            break;
        }
        chosen.push(i);
        walk(len, n, window, chosen, visit);
        chosen.pop();
    }
}

#[derive(Debug, Clone)]
struct NgramEncoder {
    n: usize,
    window: Option<usize>,
    scoring: Scoring,
    field: Option<String>,
    vocab: Option<BTreeMap<Vec<String>, usize>>,
}

impl NgramEncoder {
    fn new(n: usize, window: Option<usize>, scoring: Scoring) -> FeatureResult<Self> {
        if n == 0 {
            return Err(FeatureError::Config("n-gram order must be at least 1".into()));
        }
        if let Some(w) = window {
            if w + 1 < n {
                return Err(FeatureError::Config(format!(
                    "window {} cannot hold {}-grams, needs at least {}",
                    w,
                    n,
                    n - 1
                )));
            }
        }
        Ok(Self {
            n,
            window,
            scoring,
            field: None,
            vocab: None,
        })
    }

    /// Per-ngram scores of one word.
    fn scores(&self, word: &Sequence) -> BTreeMap<Vec<String>, f32> {
        let symbols = word.symbols();
        let mut scores = BTreeMap::new();
        let mut visit = |idx: &[usize]| {
            let gram: Vec<String> = idx.iter().map(|&i| symbols[i].to_string()).collect();
            let value = match &self.scoring {
                Scoring::Indicator | Scoring::Count => 1.0,
                Scoring::SkipWeights(weights) => weights[idx[1] - idx[0] - 1],
            };
            let entry = scores.entry(gram).or_insert(0.0);
            match self.scoring {
                Scoring::Indicator => *entry = 1.0,
                _ => *entry += value,
            }
        };
        walk(symbols.len(), self.n, self.window, &mut Vec::with_capacity(self.n), &mut visit);
        scores
    }

    fn fit(&mut self, items: &[Item]) -> FeatureResult<()> {
        let words = fit_sequences(items, self.field.as_deref())?;
        let mut grams: BTreeMap<Vec<String>, usize> = BTreeMap::new();
        for word in &words {
            for gram in self.scores(word).into_keys() {
                grams.entry(gram).or_insert(0);
            }
        }
        for (column, index) in grams.values_mut().enumerate() {
            *index = column;
        }
        if grams.is_empty() {
            tracing::warn!(n = self.n, "No n-grams found, every word is shorter than n");
        }
        tracing::info!(
            words = words.len(),
            n = self.n,
            ngrams = grams.len(),
            "N-gram vocabulary fitted"
        );
        self.vocab = Some(grams);
        Ok(())
    }

    fn vectorize(&self, word: &Sequence) -> FeatureResult<Vec<f32>> {
        let vocab = self.vocab.as_ref().ok_or(FeatureError::NotFitted)?;
        let mut row = vec![0.0; vocab.len()];
        for (gram, score) in self.scores(word) {
            if let Some(&column) = vocab.get(&gram) {
                row[column] = score;
            }
        }
        Ok(row)
    }

    fn vec_len(&self) -> FeatureResult<usize> {
        self.vocab
            .as_ref()
            .map(BTreeMap::len)
            .ok_or(FeatureError::NotFitted)
    }

    fn features(&self) -> FeatureResult<FeatureSpace> {
        let vocab = self.vocab.as_ref().ok_or(FeatureError::NotFitted)?;
        Ok(FeatureSpace::Ngrams(vocab.keys().map(|g| g.concat()).collect()))
    }

    fn ngrams(&self, word: &Sequence) -> Vec<String> {
        self.scores(word).into_keys().map(|g| g.concat()).collect()
    }
}

macro_rules! ngram_transformer {
    ($name:ident) => {
        impl $name {
            pub fn with_field(mut self, field: impl Into<String>) -> Self {
                self.inner.field = Some(field.into());
                self
            }

            /// Distinct n-grams of `word` that this encoder selects, sorted.
            pub fn ngrams(&self, word: &Sequence) -> Vec<String> {
                self.inner.ngrams(word)
            }
        }

        impl Transformer for $name {
            fn fit(&mut self, items: &[Item]) -> FeatureResult<()> {
                self.inner.fit(items)
            }

            fn vectorize(&self, word: &Sequence) -> FeatureResult<Vec<f32>> {
                self.inner.vectorize(word)
            }

            fn vec_len(&self) -> FeatureResult<usize> {
                self.inner.vec_len()
            }

            fn features(&self) -> FeatureResult<FeatureSpace> {
                self.inner.features()
            }

            fn field(&self) -> Option<&str> {
                self.inner.field.as_deref()
            }
        }
    };
}

/// Every ordered subsequence of length `n`.
#[derive(Debug, Clone)]
pub struct OpenNgramTransformer {
    inner: NgramEncoder,
}

impl OpenNgramTransformer {
    pub fn new(n: usize) -> FeatureResult<Self> {
        Ok(Self {
            inner: NgramEncoder::new(n, None, Scoring::Indicator)?,
        })
    }

    /// Count occurrences instead of marking presence.
    pub fn with_counts(mut self) -> Self {
        self.inner.scoring = Scoring::Count;
        self
    }
}

/// Open n-grams whose first and last symbols are at most `window` apart.
#[derive(Debug, Clone)]
pub struct ConstrainedOpenNgramTransformer {
    inner: NgramEncoder,
}

impl ConstrainedOpenNgramTransformer {
    pub fn new(n: usize, window: usize) -> FeatureResult<Self> {
        Ok(Self {
            inner: NgramEncoder::new(n, Some(window), Scoring::Indicator)?,
        })
    }
}

/// Bigrams weighted by the number of symbols they skip.
///
/// `weights[d]` is added for every occurrence skipping `d` symbols; bigrams
/// skipping `weights.len()` or more are ignored.
#[derive(Debug, Clone)]
pub struct WeightedOpenBigramTransformer {
    inner: NgramEncoder,
}

impl WeightedOpenBigramTransformer {
    pub fn new(weights: Vec<f32>) -> FeatureResult<Self> {
        if weights.is_empty() {
            return Err(FeatureError::Config("bigram weights must not be empty".into()));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite()) {
            return Err(FeatureError::Config(format!("bigram weight {} is not finite", w)));
        }
        let window = weights.len();
        Ok(Self {
            inner: NgramEncoder::new(2, Some(window), Scoring::SkipWeights(weights))?,
        })
    }

    pub fn weights(&self) -> &[f32] {
        match &self.inner.scoring {
            Scoring::SkipWeights(weights) => weights,
            _ => &[],
        }
    }
}

ngram_transformer!(OpenNgramTransformer);
ngram_transformer!(ConstrainedOpenNgramTransformer);
ngram_transformer!(WeightedOpenBigramTransformer);
