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

//! Wickelphones and Wickelfeatures
//!
//! A wickelphone is a contiguous n-gram of a word padded with `#` boundary
//! markers, so `dog` at `n = 3` becomes `##d #do dog og# g##`.
//!
//! [`WickelTransformer`] one-hot encodes the wickelphones seen at fit.
//! [`WickelFeatureTransformer`] compresses them into `num_units` random
//! conjunctive units: a unit accepts, for every n-gram position, a random subset
//! of the alphabet, and fires when each symbol of some n-gram is accepted at its
//! position.
//!
//! ## Determinism
//!
//! Unit subsets are drawn once at fit from a `StdRng`. With an explicit seed
//! two fits on the same data agree column for column; without one a seed is
//! drawn and kept, see [`WickelFeatureTransformer::seed`].

use crate::transformer::{fit_sequences, FeatureSpace, Transformer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use wordgrid_core::{vocabulary, FeatureError, FeatureResult, Item, Sequence};

/// Word boundary marker.
pub const BOUNDARY: &str = "#";

/// Contiguous n-grams of `word`, padded with `n - 1` boundary markers per side
/// when `use_padding` is set.
///
/// Without padding a word shorter than `n` is rejected. With padding a word
/// containing [`BOUNDARY`] is rejected.
pub fn wickelphones(word: &Sequence, n: usize, use_padding: bool) -> FeatureResult<Vec<Vec<&str>>> {
    check_order(n)?;
    let symbols = word.symbols();
    if use_padding && symbols.contains(&BOUNDARY) {
        return Err(FeatureError::Config(format!(
            "symbol '{}' in '{}' is reserved for word boundaries",
            BOUNDARY,
            word.display()
        )));
    }
    if !use_padding && symbols.len() < n {
        return Err(FeatureError::WordTooShort {
            word: word.display(),
            n,
        });
    }
    let padded: Vec<&str> = if use_padding {
        let pad = std::iter::repeat(BOUNDARY).take(n - 1);
        pad.clone().chain(symbols).chain(pad).collect()
    } else {
        symbols
    };
    Ok(padded.windows(n).map(|w| w.to_vec()).collect())
}

fn check_order(n: usize) -> FeatureResult<()> {
    if n == 0 {
        return Err(FeatureError::Config("wickel order must be at least 1".into()));
    }
    Ok(())
}

fn check_symbols(word: &Sequence, known: &BTreeSet<String>) -> FeatureResult<()> {
    match word.symbols().into_iter().find(|s| !known.contains(*s)) {
        Some(symbol) => Err(FeatureError::UnknownSymbol(symbol.to_string())),
        None => Ok(()),
    }
}

#[derive(Debug, Clone)]
struct WickelState {
    symbols: BTreeSet<String>,
    vocab: BTreeMap<Vec<String>, usize>,
}

/// One-hot encoding over the wickelphones seen at fit.
#[derive(Debug, Clone)]
pub struct WickelTransformer {
    n: usize,
    use_padding: bool,
    field: Option<String>,
    state: Option<WickelState>,
}

impl WickelTransformer {
    pub fn new(n: usize) -> FeatureResult<Self> {
        check_order(n)?;
        Ok(Self {
            n,
            use_padding: true,
            field: None,
            state: None,
        })
    }

    pub fn with_padding(mut self, use_padding: bool) -> Self {
        self.use_padding = use_padding;
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl Transformer for WickelTransformer {
    fn fit(&mut self, items: &[Item]) -> FeatureResult<()> {
        let words = fit_sequences(items, self.field.as_deref())?;
        let refs: Vec<&Sequence> = words.iter().map(|w| w.as_ref()).collect();

        let mut vocab: BTreeMap<Vec<String>, usize> = BTreeMap::new();
        for word in &refs {
            for gram in wickelphones(word, self.n, self.use_padding)? {
                vocab
                    .entry(gram.into_iter().map(String::from).collect())
                    .or_insert(0);
            }
        }
        for (column, index) in vocab.values_mut().enumerate() {
            *index = column;
        }
        let symbols = vocabulary(&refs).into_iter().map(String::from).collect();

        tracing::info!(
            words = refs.len(),
            n = self.n,
            wickelphones = vocab.len(),
            "Wickel vocabulary fitted"
        );
        self.state = Some(WickelState { symbols, vocab });
        Ok(())
    }

    fn vectorize(&self, word: &Sequence) -> FeatureResult<Vec<f32>> {
        let state = self.state.as_ref().ok_or(FeatureError::NotFitted)?;
        check_symbols(word, &state.symbols)?;
        let mut row = vec![0.0; state.vocab.len()];
        for gram in wickelphones(word, self.n, self.use_padding)? {
            let key: Vec<String> = gram.into_iter().map(String::from).collect();
            if let Some(&column) = state.vocab.get(&key) {
                row[column] = 1.0;
            }
        }
        Ok(row)
    }

    fn vec_len(&self) -> FeatureResult<usize> {
        self.state
            .as_ref()
            .map(|s| s.vocab.len())
            .ok_or(FeatureError::NotFitted)
    }

    fn features(&self) -> FeatureResult<FeatureSpace> {
        let state = self.state.as_ref().ok_or(FeatureError::NotFitted)?;
        Ok(FeatureSpace::Ngrams(
            state.vocab.keys().map(|g| g.concat()).collect(),
        ))
    }

    fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

#[derive(Debug, Clone)]
struct UnitState {
    /// Fit symbols plus the boundary marker, sorted.
    alphabet: Vec<String>,
    index: HashMap<String, usize>,
    /// `accepts[(unit * n + position) * alphabet.len() + symbol]`
    accepts: Vec<bool>,
    seed: u64,
}

impl UnitState {
    fn activations(&self, gram: &[&str], n: usize, num_units: usize) -> FeatureResult<Vec<bool>> {
        let columns = gram
            .iter()
            .map(|s| {
                self.index
                    .get(*s)
                    .copied()
                    .ok_or_else(|| FeatureError::UnknownSymbol(s.to_string()))
            })
            .collect::<FeatureResult<Vec<_>>>()?;
        let a = self.alphabet.len();
        Ok((0..num_units)
            .map(|unit| {
                columns
                    .iter()
                    .enumerate()
                    .all(|(pos, &col)| self.accepts[(unit * n + pos) * a + col])
            })
            .collect())
    }
}

/// Random conjunctive coding of wickelphones into a fixed number of units.
#[derive(Debug, Clone)]
pub struct WickelFeatureTransformer {
    n: usize,
    num_units: usize,
    proportion: f64,
    seed: Option<u64>,
    use_padding: bool,
    field: Option<String>,
    state: Option<UnitState>,
}

impl WickelFeatureTransformer {
    /// `proportion` is the share of the alphabet each unit accepts per position.
    pub fn new(n: usize, num_units: usize, proportion: f64) -> FeatureResult<Self> {
        check_order(n)?;
        if num_units == 0 {
            return Err(FeatureError::Config("num_units must be at least 1".into()));
        }
        if !(proportion > 0.0 && proportion <= 1.0) {
            return Err(FeatureError::Config(format!(
                "proportion must be in (0, 1], got {}",
                proportion
            )));
        }
        Ok(Self {
            n,
            num_units,
            proportion,
            seed: None,
            use_padding: true,
            field: None,
            state: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_padding(mut self, use_padding: bool) -> Self {
        self.use_padding = use_padding;
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Seed used by the last fit, drawn at random if none was configured.
    pub fn seed(&self) -> Option<u64> {
        self.state.as_ref().map(|s| s.seed).or(self.seed)
    }

    /// Share of distinct wickelphones in `items` whose unit pattern is also
    /// produced by another distinct wickelphone.
    pub fn collision_rate(&self, items: &[Item]) -> FeatureResult<f64> {
        let state = self.state.as_ref().ok_or(FeatureError::NotFitted)?;
        let words = fit_sequences(items, self.field.as_deref())?;
        let mut grams: BTreeSet<Vec<&str>> = BTreeSet::new();
        for word in &words {
            grams.extend(wickelphones(word, self.n, self.use_padding)?);
        }
        if grams.is_empty() {
            return Ok(0.0);
        }

        let mut patterns: HashMap<Vec<bool>, usize> = HashMap::new();
        for gram in &grams {
            *patterns
                .entry(state.activations(gram, self.n, self.num_units)?)
                .or_insert(0) += 1;
        }
        let colliding: usize = patterns.values().filter(|&&c| c > 1).sum();
        Ok(colliding as f64 / grams.len() as f64)
    }

    fn per_position(&self, alphabet_size: usize) -> usize {
        ((self.proportion * alphabet_size as f64).round() as usize).clamp(1, alphabet_size)
    }
}

impl Transformer for WickelFeatureTransformer {
    fn fit(&mut self, items: &[Item]) -> FeatureResult<()> {
        let words = fit_sequences(items, self.field.as_deref())?;
        let refs: Vec<&Sequence> = words.iter().map(|w| w.as_ref()).collect();
        for word in &refs {
            wickelphones(word, self.n, self.use_padding)?;
        }

        let mut alphabet: BTreeSet<String> = vocabulary(&refs).into_iter().map(String::from).collect();
        alphabet.insert(BOUNDARY.to_string());
        let alphabet: Vec<String> = alphabet.into_iter().collect();
        let index = alphabet
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();

        let a = alphabet.len();
        let k = self.per_position(a);
        let seed = self.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut accepts = vec![false; self.num_units * self.n * a];
        for block in accepts.chunks_mut(a) {
            for col in rand::seq::index::sample(&mut rng, a, k).iter() {
                block[col] = true;
            }
        }

        self.state = Some(UnitState {
            alphabet,
            index,
            accepts,
            seed,
        });
        let collisions = self.collision_rate(items)?;
        tracing::info!(
            words = refs.len(),
            alphabet = a,
            units = self.num_units,
            per_position = k,
            seed,
            collision_rate = collisions,
            "Wickelfeature units fitted"
        );
        Ok(())
    }

    fn vectorize(&self, word: &Sequence) -> FeatureResult<Vec<f32>> {
        let state = self.state.as_ref().ok_or(FeatureError::NotFitted)?;
        let mut row = vec![0.0; self.num_units];
        for gram in wickelphones(word, self.n, self.use_padding)? {
            let active = state.activations(&gram, self.n, self.num_units)?;
            for (value, on) in row.iter_mut().zip(active) {
                if on {
                    *value = 1.0;
                }
            }
        }
        Ok(row)
    }

    fn vec_len(&self) -> FeatureResult<usize> {
        self.state
            .as_ref()
            .map(|_| self.num_units)
            .ok_or(FeatureError::NotFitted)
    }

    fn features(&self) -> FeatureResult<FeatureSpace> {
        let state = self.state.as_ref().ok_or(FeatureError::NotFitted)?;
        Ok(FeatureSpace::Units {
            num_units: self.num_units,
            n: self.n,
            alphabet: state.alphabet.clone(),
            seed: state.seed,
        })
    }

    fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordgrid_core::items_from_words;

    fn joined(grams: Vec<Vec<&str>>) -> Vec<String> {
        grams.into_iter().map(|g| g.concat()).collect()
    }

    #[test]
    fn test_padded_trigrams() {
        let seq = Sequence::from("dog");
        let grams = wickelphones(&seq, 3, true).unwrap();
        assert_eq!(joined(grams), vec!["##d", "#do", "dog", "og#", "g##"]);
    }

    #[test]
    fn test_unpadded_trigrams() {
        let seq = Sequence::from("dog");
        let grams = wickelphones(&seq, 3, false).unwrap();
        assert_eq!(joined(grams), vec!["dog"]);
        let err = wickelphones(&Sequence::from("do"), 3, false).unwrap_err();
        assert_eq!(
            err,
            FeatureError::WordTooShort {
                word: "do".into(),
                n: 3
            }
        );
    }

    #[test]
    fn test_wickel_indicator() {
        let mut t = WickelTransformer::new(3).unwrap();
        t.fit(&items_from_words(["dog", "god"])).unwrap();
        assert_eq!(t.vec_len().unwrap(), 10);

        let x = t.transform(&items_from_words(["dog", "odd"])).unwrap();
        assert_eq!(x.row(0).sum(), 5.0);
        // "odd" uses known symbols but only "d##" was seen at fit
        assert!(x.row(1).sum() < 5.0);
    }

    #[test]
    fn test_wickel_unknown_symbol() {
        let mut t = WickelTransformer::new(3).unwrap();
        t.fit(&items_from_words(["dog"])).unwrap();
        assert_eq!(
            t.transform(&items_from_words(["cat"])).unwrap_err(),
            FeatureError::UnknownSymbol("c".into())
        );
    }

    #[test]
    fn test_boundary_symbol_reserved_when_padding() {
        let words = items_from_words(["a#b", "dog"]);
        let mut t = WickelTransformer::new(3).unwrap();
        assert!(matches!(t.fit(&words).unwrap_err(), FeatureError::Config(_)));
        let mut t = WickelFeatureTransformer::new(3, 8, 0.5).unwrap().with_seed(1);
        assert!(matches!(t.fit(&words).unwrap_err(), FeatureError::Config(_)));

        let mut t = WickelTransformer::new(3).unwrap().with_padding(false);
        t.fit(&words).unwrap();
        assert_eq!(t.vec_len().unwrap(), 2);
    }

    #[test]
    fn test_wickel_short_word_without_padding() {
        let mut t = WickelTransformer::new(3).unwrap().with_padding(false);
        assert!(matches!(
            t.fit(&items_from_words(["dog", "go"])).unwrap_err(),
            FeatureError::WordTooShort { .. }
        ));
    }

    #[test]
    fn test_unit_subset_size() {
        let t = WickelFeatureTransformer::new(3, 8, 0.5).unwrap();
        assert_eq!(t.per_position(5), 3);
        assert_eq!(t.per_position(1), 1);
        let t = WickelFeatureTransformer::new(3, 8, 0.01).unwrap();
        assert_eq!(t.per_position(10), 1);
    }

    #[test]
    fn test_seeded_fit_is_reproducible() {
        let items = items_from_words(["dog", "god", "cat"]);
        let mut a = WickelFeatureTransformer::new(3, 32, 0.3).unwrap().with_seed(7);
        let mut b = WickelFeatureTransformer::new(3, 32, 0.3).unwrap().with_seed(7);
        assert_eq!(a.fit_transform(&items).unwrap(), b.fit_transform(&items).unwrap());
        assert_eq!(a.seed(), Some(7));
    }

    #[test]
    fn test_drawn_seed_is_recorded() {
        let items = items_from_words(["dog", "god"]);
        let mut a = WickelFeatureTransformer::new(3, 16, 0.5).unwrap();
        let x = a.fit_transform(&items).unwrap();
        let seed = a.seed().unwrap();

        let mut b = WickelFeatureTransformer::new(3, 16, 0.5).unwrap().with_seed(seed);
        assert_eq!(b.fit_transform(&items).unwrap(), x);
    }

    #[test]
    fn test_full_proportion_activates_everything() {
        let mut t = WickelFeatureTransformer::new(3, 4, 1.0).unwrap().with_seed(1);
        let x = t.fit_transform(&items_from_words(["dog"])).unwrap();
        assert!(x.iter().all(|&v| v == 1.0));
        // every wickelphone fires every unit
        assert_eq!(t.collision_rate(&items_from_words(["dog"])).unwrap(), 1.0);
    }

    #[test]
    fn test_invalid_unit_configs() {
        assert!(WickelFeatureTransformer::new(3, 0, 0.5).is_err());
        assert!(WickelFeatureTransformer::new(3, 8, 0.0).is_err());
        assert!(WickelFeatureTransformer::new(3, 8, 1.5).is_err());
        assert!(WickelFeatureTransformer::new(0, 8, 0.5).is_err());
    }

    #[test]
    fn test_units_feature_space() {
        let mut t = WickelFeatureTransformer::new(2, 6, 0.5).unwrap().with_seed(3);
        t.fit(&items_from_words(["ab"])).unwrap();
        let space = t.features().unwrap();
        assert_eq!(space.len(), 6);
        assert_eq!(
            space,
            FeatureSpace::Units {
                num_units: 6,
                n: 2,
                alphabet: vec!["#".into(), "a".into(), "b".into()],
                seed: 3
            }
        );
    }
}
