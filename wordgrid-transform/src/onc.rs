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

//! Onset-nucleus-coda alignment for syllabified words.
//!
//! Each syllable is split into an onset (consonants before the first vowel),
//! a nucleus (the first vowel run) and a coda (everything after). The grid
//! keeps, per syllable position, the longest onset, nucleus and coda seen at
//! fit. Onsets are right-aligned so the consonant next to the vowel always
//! shares a column; nuclei and codas are left-aligned.

use crate::grid::{Grid, PadSide};
use crate::transformer::{fit_sequences, FeatureSource, FeatureSpace, SlotRole, Transformer};
use wordgrid_core::{FeatureError, FeatureResult, FeatureSet, Item, SegmentClass, Sequence};

/// One syllable split into its constituents.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Constituents<'a> {
    onset: &'a [String],
    nucleus: &'a [String],
    coda: &'a [String],
}

impl<'a> Constituents<'a> {
    fn split(syllable: &'a [String], features: &FeatureSet) -> FeatureResult<Self> {
        let classes = syllable
            .iter()
            .map(|s| features.require_class(s))
            .collect::<FeatureResult<Vec<_>>>()?;

        let first_vowel = classes
            .iter()
            .position(|c| *c == SegmentClass::Vowel)
            .unwrap_or(syllable.len());
        let nucleus_end = classes[first_vowel..]
            .iter()
            .position(|c| *c != SegmentClass::Vowel)
            .map_or(syllable.len(), |p| first_vowel + p);

        if let Some(i) = classes[nucleus_end..]
            .iter()
            .position(|c| *c == SegmentClass::Vowel)
        {
            return Err(FeatureError::WrongClass {
                symbol: syllable[nucleus_end + i].clone(),
                expected: SegmentClass::Consonant,
            });
        }

        Ok(Self {
            onset: &syllable[..first_vowel],
            nucleus: &syllable[first_vowel..nucleus_end],
            coda: &syllable[nucleus_end..],
        })
    }

    fn lengths(&self) -> [usize; 3] {
        [self.onset.len(), self.nucleus.len(), self.coda.len()]
    }
}

const ROLES: [SlotRole; 3] = [SlotRole::Onset, SlotRole::Nucleus, SlotRole::Coda];

fn syllables_of(word: &Sequence) -> FeatureResult<&[Vec<String>]> {
    word.syllable_list().ok_or_else(|| {
        FeatureError::Config(format!(
            "ONC alignment needs syllabified words, got flat '{}'",
            word.display()
        ))
    })
}

#[derive(Debug, Clone)]
struct OncState {
    features: FeatureSet,
    grid: Grid,
    /// `[onset, nucleus, coda]` capacity per syllable position.
    caps: Vec<[usize; 3]>,
    /// First slot of each constituent per syllable position.
    starts: Vec<[usize; 3]>,
}

/// Syllable-structured grid encoder.
///
/// Input must already be syllabified: a vowel after the nucleus ends in the
/// coda and is rejected as `WrongClass` rather than opening a new syllable.
#[derive(Debug, Clone)]
pub struct OncTransformer {
    source: FeatureSource,
    field: Option<String>,
    state: Option<OncState>,
}

impl OncTransformer {
    pub fn new(source: impl Into<FeatureSource>) -> Self {
        Self {
            source: source.into(),
            field: None,
            state: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn feature_set(&self) -> Option<&FeatureSet> {
        self.state.as_ref().map(|s| &s.features)
    }

    /// Fitted `[onset, nucleus, coda]` slot counts per syllable.
    pub fn syllable_caps(&self) -> Option<&[[usize; 3]]> {
        self.state.as_ref().map(|s| s.caps.as_slice())
    }
}

impl Transformer for OncTransformer {
    fn fit(&mut self, items: &[Item]) -> FeatureResult<()> {
        let words = fit_sequences(items, self.field.as_deref())?;
        let refs: Vec<&Sequence> = words.iter().map(|w| w.as_ref()).collect();
        let features = self.source.resolve(&refs)?;

        let mut caps: Vec<[usize; 3]> = Vec::new();
        for word in &refs {
            for (k, syllable) in syllables_of(word)?.iter().enumerate() {
                let lengths = Constituents::split(syllable, &features)?.lengths();
                if k == caps.len() {
                    caps.push([0; 3]);
                }
                for (cap, len) in caps[k].iter_mut().zip(lengths) {
                    *cap = (*cap).max(len);
                }
            }
        }

        let mut starts = Vec::with_capacity(caps.len());
        let mut roles = Vec::new();
        for (k, syllable_caps) in caps.iter().enumerate() {
            let mut syllable_starts = [0; 3];
            for (c, &cap) in syllable_caps.iter().enumerate() {
                syllable_starts[c] = roles.len();
                roles.extend(std::iter::repeat((ROLES[c], Some(k))).take(cap));
            }
            starts.push(syllable_starts);
        }

        let grid = Grid::build(roles, &features);
        tracing::info!(
            words = refs.len(),
            syllables = caps.len(),
            slots = grid.len(),
            width = grid.width(),
            "ONC grid fitted"
        );
        self.state = Some(OncState {
            features,
            grid,
            caps,
            starts,
        });
        Ok(())
    }

    fn vectorize(&self, word: &Sequence) -> FeatureResult<Vec<f32>> {
        let state = self.state.as_ref().ok_or(FeatureError::NotFitted)?;
        let syllables = syllables_of(word)?;
        if syllables.len() > state.caps.len() {
            return Err(FeatureError::GridOverflow(format!(
                "word '{}' has {} syllables, grid holds {}",
                word.display(),
                syllables.len(),
                state.caps.len()
            )));
        }

        let mut row = vec![0.0; state.grid.width()];
        for (k, syllable) in syllables.iter().enumerate() {
            let parts = Constituents::split(syllable, &state.features)?;
            let constituents = [parts.onset, parts.nucleus, parts.coda];
            for (c, symbols) in constituents.iter().enumerate() {
                let cap = state.caps[k][c];
                if symbols.len() > cap {
                    return Err(FeatureError::GridOverflow(format!(
                        "word '{}' has a {:?} of {} in syllable {}, grid holds {}",
                        word.display(),
                        ROLES[c],
                        symbols.len(),
                        k,
                        cap
                    )));
                }
                let pad = if ROLES[c] == SlotRole::Onset {
                    PadSide::Left
                } else {
                    PadSide::Right
                };
                let start = state.starts[k][c] + pad.start(cap, symbols.len());
                for (i, symbol) in symbols.iter().enumerate() {
                    state.grid.fill(start + i, symbol, &state.features, &mut row)?;
                }
            }
        }
        Ok(row)
    }

    fn vec_len(&self) -> FeatureResult<usize> {
        self.state
            .as_ref()
            .map(|s| s.grid.width())
            .ok_or(FeatureError::NotFitted)
    }

    fn features(&self) -> FeatureResult<FeatureSpace> {
        let state = self.state.as_ref().ok_or(FeatureError::NotFitted)?;
        Ok(FeatureSpace::Grid(state.grid.slots().to_vec()))
    }

    fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}
