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

//! Consonant-Vowel Grid Alignment
//!
//! Words are placed on a grid of consonant and vowel slots so that vowels line
//! up across words with different consonant counts.
//!
//! ## Run layout (default)
//!
//! A word is read as alternating maximal runs, always starting with a
//! (possibly empty) consonant run:
//!
//! ```text
//! spat  ->  [C:2][V:1][C:1]
//! pat   ->  [C:1][V:1][C:1]
//! at    ->  [C:0][V:1][C:1]
//! ```
//!
//! The grid reserves, per run position, the longest run seen at fit, so `a`
//! lands in the same columns for all three words.
//!
//! ## Template layout
//!
//! A pattern such as `CCCVV` is repeated as often as the fitting data needs;
//! each symbol takes the next free slot of its class.

use crate::grid::{Grid, PadSide};
use crate::transformer::{fit_sequences, FeatureSource, FeatureSpace, SlotRole, Transformer};
use wordgrid_core::{FeatureError, FeatureResult, FeatureSet, Item, SegmentClass, Sequence};

/// A validated consonant/vowel pattern holding at least one of each class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvTemplate {
    classes: Vec<SegmentClass>,
}

impl CvTemplate {
    /// Parse a pattern of `C` and `V`, e.g. `"CCCVV"`.
    pub fn parse(pattern: &str) -> FeatureResult<Self> {
        let classes = pattern
            .chars()
            .map(|c| match c.to_ascii_uppercase() {
                'C' => Ok(SegmentClass::Consonant),
                'V' => Ok(SegmentClass::Vowel),
                other => Err(FeatureError::Config(format!(
                    "grid template may only contain C and V, found '{}'",
                    other
                ))),
            })
            .collect::<FeatureResult<Vec<_>>>()?;
        Self::try_from(classes)
    }

    pub fn classes(&self) -> &[SegmentClass] {
        &self.classes
    }
}

impl TryFrom<Vec<SegmentClass>> for CvTemplate {
    type Error = FeatureError;

    fn try_from(classes: Vec<SegmentClass>) -> FeatureResult<Self> {
        let has = |class| classes.contains(&class);
        if !has(SegmentClass::Consonant) || !has(SegmentClass::Vowel) {
            let pattern: String = classes
                .iter()
                .map(|c| match c {
                    SegmentClass::Consonant => 'C',
                    SegmentClass::Vowel => 'V',
                })
                .collect();
            return Err(FeatureError::Config(format!(
                "grid template '{}' needs at least one C and one V",
                pattern
            )));
        }
        Ok(Self { classes })
    }
}

/// How the CV grid is shaped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CvLayout {
    /// Data-driven run grid
    #[default]
    Runs,
    /// Repeated consonant/vowel pattern
    Template(CvTemplate),
}

impl CvLayout {
    /// Template layout from a pattern of `C` and `V`, e.g. `"CCCVV"`.
    pub fn template(pattern: &str) -> FeatureResult<Self> {
        Ok(CvLayout::Template(CvTemplate::parse(pattern)?))
    }
}

#[derive(Debug, Clone)]
enum CvPlan {
    Runs {
        /// Slots per run position.
        caps: Vec<usize>,
        /// First slot index of each run position.
        starts: Vec<usize>,
    },
    Template {
        pattern: Vec<SegmentClass>,
        repeats: usize,
    },
}

#[derive(Debug, Clone)]
struct CvState {
    features: FeatureSet,
    grid: Grid,
    plan: CvPlan,
}

/// Maximal runs, starting with a consonant run that may be empty.
fn runs(classes: &[SegmentClass]) -> Vec<usize> {
    let mut runs = vec![0];
    let mut current = SegmentClass::Consonant;
    for &class in classes {
        if class != current {
            runs.push(0);
            current = class;
        }
        if let Some(last) = runs.last_mut() {
            *last += 1;
        }
    }
    runs
}

fn run_class(position: usize) -> SegmentClass {
    if position % 2 == 0 {
        SegmentClass::Consonant
    } else {
        SegmentClass::Vowel
    }
}

/// Absolute slot index of each symbol in the endlessly repeated pattern.
fn template_positions(pattern: &[SegmentClass], classes: &[SegmentClass]) -> Vec<usize> {
    let mut pos = 0;
    classes
        .iter()
        .map(|class| {
            while pattern[pos % pattern.len()] != *class {
                pos += 1;
            }
            pos += 1;
            pos - 1
        })
        .collect()
}

fn classify(word: &Sequence, features: &FeatureSet) -> FeatureResult<Vec<SegmentClass>> {
    word.symbols()
        .into_iter()
        .map(|s| features.require_class(s))
        .collect()
}

/// Aligns vowels and consonants of phonological words on a shared grid.
#[derive(Debug, Clone)]
pub struct CvTransformer {
    source: FeatureSource,
    field: Option<String>,
    layout: CvLayout,
    pad: PadSide,
    state: Option<CvState>,
}

impl CvTransformer {
    pub fn new(source: impl Into<FeatureSource>) -> Self {
        Self {
            source: source.into(),
            field: None,
            layout: CvLayout::default(),
            pad: PadSide::default(),
            state: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_layout(mut self, layout: CvLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Alignment inside each run; ignored by template layouts.
    pub fn with_pad(mut self, pad: PadSide) -> Self {
        self.pad = pad;
        self
    }

    pub fn feature_set(&self) -> Option<&FeatureSet> {
        self.state.as_ref().map(|s| &s.features)
    }

    /// Slot classes in grid order, e.g. `CCVCC`.
    pub fn grid_pattern(&self) -> Option<String> {
        let state = self.state.as_ref()?;
        Some(
            state
                .grid
                .slots()
                .iter()
                .map(|s| if s.role == SlotRole::Vowel { 'V' } else { 'C' })
                .collect(),
        )
    }

    fn slot_indices(&self, state: &CvState, classes: &[SegmentClass], word: &Sequence) -> FeatureResult<Vec<usize>> {
        match &state.plan {
            CvPlan::Runs { caps, starts } => {
                let word_runs = runs(classes);
                if word_runs.len() > caps.len() {
                    return Err(FeatureError::GridOverflow(format!(
                        "word '{}' has {} runs, grid holds {}",
                        word.display(),
                        word_runs.len(),
                        caps.len()
                    )));
                }
                let mut indices = Vec::with_capacity(classes.len());
                for (k, &len) in word_runs.iter().enumerate() {
                    if len > caps[k] {
                        return Err(FeatureError::GridOverflow(format!(
                            "word '{}' has a {} run of {} at position {}, grid holds {}",
                            word.display(),
                            run_class(k),
                            len,
                            k,
                            caps[k]
                        )));
                    }
                    let start = starts[k] + self.pad.start(caps[k], len);
                    indices.extend(start..start + len);
                }
                Ok(indices)
            }
            CvPlan::Template { pattern, repeats } => {
                let capacity = pattern.len() * repeats;
                let indices = template_positions(pattern, classes);
                match indices.last() {
                    Some(&last) if last >= capacity => Err(FeatureError::GridOverflow(format!(
                        "word '{}' needs {} template slots, grid holds {}",
                        word.display(),
                        last + 1,
                        capacity
                    ))),
                    _ => Ok(indices),
                }
            }
        }
    }
}

impl Transformer for CvTransformer {
    fn fit(&mut self, items: &[Item]) -> FeatureResult<()> {
        let words = fit_sequences(items, self.field.as_deref())?;
        let refs: Vec<&Sequence> = words.iter().map(|w| w.as_ref()).collect();
        let features = self.source.resolve(&refs)?;

        let mut classified = Vec::with_capacity(refs.len());
        for word in &refs {
            classified.push(classify(word, &features)?);
        }

        let (roles, plan): (Vec<SlotRole>, CvPlan) = match &self.layout {
            CvLayout::Runs => {
                let mut caps: Vec<usize> = Vec::new();
                for classes in &classified {
                    for (k, len) in runs(classes).into_iter().enumerate() {
                        if k == caps.len() {
                            caps.push(0);
                        }
                        caps[k] = caps[k].max(len);
                    }
                }
                let mut starts = Vec::with_capacity(caps.len());
                let mut roles = Vec::new();
                for (k, &cap) in caps.iter().enumerate() {
                    starts.push(roles.len());
                    let role = match run_class(k) {
                        SegmentClass::Consonant => SlotRole::Consonant,
                        SegmentClass::Vowel => SlotRole::Vowel,
                    };
                    roles.extend(std::iter::repeat(role).take(cap));
                }
                (roles, CvPlan::Runs { caps, starts })
            }
            CvLayout::Template(template) => {
                let pattern = template.classes();
                let repeats = classified
                    .iter()
                    .filter_map(|classes| template_positions(pattern, classes).last().copied())
                    .map(|last| last / pattern.len() + 1)
                    .max()
                    .unwrap_or(0);
                let roles = (0..repeats)
                    .flat_map(|_| pattern.iter())
                    .map(|class| match class {
                        SegmentClass::Consonant => SlotRole::Consonant,
                        SegmentClass::Vowel => SlotRole::Vowel,
                    })
                    .collect();
                (
                    roles,
                    CvPlan::Template {
                        pattern: pattern.to_vec(),
                        repeats,
                    },
                )
            }
        };

        let grid = Grid::build(roles.into_iter().map(|r| (r, None)), &features);
        tracing::info!(
            words = refs.len(),
            slots = grid.len(),
            width = grid.width(),
            "CV grid fitted"
        );
        self.state = Some(CvState {
            features,
            grid,
            plan,
        });
        Ok(())
    }

    fn vectorize(&self, word: &Sequence) -> FeatureResult<Vec<f32>> {
        let state = self.state.as_ref().ok_or(FeatureError::NotFitted)?;
        let classes = classify(word, &state.features)?;
        let indices = self.slot_indices(state, &classes, word)?;

        let mut row = vec![0.0; state.grid.width()];
        for (symbol, index) in word.symbols().into_iter().zip(indices) {
            state.grid.fill(index, symbol, &state.features, &mut row)?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use wordgrid_core::{items_from_words, OneHotExtractor};

    fn phonemes(words: &[&str]) -> Vec<Item> {
        items_from_words(words.iter().copied())
    }

    #[test]
    fn test_runs_start_with_consonant() {
        use SegmentClass::{Consonant as C, Vowel as V};
        assert_eq!(runs(&[C, C, V, C, C]), vec![2, 1, 2]);
        assert_eq!(runs(&[V, C]), vec![0, 1, 1]);
        assert_eq!(runs(&[]), vec![0]);
    }

    #[test]
    fn test_run_grid_shape() {
        let mut t = CvTransformer::new(OneHotExtractor::phonemes());
        t.fit(&phonemes(&["spat", "pat", "at", "tapa"])).unwrap();
        // runs: spat [2,1,1] pat [1,1,1] at [0,1,1] tapa [1,1,1,1]
        assert_eq!(t.grid_pattern().unwrap(), "CCVCV");
    }

    #[test]
    fn test_vowel_aligned_across_onset_lengths() {
        let mut t = CvTransformer::new(OneHotExtractor::phonemes());
        let x = t.fit_transform(&phonemes(&["pat", "spat"])).unwrap();
        let vowel_columns = |row: usize| -> Vec<usize> {
            let space = t.features().unwrap();
            let FeatureSpace::Grid(slots) = space else {
                panic!("expected grid");
            };
            slots
                .iter()
                .filter(|s| s.role == SlotRole::Vowel)
                .flat_map(|s| s.offset..s.offset + s.width)
                .filter(|&c| x[[row, c]] != 0.0)
                .collect()
        };
        assert_eq!(vowel_columns(0), vowel_columns(1));
        assert_eq!(vowel_columns(0).len(), 1);
    }

    #[test]
    fn test_right_aligned_runs() {
        let mut t = CvTransformer::new(OneHotExtractor::phonemes()).with_pad(PadSide::Left);
        let x = t.fit_transform(&phonemes(&["pa", "spa"])).unwrap();
        // consonants {p, s}: 2 wide; "pa" puts p in the second onset slot
        assert_eq!(x.row(0).to_vec(), vec![0.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(x.row(1).to_vec(), vec![0.0, 1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_overflow_is_error() {
        let mut t = CvTransformer::new(OneHotExtractor::phonemes());
        t.fit(&phonemes(&["pat"])).unwrap();
        assert!(matches!(
            t.transform(&phonemes(&["ppat"])).unwrap_err(),
            FeatureError::GridOverflow(_)
        ));
        assert!(matches!(
            t.transform(&phonemes(&["pata"])).unwrap_err(),
            FeatureError::GridOverflow(_)
        ));
    }

    #[test]
    fn test_template_layout() {
        let layout = CvLayout::template("CCCVV").unwrap();
        let mut t = CvTransformer::new(OneHotExtractor::phonemes()).with_layout(layout);
        t.fit(&phonemes(&["pat", "spat"])).unwrap();
        // "pat": p->0, a->3, t->5 needs a second repetition
        assert_eq!(t.grid_pattern().unwrap(), "CCCVVCCCVV");

        let x = t.transform(&phonemes(&["pat", "spat"])).unwrap();
        assert_eq!(x.shape()[1], t.vec_len().unwrap());
        assert!(matches!(
            t.transform(&phonemes(&["papapa"])).unwrap_err(),
            FeatureError::GridOverflow(_)
        ));
    }

    #[test]
    fn test_template_from_classes_needs_both() {
        use SegmentClass::{Consonant as C, Vowel as V};
        for classes in [vec![], vec![C], vec![V, V]] {
            let err = CvTemplate::try_from(classes).unwrap_err();
            assert_eq!(err.kind(), wordgrid_core::ErrorKind::Configuration);
        }
        let template = CvTemplate::try_from(vec![C, V]).unwrap();
        let mut t = CvTransformer::new(OneHotExtractor::phonemes())
            .with_layout(CvLayout::Template(template));
        t.fit(&phonemes(&["pat"])).unwrap();
        assert_eq!(t.grid_pattern().unwrap(), "CVCV");
    }

    #[test]
    fn test_template_rejects_bad_patterns() {
        assert!(CvLayout::template("CCX").is_err());
        assert!(CvLayout::template("CCC").is_err());
        assert!(CvLayout::template("").is_err());
    }
}
