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

//! Words as symbol sequences.
//!
//! A symbol is a plain `String` so that phonological segments spanning several
//! code points (`tʃ`, `aː`) stay atomic. Orthographic text is split into one
//! symbol per `char`.

use serde::{Deserialize, Serialize};

/// A word: flat symbols or syllables of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sequence {
    /// Linear sequence of symbols
    Flat(Vec<String>),
    /// Ordered syllables, each an ordered sequence of symbols
    Syllabified(Vec<Vec<String>>),
}

impl Sequence {
    /// Split text into one symbol per character.
    pub fn from_text(text: &str) -> Self {
        Sequence::Flat(text.chars().map(|c| c.to_string()).collect())
    }

    /// Build a flat sequence from symbols.
    pub fn flat<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Sequence::Flat(symbols.into_iter().map(Into::into).collect())
    }

    /// Build a syllabified sequence.
    pub fn syllables<I, J, S>(syllables: I) -> Self
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Sequence::Syllabified(
            syllables
                .into_iter()
                .map(|syl| syl.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Symbols in order, syllables concatenated.
    pub fn symbols(&self) -> Vec<&str> {
        match self {
            Sequence::Flat(symbols) => symbols.iter().map(String::as_str).collect(),
            Sequence::Syllabified(syllables) => syllables
                .iter()
                .flat_map(|syl| syl.iter().map(String::as_str))
                .collect(),
        }
    }

    /// Syllables, if this word is syllabified.
    pub fn syllable_list(&self) -> Option<&[Vec<String>]> {
        match self {
            Sequence::Flat(_) => None,
            Sequence::Syllabified(syllables) => Some(syllables),
        }
    }

    /// Number of symbols after flattening.
    pub fn len(&self) -> usize {
        match self {
            Sequence::Flat(symbols) => symbols.len(),
            Sequence::Syllabified(syllables) => syllables.iter().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_syllabified(&self) -> bool {
        matches!(self, Sequence::Syllabified(_))
    }

    /// Human readable rendering, syllables separated by `-`.
    pub fn display(&self) -> String {
        match self {
            Sequence::Flat(symbols) => symbols.concat(),
            Sequence::Syllabified(syllables) => syllables
                .iter()
                .map(|syl| syl.concat())
                .collect::<Vec<_>>()
                .join("-"),
        }
    }
}

impl From<&str> for Sequence {
    fn from(text: &str) -> Self {
        Sequence::from_text(text)
    }
}

impl From<String> for Sequence {
    fn from(text: String) -> Self {
        Sequence::from_text(&text)
    }
}
