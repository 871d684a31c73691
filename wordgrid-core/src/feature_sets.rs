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

//! Built-in feature tables.

use crate::tables::{EncodedTable, FeatureTable, PhonemeTable, PredefinedTable};

/// IPA vowel symbols used as the default vowel inventory.
pub const IPA_VOWELS: &[&str] = &[
    "i", "y", "ɨ", "ʉ", "ɯ", "u", "ɪ", "ʏ", "ʊ", "e", "ø", "ɘ", "ɵ", "ɤ", "o", "ə", "ɛ", "œ",
    "ɜ", "ɞ", "ʌ", "ɔ", "æ", "ɐ", "a", "ɶ", "ɑ", "ɒ",
];

// symbol, height, backness, rounding
const VOWEL_ROWS: &[(&str, &str, &str, &str)] = &[
    ("i", "close", "front", "unrounded"),
    ("y", "close", "front", "rounded"),
    ("ɨ", "close", "central", "unrounded"),
    ("ʉ", "close", "central", "rounded"),
    ("ɯ", "close", "back", "unrounded"),
    ("u", "close", "back", "rounded"),
    ("ɪ", "near-close", "front", "unrounded"),
    ("ʏ", "near-close", "front", "rounded"),
    ("ʊ", "near-close", "back", "rounded"),
    ("e", "close-mid", "front", "unrounded"),
    ("ø", "close-mid", "front", "rounded"),
    ("ɘ", "close-mid", "central", "unrounded"),
    ("ɵ", "close-mid", "central", "rounded"),
    ("ɤ", "close-mid", "back", "unrounded"),
    ("o", "close-mid", "back", "rounded"),
    ("ə", "mid", "central", "unrounded"),
    ("ɛ", "open-mid", "front", "unrounded"),
    ("œ", "open-mid", "front", "rounded"),
    ("ɜ", "open-mid", "central", "unrounded"),
    ("ɞ", "open-mid", "central", "rounded"),
    ("ʌ", "open-mid", "back", "unrounded"),
    ("ɔ", "open-mid", "back", "rounded"),
    ("æ", "near-open", "front", "unrounded"),
    ("ɐ", "near-open", "central", "unrounded"),
    ("a", "open", "front", "unrounded"),
    ("ɶ", "open", "front", "rounded"),
    ("ɑ", "open", "back", "unrounded"),
    ("ɒ", "open", "back", "rounded"),
];

// symbol, voicing, place, manner
const CONSONANT_ROWS: &[(&str, &str, &str, &str)] = &[
    ("p", "voiceless", "bilabial", "plosive"),
    ("b", "voiced", "bilabial", "plosive"),
    ("t", "voiceless", "alveolar", "plosive"),
    ("d", "voiced", "alveolar", "plosive"),
    ("ʈ", "voiceless", "retroflex", "plosive"),
    ("ɖ", "voiced", "retroflex", "plosive"),
    ("c", "voiceless", "palatal", "plosive"),
    ("ɟ", "voiced", "palatal", "plosive"),
    ("k", "voiceless", "velar", "plosive"),
    ("g", "voiced", "velar", "plosive"),
    ("ɡ", "voiced", "velar", "plosive"),
    ("q", "voiceless", "uvular", "plosive"),
    ("ɢ", "voiced", "uvular", "plosive"),
    ("ʔ", "voiceless", "glottal", "plosive"),
    ("m", "voiced", "bilabial", "nasal"),
    ("ɱ", "voiced", "labiodental", "nasal"),
    ("n", "voiced", "alveolar", "nasal"),
    ("ɳ", "voiced", "retroflex", "nasal"),
    ("ɲ", "voiced", "palatal", "nasal"),
    ("ŋ", "voiced", "velar", "nasal"),
    ("ɴ", "voiced", "uvular", "nasal"),
    ("ʙ", "voiced", "bilabial", "trill"),
    ("r", "voiced", "alveolar", "trill"),
    ("ʀ", "voiced", "uvular", "trill"),
    ("ɾ", "voiced", "alveolar", "tap"),
    ("ɽ", "voiced", "retroflex", "tap"),
    ("ɸ", "voiceless", "bilabial", "fricative"),
    ("β", "voiced", "bilabial", "fricative"),
    ("f", "voiceless", "labiodental", "fricative"),
    ("v", "voiced", "labiodental", "fricative"),
    ("θ", "voiceless", "dental", "fricative"),
    ("ð", "voiced", "dental", "fricative"),
    ("s", "voiceless", "alveolar", "fricative"),
    ("z", "voiced", "alveolar", "fricative"),
    ("ʃ", "voiceless", "postalveolar", "fricative"),
    ("ʒ", "voiced", "postalveolar", "fricative"),
    ("ʂ", "voiceless", "retroflex", "fricative"),
    ("ʐ", "voiced", "retroflex", "fricative"),
    ("ç", "voiceless", "palatal", "fricative"),
    ("ʝ", "voiced", "palatal", "fricative"),
    ("x", "voiceless", "velar", "fricative"),
    ("ɣ", "voiced", "velar", "fricative"),
    ("χ", "voiceless", "uvular", "fricative"),
    ("ʁ", "voiced", "uvular", "fricative"),
    ("ħ", "voiceless", "pharyngeal", "fricative"),
    ("ʕ", "voiced", "pharyngeal", "fricative"),
    ("h", "voiceless", "glottal", "fricative"),
    ("ɦ", "voiced", "glottal", "fricative"),
    ("ɬ", "voiceless", "alveolar", "lateral-fricative"),
    ("ɮ", "voiced", "alveolar", "lateral-fricative"),
    ("ʋ", "voiced", "labiodental", "approximant"),
    ("ɹ", "voiced", "alveolar", "approximant"),
    ("ɻ", "voiced", "retroflex", "approximant"),
    ("j", "voiced", "palatal", "approximant"),
    ("ɰ", "voiced", "velar", "approximant"),
    ("w", "voiced", "labial-velar", "approximant"),
    ("l", "voiced", "alveolar", "lateral-approximant"),
    ("ɭ", "voiced", "retroflex", "lateral-approximant"),
    ("ʎ", "voiced", "palatal", "lateral-approximant"),
    ("ʟ", "voiced", "velar", "lateral-approximant"),
    ("ts", "voiceless", "alveolar", "affricate"),
    ("dz", "voiced", "alveolar", "affricate"),
    ("tʃ", "voiceless", "postalveolar", "affricate"),
    ("dʒ", "voiced", "postalveolar", "affricate"),
    ("pf", "voiceless", "labiodental", "affricate"),
];

/// Distinctive-feature table for common IPA segments.
///
/// Vowels: height, backness, rounding. Consonants: voicing, place, manner.
pub fn ipa_features() -> PhonemeTable {
    let vowels = VOWEL_ROWS
        .iter()
        .fold(FeatureTable::new(["height", "backness", "rounding"]), |t, (s, h, b, r)| {
            t.with_symbol(s, &[*h, *b, *r])
        });
    let consonants = CONSONANT_ROWS
        .iter()
        .fold(FeatureTable::new(["voicing", "place", "manner"]), |t, (s, v, p, m)| {
            t.with_symbol(s, &[*v, *p, *m])
        });
    PhonemeTable { vowels, consonants }
}

/// Segment order of the 14-segment display.
///
/// a top, b upper right, c lower right, d bottom, e lower left, f upper left,
/// g middle left, h middle right, i upper-left diagonal, j upper vertical,
/// k upper-right diagonal, l lower-right diagonal, m lower vertical,
/// n lower-left diagonal.
pub const FOURTEEN_SEGMENTS: &str = "abcdefghijklmn";

const FOURTEEN_GLYPHS: &[(&str, &str)] = &[
    ("a", "abcefgh"),
    ("b", "abcdhjm"),
    ("c", "adef"),
    ("d", "abcdjm"),
    ("e", "adefg"),
    ("f", "aefg"),
    ("g", "acdefh"),
    ("h", "bcefgh"),
    ("i", "adjm"),
    ("j", "bcde"),
    ("k", "efgkl"),
    ("l", "def"),
    ("m", "bcefik"),
    ("n", "bcefil"),
    ("o", "abcdef"),
    ("p", "abefgh"),
    ("q", "abcdefl"),
    ("r", "abefghl"),
    ("s", "acdfgh"),
    ("t", "ajm"),
    ("u", "bcdef"),
    ("v", "efkn"),
    ("w", "bcefln"),
    ("x", "ikln"),
    ("y", "ikm"),
    ("z", "adkn"),
];

/// Letters a-z as binary 14-segment display vectors.
///
/// Every letter sits in the consonant class; the vowel table is empty.
pub fn fourteen_segment() -> PredefinedTable {
    let table = FOURTEEN_GLYPHS
        .iter()
        .fold(FeatureTable::new(["glyph"]), |t, (letter, _)| {
            t.with_symbol(letter, &[*letter])
        });
    let consonants = FOURTEEN_GLYPHS
        .iter()
        .fold(EncodedTable::new(table), |t, (letter, lit)| {
            let vector = FOURTEEN_SEGMENTS
                .chars()
                .map(|seg| if lit.contains(seg) { 1.0 } else { 0.0 })
                .collect();
            t.with_encoding("glyph", letter, vector)
        });
    PredefinedTable {
        vowels: EncodedTable::default(),
        consonants,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::SegmentClass;

    #[test]
    fn test_ipa_table_is_valid() {
        let table = ipa_features();
        assert!(table.validate().is_ok());
        assert_eq!(table.vowels.symbols.len(), VOWEL_ROWS.len());
        assert_eq!(table.classify("tʃ"), Some(SegmentClass::Consonant));
    }

    #[test]
    fn test_vowel_inventory_matches_table() {
        let table = ipa_features();
        for v in IPA_VOWELS {
            assert_eq!(table.classify(v), Some(SegmentClass::Vowel), "{}", v);
        }
    }

    #[test]
    fn test_fourteen_segment_table() {
        let table = fourteen_segment();
        assert!(table.validate().is_ok());
        assert_eq!(table.consonants.group_widths().unwrap(), vec![14]);

        let o = table.consonants.encode("o").unwrap();
        assert_eq!(o.iter().filter(|x| **x == 1.0).count(), 6);
        let i = table.consonants.encode("i").unwrap();
        assert_eq!(i[0], 1.0);
        assert_eq!(i[9], 1.0);
    }
}
