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

//! Integration tests across transformers

use std::collections::BTreeMap;
use wordgrid_core::{
    items_from_words, DistinctiveFeatureExtractor, ErrorKind, FeatureError, FeatureExtractor,
    FieldValue, Item, OneHotExtractor, Record, Sequence,
};
use wordgrid_transform::{
    ConstrainedOpenNgramTransformer, CvTransformer, FeatureSpace, LinearTransformer,
    OncTransformer, OpenNgramTransformer, SlotRole, Transformer, TransformerConfig,
    WeightedOpenBigramTransformer, WickelFeatureTransformer, WickelTransformer,
};

fn words() -> Vec<Item> {
    items_from_words(["salt", "slat", "mop", "tops", "last"])
}

fn record(field: &str, value: FieldValue) -> Item {
    let mut r = Record::new();
    r.insert(field.to_string(), value);
    r.into()
}

fn all_transformers() -> Vec<Box<dyn Transformer>> {
    vec![
        Box::new(LinearTransformer::new(OneHotExtractor::characters())),
        Box::new(CvTransformer::new(OneHotExtractor::phonemes())),
        Box::new(OpenNgramTransformer::new(2).unwrap()),
        Box::new(ConstrainedOpenNgramTransformer::new(3, 3).unwrap()),
        Box::new(WeightedOpenBigramTransformer::new(vec![1.0, 0.5, 0.25]).unwrap()),
        Box::new(WickelTransformer::new(3).unwrap()),
        Box::new(WickelFeatureTransformer::new(3, 64, 0.4).unwrap().with_seed(5)),
    ]
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Test that every transformer yields one fixed-width row per item
#[test]
fn test_row_count_and_width() {
    let items = words();
    for mut t in all_transformers() {
        let x = t.fit_transform(&items).unwrap();
        assert_eq!(x.nrows(), items.len());
        assert_eq!(x.ncols(), t.vec_len().unwrap());
        assert_eq!(t.features().unwrap().len(), t.vec_len().unwrap());

        let subset = t.transform(&items[1..3]).unwrap();
        assert_eq!(subset.dim(), (2, x.ncols()));
        assert_eq!(subset.row(0), x.row(1));
    }
}

/// Test that transform is a pure function of fitted state
#[test]
fn test_transform_idempotent() {
    let items = words();
    for mut t in all_transformers() {
        t.fit(&items).unwrap();
        assert_eq!(t.transform(&items).unwrap(), t.transform(&items).unwrap());
    }
}

/// Test that every transformer rejects an empty fitting collection
#[test]
fn test_empty_fit_rejected() {
    for mut t in all_transformers() {
        let err = t.fit(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(!t.is_fitted());
    }
}

/// Test CV alignment of the vowel in "pat" and "spat"
#[test]
fn test_cv_vowel_column() {
    let mut t = CvTransformer::new(DistinctiveFeatureExtractor::ipa().unwrap());
    let x = t.fit_transform(&items_from_words(["pat", "spat"])).unwrap();

    let FeatureSpace::Grid(slots) = t.features().unwrap() else {
        panic!("expected grid");
    };
    let vowel = slots.iter().find(|s| s.role == SlotRole::Vowel).unwrap();
    let cols = vowel.offset..vowel.offset + vowel.width;
    let a0: Vec<f32> = cols.clone().map(|c| x[[0, c]]).collect();
    let a1: Vec<f32> = cols.map(|c| x[[1, c]]).collect();
    assert_eq!(a0, a1);
    assert!(a0.iter().any(|&v| v != 0.0));
}

/// Test the open bigrams of "salt" and similarity with its transposition
#[test]
fn test_open_bigram_similarity() {
    let t = OpenNgramTransformer::new(2).unwrap();
    let grams = t.ngrams(&Sequence::from("salt"));
    assert_eq!(grams, vec!["al", "at", "lt", "sa", "sl", "st"]);

    let mut t = OpenNgramTransformer::new(2).unwrap();
    let x = t
        .fit_transform(&items_from_words(["salt", "slat", "mopu"]))
        .unwrap();
    let salt = x.row(0).to_vec();
    let slat = x.row(1).to_vec();
    let mopu = x.row(2).to_vec();
    assert!(dot(&salt, &slat) > dot(&salt, &mopu));
    assert_eq!(dot(&salt, &mopu), 0.0);
}

/// Test wickelphones of "dog" with and without padding
#[test]
fn test_wickel_dog() {
    let mut t = WickelTransformer::new(3).unwrap();
    t.fit(&items_from_words(["dog"])).unwrap();
    assert_eq!(
        t.features().unwrap(),
        FeatureSpace::Ngrams(
            ["##d", "#do", "dog", "g##", "og#"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        )
    );

    let mut t = WickelTransformer::new(3).unwrap().with_padding(false);
    t.fit(&items_from_words(["dog"])).unwrap();
    assert_eq!(t.features().unwrap(), FeatureSpace::Ngrams(vec!["dog".into()]));
    let err = t.transform(&items_from_words(["do"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

/// Test that weighted bigram values follow the skip distance
#[test]
fn test_weighted_bigram_decay() {
    let weights = vec![0.9, 0.6, 0.3];
    let mut t = WeightedOpenBigramTransformer::new(weights.clone()).unwrap();
    let x = t.fit_transform(&items_from_words(["abcd"])).unwrap();
    let FeatureSpace::Ngrams(names) = t.features().unwrap() else {
        panic!("expected n-grams");
    };
    let value = |gram: &str| x[[0, names.iter().position(|n| n == gram).unwrap()]];

    assert_eq!(value("ab"), weights[0]);
    assert_eq!(value("ac"), weights[1]);
    assert_eq!(value("ad"), weights[2]);
    assert!(value("ab") > value("ac") && value("ac") > value("ad"));
}

/// Test that the fitted feature set covers every symbol at its class width
#[test]
fn test_feature_widths() {
    let items = items_from_words(["strand", "pits", "ʃip"]);
    let sequences: Vec<Sequence> = items
        .iter()
        .map(|i| i.sequence(None).unwrap().into_owned())
        .collect();
    let refs: Vec<&Sequence> = sequences.iter().collect();
    let set = DistinctiveFeatureExtractor::ipa().unwrap().extract(&refs).unwrap();

    for word in &refs {
        for symbol in word.symbols() {
            let class = set.classify(symbol).unwrap();
            assert_eq!(set.vector(symbol).unwrap().len(), set.class_dim(class));
        }
    }

    let mut t = LinearTransformer::new(set.clone());
    let x = t.fit_transform(&items).unwrap();
    assert_eq!(x.ncols(), 6 * set.width());
}

/// Test reading words from a record field
#[test]
fn test_record_fields() {
    let items = vec![
        record("orthography", FieldValue::Text("cat".into())),
        record("orthography", FieldValue::Text("act".into())),
    ];
    let mut t = OpenNgramTransformer::new(2).unwrap().with_field("orthography");
    let x = t.fit_transform(&items).unwrap();
    assert_eq!(x.nrows(), 2);

    let missing = vec![record("phonology", FieldValue::Text("cat".into()))];
    assert_eq!(
        t.transform(&missing).unwrap_err(),
        FeatureError::MissingField("orthography".into())
    );

    let numeric = vec![record("orthography", FieldValue::Number(3.0))];
    assert_eq!(t.transform(&numeric).unwrap_err().kind(), ErrorKind::Input);

    let mut raw = OpenNgramTransformer::new(2).unwrap();
    assert!(raw.fit(&items).is_err());
}

/// Test ONC encoding of syllabified records
#[test]
fn test_onc_syllabified_field() {
    let word = |syllables: &[&str]| {
        let syllables = syllables.iter().map(|s| s.chars().map(String::from));
        record("syllables", FieldValue::Sequence(Sequence::syllables(syllables)))
    };
    let items = vec![word(&["kæ", "təl"]), word(&["stɔ", "ri"])];
    let mut t = OncTransformer::new(OneHotExtractor::phonemes()).with_field("syllables");
    let x = t.fit_transform(&items).unwrap();
    assert_eq!(x.nrows(), 2);
    assert_eq!(t.syllable_caps().unwrap(), &[[2, 1, 0], [1, 1, 1]]);
}

/// Test the wickelfeature collision rate stays in range
#[test]
fn test_collision_rate_bounds() {
    let items = words();
    let mut narrow = WickelFeatureTransformer::new(3, 2, 0.9).unwrap().with_seed(1);
    narrow.fit(&items).unwrap();
    let mut wide = WickelFeatureTransformer::new(3, 512, 0.3).unwrap().with_seed(1);
    wide.fit(&items).unwrap();

    let narrow_rate = narrow.collision_rate(&items).unwrap();
    let wide_rate = wide.collision_rate(&items).unwrap();
    assert!((0.0..=1.0).contains(&narrow_rate));
    assert!((0.0..=1.0).contains(&wide_rate));
    assert!(wide_rate <= narrow_rate);
}

/// Test sharing a fitted transformer across threads
#[test]
fn test_concurrent_transform() {
    let items = words();
    let mut t = WickelFeatureTransformer::new(3, 128, 0.3).unwrap().with_seed(9);
    let expected = t.fit_transform(&items).unwrap();

    let t = &t;
    let items = &items;
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(move || t.transform(items).unwrap())).collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}

/// Test building transformers from TOML
#[test]
fn test_config_round_trip_through_toml() {
    let config = TransformerConfig::from_toml_str(
        r#"
        transformer = "weighted_open_bigram"
        weights = [1.0, 0.5]
        field = "orthography"
        "#,
    )
    .unwrap();
    let mut t = config.build().unwrap();

    let mut fields = BTreeMap::new();
    fields.insert("orthography".to_string(), FieldValue::Text("salt".into()));
    let x = t.fit_transform(&[Item::Record(fields)]).unwrap();
    // sa sl al at lt (st skips two)
    assert_eq!(x.ncols(), 5);
}
