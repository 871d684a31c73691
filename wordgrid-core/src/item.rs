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

//! Input items handed over by corpus readers.

use crate::error::{FeatureError, FeatureResult};
use crate::sequence::Sequence;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Value of a named record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Sequence(Sequence),
}

/// A corpus record: field name -> value.
pub type Record = BTreeMap<String, FieldValue>;

/// One unit of transformer input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Item {
    Sequence(Sequence),
    Record(Record),
}

impl Item {
    /// Resolve the word this item carries.
    ///
    /// Raw sequences require `field == None`; records require a field.
    pub fn sequence(&self, field: Option<&str>) -> FeatureResult<Cow<'_, Sequence>> {
        match (self, field) {
            (Item::Sequence(seq), None) => Ok(Cow::Borrowed(seq)),
            (Item::Sequence(_), Some(name)) => Err(FeatureError::config(format!(
                "field '{}' is set but the item is a raw sequence",
                name
            ))),
            (Item::Record(_), None) => Err(FeatureError::config(
                "record items require a field name",
            )),
            (Item::Record(record), Some(name)) => match record.get(name) {
                Some(FieldValue::Sequence(seq)) => Ok(Cow::Borrowed(seq)),
                Some(FieldValue::Text(text)) => Ok(Cow::Owned(Sequence::from_text(text))),
                Some(FieldValue::Number(_)) => Err(FeatureError::NotASequence(name.to_string())),
                None => Err(FeatureError::MissingField(name.to_string())),
            },
        }
    }
}

impl From<Sequence> for Item {
    fn from(seq: Sequence) -> Self {
        Item::Sequence(seq)
    }
}

impl From<&str> for Item {
    fn from(text: &str) -> Self {
        Item::Sequence(Sequence::from_text(text))
    }
}

impl From<Record> for Item {
    fn from(record: Record) -> Self {
        Item::Record(record)
    }
}

/// Wrap plain words as raw-sequence items.
pub fn items_from_words<I, S>(words: I) -> Vec<Item>
where
    I: IntoIterator<Item = S>,
    S: Into<Sequence>,
{
    words.into_iter().map(|w| Item::Sequence(w.into())).collect()
}

/// Resolve every item's word, failing on the first unusable item.
pub fn collect_sequences<'a>(
    items: &'a [Item],
    field: Option<&str>,
) -> FeatureResult<Vec<Cow<'a, Sequence>>> {
    items.iter().map(|item| item.sequence(field)).collect()
}
