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

//! Featurization error types

use crate::features::SegmentClass;
use thiserror::Error;

/// Result type for featurization operations
pub type FeatureResult<T> = Result<T, FeatureError>;

/// Errors that can occur while extracting features or transforming words
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Malformed table or invalid option combination
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transformer used before `fit`
    #[error("Transformer has not been fitted")]
    NotFitted,

    /// Padding disabled and the word cannot host a single n-gram
    #[error("Word '{word}' is shorter than n-gram order {n} and padding is disabled")]
    WordTooShort { word: String, n: usize },

    /// Symbol outside the closed vocabulary established at fit
    #[error("Unknown symbol '{0}': not seen during fit")]
    UnknownSymbol(String),

    /// Symbol exists but belongs to the other segment class
    #[error("Symbol '{symbol}' is not a {expected}")]
    WrongClass {
        symbol: String,
        expected: SegmentClass,
    },

    /// Word does not fit the grid fixed at fit time
    #[error("Grid overflow: {0}")]
    GridOverflow(String),

    /// Record lacks the configured field
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Field exists but does not hold a symbol sequence
    #[error("Field '{0}' does not hold a sequence")]
    NotASequence(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse grouping of [`FeatureError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised while validating configuration or during `fit`
    Configuration,
    /// Raised when fitted state cannot represent a word
    Vocabulary,
    /// Raised when an item does not carry usable input
    Input,
}

impl FeatureError {
    /// Group this error into its kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeatureError::Config(_)
            | FeatureError::NotFitted
            | FeatureError::WordTooShort { .. }
            | FeatureError::Serialization(_) => ErrorKind::Configuration,
            FeatureError::UnknownSymbol(_)
            | FeatureError::WrongClass { .. }
            | FeatureError::GridOverflow(_) => ErrorKind::Vocabulary,
            FeatureError::MissingField(_) | FeatureError::NotASequence(_) => ErrorKind::Input,
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        FeatureError::Config(msg.into())
    }
}

impl From<serde_json::Error> for FeatureError {
    fn from(e: serde_json::Error) -> Self {
        FeatureError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for FeatureError {
    fn from(e: toml::de::Error) -> Self {
        FeatureError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(FeatureError::NotFitted.kind(), ErrorKind::Configuration);
        assert_eq!(
            FeatureError::WordTooShort {
                word: "a".into(),
                n: 3
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            FeatureError::UnknownSymbol("x".into()).kind(),
            ErrorKind::Vocabulary
        );
        assert_eq!(
            FeatureError::GridOverflow("too long".into()).kind(),
            ErrorKind::Vocabulary
        );
        assert_eq!(
            FeatureError::MissingField("phonology".into()).kind(),
            ErrorKind::Input
        );
    }

    #[test]
    fn test_wrong_class_message() {
        let err = FeatureError::WrongClass {
            symbol: "a".into(),
            expected: SegmentClass::Consonant,
        };
        assert_eq!(err.to_string(), "Symbol 'a' is not a consonant");
    }
}
