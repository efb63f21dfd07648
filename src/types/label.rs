use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error types for label validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("Label must not be empty")]
    Empty,

    #[error("Label is {0} bytes long (max: {max})", max = Label::MAX_LEN)]
    TooLong(usize),

    #[error("Label contains invalid character: {0:?}")]
    InvalidChar(char),
}

/// Validated vertex label
///
/// A label names the type of a vertex (e.g. "Person", "Company"). Labels are
/// non-empty, at most 255 bytes, and restricted to `[A-Za-z0-9_-]`.
/// Construction is the only validation point; a `Label` value is always
/// well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(String);

impl Label {
    /// Maximum label length in bytes
    pub const MAX_LEN: usize = 255;

    /// Validate and construct a label
    pub fn new(name: impl Into<String>) -> Result<Self, LabelError> {
        let name = name.into();
        if name.is_empty() {
            return Err(LabelError::Empty);
        }
        if name.len() > Self::MAX_LEN {
            return Err(LabelError::TooLong(name.len()));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '_' && *c != '-')
        {
            return Err(LabelError::InvalidChar(c));
        }
        Ok(Self(name))
    }

    /// Label name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl TryFrom<String> for Label {
    type Error = LabelError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl std::str::FromStr for Label {
    type Err = LabelError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::new(name)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> String {
        label.0
    }
}
