//! Product media file references

use serde::{Deserialize, Serialize};
use std::fmt;

/// A product image path relative to the image root, e.g. `/1/0/1090323-2.jpeg`.
///
/// The original casing is kept for display and exact database matching;
/// [`MediaFileRef::canonical_key`] gives the key used to compare disk and
/// database sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaFileRef(String);

impl MediaFileRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ASCII case-folded lookup key.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MediaFileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MediaFileRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for MediaFileRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for MediaFileRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_folds_ascii_only() {
        let file = MediaFileRef::new("/1/0/Img.JPG");
        assert_eq!(file.canonical_key(), "/1/0/img.jpg");
        assert_eq!(file.as_str(), "/1/0/Img.JPG");
    }
}
