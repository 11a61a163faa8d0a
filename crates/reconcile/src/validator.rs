//! Configuration path validation
//!
//! The reconciler asks a [`PathValidator`] whether a stored path is declared
//! by the platform's configuration schema. The schema itself is outside this
//! crate; [`DeclaredPathValidator`] answers from an exported list of paths.

use std::collections::HashSet;
use std::path::Path;

use eavclean_errors::{ConfigError, Error, ValidationError};

/// Answers "is this configuration path declared valid?"
pub trait PathValidator: Send + Sync {
    /// Check a single path
    ///
    /// # Errors
    ///
    /// `ValidationError::Malformed` rejects the path. Any other error means
    /// the validator could not answer.
    fn is_valid(&self, path: &str) -> Result<bool, ValidationError>;
}

/// Validator backed by a list of declared schema paths
#[derive(Debug, Clone, Default)]
pub struct DeclaredPathValidator {
    declared: HashSet<String>,
}

impl DeclaredPathValidator {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            declared: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a JSON array of strings, or one path per line with `#` comments
    ///
    /// # Errors
    ///
    /// Returns an error if the contents look like JSON but do not parse.
    pub fn parse(contents: &str) -> Result<Self, Error> {
        let trimmed = contents.trim_start();
        if trimmed.starts_with('[') {
            let paths: Vec<String> =
                serde_json::from_str(trimmed).map_err(|e| ConfigError::ParseError {
                    message: format!("declared paths: {e}"),
                })?;
            return Ok(Self::new(paths));
        }

        Ok(Self::new(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        ))
    }

    /// Load declared paths from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::from(ConfigError::NotFound {
                    path: path.display().to_string(),
                })
            } else {
                Error::io_with_path(&e, path)
            }
        })?;
        let validator = Self::parse(&contents)?;
        tracing::debug!(
            path = %path.display(),
            declared = validator.len(),
            "loaded declared configuration paths"
        );
        Ok(validator)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.declared.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }
}

impl PathValidator for DeclaredPathValidator {
    fn is_valid(&self, path: &str) -> Result<bool, ValidationError> {
        // Every path would look orphaned against an empty schema.
        if self.declared.is_empty() {
            return Err(ValidationError::Unavailable {
                reason: "no declared configuration paths loaded".to_string(),
            });
        }

        let segments: Vec<&str> = path.split('/').collect();
        if segments.len() < 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(ValidationError::Malformed {
                path: path.to_string(),
                reason: "expected section/group/field".to_string(),
            });
        }

        Ok(self.declared.contains(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_with_comments() {
        let validator = DeclaredPathValidator::parse(
            "# exported schema\nweb/secure/base_url\n\n  catalog/seo/product_url_suffix  \n",
        )
        .unwrap();
        assert_eq!(validator.len(), 2);
        assert!(validator.is_valid("web/secure/base_url").unwrap());
        assert!(validator.is_valid("catalog/seo/product_url_suffix").unwrap());
    }

    #[test]
    fn test_parse_json_array() {
        let validator =
            DeclaredPathValidator::parse(r#"["a/b/c", "d/e/f"]"#).unwrap();
        assert!(validator.is_valid("d/e/f").unwrap());
        assert!(!validator.is_valid("x/y/z").unwrap());
    }

    #[test]
    fn test_parse_broken_json() {
        assert!(DeclaredPathValidator::parse("[\"a/b/c\",").is_err());
    }

    #[test]
    fn test_malformed_paths_rejected() {
        let validator = DeclaredPathValidator::new(["a/b/c"]);
        for path in ["a/b", "a//c", "/a/b", "a/b/", ""] {
            let err = validator.is_valid(path).unwrap_err();
            assert!(err.is_rejection(), "{path} should be malformed");
        }
    }

    #[test]
    fn test_empty_schema_is_unavailable() {
        let err = DeclaredPathValidator::default()
            .is_valid("a/b/c")
            .unwrap_err();
        assert!(!err.is_rejection());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DeclaredPathValidator::load(&dir.path().join("absent.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotFound { .. })));
    }
}
