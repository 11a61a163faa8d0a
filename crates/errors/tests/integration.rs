//! Integration tests for error types

#[cfg(test)]
mod tests {
    use eavclean_errors::*;

    #[test]
    fn test_error_conversion() {
        let storage_err = StorageError::QueryFailed {
            message: "no such table: core_config_data".into(),
        };
        let err: Error = storage_err.into();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn test_error_display() {
        let err = FilesystemError::DeleteFailed {
            path: "/media/catalog/product/a/b/c.jpg".into(),
            message: "permission denied".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to delete /media/catalog/product/a/b/c.jpg: permission denied"
        );
    }

    #[test]
    fn test_validation_rejection() {
        let malformed = ValidationError::Malformed {
            path: "design".into(),
            reason: "expected section/group/field".into(),
        };
        let unavailable = ValidationError::Unavailable {
            reason: "schema file missing".into(),
        };
        assert!(malformed.is_rejection());
        assert!(!unavailable.is_rejection());
    }

    #[test]
    fn test_user_codes() {
        let err: Error = ConfigError::MissingField {
            field: "database.url".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("config.missing_field"));
        assert!(err.user_hint().is_some());
        assert_eq!(Error::Cancelled.user_code(), Some("error.cancelled"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: std::io::ErrorKind::PermissionDenied,
                ..
            }
        ));
        assert!(err.is_retryable());
    }
}
