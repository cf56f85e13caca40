use thiserror::Error;

/// Classifies PSL loading errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// Required path or URL not configured
    NotConfigured,
    /// File open/read/write failure
    FileError,
    /// HTTP request failed or returned an unreadable body
    DownloadFailed,
    /// Downloaded or cached data is not a usable suffix list
    InvalidData,
}

/// TLD extraction error types
#[derive(Error, Debug)]
pub enum TldError {
    /// The PSL buffer could not be decoded as text.
    #[error("PSL format error: {0}")]
    Format(String),

    #[error("PSL load error: {message}")]
    Load {
        kind: LoadErrorKind,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TldError {
    pub(crate) fn load(kind: LoadErrorKind, message: impl Into<String>) -> Self {
        TldError::Load {
            kind,
            message: message.into(),
        }
    }

    /// Returns the load error kind, if this is a load error.
    pub fn load_kind(&self) -> Option<LoadErrorKind> {
        match self {
            TldError::Load { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<std::str::Utf8Error> for TldError {
    fn from(err: std::str::Utf8Error) -> Self {
        TldError::Format(format!(
            "invalid UTF-8 at byte offset {}",
            err.valid_up_to()
        ))
    }
}

pub type Result<T> = std::result::Result<T, TldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_error_becomes_format_error() {
        let bytes = [b'c', b'o', b'm', 0xff];
        let err: TldError = std::str::from_utf8(&bytes).unwrap_err().into();
        match &err {
            TldError::Format(message) => assert!(message.contains("offset 3"), "got: {}", message),
            _ => panic!("expected Format"),
        }
    }

    #[test]
    fn test_load_error_kind_is_matchable() {
        let err = TldError::load(LoadErrorKind::DownloadFailed, "connection refused");
        match &err {
            TldError::Load { kind, .. } => {
                assert!(matches!(kind, LoadErrorKind::DownloadFailed));
            }
            _ => panic!("expected Load"),
        }
        assert_eq!(err.load_kind(), Some(LoadErrorKind::DownloadFailed));
    }

    #[test]
    fn test_load_error_display_includes_message() {
        let err = TldError::load(LoadErrorKind::InvalidData, "no rules found");
        let display = format!("{}", err);
        assert!(display.contains("no rules found"), "got: {}", display);
    }

    #[test]
    fn test_io_error_has_no_load_kind() {
        let err: TldError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(err.load_kind().is_none());
        assert!(format!("{}", err).starts_with("IO error"));
    }
}
