use thiserror::Error;

use crate::app::domain::charset::CharsetGuess;
use crate::app::domain::representation::Representation;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The resource is too big for the requested view. Only that view is
    /// affected; the rest of the session keeps working.
    #[error("Resource is too big for the {representation} view ({size} bytes, limit {limit})")]
    Capacity {
        representation: Representation,
        size: u64,
        limit: u64,
    },

    #[error("Cannot decode data as {charset}: {reason}")]
    Decode { charset: CharsetGuess, reason: String },

    #[error("Cannot encode text as {charset}: {reason}")]
    Encode { charset: CharsetGuess, reason: String },

    #[error("Close cancelled by user")]
    UserCancelledClose,

    #[error("Loading {size} bytes into the text editor was declined")]
    TextLoadDeclined { size: u64 },

    #[error("Session is busy loading text")]
    Busy,

    #[error("Text loader stopped without reporting a result")]
    LoaderLost,

    #[error("{0} view holds edits that were never synchronized")]
    UnreconciledEdits(Representation),

    #[error("Settings error: {0}")]
    Settings(String),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::charset::SingleByteCharset;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Capacity {
            representation: Representation::Raw,
            size: 300,
            limit: 256,
        };
        assert_eq!(
            err.to_string(),
            "Resource is too big for the Raw view (300 bytes, limit 256)"
        );

        let err = AppError::Decode {
            charset: CharsetGuess::SingleByte(SingleByteCharset::Ascii),
            reason: "byte 0x80 at offset 2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot decode data as US-ASCII: byte 0x80 at offset 2"
        );

        let err = AppError::Settings("limits out of order".to_string());
        assert_eq!(err.to_string(), "Settings error: limits out of order");

        assert_eq!(
            AppError::UnreconciledEdits(Representation::Text).to_string(),
            "Text view holds edits that were never synchronized"
        );
    }
}
