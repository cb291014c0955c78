//! Error types for the glitch pipeline.

use thiserror::Error;

use crate::codec::CodecError;

/// Errors that can end a glitch pipeline.
///
/// Every stage short-circuits on the first error; nothing is retried.
#[derive(Debug, Error)]
pub enum GlitchError {
    /// The input value cannot be interpreted as the declared source kind.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// A pixel buffer failed the structural check.
    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    /// The image codec failed to decode or encode.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The input stream reported an error.
    #[error("Stream error: {0}")]
    Stream(#[from] std::io::Error),

    /// A data URL handed to the decoder was not produced by this crate's encoder.
    #[error("Malformed data URL: {0}")]
    MalformedDataUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glitch_error_display() {
        let err = GlitchError::InvalidSource("empty buffer".to_string());
        assert_eq!(err.to_string(), "Invalid source: empty buffer");

        let err = GlitchError::InvalidImageData("width is zero".to_string());
        assert_eq!(err.to_string(), "Invalid image data: width is zero");
    }

    #[test]
    fn test_codec_error_is_transparent() {
        let err: GlitchError = CodecError::InvalidFormat.into();
        assert_eq!(err.to_string(), CodecError::InvalidFormat.to_string());
    }

    #[test]
    fn test_io_error_becomes_stream_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: GlitchError = io.into();
        assert!(matches!(err, GlitchError::Stream(_)));
        assert_eq!(err.to_string(), "Stream error: pipe closed");
    }
}
