//! Input stages: deferred operations that produce a pixel buffer.

use std::io::Read;

use crate::codec::{CodecError, ImageCodec, PixelBuffer};
use crate::error::GlitchError;

/// A recorded input operation, run once when the pipeline executes.
pub(crate) type InputStage = Box<dyn FnOnce(&dyn ImageCodec) -> Result<PixelBuffer, GlitchError>>;

/// Encoded image bytes (JPEG, PNG).
pub(crate) fn bytes(bytes: Vec<u8>) -> InputStage {
    Box::new(move |codec: &dyn ImageCodec| decode_source(codec, &bytes))
}

/// A reader drained to its end before decoding.
pub(crate) fn reader<R: Read + 'static>(mut reader: R) -> InputStage {
    Box::new(move |codec: &dyn ImageCodec| -> Result<PixelBuffer, GlitchError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        log::debug!("Input stream ended after {} bytes", bytes.len());
        decode_source(codec, &bytes)
    })
}

/// Already decoded pixels, passed through untouched.
pub(crate) fn image_data(pixels: PixelBuffer) -> InputStage {
    Box::new(move |_codec: &dyn ImageCodec| -> Result<PixelBuffer, GlitchError> { Ok(pixels) })
}

fn decode_source(codec: &dyn ImageCodec, bytes: &[u8]) -> Result<PixelBuffer, GlitchError> {
    if bytes.is_empty() {
        return Err(GlitchError::InvalidSource(
            "can't decode an empty buffer".to_string(),
        ));
    }

    codec.decode(bytes).map_err(|e| match e {
        CodecError::InvalidFormat => GlitchError::InvalidSource(format!(
            "{} bytes are not a recognized image",
            bytes.len()
        )),
        other => GlitchError::Codec(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_png, DefaultCodec};
    use std::io::{self, Cursor};

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"))
        }
    }

    #[test]
    fn test_bytes_source_decodes() {
        let expected = PixelBuffer::filled(5, 4, [1, 2, 3, 255]);
        let stage = bytes(encode_png(&expected).unwrap());
        assert_eq!(stage(&DefaultCodec).unwrap(), expected);
    }

    #[test]
    fn test_empty_bytes_are_invalid_source() {
        let stage = bytes(Vec::new());
        assert!(matches!(
            stage(&DefaultCodec),
            Err(GlitchError::InvalidSource(_))
        ));
    }

    #[test]
    fn test_unrecognized_bytes_are_invalid_source() {
        let stage = bytes(b"definitely not an image".to_vec());
        assert!(matches!(
            stage(&DefaultCodec),
            Err(GlitchError::InvalidSource(_))
        ));
    }

    #[test]
    fn test_reader_source_decodes() {
        let expected = PixelBuffer::filled(3, 3, [9, 8, 7, 255]);
        let stage = reader(Cursor::new(encode_png(&expected).unwrap()));
        assert_eq!(stage(&DefaultCodec).unwrap(), expected);
    }

    #[test]
    fn test_reader_error_is_stream_error() {
        let stage = reader(FailingReader);
        match stage(&DefaultCodec) {
            Err(GlitchError::Stream(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("Expected Stream error, got {:?}", other),
        }
    }

    #[test]
    fn test_image_data_source_passes_through() {
        // no validation happens at this stage
        let pixels = PixelBuffer::new(0, 0, vec![]);
        let stage = image_data(pixels.clone());
        assert_eq!(stage(&DefaultCodec).unwrap(), pixels);
    }
}
