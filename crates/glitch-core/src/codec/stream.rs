//! Readable output streams for encoded images.

use serde::{Deserialize, Serialize};
use std::io::{self, Read};

/// Default maximum chunk handed out by a single `read` call.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Container format of an [`ImageStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamFormat {
    Png,
    Jpeg,
}

impl StreamFormat {
    /// MIME type of the container.
    pub fn mime_type(self) -> &'static str {
        match self {
            StreamFormat::Png => "image/png",
            StreamFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Options for JPEG output streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JpegStreamOptions {
    /// Maximum number of bytes returned per read.
    pub bufsize: usize,
    /// JPEG quality (1-100).
    pub quality: u8,
    /// Request progressive encoding.
    pub progressive: bool,
}

impl Default for JpegStreamOptions {
    fn default() -> Self {
        Self {
            bufsize: DEFAULT_CHUNK_SIZE,
            quality: 75,
            progressive: false,
        }
    }
}

/// An encoded image exposed as a reader.
///
/// Each `read` returns at most `chunk_size` bytes, so consumers see the image
/// arrive in chunks the way they would from a socket or file.
#[derive(Debug, Clone)]
pub struct ImageStream {
    data: Vec<u8>,
    position: usize,
    chunk_size: usize,
    format: StreamFormat,
}

impl ImageStream {
    /// Wrap encoded bytes. A `chunk_size` of 0 uses [`DEFAULT_CHUNK_SIZE`].
    pub fn new(data: Vec<u8>, format: StreamFormat, chunk_size: usize) -> Self {
        let chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        log::debug!(
            "Streaming {} bytes of {} in chunks of {}",
            data.len(),
            format.mime_type(),
            chunk_size
        );

        Self {
            data,
            position: 0,
            chunk_size,
            format,
        }
    }

    pub fn format(&self) -> StreamFormat {
        self.format
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Consume the stream and return the whole encoded image, read or not.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl Read for ImageStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.chunk_size).min(self.remaining());
        buf[..n].copy_from_slice(&self.data[self.position..self.position + n]);
        self.position += n;
        Ok(n)
    }
}
