use crate::ensure;
use crate::protocol::{Content, ContentError};
use bytes::Bytes;
use std::io::Write;
use tracing::trace;

/// A body backed by an in-memory byte buffer.
///
/// Only the `[offset, offset + count)` window of the buffer is written, but
/// [`length`](Content::length) reports the length of the whole buffer. Most
/// callers cover the full buffer, where the two agree.
#[derive(Debug, Clone)]
pub struct ByteBufferContent {
    buffer: Bytes,
    offset: usize,
    count: usize,
    content_type: String,
}

impl ByteBufferContent {
    /// Creates a body covering the whole buffer, typed `application/octet-stream`.
    pub fn new<B: Into<Bytes>>(buffer: B) -> Self {
        let buffer = buffer.into();
        let count = buffer.len();
        Self { buffer, offset: 0, count, content_type: mime::APPLICATION_OCTET_STREAM.to_string() }
    }

    /// Creates a body writing `count` bytes of `buffer` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidArgument`] if `offset` is past the end of
    /// the buffer or `count` exceeds the bytes remaining after `offset`.
    pub fn with_window<B: Into<Bytes>>(buffer: B, offset: usize, count: usize) -> Result<Self, ContentError> {
        let buffer = buffer.into();
        ensure!(offset <= buffer.len(), ContentError::can_not_be_greater("offset", buffer.len()));
        ensure!(count <= buffer.len() - offset, ContentError::can_not_be_greater("count", buffer.len() - offset));

        Ok(Self { buffer, offset, count, content_type: mime::APPLICATION_OCTET_STREAM.to_string() })
    }

    /// The bytes `write_to` emits.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[self.offset..self.offset + self.count]
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Content for ByteBufferContent {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn set_content_type(&mut self, content_type: String) {
        self.content_type = content_type;
    }

    fn length(&self) -> Result<u64, ContentError> {
        Ok(self.buffer.len() as u64)
    }

    fn write_to(&mut self, sink: &mut dyn Write) -> Result<(), ContentError> {
        sink.write_all(self.as_bytes())?;
        trace!(written = self.count, "byte buffer content written");
        Ok(())
    }
}

impl From<Bytes> for ByteBufferContent {
    fn from(bytes: Bytes) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for ByteBufferContent {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&'static [u8]> for ByteBufferContent {
    fn from(bytes: &'static [u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<String> for ByteBufferContent {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&'static str> for ByteBufferContent {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}
