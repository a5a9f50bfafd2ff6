use crate::ensure;
use crate::protocol::{Content, ContentError};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use tracing::{trace, warn};

/// Default size of the buffer used to copy a stream into the sink.
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

/// A body read from a seekable stream through a fixed-size buffer.
///
/// The stream position at construction is remembered, and the body spans from
/// there to the end of the stream as measured at construction. Every
/// [`write_to`](Content::write_to) rewinds to that position first, so the body is
/// stable across repeated measurements and writes.
#[derive(Debug)]
pub struct StreamContent<R> {
    source: Option<R>,
    buffer_size: usize,
    initial_position: u64,
    length: u64,
    content_type: String,
}

impl<R: Read + Seek> StreamContent<R> {
    /// Wraps `source` using [`DEFAULT_BUFFER_SIZE`].
    pub fn new(source: R) -> Result<Self, ContentError> {
        Self::with_buffer_size(source, DEFAULT_BUFFER_SIZE)
    }

    /// Wraps `source`, copying it through a buffer of `buffer_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidArgument`] if `buffer_size` is zero, and
    /// [`ContentError::Io`] if the stream can not be measured.
    pub fn with_buffer_size(mut source: R, buffer_size: usize) -> Result<Self, ContentError> {
        ensure!(buffer_size >= 1, ContentError::can_not_be_less("buffer_size", 1));

        let initial_position = source.stream_position()?;
        let end = source.seek(SeekFrom::End(0))?;
        source.seek(SeekFrom::Start(initial_position))?;

        Ok(Self {
            source: Some(source),
            buffer_size,
            initial_position,
            length: end.saturating_sub(initial_position),
            content_type: mime::APPLICATION_OCTET_STREAM.to_string(),
        })
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn initial_position(&self) -> u64 {
        self.initial_position
    }

    pub fn is_disposed(&self) -> bool {
        self.source.is_none()
    }

    /// Returns the wrapped stream, or `None` once disposed.
    pub fn into_inner(self) -> Option<R> {
        self.source
    }
}

impl<R: Read + Seek> Content for StreamContent<R> {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn set_content_type(&mut self, content_type: String) {
        self.content_type = content_type;
    }

    fn length(&self) -> Result<u64, ContentError> {
        ensure!(self.source.is_some(), ContentError::disposed("StreamContent"));
        Ok(self.length)
    }

    fn write_to(&mut self, sink: &mut dyn Write) -> Result<(), ContentError> {
        let Some(source) = self.source.as_mut() else {
            return Err(ContentError::disposed("StreamContent"));
        };

        source.seek(SeekFrom::Start(self.initial_position))?;

        let mut remaining = self.length;
        let capacity = usize::try_from(remaining).map_or(self.buffer_size, |len| len.min(self.buffer_size));
        let mut buffer = vec![0u8; capacity];

        while remaining > 0 {
            let want = usize::try_from(remaining).map_or(buffer.len(), |len| len.min(buffer.len()));
            let read = match source.read(&mut buffer[..want]) {
                Ok(0) => {
                    warn!(remaining, "stream ended before its measured length");
                    return Err(ContentError::io(ErrorKind::UnexpectedEof));
                }
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            sink.write_all(&buffer[..read])?;
            remaining -= read as u64;
        }

        trace!(written = self.length, buffer_size = self.buffer_size, "stream content written");
        Ok(())
    }

    fn dispose(&mut self) {
        self.source = None;
    }
}
