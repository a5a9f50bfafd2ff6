//! Hands a [`Content`] over to an HTTP transport.
//!
//! The transport declares the length up front (see [`apply_headers`]) and then
//! drains a [`ContentBody`], which streams the content once in bounded chunks
//! and releases it.

use crate::content::DEFAULT_BUFFER_SIZE;
use crate::ensure;
use crate::protocol::{Content, ContentError, PayloadSize};
use bytes::{BufMut, Bytes, BytesMut};
use http::{HeaderMap, HeaderValue, header};
use http_body::{Body as HttpBody, Frame, SizeHint};
use std::io::{self, ErrorKind, Write};
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use std::{fmt, mem};
use tokio::sync::mpsc;
use tracing::trace;

/// Number of chunks the writer may run ahead of the transport.
const CHANNEL_CAPACITY: usize = 4;

/// Sets `Content-Type` (when the content has one) and `Content-Length` on `headers`.
///
/// # Errors
///
/// Fails if the content can not be measured, or if its content type is not a
/// valid header value.
pub fn apply_headers(content: &dyn Content, headers: &mut HeaderMap) -> Result<PayloadSize, ContentError> {
    let payload_size = PayloadSize::from_length(content.length()?);

    if !content.content_type().is_empty() {
        let value =
            HeaderValue::from_str(content.content_type()).map_err(|e| ContentError::invalid_argument("content_type", e))?;
        headers.insert(header::CONTENT_TYPE, value);
    }
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(payload_size.content_length()));

    Ok(payload_size)
}

/// An [`http_body::Body`] over a [`Content`].
///
/// The content is measured on construction and reported through
/// [`size_hint`](HttpBody::size_hint). On the first poll, `write_to` runs on the
/// blocking thread pool and its output is sent back in frames of at most
/// `chunk_size` bytes through a bounded channel, so a file body is never held in
/// memory as a whole. The content is disposed once written, or when the body is
/// dropped before being polled.
///
/// Polling requires a running tokio runtime.
///
/// The hint is only as exact as [`Content::length`]: a windowed
/// [`ByteBufferContent`](crate::content::ByteBufferContent) reports its whole
/// buffer while emitting only the window, which HTTP/1 transports reject as a
/// `Content-Length` mismatch. Hand such a buffer over with a full window.
pub struct ContentBody {
    state: State,
    remaining: u64,
    chunk_size: usize,
}

enum State {
    Pending(Box<dyn Content + Send>),
    Streaming(mpsc::Receiver<Result<Bytes, ContentError>>),
    Done,
}

impl ContentBody {
    /// Streams `content` in chunks of [`DEFAULT_BUFFER_SIZE`] bytes.
    pub fn new<C: Content + Send + 'static>(content: C) -> Result<Self, ContentError> {
        Self::with_chunk_size(content, DEFAULT_BUFFER_SIZE)
    }

    /// Streams `content` in frames of at most `chunk_size` bytes.
    ///
    /// # Errors
    ///
    /// Fails if `chunk_size` is zero or the content can not be measured.
    pub fn with_chunk_size<C: Content + Send + 'static>(content: C, chunk_size: usize) -> Result<Self, ContentError> {
        ensure!(chunk_size >= 1, ContentError::can_not_be_less("chunk_size", 1));
        let size = content.length()?;
        Ok(Self { state: State::Pending(Box::new(content)), remaining: size, chunk_size })
    }

    pub fn payload_size(&self) -> PayloadSize {
        PayloadSize::from_length(self.remaining)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn spawn_writer(mut content: Box<dyn Content + Send>, chunk_size: usize) -> mpsc::Receiver<Result<Bytes, ContentError>> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        tokio::task::spawn_blocking(move || {
            let mut writer = ChunkWriter { tx, buf: BytesMut::with_capacity(chunk_size), chunk_size };
            let result = content.write_to(&mut writer).and_then(|()| writer.flush().map_err(ContentError::from));
            content.dispose();

            if let Err(e) = result
                && writer.tx.blocking_send(Err(e)).is_err()
            {
                trace!("content body dropped before the write error was delivered");
            }
        });

        rx
    }
}

impl fmt::Debug for ContentBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::Pending(_) => "pending",
            State::Streaming(_) => "streaming",
            State::Done => "done",
        };
        f.debug_struct("ContentBody")
            .field("state", &state)
            .field("remaining", &self.remaining)
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

impl HttpBody for ContentBody {
    type Data = Bytes;
    type Error = ContentError;

    fn poll_frame(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();

        if matches!(this.state, State::Pending(_))
            && let State::Pending(content) = mem::replace(&mut this.state, State::Done)
        {
            this.state = State::Streaming(Self::spawn_writer(content, this.chunk_size));
        }

        let State::Streaming(rx) = &mut this.state else {
            return Poll::Ready(None);
        };

        match ready!(rx.poll_recv(cx)) {
            Some(Ok(bytes)) => {
                this.remaining = this.remaining.saturating_sub(bytes.len() as u64);
                trace!(size = bytes.len(), remaining = this.remaining, "content body frame");
                Poll::Ready(Some(Ok(Frame::data(bytes))))
            }
            Some(Err(e)) => {
                this.state = State::Done;
                Poll::Ready(Some(Err(e)))
            }
            None => {
                this.state = State::Done;
                this.remaining = 0;
                Poll::Ready(None)
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        match self.state {
            State::Pending(_) => self.remaining == 0,
            State::Streaming(_) => false,
            State::Done => true,
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self.state {
            State::Done => SizeHint::with_exact(0),
            _ => SizeHint::with_exact(self.remaining),
        }
    }
}

impl Drop for ContentBody {
    fn drop(&mut self) {
        if let State::Pending(content) = &mut self.state {
            content.dispose();
        }
    }
}

/// Collects written bytes into chunks and hands full chunks to the body.
struct ChunkWriter {
    tx: mpsc::Sender<Result<Bytes, ContentError>>,
    buf: BytesMut,
    chunk_size: usize,
}

impl ChunkWriter {
    fn send_chunk(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }

        let chunk = self.buf.split().freeze();
        self.buf.reserve(self.chunk_size);
        self.tx.blocking_send(Ok(chunk)).map_err(|e| io::Error::new(ErrorKind::BrokenPipe, e.to_string()))
    }
}

impl Write for ChunkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(self.chunk_size - self.buf.len());
        self.buf.put_slice(&buf[..n]);
        if self.buf.len() == self.chunk_size {
            self.send_chunk()?;
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send_chunk()
    }
}
