use crate::protocol::ContentError;
use std::io::Write;

/// A request body that can be measured before it is written.
///
/// Implementations must keep [`length`](Content::length) and
/// [`write_to`](Content::write_to) in exact agreement: `write_to` emits exactly
/// `length()` bytes, no matter how many times `length()` was called before.
/// The only documented exception is a windowed [`ByteBufferContent`](crate::content::ByteBufferContent),
/// which reports the length of its whole buffer.
#[cfg_attr(test, mockall::automock)]
pub trait Content {
    /// The MIME type of this body, empty when unknown.
    fn content_type(&self) -> &str;

    fn set_content_type(&mut self, content_type: String);

    /// Returns the number of bytes `write_to` will emit.
    ///
    /// This must not change any observable state of the content.
    fn length(&self) -> Result<u64, ContentError>;

    /// Writes the body into `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Io`] if the sink rejects a write or the backing
    /// source fails, and [`ContentError::Disposed`] if the content has been disposed.
    fn write_to(&mut self, sink: &mut dyn Write) -> Result<(), ContentError>;

    /// Releases any resource held by this content.
    ///
    /// Buffer-backed contents hold nothing, so the default does nothing.
    fn dispose(&mut self) {}
}

impl<C: Content + ?Sized> Content for Box<C> {
    fn content_type(&self) -> &str {
        (**self).content_type()
    }

    fn set_content_type(&mut self, content_type: String) {
        (**self).set_content_type(content_type);
    }

    fn length(&self) -> Result<u64, ContentError> {
        (**self).length()
    }

    fn write_to(&mut self, sink: &mut dyn Write) -> Result<(), ContentError> {
        (**self).write_to(sink)
    }

    fn dispose(&mut self) {
        (**self).dispose();
    }
}
