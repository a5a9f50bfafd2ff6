//! `multipart/form-data` bodies.
//!
//! A [`MultipartFormContent`] owns an ordered list of named fields, each one any
//! [`Content`] (nested multipart included), and serializes them as:
//!
//! ```text
//! --<boundary>\r\n
//! Content-Disposition: form-data; name="<name>"\r\n\r\n
//! <content bytes>\r\n
//! --<boundary>\r\n
//! Content-Disposition: form-data; name="<name>"; filename="<file name>"\r\n
//! Content-Type: <content type>\r\n\r\n
//! <content bytes>\r\n
//! --<boundary>--\r\n
//! ```
//!
//! [`length`](Content::length) is computed from the template sizes and the
//! children's own lengths, without writing anything, and always equals the
//! number of bytes [`write_to`](Content::write_to) emits.

use crate::ensure;
use crate::protocol::{Content, ContentError};
use crate::utils::mime::mime_type_for_path;
use bytes::{BufMut, BytesMut};
use rand::Rng;
use rand::distr::Alphanumeric;
use std::fmt;
use std::io::Write;
use tracing::{debug, trace, warn};

/// Longest boundary allowed by RFC 2046.
pub const MAX_BOUNDARY_LEN: usize = 70;

/// Fixed head of every generated boundary.
pub const BOUNDARY_PREFIX: &str = "----------------";

/// Number of random alphanumeric chars appended to [`BOUNDARY_PREFIX`].
pub const BOUNDARY_RANDOM_LEN: usize = 16;

/// `Content-Disposition: form-data; name=""\r\n\r\n`
const FIELD_TEMPLATE_SIZE: u64 = 43;

/// `Content-Disposition: form-data; name=""; filename=""\r\nContent-Type: \r\n\r\n`
const FIELD_FILE_TEMPLATE_SIZE: u64 = 72;

/// `--` boundary `\r\n` before the field, `\r\n` after its body.
const DELIMITER_OVERHEAD: u64 = 6;

/// `--` boundary `--\r\n`
const TERMINATOR_OVERHEAD: u64 = 6;

const TYPE_NAME: &str = "MultipartFormContent";

struct Element {
    name: String,
    file_name: Option<String>,
    content: Box<dyn Content + Send>,
}

impl Element {
    fn is_file_field(&self) -> bool {
        self.file_name.is_some()
    }

    fn head_length(&self) -> u64 {
        match &self.file_name {
            Some(file_name) => {
                FIELD_FILE_TEMPLATE_SIZE
                    + self.name.len() as u64
                    + file_name.len() as u64
                    + self.content.content_type().len() as u64
            }
            None => FIELD_TEMPLATE_SIZE + self.name.len() as u64,
        }
    }

    fn encode_head(&self, boundary: &str, dst: &mut BytesMut) {
        dst.put_slice(b"--");
        dst.put_slice(boundary.as_bytes());
        dst.put_slice(b"\r\n");

        dst.put_slice(b"Content-Disposition: form-data; name=\"");
        dst.put_slice(self.name.as_bytes());
        dst.put_slice(b"\"");

        if let Some(file_name) = &self.file_name {
            dst.put_slice(b"; filename=\"");
            dst.put_slice(file_name.as_bytes());
            dst.put_slice(b"\"\r\nContent-Type: ");
            dst.put_slice(self.content.content_type().as_bytes());
        }

        dst.put_slice(b"\r\n\r\n");
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.name)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content.content_type())
            .finish_non_exhaustive()
    }
}

/// A `multipart/form-data` body built from named fields.
///
/// The container owns every field's content. [`dispose`](Content::dispose)
/// disposes them all (recursively through nested containers); afterwards every
/// operation fails with [`ContentError::Disposed`]. Dropping the container
/// disposes it as well.
#[derive(Debug)]
pub struct MultipartFormContent {
    boundary: String,
    /// `None` once disposed.
    elements: Option<Vec<Element>>,
    content_type: String,
}

impl MultipartFormContent {
    /// Creates an empty body with a randomly generated boundary.
    pub fn new() -> Self {
        let boundary = generate_boundary();
        let content_type = format!("{}; boundary={boundary}", mime::MULTIPART_FORM_DATA);
        Self { boundary, elements: Some(Vec::new()), content_type }
    }

    /// Creates an empty body delimited by `boundary`.
    ///
    /// The boundary must not occur inside any field's bytes; that is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidArgument`] if `boundary` is empty or longer
    /// than [`MAX_BOUNDARY_LEN`].
    pub fn with_boundary<S: Into<String>>(boundary: S) -> Result<Self, ContentError> {
        let boundary = boundary.into();
        ensure!(!boundary.is_empty(), ContentError::empty_string("boundary"));
        ensure!(boundary.len() <= MAX_BOUNDARY_LEN, ContentError::can_not_be_greater("boundary", MAX_BOUNDARY_LEN));

        let content_type = format!("{}; boundary={boundary}", mime::MULTIPART_FORM_DATA);
        Ok(Self { boundary, elements: Some(Vec::new()), content_type })
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Appends a simple field.
    ///
    /// # Errors
    ///
    /// Fails with [`ContentError::Disposed`] once disposed, or
    /// [`ContentError::InvalidArgument`] if `name` is empty.
    pub fn add<C, S>(&mut self, content: C, name: S) -> Result<(), ContentError>
    where
        C: Content + Send + 'static,
        S: Into<String>,
    {
        self.push(Box::new(content), name.into(), None)
    }

    /// Appends a file field, typed after the extension of `file_name`.
    pub fn add_file<C, S, F>(&mut self, mut content: C, name: S, file_name: F) -> Result<(), ContentError>
    where
        C: Content + Send + 'static,
        S: Into<String>,
        F: Into<String>,
    {
        let file_name = file_name.into();
        content.set_content_type(mime_type_for_path(&file_name));
        self.push(Box::new(content), name.into(), Some(file_name))
    }

    /// Appends a file field with an explicit content type.
    pub fn add_file_with_type<C, S, F, T>(
        &mut self,
        mut content: C,
        name: S,
        file_name: F,
        content_type: T,
    ) -> Result<(), ContentError>
    where
        C: Content + Send + 'static,
        S: Into<String>,
        F: Into<String>,
        T: Into<String>,
    {
        content.set_content_type(content_type.into());
        self.push(Box::new(content), name.into(), Some(file_name.into()))
    }

    fn push(&mut self, content: Box<dyn Content + Send>, name: String, file_name: Option<String>) -> Result<(), ContentError> {
        let elements = self.elements.as_mut().ok_or(ContentError::disposed(TYPE_NAME))?;
        ensure!(!name.is_empty(), ContentError::empty_string("name"));

        debug!(name = %name, file_name = ?file_name, "multipart field added");
        elements.push(Element { name, file_name, content });
        Ok(())
    }

    fn elements(&self) -> Result<&[Element], ContentError> {
        self.elements.as_deref().ok_or(ContentError::disposed(TYPE_NAME))
    }

    /// Iterates the field contents in insertion order.
    pub fn iter(&self) -> Result<impl Iterator<Item = &dyn Content>, ContentError> {
        Ok(self.elements()?.iter().map(|element| element.content.as_ref() as &dyn Content))
    }

    /// Number of fields, zero once disposed.
    pub fn len(&self) -> usize {
        self.elements.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of file fields, zero once disposed.
    pub fn file_count(&self) -> usize {
        self.elements.as_ref().map_or(0, |elements| elements.iter().filter(|e| e.is_file_field()).count())
    }

    pub fn is_disposed(&self) -> bool {
        self.elements.is_none()
    }
}

impl Default for MultipartFormContent {
    fn default() -> Self {
        Self::new()
    }
}

impl Content for MultipartFormContent {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Replaces the content type, as long as it still names this body's boundary.
    ///
    /// A value without `boundary=<boundary>` would make the body unparsable for
    /// the receiver, so it is ignored.
    fn set_content_type(&mut self, content_type: String) {
        if !content_type.contains(&format!("boundary={}", self.boundary)) {
            warn!(content_type = %content_type, boundary = %self.boundary, "ignored content type without the multipart boundary");
            return;
        }
        self.content_type = content_type;
    }

    fn length(&self) -> Result<u64, ContentError> {
        let elements = self.elements()?;
        let boundary_len = self.boundary.len() as u64;

        let mut length = 0;
        for element in elements {
            length += element.content.length()?;
            length += element.head_length();
            length += boundary_len + DELIMITER_OVERHEAD;
        }

        Ok(length + boundary_len + TERMINATOR_OVERHEAD)
    }

    fn write_to(&mut self, sink: &mut dyn Write) -> Result<(), ContentError> {
        let Some(elements) = self.elements.as_mut() else {
            return Err(ContentError::disposed(TYPE_NAME));
        };

        let mut head = BytesMut::with_capacity(128 + self.boundary.len());
        for element in elements.iter_mut() {
            head.clear();
            element.encode_head(&self.boundary, &mut head);
            sink.write_all(&head)?;

            element.content.write_to(sink)?;
            sink.write_all(b"\r\n")?;
        }

        head.clear();
        head.put_slice(b"--");
        head.put_slice(self.boundary.as_bytes());
        head.put_slice(b"--\r\n");
        sink.write_all(&head)?;

        trace!(fields = elements.len(), boundary = %self.boundary, "multipart content written");
        Ok(())
    }

    fn dispose(&mut self) {
        let Some(mut elements) = self.elements.take() else {
            trace!("multipart content already disposed");
            return;
        };

        for element in &mut elements {
            element.content.dispose();
        }
        debug!(fields = elements.len(), "multipart content disposed");
    }
}

impl Drop for MultipartFormContent {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Builds `BOUNDARY_PREFIX` followed by random alphanumeric chars.
///
/// Uses the thread-local generator, so concurrent callers never contend or
/// share state.
fn generate_boundary() -> String {
    let mut boundary = String::with_capacity(BOUNDARY_PREFIX.len() + BOUNDARY_RANDOM_LEN);
    boundary.push_str(BOUNDARY_PREFIX);
    boundary.extend(rand::rng().sample_iter(&Alphanumeric).take(BOUNDARY_RANDOM_LEN).map(char::from));
    boundary
}
