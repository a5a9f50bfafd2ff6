use crate::content::stream::{DEFAULT_BUFFER_SIZE, StreamContent};
use crate::ensure;
use crate::protocol::{Content, ContentError};
use crate::utils::mime::mime_type_for_path;
use std::fs::File;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A body streamed from a file, never loaded into memory as a whole.
///
/// The file is opened for reading on construction and its content type is
/// resolved once from the file extension.
#[derive(Debug)]
pub struct FileStreamContent {
    path: PathBuf,
    inner: StreamContent<File>,
}

impl FileStreamContent {
    /// Opens `path` using [`DEFAULT_BUFFER_SIZE`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        Self::open_with_buffer_size(path, DEFAULT_BUFFER_SIZE)
    }

    /// Opens `path`, copying it through a buffer of `buffer_size` bytes.
    ///
    /// # Errors
    ///
    /// - [`ContentError::InvalidArgument`] if `path` is empty or `buffer_size` is zero
    /// - [`ContentError::Io`] with the filesystem error (not found, permission
    ///   denied, name too long, ...) if the file can not be opened, or
    ///   `IsADirectory` if `path` names a directory
    pub fn open_with_buffer_size<P: AsRef<Path>>(path: P, buffer_size: usize) -> Result<Self, ContentError> {
        let path = path.as_ref();
        ensure!(!path.as_os_str().is_empty(), ContentError::empty_string("path"));
        ensure!(buffer_size >= 1, ContentError::can_not_be_less("buffer_size", 1));

        let file = File::open(path)?;
        ensure!(!file.metadata()?.is_dir(), ContentError::io(io::Error::from(ErrorKind::IsADirectory)));

        let mut inner = StreamContent::with_buffer_size(file, buffer_size)?;
        inner.set_content_type(mime_type_for_path(path));
        debug!(path = %path.display(), content_type = inner.content_type(), "file content opened");

        Ok(Self { path: path.to_path_buf(), inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn buffer_size(&self) -> usize {
        self.inner.buffer_size()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

impl Content for FileStreamContent {
    fn content_type(&self) -> &str {
        self.inner.content_type()
    }

    fn set_content_type(&mut self, content_type: String) {
        self.inner.set_content_type(content_type);
    }

    fn length(&self) -> Result<u64, ContentError> {
        self.inner.length()
    }

    fn write_to(&mut self, sink: &mut dyn Write) -> Result<(), ContentError> {
        self.inner.write_to(sink)
    }

    fn dispose(&mut self) {
        self.inner.dispose();
    }
}
