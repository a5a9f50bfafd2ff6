//! The body variants.
//!
//! - [`ByteBufferContent`]: a window over an in-memory buffer
//! - [`StreamContent`]: any seekable stream, copied through a buffer
//! - [`FileStreamContent`]: a file streamed from disk, typed by its extension
//! - [`UrlEncodedFormContent`]: key/value pairs encoded as a form body
//! - [`MultipartFormContent`]: named fields of any of the above, nested containers included

mod buffer;
pub use buffer::ByteBufferContent;

mod stream;
pub use stream::DEFAULT_BUFFER_SIZE;
pub use stream::StreamContent;

mod file;
pub use file::FileStreamContent;

mod form;
pub use form::FormOptions;
pub use form::UrlEncodedFormContent;

pub mod multipart;
pub use multipart::MultipartFormContent;
