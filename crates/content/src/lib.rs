//! Measurable request bodies for HTTP clients
//!
//! This crate turns heterogeneous body sources (raw bytes, file streams, form
//! parameters and composite multipart sections) into a byte stream, and predicts
//! the exact number of bytes that stream will contain without writing any of them.
//! The transport can therefore declare `Content-Length` before sending the body.
//!
//! # Features
//!
//! - In-memory buffers backed by [`bytes::Bytes`]
//! - Files and other seekable streams, copied through a bounded buffer
//! - `application/x-www-form-urlencoded` forms, from pairs or any `serde::Serialize`
//! - `multipart/form-data` bodies with recursive nesting
//! - An [`http_body::Body`] adapter with an exact size hint
//!
//! # Example
//!
//! ```
//! use micro_content::content::{ByteBufferContent, MultipartFormContent, UrlEncodedFormContent};
//! use micro_content::protocol::{Content, ContentError};
//!
//! let mut form = MultipartFormContent::with_boundary("B")?;
//! form.add(ByteBufferContent::from("v"), "k")?;
//! form.add_file(ByteBufferContent::from("hi"), "f", "a.txt")?;
//! form.add(UrlEncodedFormContent::new([("a", "1"), ("b", "x y")]), "query")?;
//!
//! let length = form.length()?;
//!
//! let mut sink = Vec::new();
//! form.write_to(&mut sink)?;
//! assert_eq!(length, sink.len() as u64);
//! assert!(sink.ends_with(b"\r\n--B--\r\n"));
//! # Ok::<(), ContentError>(())
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: the [`protocol::Content`] contract, payload sizes and errors
//! - [`content`]: the body variants
//! - [`body`]: the hand-over to an HTTP transport
//! - [`utils`]: MIME lookup and form encoding used by the variants
//!
//! # Lifecycle
//!
//! A content is created by the caller, measured by the transport, written once
//! and then released. Contents holding a resource (a file handle, nested fields)
//! release it on [`protocol::Content::dispose`] or when dropped. Everything is
//! synchronous and runs on the calling thread.

pub mod body;
pub mod content;
pub mod protocol;
pub mod utils;

pub(crate) use utils::ensure;
