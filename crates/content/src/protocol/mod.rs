//! Core abstractions shared by every body variant.
//!
//! - [`Content`]: the contract for anything that can be measured and written as a body
//! - [`PayloadSize`]: the size information handed to the transport
//! - [`ContentError`]: the error type of every fallible operation in this crate
//!
//! A [`Content`] is created by a caller, measured once or more by the transport
//! (to declare `Content-Length`), written exactly once, then released.

mod content;
pub use content::Content;
#[cfg(test)]
pub use content::MockContent;

mod message;
pub use message::PayloadSize;

mod error;
pub use error::ContentError;
