//! Utility macros and the small collaborators the body variants rely on.
//!
//! - [`mime`]: MIME type lookup by file extension
//! - [`query`]: `application/x-www-form-urlencoded` serialization of key/value pairs

pub mod mime;
pub mod query;

/// A macro for early returns with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
/// Every argument check in this crate goes through it, so invalid values are
/// rejected at the call that introduces them.
///
/// # Example
///
/// ```ignore
/// ensure!(!name.is_empty(), ContentError::empty_string("name"));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
