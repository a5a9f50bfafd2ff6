use crate::content::ByteBufferContent;
use crate::protocol::{Content, ContentError};
use crate::utils::query::{TextEncoding, encode_form_pairs};
use serde::Serialize;
use std::io::Write;

/// Options controlling how form pairs are serialized.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormOptions {
    /// Emit keys and values verbatim instead of form-urlencoding them.
    pub dont_escape: bool,
    /// Converts text to bytes before escaping, UTF-8 by default.
    pub encoding: TextEncoding,
}

/// A body of `application/x-www-form-urlencoded` key/value pairs.
///
/// The pairs are serialized once on construction; afterwards this behaves as a
/// [`ByteBufferContent`] covering the whole encoded buffer.
#[derive(Debug, Clone)]
pub struct UrlEncodedFormContent {
    inner: ByteBufferContent,
}

impl UrlEncodedFormContent {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::with_options(pairs, FormOptions::default())
    }

    pub fn with_options<I, K, V>(pairs: I, options: FormOptions) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let encoded = encode_form_pairs(pairs, options.dont_escape, options.encoding);
        Self::from_encoded(encoded)
    }

    /// Serializes a typed form through `serde_urlencoded`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidArgument`] if `form` can not be represented
    /// as flat key/value pairs.
    pub fn from_serialize<T: Serialize + ?Sized>(form: &T) -> Result<Self, ContentError> {
        let encoded = serde_urlencoded::to_string(form).map_err(|e| ContentError::invalid_argument("form", e))?;
        Ok(Self::from_encoded(encoded.into_bytes()))
    }

    fn from_encoded(encoded: Vec<u8>) -> Self {
        let mut inner = ByteBufferContent::new(encoded);
        inner.set_content_type(mime::APPLICATION_WWW_FORM_URLENCODED.to_string());
        Self { inner }
    }

    /// The encoded body.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    pub fn into_inner(self) -> ByteBufferContent {
        self.inner
    }
}

impl Content for UrlEncodedFormContent {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs() {
        let mut content = UrlEncodedFormContent::new([("a", "1"), ("b", "x y")]);
        assert_eq!(content.content_type(), "application/x-www-form-urlencoded");
        assert_eq!(content.length().unwrap(), 9);

        let mut sink = Vec::new();
        content.write_to(&mut sink).unwrap();
        assert_eq!(sink, b"a=1&b=x+y");
    }

    #[test]
    fn test_owned_pairs() {
        let pairs = vec![("user".to_string(), "zava kid".to_string()), ("lang".to_string(), "rust".to_string())];
        let content = UrlEncodedFormContent::new(pairs);
        assert_eq!(content.as_bytes(), b"user=zava+kid&lang=rust");
    }

    #[test]
    fn test_dont_escape() {
        let options = FormOptions { dont_escape: true, ..FormOptions::default() };
        let content = UrlEncodedFormContent::with_options([("q", "a b")], options);
        assert_eq!(content.as_bytes(), b"q=a b");
    }

    #[test]
    fn test_empty() {
        let content = UrlEncodedFormContent::new(Vec::<(&str, &str)>::new());
        assert_eq!(content.length().unwrap(), 0);
        assert!(content.as_bytes().is_empty());
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Login<'a> {
            user: &'a str,
            remember: bool,
        }

        let content = UrlEncodedFormContent::from_serialize(&Login { user: "a b", remember: true }).unwrap();
        assert_eq!(content.as_bytes(), b"user=a+b&remember=true");
        assert_eq!(content.length().unwrap(), content.as_bytes().len() as u64);
    }

    #[test]
    fn test_from_serialize_rejects_nested() {
        #[derive(Serialize)]
        struct Outer {
            inner: Vec<u8>,
        }

        let err = UrlEncodedFormContent::from_serialize(&Outer { inner: vec![1] }).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
