//! `application/x-www-form-urlencoded` serialization of key/value pairs.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};
use std::borrow::Cow;

/// Bytes that stay literal in a form body: ASCII alphanumerics and `*-._`.
/// Space is handled separately and becomes `+`.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'*').remove(b'-').remove(b'.').remove(b'_');

/// Converts text into bytes before it is percent-encoded.
#[derive(Debug, Clone, Copy, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// A caller supplied encoder, e.g. for a legacy single-byte charset.
    Custom(fn(&str) -> Vec<u8>),
}

impl TextEncoding {
    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        match self {
            TextEncoding::Utf8 => Cow::Borrowed(text.as_bytes()),
            TextEncoding::Custom(encoder) => Cow::Owned(encoder(text)),
        }
    }
}

/// Serializes `pairs` as `k1=v1&k2=v2`.
///
/// Pairs with an empty key are skipped. When `dont_escape` is set the text is
/// emitted verbatim, with every non-ASCII char replaced by `?`; otherwise keys
/// and values are converted by `encoding` and form-urlencoded byte by byte.
pub fn encode_form_pairs<I, K, V>(pairs: I, dont_escape: bool, encoding: TextEncoding) -> Vec<u8>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut dst = Vec::new();

    for (key, value) in pairs {
        let (key, value) = (key.as_ref(), value.as_ref());
        if key.is_empty() {
            continue;
        }

        if !dst.is_empty() {
            dst.push(b'&');
        }

        if dont_escape {
            put_ascii(key, &mut dst);
            dst.push(b'=');
            put_ascii(value, &mut dst);
        } else {
            put_escaped(&encoding.encode(key), &mut dst);
            dst.push(b'=');
            put_escaped(&encoding.encode(value), &mut dst);
        }
    }

    dst
}

fn put_ascii(text: &str, dst: &mut Vec<u8>) {
    dst.extend(text.chars().map(|c| u8::try_from(c).ok().filter(u8::is_ascii).unwrap_or(b'?')));
}

fn put_escaped(bytes: &[u8], dst: &mut Vec<u8>) {
    for (i, part) in bytes.split(|b| *b == b' ').enumerate() {
        if i > 0 {
            dst.push(b'+');
        }
        for encoded in percent_encode(part, FORM_ENCODE_SET) {
            dst.extend_from_slice(encoded.as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(pairs: &[(&str, &str)], dont_escape: bool) -> String {
        let bytes = encode_form_pairs(pairs.iter().copied(), dont_escape, TextEncoding::default());
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_basic() {
        assert_eq!(encode(&[("a", "1"), ("b", "x y")], false), "a=1&b=x+y");
    }

    #[test]
    fn test_escape() {
        assert_eq!(encode(&[("q", "a&b=c"), ("path", "/tmp/~x")], false), "q=a%26b%3Dc&path=%2Ftmp%2F%7Ex");
        assert_eq!(encode(&[("keep", "*-._")], false), "keep=*-._");
        assert_eq!(encode(&[("name", "héllo")], false), "name=h%C3%A9llo");
    }

    #[test]
    fn test_dont_escape() {
        assert_eq!(encode(&[("q", "a b&c"), ("n", "é")], true), "q=a b&c&n=?");
    }

    #[test]
    fn test_skip_empty_key() {
        assert_eq!(encode(&[("", "lost"), ("a", ""), ("b", "2")], false), "a=&b=2");
        assert_eq!(encode(&[], false), "");
    }

    #[test]
    fn test_custom_encoding() {
        fn latin1(text: &str) -> Vec<u8> {
            text.chars().map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?')).collect()
        }

        let bytes = encode_form_pairs([("name", "héllo")], false, TextEncoding::Custom(latin1));
        assert_eq!(bytes, b"name=h%E9llo");
    }
}
