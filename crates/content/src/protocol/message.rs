/// Represents the size information of a request payload.
///
/// The transport uses it to choose between a `Content-Length` header
/// and sending no body at all.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PayloadSize {
    /// Payload with known length in bytes
    Length(u64),
    /// Empty payload (no body)
    Empty,
}

impl PayloadSize {
    /// Maps a measured length to a payload size, zero meaning no body
    #[inline]
    pub fn from_length(length: u64) -> Self {
        if length == 0 { PayloadSize::Empty } else { PayloadSize::Length(length) }
    }

    /// Returns true if the payload is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, PayloadSize::Empty)
    }

    /// Returns the number of bytes the transport should declare
    #[inline]
    pub fn content_length(&self) -> u64 {
        match self {
            PayloadSize::Length(n) => *n,
            PayloadSize::Empty => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_length() {
        assert!(PayloadSize::from_length(0).is_empty());
        assert_eq!(PayloadSize::from_length(12), PayloadSize::Length(12));
        assert_eq!(PayloadSize::from_length(12).content_length(), 12);
        assert_eq!(PayloadSize::Empty.content_length(), 0);
    }
}
