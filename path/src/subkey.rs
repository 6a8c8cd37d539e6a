use std::fmt;

use crate::PathError;

/// Characters that pass through percent-encoding unescaped: ASCII
/// alphanumerics plus the URL-host set `! $ & ' ( ) * + , - . : ; = [ ] _
/// ~`.
fn is_unescaped(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'!' | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b'-'
                | b'.'
                | b':'
                | b';'
                | b'='
                | b'['
                | b']'
                | b'_'
                | b'~'
        )
}

/// Percent-encode arbitrary bytes into an ASCII-safe segment string.
fn percent_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        if is_unescaped(byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push_str(&hex::encode_upper([byte]));
        }
    }
    out
}

/// Decode a percent-encoded segment. Returns `None` on malformed escapes
/// or characters that may not appear unescaped.
fn percent_decode(segment: &str) -> Option<Vec<u8>> {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut pos = 0;
    while pos < bytes.len() {
        match bytes[pos] {
            b'%' => {
                let digits = bytes.get(pos + 1..pos + 3)?;
                let byte = hex::decode(digits).ok()?;
                out.extend_from_slice(&byte);
                pos += 3;
            }
            byte if is_unescaped(byte) => {
                out.push(byte);
                pos += 1;
            }
            _ => return None,
        }
    }
    Some(out)
}

/// One segment of a [`KeyPath`](crate::KeyPath).
///
/// Equality compares decoded bytes, so the url and hex spellings of the
/// same key are equal and hex digit case is irrelevant.
#[derive(Debug, Clone)]
pub enum SubKey {
    /// Reserved sentinel; never produced by parsing.
    Empty,
    /// Percent-encoded segment. The encoded form is stored.
    Url(String),
    /// Raw-byte segment, rendered as `x:` followed by uppercase hex.
    Hex(Vec<u8>),
}

impl SubKey {
    /// Build a URL-encoded segment from a string. Returns `None` for the
    /// empty string.
    pub fn url(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }
        Some(SubKey::Url(percent_encode(s.as_bytes())))
    }

    /// Build a hex segment from raw bytes. Returns `None` for empty input.
    pub fn hex(bytes: impl Into<Vec<u8>>) -> Option<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            None
        } else {
            Some(SubKey::Hex(bytes))
        }
    }

    /// Build a hex segment from a hex string, upper- or lower-case.
    /// Returns `None` for empty or invalid input.
    pub fn from_hex(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }
        hex::decode(s).ok().map(SubKey::Hex)
    }

    /// Parse one rendered path segment: `x:`-prefixed segments decode as
    /// hex, everything else must already be a legal percent-encoded form.
    pub(crate) fn parse_segment(segment: &str) -> Result<Self, PathError> {
        if segment.is_empty() {
            return Err(PathError::EmptySegment);
        }
        if let Some(digits) = segment.strip_prefix("x:") {
            return SubKey::from_hex(digits)
                .ok_or_else(|| PathError::UnknownEncoding(segment.to_string()));
        }
        match percent_decode(segment) {
            Some(_) => Ok(SubKey::Url(segment.to_string())),
            None => Err(PathError::UnknownEncoding(segment.to_string())),
        }
    }

    /// The decoded bytes of this segment.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            SubKey::Empty => Vec::new(),
            // Url values are produced by `percent_encode` or validated at
            // parse time, so decoding cannot fail here.
            SubKey::Url(s) => percent_decode(s).unwrap_or_default(),
            SubKey::Hex(bytes) => bytes.clone(),
        }
    }

    /// The rendered path segment: the percent-encoded form, or `x:`
    /// followed by uppercase hex.
    pub fn segment(&self) -> String {
        match self {
            SubKey::Empty => String::new(),
            SubKey::Url(s) => s.clone(),
            SubKey::Hex(bytes) => format!("x:{}", hex::encode_upper(bytes)),
        }
    }
}

impl PartialEq for SubKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for SubKey {}

impl fmt::Display for SubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubKey::Empty => f.write_str("<empty>"),
            SubKey::Url(_) => f.write_str(&String::from_utf8_lossy(&self.to_bytes())),
            SubKey::Hex(bytes) => f.write_str(&hex::encode_upper(bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encoding_escapes_non_host_characters() {
        let key = SubKey::url("hello world/100%").expect("non-empty");
        assert_eq!(key.segment(), "hello%20world%2F100%25");
        assert_eq!(key.to_bytes(), b"hello world/100%");
    }

    #[test]
    fn test_url_and_hex_spellings_are_equal() {
        let url = SubKey::url("App").expect("non-empty");
        let hex = SubKey::hex(b"App".to_vec()).expect("non-empty");
        assert_eq!(url, hex);
    }

    #[test]
    fn test_hex_digit_case_is_irrelevant() {
        let upper = SubKey::from_hex("ABCD").expect("valid hex");
        let lower = SubKey::from_hex("abcd").expect("valid hex");
        assert_eq!(upper, lower);
        assert_eq!(upper.segment(), "x:ABCD");
        assert_eq!(lower.segment(), "x:ABCD");
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        assert!(SubKey::url("").is_none());
        assert!(SubKey::hex(Vec::new()).is_none());
        assert!(SubKey::from_hex("").is_none());
    }

    #[test]
    fn test_parse_segment_rejects_bad_hex() {
        assert_eq!(
            SubKey::parse_segment("x:tyh"),
            Err(PathError::UnknownEncoding("x:tyh".to_string()))
        );
        // Odd number of digits is not valid hex either.
        assert_eq!(
            SubKey::parse_segment("x:abc"),
            Err(PathError::UnknownEncoding("x:abc".to_string()))
        );
    }

    #[test]
    fn test_parse_segment_rejects_malformed_escapes() {
        assert!(SubKey::parse_segment("a%2").is_err());
        assert!(SubKey::parse_segment("a%zz").is_err());
        assert!(SubKey::parse_segment("a b").is_err());
    }

    #[test]
    fn test_parse_segment_accepts_escaped_forms() {
        let key = SubKey::parse_segment("hello%20world").expect("legal form");
        assert_eq!(key.to_bytes(), b"hello world");
        // Escape digit case does not change the decoded bytes.
        let lower = SubKey::parse_segment("hello%2fworld").expect("legal form");
        assert_eq!(lower.to_bytes(), b"hello/world");
    }
}
