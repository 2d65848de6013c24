//! Session charset codec
//!
//! The remote service predates Unicode; sessions start under the legacy
//! double-byte Big5 encoding and may switch once to UTF-8 during the
//! pre-login banner (the switch decision itself lives in the session
//! engine; this module only encodes and decodes).

use std::str::FromStr;

use crate::error::TransportError;

/// Supported session charsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// Byte-compatible modern encoding
    Utf8,
    /// Legacy double-byte encoding; the default active charset
    Big5,
}

impl Charset {
    /// Decode inbound bytes to text; undecodable sequences become
    /// replacement characters rather than errors
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::Big5 => {
                let (text, _, _) = encoding_rs::BIG5.decode(bytes);
                text.into_owned()
            }
        }
    }

    /// Encode outbound text to bytes under this charset
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Charset::Utf8 => text.as_bytes().to_vec(),
            Charset::Big5 => {
                let (bytes, _, _) = encoding_rs::BIG5.encode(text);
                bytes.into_owned()
            }
        }
    }
}

impl FromStr for Charset {
    type Err = TransportError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label.to_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Charset::Utf8),
            "big5" => Ok(Charset::Big5),
            other => Err(TransportError::UnsupportedCharset(other.to_string())),
        }
    }
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Charset::Utf8 => write!(f, "utf8"),
            Charset::Big5 => write!(f, "big5"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!("utf8".parse::<Charset>().unwrap(), Charset::Utf8);
        assert_eq!("UTF-8".parse::<Charset>().unwrap(), Charset::Utf8);
        assert_eq!("big5".parse::<Charset>().unwrap(), Charset::Big5);
        assert!(matches!(
            "latin1".parse::<Charset>(),
            Err(TransportError::UnsupportedCharset(_))
        ));
    }

    #[test]
    fn test_utf8_round_trip_identity() {
        for text in ["hello", "登入中，請稍候...", "mixed 看板 text"] {
            let bytes = Charset::Utf8.encode(text);
            assert_eq!(Charset::Utf8.decode(&bytes), text);
        }
    }

    #[test]
    fn test_big5_round_trip_identity() {
        // representable in Big5: common CJK plus ASCII
        for text in ["hello", "看板列表", "密碼不對或無此帳號"] {
            let bytes = Charset::Big5.encode(text);
            assert_eq!(Charset::Big5.decode(&bytes), text);
        }
    }

    #[test]
    fn test_big5_is_double_byte() {
        let bytes = Charset::Big5.encode("看");
        assert_eq!(bytes.len(), 2);
    }

    #[test]
    fn test_big5_bytes_differ_from_utf8() {
        let text = "看板";
        assert_ne!(Charset::Big5.encode(text), Charset::Utf8.encode(text));
    }
}
