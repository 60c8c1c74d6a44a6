//! Common types used throughout Depot.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// How stored content is handed back by `read`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReadMode {
    /// Decode the stored bytes as UTF-8.
    #[default]
    Text,
    /// Return the stored bytes untouched.
    Binary,
}

impl FromStr for ReadMode {
    type Err = Error;

    /// Parse an open-mode string such as `"r"`, `"rt"` or `"rb"`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "r" | "rt" => Ok(ReadMode::Text),
            "rb" => Ok(ReadMode::Binary),
            other => Err(Error::InvalidInput(format!("Invalid read mode '{}'", other))),
        }
    }
}

impl fmt::Display for ReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadMode::Text => write!(f, "r"),
            ReadMode::Binary => write!(f, "rb"),
        }
    }
}

/// Creation semantics for `write`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WriteMode {
    /// Fail if the object already exists.
    #[default]
    CreateNew,
    /// Replace any existing object.
    Overwrite,
    /// Append to an existing object, creating it if absent.
    Append,
}

impl FromStr for WriteMode {
    type Err = Error;

    /// Parse an open-mode string: `x`, `w` or `a`, optionally followed by
    /// `b` or `t`. Whether content is binary travels with [`Content`].
    fn from_str(s: &str) -> Result<Self> {
        let base = s
            .strip_suffix('b')
            .or_else(|| s.strip_suffix('t'))
            .unwrap_or(s);
        match base {
            "x" => Ok(WriteMode::CreateNew),
            "w" => Ok(WriteMode::Overwrite),
            "a" => Ok(WriteMode::Append),
            _ => Err(Error::InvalidInput(format!("Invalid write mode '{}'", s))),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::CreateNew => write!(f, "x"),
            WriteMode::Overwrite => write!(f, "w"),
            WriteMode::Append => write!(f, "a"),
        }
    }
}

/// Content read from or written to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Binary(Vec<u8>),
}

impl Content {
    /// Decode raw bytes according to the read mode.
    ///
    /// # Errors
    /// - Text mode and the bytes are not valid UTF-8
    pub fn from_bytes(data: Vec<u8>, mode: ReadMode) -> Result<Self> {
        match mode {
            ReadMode::Binary => Ok(Content::Binary(data)),
            ReadMode::Text => String::from_utf8(data)
                .map(Content::Text)
                .map_err(|e| Error::InvalidInput(format!("Content is not valid UTF-8: {}", e))),
        }
    }

    /// Borrow the content as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Content::Text(text) => text.as_bytes(),
            Content::Binary(data) => data,
        }
    }

    /// Consume the content into bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Content::Text(text) => text.into_bytes(),
            Content::Binary(data) => data,
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this is binary content.
    pub fn is_binary(&self) -> bool {
        matches!(self, Content::Binary(_))
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Content {
    fn from(data: Vec<u8>) -> Self {
        Content::Binary(data)
    }
}

impl From<&[u8]> for Content {
    fn from(data: &[u8]) -> Self {
        Content::Binary(data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_read_mode_parse() {
        assert_eq!("r".parse::<ReadMode>().unwrap(), ReadMode::Text);
        assert_eq!("rt".parse::<ReadMode>().unwrap(), ReadMode::Text);
        assert_eq!("rb".parse::<ReadMode>().unwrap(), ReadMode::Binary);
        assert!("w".parse::<ReadMode>().is_err());
    }

    #[test]
    fn test_write_mode_parse() {
        assert_eq!("x".parse::<WriteMode>().unwrap(), WriteMode::CreateNew);
        assert_eq!("xb".parse::<WriteMode>().unwrap(), WriteMode::CreateNew);
        assert_eq!("w".parse::<WriteMode>().unwrap(), WriteMode::Overwrite);
        assert_eq!("at".parse::<WriteMode>().unwrap(), WriteMode::Append);
        assert!("r".parse::<WriteMode>().is_err());
        assert!("".parse::<WriteMode>().is_err());
        assert!("xbb".parse::<WriteMode>().is_err());
    }

    #[test]
    fn test_text_decoding_rejects_invalid_utf8() {
        let result = Content::from_bytes(vec![0xff, 0xfe], ReadMode::Text);
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let content = Content::from_bytes(vec![0xff, 0xfe], ReadMode::Binary).unwrap();
        assert_eq!(content, Content::Binary(vec![0xff, 0xfe]));
    }

    #[test]
    fn test_len_counts_bytes_not_chars() {
        let content = Content::from("héllo");
        assert_eq!(content.len(), 6);
        assert!(!content.is_binary());
    }

    proptest! {
        #[test]
        fn prop_text_decodes_to_itself(text in ".*") {
            let content = Content::from_bytes(text.clone().into_bytes(), ReadMode::Text).unwrap();
            prop_assert_eq!(content, Content::Text(text));
        }
    }
}
