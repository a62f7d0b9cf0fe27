use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Formatting instruction kinds understood by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SpanKind {
    Header,
    Bold,
    Italic,
}

/// A `(type, location, length)` triple over a note's content.
///
/// Offsets and lengths are UTF-16 code units. They are signed so that stored
/// ranges with negative values still deserialize; such spans never pass
/// [`FormattingSpan::is_valid_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormattingSpan {
    #[serde(rename = "type")]
    pub kind: SpanKind,
    pub location: i64,
    pub length: i64,
}

impl FormattingSpan {
    pub fn new(kind: SpanKind, location: usize, length: usize) -> Self {
        Self {
            kind,
            location: location as i64,
            length: length as i64,
        }
    }

    /// End offset (exclusive), or `None` when the range is negative or overflows.
    pub fn end(&self) -> Option<i64> {
        if self.location < 0 || self.length < 0 {
            return None;
        }
        self.location.checked_add(self.length)
    }

    pub fn is_valid_for(&self, content: &str) -> bool {
        self.is_valid_for_len(utf16_len(content))
    }

    pub fn is_valid_for_len(&self, content_len: usize) -> bool {
        match self.end() {
            Some(end) => end <= content_len as i64,
            None => false,
        }
    }
}

/// Length of `content` in UTF-16 code units, the offset unit used by spans.
pub fn utf16_len(content: &str) -> usize {
    content.chars().map(char::len_utf16).sum()
}
