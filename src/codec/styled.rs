use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::utf16_len;

pub const BODY_SIZE_PT: f64 = 17.0;
pub const HEADER_SIZE_PT: f64 = 24.0;

/// Style of one run. The descriptor is replaced as a whole when a span is
/// applied; individual attributes are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub size_pt: f64,
}

impl TextStyle {
    pub const BODY: Self = Self {
        bold: false,
        italic: false,
        size_pt: BODY_SIZE_PT,
    };
    pub const HEADER: Self = Self {
        bold: true,
        italic: false,
        size_pt: HEADER_SIZE_PT,
    };
    pub const BOLD: Self = Self {
        bold: true,
        italic: false,
        size_pt: BODY_SIZE_PT,
    };
    pub const ITALIC: Self = Self {
        bold: false,
        italic: true,
        size_pt: BODY_SIZE_PT,
    };

    pub fn is_header(&self) -> bool {
        self.size_pt >= HEADER_SIZE_PT
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::BODY
    }
}

/// A contiguous range of UTF-16 code units sharing one style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledRun {
    pub start: usize,
    pub length: usize,
    pub style: TextStyle,
}

impl StyledRun {
    pub fn new(start: usize, length: usize, style: TextStyle) -> Self {
        Self {
            start,
            length,
            style,
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyledTextError {
    #[error("run starting at {found} does not continue from offset {expected}")]
    Discontiguous { expected: usize, found: usize },
    #[error("runs cover {covered} code units but content has {content_len}")]
    LengthMismatch { covered: usize, content_len: usize },
    #[error("run starting at {start} with length {length} runs past the largest offset")]
    Overflow { start: usize, length: usize },
}

/// Adjacent runs never share a style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStyledText")]
pub struct StyledText {
    content: String,
    runs: Vec<StyledRun>,
    #[serde(skip_serializing)]
    len: usize,
}

#[derive(Deserialize)]
struct RawStyledText {
    content: String,
    #[serde(default)]
    runs: Vec<StyledRun>,
}

impl TryFrom<RawStyledText> for StyledText {
    type Error = StyledTextError;

    fn try_from(raw: RawStyledText) -> Result<Self, Self::Error> {
        StyledText::from_runs(raw.content, raw.runs)
    }
}

impl StyledText {
    pub fn plain(content: impl Into<String>) -> Self {
        let content = content.into();
        let len = utf16_len(&content);
        let runs = if len == 0 {
            Vec::new()
        } else {
            vec![StyledRun::new(0, len, TextStyle::BODY)]
        };
        Self { content, runs, len }
    }

    /// Builds styled text from editor runs, which must tile the content in
    /// order. Zero-length runs are ignored.
    pub fn from_runs(
        content: impl Into<String>,
        runs: Vec<StyledRun>,
    ) -> Result<Self, StyledTextError> {
        let content = content.into();
        let len = utf16_len(&content);
        let mut expected = 0usize;
        let mut kept = Vec::with_capacity(runs.len());
        for run in runs {
            if run.length == 0 {
                continue;
            }
            if run.start != expected {
                return Err(StyledTextError::Discontiguous {
                    expected,
                    found: run.start,
                });
            }
            expected = run
                .start
                .checked_add(run.length)
                .ok_or(StyledTextError::Overflow {
                    start: run.start,
                    length: run.length,
                })?;
            kept.push(run);
        }
        if expected != len {
            return Err(StyledTextError::LengthMismatch {
                covered: expected,
                content_len: len,
            });
        }
        let mut styled = Self {
            content,
            runs: kept,
            len,
        };
        styled.coalesce();
        Ok(styled)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn len_utf16(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn style_at(&self, offset: usize) -> Option<TextStyle> {
        let idx = self
            .runs
            .partition_point(|run| run.end() <= offset);
        self.runs
            .get(idx)
            .filter(|run| run.start <= offset)
            .map(|run| run.style)
    }

    /// Text covered by `run`. A run boundary that splits a surrogate pair
    /// yields a replacement character.
    pub fn run_text(&self, run: &StyledRun) -> String {
        let units: Vec<u16> = self
            .content
            .encode_utf16()
            .skip(run.start)
            .take(run.length)
            .collect();
        String::from_utf16_lossy(&units)
    }

    /// Replaces the style over `[start, start + length)`. Ranges that are
    /// empty or run past the end are ignored.
    pub fn apply_style(&mut self, start: usize, length: usize, style: TextStyle) {
        let Some(end) = start.checked_add(length) else {
            return;
        };
        if length == 0 || end > self.len {
            return;
        }
        let replacement = StyledRun::new(start, length, style);
        let mut next = Vec::with_capacity(self.runs.len() + 2);
        let mut inserted = false;
        for run in &self.runs {
            if run.end() <= start {
                next.push(*run);
                continue;
            }
            if run.start >= end {
                if !inserted {
                    next.push(replacement);
                    inserted = true;
                }
                next.push(*run);
                continue;
            }
            if run.start < start {
                next.push(StyledRun::new(run.start, start - run.start, run.style));
            }
            if run.end() > end {
                if !inserted {
                    next.push(replacement);
                    inserted = true;
                }
                next.push(StyledRun::new(end, run.end() - end, run.style));
            }
        }
        if !inserted {
            next.push(replacement);
        }
        self.runs = next;
        self.coalesce();
    }

    fn coalesce(&mut self) {
        let mut merged: Vec<StyledRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.style == run.style && prev.end() == run.start => {
                    prev.length += run.length;
                }
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}
