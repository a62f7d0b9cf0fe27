use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

mod emotion;
mod span;

pub use emotion::{Emotion, EmotionValues};
pub use span::{utf16_len, FormattingSpan, SpanKind};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed note json: {0}")]
    Json(#[from] serde_json::Error),
}

/// A journal entry as served by the notes store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub formattings: Vec<FormattingSpan>,
    #[serde(with = "time::serde::timestamp")]
    pub timestamp: OffsetDateTime,
    #[serde(default)]
    pub emotion_values: EmotionValues,
}

impl Note {
    /// Fresh note from the editor: no formatting yet and neutral emotion
    /// scores until the server reports back.
    pub fn new(content: impl Into<String>, timestamp: OffsetDateTime) -> Self {
        Self {
            id: None,
            user_id: None,
            content: content.into(),
            formattings: Vec::new(),
            timestamp,
            emotion_values: EmotionValues::default(),
        }
    }

    pub fn with_formattings(mut self, formattings: Vec<FormattingSpan>) -> Self {
        self.formattings = formattings;
        self
    }

    pub fn with_emotions(mut self, values: EmotionValues) -> Self {
        self.emotion_values = values.clamped();
        self
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let mut note: Note = serde_json::from_str(raw)?;
        note.emotion_values = note.emotion_values.clamped();
        Ok(note)
    }

    pub fn is_pending(&self) -> bool {
        self.emotion_values.is_pending()
    }

    /// Spans that can be applied to the current content.
    pub fn valid_formattings(&self) -> impl Iterator<Item = &FormattingSpan> {
        let len = utf16_len(&self.content);
        self.formattings
            .iter()
            .filter(move |span| span.is_valid_for_len(len))
    }
}

/// Parses a JSON array of notes.
pub fn notes_from_json(raw: &str) -> Result<Vec<Note>, ModelError> {
    let mut notes: Vec<Note> = serde_json::from_str(raw)?;
    for note in &mut notes {
        note.emotion_values = note.emotion_values.clamped();
    }
    Ok(notes)
}
