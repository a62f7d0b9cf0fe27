use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Emotion {
    Anger,
    Disgust,
    Fear,
    Joy,
    Neutral,
    Sadness,
    Surprise,
}

/// Server-computed emotion scores for a note, each in `[0, 1]`.
///
/// A note that has not been scored yet carries all zeros. Input that omits
/// the scores entirely defaults to fully neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionValues {
    pub anger: f64,
    pub disgust: f64,
    pub fear: f64,
    pub joy: f64,
    pub neutral: f64,
    pub sadness: f64,
    pub surprise: f64,
}

impl Default for EmotionValues {
    fn default() -> Self {
        Self {
            neutral: 1.0,
            ..Self::pending()
        }
    }
}

impl EmotionValues {
    pub const fn pending() -> Self {
        Self {
            anger: 0.0,
            disgust: 0.0,
            fear: 0.0,
            joy: 0.0,
            neutral: 0.0,
            sadness: 0.0,
            surprise: 0.0,
        }
    }

    pub fn get(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Anger => self.anger,
            Emotion::Disgust => self.disgust,
            Emotion::Fear => self.fear,
            Emotion::Joy => self.joy,
            Emotion::Neutral => self.neutral,
            Emotion::Sadness => self.sadness,
            Emotion::Surprise => self.surprise,
        }
    }

    fn get_mut(&mut self, emotion: Emotion) -> &mut f64 {
        match emotion {
            Emotion::Anger => &mut self.anger,
            Emotion::Disgust => &mut self.disgust,
            Emotion::Fear => &mut self.fear,
            Emotion::Joy => &mut self.joy,
            Emotion::Neutral => &mut self.neutral,
            Emotion::Sadness => &mut self.sadness,
            Emotion::Surprise => &mut self.surprise,
        }
    }

    pub fn is_pending(&self) -> bool {
        Emotion::iter().all(|emotion| self.get(emotion) == 0.0)
    }

    /// Highest-scoring emotion; ties go to the earlier variant.
    pub fn dominant(&self) -> Option<Emotion> {
        if self.is_pending() {
            return None;
        }
        let mut best: Option<(Emotion, f64)> = None;
        for emotion in Emotion::iter() {
            let value = self.get(emotion);
            match best {
                Some((_, current)) if value <= current => {}
                _ => best = Some((emotion, value)),
            }
        }
        best.map(|(emotion, _)| emotion)
    }

    pub fn clamped(mut self) -> Self {
        for emotion in Emotion::iter() {
            let value = self.get_mut(emotion);
            *value = if value.is_nan() {
                0.0
            } else {
                value.clamp(0.0, 1.0)
            };
        }
        self
    }
}
