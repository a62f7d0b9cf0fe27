pub mod analytics;
pub mod cli;
pub mod codec;
pub mod config;
pub mod model;

pub use analytics::{
    current_streak, longest_streak, start_of_week, weekly_counts, AnalyticsOptions, WeekBucket,
    WeekStart,
};
pub use codec::{decode, encode, StyledRun, StyledText, TextStyle};
pub use config::{AppConfig, ConfigLoader, ConfigPaths};
pub use model::{EmotionValues, FormattingSpan, Note, SpanKind};
