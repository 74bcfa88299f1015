use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::weather::WeatherSnapshot;

/// The moods the client offers. Entries keep their label as a plain string
/// so files containing other labels still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Happy,
    Sad,
    Neutral,
    Energetic,
    Calm,
    Stressed,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Neutral,
        Mood::Energetic,
        Mood::Calm,
        Mood::Stressed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Neutral => "neutral",
            Self::Energetic => "energetic",
            Self::Calm => "calm",
            Self::Stressed => "stressed",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Happy | Self::Energetic | Self::Calm)
    }

    /// Positive-mood check for a stored label. Unknown labels are not positive.
    pub fn label_is_positive(label: &str) -> bool {
        label.parse::<Mood>().map(|m| m.is_positive()).unwrap_or(false)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl FromStr for Mood {
    type Err = UnknownMood;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or(UnknownMood(normalized))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoodEntry {
    /// Milliseconds since the epoch at creation, as decimal digits.
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub mood: String,
    #[serde(default)]
    pub notes: String,
    pub weather: WeatherSnapshot,
}

impl MoodEntry {
    fn numeric_id(&self) -> Option<i64> {
        self.id.parse().ok()
    }
}

/// Everything the store persists. The on-disk shape is `{"entries": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoodCollection {
    #[serde(default)]
    pub entries: Vec<MoodEntry>,
}

impl MoodCollection {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Id for an entry created at `now`: its epoch milliseconds, bumped past
    /// the largest stored id so ids stay strictly increasing. `None` once the
    /// largest stored id is `i64::MAX`.
    pub fn next_id(&self, now: DateTime<Utc>) -> Option<String> {
        let millis = now.timestamp_millis();
        let next = match self.entries.iter().filter_map(MoodEntry::numeric_id).max() {
            Some(last) if last >= millis => last.checked_add(1)?,
            _ => millis,
        };
        Some(next.to_string())
    }

    pub fn into_newest_first(mut self) -> Vec<MoodEntry> {
        sort_newest_first(&mut self.entries);
        self.entries
    }
}

/// Timestamp descending. Equal timestamps put the larger id first; the sort
/// is stable for anything left over.
pub fn sort_newest_first(entries: &mut [MoodEntry]) {
    entries.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.numeric_id().cmp(&a.numeric_id()))
    });
}
