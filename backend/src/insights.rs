//! Aggregate observations over the full mood history.
//!
//! Entries are walked newest first regardless of the order they are passed
//! in. "First encountered" below always means first in that order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::mood::{sort_newest_first, Mood, MoodEntry};

pub const MAX_INSIGHTS: usize = 5;
const MIN_ENTRIES_PER_CONDITION: usize = 2;
const TREND_WINDOW: usize = 3;

pub const EMPTY_HISTORY_INSIGHT: &str = "Start logging your moods to see insights!";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub total_entries: usize,
    pub mood_counts: BTreeMap<String, usize>,
    pub insights: Vec<String>,
}

pub fn compute_insights(entries: &[MoodEntry]) -> Insights {
    if entries.is_empty() {
        return Insights {
            total_entries: 0,
            mood_counts: BTreeMap::new(),
            insights: vec![EMPTY_HISTORY_INSIGHT.to_string()],
        };
    }

    let mut ordered = entries.to_vec();
    sort_newest_first(&mut ordered);

    let tally = tally_moods(&ordered);
    let by_condition = group_by_condition(&ordered);

    let mut insights = Vec::new();

    if let Some((mood, count)) = tally.most_common() {
        insights.push(format!(
            "Your most common mood is \"{}\" ({} {})",
            mood,
            count,
            if count == 1 { "time" } else { "times" }
        ));
    }

    for (condition, moods) in &by_condition {
        if moods.len() < MIN_ENTRIES_PER_CONDITION {
            continue;
        }
        let positive = moods.iter().filter(|m| Mood::label_is_positive(m)).count();
        insights.push(format!(
            "On {} days, you feel positive {}% of the time",
            condition,
            rounded_percentage(positive, moods.len())
        ));
    }

    if let Some(trend) = recent_trend(&ordered) {
        insights.push(trend);
    }

    insights.truncate(MAX_INSIGHTS);

    Insights {
        total_entries: ordered.len(),
        mood_counts: tally
            .counts
            .into_iter()
            .map(|(mood, count)| (mood.to_string(), count))
            .collect(),
        insights,
    }
}

/// Mood counts kept in first-encountered order so ties have a defined winner.
struct MoodTally<'a> {
    counts: Vec<(&'a str, usize)>,
}

impl<'a> MoodTally<'a> {
    /// Strictly highest count; a tie goes to the label seen first.
    fn most_common(&self) -> Option<(&'a str, usize)> {
        self.counts.iter().fold(None, |best, &(mood, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((mood, count)),
        })
    }
}

fn tally_moods(entries: &[MoodEntry]) -> MoodTally<'_> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for entry in entries {
        match counts.iter_mut().find(|(mood, _)| *mood == entry.mood) {
            Some((_, count)) => *count += 1,
            None => counts.push((entry.mood.as_str(), 1)),
        }
    }
    MoodTally { counts }
}

/// Conditions in order of first appearance, each with its moods.
fn group_by_condition(entries: &[MoodEntry]) -> Vec<(&str, Vec<&str>)> {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for entry in entries {
        let condition = entry.weather.condition.as_str();
        match groups.iter_mut().find(|(c, _)| *c == condition) {
            Some((_, moods)) => moods.push(entry.mood.as_str()),
            None => groups.push((condition, vec![entry.mood.as_str()])),
        }
    }
    groups
}

/// `part / whole` as a percentage, rounded half up.
fn rounded_percentage(part: usize, whole: usize) -> usize {
    (part * 100 + whole / 2) / whole
}

fn recent_trend(newest_first: &[MoodEntry]) -> Option<String> {
    if newest_first.len() < TREND_WINDOW {
        return None;
    }

    let mut distinct: Vec<&str> = Vec::with_capacity(TREND_WINDOW);
    for entry in &newest_first[..TREND_WINDOW] {
        if !distinct.contains(&entry.mood.as_str()) {
            distinct.push(entry.mood.as_str());
        }
    }

    Some(match distinct.as_slice() {
        [only] => format!("You've been consistently {} lately", only),
        _ => format!("Your mood has been varied recently: {}", distinct.join(", ")),
    })
}
