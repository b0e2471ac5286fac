//! Trailing trend window and insight summary derived from per-day averages.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::entry::Entry;
use crate::services::day_aggregator::{average_per_day, group_by_utc_day, DayBuckets};
use crate::services::vocabulary::Vocabulary;

pub const DEFAULT_WINDOW_DAYS: usize = 7;
pub const STREAK_SCAN_LIMIT_DAYS: u32 = 365;

/// Fixed five-level table used for the "most frequent mood" tally. Order is
/// the tie-break order.
pub const CANONICAL_SYMBOLS: [(i64, &str); 5] =
    [(5, "😄"), (4, "😊"), (3, "😐"), (2, "😢"), (1, "😡")];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub day: NaiveDate,
    /// Chart label, `M/D` without padding.
    pub label: String,
    pub value: f64,
}

impl TrendPoint {
    fn new(day: NaiveDate, value: f64) -> Self {
        Self {
            day,
            label: format!("{}/{}", day.month(), day.day()),
            value,
        }
    }
}

/// Non-empty, chronologically ascending run of the most recent days that
/// have data. Only [`trailing_window`] builds one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TrendWindow {
    points: Vec<TrendPoint>,
}

impl TrendWindow {
    pub fn points(&self) -> &[TrendPoint] {
        &self.points
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn mean(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum::<f64>() / self.points.len() as f64
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Last `n` days (ascending) from the per-day averages. Returns `None` when
/// there is nothing to chart: no days, or every value exactly zero.
pub fn trailing_window(day_averages: &BTreeMap<NaiveDate, f64>, n: usize) -> Option<TrendWindow> {
    let skip = day_averages.len().saturating_sub(n);
    let points: Vec<TrendPoint> = day_averages
        .iter()
        .skip(skip)
        .map(|(day, value)| TrendPoint::new(*day, *value))
        .collect();

    if points.is_empty() || points.iter().all(|p| p.value == 0.0) {
        return None;
    }
    Some(TrendWindow { points })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodTrend {
    Amazing,
    MostlyGood,
    Okay,
    Tough,
    Rough,
}

impl MoodTrend {
    /// Buckets are closed below and open above, except the top one which
    /// runs up to and including the maximum score.
    pub fn from_mean(mean: f64) -> Self {
        if mean >= 4.5 {
            Self::Amazing
        } else if mean >= 3.5 {
            Self::MostlyGood
        } else if mean >= 2.5 {
            Self::Okay
        } else if mean >= 1.5 {
            Self::Tough
        } else {
            Self::Rough
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Amazing => "amazing",
            Self::MostlyGood => "mostly good",
            Self::Okay => "okay",
            Self::Tough => "tough",
            Self::Rough => "rough",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Amazing => "😄 You've been feeling amazing this week!",
            Self::MostlyGood => "😊 You've had a mostly good week!",
            Self::Okay => "😐 It's been an okay week. Stay mindful.",
            Self::Tough => "😢 This week's been tough. Take care of yourself.",
            Self::Rough => "😡 It seems like a rough week. Try to take some time to relax.",
        }
    }
}

pub fn summary_text(mean_of_window: f64) -> &'static str {
    MoodTrend::from_mean(mean_of_window).as_str()
}

/// Highest and lowest points of the window. The first occurrence wins ties.
pub fn best_and_worst(window: &TrendWindow) -> (&TrendPoint, &TrendPoint) {
    let mut best = &window.points[0];
    let mut worst = &window.points[0];
    for point in &window.points[1..] {
        if point.value > best.value {
            best = point;
        }
        if point.value < worst.value {
            worst = point;
        }
    }
    (best, worst)
}

/// JavaScript-style rounding: halves go up.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Rounds every window value, maps it onto the canonical five-level table
/// and returns the most common symbol. Values that round outside 1..=5 are
/// not counted. Equal counts go to the symbol listed first in
/// [`CANONICAL_SYMBOLS`].
pub fn most_frequent_mood_symbol<F>(window: &TrendWindow, rounding: F) -> Option<&'static str>
where
    F: Fn(f64) -> i64,
{
    let mut counts = [0usize; CANONICAL_SYMBOLS.len()];
    for point in &window.points {
        let rounded = rounding(point.value);
        if let Some(idx) = CANONICAL_SYMBOLS.iter().position(|(s, _)| *s == rounded) {
            counts[idx] += 1;
        }
    }

    let mut winner: Option<usize> = None;
    for (idx, count) in counts.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        match winner {
            Some(w) if counts[w] >= *count => {}
            _ => winner = Some(idx),
        }
    }
    winner.map(|idx| CANONICAL_SYMBOLS[idx].1)
}

/// Consecutive days with at least one entry, walking back from `today`.
/// A day without entries stops the walk, including `today` itself.
pub fn current_streak(buckets: &DayBuckets<'_>, today: NaiveDate) -> u32 {
    current_streak_within(buckets, today, STREAK_SCAN_LIMIT_DAYS)
}

pub fn current_streak_within(buckets: &DayBuckets<'_>, today: NaiveDate, limit_days: u32) -> u32 {
    let mut streak = 0u32;
    let mut check_date = today;
    while streak < limit_days && buckets.contains_day(check_date) {
        streak += 1;
        match check_date.pred_opt() {
            Some(prev) => check_date = prev,
            None => break,
        }
    }
    streak
}

/// Longest run of consecutive bucketed days anywhere in history.
pub fn longest_streak(buckets: &DayBuckets<'_>) -> u32 {
    let mut longest = 0u32;
    let mut streak = 0u32;
    let mut prev_day: Option<NaiveDate> = None;

    for day in buckets.days() {
        streak = match prev_day {
            Some(prev) if prev.succ_opt() == Some(day) => streak + 1,
            _ => 1,
        };
        longest = longest.max(streak);
        prev_day = Some(day);
    }
    longest
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayExtreme {
    pub day: NaiveDate,
    pub label: String,
    pub value: f64,
    /// Vocabulary symbol nearest to `value`, for display.
    pub symbol: String,
}

impl DayExtreme {
    fn from_point(point: &TrendPoint, vocabulary: &Vocabulary) -> Self {
        Self {
            day: point.day,
            label: point.label.clone(),
            value: point.value,
            symbol: vocabulary.symbol_nearest_to(point.value).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightSummary {
    pub best_day: DayExtreme,
    pub worst_day: DayExtreme,
    pub most_frequent_symbol: Option<String>,
    pub streak_length_days: u32,
    pub longest_streak_days: u32,
    pub trend: MoodTrend,
    pub qualitative_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodStats {
    pub window: TrendWindow,
    pub mean: f64,
    pub insights: InsightSummary,
}

#[derive(Debug, Clone, Copy)]
pub struct StatsOptions {
    pub today: NaiveDate,
    pub window_days: usize,
    pub streak_scan_limit_days: u32,
}

impl StatsOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            window_days: DEFAULT_WINDOW_DAYS,
            streak_scan_limit_days: STREAK_SCAN_LIMIT_DAYS,
        }
    }
}

/// Full recomputation over one snapshot. `None` means there is not enough
/// data to chart.
pub fn build_stats(
    entries: &[Entry],
    vocabulary: &Vocabulary,
    options: StatsOptions,
) -> Option<MoodStats> {
    let averages = average_per_day(entries, vocabulary);
    let window = trailing_window(&averages, options.window_days)?;
    let buckets = group_by_utc_day(entries);

    let mean = window.mean();
    let trend = MoodTrend::from_mean(mean);
    let (best, worst) = best_and_worst(&window);

    let insights = InsightSummary {
        best_day: DayExtreme::from_point(best, vocabulary),
        worst_day: DayExtreme::from_point(worst, vocabulary),
        most_frequent_symbol: most_frequent_mood_symbol(&window, round_half_up)
            .map(str::to_string),
        streak_length_days: current_streak_within(
            &buckets,
            options.today,
            options.streak_scan_limit_days,
        ),
        longest_streak_days: longest_streak(&buckets),
        trend,
        qualitative_text: trend.message().to_string(),
    };

    Some(MoodStats {
        window,
        mean,
        insights,
    })
}
