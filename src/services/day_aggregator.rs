//! Buckets entries by UTC calendar day and reduces each bucket to a single
//! value.
//!
//! Day boundaries are always UTC midnight. Two people logging at the same
//! instant from different timezones land in the same bucket; a late-evening
//! entry west of Greenwich lands on the next UTC day. This is a known
//! limitation, applied uniformly to stats, streaks, calendar and journal.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::entry::Entry;
use crate::services::vocabulary::Vocabulary;

/// Entries grouped by UTC day, keys in ascending chronological order.
#[derive(Debug, Clone, Default)]
pub struct DayBuckets<'a> {
    buckets: BTreeMap<NaiveDate, Vec<&'a Entry>>,
    unbucketed: usize,
}

impl<'a> DayBuckets<'a> {
    pub fn get(&self, day: NaiveDate) -> Option<&[&'a Entry]> {
        self.buckets.get(&day).map(Vec::as_slice)
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.buckets.contains_key(&day)
    }

    pub fn days(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + '_ {
        self.buckets.keys().copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, &[&'a Entry])> + '_ {
        self.buckets.iter().map(|(day, list)| (*day, list.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Entries skipped because they had no usable timestamp.
    pub fn unbucketed(&self) -> usize {
        self.unbucketed
    }
}

/// Groups entries by UTC day. Within a bucket, entries keep their input
/// order. Entries without a timestamp are skipped.
pub fn group_by_utc_day(entries: &[Entry]) -> DayBuckets<'_> {
    let mut out = DayBuckets::default();
    for entry in entries {
        match entry.utc_day() {
            Some(day) => out.buckets.entry(day).or_default().push(entry),
            None => out.unbucketed += 1,
        }
    }
    out
}

/// Most recent entry per UTC day, by timestamp.
///
/// Recency is decided from `timestamp_utc` itself rather than from the
/// position in `entries`, so callers need not pre-sort. When two entries on
/// the same day carry the identical instant, the one earlier in `entries`
/// wins.
pub fn latest_per_day(entries: &[Entry]) -> BTreeMap<NaiveDate, &Entry> {
    latest_matching(entries, |_| true)
}

/// Like [`latest_per_day`] but only considers entries that carry a mood.
/// Feeds calendar day decoration.
pub fn latest_mood_per_day(entries: &[Entry]) -> BTreeMap<NaiveDate, &Entry> {
    latest_matching(entries, |e| e.mood().is_some())
}

fn latest_matching<F>(entries: &[Entry], keep: F) -> BTreeMap<NaiveDate, &Entry>
where
    F: Fn(&Entry) -> bool,
{
    let mut latest: BTreeMap<NaiveDate, &Entry> = BTreeMap::new();
    for entry in entries.iter().filter(|e| keep(e)) {
        let Some(ts) = entry.timestamp_utc else {
            continue;
        };
        latest
            .entry(ts.date_naive())
            .and_modify(|current| {
                if current.timestamp_utc.is_some_and(|cur| ts > cur) {
                    *current = entry;
                }
            })
            .or_insert(entry);
    }
    latest
}

/// Mean valence score per UTC day over entries that carry a mood. Days
/// without any scored entry are left out rather than zero-filled.
pub fn average_per_day(entries: &[Entry], vocabulary: &Vocabulary) -> BTreeMap<NaiveDate, f64> {
    let mut sums: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();
    for entry in entries {
        let (Some(day), Some(symbol)) = (entry.utc_day(), entry.mood()) else {
            continue;
        };
        let slot = sums.entry(day).or_insert((0, 0));
        slot.0 += u32::from(vocabulary.score_of(Some(symbol)));
        slot.1 += 1;
    }
    sums.into_iter()
        .map(|(day, (total, count))| (day, f64::from(total) / f64::from(count)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::parse_timestamp;

    fn entry(id: &str, ts: &str, mood: Option<&str>) -> Entry {
        let e = Entry::new(id, parse_timestamp(ts));
        match mood {
            Some(m) => e.with_mood(m),
            None => e,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── group_by_utc_day ─────────────────────────────────────────────────

    #[test]
    fn test_group_same_utc_day_across_offsets() {
        let entries = vec![
            entry("a", "2026-05-10T01:00:00+09:00", Some("😄")), // 2026-05-09 16:00Z
            entry("b", "2026-05-09T10:00:00-04:00", Some("😊")), // 2026-05-09 14:00Z
            entry("c", "2026-05-09T23:59:59Z", None),
        ];
        let buckets = group_by_utc_day(&entries);
        assert_eq!(buckets.len(), 1);
        let ids: Vec<_> = buckets
            .get(day(2026, 5, 9))
            .unwrap()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_group_skips_entries_without_timestamp() {
        let entries = vec![
            entry("a", "2026-05-09T10:00:00Z", Some("😄")),
            entry("b", "not a date", Some("😄")),
        ];
        let buckets = group_by_utc_day(&entries);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.unbucketed(), 1);
    }

    #[test]
    fn test_group_keys_ascending() {
        let entries = vec![
            entry("a", "2026-05-11T10:00:00Z", None),
            entry("b", "2026-05-09T10:00:00Z", None),
            entry("c", "2026-05-10T10:00:00Z", None),
        ];
        let days: Vec<_> = group_by_utc_day(&entries).days().collect();
        assert_eq!(days, [day(2026, 5, 9), day(2026, 5, 10), day(2026, 5, 11)]);
    }

    // ── latest_per_day ───────────────────────────────────────────────────

    #[test]
    fn test_latest_per_day_descending_input() {
        let entries = vec![
            entry("t2", "2026-05-09T20:00:00Z", Some("😄")),
            entry("t1", "2026-05-09T08:00:00Z", Some("😢")),
        ];
        let latest = latest_per_day(&entries);
        assert_eq!(latest[&day(2026, 5, 9)].id, "t2");
    }

    #[test]
    fn test_latest_per_day_ignores_input_order() {
        let entries = vec![
            entry("t1", "2026-05-09T08:00:00Z", Some("😢")),
            entry("t2", "2026-05-09T20:00:00Z", Some("😄")),
            entry("other", "2026-05-08T20:00:00Z", Some("😐")),
        ];
        let latest = latest_per_day(&entries);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[&day(2026, 5, 9)].id, "t2");
        assert_eq!(latest[&day(2026, 5, 8)].id, "other");
    }

    #[test]
    fn test_latest_per_day_identical_instant_keeps_first() {
        let entries = vec![
            entry("first", "2026-05-09T08:00:00Z", None),
            entry("second", "2026-05-09T08:00:00Z", None),
        ];
        assert_eq!(latest_per_day(&entries)[&day(2026, 5, 9)].id, "first");
    }

    #[test]
    fn test_latest_mood_per_day_skips_moodless_entries() {
        let entries = vec![
            entry("note-only", "2026-05-09T21:00:00Z", None),
            entry("mood", "2026-05-09T08:00:00Z", Some("😊")),
        ];
        assert_eq!(latest_per_day(&entries)[&day(2026, 5, 9)].id, "note-only");
        assert_eq!(latest_mood_per_day(&entries)[&day(2026, 5, 9)].id, "mood");
    }

    // ── average_per_day ──────────────────────────────────────────────────

    #[test]
    fn test_average_per_day_mean_of_scores() {
        let vocab = Vocabulary::default();
        let entries = vec![
            entry("a", "2026-05-09T08:00:00Z", Some("😄")),
            entry("b", "2026-05-09T09:00:00Z", Some("😐")),
        ];
        let avg = average_per_day(&entries, &vocab);
        assert_eq!(avg[&day(2026, 5, 9)], 4.0);
    }

    #[test]
    fn test_average_per_day_unknown_symbol_is_neutral() {
        let vocab = Vocabulary::default();
        let entries = vec![
            entry("a", "2026-05-09T08:00:00Z", Some("😄")),
            entry("b", "2026-05-09T09:00:00Z", Some("🦖")),
        ];
        assert_eq!(average_per_day(&entries, &vocab)[&day(2026, 5, 9)], 4.0);
    }

    #[test]
    fn test_average_per_day_excludes_moodless_days() {
        let vocab = Vocabulary::default();
        let entries = vec![
            entry("a", "2026-05-09T08:00:00Z", None),
            entry("b", "2026-05-10T08:00:00Z", Some("😢")),
            entry("c", "garbage", Some("😄")),
        ];
        let avg = average_per_day(&entries, &vocab);
        assert_eq!(avg.len(), 1);
        assert_eq!(avg[&day(2026, 5, 10)], 2.0);
    }

    #[test]
    fn test_empty_input() {
        let vocab = Vocabulary::default();
        assert!(group_by_utc_day(&[]).is_empty());
        assert!(latest_per_day(&[]).is_empty());
        assert!(average_per_day(&[], &vocab).is_empty());
    }
}
