//! Journal list view: mood/text filtering and day-grouped listing.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::entry::Entry;

pub const OTHER_GROUP_TITLE: &str = "Other";

#[derive(Debug, Clone, Serialize)]
pub struct JournalGroup<'a> {
    pub title: String,
    pub day: Option<NaiveDate>,
    pub entries: Vec<&'a Entry>,
}

/// Keeps entries whose mood is one of `symbols` (all moods when empty) and
/// whose note contains `search`, ignoring case (everything when blank).
pub fn filter_entries<'a>(entries: &'a [Entry], symbols: &[String], search: &str) -> Vec<&'a Entry> {
    let needle = search.trim().to_lowercase();
    entries
        .iter()
        .filter(|e| {
            symbols.is_empty()
                || e.mood_symbol
                    .as_ref()
                    .is_some_and(|m| symbols.iter().any(|s| s == m))
        })
        .filter(|e| needle.is_empty() || e.note.to_lowercase().contains(&needle))
        .collect()
}

/// Groups entries by UTC day, newest day first and newest entry first
/// within a day. Entries without a timestamp trail in an "Other" group,
/// in input order.
pub fn group_for_journal<'a>(entries: &[&'a Entry], today: NaiveDate) -> Vec<JournalGroup<'a>> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&'a Entry>> = BTreeMap::new();
    let mut other = Vec::new();
    for entry in entries {
        match entry.utc_day() {
            Some(day) => by_day.entry(day).or_default().push(*entry),
            None => other.push(*entry),
        }
    }

    let mut groups: Vec<JournalGroup<'a>> = by_day
        .into_iter()
        .rev()
        .map(|(day, mut list)| {
            // stable: equal instants keep input order
            list.sort_by(|a, b| b.timestamp_utc.cmp(&a.timestamp_utc));
            JournalGroup {
                title: group_title(day, today),
                day: Some(day),
                entries: list,
            }
        })
        .collect();

    if !other.is_empty() {
        groups.push(JournalGroup {
            title: OTHER_GROUP_TITLE.to_string(),
            day: None,
            entries: other,
        });
    }
    groups
}

pub fn group_title(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        "Today".to_string()
    } else if today.pred_opt() == Some(day) {
        "Yesterday".to_string()
    } else {
        day.format("%B %-d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::parse_timestamp;

    fn entry(id: &str, ts: &str, mood: Option<&str>, note: &str) -> Entry {
        let e = Entry::new(id, parse_timestamp(ts)).with_note(note);
        match mood {
            Some(m) => e.with_mood(m),
            None => e,
        }
    }

    fn ids(list: &[&Entry]) -> Vec<String> {
        list.iter().map(|e| e.id.clone()).collect()
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry("a", "2026-10-19T08:00:00Z", Some("😄"), "Walked the DOG"),
            entry("b", "2026-10-19T20:00:00Z", Some("😢"), "tired"),
            entry("c", "2026-10-18T12:00:00Z", None, "dog park again"),
            entry("d", "2026-10-02T12:00:00Z", Some("😄"), ""),
            entry("e", "broken", Some("😐"), "lost date"),
        ]
    }

    #[test]
    fn test_filter_by_mood_and_text() {
        let entries = sample();
        assert_eq!(filter_entries(&entries, &[], "").len(), 5);
        assert_eq!(ids(&filter_entries(&entries, &["😄".to_string()], "")), ["a", "d"]);
        assert_eq!(ids(&filter_entries(&entries, &[], "  dog ")), ["a", "c"]);
        assert_eq!(ids(&filter_entries(&entries, &["😄".to_string()], "dog")), ["a"]);
    }

    #[test]
    fn test_filter_excludes_moodless_entries_when_moods_selected() {
        let entries = sample();
        let filtered = filter_entries(&entries, &["😢".to_string(), "😐".to_string()], "");
        assert_eq!(ids(&filtered), ["b", "e"]);
    }

    #[test]
    fn test_group_titles_and_order() {
        let entries = sample();
        let all: Vec<&Entry> = entries.iter().collect();
        let groups = group_for_journal(&all, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());

        let titles: Vec<_> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, ["Today", "Yesterday", "October 2, 2026", "Other"]);
        assert_eq!(ids(&groups[0].entries), ["b", "a"]);
        assert_eq!(groups[3].day, None);
        assert_eq!(ids(&groups[3].entries), ["e"]);
    }

    #[test]
    fn test_group_titles_at_calendar_lower_bound() {
        let entries = sample();
        let all: Vec<&Entry> = entries.iter().collect();
        let groups = group_for_journal(&all, NaiveDate::MIN);

        let titles: Vec<_> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, ["October 19, 2026", "October 18, 2026", "October 2, 2026", "Other"]);
        assert_eq!(group_title(NaiveDate::MIN, NaiveDate::MIN), "Today");
    }

    #[test]
    fn test_group_empty() {
        let groups = group_for_journal(&[], NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert!(groups.is_empty());
    }
}
