use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: &'static str,
    pub attribution: &'static str,
}

const fn q(text: &'static str, attribution: &'static str) -> Quote {
    Quote { text, attribution }
}

pub const QUOTES: [Quote; 20] = [
    q("One small step today is still progress.", "Unknown"),
    q("You are doing better than you think.", "Unknown"),
    q("Breathe in calm. Breathe out tension.", "Affirmation"),
    q("Your feelings are valid.", "Reminder"),
    q("Be where your feet are.", "Unknown"),
    q("You've handled 100% of your hardest days.", "Unknown"),
    q("I choose to be kind to myself today.", "Affirmation"),
    q("Slow is smooth, smooth is fast.", "Unknown"),
    q("Rest is productive.", "Reminder"),
    q("I am grounded, calm, and capable.", "Affirmation"),
    q("Tiny habits create big change.", "Unknown"),
    q("The present moment is enough.", "Unknown"),
    q("I welcome joy in small ways.", "Affirmation"),
    q("Progress, not perfection.", "Mantra"),
    q("Today, I will meet myself with compassion.", "Affirmation"),
    q("Feel it. Name it. Let it pass.", "Reminder"),
    q("I'm allowed to take up space.", "Affirmation"),
    q("Gratitude turns what we have into enough.", "Unknown"),
    q("I am safe. I am loved. I am learning.", "Affirmation"),
    q("This moment is a fresh start.", "Unknown"),
];

/// Same user and day always yield the same quote; anonymous callers share
/// one rotation.
pub fn quote_of_the_day(user_id: Option<&str>, day: NaiveDate) -> Quote {
    let seed = format!("{}{}", user_id.unwrap_or("anon"), day.format("%Y-%m-%d"));
    QUOTES[(seed_hash(&seed) % QUOTES.len() as u32) as usize]
}

/// `h = h * 31 + unit` over UTF-16 code units, wrapping at 2^32.
fn seed_hash(seed: &str) -> u32 {
    seed.encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_hash_known_values() {
        assert_eq!(seed_hash(""), 0);
        assert_eq!(seed_hash("a"), 97);
        assert_eq!(seed_hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn test_quote_is_deterministic() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(
            quote_of_the_day(Some("user-1"), day),
            quote_of_the_day(Some("user-1"), day)
        );
        assert_eq!(quote_of_the_day(None, day), quote_of_the_day(Some("anon"), day));
    }

    #[test]
    fn test_quote_rotates_across_days() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let distinct: std::collections::HashSet<_> = (0..60)
            .map(|i| quote_of_the_day(Some("u"), start + chrono::Duration::days(i)).text)
            .collect();
        assert!(distinct.len() > 1);
    }
}
