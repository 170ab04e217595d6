//! Title and description template expansion.

use chrono::NaiveDate;

/// Expand `{{date}}` and `{{topic}}` tokens. Text without tokens passes
/// through untouched, so expansion is idempotent; the date renders as
/// `YYYY-MM-DD`, so output is stable within a calendar day.
pub fn expand(template: &str, topic: &str, date: NaiveDate) -> String {
    template
        .replace("{{date}}", &date.format("%Y-%m-%d").to_string())
        .replace("{{topic}}", topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_expands_date_and_topic() {
        let out = expand("Daily Briefing - {{date}}: {{topic}}", "the deep ocean", day());
        assert_eq!(out, "Daily Briefing - 2024-03-09: the deep ocean");
    }

    #[test]
    fn test_idempotent_without_tokens() {
        let plain = "No tokens here.";
        let once = expand(plain, "topic", day());
        assert_eq!(once, plain);
        assert_eq!(expand(&once, "topic", day()), plain);
    }

    #[test]
    fn test_deterministic_for_a_fixed_date() {
        let a = expand("Daily Briefing - {{date}}", "x", day());
        let b = expand("Daily Briefing - {{date}}", "x", day());
        assert_eq!(a, b);
        assert_eq!(a, "Daily Briefing - 2024-03-09");
    }

    #[test]
    fn test_repeated_tokens_all_expand() {
        let out = expand("{{date}} {{date}}", "x", day());
        assert_eq!(out, "2024-03-09 2024-03-09");
    }
}
