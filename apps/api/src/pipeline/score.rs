//! Score parsing — the scoring prompt asks for a bare whole number, but the
//! oracle is free text and sometimes wraps the score in prose. The rule:
//! first whole number 0-100 found anywhere in the response.

use once_cell::sync::Lazy;
use regex::Regex;

static WHOLE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,3}\b").expect("hard-coded pattern"));

/// Extracts the first whole number 0-100 from an oracle scoring response.
/// Returns `None` when no such number exists; the caller records that as a
/// parse failure rather than inventing a score.
pub fn parse_score(text: &str) -> Option<u32> {
    WHOLE_NUMBER
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .find(|n| *n <= 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_number() {
        assert_eq!(parse_score("87"), Some(87));
    }

    #[test]
    fn test_number_wrapped_in_prose() {
        assert_eq!(parse_score("Score: 42 out of 100"), Some(42));
    }

    #[test]
    fn test_no_number_at_all() {
        assert_eq!(parse_score("no valid score"), None);
    }

    #[test]
    fn test_boundaries_accepted() {
        assert_eq!(parse_score("0"), Some(0));
        assert_eq!(parse_score("the final score is 100"), Some(100));
    }

    #[test]
    fn test_out_of_range_numbers_are_skipped() {
        // 250 is not a score; the later in-range 90 is.
        assert_eq!(parse_score("matched 250 keywords, overall 90"), Some(90));
        assert_eq!(parse_score("999"), None);
    }

    #[test]
    fn test_digits_inside_longer_numbers_do_not_match() {
        // "1000" must not yield 100 or 10.
        assert_eq!(parse_score("over 1000 applicants"), None);
    }

    #[test]
    fn test_whitespace_padding() {
        assert_eq!(parse_score("  \n 73 \n"), Some(73));
    }
}
