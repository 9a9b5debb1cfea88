// Numeric-token extraction for group labels ("group2", "cohort 10b")

use nom::{
    bytes::complete::take_till,
    character::complete::digit1,
    combinator::map_res,
    sequence::preceded,
    IResult,
};
use std::cmp::Ordering;

fn numeric_token(input: &str) -> IResult<&str, u64> {
    preceded(
        take_till(|c: char| c.is_ascii_digit()),
        map_res(digit1, str::parse::<u64>),
    )(input)
}

/// First run of ASCII digits embedded in a label
pub fn leading_number(label: &str) -> Option<u64> {
    numeric_token(label).ok().map(|(_, n)| n)
}

/// Numeric-aware label ordering.
///
/// Labels that both carry a numeric token compare by that number, so
/// "group2" sorts before "group10". Labels with a token sort ahead of labels
/// without one; two labels without a token compare lexicographically.
pub fn compare_group_labels(a: &str, b: &str) -> Ordering {
    match (leading_number(a), leading_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("group10"), Some(10));
        assert_eq!(leading_number("7 days"), Some(7));
        assert_eq!(leading_number("cohort 3b"), Some(3));
        assert_eq!(leading_number("cohortA"), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn test_overlong_token_is_ignored() {
        assert_eq!(leading_number("g99999999999999999999999"), None);
    }

    #[test]
    fn test_compare_numeric_before_lexicographic() {
        assert_eq!(compare_group_labels("group2", "group10"), Ordering::Less);
        assert_eq!(compare_group_labels("Z1", "A2"), Ordering::Less);
        assert_eq!(compare_group_labels("group1", "cohortA"), Ordering::Less);
        assert_eq!(compare_group_labels("cohortB", "cohortA"), Ordering::Greater);
    }

    #[test]
    fn test_equal_tokens_break_ties_by_text() {
        assert_eq!(compare_group_labels("arm1", "bin1"), Ordering::Less);
        assert_eq!(compare_group_labels("arm1", "arm1"), Ordering::Equal);
    }
}
