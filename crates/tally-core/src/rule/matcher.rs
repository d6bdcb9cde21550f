//! Attribute matcher - one rule-attribute comparison

use rust_decimal::Decimal;

use super::types::{AttrRef, AttrValue, Matcher, Operator};

/// Outcome of comparing one transaction attribute against one matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched,
    Failed,
    /// The attribute does not participate (ignored operator, no rule value,
    /// or the attribute does not apply to this transaction)
    Ignored,
}

impl MatchOutcome {
    fn from_bool(matched: bool) -> Self {
        if matched {
            Self::Matched
        } else {
            Self::Failed
        }
    }
}

/// Compare a transaction attribute against a matcher.
///
/// Text compares case-insensitively. Numbers compare exactly, and treat
/// `CONTAINS`/`NOT_CONTAINS` as equality/inequality. Comparing text against a
/// number never matches.
pub fn match_attribute(attribute: Option<AttrRef<'_>>, matcher: &Matcher) -> MatchOutcome {
    if matcher.operator == Operator::Ignore {
        return MatchOutcome::Ignored;
    }
    let Some(expected) = matcher.value.as_ref() else {
        return MatchOutcome::Ignored;
    };
    let Some(actual) = attribute else {
        return MatchOutcome::Ignored;
    };

    match (actual, expected) {
        (AttrRef::Text(actual), AttrValue::Text(expected)) => {
            match_text(actual, expected, matcher.operator)
        }
        (AttrRef::Number(actual), AttrValue::Number(expected)) => {
            match_number(actual, *expected, matcher.operator)
        }
        _ => MatchOutcome::Failed,
    }
}

fn match_text(actual: &str, expected: &str, operator: Operator) -> MatchOutcome {
    let actual = actual.to_uppercase();
    let expected = expected.to_uppercase();
    match operator {
        Operator::Equals => MatchOutcome::from_bool(actual == expected),
        Operator::NotEquals => MatchOutcome::from_bool(actual != expected),
        Operator::Contains => MatchOutcome::from_bool(actual.contains(&expected)),
        Operator::NotContains => MatchOutcome::from_bool(!actual.contains(&expected)),
        Operator::Ignore => MatchOutcome::Ignored,
    }
}

fn match_number(actual: Decimal, expected: Decimal, operator: Operator) -> MatchOutcome {
    match operator {
        Operator::Equals | Operator::Contains => MatchOutcome::from_bool(actual == expected),
        Operator::NotEquals | Operator::NotContains => MatchOutcome::from_bool(actual != expected),
        Operator::Ignore => MatchOutcome::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<AttrRef<'_>> {
        Some(AttrRef::Text(s))
    }

    fn number(n: i64) -> Option<AttrRef<'static>> {
        Some(AttrRef::Number(Decimal::from(n)))
    }

    #[test]
    fn equals_is_exact_not_partial() {
        let m = Matcher::text(Operator::Equals, "exact match");
        assert_eq!(match_attribute(text("exact match"), &m), MatchOutcome::Matched);
        assert_eq!(
            match_attribute(text("a partial exact match here"), &m),
            MatchOutcome::Failed
        );
    }

    #[test]
    fn text_is_case_insensitive() {
        let m = Matcher::text(Operator::Contains, "LiDl");
        assert_eq!(match_attribute(text("compra lidl"), &m), MatchOutcome::Matched);
        let m = Matcher::text(Operator::Equals, "netflix");
        assert_eq!(match_attribute(text("NETFLIX"), &m), MatchOutcome::Matched);
    }

    #[test]
    fn contains_and_not_contains_are_complementary() {
        let pairs = [
            ("COMPRA LIDL VAGOS", "lidl"),
            ("COMPRA LIDL VAGOS", "continente"),
            ("x", "x"),
            ("abc", ""),
        ];
        for (description, needle) in pairs {
            let contains = match_attribute(
                text(description),
                &Matcher::text(Operator::Contains, needle),
            );
            let not_contains = match_attribute(
                text(description),
                &Matcher::text(Operator::NotContains, needle),
            );
            assert_ne!(contains, not_contains, "{description:?} / {needle:?}");
        }
    }

    #[test]
    fn not_equals_on_text() {
        let m = Matcher::text(Operator::NotEquals, "salary");
        assert_eq!(match_attribute(text("SALARY"), &m), MatchOutcome::Failed);
        assert_eq!(match_attribute(text("bonus"), &m), MatchOutcome::Matched);
    }

    #[test]
    fn numbers_compare_exactly() {
        let m = Matcher::number(Operator::Equals, Decimal::new(1990, 2));
        assert_eq!(
            match_attribute(Some(AttrRef::Number("19.9".parse().unwrap())), &m),
            MatchOutcome::Matched
        );
        assert_eq!(
            match_attribute(Some(AttrRef::Number("19.91".parse().unwrap())), &m),
            MatchOutcome::Failed
        );
    }

    #[test]
    fn numeric_contains_degrades_to_equality() {
        let contains = Matcher::account(Operator::Contains, 12);
        assert_eq!(match_attribute(number(12), &contains), MatchOutcome::Matched);
        assert_eq!(match_attribute(number(123), &contains), MatchOutcome::Failed);

        let not_contains = Matcher::account(Operator::NotContains, 12);
        assert_eq!(match_attribute(number(12), &not_contains), MatchOutcome::Failed);
        assert_eq!(match_attribute(number(123), &not_contains), MatchOutcome::Matched);
    }

    #[test]
    fn mixed_types_fail() {
        let m = Matcher::text(Operator::Equals, "1990");
        assert_eq!(match_attribute(number(1990), &m), MatchOutcome::Failed);
        let m = Matcher::number(Operator::NotEquals, Decimal::from(5));
        assert_eq!(match_attribute(text("5"), &m), MatchOutcome::Failed);
    }

    #[test]
    fn ignored_cases() {
        let ignored_op = Matcher::new(Operator::Ignore, Some(AttrValue::Text("x".into())));
        assert_eq!(match_attribute(text("x"), &ignored_op), MatchOutcome::Ignored);

        let no_value = Matcher::new(Operator::Equals, None);
        assert_eq!(match_attribute(text("x"), &no_value), MatchOutcome::Ignored);

        let not_applicable = Matcher::account(Operator::Equals, 3);
        assert_eq!(match_attribute(None, &not_applicable), MatchOutcome::Ignored);
    }
}
