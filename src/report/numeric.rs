//! Numeric parsing for report fields.
//!
//! Tester reports print money with `,` as the thousands separator
//! (`1,250.50`) and counts as plain integers. Parsing never fails loudly:
//! every function returns `None` when the text is not a number.

use std::borrow::Cow;

/// Remove `,` thousands separators.
#[inline]
pub fn strip_thousands(text: &str) -> Cow<'_, str> {
    if text.contains(',') {
        Cow::Owned(text.replace(',', ""))
    } else {
        Cow::Borrowed(text)
    }
}

/// Drop one leading `+` so `+12` parses like `12`.
#[inline]
fn strip_plus(text: &str) -> &str {
    match text.strip_prefix('+') {
        Some(rest) if !rest.starts_with(['+', '-']) => rest,
        _ => text,
    }
}

/// Parse a whole integer such as `42` or `-7`.
///
/// Surrounding whitespace is ignored; separators and fractions are not
/// accepted.
pub fn parse_int(text: &str) -> Option<i64> {
    let text = strip_plus(text.trim());
    if text.is_empty() {
        return None;
    }
    atoi_simd::parse::<i64, false, false>(text.as_bytes()).ok()
}

/// Parse a finite decimal such as `1250.50`, `-3` or `1e3`.
///
/// `inf` and `nan` spellings are rejected.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let text = strip_plus(text.trim());
    if text.is_empty() {
        return None;
    }
    fast_float2::parse::<f64, _>(text)
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse a decimal that may carry thousands separators (`1,250.50`).
#[inline]
pub fn parse_money(text: &str) -> Option<f64> {
    parse_decimal(&strip_thousands(text))
}

/// Round to two decimal places, half-way cases resolved on the exact binary
/// value (`2.675` is stored below the midpoint and rounds to `2.67`).
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Profit over absolute drawdown, rounded to two decimals.
///
/// Both inputs may carry thousands separators. The ratio is `0.0` when
/// either side is not numeric, when the drawdown is not positive, or when the
/// quotient overflows.
pub fn profit_to_drawdown(profit: &str, drawdown: &str) -> f64 {
    let (Some(profit), Some(drawdown)) = (parse_money(profit), parse_money(drawdown)) else {
        return 0.0;
    };
    if drawdown <= 0.0 {
        return 0.0;
    }
    let ratio = round2(profit / drawdown);
    if ratio.is_finite() { ratio } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int(" -7 "), Some(-7));
        assert_eq!(parse_int("+12"), Some(12));
        assert_eq!(parse_int("1,250"), None);
        assert_eq!(parse_int("7.0"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("abc"), None);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("1.85"), Some(1.85));
        assert_eq!(parse_decimal("-3"), Some(-3.0));
        assert_eq!(parse_decimal("1e3"), Some(1000.0));
        assert_eq!(parse_decimal("1,250.50"), None);
        assert_eq!(parse_decimal("inf"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("12.5%"), None);
    }

    #[test]
    fn test_parse_money_strips_separators() {
        assert_eq!(parse_money("1,250.50"), Some(1250.5));
        assert_eq!(parse_money("1,000,000"), Some(1_000_000.0));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.501), 2.5);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(-2.0 / 3.0), -0.67);
        assert_eq!(round2(2.675), 2.67);
    }

    #[test]
    fn test_ratio_examples() {
        assert_eq!(profit_to_drawdown("1,250.50", "500.00"), 2.5);
        assert_eq!(profit_to_drawdown("1,250.50", "0"), 0.0);
        assert_eq!(profit_to_drawdown("100", "-5"), 0.0);
        assert_eq!(profit_to_drawdown("n/a", "500"), 0.0);
        assert_eq!(profit_to_drawdown("100", ""), 0.0);
        assert_eq!(profit_to_drawdown("-300", "150"), -2.0);
        assert_eq!(profit_to_drawdown("1e308", "1e-10"), 0.0);
    }

    proptest! {
        #[test]
        fn prop_ratio_is_rounded_quotient(
            profit in -1.0e7f64..1.0e7,
            drawdown in 0.01f64..1.0e7,
        ) {
            let ratio = profit_to_drawdown(&profit.to_string(), &drawdown.to_string());
            let expected = profit / drawdown;
            prop_assert!((ratio - expected).abs() <= 0.005 + expected.abs() * 1e-15 + 1e-9);
            prop_assert_eq!(ratio, round2(ratio));
        }

        #[test]
        fn prop_non_positive_drawdown_gives_zero(
            profit in -1.0e7f64..1.0e7,
            drawdown in -1.0e7f64..=0.0,
        ) {
            prop_assert_eq!(profit_to_drawdown(&profit.to_string(), &drawdown.to_string()), 0.0);
        }

        #[test]
        fn prop_separators_do_not_change_value(whole in 0u64..1_000_000_000, cents in 0u32..100) {
            let plain = format!("{}.{:02}", whole, cents);
            let mut grouped = String::new();
            let digits = whole.to_string();
            for (i, ch) in digits.chars().enumerate() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    grouped.push(',');
                }
                grouped.push(ch);
            }
            let grouped = format!("{}.{:02}", grouped, cents);
            prop_assert_eq!(parse_money(&grouped), parse_decimal(&plain));
        }
    }
}
