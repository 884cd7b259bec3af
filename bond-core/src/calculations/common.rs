//! Numeric helpers shared by the derived-value engine and the validation
//! panel.
//!
//! Amount fields are free text. Rather than rejecting what the user typed,
//! the form reads the leading decimal numeral of a field and treats anything
//! else as zero.

use rust_decimal::Decimal;

/// Returns the leading decimal numeral of `input`, if there is one.
///
/// Leading whitespace is skipped. The numeral is an optional sign, a run of
/// digits and an optional fraction; at least one digit must be present.
/// Everything after the numeral is ignored.
///
/// # Examples
///
/// ```
/// use bond_core::calculations::common::leading_numeral;
///
/// assert_eq!(leading_numeral("  250.75 GBP"), Some("250.75"));
/// assert_eq!(leading_numeral("-12abc"), Some("-12"));
/// assert_eq!(leading_numeral("£100"), None);
/// ```
pub fn leading_numeral(input: &str) -> Option<&str> {
    let trimmed = input.trim_start();
    let bytes = trimmed.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    if end < bytes.len() && bytes[end] == b'.' {
        let mut probe = end + 1;
        while probe < bytes.len() && bytes[probe].is_ascii_digit() {
            probe += 1;
        }
        frac_digits = probe - end - 1;
        if frac_digits > 0 {
            end = probe;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    Some(&trimmed[..end])
}

/// Parses the leading decimal numeral of `input`, yielding zero when there
/// is none.
///
/// Never fails: empty text, non-numeric text and numerals too large for a
/// [`Decimal`] all come back as [`Decimal::ZERO`].
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use bond_core::calculations::common::parse_number;
///
/// assert_eq!(parse_number("10000"), dec!(10000));
/// assert_eq!(parse_number("1500.50 fee"), dec!(1500.50));
/// assert_eq!(parse_number(""), dec!(0));
/// assert_eq!(parse_number("n/a"), dec!(0));
/// ```
pub fn parse_number(input: &str) -> Decimal {
    let Some(numeral) = leading_numeral(input) else {
        return Decimal::ZERO;
    };

    let (negative, unsigned) = match numeral.as_bytes()[0] {
        b'-' => (true, &numeral[1..]),
        b'+' => (false, &numeral[1..]),
        _ => (false, numeral),
    };
    // ".5" is a valid numeral but not a valid Decimal literal
    let canonical = if unsigned.starts_with('.') {
        format!("0{unsigned}")
    } else {
        unsigned.to_string()
    };

    match canonical.parse::<Decimal>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(input, "numeral out of range, using zero: {}", e);
            Decimal::ZERO
        }
    }
}

/// Renders an amount without trailing zeros (`"1500.50"` becomes `"1500.5"`).
pub fn format_number(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // leading_numeral tests
    // =========================================================================

    #[test]
    fn leading_numeral_stops_at_first_non_digit() {
        assert_eq!(leading_numeral("123abc"), Some("123"));
        assert_eq!(leading_numeral("1,000"), Some("1"));
    }

    #[test]
    fn leading_numeral_keeps_sign_and_fraction() {
        assert_eq!(leading_numeral("-42.5"), Some("-42.5"));
        assert_eq!(leading_numeral("+7"), Some("+7"));
        assert_eq!(leading_numeral(".25"), Some(".25"));
    }

    #[test]
    fn leading_numeral_drops_dangling_point() {
        assert_eq!(leading_numeral("5."), Some("5"));
        assert_eq!(leading_numeral("5.x"), Some("5"));
    }

    #[test]
    fn leading_numeral_rejects_sign_without_digits() {
        assert_eq!(leading_numeral("-"), None);
        assert_eq!(leading_numeral("-.x"), None);
        assert_eq!(leading_numeral("   "), None);
    }

    // =========================================================================
    // parse_number tests
    // =========================================================================

    #[test]
    fn parse_number_reads_plain_integers() {
        assert_eq!(parse_number("5000"), dec!(5000));
    }

    #[test]
    fn parse_number_reads_negative_fractions() {
        assert_eq!(parse_number("-0.75"), dec!(-0.75));
    }

    #[test]
    fn parse_number_reads_bare_fraction() {
        assert_eq!(parse_number(".5"), dec!(0.5));
    }

    #[test]
    fn parse_number_treats_garbage_as_zero() {
        assert_eq!(parse_number("abc"), Decimal::ZERO);
        assert_eq!(parse_number("£10,000"), Decimal::ZERO);
    }

    #[test]
    fn parse_number_treats_overflow_as_zero() {
        let huge = "9".repeat(60);

        assert_eq!(parse_number(&huge), Decimal::ZERO);
    }

    // =========================================================================
    // format_number tests
    // =========================================================================

    #[test]
    fn format_number_strips_trailing_zeros() {
        assert_eq!(format_number(dec!(1500.50)), "1500.5");
        assert_eq!(format_number(dec!(10.00)), "10");
    }

    #[test]
    fn format_number_keeps_negative_sign() {
        assert_eq!(format_number(dec!(-3000)), "-3000");
    }
}
