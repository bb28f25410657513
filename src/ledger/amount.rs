use rust_decimal::{prelude::ToPrimitive as _, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Signed amount in cents. Negative amounts are debits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Parses a decimal currency value like `-1,234.56` or `$12.3` into cents.
    ///
    /// The digits are parsed as an exact decimal, so no binary float rounding is involved.
    /// Values with more than two fraction digits are rounded half away from zero.
    pub fn parse(content: &str) -> Result<Self, &'static str> {
        let content = content.trim();
        let (negative, content) = match content.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, content.strip_prefix('+').unwrap_or(content)),
        };
        let content = content.strip_prefix('$').unwrap_or(content);
        if content.is_empty() {
            return Err("Empty amount");
        }
        if content.starts_with(['-', '+']) {
            return Err("Duplicate sign");
        }
        let content = content.replace(',', "");
        let value = Decimal::from_str_exact(&content).map_err(|_| "Failed to parse amount")?;
        let cents = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or("Amount out of range")?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or("Amount out of range")?;
        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("123.45", 12345)]
    #[case("-123.45", -12345)]
    #[case("+7.10", 710)]
    #[case("0.00", 0)]
    #[case("5", 500)]
    #[case("-5", -500)]
    #[case("1,234.56", 123456)]
    #[case("-1,234,567.89", -123456789)]
    #[case("$12.30", 1230)]
    #[case("-$12.30", -1230)]
    #[case("  42.01 ", 4201)]
    fn parses_amount(#[case] input: &str, #[case] expected_cents: i64) {
        assert_eq!(Ok(Amount::from_cents(expected_cents)), Amount::parse(input));
    }

    #[rstest]
    #[case("0.145", 15)]
    #[case("-0.145", -15)]
    #[case("1.005", 101)]
    #[case("0.144", 14)]
    #[case("19.999", 2000)]
    fn rounds_sub_cent_values_exactly(#[case] input: &str, #[case] expected_cents: i64) {
        assert_eq!(Ok(Amount::from_cents(expected_cents)), Amount::parse(input));
    }

    #[test]
    fn float_unfriendly_values_are_exact() {
        // 0.29 * 100 is 28.999999999999996 in binary floating point
        assert_eq!(Ok(Amount::from_cents(29)), Amount::parse("0.29"));
        assert_eq!(Ok(Amount::from_cents(-1907)), Amount::parse("-19.07"));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("-")]
    #[case("$")]
    #[case("abc")]
    #[case("12.3.4")]
    #[case("--5")]
    #[case("-+5")]
    #[case("99999999999999999999999.00")]
    fn rejects_invalid_amount(#[case] input: &str) {
        assert!(Amount::parse(input).is_err());
    }

    #[rstest]
    #[case(0, "0.00")]
    #[case(5, "0.05")]
    #[case(-5, "-0.05")]
    #[case(-500, "-5.00")]
    #[case(123456, "1234.56")]
    #[case(i64::MIN, "-92233720368547758.08")]
    fn displays_amount(#[case] cents: i64, #[case] expected: &str) {
        assert_eq!(expected, Amount::from_cents(cents).to_string());
    }

    #[test]
    fn deserializes_from_integer_cents() {
        let amount: Amount = serde_json::from_str("-2500").unwrap();
        assert_eq!(Amount::from_cents(-2500), amount);
    }
}
