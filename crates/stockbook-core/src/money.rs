//! # Money
//!
//! Integer-cent amounts for prices, costs, totals and gains.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  decimal text ──parse_decimal──► Money(cents) ──to_decimal_string──►    │
//! │  "12.50", "$1,234.5"             i64, signed         "12.50" (CSV)      │
//! │                                      │                                  │
//! │                                      └──Display──► "$12.50" (people)    │
//! │                                                                         │
//! │  A week of float totals drifts by fractions of a cent and the weekly    │
//! │  report stops agreeing with the daily series. Cents add exactly.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```rust
//! use stockbook_core::money::Money;
//!
//! let unit = Money::parse_decimal("2.99").unwrap();
//! assert_eq!(unit.multiply_quantity(3), Money::from_cents(897));
//! assert_eq!(unit.to_string(), "$2.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A signed amount of cents.
///
/// Signed because a gain is negative when an item sells below cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Line amount for `qty` units at this unit amount, saturating at the
    /// `i64` bounds.
    ///
    /// ```rust
    /// use stockbook_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1250).multiply_quantity(4).cents(), 5000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Unit amount for a line of `qty` units, rounded half away from zero.
    ///
    /// Zero when `qty` is not positive.
    ///
    /// ```rust
    /// use stockbook_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1000).divide_by_quantity(3).cents(), 333);
    /// assert_eq!(Money::from_cents(5).divide_by_quantity(2).cents(), 3);
    /// ```
    pub fn divide_by_quantity(&self, qty: i64) -> Money {
        if qty <= 0 {
            return Money::zero();
        }
        let (amount, qty) = (self.0 as i128, qty as i128);
        let half = if amount >= 0 { qty } else { -qty };
        Money(((amount * 2 + half) / (qty * 2)) as i64)
    }

    /// Reads decimal text such as `"12"`, `"12.5"`, `"-3.75"` or `"$1,234.50"`.
    ///
    /// A third fraction digit rounds half away from zero and any further
    /// digits are ignored. Exponents, stray signs and letters give `None`.
    pub fn parse_decimal(text: &str) -> Option<Money> {
        let text = text.trim();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let digits: String = unsigned
            .strip_prefix('$')
            .unwrap_or(unsigned)
            .chars()
            .filter(|c| *c != ',')
            .collect();

        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
            return None;
        }

        let units: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let mut places = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = places.next().unwrap_or(0);
        let hundredths = places.next().unwrap_or(0);
        let carry = i64::from(places.next().is_some_and(|d| d >= 5));

        let cents = units.checked_mul(100)?.checked_add(tenths * 10 + hundredths + carry)?;
        Some(Money(if negative { -cents } else { cents }))
    }

    /// Plain decimal text with two fraction digits (`"12.50"`, `"-0.05"`).
    ///
    /// The form written to CSV cells; [`Display`](fmt::Display) adds the
    /// currency sign for people.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

// Arithmetic saturates instead of wrapping. Validated items stay far from the
// bounds; this only matters for data that bypassed validation.

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plain = self.to_decimal_string();
        match plain.strip_prefix('-') {
            Some(abs) => write!(f, "-${abs}"),
            None => write!(f, "${plain}"),
        }
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_for_people() {
        assert_eq!(Money::from_cents(1250).to_string(), "$12.50");
        assert_eq!(Money::from_cents(7).to_string(), "$0.07");
        assert_eq!(Money::from_cents(-200).to_string(), "-$2.00");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_sale_amounts_add_up_exactly() {
        // ten sales of $0.10 plus $0.20, the classic float trap
        let dimes: Money = std::iter::repeat(Money::from_cents(10)).take(10).sum();
        assert_eq!(dimes + Money::from_cents(20), Money::from_cents(120));

        let price = Money::from_cents(450);
        let cost = Money::from_cents(500);
        let gain = (price - cost) * 3;
        assert!(gain.is_negative());
        assert_eq!(gain.cents(), -150);

        let mut running = Money::zero();
        running += price;
        assert!(!running.is_zero());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("12"), Some(Money::from_cents(1200)));
        assert_eq!(Money::parse_decimal(" 12.5 "), Some(Money::from_cents(1250)));
        assert_eq!(Money::parse_decimal("+0.07"), Some(Money::from_cents(7)));
        assert_eq!(Money::parse_decimal(".5"), Some(Money::from_cents(50)));
        assert_eq!(Money::parse_decimal("-3.75"), Some(Money::from_cents(-375)));
        assert_eq!(Money::parse_decimal("$1,234.50"), Some(Money::from_cents(123450)));
        assert_eq!(Money::parse_decimal("1.005"), Some(Money::from_cents(101)));
        assert_eq!(Money::parse_decimal("1.0049"), Some(Money::from_cents(100)));

        for bad in ["", ".", "abc", "1.2.3", "1e3", "--1", "12,5x"] {
            assert_eq!(Money::parse_decimal(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn test_decimal_text_reads_back() {
        for cents in [0, 5, 99, 100, 1250, -375, 123456] {
            let money = Money::from_cents(cents);
            assert_eq!(Money::parse_decimal(&money.to_decimal_string()), Some(money));
        }
        assert_eq!(Money::from_cents(1250).to_decimal_string(), "12.50");
        assert_eq!(Money::from_cents(-5).to_decimal_string(), "-0.05");
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(Money::from_cents(200).multiply_quantity(92_233_720_368_547_758), max);
        assert_eq!(Money::from_cents(-200) * i64::MAX, Money::from_cents(i64::MIN));
        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(Money::from_cents(i64::MIN) - Money::from_cents(1), Money::from_cents(i64::MIN));

        let total: Money = [max, max, Money::from_cents(-5)].into_iter().sum();
        assert_eq!(total, Money::from_cents(i64::MAX - 5));

        let mut running = max;
        running += max;
        assert_eq!(running, max);
    }

    #[test]
    fn test_divide_by_quantity() {
        assert_eq!(Money::from_cents(1000).divide_by_quantity(4).cents(), 250);
        assert_eq!(Money::from_cents(1000).divide_by_quantity(3).cents(), 333);
        assert_eq!(Money::from_cents(-5).divide_by_quantity(2).cents(), -3);
        assert_eq!(Money::from_cents(1000).divide_by_quantity(0).cents(), 0);
    }
}
