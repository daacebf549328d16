//! Type-safe price representation using decimal arithmetic.
//!
//! Menu prices, cart lines and order totals all share the same column shape:
//! a non-negative amount with at most 6 significant digits, 2 of them after
//! the decimal point (`0.00 ..= 9999.99`). Amounts are stored as exact
//! decimal text so no float rounding ever touches money.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("enter a number")]
    Invalid,
    /// The amount is negative.
    #[error("price cannot be negative")]
    Negative,
    /// More than two digits after the decimal point.
    #[error("ensure that there are no more than {max} decimal places")]
    TooManyDecimalPlaces {
        /// Maximum allowed decimal places.
        max: u32,
    },
    /// The amount exceeds the column's digit budget.
    #[error("ensure that there are no more than {max} digits in total")]
    TooManyDigits {
        /// Maximum allowed total digits.
        max: u32,
    },
}

/// A monetary amount in the restaurant's currency.
///
/// ## Examples
///
/// ```
/// use little_lemon_core::Price;
///
/// let price = Price::parse("8.99").unwrap();
/// assert_eq!(price.to_string(), "8.99");
/// assert_eq!(price.times(2).unwrap().to_string(), "17.98");
///
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("1.999").is_err());
/// assert!(Price::parse("10000").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Maximum digits after the decimal point.
    pub const DECIMAL_PLACES: u32 = 2;

    /// Maximum total digits.
    pub const MAX_DIGITS: u32 = 6;

    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Parse a `Price` from user input such as `"9.99"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, negative, has
    /// more than two decimal places, or exceeds six digits in total.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(s).map_err(|_| PriceError::Invalid)?;
        Self::try_from(amount)
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity (e.g. `unit_price * quantity`).
    ///
    /// Returns `None` if the result no longer fits a price column.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Option<Self> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .and_then(|amount| Self::try_from(amount).ok())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        let amount = amount.normalize();
        if amount.scale() > Self::DECIMAL_PLACES {
            return Err(PriceError::TooManyDecimalPlaces {
                max: Self::DECIMAL_PLACES,
            });
        }

        let mut amount = amount;
        amount.rescale(Self::DECIMAL_PLACES);
        let digits = amount.mantissa().unsigned_abs().to_string().len();
        if digits > Self::MAX_DIGITS as usize {
            return Err(PriceError::TooManyDigits {
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(amount))
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Price {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Price {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let text = <&str as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self::parse(text)?)
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.to_string(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_prices() {
        assert_eq!(Price::parse("9.99").unwrap().to_string(), "9.99");
        assert_eq!(Price::parse("5").unwrap().to_string(), "5.00");
        assert_eq!(Price::parse(" 12.5 ").unwrap().to_string(), "12.50");
        assert_eq!(Price::parse("9999.99").unwrap().to_string(), "9999.99");
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_parse_trailing_zeros_beyond_scale() {
        // Trailing zeros are not significant decimal places.
        assert_eq!(Price::parse("1.500").unwrap().to_string(), "1.50");
    }

    #[test]
    fn test_parse_rejects_invalid_prices() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("abc"), Err(PriceError::Invalid));
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
        assert_eq!(
            Price::parse("1.234"),
            Err(PriceError::TooManyDecimalPlaces { max: 2 })
        );
        assert_eq!(
            Price::parse("10000"),
            Err(PriceError::TooManyDigits { max: 6 })
        );
    }

    #[test]
    fn test_times_quantity() {
        let unit = Price::parse("8.99").unwrap();
        assert_eq!(unit.times(2).unwrap().to_string(), "17.98");
        assert_eq!(unit.times(0).unwrap(), Price::ZERO);
        assert!(unit.times(10_000).is_none());
    }

    #[test]
    fn test_serde_uses_decimal_string() {
        let price = Price::parse("25.99").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"25.99\"");

        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);

        assert!(serde_json::from_str::<Price>("\"-3\"").is_err());
    }
}
