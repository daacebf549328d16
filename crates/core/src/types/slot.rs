//! Reservation time-slot identifier.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ReservationSlot`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// The input string is empty.
    #[error("reservation slot cannot be empty")]
    Empty,
    /// The input is not a whole number.
    #[error("enter a whole number")]
    NotANumber,
    /// The number is outside the storable range.
    #[error("ensure this value is between {min} and {max}")]
    OutOfRange {
        /// Smallest accepted slot.
        min: i16,
        /// Largest accepted slot.
        max: i16,
    },
}

/// The integer time slot a table is booked for.
///
/// Slots are stored in a small-integer column, so the accepted range is
/// `0..=32767`.
///
/// ```
/// use little_lemon_core::ReservationSlot;
///
/// let slot: ReservationSlot = "10".parse().unwrap();
/// assert_eq!(slot.get(), 10);
/// assert!("ten".parse::<ReservationSlot>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i16")]
pub struct ReservationSlot(i16);

impl ReservationSlot {
    /// Smallest accepted slot.
    pub const MIN: i16 = 0;

    /// Largest accepted slot.
    pub const MAX: i16 = i16::MAX;

    /// Create a slot from a raw value.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::OutOfRange`] for negative values.
    pub const fn new(value: i16) -> Result<Self, SlotError> {
        if value < Self::MIN {
            return Err(SlotError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    /// Returns the raw slot number.
    #[must_use]
    pub const fn get(&self) -> i16 {
        self.0
    }
}

impl TryFrom<i64> for ReservationSlot {
    type Error = SlotError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let value = i16::try_from(value).map_err(|_| SlotError::OutOfRange {
            min: Self::MIN,
            max: Self::MAX,
        })?;
        Self::new(value)
    }
}

impl From<ReservationSlot> for i16 {
    fn from(slot: ReservationSlot) -> Self {
        slot.0
    }
}

impl FromStr for ReservationSlot {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SlotError::Empty);
        }
        let value = s.parse::<i64>().map_err(|_| SlotError::NotANumber)?;
        Self::try_from(value)
    }
}

impl fmt::Display for ReservationSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for ReservationSlot {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for ReservationSlot {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <i64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self::try_from(raw)?)
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for ReservationSlot {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<'q, sqlx::Sqlite>>::encode(i64::from(self.0), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slot() {
        assert_eq!("10".parse::<ReservationSlot>().unwrap().get(), 10);
        assert_eq!(" 0 ".parse::<ReservationSlot>().unwrap().get(), 0);
        assert_eq!("32767".parse::<ReservationSlot>().unwrap().get(), 32767);
    }

    #[test]
    fn test_parse_slot_errors() {
        assert_eq!("".parse::<ReservationSlot>(), Err(SlotError::Empty));
        assert_eq!("ten".parse::<ReservationSlot>(), Err(SlotError::NotANumber));
        assert_eq!("1.5".parse::<ReservationSlot>(), Err(SlotError::NotANumber));
        assert!(matches!(
            "-1".parse::<ReservationSlot>(),
            Err(SlotError::OutOfRange { .. })
        ));
        assert!(matches!(
            "40000".parse::<ReservationSlot>(),
            Err(SlotError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_slot_json_is_a_number() {
        let slot = ReservationSlot::new(10).unwrap();
        assert_eq!(serde_json::to_string(&slot).unwrap(), "10");
        let back: ReservationSlot = serde_json::from_str("10").unwrap();
        assert_eq!(back, slot);
        assert!(serde_json::from_str::<ReservationSlot>("-5").is_err());
    }
}
