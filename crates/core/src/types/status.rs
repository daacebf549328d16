//! Order delivery status.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Whether an order has been delivered.
///
/// Stored as a boolean column (`0` pending, `1` delivered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Not yet delivered.
    #[default]
    Pending,
    /// Handed over by the delivery crew.
    Delivered,
}

impl OrderStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 2] = [Self::Pending, Self::Delivered];

    /// Returns `true` for [`OrderStatus::Delivered`].
    #[must_use]
    pub const fn is_delivered(self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Form and query parameter value (`pending` / `delivered`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Delivered => "delivered",
        }
    }

    /// Parse a form or query parameter value.
    #[must_use]
    pub fn from_str_param(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Delivered => "Delivered",
        }
    }
}

impl From<bool> for OrderStatus {
    fn from(delivered: bool) -> Self {
        if delivered {
            Self::Delivered
        } else {
            Self::Pending
        }
    }
}

impl From<OrderStatus> for bool {
    fn from(status: OrderStatus) -> Self {
        status.is_delivered()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for OrderStatus {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <bool as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <bool as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for OrderStatus {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let delivered = <bool as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self::from(delivered))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for OrderStatus {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <bool as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.is_delivered(), buf)
    }
}
