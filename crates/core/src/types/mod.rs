//! Core types for Little Lemon.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod slot;
pub mod slug;
pub mod status;
pub mod username;

pub use id::*;
pub use price::{Price, PriceError};
pub use slot::{ReservationSlot, SlotError};
pub use slug::{Slug, SlugError};
pub use status::OrderStatus;
pub use username::{Username, UsernameError};
