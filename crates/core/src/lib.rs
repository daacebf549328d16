//! Little Lemon Core - Shared domain value types.
//!
//! This crate provides common types used across all Little Lemon components:
//! - `restaurant` - Public restaurant site (menu, booking, reservations)
//! - `admin` - Staff administration panel
//! - `cli` - Command-line tools for migrations, users and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP handling. The optional `sqlite` feature adds `sqlx` encode/decode
//! implementations so the types can be bound and read directly.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, slugs, usernames,
//!   reservation slots and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
