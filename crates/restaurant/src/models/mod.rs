//! Domain models for the restaurant.
//!
//! These types represent validated records separate from database row types.
//! Every model implements `Display` with the label staff see in admin lists,
//! select boxes and delete confirmations.

pub mod booking;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod user;

pub use booking::{Booking, NewBooking};
pub use cart::{Cart, CartLine, NewCart};
pub use catalog::{Category, Menu, MenuItem, MenuItemDetail, MenuItemLine, NewCategory, NewMenu, NewMenuItem};
pub use order::{NewOrder, NewOrderItem, Order, OrderDetail, OrderItem, OrderItemLine, OrderLine};
pub use user::User;
