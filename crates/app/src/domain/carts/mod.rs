//! Carts
//!
//! A cart exists in one of two places: the guest cart kept in local storage,
//! or the per-user cart owned by the server. [`CartController`] decides on
//! every load which one is authoritative.

mod controller;
pub mod errors;
mod guest;
pub mod models;
mod service;

pub use controller::CartController;
pub use errors::CartError;
pub use guest::GuestCart;
pub use service::*;
