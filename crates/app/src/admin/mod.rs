//! Administration
//!
//! Catalog editing and user management behind a separate admin credential.
//! The admin token lives under its own storage key, so signing in as admin
//! never touches the shopper's session or guest cart.

mod console;
mod errors;
pub mod models;
mod service;

pub use console::AdminConsole;
pub use errors::{AdminError, NewCarError};
pub use models::{AdminUser, CarImage, CreatedCar, DriveType, ImageFormat, NewCar};
pub use service::*;
