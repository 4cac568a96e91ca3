//! Authentication
//!
//! The bearer credential is opaque here: it is obtained from the login
//! endpoint, stored, forwarded, and evicted when the server rejects it.

mod errors;
mod models;
mod service;
mod session;
mod token;

pub use errors::*;
pub use models::*;
pub use service::*;
pub use session::SessionStore;
pub use token::BearerToken;
